//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Unchanged, ColumnTrait,
    DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::User;
use crate::errors::{AppError, AppResult};
use crate::types::PageRequest;

#[cfg(test)]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// A missing row is reported as `Ok(None)` by the finders and as
/// [`AppError::UserNotFound`] by the mutating operations.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; the store assigns the id
    async fn create(&self, name: String, email: String, password_hash: String) -> AppResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// One page of users ordered by id, plus the total row count
    async fn list(&self, page: PageRequest) -> AppResult<(Vec<User>, u64)>;

    /// Persist the mutable fields of an existing user
    async fn update(&self, user: User) -> AppResult<User>;

    /// Delete user by ID
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Translate write failures the caller can act on.
fn map_write_err(err: DbErr) -> AppError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return AppError::EmailExists;
    }
    match err {
        DbErr::RecordNotUpdated => AppError::UserNotFound,
        other => AppError::Database(other),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, name: String, email: String, password_hash: String) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(name),
            email: Set(email),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_err)?;
        Ok(User::from(model))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn list(&self, page: PageRequest) -> AppResult<(Vec<User>, u64)> {
        let total = UserEntity::find().count(&self.db).await?;

        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }

    async fn update(&self, user: User) -> AppResult<User> {
        // created_at stays NotSet so it is never rewritten
        let active = ActiveModel {
            id: Unchanged(user.id),
            name: Set(user.name),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            created_at: NotSet,
            updated_at: Set(chrono::Utc::now()),
        };

        let model = active.update(&self.db).await.map_err(map_write_err)?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::UserNotFound);
        }

        Ok(())
    }
}
