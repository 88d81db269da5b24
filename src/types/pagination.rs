//! Pagination types for list endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Pagination query parameters.
///
/// Values are kept as raw strings so that a non-numeric `page` or `limit`
/// falls back to the defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number, 1-indexed (default 1)
    #[param(value_type = Option<u64>, example = 1)]
    pub page: Option<String>,
    /// Items per page, 1 to 100 (default 10)
    #[param(value_type = Option<u64>, example = 10)]
    pub limit: Option<String>,
}

impl PaginationParams {
    /// Requested page; 0 when missing or unparsable.
    pub fn page(&self) -> i64 {
        lenient(self.page.as_deref())
    }

    /// Requested page size; 0 when missing or unparsable.
    pub fn limit(&self) -> i64 {
        lenient(self.limit.as_deref())
    }
}

fn lenient(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

const MAX_OFFSET: u64 = i64::MAX as u64;

/// A page request with bounds already enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Clamp arbitrary input: `page < 1` becomes 1, a `limit` outside
    /// `1..=MAX_PAGE_SIZE` becomes the default page size.
    pub fn clamped(page: i64, limit: i64) -> Self {
        let page = u64::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PAGE_NUMBER);
        let limit = u64::try_from(limit)
            .ok()
            .filter(|l| (1..=MAX_PAGE_SIZE).contains(l))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { page, limit }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Calculate offset for database query.
    ///
    /// Capped at `i64::MAX`, the largest offset the SQL drivers bind.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).min(MAX_OFFSET)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}
