//! Shared types used across layers.

mod pagination;
mod response;

pub use pagination::{PageRequest, PaginationParams};
pub use response::{Created, NoContent};
