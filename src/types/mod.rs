//! Shared types for DRY compliance.

mod pagination;
mod response;

pub use pagination::{Paginated, Pagination, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;
