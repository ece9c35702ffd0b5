pub mod academic;
pub mod announcements;
pub mod common;
pub mod evaluations;
pub mod events;
pub mod grades;
pub mod permissions;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo, PaginationQuery};
