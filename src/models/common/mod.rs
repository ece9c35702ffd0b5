pub mod error_code;
pub mod filter;
pub mod pagination;
pub mod response;

pub use error_code::ErrorCode;
pub use filter::{ListFilter, apply_filter};
pub use pagination::{
    PaginatedResponse, PaginationInfo, PaginationQuery, normalize_page, paginate_slice,
};
pub use response::ApiResponse;
