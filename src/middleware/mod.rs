pub mod auth;
pub mod response;

pub use auth::{bearer_auth, AuthUser};
pub use response::{ApiResponse, ApiResult};
