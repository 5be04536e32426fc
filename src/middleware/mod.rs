pub mod auth;
pub mod request_metrics;
pub mod response;

pub use auth::{require_auth, AuthUser};
pub use request_metrics::track_metrics;
pub use response::{ApiResponse, ApiResult, MessageResponse};
