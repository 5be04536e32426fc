// Token acquisition endpoints. No authentication.
pub mod auth;
pub mod system;
