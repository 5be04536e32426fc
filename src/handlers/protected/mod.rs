// Endpoints behind the auth gate. Handlers receive `Extension<AuthUser>`.
pub mod auth;
pub mod notes;
