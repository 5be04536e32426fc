use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Not authenticated - No token found")]
    NotAuthenticated,

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream returned a non-JSON body ({status}): {reason}")]
    UpstreamBody { status: StatusCode, reason: String },

    #[error("invalid upstream URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            ProxyError::InvalidId(_) | ProxyError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ProxyError::UpstreamBody { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::Upstream(_) | ProxyError::Url(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ProxyError::NotAuthenticated | ProxyError::InvalidId(_) | ProxyError::InvalidBody(_) => self.to_string(),
            ProxyError::UpstreamBody { .. } => {
                tracing::error!("Proxy failure: {}", self);
                "Invalid response from API".to_string()
            }
            ProxyError::Upstream(_) | ProxyError::Url(_) => {
                tracing::error!("Proxy failure: {}", self);
                "Internal server error".to_string()
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let err = ProxyError::InvalidId("../auth/delete".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid id: ../auth/delete");
        assert_eq!(ProxyError::NotAuthenticated.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn bad_upstream_body_is_bad_gateway() {
        let err = ProxyError::UpstreamBody {
            status: StatusCode::OK,
            reason: "expected value".into(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
