use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{info, warn};

/// Failure reported by the upstream account service.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    /// Upstream answered but flagged the call as failed (`X-error_message`).
    #[error("upstream rejected {operation}: {message}")]
    Signaled { operation: &'static str, message: String },
    #[error("upstream {operation} failed with HTTP status {status}")]
    Status { operation: &'static str, status: StatusCode },
}

/// Errors surfaced by the service, mapped onto HTTP responses at the request boundary.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("startup configuration error: {0}")]
    StartupConfiguration(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::FORBIDDEN,
            ServiceError::Upstream(_) | ServiceError::StartupConfiguration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Label used for the request outcome metric.
    pub fn outcome(&self) -> &'static str {
        match self {
            ServiceError::InvalidInput(_) => "invalid_input",
            ServiceError::Unauthorized(_) => "unauthorized",
            ServiceError::Upstream(_) => "upstream_error",
            ServiceError::StartupConfiguration(_) => "configuration_error",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        match status.is_server_error() {
            true => warn!("responding {}: {}", status.as_u16(), message),
            false => info!("responding {}: {}", status.as_u16(), message),
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
