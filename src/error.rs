//! Error types for the gateway.
//!
//! Configuration problems and upstream failures are request-scoped: they turn
//! into HTTP responses and never take the process down. Upstream non-success
//! statuses are not errors here at all; they are relayed to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::client::ClientError;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No browser-facing backend URL is configured.
    #[error("public API URL is not configured")]
    MissingPublicUrl,

    /// No backend URL of any kind is configured.
    #[error("no backend URL is configured")]
    MissingBackendUrl,

    /// Layered configuration could not be loaded.
    #[error(transparent)]
    Load(#[from] config::ConfigError),
}

/// Errors surfaced by gateway route handlers.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The gateway cannot serve the request as configured.
    #[error("server misconfigured: {0}")]
    Misconfigured(#[from] ConfigError),

    /// The backend could not be reached or the relay failed.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Backend {
        status: StatusCode,
        message: String,
    },

    /// The request itself is malformed.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<ClientError> for GatewayError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Config(e) => Self::Misconfigured(e),
            ClientError::Http(e) => Self::Upstream(e),
            ClientError::Api { status, message } => Self::Backend {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            },
        }
    }
}

impl GatewayError {
    /// HTTP status this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Misconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Backend { status, .. } => *status,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Misconfigured(e) => {
                tracing::error!(name: "gateway.misconfigured", error = %e, "Rejecting request");
            }
            Self::Upstream(e) => {
                tracing::error!(name: "proxy.upstream.failed", error = %e, "Upstream request failed");
            }
            Self::Backend { status, .. } => {
                tracing::warn!(name: "gateway.backend.rejected", status = %status, "Backend rejected request");
            }
            Self::BadRequest(msg) => {
                tracing::debug!(name: "gateway.bad_request", reason = %msg, "Bad request");
            }
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
