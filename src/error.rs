//! Service error taxonomy and HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("product {0} not found or inactive")]
    InvalidProduct(Uuid),

    #[error("insufficient stock for product {0}")]
    InsufficientStock(Uuid),

    #[error("order cannot be cancelled in its current status")]
    InvalidTransition,

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("authentication required")]
    Unauthorized,

    #[error("access denied")]
    Forbidden,

    #[error("storage error")]
    Storage(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidProduct(_)
            | Self::InsufficientStock(_)
            | Self::InvalidTransition
            | Self::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Internal detail stays in the logs, never in the response body.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "Server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
