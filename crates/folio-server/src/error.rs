//! Error types for the portfolio server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_core::FolioError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Portfolio(#[from] FolioError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Portfolio(FolioError::AuthenticationRequired) => {
                (StatusCode::UNAUTHORIZED, "Please sign in").into_response()
            }
            AppError::Portfolio(FolioError::NotFound(id)) => {
                (StatusCode::NOT_FOUND, format!("Artefact {} not found", id)).into_response()
            }
            AppError::Portfolio(e @ (FolioError::InvalidUnit(_) | FolioError::NoUnitSelected)) => {
                (StatusCode::BAD_REQUEST, e.to_string()).into_response()
            }
            AppError::Portfolio(e) => {
                tracing::error!("Storage error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
