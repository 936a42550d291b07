use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use utils::response::ApiResponse;

/// Error taxonomy for the HTTP boundary. Validation and not-found are the
/// only client-visible failure modes; everything else collapses to a
/// generic 500 with the detail kept in server logs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        details: BTreeMap<String, String>,
    },
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn invalid_body(details: BTreeMap<String, String>) -> Self {
        ApiError::Validation {
            message: "Invalid input data".to_string(),
            details,
        }
    }

    pub fn invalid_query(details: BTreeMap<String, String>) -> Self {
        ApiError::Validation {
            message: "Invalid query parameters".to_string(),
            details,
        }
    }

    pub fn invalid_json() -> Self {
        ApiError::Validation {
            message: "Invalid JSON in request body".to_string(),
            details: BTreeMap::new(),
        }
    }

    pub fn todo_not_found() -> Self {
        ApiError::NotFound("Todo not found".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, code) = match &self {
            ApiError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Database(_) | ApiError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error = %self,
                "API request failed"
            );
        }

        let (message, details) = match self {
            ApiError::Validation { message, details } => (message, details),
            ApiError::NotFound(message) => (message, BTreeMap::new()),
            ApiError::Database(_) | ApiError::Io(_) => {
                ("An unexpected error occurred".to_string(), BTreeMap::new())
            }
        };

        (status_code, Json(ApiResponse::error(code, message, details))).into_response()
    }
}
