// src/api/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::ErrorStatusMode;
use crate::generator::GeneratorError;

/// Error body returned by `POST /api/py/generateERC7730`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorMessage {
    pub message: String,
}

/// Failures surfaced by the HTTP handlers. The `Display` text is the message
/// sent to the client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Upstream(String),
}

impl From<GeneratorError> for ApiError {
    fn from(err: GeneratorError) -> Self {
        if err.is_invalid_input() {
            ApiError::InvalidInput(err.to_string())
        } else {
            ApiError::Upstream(err.to_string())
        }
    }
}

impl ApiError {
    pub fn status_code(&self, mode: ErrorStatusMode) -> StatusCode {
        match mode {
            ErrorStatusMode::Compat => StatusCode::NOT_FOUND,
            ErrorStatusMode::Typed => match self {
                ApiError::NotFound(_) => StatusCode::NOT_FOUND,
                ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }

    /// `{"message": ...}` with the status chosen by `mode`.
    pub fn into_response_with(self, mode: ErrorStatusMode) -> Response {
        let status = self.status_code(mode);
        let body = ErrorMessage {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
