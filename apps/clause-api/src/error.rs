//! Error types for the clause API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared_types::Clause;
use thiserror::Error;

use crate::extract::ExtractError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Contract not found: {0}")]
    ContractNotFound(String),

    #[error("Clause not found: {0}")]
    ClauseNotFound(String),

    /// Segmentation found no usable content; carries the sentinel clause
    #[error("{}", .0.text)]
    NoContent(Clause),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    clauses: Option<Vec<Clause>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, code) = match &self {
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ApiError::ContractNotFound(_) => (StatusCode::NOT_FOUND, "CONTRACT_NOT_FOUND"),
            ApiError::ClauseNotFound(_) => (StatusCode::NOT_FOUND, "CLAUSE_NOT_FOUND"),
            ApiError::NoContent(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_CONTENT"),
            ApiError::Extract(ExtractError::Empty) => (StatusCode::BAD_REQUEST, "EMPTY_DOCUMENT"),
            ApiError::Extract(ExtractError::UnsupportedFormat(_)) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
            }
            ApiError::Store(StoreError::UnknownContract(_)) => {
                (StatusCode::NOT_FOUND, "CONTRACT_NOT_FOUND")
            }
        };

        let clauses = match self {
            ApiError::NoContent(sentinel) => Some(vec![sentinel]),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code,
            clauses,
        };

        (status, Json(body)).into_response()
    }
}
