//! HTTP request handlers for the larder API.
//!
//! Handlers follow a consistent pattern: validate before touching the
//! database, delegate to the storage layer, translate every `CoreError`
//! into its status code with a structured JSON body, and trace each branch.
//!
//! # Handler Organization
//!
//! - `health` - pool availability probe
//! - `ingredients` - list, create, and partial update

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use larder_core::CoreError;
use serde::Serialize;

pub mod health;
pub mod ingredients;

pub use health::health_check;
pub use ingredients::{create_ingredient, list_ingredients, update_ingredient};

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details.
    pub error: ErrorDetail,
}

/// Detailed error information.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Human-readable error description.
    pub message: String,
}

/// Maps a domain failure to its HTTP status and structured body.
///
/// ConnectionUnavailable → 503, InvalidRequest → 400, NotFound → 404,
/// Database → 500.
pub(crate) fn error_response(err: &CoreError) -> Response {
    let status = match err {
        CoreError::ConnectionUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CoreError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(ErrorResponse { error: ErrorDetail { message: err.to_string() } }))
        .into_response()
}
