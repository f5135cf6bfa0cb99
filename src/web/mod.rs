pub mod routes;
pub mod server;
pub mod viewer;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::TrackerError;

/// HTTP-facing wrapper around the crate error.
pub struct ApiError(pub TrackerError);

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TrackerError::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
            TrackerError::UnknownBet(_) | TrackerError::UnknownUser(_) => StatusCode::NOT_FOUND,
            TrackerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
