//! Maps core parse errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hn_core::{ErrorKind, ErrorPayload, ParseError};

/// Error returned by handlers; renders the core's [`ErrorPayload`] as JSON.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub payload: ErrorPayload,
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::UnsupportedVersion | ErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
        ErrorKind::VersionMismatch => StatusCode::CONFLICT,
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        Self {
            status: status_for(err.kind()),
            payload: err.payload(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.payload)).into_response()
    }
}
