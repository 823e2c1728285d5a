//! HTTP error responses.
//!
//! Every failure leaves the server as `{"error": "<message>"}`. Client errors
//! carry their own message; anything else is logged and answered with a
//! generic 500 so upstream details never reach the caller.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tipcheck_client::UpstreamError;
use tipcheck_core::Error;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiErrorBody { error: self.message })).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Unauthorized => ApiError::unauthorized(),
            Error::BadRequest(message) => ApiError::bad_request(message),
            Error::NotFound(detail) => {
                tracing::debug!(detail = %detail, "responding not found");
                ApiError::new(StatusCode::NOT_FOUND, "Cast not found")
            }
            other => {
                tracing::error!(error = %other, "request failed");
                ApiError::internal()
            }
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        tracing::error!(error = %err, "upstream request failed");
        ApiError::internal()
    }
}
