//! HTTP error mapping for the copyscan API.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use copyscan_shared::CopyscanError;

/// Message returned for faults whose detail stays in the logs.
const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request";

/// Maps [`CopyscanError`] onto HTTP responses with a JSON `error` body.
///
/// Input errors echo their message at 400, upstream annotation failures
/// surface at 502, and everything else is logged and reported as a
/// generic 500.
#[derive(Debug)]
pub(crate) struct ApiError(CopyscanError);

impl From<CopyscanError> for ApiError {
    fn from(err: CopyscanError) -> Self {
        Self(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self(CopyscanError::validation(format!(
            "invalid multipart request: {err}"
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            CopyscanError::Validation { message } => (StatusCode::BAD_REQUEST, message),
            err @ CopyscanError::UnsupportedFormat { .. } => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            CopyscanError::Extraction { message } => (StatusCode::BAD_REQUEST, message),
            CopyscanError::UpstreamApi { message, .. } => (StatusCode::BAD_GATEWAY, message),
            err => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
