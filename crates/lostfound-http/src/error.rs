//! Mapping of domain errors onto HTTP responses.

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use lostfound_core::error::MediaError;
use lostfound_core::{Error, MAX_IMAGE_BYTES};

use crate::MAX_BODY_SIZE;

/// Construct a JSON error response with the given status code and message.
pub(crate) fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Error returned by request handlers.
#[derive(Debug)]
pub enum ApiError {
    /// A failure from the record or media store.
    Domain(Error),
    /// The multipart body could not be read.
    Multipart(MultipartError),
    /// The request was not a multipart form.
    NotMultipart(MultipartRejection),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Domain(err)
    }
}

impl From<MultipartError> for ApiError {
    /// A body cut off at the request limit can only be an oversized image,
    /// so it is reported the same way as one caught by the media check.
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::Domain(
                MediaError::TooLarge {
                    size: MAX_BODY_SIZE,
                    limit: MAX_IMAGE_BYTES,
                }
                .into(),
            );
        }
        ApiError::Multipart(err)
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::NotMultipart(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Domain(Error::Validation(e)) => {
                json_error(StatusCode::BAD_REQUEST, &e.to_string())
            }
            ApiError::Domain(Error::Media(e)) => json_error(StatusCode::BAD_REQUEST, &e.to_string()),
            ApiError::Domain(Error::NotFound { .. }) => {
                json_error(StatusCode::NOT_FOUND, "Item not found")
            }
            ApiError::Domain(Error::Storage(e)) => {
                error!(error = %e, "Storage failure");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            ApiError::Multipart(e) => json_error(e.status(), &e.body_text()),
            ApiError::NotMultipart(rejection) => {
                json_error(rejection.status(), &rejection.body_text())
            }
        }
    }
}
