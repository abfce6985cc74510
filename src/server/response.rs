use axum::Json;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::error;

use crate::error::StoreError;

/// Error returned by a request handler, rendered as `{"error": message}`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("key not found")]
    KeyNotFound,
    #[error("invalid request body")]
    InvalidBody,
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::KeyNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidBody | ApiError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::EmptyOrMissing) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::IndexOutOfRange)
            | ApiError::Store(StoreError::MalformedWindow { .. })
            | ApiError::Store(StoreError::InvalidArguments(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::LockPoisoned) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Decode a JSON request body regardless of its Content-Type header
pub fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::InvalidBody)
}
