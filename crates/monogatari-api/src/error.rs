//! Monogatari — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use monogatari_core::error::EngineError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `EngineError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            EngineError::InvalidSignal(_) => (StatusCode::CONFLICT, "invalid_signal"),
            EngineError::InvalidSlot(_) => (StatusCode::BAD_REQUEST, "invalid_slot"),
            EngineError::InvalidImport(_) => (StatusCode::BAD_REQUEST, "invalid_import"),
            EngineError::EmptySlot(_) => (StatusCode::NOT_FOUND, "empty_slot"),
            EngineError::CorruptSave { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "corrupt_save"),
            EngineError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            EngineError::ChapterLoad { .. }
            | EngineError::UnresolvedSceneTarget { .. }
            | EngineError::MalformedCondition(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "engine_error")
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: EngineError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_invalid_signal_maps_to_409() {
        assert_eq!(
            status_of(EngineError::InvalidSignal("choose while awaiting_advance".into())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_invalid_slot_maps_to_400() {
        assert_eq!(status_of(EngineError::InvalidSlot(21)), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_import_maps_to_400() {
        assert_eq!(
            status_of(EngineError::InvalidImport("expected an object".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_empty_slot_maps_to_404() {
        assert_eq!(status_of(EngineError::EmptySlot(3)), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_corrupt_save_maps_to_422() {
        assert_eq!(
            status_of(EngineError::CorruptSave {
                slot: 4,
                reason: "expected value at line 1".into(),
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_storage_maps_to_500() {
        assert_eq!(
            status_of(EngineError::Storage("disk full".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
