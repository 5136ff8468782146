use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// The scoring artifact does not exist at the configured path.
    ModelNotFound(String),
    /// The scoring artifact exists but could not be deserialized or is
    /// internally inconsistent.
    ModelLoadError(String),
    /// The model rejected the record (schema/column mismatch).
    PredictionError(String),
    /// Bad request error (invalid input).
    BadRequest(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ModelNotFound(msg) => write!(f, "Model not found: {}", msg),
            AppError::ModelLoadError(msg) => write!(f, "Model load error: {}", msg),
            AppError::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each error variant to an appropriate HTTP status code and JSON body.
    /// Logs errors appropriately based on their severity.
    fn into_response(self) -> Response {
        let (status, error_message, guidance) = match &self {
            AppError::ModelNotFound(msg) => {
                tracing::error!("Model not found: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    format!("Model artifact not found: {}", msg),
                    Some("Train and export the scoring artifact before starting the service."),
                )
            }
            AppError::ModelLoadError(msg) => {
                tracing::error!("Model load error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    format!("Model artifact could not be loaded: {}", msg),
                    Some("Re-export the scoring artifact; the current file is unreadable."),
                )
            }
            AppError::PredictionError(msg) => {
                tracing::warn!("Prediction rejected: {}", msg);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("Prediction failed: {}", msg),
                    None,
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::WithContext { source, context } => {
                // Log full context chain for debugging
                tracing::error!("Error with context: {} -> {}", context, source);
                // Delegate to underlying error's response
                return source.clone().into_response();
            }
        };

        let body = match guidance {
            Some(hint) => Json(json!({
                "error": error_message,
                "hint": hint,
            })),
            None => Json(json!({
                "error": error_message,
            })),
        };

        (status, body).into_response()
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    #[allow(dead_code)]
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}
