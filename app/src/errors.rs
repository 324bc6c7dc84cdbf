use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use trellis::FlowError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Authentication Required: {0}")]
    Auth(String),

    #[error("Resource Not Found: {0}")]
    NotFound(String),

    /// An insert was rejected by the remote store — constraint violation or
    /// transport failure, not distinguished further.
    #[error("Store Write Error: {0}")]
    StoreWrite(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Database Error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Workflow Error: {source}")]
    Flow {
        #[from]
        source: FlowError,
    },

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

// Allow anyhow::Error to be converted into AppError::Internal so handlers
// can use `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        if err.is::<sqlx::Error>() {
            return AppError::Sqlx(err.downcast::<sqlx::Error>().expect("checked downcast"));
        }
        AppError::Internal(err.to_string())
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        // Log the full error when it is turned into a response; bodies stay
        // generic for server-side failures.
        tracing::error!(application_error = %self, "Responding with error");
        match self {
            AppError::Validation(m) => HttpResponse::BadRequest().json(json!({ "error": m })),
            AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({ "error": m })),
            AppError::NotFound(m) => HttpResponse::NotFound().json(json!({ "error": m })),
            AppError::StoreWrite(_) => HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to place order. Please try again." })),
            AppError::Config(m) => HttpResponse::InternalServerError()
                .json(json!({ "error": "Configuration issue", "detail": m })),
            AppError::Sqlx(_) => HttpResponse::InternalServerError()
                .json(json!({ "error": "Database operation failed" })),
            AppError::Flow { source } => {
                tracing::error!(flow_error_source = ?source, "Workflow error details");
                HttpResponse::InternalServerError()
                    .json(json!({ "error": "Workflow processing error" }))
            }
            AppError::Internal(_) => HttpResponse::InternalServerError()
                .json(json!({ "error": "An internal error occurred" })),
        }
    }
}

// Result type alias for the application.
pub type Result<T, E = AppError> = std::result::Result<T, E>;
