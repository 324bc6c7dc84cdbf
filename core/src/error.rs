use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Stage not found: {stage}")]
    StageNotFound { stage: String },

    #[error("Handler missing for non-optional stage: {stage}")]
    HandlerMissing { stage: String },

    #[error("Error in user-provided handler or external operation. Source: {source}")]
    HandlerError {
        #[source]
        source: AnyhowError,
    },

    #[error("Configuration error for stage '{stage}': {message}")]
    Configuration { stage: String, message: String },

    #[error("Internal flow engine error: {0}")]
    Internal(String),
}

// The conversion trellis provides for opaque external errors: anything an
// anyhow-using handler bubbles up becomes a HandlerError.
impl From<AnyhowError> for FlowError {
    fn from(err: AnyhowError) -> Self {
        FlowError::HandlerError { source: err }
    }
}

pub type FlowResult<T, E = FlowError> = std::result::Result<T, E>;
