//! Error types for the model-serving adapter.
//!
//! Every failure is surfaced to the caller as a [`ServingError`]; nothing is
//! retried internally. The variants follow the life of a request:
//!
//! - **Load**: the export directory or the runtime session could not be opened
//! - **Extraction**: the feature extractor rejected the input or its settings
//! - **Packing**: the feature vector does not match the declared layout
//! - **Serialization**: the feature record could not be encoded
//! - **Execution**: the runtime failed to run the graph or a binding is missing
//! - **Closed**: the model handle has already been released

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for adapter operations.
#[derive(Error, Debug)]
pub enum ServingError {
    #[error("Failed to load model from {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("Feature extraction failed: {0}")]
    Extraction(String),

    #[error("Feature vector has {actual} values, layout expects {expected}")]
    FeatureArity { expected: usize, actual: usize },

    #[error("Invalid feature layout: {0}")]
    InvalidLayout(String),

    #[error("Failed to serialize feature record: {0}")]
    Serialization(#[from] prost::EncodeError),

    #[error("Model execution failed: {0}")]
    Execution(String),

    #[error("Model handle is closed")]
    Closed,
}

impl ServingError {
    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn extraction(reason: impl ToString) -> Self {
        Self::Extraction(reason.to_string())
    }

    pub fn execution(reason: impl ToString) -> Self {
        Self::Execution(reason.to_string())
    }

    /// True when the error was caused by using a released handle.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, ServingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ServingError::load("/models/iris", "saved_model.pb not found");
        assert_eq!(
            err.to_string(),
            "Failed to load model from /models/iris: saved_model.pb not found"
        );

        let err = ServingError::FeatureArity {
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Feature vector has 3 values, layout expects 4"
        );
    }

    #[test]
    fn test_is_closed() {
        assert!(ServingError::Closed.is_closed());
        assert!(!ServingError::execution("boom").is_closed());
    }
}
