//! Error types for core primitives.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unknown contract parameter type: {0}")]
    UnknownParameterType(String),
}

impl CoreError {
    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
