//! Unified error handling for underbar.
//!
//! Every fallible operation in the crate returns [`Result`]. Errors raised by
//! caller-supplied functions travel through the toolkit untouched, so a
//! callback that fails with [`Error::Callback`] surfaces to the direct caller
//! exactly as it was produced.


use thiserror::Error as ThisError;

/// Result alias used throughout the toolkit.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A unified error type for every toolkit operation.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    /// The input has the wrong shape for the requested operation
    /// (e.g. iterating a scalar, binary searching a dictionary).
    #[error("InvalidInput: {message}")]
    InvalidInput { message: String },

    /// `reduce` was asked to fold zero pairs without a seed.
    #[error("EmptyReduction: reduce of empty collection with no initial value")]
    EmptyReduction,

    /// Failure raised by a caller-supplied function.
    #[error("CallbackError: {message}")]
    Callback { message: String },
}

impl Error {
    /// Create a new invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new callback error. Intended for use inside [`crate::Function`] bodies.
    pub fn callback(message: impl Into<String>) -> Self {
        Error::Callback {
            message: message.into(),
        }
    }

    /// Get a short error kind description (e.g., "InvalidInput").
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput { .. } => "InvalidInput",
            Error::EmptyReduction => "EmptyReduction",
            Error::Callback { .. } => "CallbackError",
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            Error::InvalidInput { message } => message,
            Error::EmptyReduction => "reduce of empty collection with no initial value",
            Error::Callback { message } => message,
        }
    }
}
