//! Conversion error types
//!
//! Every conversion either produces a value satisfying its target's
//! invariants or fails with one of the tagged errors below. Failures are
//! terminal for the single conversion that raised them.

use thiserror::Error;

/// Conversion error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdlError {
    /// Integer outside the enforced range, or a non-finite value under
    /// range enforcement
    #[error("RangeError: {0}")]
    RangeError(String),

    /// Restricted float/double given NaN or infinity, a non-object where an
    /// object is required, or a value outside a declared enumeration
    #[error("ConversionError: {0}")]
    ConversionError(String),
}

impl IdlError {
    /// Create a range error
    pub fn range_error<S: Into<String>>(msg: S) -> Self {
        IdlError::RangeError(msg.into())
    }

    /// Create a conversion error
    pub fn conversion_error<S: Into<String>>(msg: S) -> Self {
        IdlError::ConversionError(msg.into())
    }

    /// Whether this is a range error
    pub fn is_range_error(&self) -> bool {
        matches!(self, IdlError::RangeError(_))
    }

    /// The message without the error tag
    pub fn message(&self) -> &str {
        match self {
            IdlError::RangeError(msg) | IdlError::ConversionError(msg) => msg,
        }
    }
}

/// Result type alias for conversions
pub type IdlResult<T> = Result<T, IdlError>;
