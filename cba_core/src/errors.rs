//! # Error Types
//!
//! Structured error types for cba_core. Every failure of the analysis
//! pipeline is terminal for the call that produced it: the input has to be
//! corrected and the beam rebuilt, nothing is retried.
//!
//! | Variant             | Raised by                         |
//! |---------------------|-----------------------------------|
//! | `InvalidLoad`       | construction (load validation)    |
//! | `DimensionMismatch` | construction, envelopes           |
//! | `InvalidInput`      | construction, options, JSON input |
//! | `SingularSystem`    | assembly / solve                  |
//! | `NonFiniteResult`   | solve                             |
//!
//! ## Example
//!
//! ```rust
//! use cba_core::errors::{CbaError, CbaResult};
//!
//! fn validate_span(length: f64) -> CbaResult<()> {
//!     if !(length >= 0.0) {
//!         return Err(CbaError::invalid_input(
//!             "spans",
//!             length.to_string(),
//!             "Span length must be a non-negative number",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_span(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for cba_core operations
pub type CbaResult<T> = Result<T, CbaError>;

/// Structured error type for beam analysis operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CbaError {
    /// A load entry is malformed (bad span index, position, or magnitude)
    #[error("Invalid load #{index}: {reason}")]
    InvalidLoad { index: usize, reason: String },

    /// A per-span or per-DOF list has the wrong length
    #[error("Dimension mismatch for '{field}': expected {expected}, got {actual}")]
    DimensionMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// An input value is invalid (out of range, not a number, unknown code)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The stiffness system has no unique solution
    #[error("Singular stiffness system: {reason}")]
    SingularSystem { reason: String },

    /// The solve produced NaN or infinite values
    #[error("Non-finite result in {quantity}")]
    NonFiniteResult { quantity: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CbaError {
    /// Create an InvalidLoad error
    pub fn invalid_load(index: usize, reason: impl Into<String>) -> Self {
        CbaError::InvalidLoad {
            index,
            reason: reason.into(),
        }
    }

    /// Create a DimensionMismatch error
    pub fn dimension_mismatch(field: impl Into<String>, expected: usize, actual: usize) -> Self {
        CbaError::DimensionMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CbaError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a SingularSystem error
    pub fn singular(reason: impl Into<String>) -> Self {
        CbaError::SingularSystem {
            reason: reason.into(),
        }
    }

    /// Create a NonFiniteResult error
    pub fn non_finite(quantity: impl Into<String>) -> Self {
        CbaError::NonFiniteResult {
            quantity: quantity.into(),
        }
    }

    /// Analysis errors always indicate bad input, so none of them are worth retrying.
    pub fn is_recoverable(&self) -> bool {
        false
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CbaError::InvalidLoad { .. } => "INVALID_LOAD",
            CbaError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            CbaError::InvalidInput { .. } => "INVALID_INPUT",
            CbaError::SingularSystem { .. } => "SINGULAR_SYSTEM",
            CbaError::NonFiniteResult { .. } => "NON_FINITE_RESULT",
            CbaError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CbaError {
    fn from(err: serde_json::Error) -> Self {
        CbaError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CbaError::invalid_load(3, "span index 0 is out of range 1..=2");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidLoad\""));
        let roundtrip: CbaError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CbaError::dimension_mismatch("restraints", 6, 4).error_code(),
            "DIMENSION_MISMATCH"
        );
        assert_eq!(CbaError::singular("free floating").error_code(), "SINGULAR_SYSTEM");
        assert_eq!(CbaError::non_finite("reactions").error_code(), "NON_FINITE_RESULT");
        assert!(!CbaError::singular("x").is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        let err = CbaError::dimension_mismatch("restraints", 6, 4);
        assert_eq!(
            err.to_string(),
            "Dimension mismatch for 'restraints': expected 6, got 4"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse: Result<f64, _> = serde_json::from_str("not json");
        let err: CbaError = parse.unwrap_err().into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
