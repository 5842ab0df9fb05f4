//! # Error Types
//!
//! Errors raised while constructing permit domain values. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.

use alloy_primitives::U256;
use thiserror::Error;

use crate::field::FieldError;

/// Top-level error type for `zkpermit-core`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A value could not be represented as a field element.
    #[error("field error: {0}")]
    Field(#[from] FieldError),

    /// A transfer value exceeds the protocol maximum of `2^128 - 1`.
    #[error("transfer value {0} exceeds the permit maximum")]
    ValueTooHigh(U256),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_converts() {
        let err: CoreError = FieldError::StringTooLong(40).into();
        assert!(format!("{err}").contains("40 bytes"));
    }

    #[test]
    fn value_too_high_display() {
        let err = CoreError::ValueTooHigh(U256::MAX);
        assert!(format!("{err}").contains("permit maximum"));
    }
}
