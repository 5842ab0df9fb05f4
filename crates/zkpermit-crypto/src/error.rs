//! # Cryptographic Error Types
//!
//! Structured errors for hashing and commitment computation.

use thiserror::Error;

/// Errors from cryptographic operations in `zkpermit-crypto`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The hasher does not support this many inputs.
    #[error("unsupported Poseidon arity: {0} inputs")]
    UnsupportedArity(usize),

    /// The underlying Poseidon sponge rejected its parameters or inputs.
    #[error("Poseidon error: {0}")]
    Poseidon(String),
}
