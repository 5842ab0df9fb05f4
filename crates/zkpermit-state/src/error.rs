//! # Permit Error Types
//!
//! The five protocol errors carry the messages a token ledger reverts
//! with. The remaining variants are infrastructure failures that never
//! occur for a well-formed deployment.
//!
//! Every error aborts the transition with no state change.

use thiserror::Error;
use zkpermit_core::Address;
use zkpermit_crypto::CryptoError;
use zkpermit_zkp::{PolicyError, VerifyError};

/// Errors from the permit state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermitError {
    /// The current time is past the request deadline.
    #[error("Permit expired")]
    PermitExpired,

    /// The deadline is not a field element.
    #[error("Deadline too high")]
    DeadlineTooHigh,

    /// The value exceeds the maximum permit value.
    #[error("Value too high")]
    ValueTooHigh,

    /// The claimed compound hash is not a field element.
    #[error("CompoundHash too high")]
    CompoundHashTooHigh,

    /// The proof does not verify, or the request does not match the
    /// recomputed hash chain (including replay).
    #[error("Proof is invalid")]
    ProofInvalid,

    /// The zero address cannot hold a registration or allowance.
    #[error("invalid account: {0}")]
    InvalidAccount(Address),

    /// The account nonce cannot advance further.
    #[error("nonce exhausted for {0}")]
    NonceExhausted(Address),

    /// A verifier backend failed to run or was misconfigured.
    #[error("verifier error: {0}")]
    Verifier(#[from] VerifyError),

    /// The hash chain could not be computed.
    #[error("hashing error: {0}")]
    Hashing(#[from] CryptoError),

    /// The verifier backends are not allowed under the proof policy.
    #[error("proof policy: {0}")]
    Policy(#[from] PolicyError),
}
