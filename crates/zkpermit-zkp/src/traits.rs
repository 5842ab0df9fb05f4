//! # Proof Verifier Trait
//!
//! Defines the one interface every proof backend implements:
//! `verify(proof, public_signals) -> bool`. The permit state machine is
//! generic over it and never touches pairing or polynomial-commitment
//! arithmetic directly.
//!
//! ## Security Invariant
//!
//! - `Ok(true)` iff the proof is a valid argument for exactly the given
//!   public signals under the verifier's key.
//! - A well-typed but bogus proof yields `Ok(false)`, never an error.
//! - A proof of the other system's variant yields `Ok(false)`.
//! - Wrong arity is a type error ([`VerifyError::Arity`]). Out-of-field
//!   signals cannot be expressed: signals are [`FieldElement`]s.
//!
//! Implementations require `Send + Sync` so one verifier can be shared by
//! concurrent readers.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zkpermit_core::FieldElement;

use crate::policy::ProofBackend;
use crate::proof::Proof;

/// The two supported non-interactive proof systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofSystem {
    /// Groth16 over BN254.
    Groth16,
    /// PLONK over BN254 (KZG).
    Plonk,
}

impl ProofSystem {
    /// Name as used by snarkjs subcommands.
    pub fn name(self) -> &'static str {
        match self {
            ProofSystem::Groth16 => "groth16",
            ProofSystem::Plonk => "plonk",
        }
    }
}

impl fmt::Display for ProofSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error during proof verification.
///
/// These are infrastructure or type errors. A proof that simply does not
/// verify is `Ok(false)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The public-signal vector has the wrong length for this key.
    #[error("public signal arity mismatch: expected {expected}, got {actual}")]
    Arity {
        /// Count the verifying key was built for.
        expected: usize,
        /// Count supplied.
        actual: usize,
    },

    /// A verifier was installed for the wrong proof system.
    #[error("verifier for {actual} installed where {expected} is required")]
    WrongSystem {
        /// System the slot requires.
        expected: ProofSystem,
        /// System the verifier checks.
        actual: ProofSystem,
    },

    /// The verifying key is unusable.
    #[error("malformed verifying key: {0}")]
    MalformedKey(String),

    /// The verifier backend could not run (missing binary, I/O failure).
    #[error("verifier backend failure: {0}")]
    Backend(String),
}

/// Error during off-chain proof generation.
#[derive(Error, Debug)]
pub enum ProofError {
    /// The witness is inconsistent or out of range.
    #[error("invalid witness: {0}")]
    InvalidWitness(String),

    /// The prover ran but did not produce a proof.
    #[error("proof generation failed: {0}")]
    GenerationFailed(String),

    /// The prover produced public signals other than the expected ones.
    #[error("prover output public signals differ from the witness")]
    SignalMismatch,

    /// Filesystem or process I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A verifier for one proof system.
pub trait ProofVerifier: Send + Sync {
    /// The proof system this verifier checks.
    fn system(&self) -> ProofSystem;

    /// The backend kind, for policy enforcement.
    fn backend(&self) -> ProofBackend;

    /// Number of public signals the key expects, if the verifier knows it.
    fn public_input_count(&self) -> Option<usize>;

    /// Verify `proof` against `public_signals`.
    fn verify(&self, proof: &Proof, public_signals: &[FieldElement]) -> Result<bool, VerifyError>;

    /// Arity guard shared by implementations.
    fn check_arity(&self, public_signals: &[FieldElement]) -> Result<(), VerifyError> {
        match self.public_input_count() {
            Some(expected) if expected != public_signals.len() => Err(VerifyError::Arity {
                expected,
                actual: public_signals.len(),
            }),
            _ => Ok(()),
        }
    }
}

impl<V: ProofVerifier + ?Sized> ProofVerifier for std::sync::Arc<V> {
    fn system(&self) -> ProofSystem {
        (**self).system()
    }

    fn backend(&self) -> ProofBackend {
        (**self).backend()
    }

    fn public_input_count(&self) -> Option<usize> {
        (**self).public_input_count()
    }

    fn verify(&self, proof: &Proof, public_signals: &[FieldElement]) -> Result<bool, VerifyError> {
        (**self).verify(proof, public_signals)
    }
}
