//! # Proof Backend Policy
//!
//! Decides whether a verifier backend may back a permit ledger.
//!
//! ## Problem
//!
//! The mock backend "proves" by hashing the public signals. Anyone can
//! produce a mock proof for any request without knowing the user secret.
//! A ledger wired to a mock verifier grants allowances to whoever asks.
//!
//! ## Configuration
//!
//! The mode is determined by, in order:
//! 1. Explicit construction ([`ProofPolicy::production`],
//!    [`ProofPolicy::development`]).
//! 2. The `ZKPERMIT_PROOF_POLICY` environment variable
//!    (`production`/`prod` or `development`/`dev`).
//! 3. Build profile: release builds default to `Production`, debug builds
//!    to `Development`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the policy mode.
pub const POLICY_ENV_VAR: &str = "ZKPERMIT_PROOF_POLICY";

/// Errors from proof policy enforcement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Mock backend rejected in production mode.
    #[error("mock verifier rejected: production mode requires a real proof backend ({backend})")]
    MockProofRejected {
        /// The backend that was rejected.
        backend: String,
    },
}

/// The kind of backend behind a verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofBackend {
    /// Transparent SHA-256 digest. No soundness.
    Mock,
    /// Groth16 SNARK.
    Groth16,
    /// PLONK SNARK.
    Plonk,
}

impl ProofBackend {
    /// Whether this backend provides real cryptographic soundness.
    pub fn is_real(self) -> bool {
        matches!(self, ProofBackend::Groth16 | ProofBackend::Plonk)
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            ProofBackend::Mock => "mock-sha256",
            ProofBackend::Groth16 => "groth16",
            ProofBackend::Plonk => "plonk",
        }
    }
}

/// Proof policy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Reject mock backends unconditionally.
    Production,
    /// Accept mock backends (tests and local development only).
    Development,
}

impl PolicyMode {
    /// Parse the environment-variable spelling of a mode.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(PolicyMode::Production),
            "development" | "dev" => Some(PolicyMode::Development),
            _ => None,
        }
    }
}

/// Runtime proof policy.
///
/// ```rust
/// use zkpermit_zkp::policy::{ProofBackend, ProofPolicy};
///
/// let policy = ProofPolicy::production();
/// assert!(policy.validate(ProofBackend::Groth16).is_ok());
/// assert!(policy.validate(ProofBackend::Mock).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofPolicy {
    mode: PolicyMode,
}

impl ProofPolicy {
    /// Create a policy with the given mode.
    pub fn new(mode: PolicyMode) -> Self {
        Self { mode }
    }

    /// Production policy (rejects mock backends).
    pub fn production() -> Self {
        Self::new(PolicyMode::Production)
    }

    /// Development policy (accepts mock backends).
    pub fn development() -> Self {
        Self::new(PolicyMode::Development)
    }

    /// Policy from `ZKPERMIT_PROOF_POLICY`, falling back to the build
    /// profile default. Unrecognized values fall through.
    pub fn from_environment() -> Self {
        if let Some(mode) = std::env::var(POLICY_ENV_VAR)
            .ok()
            .as_deref()
            .and_then(PolicyMode::parse)
        {
            return Self::new(mode);
        }
        Self::build_default()
    }

    /// Release builds are production; debug builds are development.
    pub fn build_default() -> Self {
        if cfg!(not(debug_assertions)) {
            Self::production()
        } else {
            Self::development()
        }
    }

    /// Whether `backend` is acceptable under this policy.
    pub fn validate(&self, backend: ProofBackend) -> Result<(), PolicyError> {
        match self.mode {
            PolicyMode::Production if !backend.is_real() => Err(PolicyError::MockProofRejected {
                backend: backend.name().to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> PolicyMode {
        self.mode
    }
}

impl Default for ProofPolicy {
    fn default() -> Self {
        Self::from_environment()
    }
}
