//! # Mock Proof Backend
//!
//! A deterministic, transparent stand-in for both proof systems, for tests
//! and local development.
//!
//! ```text
//! digest = SHA256("zkpermit-mock-v1" || system || signal_0 || ... || signal_n)
//! ```
//!
//! Signals are 32-byte big-endian. A mock Groth16 proof carries the digest
//! in `A.x` with every other coordinate zero; a mock PLONK proof is the raw
//! digest. Verification recomputes the digest.
//!
//! ## Security Warning
//!
//! **NO SOUNDNESS.** Anyone can compute a mock proof for any public
//! signals without knowing the user secret. The production
//! [`ProofPolicy`](crate::policy::ProofPolicy) refuses mock verifiers.

use sha2::{Digest, Sha256};
use zkpermit_core::{FieldElement, U256};

use crate::circuit::PermitWitness;
use crate::policy::ProofBackend;
use crate::proof::{G1Point, G2Point, Groth16Proof, PlonkProof, Proof};
use crate::prover::{ProvedPermit, Prover};
use crate::signals::PUBLIC_SIGNAL_COUNT;
use crate::traits::{ProofError, ProofSystem, ProofVerifier, VerifyError};

const MOCK_TAG: &[u8] = b"zkpermit-mock-v1";

fn digest(system: ProofSystem, signals: &[FieldElement]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(MOCK_TAG);
    hasher.update(system.name().as_bytes());
    for signal in signals {
        hasher.update(signal.to_be_bytes());
    }
    hasher.finalize().into()
}

/// The mock proof for `signals` under `system`.
pub fn mock_proof(system: ProofSystem, signals: &[FieldElement]) -> Proof {
    let d = digest(system, signals);
    match system {
        ProofSystem::Groth16 => Proof::Groth16(Groth16Proof {
            a: G1Point {
                x: U256::from_be_bytes(d),
                y: U256::ZERO,
            },
            b: G2Point {
                x: [U256::ZERO; 2],
                y: [U256::ZERO; 2],
            },
            c: G1Point {
                x: U256::ZERO,
                y: U256::ZERO,
            },
        }),
        ProofSystem::Plonk => Proof::Plonk(PlonkProof::new(d.to_vec())),
    }
}

/// Mock verifier for one proof system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockVerifier {
    system: ProofSystem,
}

impl MockVerifier {
    /// Mock verifier for `system`.
    pub fn new(system: ProofSystem) -> Self {
        Self { system }
    }
}

impl ProofVerifier for MockVerifier {
    fn system(&self) -> ProofSystem {
        self.system
    }

    fn backend(&self) -> ProofBackend {
        ProofBackend::Mock
    }

    fn public_input_count(&self) -> Option<usize> {
        Some(PUBLIC_SIGNAL_COUNT)
    }

    fn verify(&self, proof: &Proof, public_signals: &[FieldElement]) -> Result<bool, VerifyError> {
        self.check_arity(public_signals)?;
        if proof.system() != self.system {
            return Ok(false);
        }
        Ok(*proof == mock_proof(self.system, public_signals))
    }
}

/// Mock prover for one proof system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockProver {
    system: ProofSystem,
}

impl MockProver {
    /// Mock prover for `system`.
    pub fn new(system: ProofSystem) -> Self {
        Self { system }
    }

    /// Prove synchronously.
    pub fn prove_now(&self, witness: &PermitWitness) -> ProvedPermit {
        let public_signals = witness.public_signals();
        ProvedPermit {
            proof: mock_proof(self.system, &public_signals.to_vec(self.system)),
            public_signals,
            request: witness.permit_request(),
        }
    }
}

impl Prover for MockProver {
    fn system(&self) -> ProofSystem {
        self.system
    }

    async fn prove(&self, witness: &PermitWitness) -> Result<ProvedPermit, ProofError> {
        Ok(self.prove_now(witness))
    }
}
