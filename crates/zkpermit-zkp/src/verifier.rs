//! # Verifier Set
//!
//! One verifier per proof system, selected by the entry point the caller
//! invokes or by the proof's variant tag. Construction checks that each
//! slot holds a verifier for the right system.

use std::sync::Arc;

use zkpermit_core::FieldElement;

use crate::policy::{PolicyError, ProofPolicy};
use crate::proof::Proof;
use crate::traits::{ProofSystem, ProofVerifier, VerifyError};

/// The Groth16 and PLONK verifiers of one deployment.
#[derive(Clone)]
pub struct VerifierSet {
    groth16: Arc<dyn ProofVerifier>,
    plonk: Arc<dyn ProofVerifier>,
}

impl VerifierSet {
    /// Pair two verifiers. Each must check the system of its slot.
    pub fn new(
        groth16: Arc<dyn ProofVerifier>,
        plonk: Arc<dyn ProofVerifier>,
    ) -> Result<Self, VerifyError> {
        for (expected, verifier) in [(ProofSystem::Groth16, &groth16), (ProofSystem::Plonk, &plonk)] {
            if verifier.system() != expected {
                return Err(VerifyError::WrongSystem {
                    expected,
                    actual: verifier.system(),
                });
            }
        }
        Ok(Self { groth16, plonk })
    }

    /// The verifier for `system`.
    pub fn get(&self, system: ProofSystem) -> &dyn ProofVerifier {
        match system {
            ProofSystem::Groth16 => self.groth16.as_ref(),
            ProofSystem::Plonk => self.plonk.as_ref(),
        }
    }

    /// Check both backends against `policy`.
    pub fn validate_policy(&self, policy: &ProofPolicy) -> Result<(), PolicyError> {
        policy.validate(self.groth16.backend())?;
        policy.validate(self.plonk.backend())
    }

    /// Check that every verifier that knows its arity expects `count`
    /// public signals.
    pub fn ensure_arity(&self, count: usize) -> Result<(), VerifyError> {
        for verifier in [&self.groth16, &self.plonk] {
            if let Some(expected) = verifier.public_input_count() {
                if expected != count {
                    return Err(VerifyError::Arity {
                        expected,
                        actual: count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Groth16 entry point. A PLONK proof returns `false`.
    pub fn verify_groth16(&self, proof: &Proof, signals: &[FieldElement]) -> Result<bool, VerifyError> {
        self.groth16.verify(proof, signals)
    }

    /// PLONK entry point. A Groth16 proof returns `false`.
    pub fn verify_plonk(&self, proof: &Proof, signals: &[FieldElement]) -> Result<bool, VerifyError> {
        self.plonk.verify(proof, signals)
    }

    /// Dispatch on the proof's variant tag.
    pub fn verify(&self, proof: &Proof, signals: &[FieldElement]) -> Result<bool, VerifyError> {
        self.get(proof.system()).verify(proof, signals)
    }
}

impl std::fmt::Debug for VerifierSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifierSet")
            .field("groth16", &self.groth16.backend())
            .field("plonk", &self.plonk.backend())
            .finish()
    }
}
