//! # Prover Port
//!
//! Off-chain proof generation is a long-running job with no shared state
//! with the ledger. The only contract between them is the proof and the
//! public signals, so provers sit behind an async trait and adapters may
//! shell out to external toolchains or prove in-process.

use zkpermit_core::PermitRequest;

use crate::circuit::PermitWitness;
use crate::proof::Proof;
use crate::signals::PublicSignals;
use crate::traits::{ProofError, ProofSystem};

/// A proof together with the request it authorizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvedPermit {
    /// The proof.
    pub proof: Proof,
    /// The public signals the proof was generated for.
    pub public_signals: PublicSignals,
    /// The request to submit alongside the proof.
    pub request: PermitRequest,
}

/// Generates permit proofs for one proof system.
pub trait Prover: Send + Sync {
    /// The proof system this prover targets.
    fn system(&self) -> ProofSystem;

    /// Prove knowledge of the witness' secret for its transfer request.
    ///
    /// The returned public signals must equal `witness.public_signals()`.
    fn prove(
        &self,
        witness: &PermitWitness,
    ) -> impl core::future::Future<Output = Result<ProvedPermit, ProofError>>;
}
