//! # zkpermit-zkp — Proof Layer
//!
//! Everything between a permit's hash chain and a yes/no from a proof
//! system.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): [`ProofVerifier`] is the single
//!   `verify(proof, public_signals) -> bool` contract both backends meet.
//! - **Proofs** (`proof.rs`): [`Proof`] is a tagged union of Groth16 curve
//!   points and an opaque PLONK blob.
//! - **Signals** (`signals.rs`): the fixed public-signal order per backend.
//! - **Groth16** (`groth16.rs`): native BN254 verifier via `ark-groth16`.
//! - **snarkjs** (`snarkjs/`): artifact formats, CLI verifier (both
//!   systems) and CLI prover.
//! - **Mock** (`mock.rs`): transparent SHA-256 backend for tests. No
//!   soundness.
//! - **Circuit / Prover** (`circuit.rs`, `prover.rs`): the off-chain witness
//!   and the async prover port.
//! - **Policy** (`policy.rs`): which backends a deployment may run.
//!
//! ## Crate Policy
//!
//! - Depends on `zkpermit-core` and `zkpermit-crypto` internally.
//! - Verifiers never panic on attacker-controlled proofs.

pub mod circuit;
pub mod groth16;
pub mod mock;
pub mod policy;
pub mod proof;
pub mod prover;
pub mod signals;
pub mod snarkjs;
pub mod traits;
pub mod verifier;

pub use circuit::{CircuitInputs, PermitWitness};
pub use groth16::Groth16Verifier;
pub use mock::{MockProver, MockVerifier};
pub use policy::{PolicyError, PolicyMode, ProofBackend, ProofPolicy};
pub use proof::{G1Point, G2Point, Groth16Proof, PlonkProof, Proof};
pub use prover::{ProvedPermit, Prover};
pub use signals::{PublicSignals, SignalSlot, PUBLIC_SIGNAL_COUNT};
pub use snarkjs::{SnarkjsProver, SnarkjsVerifier};
pub use traits::{ProofError, ProofSystem, ProofVerifier, VerifyError};
pub use verifier::VerifierSet;
