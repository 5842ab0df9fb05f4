//! # zkpermit-crypto — Commitment Primitives
//!
//! - **Field Hasher** (`poseidon.rs`): the [`FieldHasher`] trait and
//!   [`CircomPoseidon`], a circomlib-compatible Poseidon over BN254 whose
//!   outputs match the permit circuit bit for bit.
//! - **Commitment Scheme** (`commitment.rs`): [`CommitmentScheme`] composes
//!   the hasher into `DomainHash`, `UserHash`, `TransferRequestHash` and
//!   `CompoundHash` with fixed operand order.
//!
//! Everything here is pure. No state, no I/O.

pub mod commitment;
pub mod error;
pub mod poseidon;

pub use commitment::{CommitmentScheme, HashChain};
pub use error::CryptoError;
pub use poseidon::{from_fr, to_fr, CircomPoseidon, FieldHasher, MAX_POSEIDON_ARITY};
