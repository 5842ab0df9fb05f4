//! # snarkjs Interoperability
//!
//! The permit circuit is compiled with circom and proven with snarkjs.
//! This module reads and writes snarkjs artifacts and wraps the CLI as a
//! verifier backend and a prover adapter.

pub mod cli;
pub mod format;

pub use cli::{SnarkjsProver, SnarkjsVerifier, DEFAULT_SNARKJS_BINARY};
pub use format::{
    parse_groth16_proof, parse_groth16_vkey, parse_public_signals, parse_vkey_header,
    render_groth16_proof, render_groth16_vkey, render_public_signals, FormatError, VkeyHeader,
};
