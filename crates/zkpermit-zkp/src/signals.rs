//! # Public-Signal Binding
//!
//! Maps the permit hash chain to the flat public-input vector a verifier
//! checks, and back. The order is a wire-format contract shared with the
//! circuit and is enumerated here once per backend:
//!
//! ```text
//! index  signal
//! 0      DomainHash
//! 1      TransferRequestHash
//! 2      CompoundHash
//! ```
//!
//! Both backends use the same layout. `UserHash` is never public.
//!
//! ## Security Invariant
//!
//! The redeeming ledger builds [`PublicSignals`] from its own recomputed
//! chain (stored `userHash`, stored domain, current nonce). It never reads
//! a signal value out of a proof. Including the recomputed `CompoundHash`
//! binds the proof to the registered `userHash`.

use serde::{Deserialize, Serialize};
use zkpermit_core::FieldElement;
use zkpermit_crypto::HashChain;

use crate::traits::{ProofSystem, VerifyError};

/// Length of the public-signal vector.
pub const PUBLIC_SIGNAL_COUNT: usize = 3;

/// A named slot in the public-signal vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalSlot {
    /// `H(name, version, chainId, contractAddress)`.
    DomainHash,
    /// `H(spender, value, deadline, nonce)`.
    TransferRequestHash,
    /// `H(DomainHash, UserHash, TransferRequestHash)`.
    CompoundHash,
}

/// Groth16 public-signal order.
pub const GROTH16_LAYOUT: [SignalSlot; PUBLIC_SIGNAL_COUNT] = [
    SignalSlot::DomainHash,
    SignalSlot::TransferRequestHash,
    SignalSlot::CompoundHash,
];

/// PLONK public-signal order.
pub const PLONK_LAYOUT: [SignalSlot; PUBLIC_SIGNAL_COUNT] = [
    SignalSlot::DomainHash,
    SignalSlot::TransferRequestHash,
    SignalSlot::CompoundHash,
];

/// The signal order for `system`.
pub fn layout(system: ProofSystem) -> &'static [SignalSlot; PUBLIC_SIGNAL_COUNT] {
    match system {
        ProofSystem::Groth16 => &GROTH16_LAYOUT,
        ProofSystem::Plonk => &PLONK_LAYOUT,
    }
}

/// The public signals of one permit proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicSignals {
    /// `DomainHash`.
    pub domain_hash: FieldElement,
    /// `TransferRequestHash`.
    pub transfer_request_hash: FieldElement,
    /// `CompoundHash`.
    pub compound_hash: FieldElement,
}

impl PublicSignals {
    /// Project the public part of a hash chain.
    pub fn from_chain(chain: &HashChain) -> Self {
        Self {
            domain_hash: chain.domain_hash,
            transfer_request_hash: chain.transfer_request_hash,
            compound_hash: chain.compound_hash,
        }
    }

    /// The value in `slot`.
    pub fn get(&self, slot: SignalSlot) -> FieldElement {
        match slot {
            SignalSlot::DomainHash => self.domain_hash,
            SignalSlot::TransferRequestHash => self.transfer_request_hash,
            SignalSlot::CompoundHash => self.compound_hash,
        }
    }

    /// Flatten into the verifier input order for `system`.
    pub fn to_vec(&self, system: ProofSystem) -> Vec<FieldElement> {
        layout(system).iter().map(|slot| self.get(*slot)).collect()
    }

    /// Read a verifier input vector laid out for `system`.
    pub fn from_slice(system: ProofSystem, signals: &[FieldElement]) -> Result<Self, VerifyError> {
        if signals.len() != PUBLIC_SIGNAL_COUNT {
            return Err(VerifyError::Arity {
                expected: PUBLIC_SIGNAL_COUNT,
                actual: signals.len(),
            });
        }
        let mut out = Self {
            domain_hash: FieldElement::ZERO,
            transfer_request_hash: FieldElement::ZERO,
            compound_hash: FieldElement::ZERO,
        };
        for (slot, value) in layout(system).iter().zip(signals) {
            match slot {
                SignalSlot::DomainHash => out.domain_hash = *value,
                SignalSlot::TransferRequestHash => out.transfer_request_hash = *value,
                SignalSlot::CompoundHash => out.compound_hash = *value,
            }
        }
        Ok(out)
    }
}
