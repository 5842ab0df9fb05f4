//! # Field Hasher — Circom Poseidon over BN254
//!
//! The commitment primitive of the permit protocol. [`CircomPoseidon`] uses
//! the circomlib parameter set, so outputs are bit-identical to
//! `circomlibjs.buildPoseidon` and to the `Poseidon(n)` template inside the
//! permit circuit. The off-chain witness generator and the redeeming ledger
//! therefore agree on every hash.
//!
//! ## Preconditions
//!
//! Inputs are [`FieldElement`]s, so the "no input `>= P`" precondition is
//! enforced by the type. The hasher never reduces. Arity is fixed per call
//! site; the permit protocol uses 3 and 4.

use ark_bn254::Fr;
use ark_ff::PrimeField;
use light_poseidon::{Poseidon, PoseidonHasher};
use zkpermit_core::{FieldElement, U256};

use crate::error::CryptoError;

/// Largest input count supported by the circom parameter set.
pub const MAX_POSEIDON_ARITY: usize = 12;

/// A deterministic hash from a fixed-arity sequence of field elements to a
/// field element.
///
/// Implementations must be pure: identical inputs yield identical outputs on
/// every call, from any thread.
pub trait FieldHasher: Send + Sync {
    /// Hash `inputs` in the given order.
    fn hash(&self, inputs: &[FieldElement]) -> Result<FieldElement, CryptoError>;
}

/// circomlib-compatible Poseidon sponge over the BN254 scalar field.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircomPoseidon;

impl FieldHasher for CircomPoseidon {
    fn hash(&self, inputs: &[FieldElement]) -> Result<FieldElement, CryptoError> {
        if inputs.is_empty() || inputs.len() > MAX_POSEIDON_ARITY {
            return Err(CryptoError::UnsupportedArity(inputs.len()));
        }
        let mut sponge = Poseidon::<Fr>::new_circom(inputs.len())
            .map_err(|e| CryptoError::Poseidon(e.to_string()))?;
        let frs: Vec<Fr> = inputs.iter().map(to_fr).collect();
        let out = sponge
            .hash(&frs)
            .map_err(|e| CryptoError::Poseidon(e.to_string()))?;
        Ok(from_fr(out))
    }
}

/// Embed a field element into arkworks' `Fr`.
///
/// `FieldElement` is already below the `Fr` modulus, so the mod-order
/// reduction is the identity here.
pub fn to_fr(value: &FieldElement) -> Fr {
    Fr::from_be_bytes_mod_order(&value.to_be_bytes())
}

/// Convert an arkworks `Fr` back into a [`FieldElement`].
pub fn from_fr(value: Fr) -> FieldElement {
    FieldElement::reduce(U256::from_limbs(value.into_bigint().0))
}
