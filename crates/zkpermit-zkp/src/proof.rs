//! # Proof Variants
//!
//! [`Proof`] is a tagged union over the two backends. The redemption
//! transition dispatches on the tag to pick the matching verifier.
//!
//! Curve-point coordinates are kept as raw 256-bit integers (affine, BN254
//! base field). They are validated only by a verifier, where an off-curve
//! or out-of-range point makes the proof invalid rather than ill-typed.

use serde::{Deserialize, Serialize};
use zkpermit_core::U256;

use crate::traits::ProofSystem;

/// Affine point on BN254 G1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct G1Point {
    /// x coordinate.
    pub x: U256,
    /// y coordinate.
    pub y: U256,
}

/// Affine point on BN254 G2. Coordinates are `Fq2` elements as `[c0, c1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct G2Point {
    /// x coordinate, `[c0, c1]`.
    pub x: [U256; 2],
    /// y coordinate, `[c0, c1]`.
    pub y: [U256; 2],
}

/// A Groth16 proof `(A, B, C)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Groth16Proof {
    /// `A` in G1.
    pub a: G1Point,
    /// `B` in G2.
    pub b: G2Point,
    /// `C` in G1.
    pub c: G1Point,
}

/// A PLONK proof, as the opaque bytes its verifier understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlonkProof {
    /// Serialized proof.
    pub bytes: Vec<u8>,
}

impl PlonkProof {
    /// Wrap serialized proof bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

/// A proof from either backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "system", rename_all = "lowercase")]
pub enum Proof {
    /// Groth16 curve points.
    Groth16(Groth16Proof),
    /// PLONK blob.
    Plonk(PlonkProof),
}

impl Proof {
    /// Which proof system produced this proof.
    pub fn system(&self) -> ProofSystem {
        match self {
            Proof::Groth16(_) => ProofSystem::Groth16,
            Proof::Plonk(_) => ProofSystem::Plonk,
        }
    }

    /// The Groth16 payload, if this is a Groth16 proof.
    pub fn as_groth16(&self) -> Option<&Groth16Proof> {
        match self {
            Proof::Groth16(p) => Some(p),
            Proof::Plonk(_) => None,
        }
    }

    /// The PLONK payload, if this is a PLONK proof.
    pub fn as_plonk(&self) -> Option<&PlonkProof> {
        match self {
            Proof::Plonk(p) => Some(p),
            Proof::Groth16(_) => None,
        }
    }
}

impl From<Groth16Proof> for Proof {
    fn from(p: Groth16Proof) -> Self {
        Proof::Groth16(p)
    }
}

impl From<PlonkProof> for Proof {
    fn from(p: PlonkProof) -> Self {
        Proof::Plonk(p)
    }
}
