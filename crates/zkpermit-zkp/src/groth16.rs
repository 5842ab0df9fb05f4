//! # Groth16 Verifier (native, BN254)
//!
//! In-process Groth16 verification via `ark-groth16`. The verifying key is
//! prepared once at construction; each call costs three pairings plus one
//! multi-scalar multiplication over the public inputs.
//!
//! ## Properties
//!
//! - **Proof size:** 2 G1 points and 1 G2 point.
//! - **Trusted setup:** circuit-specific. Keys usually come from a snarkjs
//!   `verification_key.json` (see [`crate::snarkjs`]).
//!
//! ## Security Invariant
//!
//! Proof points are validated before use: coordinates must be below the
//! base-field modulus, on the curve, and in the prime-order subgroup. A
//! point failing any check makes the proof invalid (`Ok(false)`), not an
//! error.

use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInt, PrimeField};
use ark_groth16::{Groth16, PreparedVerifyingKey, VerifyingKey};
use ark_snark::SNARK;
use tracing::debug;
use zkpermit_core::{FieldElement, U256};
use zkpermit_crypto::to_fr;

use crate::policy::ProofBackend;
use crate::proof::{G1Point, G2Point, Groth16Proof, Proof};
use crate::traits::{ProofSystem, ProofVerifier, VerifyError};

/// Native Groth16 verifier over BN254.
#[derive(Clone)]
pub struct Groth16Verifier {
    pvk: PreparedVerifyingKey<Bn254>,
    n_public: usize,
}

impl Groth16Verifier {
    /// Prepare a verifying key.
    pub fn new(vk: VerifyingKey<Bn254>) -> Result<Self, VerifyError> {
        let n_public = vk
            .gamma_abc_g1
            .len()
            .checked_sub(1)
            .ok_or_else(|| VerifyError::MalformedKey("empty IC vector".to_string()))?;
        let pvk = <Groth16<Bn254> as SNARK<Fr>>::process_vk(&vk)
            .map_err(|e| VerifyError::MalformedKey(e.to_string()))?;
        Ok(Self { pvk, n_public })
    }

    /// Build from the text of a snarkjs `verification_key.json`.
    pub fn from_snarkjs_json(json: &str) -> Result<Self, VerifyError> {
        Self::new(crate::snarkjs::parse_groth16_vkey(json)?)
    }

    /// The unprepared verifying key.
    pub fn verifying_key(&self) -> &VerifyingKey<Bn254> {
        &self.pvk.vk
    }
}

impl std::fmt::Debug for Groth16Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Groth16Verifier")
            .field("n_public", &self.n_public)
            .finish_non_exhaustive()
    }
}

impl ProofVerifier for Groth16Verifier {
    fn system(&self) -> ProofSystem {
        ProofSystem::Groth16
    }

    fn backend(&self) -> ProofBackend {
        ProofBackend::Groth16
    }

    fn public_input_count(&self) -> Option<usize> {
        Some(self.n_public)
    }

    fn verify(&self, proof: &Proof, public_signals: &[FieldElement]) -> Result<bool, VerifyError> {
        self.check_arity(public_signals)?;
        let Some(groth) = proof.as_groth16() else {
            debug!(system = %proof.system(), "groth16 verifier given foreign proof variant");
            return Ok(false);
        };
        let Some(ark_proof) = to_ark_proof(groth) else {
            debug!("groth16 proof point failed curve validation");
            return Ok(false);
        };
        let inputs: Vec<Fr> = public_signals.iter().map(to_fr).collect();
        let ok = <Groth16<Bn254> as SNARK<Fr>>::verify_with_processed_vk(&self.pvk, &inputs, &ark_proof)
            .map_err(|e| VerifyError::Backend(e.to_string()))?;
        debug!(valid = ok, "groth16 pairing check");
        Ok(ok)
    }
}

// ─── Point Conversion ───────────────────────────────────────────────

fn fq(value: U256) -> Option<Fq> {
    Fq::from_bigint(BigInt::new(*value.as_limbs()))
}

fn fq_to_u256(value: Fq) -> U256 {
    U256::from_limbs(value.into_bigint().0)
}

/// Validate and convert a G1 point. `(0, 0)` is the point at infinity.
pub fn g1_to_affine(point: &G1Point) -> Option<G1Affine> {
    if point.x.is_zero() && point.y.is_zero() {
        return Some(G1Affine::zero());
    }
    let p = G1Affine::new_unchecked(fq(point.x)?, fq(point.y)?);
    (p.is_on_curve() && p.is_in_correct_subgroup_assuming_on_curve()).then_some(p)
}

/// Validate and convert a G2 point. All-zero coordinates are the point at
/// infinity.
pub fn g2_to_affine(point: &G2Point) -> Option<G2Affine> {
    if point.x.iter().chain(point.y.iter()).all(|c| c.is_zero()) {
        return Some(G2Affine::zero());
    }
    let x = Fq2::new(fq(point.x[0])?, fq(point.x[1])?);
    let y = Fq2::new(fq(point.y[0])?, fq(point.y[1])?);
    let p = G2Affine::new_unchecked(x, y);
    (p.is_on_curve() && p.is_in_correct_subgroup_assuming_on_curve()).then_some(p)
}

/// Convert an arkworks G1 point.
pub fn g1_from_affine(point: &G1Affine) -> G1Point {
    match point.xy() {
        Some((x, y)) => G1Point {
            x: fq_to_u256(*x),
            y: fq_to_u256(*y),
        },
        None => G1Point {
            x: U256::ZERO,
            y: U256::ZERO,
        },
    }
}

/// Convert an arkworks G2 point.
pub fn g2_from_affine(point: &G2Affine) -> G2Point {
    match point.xy() {
        Some((x, y)) => G2Point {
            x: [fq_to_u256(x.c0), fq_to_u256(x.c1)],
            y: [fq_to_u256(y.c0), fq_to_u256(y.c1)],
        },
        None => G2Point {
            x: [U256::ZERO; 2],
            y: [U256::ZERO; 2],
        },
    }
}

/// Validate and convert a proof into arkworks form.
pub fn to_ark_proof(proof: &Groth16Proof) -> Option<ark_groth16::Proof<Bn254>> {
    Some(ark_groth16::Proof {
        a: g1_to_affine(&proof.a)?,
        b: g2_to_affine(&proof.b)?,
        c: g1_to_affine(&proof.c)?,
    })
}

/// Convert an arkworks proof.
pub fn from_ark_proof(proof: &ark_groth16::Proof<Bn254>) -> Groth16Proof {
    Groth16Proof {
        a: g1_from_affine(&proof.a),
        b: g2_from_affine(&proof.b),
        c: g1_from_affine(&proof.c),
    }
}
