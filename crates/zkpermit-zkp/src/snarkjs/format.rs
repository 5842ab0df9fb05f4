//! snarkjs JSON artifacts: Groth16 `proof.json`, Groth16
//! `verification_key.json`, and `public.json`.
//!
//! snarkjs writes curve points as projective triples of decimal strings
//! with `z = "1"` for affine points and `Fq2` elements as `[c0, c1]`.

use ark_bn254::{Bn254, G1Affine, G2Affine};
use ark_groth16::VerifyingKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zkpermit_core::{FieldElement, U256};

use crate::groth16::{g1_from_affine, g1_to_affine, g2_from_affine, g2_to_affine};
use crate::proof::{G1Point, G2Point, Groth16Proof};
use crate::traits::{ProofError, VerifyError};

/// Errors reading snarkjs artifacts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Not valid JSON, or not the expected shape.
    #[error("invalid snarkjs JSON: {0}")]
    Json(String),

    /// A coordinate or signal is not a decimal integer.
    #[error("invalid integer {0:?}")]
    Integer(String),

    /// A point triple does not have the expected shape.
    #[error("malformed curve point: {0}")]
    Point(String),

    /// A public signal is not a field element.
    #[error("public signal out of field: {0}")]
    Signal(String),

    /// The artifact belongs to another protocol.
    #[error("expected protocol {expected}, found {found}")]
    Protocol {
        /// Protocol required by the caller.
        expected: String,
        /// Protocol named in the artifact.
        found: String,
    },
}

impl From<serde_json::Error> for FormatError {
    fn from(e: serde_json::Error) -> Self {
        FormatError::Json(e.to_string())
    }
}

impl From<FormatError> for VerifyError {
    fn from(e: FormatError) -> Self {
        VerifyError::MalformedKey(e.to_string())
    }
}

impl From<FormatError> for ProofError {
    fn from(e: FormatError) -> Self {
        ProofError::Serialization(e.to_string())
    }
}

// ─── Wire Structures ────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct ProofJson {
    pi_a: Vec<String>,
    pi_b: Vec<Vec<String>>,
    pi_c: Vec<String>,
    #[serde(default = "groth16_protocol")]
    protocol: String,
    #[serde(default = "bn128_curve")]
    curve: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct VerificationKeyJson {
    protocol: String,
    #[serde(default = "bn128_curve")]
    curve: String,
    #[serde(rename = "nPublic")]
    n_public: usize,
    vk_alpha_1: Vec<String>,
    vk_beta_2: Vec<Vec<String>>,
    vk_gamma_2: Vec<Vec<String>>,
    vk_delta_2: Vec<Vec<String>>,
    #[serde(rename = "IC")]
    ic: Vec<Vec<String>>,
}

/// The header fields every snarkjs verification key carries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VkeyHeader {
    /// `groth16`, `plonk`, ...
    pub protocol: String,
    /// Number of public signals.
    pub n_public: usize,
}

fn groth16_protocol() -> String {
    "groth16".to_string()
}

fn bn128_curve() -> String {
    "bn128".to_string()
}

// ─── Coordinates ────────────────────────────────────────────────────

fn int(s: &str) -> Result<U256, FormatError> {
    s.parse::<U256>()
        .map_err(|_| FormatError::Integer(s.to_string()))
}

fn check_z(z: Option<&String>, one: &str) -> Result<bool, FormatError> {
    match z.map(String::as_str) {
        None => Ok(true),
        Some(z) if z == one => Ok(true),
        Some("0") => Ok(false),
        Some(other) => Err(FormatError::Point(format!("non-normalized z = {other}"))),
    }
}

fn g1_from_json(triple: &[String]) -> Result<G1Point, FormatError> {
    if triple.len() < 2 || triple.len() > 3 {
        return Err(FormatError::Point(format!("G1 with {} coordinates", triple.len())));
    }
    if !check_z(triple.get(2), "1")? {
        return Ok(G1Point {
            x: U256::ZERO,
            y: U256::ZERO,
        });
    }
    Ok(G1Point {
        x: int(&triple[0])?,
        y: int(&triple[1])?,
    })
}

fn fq2_from_json(pair: &[String]) -> Result<[U256; 2], FormatError> {
    match pair {
        [c0, c1] => Ok([int(c0)?, int(c1)?]),
        _ => Err(FormatError::Point(format!("Fq2 with {} components", pair.len()))),
    }
}

fn g2_from_json(triple: &[Vec<String>]) -> Result<G2Point, FormatError> {
    if triple.len() < 2 || triple.len() > 3 {
        return Err(FormatError::Point(format!("G2 with {} coordinates", triple.len())));
    }
    if let Some(z) = triple.get(2) {
        let z = fq2_from_json(z)?;
        if z == [U256::ZERO, U256::ZERO] {
            return Ok(G2Point {
                x: [U256::ZERO; 2],
                y: [U256::ZERO; 2],
            });
        }
        if z != [U256::from(1u8), U256::ZERO] {
            return Err(FormatError::Point("non-normalized G2 z".to_string()));
        }
    }
    Ok(G2Point {
        x: fq2_from_json(&triple[0])?,
        y: fq2_from_json(&triple[1])?,
    })
}

fn is_identity_g1(p: &G1Point) -> bool {
    p.x.is_zero() && p.y.is_zero()
}

fn g1_to_json(p: &G1Point) -> Vec<String> {
    let z = if is_identity_g1(p) { "0" } else { "1" };
    vec![p.x.to_string(), p.y.to_string(), z.to_string()]
}

fn g2_to_json(p: &G2Point) -> Vec<Vec<String>> {
    let identity = p.x.iter().chain(p.y.iter()).all(|c| c.is_zero());
    let z = if identity { ["0", "0"] } else { ["1", "0"] };
    vec![
        vec![p.x[0].to_string(), p.x[1].to_string()],
        vec![p.y[0].to_string(), p.y[1].to_string()],
        z.iter().map(|s| s.to_string()).collect(),
    ]
}

// ─── Proofs ─────────────────────────────────────────────────────────

/// Parse a snarkjs Groth16 `proof.json`.
pub fn parse_groth16_proof(json: &str) -> Result<Groth16Proof, FormatError> {
    let raw: ProofJson = serde_json::from_str(json)?;
    if raw.protocol != "groth16" {
        return Err(FormatError::Protocol {
            expected: "groth16".to_string(),
            found: raw.protocol,
        });
    }
    Ok(Groth16Proof {
        a: g1_from_json(&raw.pi_a)?,
        b: g2_from_json(&raw.pi_b)?,
        c: g1_from_json(&raw.pi_c)?,
    })
}

/// Render a Groth16 proof as snarkjs `proof.json`.
pub fn render_groth16_proof(proof: &Groth16Proof) -> Result<String, FormatError> {
    let raw = ProofJson {
        pi_a: g1_to_json(&proof.a),
        pi_b: g2_to_json(&proof.b),
        pi_c: g1_to_json(&proof.c),
        protocol: groth16_protocol(),
        curve: bn128_curve(),
    };
    Ok(serde_json::to_string_pretty(&raw)?)
}

// ─── Verification Keys ──────────────────────────────────────────────

/// Read the protocol and public-signal count of any snarkjs verification
/// key.
pub fn parse_vkey_header(json: &str) -> Result<VkeyHeader, FormatError> {
    Ok(serde_json::from_str(json)?)
}

fn key_g1(triple: &[String], what: &str) -> Result<G1Affine, FormatError> {
    g1_to_affine(&g1_from_json(triple)?)
        .ok_or_else(|| FormatError::Point(format!("{what} is not a valid G1 point")))
}

fn key_g2(triple: &[Vec<String>], what: &str) -> Result<G2Affine, FormatError> {
    g2_to_affine(&g2_from_json(triple)?)
        .ok_or_else(|| FormatError::Point(format!("{what} is not a valid G2 point")))
}

/// Parse a snarkjs Groth16 `verification_key.json` into an arkworks key.
///
/// Every point is validated. `IC` must hold `nPublic + 1` points.
pub fn parse_groth16_vkey(json: &str) -> Result<VerifyingKey<Bn254>, FormatError> {
    let raw: VerificationKeyJson = serde_json::from_str(json)?;
    if raw.protocol != "groth16" {
        return Err(FormatError::Protocol {
            expected: "groth16".to_string(),
            found: raw.protocol,
        });
    }
    if raw.ic.len() != raw.n_public + 1 {
        return Err(FormatError::Json(format!(
            "IC has {} points for nPublic = {}",
            raw.ic.len(),
            raw.n_public
        )));
    }
    let gamma_abc_g1 = raw
        .ic
        .iter()
        .enumerate()
        .map(|(i, p)| key_g1(p, &format!("IC[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(VerifyingKey {
        alpha_g1: key_g1(&raw.vk_alpha_1, "vk_alpha_1")?,
        beta_g2: key_g2(&raw.vk_beta_2, "vk_beta_2")?,
        gamma_g2: key_g2(&raw.vk_gamma_2, "vk_gamma_2")?,
        delta_g2: key_g2(&raw.vk_delta_2, "vk_delta_2")?,
        gamma_abc_g1,
    })
}

/// Render an arkworks key as snarkjs `verification_key.json`.
pub fn render_groth16_vkey(vk: &VerifyingKey<Bn254>) -> Result<String, FormatError> {
    let raw = VerificationKeyJson {
        protocol: groth16_protocol(),
        curve: bn128_curve(),
        n_public: vk.gamma_abc_g1.len().saturating_sub(1),
        vk_alpha_1: g1_to_json(&g1_from_affine(&vk.alpha_g1)),
        vk_beta_2: g2_to_json(&g2_from_affine(&vk.beta_g2)),
        vk_gamma_2: g2_to_json(&g2_from_affine(&vk.gamma_g2)),
        vk_delta_2: g2_to_json(&g2_from_affine(&vk.delta_g2)),
        ic: vk
            .gamma_abc_g1
            .iter()
            .map(|p| g1_to_json(&g1_from_affine(p)))
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&raw)?)
}

// ─── Public Signals ─────────────────────────────────────────────────

/// Parse `public.json`. Every entry must be a field element.
pub fn parse_public_signals(json: &str) -> Result<Vec<FieldElement>, FormatError> {
    let raw: Vec<String> = serde_json::from_str(json)?;
    raw.iter()
        .map(|s| FieldElement::parse(s).map_err(|e| FormatError::Signal(e.to_string())))
        .collect()
}

/// Render signals as `public.json`.
pub fn render_public_signals(signals: &[FieldElement]) -> Result<String, FormatError> {
    let raw: Vec<String> = signals.iter().map(ToString::to_string).collect();
    Ok(serde_json::to_string(&raw)?)
}
