//! Adapters that shell out to the `snarkjs` CLI.
//!
//! - [`SnarkjsVerifier`] runs `snarkjs <system> verify` and is usable for
//!   both systems. It is the PLONK backend of a production deployment.
//! - [`SnarkjsProver`] runs `snarkjs <system> fullprove` (witness
//!   calculation plus proving) against the circuit's `.wasm` and `.zkey`.
//!
//! Artifacts are exchanged through a private temporary directory that is
//! removed when the call returns.

use std::path::{Path, PathBuf};
use std::process::Output;

use tracing::debug;
use zkpermit_core::FieldElement;

use super::format::{
    parse_groth16_proof, parse_public_signals, parse_vkey_header, render_groth16_proof,
    render_public_signals,
};
use crate::circuit::PermitWitness;
use crate::policy::ProofBackend;
use crate::proof::{PlonkProof, Proof};
use crate::prover::{ProvedPermit, Prover};
use crate::traits::{ProofError, ProofSystem, ProofVerifier, VerifyError};

/// Default binary name, resolved through `PATH`.
pub const DEFAULT_SNARKJS_BINARY: &str = "snarkjs";

/// What `snarkjs <system> verify` prints for a proof that fails to verify.
/// Any other failure is a backend error.
const INVALID_PROOF_MARKER: &str = "Invalid proof";

fn backend_err(e: impl std::fmt::Display) -> VerifyError {
    VerifyError::Backend(e.to_string())
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

// ─── Verifier ───────────────────────────────────────────────────────

/// Verifies proofs with `snarkjs <system> verify`.
#[derive(Debug, Clone)]
pub struct SnarkjsVerifier {
    system: ProofSystem,
    binary: PathBuf,
    vkey_path: PathBuf,
    n_public: usize,
}

impl SnarkjsVerifier {
    /// Load the verification key header from `vkey_path` and check that
    /// it belongs to `system`.
    pub fn new(
        system: ProofSystem,
        binary: impl Into<PathBuf>,
        vkey_path: impl Into<PathBuf>,
    ) -> Result<Self, VerifyError> {
        let vkey_path = vkey_path.into();
        let text = std::fs::read_to_string(&vkey_path)
            .map_err(|e| VerifyError::MalformedKey(format!("{}: {e}", vkey_path.display())))?;
        let header = parse_vkey_header(&text)?;
        if header.protocol != system.name() {
            return Err(VerifyError::MalformedKey(format!(
                "{} is a {} key, expected {system}",
                vkey_path.display(),
                header.protocol
            )));
        }
        Ok(Self {
            system,
            binary: binary.into(),
            vkey_path,
            n_public: header.n_public,
        })
    }

    /// Path of the verification key.
    pub fn vkey_path(&self) -> &Path {
        &self.vkey_path
    }

    fn proof_bytes(&self, proof: &Proof) -> Result<Vec<u8>, VerifyError> {
        match proof {
            Proof::Groth16(p) => Ok(render_groth16_proof(p).map_err(backend_err)?.into_bytes()),
            Proof::Plonk(p) => Ok(p.bytes.clone()),
        }
    }
}

impl ProofVerifier for SnarkjsVerifier {
    fn system(&self) -> ProofSystem {
        self.system
    }

    fn backend(&self) -> ProofBackend {
        match self.system {
            ProofSystem::Groth16 => ProofBackend::Groth16,
            ProofSystem::Plonk => ProofBackend::Plonk,
        }
    }

    fn public_input_count(&self) -> Option<usize> {
        Some(self.n_public)
    }

    fn verify(&self, proof: &Proof, public_signals: &[FieldElement]) -> Result<bool, VerifyError> {
        self.check_arity(public_signals)?;
        if proof.system() != self.system {
            debug!(expected = %self.system, actual = %proof.system(), "snarkjs verifier given foreign proof variant");
            return Ok(false);
        }

        let dir = tempfile::tempdir().map_err(backend_err)?;
        let proof_path = dir.path().join("proof.json");
        let public_path = dir.path().join("public.json");
        std::fs::write(&proof_path, self.proof_bytes(proof)?).map_err(backend_err)?;
        std::fs::write(
            &public_path,
            render_public_signals(public_signals).map_err(backend_err)?,
        )
        .map_err(backend_err)?;

        let output = std::process::Command::new(&self.binary)
            .arg(self.system.name())
            .arg("verify")
            .arg(&self.vkey_path)
            .arg(&public_path)
            .arg(&proof_path)
            .output()
            .map_err(|e| VerifyError::Backend(format!("{}: {e}", self.binary.display())))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = stderr_of(&output);
        if output.status.success() && stdout.contains("OK") {
            debug!(system = %self.system, valid = true, "snarkjs verify");
            return Ok(true);
        }
        if stdout.contains(INVALID_PROOF_MARKER) || stderr.contains(INVALID_PROOF_MARKER) {
            debug!(system = %self.system, valid = false, "snarkjs verify");
            return Ok(false);
        }
        Err(VerifyError::Backend(format!(
            "snarkjs {} verify exited with {}: {}",
            self.system, output.status, stderr
        )))
    }
}

// ─── Prover ─────────────────────────────────────────────────────────

/// Generates proofs with `snarkjs <system> fullprove`.
#[derive(Debug, Clone)]
pub struct SnarkjsProver {
    system: ProofSystem,
    binary: PathBuf,
    wasm_path: PathBuf,
    zkey_path: PathBuf,
}

impl SnarkjsProver {
    /// Prover for `system` over a compiled circuit and its proving key.
    pub fn new(
        system: ProofSystem,
        binary: impl Into<PathBuf>,
        wasm_path: impl Into<PathBuf>,
        zkey_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            system,
            binary: binary.into(),
            wasm_path: wasm_path.into(),
            zkey_path: zkey_path.into(),
        }
    }
}

impl Prover for SnarkjsProver {
    fn system(&self) -> ProofSystem {
        self.system
    }

    async fn prove(&self, witness: &PermitWitness) -> Result<ProvedPermit, ProofError> {
        let dir = tempfile::tempdir()?;
        let input_path = dir.path().join("input.json");
        let proof_path = dir.path().join("proof.json");
        let public_path = dir.path().join("public.json");

        let input = witness
            .circuit_inputs()
            .to_json()
            .map_err(|e| ProofError::Serialization(e.to_string()))?;
        tokio::fs::write(&input_path, input).await?;

        let output = tokio::process::Command::new(&self.binary)
            .arg(self.system.name())
            .arg("fullprove")
            .arg(&input_path)
            .arg(&self.wasm_path)
            .arg(&self.zkey_path)
            .arg(&proof_path)
            .arg(&public_path)
            .output()
            .await?;
        if !output.status.success() {
            return Err(ProofError::GenerationFailed(format!(
                "snarkjs {} fullprove failed: {}",
                self.system,
                stderr_of(&output)
            )));
        }

        let public_signals = witness.public_signals();
        let produced = parse_public_signals(&tokio::fs::read_to_string(&public_path).await?)?;
        if produced != public_signals.to_vec(self.system) {
            return Err(ProofError::SignalMismatch);
        }

        let proof_text = tokio::fs::read_to_string(&proof_path).await?;
        let proof = match self.system {
            ProofSystem::Groth16 => Proof::Groth16(parse_groth16_proof(&proof_text)?),
            ProofSystem::Plonk => Proof::Plonk(PlonkProof::new(proof_text.into_bytes())),
        };
        debug!(system = %self.system, "snarkjs fullprove produced proof");

        Ok(ProvedPermit {
            proof,
            public_signals,
            request: witness.permit_request(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groth16::tests::setup;
    use crate::mock::mock_proof;
    use crate::snarkjs::render_groth16_vkey;
    use zkpermit_core::{Address, DomainContext, TransferRequest, UserSecret, U256};
    use zkpermit_crypto::CommitmentScheme;

    const MISSING_BINARY: &str = "/nonexistent/zkpermit-test/snarkjs";

    fn write_vkey(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("verification_key.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    fn signals() -> Vec<FieldElement> {
        (1..=3).map(FieldElement::from_u64).collect()
    }

    #[test]
    fn reads_public_input_count_from_key() {
        let dir = tempfile::tempdir().unwrap();
        let (_, vk) = setup(3);
        let path = write_vkey(dir.path(), &render_groth16_vkey(&vk).unwrap());
        let verifier = SnarkjsVerifier::new(ProofSystem::Groth16, MISSING_BINARY, &path).unwrap();
        assert_eq!(verifier.public_input_count(), Some(3));
        assert_eq!(verifier.backend(), ProofBackend::Groth16);
        assert_eq!(verifier.vkey_path(), path.as_path());
    }

    #[test]
    fn rejects_key_of_other_protocol() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_vkey(dir.path(), r#"{"protocol":"plonk","nPublic":3}"#);
        let err = SnarkjsVerifier::new(ProofSystem::Groth16, MISSING_BINARY, &path).unwrap_err();
        assert!(matches!(err, VerifyError::MalformedKey(_)));
    }

    #[test]
    fn missing_key_file_is_malformed_key() {
        let err = SnarkjsVerifier::new(ProofSystem::Plonk, MISSING_BINARY, "/nonexistent/vk.json")
            .unwrap_err();
        assert!(matches!(err, VerifyError::MalformedKey(_)));
    }

    #[test]
    fn foreign_variant_is_false_without_running_snarkjs() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_vkey(dir.path(), r#"{"protocol":"plonk","nPublic":3}"#);
        let verifier = SnarkjsVerifier::new(ProofSystem::Plonk, MISSING_BINARY, &path).unwrap();
        let proof = mock_proof(ProofSystem::Groth16, &signals());
        assert!(!verifier.verify(&proof, &signals()).unwrap());
    }

    #[test]
    fn missing_binary_is_backend_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_vkey(dir.path(), r#"{"protocol":"plonk","nPublic":3}"#);
        let verifier = SnarkjsVerifier::new(ProofSystem::Plonk, MISSING_BINARY, &path).unwrap();
        let proof = mock_proof(ProofSystem::Plonk, &signals());
        assert!(matches!(
            verifier.verify(&proof, &signals()),
            Err(VerifyError::Backend(_))
        ));
    }

    #[test]
    fn arity_checked_before_running_snarkjs() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_vkey(dir.path(), r#"{"protocol":"plonk","nPublic":3}"#);
        let verifier = SnarkjsVerifier::new(ProofSystem::Plonk, MISSING_BINARY, &path).unwrap();
        let proof = mock_proof(ProofSystem::Plonk, &signals());
        assert!(matches!(
            verifier.verify(&proof, &signals()[..2]),
            Err(VerifyError::Arity { .. })
        ));
    }

    fn witness() -> PermitWitness {
        PermitWitness::build(
            &CommitmentScheme::new(),
            DomainContext::new("ZK-Coin", "1", 1, Address::repeat_byte(3)).unwrap(),
            UserSecret::new("pw", "salt", Address::repeat_byte(1)).unwrap(),
            TransferRequest::new(Address::repeat_byte(2), U256::from(1u8), U256::from(10u8), 0)
                .unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn prover_reports_missing_binary_as_io_error() {
        let witness = witness();
        let prover = SnarkjsProver::new(
            ProofSystem::Groth16,
            MISSING_BINARY,
            "permit.wasm",
            "permit.zkey",
        );
        assert_eq!(prover.system(), ProofSystem::Groth16);
        let err = prover.prove(&witness).await.unwrap_err();
        assert!(matches!(err, ProofError::Io(_)));
    }

    // ─── Against a scripted snarkjs ─────────────────────────────────

    /// Install an executable `snarkjs` shell script in `dir`.
    #[cfg(unix)]
    fn scripted_snarkjs(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("snarkjs");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn verify_passes_key_public_and_proof_in_snarkjs_order() {
        let dir = tempfile::tempdir().unwrap();
        let vkey = write_vkey(dir.path(), r#"{"protocol":"plonk","nPublic":3}"#);
        let args = dir.path().join("args.txt");
        let seen_public = dir.path().join("seen_public.json");
        let binary = scripted_snarkjs(
            dir.path(),
            &format!(
                "printf '%s\\n' \"$@\" > '{}'\ncp \"$4\" '{}'\necho '[INFO]  snarkJS: OK!'",
                args.display(),
                seen_public.display()
            ),
        );
        let verifier = SnarkjsVerifier::new(ProofSystem::Plonk, &binary, &vkey).unwrap();
        let proof = mock_proof(ProofSystem::Plonk, &signals());

        assert!(verifier.verify(&proof, &signals()).unwrap());

        let recorded = std::fs::read_to_string(&args).unwrap();
        let argv: Vec<&str> = recorded.lines().collect();
        assert_eq!(argv.len(), 5);
        assert_eq!(argv[0], "plonk");
        assert_eq!(argv[1], "verify");
        assert_eq!(argv[2], vkey.to_str().unwrap());
        assert!(argv[3].ends_with("public.json"));
        assert!(argv[4].ends_with("proof.json"));
        let public = std::fs::read_to_string(&seen_public).unwrap();
        assert_eq!(parse_public_signals(&public).unwrap(), signals());
    }

    #[cfg(unix)]
    #[test]
    fn invalid_proof_output_is_false() {
        let dir = tempfile::tempdir().unwrap();
        let vkey = write_vkey(dir.path(), r#"{"protocol":"plonk","nPublic":3}"#);
        let binary = scripted_snarkjs(dir.path(), "echo '[ERROR] snarkJS: Invalid proof'\nexit 1");
        let verifier = SnarkjsVerifier::new(ProofSystem::Plonk, &binary, &vkey).unwrap();
        let proof = mock_proof(ProofSystem::Plonk, &signals());
        assert!(!verifier.verify(&proof, &signals()).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn crashed_verify_is_backend_error() {
        let dir = tempfile::tempdir().unwrap();
        let vkey = write_vkey(dir.path(), r#"{"protocol":"plonk","nPublic":3}"#);
        let binary = scripted_snarkjs(
            dir.path(),
            "echo 'Error: ENOENT: no such file or directory' >&2\nexit 1",
        );
        let verifier = SnarkjsVerifier::new(ProofSystem::Plonk, &binary, &vkey).unwrap();
        let proof = mock_proof(ProofSystem::Plonk, &signals());
        assert!(matches!(
            verifier.verify(&proof, &signals()),
            Err(VerifyError::Backend(_))
        ));
    }

    /// A `fullprove` script that copies canned `proof.json` and
    /// `public.json` into the output paths it is given.
    #[cfg(unix)]
    fn canned_fullprove(dir: &Path, public: &str) -> PathBuf {
        let canned_proof = dir.join("canned_proof.json");
        let canned_public = dir.join("canned_public.json");
        std::fs::write(&canned_proof, r#"{"protocol":"plonk"}"#).unwrap();
        std::fs::write(&canned_public, public).unwrap();
        scripted_snarkjs(
            dir,
            &format!(
                "[ \"$2\" = fullprove ] || exit 2\ncp '{}' \"$6\"\ncp '{}' \"$7\"",
                canned_proof.display(),
                canned_public.display()
            ),
        )
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn prover_returns_proof_when_public_signals_match() {
        let dir = tempfile::tempdir().unwrap();
        let witness = witness();
        let expected = witness.public_signals().to_vec(ProofSystem::Plonk);
        let binary = canned_fullprove(dir.path(), &render_public_signals(&expected).unwrap());
        let prover = SnarkjsProver::new(ProofSystem::Plonk, binary, "permit.wasm", "permit.zkey");

        let proved = prover.prove(&witness).await.unwrap();
        assert_eq!(
            proved.proof,
            Proof::Plonk(PlonkProof::new(br#"{"protocol":"plonk"}"#.to_vec()))
        );
        assert_eq!(proved.public_signals, witness.public_signals());
        assert_eq!(proved.request, witness.permit_request());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn prover_rejects_public_signals_that_differ_from_witness() {
        let dir = tempfile::tempdir().unwrap();
        let witness = witness();
        let mut produced = witness.public_signals().to_vec(ProofSystem::Plonk);
        produced[2] = FieldElement::from_u64(7);
        let binary = canned_fullprove(dir.path(), &render_public_signals(&produced).unwrap());
        let prover = SnarkjsProver::new(ProofSystem::Plonk, binary, "permit.wasm", "permit.zkey");

        let err = prover.prove(&witness).await.unwrap_err();
        assert!(matches!(err, ProofError::SignalMismatch));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_fullprove_is_generation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let binary = scripted_snarkjs(dir.path(), "echo 'witness error' >&2\nexit 1");
        let prover = SnarkjsProver::new(ProofSystem::Plonk, binary, "permit.wasm", "permit.zkey");
        let err = prover.prove(&witness()).await.unwrap_err();
        assert!(matches!(err, ProofError::GenerationFailed(_)));
    }
}
