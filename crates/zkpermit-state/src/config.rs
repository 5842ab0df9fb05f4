//! # Deployment Configuration
//!
//! A permit ledger is described by a YAML document:
//!
//! ```yaml
//! domain:
//!   name: ZK-Coin
//!   version: "1"
//!   chain_id: 31337
//!   verifying_contract: "0x5FbDB2315678afecb367f032d93F642f64180aa3"
//! verifiers:
//!   groth16:
//!     kind: native
//!     vkey: keys/groth16_verification_key.json
//!   plonk:
//!     kind: snarkjs
//!     vkey: keys/plonk_verification_key.json
//!     binary: snarkjs
//! policy: production
//! track_redeemed: false
//! ```
//!
//! Relative key paths are resolved against the directory of the config
//! file. `ZKPERMIT_CONFIG` names the file for
//! [`PermitConfig::from_environment`]; `ZKPERMIT_PROOF_POLICY` overrides
//! `policy`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zkpermit_core::{Address, Clock, CoreError, DomainContext};
use zkpermit_zkp::policy::POLICY_ENV_VAR;
use zkpermit_zkp::snarkjs::DEFAULT_SNARKJS_BINARY;
use zkpermit_zkp::{
    Groth16Verifier, MockVerifier, PolicyMode, ProofPolicy, ProofSystem, ProofVerifier,
    SnarkjsVerifier, VerifierSet, VerifyError,
};

use crate::error::PermitError;
use crate::permit::{PermitOptions, ZkPermit};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "ZKPERMIT_CONFIG";

/// Errors loading a deployment configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config or a key file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The document is not valid YAML or has the wrong shape.
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// `ZKPERMIT_CONFIG` is not set.
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    /// A domain string does not fit in a field element.
    #[error("invalid domain: {0}")]
    Domain(#[from] CoreError),

    /// The native backend only implements Groth16.
    #[error("no native verifier for {0}; use the snarkjs backend")]
    NativeUnsupported(ProofSystem),

    /// A verifier could not be built from its key.
    #[error("verifier: {0}")]
    Verifier(#[from] VerifyError),

    /// The permit ledger rejected the verifiers.
    #[error("permit ledger: {0}")]
    Permit(#[from] PermitError),
}

/// The deployment domain, in human-readable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Token name (at most 32 bytes).
    pub name: String,
    /// Token version (at most 32 bytes).
    pub version: String,
    /// Chain identifier.
    pub chain_id: u64,
    /// Verifying contract address.
    pub verifying_contract: Address,
}

/// How to verify one proof system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// In-process verification from a snarkjs verification key. Groth16
    /// only.
    Native {
        /// Path to `verification_key.json`.
        vkey: PathBuf,
    },
    /// The snarkjs CLI.
    Snarkjs {
        /// Path to `verification_key.json`.
        vkey: PathBuf,
        /// snarkjs executable.
        #[serde(default = "default_binary")]
        binary: PathBuf,
    },
    /// Transparent mock. Refused under the production policy.
    Mock,
}

fn default_binary() -> PathBuf {
    PathBuf::from(DEFAULT_SNARKJS_BINARY)
}

/// One backend per proof system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiersConfig {
    /// Groth16 backend.
    pub groth16: BackendConfig,
    /// PLONK backend.
    pub plonk: BackendConfig,
}

/// A full deployment description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitConfig {
    /// Deployment domain.
    pub domain: DomainConfig,
    /// Verifier backends.
    pub verifiers: VerifiersConfig,
    /// Policy mode; the build default applies when absent.
    #[serde(default)]
    pub policy: Option<PolicyMode>,
    /// Keep an explicit redeemed compound-hash set.
    #[serde(default)]
    pub track_redeemed: bool,
}

impl PermitConfig {
    /// Parse a YAML document. Key paths are taken as given.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML file, resolving relative key paths against its
    /// directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Load the file named by `ZKPERMIT_CONFIG`.
    pub fn from_environment() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV_VAR).ok_or(ConfigError::MissingEnv(CONFIG_ENV_VAR))?;
        Self::load(PathBuf::from(path))
    }

    fn resolve_paths(&mut self, base: &Path) {
        for backend in [&mut self.verifiers.groth16, &mut self.verifiers.plonk] {
            match backend {
                BackendConfig::Native { vkey } | BackendConfig::Snarkjs { vkey, .. } => {
                    if vkey.is_relative() {
                        *vkey = base.join(&*vkey);
                    }
                }
                BackendConfig::Mock => {}
            }
        }
    }

    /// The domain as field elements.
    pub fn domain_context(&self) -> Result<DomainContext, ConfigError> {
        Ok(DomainContext::new(
            &self.domain.name,
            &self.domain.version,
            self.domain.chain_id,
            self.domain.verifying_contract,
        )?)
    }

    /// Effective policy: `ZKPERMIT_PROOF_POLICY`, then `policy`, then the
    /// build default.
    pub fn proof_policy(&self) -> ProofPolicy {
        let env = std::env::var(POLICY_ENV_VAR).ok();
        self.resolve_policy(env.as_deref())
    }

    fn resolve_policy(&self, env: Option<&str>) -> ProofPolicy {
        env.and_then(PolicyMode::parse)
            .or(self.policy)
            .map_or_else(ProofPolicy::build_default, ProofPolicy::new)
    }

    /// Construction options for the ledger.
    pub fn options(&self) -> PermitOptions {
        PermitOptions {
            policy: self.proof_policy(),
            track_redeemed: self.track_redeemed,
        }
    }

    /// Build both verifiers.
    pub fn build_verifiers(&self) -> Result<VerifierSet, ConfigError> {
        let groth16 = build_backend(ProofSystem::Groth16, &self.verifiers.groth16)?;
        let plonk = build_backend(ProofSystem::Plonk, &self.verifiers.plonk)?;
        Ok(VerifierSet::new(groth16, plonk)?)
    }

    /// Build the ledger described by this config.
    pub fn build_permit<C: Clock>(&self, clock: C) -> Result<ZkPermit<C>, ConfigError> {
        Ok(ZkPermit::with_options(
            self.domain_context()?,
            self.build_verifiers()?,
            clock,
            self.options(),
        )?)
    }
}

fn build_backend(
    system: ProofSystem,
    backend: &BackendConfig,
) -> Result<Arc<dyn ProofVerifier>, ConfigError> {
    match backend {
        BackendConfig::Native { vkey } => {
            if system != ProofSystem::Groth16 {
                return Err(ConfigError::NativeUnsupported(system));
            }
            let json = std::fs::read_to_string(vkey).map_err(|source| ConfigError::Io {
                path: vkey.clone(),
                source,
            })?;
            Ok(Arc::new(Groth16Verifier::from_snarkjs_json(&json)?))
        }
        BackendConfig::Snarkjs { vkey, binary } => Ok(Arc::new(SnarkjsVerifier::new(
            system,
            binary.clone(),
            vkey.clone(),
        )?)),
        BackendConfig::Mock => Ok(Arc::new(MockVerifier::new(system))),
    }
}
