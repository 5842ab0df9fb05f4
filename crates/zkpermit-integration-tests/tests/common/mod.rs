//! Shared fixtures for the integration suite.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, ProvingKey, VerifyingKey};
use ark_relations::lc;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError, Variable};
use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
use ark_std::rand::rngs::StdRng;
use ark_std::rand::SeedableRng;
use zkpermit_core::{Address, Clock, DomainContext, TransferRequest, UserSecret, U256};
use zkpermit_crypto::{to_fr, CommitmentScheme};
use zkpermit_zkp::groth16::from_ark_proof;
use zkpermit_zkp::{
    MockVerifier, PermitWitness, Proof, ProofSystem, PublicSignals, VerifierSet,
    PUBLIC_SIGNAL_COUNT,
};
use zkpermit_state::ZkPermit;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness. `RUST_LOG` filters.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub const NOW: u64 = 1_700_000_000;

pub fn owner() -> Address {
    Address::repeat_byte(0x11)
}

pub fn spender() -> Address {
    Address::repeat_byte(0x22)
}

pub fn domain() -> DomainContext {
    DomainContext::new(
        "ZK-Coin",
        "1",
        31337,
        "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            .parse()
            .unwrap(),
    )
    .unwrap()
}

pub fn secret() -> UserSecret {
    UserSecret::new("password", "salt", owner()).unwrap()
}

pub fn mock_verifiers() -> VerifierSet {
    VerifierSet::new(
        Arc::new(MockVerifier::new(ProofSystem::Groth16)),
        Arc::new(MockVerifier::new(ProofSystem::Plonk)),
    )
    .unwrap()
}

/// Witness for the owner's current nonce.
pub fn witness<C: Clock>(permit: &ZkPermit<C>, value: U256, deadline: U256) -> PermitWitness {
    let transfer =
        TransferRequest::new(spender(), value, deadline, permit.nonce_of(owner())).unwrap();
    PermitWitness::build(&CommitmentScheme::new(), domain(), secret(), transfer).unwrap()
}

/// Register the fixture secret's user hash for the owner.
pub fn register<C: Clock>(permit: &mut ZkPermit<C>) {
    let user_hash = CommitmentScheme::new().user_hash(&secret()).unwrap();
    permit.register_user_hash(owner(), user_hash).unwrap();
}

// ─── Groth16 test circuit ───────────────────────────────────────────

/// Exposes each public signal as an input constrained equal to a private
/// copy. Stands in for the compiled permit circuit: a proof for it is a
/// real Groth16 proof bound to exactly these public signals.
pub struct EchoCircuit {
    pub signals: Vec<Fr>,
}

impl ConstraintSynthesizer<Fr> for EchoCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        for value in self.signals {
            let public = cs.new_input_variable(|| Ok(value))?;
            let private = cs.new_witness_variable(|| Ok(value))?;
            cs.enforce_constraint(lc!() + private, lc!() + Variable::One, lc!() + public)?;
        }
        Ok(())
    }
}

pub fn groth16_setup() -> (ProvingKey<Bn254>, VerifyingKey<Bn254>) {
    let mut rng = StdRng::seed_from_u64(24301);
    let circuit = EchoCircuit {
        signals: vec![Fr::from(0u64); PUBLIC_SIGNAL_COUNT],
    };
    Groth16::<Bn254>::setup(circuit, &mut rng).unwrap()
}

pub fn groth16_prove(pk: &ProvingKey<Bn254>, signals: &PublicSignals) -> Proof {
    let mut rng = StdRng::seed_from_u64(36871);
    let circuit = EchoCircuit {
        signals: signals
            .to_vec(ProofSystem::Groth16)
            .iter()
            .map(to_fr)
            .collect(),
    };
    let proof = Groth16::<Bn254>::prove(pk, circuit, &mut rng).unwrap();
    Proof::Groth16(from_ark_proof(&proof))
}
