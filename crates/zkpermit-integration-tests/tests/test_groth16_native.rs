//! # Native Groth16 Round Trip
//!
//! Real BN254 Groth16 proofs, generated with arkworks over a test circuit
//! that exposes the permit public signals, verified by the native
//! verifier inside the permit ledger. The verifying key travels through
//! the snarkjs `verification_key.json` format, as it does in deployment.

mod common;

use std::sync::Arc;

use ark_std::rand::rngs::StdRng;
use ark_std::rand::SeedableRng;
use common::*;
use zkpermit_core::{FieldElement, FixedClock, U256};
use zkpermit_state::{PermitConfig, PermitError, PermitOptions, ZkPermit};
use zkpermit_zkp::snarkjs::{
    parse_groth16_proof, render_groth16_proof, render_groth16_vkey, SnarkjsVerifier,
    DEFAULT_SNARKJS_BINARY,
};
use zkpermit_zkp::{
    Groth16Verifier, MockVerifier, Proof, ProofPolicy, ProofSystem, ProofVerifier, VerifierSet,
};

fn native_ledger(
    vk_json: &str,
    policy: ProofPolicy,
) -> Result<ZkPermit<Arc<FixedClock>>, PermitError> {
    init_tracing();
    let verifiers = VerifierSet::new(
        Arc::new(Groth16Verifier::from_snarkjs_json(vk_json).unwrap()),
        Arc::new(MockVerifier::new(ProofSystem::Plonk)),
    )
    .unwrap();
    ZkPermit::with_options(
        domain(),
        verifiers,
        Arc::new(FixedClock::new(NOW)),
        PermitOptions {
            policy,
            track_redeemed: false,
        },
    )
}

#[test]
fn real_groth16_proof_redeems_once() {
    let (pk, vk) = groth16_setup();
    let vk_json = render_groth16_vkey(&vk).unwrap();
    let mut permit = native_ledger(&vk_json, ProofPolicy::development()).unwrap();
    register(&mut permit);

    let w = witness(&permit, U256::from(9u8), FieldElement::MAX.as_u256());
    let proof = groth16_prove(&pk, &w.public_signals());
    let request = w.permit_request();

    permit.redeem_permit_groth16(&proof, &request).unwrap();
    assert_eq!(permit.allowance_of(owner(), spender()), U256::from(9u8));
    assert_eq!(permit.nonce_of(owner()), 1);

    assert_eq!(
        permit.redeem_permit_groth16(&proof, &request),
        Err(PermitError::ProofInvalid)
    );
}

#[test]
fn proof_for_other_signals_is_rejected_by_pairing_check() {
    let (pk, vk) = groth16_setup();
    let vk_json = render_groth16_vkey(&vk).unwrap();
    let mut permit = native_ledger(&vk_json, ProofPolicy::development()).unwrap();
    register(&mut permit);

    let honest = witness(&permit, U256::from(9u8), U256::from(NOW + 60));
    let other = witness(&permit, U256::from(10u8), U256::from(NOW + 60));
    let proof = groth16_prove(&pk, &other.public_signals());

    assert_eq!(
        permit.redeem_permit(&proof, &honest.permit_request()),
        Err(PermitError::ProofInvalid)
    );
    assert_eq!(permit.nonce_of(owner()), 0);
}

#[test]
fn proof_survives_snarkjs_json() {
    let (pk, vk) = groth16_setup();
    let verifier = Groth16Verifier::from_snarkjs_json(&render_groth16_vkey(&vk).unwrap()).unwrap();
    let signals = vec![
        FieldElement::from_u64(1),
        FieldElement::from_u64(2),
        FieldElement::from_u64(3),
    ];
    let ps = zkpermit_zkp::PublicSignals::from_slice(ProofSystem::Groth16, &signals).unwrap();
    let Proof::Groth16(groth) = groth16_prove(&pk, &ps) else {
        panic!("expected a groth16 proof");
    };
    let reparsed = parse_groth16_proof(&render_groth16_proof(&groth).unwrap()).unwrap();
    assert!(verifier
        .verify(&Proof::Groth16(reparsed), &signals)
        .unwrap());
}

#[test]
fn production_policy_refuses_mock_plonk() {
    let (_, vk) = groth16_setup();
    let vk_json = render_groth16_vkey(&vk).unwrap();
    assert!(matches!(
        native_ledger(&vk_json, ProofPolicy::production()),
        Err(PermitError::Policy(_))
    ));
}

#[test]
fn production_policy_accepts_native_groth16_with_snarkjs_plonk() {
    init_tracing();
    let (pk, vk) = groth16_setup();
    let dir = tempfile::tempdir().unwrap();
    let plonk_vkey = dir.path().join("plonk_verification_key.json");
    std::fs::write(&plonk_vkey, r#"{"protocol":"plonk","curve":"bn128","nPublic":3}"#).unwrap();

    let verifiers = VerifierSet::new(
        Arc::new(Groth16Verifier::from_snarkjs_json(&render_groth16_vkey(&vk).unwrap()).unwrap()),
        Arc::new(SnarkjsVerifier::new(ProofSystem::Plonk, DEFAULT_SNARKJS_BINARY, &plonk_vkey).unwrap()),
    )
    .unwrap();
    let mut permit = ZkPermit::with_options(
        domain(),
        verifiers,
        FixedClock::new(NOW),
        PermitOptions {
            policy: ProofPolicy::production(),
            track_redeemed: true,
        },
    )
    .unwrap();
    register(&mut permit);

    let w = witness(&permit, U256::from(3u8), U256::from(NOW + 60));
    let proof = groth16_prove(&pk, &w.public_signals());
    permit.redeem_permit(&proof, &w.permit_request()).unwrap();
    assert_eq!(permit.allowance_of(owner(), spender()), U256::from(3u8));
}

#[test]
fn key_with_wrong_arity_is_refused() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(2989);
    let circuit = EchoCircuit {
        signals: vec![ark_bn254::Fr::from(0u64); 2],
    };
    let (_, vk) = <ark_groth16::Groth16<ark_bn254::Bn254> as ark_snark::CircuitSpecificSetupSNARK<
        ark_bn254::Fr,
    >>::setup(circuit, &mut rng)
    .unwrap();
    let vk_json = render_groth16_vkey(&vk).unwrap();
    assert!(matches!(
        native_ledger(&vk_json, ProofPolicy::development()),
        Err(PermitError::Verifier(_))
    ));
}

#[test]
fn ledger_from_yaml_config_with_native_key() {
    init_tracing();
    let (pk, vk) = groth16_setup();
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("keys")).unwrap();
    std::fs::write(
        dir.path().join("keys/verification_key.json"),
        render_groth16_vkey(&vk).unwrap(),
    )
    .unwrap();
    let config_path = dir.path().join("permit.yaml");
    std::fs::write(
        &config_path,
        r#"
domain:
  name: ZK-Coin
  version: "1"
  chain_id: 31337
  verifying_contract: "0x5FbDB2315678afecb367f032d93F642f64180aa3"
verifiers:
  groth16:
    kind: native
    vkey: keys/verification_key.json
  plonk:
    kind: mock
policy: development
"#,
    )
    .unwrap();

    let config = PermitConfig::load(&config_path).unwrap();
    assert_eq!(config.domain_context().unwrap(), domain());

    let verifiers = config.build_verifiers().unwrap();
    let mut permit = ZkPermit::with_options(
        config.domain_context().unwrap(),
        verifiers,
        FixedClock::new(NOW),
        PermitOptions {
            policy: ProofPolicy::development(),
            track_redeemed: config.track_redeemed,
        },
    )
    .unwrap();
    register(&mut permit);

    let w = witness(&permit, U256::from(5u8), U256::from(NOW + 60));
    let proof = groth16_prove(&pk, &w.public_signals());
    permit.redeem_permit(&proof, &w.permit_request()).unwrap();
    assert_eq!(permit.allowance_of(owner(), spender()), U256::from(5u8));
}
