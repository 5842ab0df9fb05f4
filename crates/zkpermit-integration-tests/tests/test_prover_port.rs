//! # Prover Port
//!
//! Proof generation is asynchronous and decoupled from the ledger. These
//! tests drive the `Prover` trait the way an off-chain job would, then
//! hand the result to the ledger.

mod common;

use std::sync::Arc;

use common::*;
use zkpermit_core::{FixedClock, U256};
use zkpermit_state::{PermitOptions, ZkPermit};
use zkpermit_zkp::{MockProver, ProofPolicy, ProofSystem, ProvedPermit, Prover};

async fn prove_with<P: Prover>(prover: &P, w: &zkpermit_zkp::PermitWitness) -> ProvedPermit {
    prover.prove(w).await.unwrap()
}

#[tokio::test]
async fn proving_job_feeds_the_ledger() {
    init_tracing();
    let mut permit = ZkPermit::with_options(
        domain(),
        mock_verifiers(),
        Arc::new(FixedClock::new(NOW)),
        PermitOptions {
            policy: ProofPolicy::development(),
            track_redeemed: true,
        },
    )
    .unwrap();
    register(&mut permit);

    let w = witness(&permit, U256::from(42u8), U256::from(NOW + 300));
    let prover = MockProver::new(ProofSystem::Plonk);
    let proved = prove_with(&prover, &w).await;

    assert_eq!(proved.request.value, U256::from(42u8));
    permit.redeem_permit(&proved.proof, &proved.request).unwrap();
    assert_eq!(permit.allowance_of(owner(), spender()), U256::from(42u8));
}

#[tokio::test]
async fn stale_proof_from_slow_job_is_rejected() {
    init_tracing();
    let mut permit = ZkPermit::with_options(
        domain(),
        mock_verifiers(),
        Arc::new(FixedClock::new(NOW)),
        PermitOptions {
            policy: ProofPolicy::development(),
            track_redeemed: false,
        },
    )
    .unwrap();
    register(&mut permit);

    let prover = MockProver::new(ProofSystem::Groth16);
    let slow = prove_with(&prover, &witness(&permit, U256::from(1u8), U256::from(NOW + 60))).await;
    let fast = prove_with(&prover, &witness(&permit, U256::from(2u8), U256::from(NOW + 60))).await;

    permit.redeem_permit(&fast.proof, &fast.request).unwrap();
    assert_eq!(
        permit.redeem_permit(&slow.proof, &slow.request),
        Err(zkpermit_state::PermitError::ProofInvalid)
    );
    assert_eq!(permit.nonce_of(owner()), 1);
}
