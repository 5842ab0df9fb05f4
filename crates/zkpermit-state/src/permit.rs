//! # Permit State Machine
//!
//! A token ledger's allowance path, authorized by zero-knowledge proof
//! instead of a signature. The owner registers `UserHash = H(password,
//! salt, owner)` once. Later, anyone holding a proof that the owner knows
//! the preimage can redeem a time-bounded, single-use allowance grant.
//!
//! ## Redemption
//!
//! Checks run in a fixed order, cheapest first; the first failure aborts
//! with no state change:
//!
//! ```text
//! 1. now > deadline                     → PermitExpired
//! 2. deadline ≥ P                       → DeadlineTooHigh
//! 3. value > 2^128 - 1                  → ValueTooHigh
//! 4. compoundHash ≥ P                   → CompoundHashTooHigh
//! 5. recompute chain from stored state  → ProofInvalid on mismatch
//! 6. verify(proof, public signals)      → ProofInvalid on false
//! 7. nonce += 1; allowance = value; emit Approval
//! ```
//!
//! ## Security Invariant
//!
//! Step 5 uses the *stored* user hash, the deployment domain and the
//! *current* nonce. Once the nonce advances, no request can reproduce an
//! old `CompoundHash`, so resubmitting a redeemed proof fails with
//! `ProofInvalid`. The optional redeemed-hash set is a second, explicit
//! guard on top of that.
//!
//! Transitions take `&mut self`: the host ledger serializes calls, so no
//! two redemptions observe the same pre-increment nonce.

use std::collections::{HashMap, HashSet};

use zkpermit_core::{
    Address, Clock, DomainContext, FieldElement, PermitRequest, SystemClock, TransferRequest, U256,
    MAX_PERMIT_VALUE,
};
use zkpermit_crypto::CommitmentScheme;
use zkpermit_zkp::{
    Proof, ProofPolicy, ProofSystem, PublicSignals, VerifierSet, VerifyError, PUBLIC_SIGNAL_COUNT,
};

use crate::account::{AccountState, UserRecord};
use crate::error::PermitError;
use crate::events::{Approval, PermitEvent};

/// Construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermitOptions {
    /// Which verifier backends are acceptable.
    pub policy: ProofPolicy,
    /// Also keep an explicit set of redeemed compound hashes.
    pub track_redeemed: bool,
}

impl Default for PermitOptions {
    fn default() -> Self {
        Self {
            policy: ProofPolicy::from_environment(),
            track_redeemed: false,
        }
    }
}

/// The permit ledger of one deployment.
#[derive(Debug)]
pub struct ZkPermit<C: Clock = SystemClock> {
    domain: DomainContext,
    domain_hash: FieldElement,
    scheme: CommitmentScheme,
    verifiers: VerifierSet,
    clock: C,
    policy: ProofPolicy,
    users: HashMap<Address, UserRecord>,
    allowances: HashMap<(Address, Address), U256>,
    redeemed: Option<HashSet<FieldElement>>,
    events: Vec<PermitEvent>,
}

impl ZkPermit<SystemClock> {
    /// A ledger on wall-clock time with default options.
    pub fn new(domain: DomainContext, verifiers: VerifierSet) -> Result<Self, PermitError> {
        Self::with_options(domain, verifiers, SystemClock, PermitOptions::default())
    }
}

impl<C: Clock> ZkPermit<C> {
    /// A ledger on `clock` with default options.
    pub fn with_clock(
        domain: DomainContext,
        verifiers: VerifierSet,
        clock: C,
    ) -> Result<Self, PermitError> {
        Self::with_options(domain, verifiers, clock, PermitOptions::default())
    }

    /// A ledger with explicit options.
    ///
    /// Fails if a verifier backend is not allowed by `options.policy` or
    /// expects a public-signal count other than the permit layout.
    pub fn with_options(
        domain: DomainContext,
        verifiers: VerifierSet,
        clock: C,
        options: PermitOptions,
    ) -> Result<Self, PermitError> {
        verifiers.validate_policy(&options.policy)?;
        verifiers.ensure_arity(PUBLIC_SIGNAL_COUNT)?;
        let scheme = CommitmentScheme::new();
        let domain_hash = scheme.domain_hash(&domain)?;
        tracing::info!(
            domain_hash = %domain_hash,
            policy = ?options.policy.mode(),
            groth16 = verifiers.get(ProofSystem::Groth16).backend().name(),
            plonk = verifiers.get(ProofSystem::Plonk).backend().name(),
            "permit ledger initialized"
        );
        Ok(Self {
            domain,
            domain_hash,
            scheme,
            verifiers,
            clock,
            policy: options.policy,
            users: HashMap::new(),
            allowances: HashMap::new(),
            redeemed: options.track_redeemed.then(HashSet::new),
            events: Vec::new(),
        })
    }

    // ─── Registration ───────────────────────────────────────────────

    /// Register or replace `caller`'s user hash. The nonce is kept.
    pub fn register_user_hash(
        &mut self,
        caller: Address,
        user_hash: FieldElement,
    ) -> Result<(), PermitError> {
        if caller.is_zero() {
            return Err(PermitError::InvalidAccount(caller));
        }
        let record = self.users.entry(caller).or_insert(UserRecord {
            user_hash,
            nonce: 0,
        });
        record.user_hash = user_hash;
        tracing::info!(account = %caller, nonce = record.nonce, "user hash registered");
        self.events.push(PermitEvent::UserHashRegistered {
            account: caller,
            user_hash,
        });
        Ok(())
    }

    // ─── Redemption ─────────────────────────────────────────────────

    /// Redeem a permit, verifying with the backend named by the proof's
    /// variant.
    pub fn redeem_permit(
        &mut self,
        proof: &Proof,
        request: &PermitRequest,
    ) -> Result<Approval, PermitError> {
        self.redeem(proof.system(), proof, request)
    }

    /// Redeem a permit through the Groth16 entry point.
    pub fn redeem_permit_groth16(
        &mut self,
        proof: &Proof,
        request: &PermitRequest,
    ) -> Result<Approval, PermitError> {
        self.redeem(ProofSystem::Groth16, proof, request)
    }

    /// Redeem a permit through the PLONK entry point.
    pub fn redeem_permit_plonk(
        &mut self,
        proof: &Proof,
        request: &PermitRequest,
    ) -> Result<Approval, PermitError> {
        self.redeem(ProofSystem::Plonk, proof, request)
    }

    fn redeem(
        &mut self,
        system: ProofSystem,
        proof: &Proof,
        request: &PermitRequest,
    ) -> Result<Approval, PermitError> {
        let now = self.clock.now_secs();
        if U256::from(now) > request.deadline {
            return Err(reject(request, "deadline passed", PermitError::PermitExpired));
        }
        let deadline = FieldElement::new(request.deadline)
            .map_err(|_| reject(request, "deadline out of field", PermitError::DeadlineTooHigh))?;
        if request.value > MAX_PERMIT_VALUE {
            return Err(reject(request, "value above maximum", PermitError::ValueTooHigh));
        }
        let value = FieldElement::new(request.value)
            .map_err(|_| reject(request, "value above maximum", PermitError::ValueTooHigh))?;
        let claimed = FieldElement::new(request.compound_hash).map_err(|_| {
            reject(
                request,
                "compound hash out of field",
                PermitError::CompoundHashTooHigh,
            )
        })?;

        let Some(record) = self.users.get(&request.owner).copied() else {
            return Err(reject(request, "owner not registered", PermitError::ProofInvalid));
        };

        let transfer = TransferRequest {
            spender: request.spender,
            value,
            deadline,
            nonce: FieldElement::from_u64(record.nonce),
        };
        let transfer_request_hash = self
            .scheme
            .transfer_request_hash(&transfer)
            .map_err(|e| reject(request, "hashing failed", e.into()))?;
        let compound_hash = self
            .scheme
            .compound_hash(self.domain_hash, record.user_hash, transfer_request_hash)
            .map_err(|e| reject(request, "hashing failed", e.into()))?;
        if compound_hash != claimed {
            return Err(reject(request, "compound hash mismatch", PermitError::ProofInvalid));
        }
        if self
            .redeemed
            .as_ref()
            .is_some_and(|set| set.contains(&compound_hash))
        {
            return Err(reject(
                request,
                "compound hash already redeemed",
                PermitError::ProofInvalid,
            ));
        }

        let signals = PublicSignals {
            domain_hash: self.domain_hash,
            transfer_request_hash,
            compound_hash,
        };
        let valid = self
            .verifiers
            .get(system)
            .verify(proof, &signals.to_vec(system))
            .map_err(|e| reject(request, "verifier backend failed", e.into()))?;
        if !valid {
            return Err(reject(
                request,
                "proof rejected by verifier",
                PermitError::ProofInvalid,
            ));
        }

        let next_nonce = record
            .nonce
            .checked_add(1)
            .ok_or_else(|| {
                reject(
                    request,
                    "nonce exhausted",
                    PermitError::NonceExhausted(request.owner),
                )
            })?;

        // Commit. Nothing below can fail.
        if let Some(entry) = self.users.get_mut(&request.owner) {
            entry.nonce = next_nonce;
        }
        if let Some(set) = self.redeemed.as_mut() {
            set.insert(compound_hash);
        }
        let approval = self.set_allowance(request.owner, request.spender, request.value);
        tracing::info!(
            owner = %request.owner,
            spender = %request.spender,
            value = %request.value,
            nonce = next_nonce,
            system = %system,
            "permit redeemed"
        );
        Ok(approval)
    }

    // ─── Plain Allowance ────────────────────────────────────────────

    /// Set an allowance directly, as the owner. Does not touch the nonce.
    pub fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
    ) -> Result<Approval, PermitError> {
        for account in [owner, spender] {
            if account.is_zero() {
                return Err(PermitError::InvalidAccount(account));
            }
        }
        Ok(self.set_allowance(owner, spender, value))
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, value: U256) -> Approval {
        self.allowances.insert((owner, spender), value);
        let approval = Approval {
            owner,
            spender,
            value,
        };
        self.events.push(PermitEvent::Approval(approval));
        approval
    }

    // ─── Queries ────────────────────────────────────────────────────

    /// Number of permits `account` has redeemed.
    pub fn nonce_of(&self, account: Address) -> u64 {
        self.users.get(&account).map_or(0, |r| r.nonce)
    }

    /// Allowance from `owner` to `spender`.
    pub fn allowance_of(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Registered user hash of `account`.
    pub fn user_hash_of(&self, account: Address) -> Option<FieldElement> {
        self.users.get(&account).map(|r| r.user_hash)
    }

    /// Lifecycle state of `account`.
    pub fn account_state(&self, account: Address) -> AccountState {
        AccountState::from(self.users.get(&account))
    }

    /// All events, oldest first.
    pub fn events(&self) -> &[PermitEvent] {
        &self.events
    }

    /// The deployment domain.
    pub fn domain(&self) -> &DomainContext {
        &self.domain
    }

    /// `H(name, version, chainId, contractAddress)` of this deployment.
    pub fn domain_hash(&self) -> FieldElement {
        self.domain_hash
    }

    /// The policy the verifiers were admitted under.
    pub fn policy(&self) -> ProofPolicy {
        self.policy
    }

    // ─── Verifier Entry Points ──────────────────────────────────────

    /// Verify with the backend named by the proof's variant.
    pub fn verify_proof(
        &self,
        proof: &Proof,
        public_signals: &[FieldElement],
    ) -> Result<bool, VerifyError> {
        self.verifiers.verify(proof, public_signals)
    }

    /// Verify with the Groth16 backend. PLONK proofs return `false`.
    pub fn verify_groth16(
        &self,
        proof: &Proof,
        public_signals: &[FieldElement],
    ) -> Result<bool, VerifyError> {
        self.verifiers.verify_groth16(proof, public_signals)
    }

    /// Verify with the PLONK backend. Groth16 proofs return `false`.
    pub fn verify_plonk(
        &self,
        proof: &Proof,
        public_signals: &[FieldElement],
    ) -> Result<bool, VerifyError> {
        self.verifiers.verify_plonk(proof, public_signals)
    }
}

fn reject(request: &PermitRequest, reason: &'static str, error: PermitError) -> PermitError {
    tracing::warn!(
        owner = %request.owner,
        spender = %request.spender,
        reason,
        error = %error,
        "permit redemption rejected"
    );
    error
}
