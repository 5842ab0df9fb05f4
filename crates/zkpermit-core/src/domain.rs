//! # Permit Domain Types
//!
//! The values that feed the permit hash chain:
//!
//! - [`DomainContext`] — identifies one verifying contract instance on one
//!   chain. Immutable per deployment.
//! - [`UserSecret`] — the holder's off-chain secret. Never stored.
//! - [`TransferRequest`] — spender, value, deadline and the nonce the proof
//!   is bound to.
//! - [`PermitRequest`] — what a caller submits for redemption, carried as
//!   raw 256-bit integers so that bound checks happen in the state machine.
//!
//! ## Security Invariant
//!
//! Every accessor that returns circuit inputs returns them in the fixed
//! operand order of the hash they feed. Reordering operands breaks
//! cross-verification between the prover and the redeeming ledger.

use std::fmt;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::field::FieldElement;

/// Largest transfer value a permit may grant: `2^128 - 1`.
pub const MAX_PERMIT_VALUE: U256 = U256::from_limbs([u64::MAX, u64::MAX, 0, 0]);

/// Identifies the verifying contract instance. Binding it into every proof
/// prevents cross-contract and cross-chain replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainContext {
    /// Token name, short-string encoded.
    pub name: FieldElement,
    /// Token version, short-string encoded.
    pub version: FieldElement,
    /// Chain identifier.
    pub chain_id: FieldElement,
    /// Address of the verifying contract.
    pub verifying_contract: FieldElement,
}

impl DomainContext {
    /// Build a domain from its human-readable parts.
    pub fn new(
        name: &str,
        version: &str,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            name: FieldElement::from_short_string(name)?,
            version: FieldElement::from_short_string(version)?,
            chain_id: FieldElement::from_u64(chain_id),
            verifying_contract: FieldElement::from_address(verifying_contract),
        })
    }

    /// Operands of `DomainHash`, in order.
    pub fn fields(&self) -> [FieldElement; 4] {
        [self.name, self.version, self.chain_id, self.verifying_contract]
    }
}

/// The holder's secret. Used only off-chain to compute `UserHash`.
#[derive(Clone, PartialEq, Eq)]
pub struct UserSecret {
    password: FieldElement,
    salt: FieldElement,
    owner: Address,
}

impl UserSecret {
    /// Build a secret from short-string password and salt.
    pub fn new(password: &str, salt: &str, owner: Address) -> Result<Self, CoreError> {
        Ok(Self {
            password: FieldElement::from_short_string(password)?,
            salt: FieldElement::from_short_string(salt)?,
            owner,
        })
    }

    /// Build a secret from already-encoded field elements.
    pub fn from_fields(password: FieldElement, salt: FieldElement, owner: Address) -> Self {
        Self {
            password,
            salt,
            owner,
        }
    }

    /// The account this secret belongs to.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Operands of `UserHash`, in order.
    pub fn fields(&self) -> [FieldElement; 3] {
        [self.password, self.salt, FieldElement::from_address(self.owner)]
    }
}

impl fmt::Debug for UserSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserSecret")
            .field("password", &"[REDACTED]")
            .field("salt", &"[REDACTED]")
            .field("owner", &self.owner)
            .finish()
    }
}

/// Spender, value, deadline and nonce bound into `TransferRequestHash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Account receiving the allowance.
    pub spender: Address,
    /// Allowance amount, at most [`MAX_PERMIT_VALUE`].
    pub value: FieldElement,
    /// Unix-seconds deadline.
    pub deadline: FieldElement,
    /// Owner nonce at proof-generation time.
    pub nonce: FieldElement,
}

impl TransferRequest {
    /// Validate raw integers and build a transfer request.
    pub fn new(spender: Address, value: U256, deadline: U256, nonce: u64) -> Result<Self, CoreError> {
        if value > MAX_PERMIT_VALUE {
            return Err(CoreError::ValueTooHigh(value));
        }
        Ok(Self {
            spender,
            value: FieldElement::new(value)?,
            deadline: FieldElement::new(deadline)?,
            nonce: FieldElement::from_u64(nonce),
        })
    }

    /// Operands of `TransferRequestHash`, in order.
    pub fn fields(&self) -> [FieldElement; 4] {
        [
            FieldElement::from_address(self.spender),
            self.value,
            self.deadline,
            self.nonce,
        ]
    }
}

/// A redemption request as submitted by a caller.
///
/// Fields are unvalidated 256-bit integers; the permit state machine owns
/// the bound checks and the order they run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermitRequest {
    /// Account granting the allowance.
    pub owner: Address,
    /// Account receiving the allowance.
    pub spender: Address,
    /// Allowance amount.
    pub value: U256,
    /// Unix-seconds deadline.
    pub deadline: U256,
    /// Claimed `CompoundHash`; must match the recomputed chain.
    pub compound_hash: U256,
}
