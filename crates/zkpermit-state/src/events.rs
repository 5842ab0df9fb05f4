//! Observable events of the permit ledger, in emission order.

use serde::{Deserialize, Serialize};
use zkpermit_core::{Address, FieldElement, U256};

/// `Approval(owner, spender, value)`, as a token ledger emits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Approval {
    /// Account granting the allowance.
    pub owner: Address,
    /// Account receiving the allowance.
    pub spender: Address,
    /// New allowance.
    pub value: U256,
}

/// An entry in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PermitEvent {
    /// An account registered or replaced its user hash.
    UserHashRegistered {
        /// The registering account.
        account: Address,
        /// The new commitment.
        user_hash: FieldElement,
    },
    /// An allowance was set, by permit or by plain approval.
    Approval(Approval),
}

impl PermitEvent {
    /// The approval payload, if this is an approval.
    pub fn as_approval(&self) -> Option<&Approval> {
        match self {
            PermitEvent::Approval(a) => Some(a),
            PermitEvent::UserHashRegistered { .. } => None,
        }
    }
}
