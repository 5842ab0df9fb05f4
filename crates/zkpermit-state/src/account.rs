//! Per-account permit state.

use serde::{Deserialize, Serialize};
use zkpermit_core::FieldElement;

/// Registered commitment and nonce of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRecord {
    /// `H(password, salt, owner)` as registered by the owner.
    pub user_hash: FieldElement,
    /// Number of permits redeemed so far.
    pub nonce: u64,
}

/// Lifecycle state of an account.
///
/// `Unregistered → Registered(userHash, 0) → Registered(userHash', k)`.
/// There is no terminal state. Re-registration replaces the user hash and
/// keeps the nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AccountState {
    /// Never registered.
    Unregistered,
    /// Holds a user hash.
    Registered {
        /// Current commitment.
        user_hash: FieldElement,
        /// Current nonce.
        nonce: u64,
    },
}

impl AccountState {
    /// Whether a user hash is registered.
    pub fn is_registered(&self) -> bool {
        matches!(self, AccountState::Registered { .. })
    }
}

impl From<Option<&UserRecord>> for AccountState {
    fn from(record: Option<&UserRecord>) -> Self {
        match record {
            Some(r) => AccountState::Registered {
                user_hash: r.user_hash,
                nonce: r.nonce,
            },
            None => AccountState::Unregistered,
        }
    }
}
