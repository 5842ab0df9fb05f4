//! # zkpermit-state — Permit State Machine
//!
//! The on-ledger half of ZK-Permit.
//!
//! - **Permit** ([`permit`]): [`ZkPermit`] holds registered user hashes,
//!   nonces and allowances, and redeems proofs into allowance grants.
//! - **Accounts** ([`account`]): `Unregistered → Registered(userHash, k)`.
//! - **Events** ([`events`]): `UserHashRegistered` and `Approval`.
//! - **Config** ([`config`]): YAML deployment description and verifier
//!   construction.
//!
//! ## Crate Policy
//!
//! - A failed transition leaves no trace in state.
//! - Every rejected redemption is logged with a `reason`, including the
//!   reasons that collapse into `ProofInvalid`.

pub mod account;
pub mod config;
pub mod error;
pub mod events;
pub mod permit;

pub use account::{AccountState, UserRecord};
pub use config::{BackendConfig, ConfigError, DomainConfig, PermitConfig, VerifiersConfig};
pub use error::PermitError;
pub use events::{Approval, PermitEvent};
pub use permit::{PermitOptions, ZkPermit};
