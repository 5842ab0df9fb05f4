//! # zkpermit-core — Foundational Types for ZK-Permit
//!
//! The leaf of the workspace DAG. Defines the value types every other crate
//! speaks in:
//!
//! - [`FieldElement`] — an integer strictly below the BN254 scalar modulus.
//!   Out-of-field values are rejected at construction, never reduced
//!   silently.
//! - [`DomainContext`], [`UserSecret`], [`TransferRequest`] — the operands of
//!   the permit hash chain, each exposing its operands in hash order.
//! - [`PermitRequest`] — the unvalidated redemption request.
//! - [`Clock`] — injectable unix-seconds time source.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `zkpermit-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod domain;
pub mod error;
pub mod field;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use alloy_primitives::{Address, U256};
pub use domain::{DomainContext, PermitRequest, TransferRequest, UserSecret, MAX_PERMIT_VALUE};
pub use error::CoreError;
pub use field::{is_canonical, FieldElement, FieldError, FIELD_MODULUS};
pub use temporal::{Clock, FixedClock, SystemClock};
