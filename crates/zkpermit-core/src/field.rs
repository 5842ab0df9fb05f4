//! # Field Elements — BN254 Scalar Field
//!
//! Defines [`FieldElement`], an unsigned integer strictly below the BN254
//! scalar-field modulus `P`. Every hash output, nonce, address, value and
//! deadline that enters the permit circuit is one of these.
//!
//! ## Security Invariant
//!
//! Values `>= P` are **rejected at construction**. There is no silent
//! reduction on the way in: a deadline or compound hash that does not fit
//! the field would desynchronize the on-chain recomputation from what the
//! circuit saw. Callers that genuinely want `v mod P` must ask for it via
//! [`FieldElement::reduce`].
//!
//! ## Encoding
//!
//! Field elements render in decimal, matching the snarkjs `public.json` and
//! `input.json` conventions. Parsing accepts decimal or `0x`-prefixed hex.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The BN254 scalar-field modulus
/// `21888242871839275222246405745257275088548364400416034343698204186575808495617`.
pub const FIELD_MODULUS: U256 = U256::from_limbs([
    0x43e1_f593_f000_0001,
    0x2833_e848_79b9_7091,
    0xb850_45b6_8181_585d,
    0x3064_4e72_e131_a029,
]);

/// Errors from constructing or parsing a [`FieldElement`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The value is not strictly below the field modulus.
    #[error("value {0} is not below the field modulus")]
    OutOfRange(U256),

    /// The string is not a decimal or `0x` hex integer.
    #[error("cannot parse field element from {input:?}: {reason}")]
    Parse {
        /// The rejected input.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A short string does not fit in a single 32-byte word.
    #[error("string of {0} bytes does not fit in a 32-byte field word")]
    StringTooLong(usize),
}

/// An integer in `[0, P)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldElement(U256);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self(U256::ZERO);

    /// The largest representable element, `P - 1`.
    pub const MAX: Self = Self(U256::from_limbs([
        0x43e1_f593_f000_0000,
        0x2833_e848_79b9_7091,
        0xb850_45b6_8181_585d,
        0x3064_4e72_e131_a029,
    ]));

    /// Wrap a 256-bit integer, rejecting values `>= P`.
    pub fn new(value: U256) -> Result<Self, FieldError> {
        if is_canonical(&value) {
            Ok(Self(value))
        } else {
            Err(FieldError::OutOfRange(value))
        }
    }

    /// Canonicalize an arbitrary 256-bit integer by reducing it mod `P`.
    pub fn reduce(value: U256) -> Self {
        Self(value % FIELD_MODULUS)
    }

    /// Embed a machine integer. Always below `P`.
    pub fn from_u64(value: u64) -> Self {
        Self(U256::from(value))
    }

    /// Embed a 20-byte account address by its integer value.
    pub fn from_address(address: Address) -> Self {
        Self(U256::from_be_slice(address.as_slice()))
    }

    /// Encode an ASCII string as a left-zero-padded 32-byte big-endian word.
    ///
    /// `"ZK-Coin"` becomes `0x00..005a4b2d436f696e`. Strings longer than 32
    /// bytes are rejected, and so are 32-byte strings whose integer value
    /// lands at or above `P`.
    pub fn from_short_string(s: &str) -> Result<Self, FieldError> {
        let bytes = s.as_bytes();
        if bytes.len() > 32 {
            return Err(FieldError::StringTooLong(bytes.len()));
        }
        Self::new(U256::from_be_slice(bytes))
    }

    /// Parse a decimal or `0x`-prefixed hex string.
    pub fn parse(s: &str) -> Result<Self, FieldError> {
        let trimmed = s.trim();
        let value = U256::from_str(trimmed).map_err(|e| FieldError::Parse {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Self::new(value)
    }

    /// The underlying 256-bit integer.
    pub fn as_u256(&self) -> U256 {
        self.0
    }

    /// Big-endian 32-byte encoding.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0.to_be_bytes::<32>()
    }

    /// Lowercase `0x`-prefixed, zero-padded 64-digit hex.
    pub fn to_hex(&self) -> String {
        let digits: String = self.to_be_bytes().iter().map(|b| format!("{b:02x}")).collect();
        format!("0x{digits}")
    }
}

/// Whether `value` is strictly below the field modulus.
pub fn is_canonical(value: &U256) -> bool {
    *value < FIELD_MODULUS
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FieldElement {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<U256> for FieldElement {
    type Error = FieldError;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for FieldElement {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FieldElement> for U256 {
    fn from(value: FieldElement) -> Self {
        value.0
    }
}

impl From<FieldElement> for String {
    fn from(value: FieldElement) -> Self {
        value.to_string()
    }
}

impl From<Address> for FieldElement {
    fn from(address: Address) -> Self {
        Self::from_address(address)
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}
