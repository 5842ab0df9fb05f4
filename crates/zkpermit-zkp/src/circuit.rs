//! # Permit Circuit Interface
//!
//! The off-chain side of a permit: [`PermitWitness`] holds the private
//! inputs and the hash chain computed from them. It renders the circuit's
//! `input.json` and yields the request and public signals a prover output
//! must match.
//!
//! The circuit itself is an external artifact (`.wasm` + `.zkey`). This
//! module only fixes the names and encodings of its inputs.

use std::fmt;

use serde::Serialize;
use zkpermit_core::{DomainContext, FieldElement, PermitRequest, TransferRequest, UserSecret};
use zkpermit_crypto::{CommitmentScheme, CryptoError, FieldHasher, HashChain};

use crate::signals::PublicSignals;

/// Private inputs of one permit proof, with their hash chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermitWitness {
    domain: DomainContext,
    secret: UserSecret,
    transfer: TransferRequest,
    chain: HashChain,
}

impl PermitWitness {
    /// Compute the hash chain and assemble the witness.
    pub fn build<H: FieldHasher>(
        scheme: &CommitmentScheme<H>,
        domain: DomainContext,
        secret: UserSecret,
        transfer: TransferRequest,
    ) -> Result<Self, CryptoError> {
        let chain = scheme.hash_chain(&domain, &secret, &transfer)?;
        Ok(Self {
            domain,
            secret,
            transfer,
            chain,
        })
    }

    /// The four hashes.
    pub fn chain(&self) -> &HashChain {
        &self.chain
    }

    /// The transfer this witness authorizes.
    pub fn transfer(&self) -> &TransferRequest {
        &self.transfer
    }

    /// The signals a proof of this witness exposes.
    pub fn public_signals(&self) -> PublicSignals {
        PublicSignals::from_chain(&self.chain)
    }

    /// The redemption request matching this witness.
    pub fn permit_request(&self) -> PermitRequest {
        PermitRequest {
            owner: self.secret.owner(),
            spender: self.transfer.spender,
            value: self.transfer.value.as_u256(),
            deadline: self.transfer.deadline.as_u256(),
            compound_hash: self.chain.compound_hash.as_u256(),
        }
    }

    /// The circuit's `input.json` document.
    pub fn circuit_inputs(&self) -> CircuitInputs {
        let [name, version, chain_id, contract_address] = self.domain.fields();
        let [password, salt, owner_address] = self.secret.fields();
        let [spender_address, value, deadline, nonce] = self.transfer.fields();
        CircuitInputs {
            name,
            version,
            chain_id,
            contract_address,
            password,
            salt,
            owner_address,
            spender_address,
            value,
            deadline,
            nonce,
            user_hash: self.chain.user_hash,
            compound_hash: self.chain.compound_hash,
        }
    }
}

/// Circuit input signals, serialized with the circuit's signal names.
/// Every value renders as a decimal string.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitInputs {
    pub name: FieldElement,
    pub version: FieldElement,
    pub chain_id: FieldElement,
    pub contract_address: FieldElement,
    pub password: FieldElement,
    pub salt: FieldElement,
    pub owner_address: FieldElement,
    pub spender_address: FieldElement,
    pub value: FieldElement,
    pub deadline: FieldElement,
    pub nonce: FieldElement,
    pub user_hash: FieldElement,
    pub compound_hash: FieldElement,
}

impl CircuitInputs {
    /// Render as `input.json`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Debug for CircuitInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitInputs")
            .field("password", &"[REDACTED]")
            .field("salt", &"[REDACTED]")
            .field("owner_address", &self.owner_address)
            .field("spender_address", &self.spender_address)
            .field("value", &self.value)
            .field("deadline", &self.deadline)
            .field("nonce", &self.nonce)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkpermit_core::{Address, U256};

    fn witness() -> PermitWitness {
        let owner = Address::repeat_byte(0x11);
        PermitWitness::build(
            &CommitmentScheme::new(),
            DomainContext::new("ZK-Coin", "1", 31337, Address::repeat_byte(0x33)).unwrap(),
            UserSecret::new("password", "salt", owner).unwrap(),
            TransferRequest::new(
                Address::repeat_byte(0x22),
                U256::from(9u8),
                FieldElement::MAX.as_u256(),
                0,
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn input_json_uses_circuit_signal_names() {
        let json: serde_json::Value =
            serde_json::from_str(&witness().circuit_inputs().to_json().unwrap()).unwrap();
        for key in [
            "name",
            "version",
            "chainId",
            "contractAddress",
            "password",
            "salt",
            "ownerAddress",
            "spenderAddress",
            "value",
            "deadline",
            "nonce",
            "userHash",
            "compoundHash",
        ] {
            assert!(json[key].is_string(), "missing or non-string {key}");
        }
        assert_eq!(json["value"], "9");
        assert_eq!(json["chainId"], "31337");
        assert_eq!(json["nonce"], "0");
    }

    #[test]
    fn permit_request_carries_the_compound_hash() {
        let w = witness();
        let request = w.permit_request();
        assert_eq!(request.owner, Address::repeat_byte(0x11));
        assert_eq!(request.value, U256::from(9u8));
        assert_eq!(request.deadline, FieldElement::MAX.as_u256());
        assert_eq!(request.compound_hash, w.chain().compound_hash.as_u256());
    }

    #[test]
    fn public_signals_match_chain() {
        let w = witness();
        let s = w.public_signals();
        assert_eq!(s.domain_hash, w.chain().domain_hash);
        assert_eq!(s.transfer_request_hash, w.chain().transfer_request_hash);
        assert_eq!(s.compound_hash, w.chain().compound_hash);
    }

    #[test]
    fn debug_output_redacts_secret() {
        let inputs = witness().circuit_inputs();
        let rendered = format!("{inputs:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains(&inputs.password.to_string()));
    }
}
