//! # Commitment Scheme
//!
//! Composes the [`FieldHasher`] into the four named hashes of the permit
//! protocol:
//!
//! ```text
//! DomainHash          = H(name, version, chainId, contractAddress)
//! UserHash            = H(password, salt, ownerAddress)
//! TransferRequestHash = H(spenderAddress, value, deadline, nonce)
//! CompoundHash        = H(DomainHash, UserHash, TransferRequestHash)
//! ```
//!
//! Stateless and referentially transparent; safe to share across
//! concurrent redemption attempts.
//!
//! ## Security Invariant
//!
//! Operand order is fixed by the `fields()` accessors of the core types and
//! by [`CommitmentScheme::compound_hash`]'s signature. `TransferRequestHash`
//! binds the nonce, so once the owner nonce advances no current state can
//! reproduce an old `CompoundHash`.

use zkpermit_core::{DomainContext, FieldElement, TransferRequest, UserSecret};

use crate::error::CryptoError;
use crate::poseidon::{CircomPoseidon, FieldHasher};

/// The four hashes of one permit, in chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashChain {
    /// `H(name, version, chainId, contractAddress)`.
    pub domain_hash: FieldElement,
    /// `H(password, salt, ownerAddress)`.
    pub user_hash: FieldElement,
    /// `H(spenderAddress, value, deadline, nonce)`.
    pub transfer_request_hash: FieldElement,
    /// `H(DomainHash, UserHash, TransferRequestHash)`.
    pub compound_hash: FieldElement,
}

/// The permit commitment functions over a chosen hasher.
#[derive(Debug, Clone, Default)]
pub struct CommitmentScheme<H = CircomPoseidon> {
    hasher: H,
}

impl CommitmentScheme<CircomPoseidon> {
    /// The protocol's scheme: circom Poseidon over BN254.
    pub fn new() -> Self {
        Self {
            hasher: CircomPoseidon,
        }
    }
}

impl<H: FieldHasher> CommitmentScheme<H> {
    /// Use a custom hasher.
    pub fn with_hasher(hasher: H) -> Self {
        Self { hasher }
    }

    /// `H(name, version, chainId, contractAddress)`.
    pub fn domain_hash(&self, domain: &DomainContext) -> Result<FieldElement, CryptoError> {
        self.hasher.hash(&domain.fields())
    }

    /// `H(password, salt, ownerAddress)`.
    pub fn user_hash(&self, secret: &UserSecret) -> Result<FieldElement, CryptoError> {
        self.hasher.hash(&secret.fields())
    }

    /// `H(spenderAddress, value, deadline, nonce)`.
    pub fn transfer_request_hash(
        &self,
        request: &TransferRequest,
    ) -> Result<FieldElement, CryptoError> {
        self.hasher.hash(&request.fields())
    }

    /// `H(DomainHash, UserHash, TransferRequestHash)`.
    pub fn compound_hash(
        &self,
        domain_hash: FieldElement,
        user_hash: FieldElement,
        transfer_request_hash: FieldElement,
    ) -> Result<FieldElement, CryptoError> {
        self.hasher
            .hash(&[domain_hash, user_hash, transfer_request_hash])
    }

    /// Compute all four hashes from the private inputs.
    pub fn hash_chain(
        &self,
        domain: &DomainContext,
        secret: &UserSecret,
        request: &TransferRequest,
    ) -> Result<HashChain, CryptoError> {
        let domain_hash = self.domain_hash(domain)?;
        let user_hash = self.user_hash(secret)?;
        let transfer_request_hash = self.transfer_request_hash(request)?;
        let compound_hash = self.compound_hash(domain_hash, user_hash, transfer_request_hash)?;
        Ok(HashChain {
            domain_hash,
            user_hash,
            transfer_request_hash,
            compound_hash,
        })
    }
}
