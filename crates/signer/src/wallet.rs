//! Signer seam and its two implementations.

use alloy_primitives::{Address, B256};
use k256::ecdsa::SigningKey;

use swaplab_types::SwapOrder;

use crate::error::SignerError;
use crate::signature::{key_address, personal_message_hash, Signature};

/// An identity that can authorize swap terms.
///
/// `sign_digest` applies the personal-message convention internally; callers
/// hand it the raw swap digest.
pub trait Signer {
    fn address(&self) -> Address;

    /// Produce a recoverable signature over a 32-byte digest.
    fn sign_digest(&self, digest: B256) -> Result<Signature, SignerError>;

    /// Sign the canonical digest of a swap order.
    fn sign_order(&self, order: &SwapOrder) -> Result<Signature, SignerError> {
        self.sign_digest(order.digest())
    }
}

/// A secp256k1 key held in process.
#[derive(Clone)]
pub struct LocalWallet {
    signing_key: SigningKey,
    address: Address,
}

impl LocalWallet {
    /// Generate a fresh keypair. No network interaction.
    pub fn random() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        let address = key_address(signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, SignerError> {
        let signing_key = SigningKey::from_bytes(bytes.into())
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        let address = key_address(signing_key.verifying_key());
        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Raw private key bytes. Exposed because the exercise hands generated
    /// account credentials back to the operator.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes().into()
    }

    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Signer for LocalWallet {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_digest(&self, digest: B256) -> Result<Signature, SignerError> {
        let prehash = personal_message_hash(digest);
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(prehash.as_slice())
            .map_err(|e| SignerError::Recovery(e.to_string()))?;
        Ok(Signature::from_parts(&signature, recovery_id))
    }
}

/// An account managed by the ledger node. It has an address and can be named
/// as a transaction sender, but no key material is reachable from here.
#[derive(Debug, Clone, Copy)]
pub struct NodeAccount {
    address: Address,
}

impl NodeAccount {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl Signer for NodeAccount {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_digest(&self, _digest: B256) -> Result<Signature, SignerError> {
        Err(SignerError::SigningUnavailable {
            address: self.address,
        })
    }
}
