//! 65-byte recoverable signatures under the ledger's personal-message
//! convention.

use alloy_primitives::{Address, B256};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use sha3::{Digest, Keccak256};

use crate::error::SignerError;

/// Domain-separation prefix applied before a 32-byte digest is signed.
const PERSONAL_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// The hash that is actually fed to ECDSA: `keccak256(prefix || digest)`.
///
/// The escrow's recovery logic applies the same prefix on-chain, so signing
/// the raw digest directly would never validate.
pub fn personal_message_hash(digest: B256) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_PREFIX);
    hasher.update(digest.as_slice());
    let hash: [u8; 32] = hasher.finalize().into();
    B256::from(hash)
}

/// A recoverable ECDSA signature serialized as `r || s || v`, `v ∈ {27, 28}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    bytes: [u8; 65],
}

impl Signature {
    pub(crate) fn from_parts(signature: &EcdsaSignature, recovery_id: RecoveryId) -> Self {
        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&signature.to_bytes());
        bytes[64] = recovery_id.to_byte() + 27;
        Self { bytes }
    }

    /// Parse a signature from its 65-byte wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignerError> {
        let bytes: [u8; 65] = bytes.try_into().map_err(|_| {
            SignerError::MalformedSignature(format!("expected 65 bytes, got {}", bytes.len()))
        })?;
        if bytes[64] != 27 && bytes[64] != 28 {
            return Err(SignerError::MalformedSignature(format!(
                "recovery byte {} out of range",
                bytes[64]
            )));
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.bytes
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    pub fn v(&self) -> u8 {
        self.bytes[64]
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.bytes))
    }
}

/// Recover the signing address from a digest and a signature over it.
///
/// Applies the same personal-message prefix as the signing side, so the
/// digest passed here is the raw swap digest, not the prefixed hash.
pub fn recover(digest: B256, signature: &Signature) -> Result<Address, SignerError> {
    let prehash = personal_message_hash(digest);
    let recovery_id = RecoveryId::from_byte(signature.v() - 27)
        .ok_or_else(|| SignerError::MalformedSignature("bad recovery byte".into()))?;
    let ecdsa = EcdsaSignature::from_slice(&signature.as_bytes()[..64])
        .map_err(|e| SignerError::MalformedSignature(e.to_string()))?;
    let key = VerifyingKey::recover_from_prehash(prehash.as_slice(), &ecdsa, recovery_id)
        .map_err(|e| SignerError::Recovery(e.to_string()))?;
    Ok(key_address(&key))
}

/// Ledger address of a public key: last 20 bytes of the keccak-256 hash of
/// the uncompressed point, tag byte dropped.
pub(crate) fn key_address(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let mut hasher = Keccak256::new();
    hasher.update(&point.as_bytes()[1..]);
    let hash: [u8; 32] = hasher.finalize().into();
    Address::from_slice(&hash[12..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_validates_length_and_recovery_byte() {
        assert!(Signature::from_bytes(&[0u8; 64]).is_err());

        let mut bytes = [0u8; 65];
        bytes[64] = 3;
        assert!(Signature::from_bytes(&bytes).is_err());

        bytes[64] = 27;
        let sig = Signature::from_bytes(&bytes).unwrap();
        assert_eq!(sig.v(), 27);
        assert_eq!(sig.to_vec().len(), 65);
    }

    #[test]
    fn personal_message_hash_differs_from_digest() {
        let digest = B256::repeat_byte(0x11);
        let hashed = personal_message_hash(digest);
        assert_ne!(hashed, digest);
        assert_eq!(hashed, personal_message_hash(digest));
    }
}
