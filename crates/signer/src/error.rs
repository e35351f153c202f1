use alloy_primitives::Address;

#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// The signer has no accessible private key, so it cannot produce a
    /// personal-message signature. Submitting transactions may still work.
    #[error("account {address} holds no local key and cannot sign messages")]
    SigningUnavailable { address: Address },

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("signature recovery failed: {0}")]
    Recovery(String),
}
