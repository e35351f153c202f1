use alloy_primitives::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    /// The explorer has not indexed the contract's bytecode yet. Retryable.
    #[error("bytecode at {address} is not indexed yet")]
    NotIndexed { address: Address },

    /// The source is already verified. Callers treat this as success.
    #[error("source at {address} is already verified")]
    AlreadyVerified { address: Address },

    /// The explorer rejected the submission outright.
    #[error("verification rejected: {0}")]
    Rejected(String),

    #[error("explorer returned a malformed response: {0}")]
    MalformedResponse(String),

    #[error("explorer transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
