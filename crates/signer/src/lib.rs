//! Key management and message signatures for the swap exercise.
//!
//! Two signer flavors exist: [`LocalWallet`] holds a secp256k1 key in process
//! and can authorize swaps by signature; [`NodeAccount`] stands for an account
//! whose key lives inside the ledger node; it can submit transactions but any
//! request for a message signature fails with
//! [`SignerError::SigningUnavailable`].

pub mod error;
pub mod signature;
pub mod wallet;

pub use error::SignerError;
pub use signature::{personal_message_hash, recover, Signature};
pub use wallet::{LocalWallet, NodeAccount, Signer};
