//! Contract source verification.
//!
//! Explorers index freshly deployed bytecode asynchronously, so a
//! verification request races the indexer. [`Retrier`] absorbs that race:
//! not-yet-indexed responses are retried on a fixed cadence, an
//! already-verified response is logged and treated as success, and anything
//! else propagates to the caller.

mod error;
mod etherscan;
mod explorer;
mod retry;

pub use error::VerifyError;
pub use etherscan::EtherscanExplorer;
pub use explorer::{Explorer, MockExplorer, ScriptedOutcome, VerifyRequest};
pub use retry::{Retrier, RETRY_DELAY};
