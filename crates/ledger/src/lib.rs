//! Ledger access for the swap exercise.
//!
//! [`LedgerClient`] is the seam everything above this crate talks through:
//! nonce queries, transaction submission, read-only calls, and receipt
//! waiting. [`HttpLedger`] implements it against a development node over
//! JSON-RPC; [`MemoryLedger`] is a complete in-process double that the
//! integration tests (and downstream exercises) drive instead of a node.
//!
//! Submission-side nonce discipline lives in [`NonceCursor`]; batched
//! confirmation with order-preserving results lives in [`confirm_all`].

pub mod client;
pub mod confirm;
pub mod error;
pub mod http;
pub mod memory;
pub mod nonce;

pub use client::{CallRequest, LedgerClient, PendingTx, Receipt, TxRequest};
pub use confirm::{confirm_all, confirm_one};
pub use error::LedgerError;
pub use http::HttpLedger;
pub use memory::{ContractKind, MemoryLedger};
pub use nonce::NonceCursor;
