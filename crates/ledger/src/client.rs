//! The client seam and its wire types.

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A transaction ready for submission.
///
/// `nonce` is optional on purpose: batch submitters assign nonces explicitly
/// from a [`crate::NonceCursor`], while one-off submissions may let the node
/// fill the current value in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxRequest {
    pub from: Address,
    /// `None` deploys a contract from `data`.
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
    pub nonce: Option<u64>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<U256>,
}

impl TxRequest {
    /// A transaction addressed to an existing account or contract.
    pub fn to(from: Address, to: Address) -> Self {
        Self {
            from,
            to: Some(to),
            value: U256::ZERO,
            data: Vec::new(),
            nonce: None,
            gas_limit: None,
            gas_price: None,
        }
    }

    /// A contract-creation transaction carrying `code` as its payload.
    pub fn deploy(from: Address, code: Vec<u8>) -> Self {
        Self {
            from,
            to: None,
            value: U256::ZERO,
            data: code,
            nonce: None,
            gas_limit: None,
            gas_price: None,
        }
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn gas_price(mut self, gas_price: U256) -> Self {
        self.gas_price = Some(gas_price);
        self
    }
}

/// A read-only contract call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub data: Vec<u8>,
}

impl CallRequest {
    pub fn new(to: Address, data: Vec<u8>) -> Self {
        Self {
            from: None,
            to,
            data,
        }
    }
}

/// Handle to a submitted, not yet confirmed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTx {
    pub hash: B256,
}

impl std::fmt::Display for PendingTx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

/// Confirmation record for a mined, successful transaction.
///
/// Reverted transactions never surface as receipts; they come back as
/// [`LedgerError::TransactionReverted`] from the wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: B256,
    pub block_number: u64,
    /// Populated for contract-creation transactions.
    pub contract_address: Option<Address>,
    pub gas_used: u64,
}

/// Everything the orchestration layer needs from a ledger node.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Current nonce for `address`, including pending transactions. Read
    /// once per batch; advance locally afterwards.
    async fn get_transaction_count(&self, address: Address) -> Result<u64, LedgerError>;

    async fn send_transaction(&self, tx: TxRequest) -> Result<PendingTx, LedgerError>;

    /// Execute a read-only call and return the raw result bytes.
    async fn call(&self, request: CallRequest) -> Result<Vec<u8>, LedgerError>;

    /// Suspend until `pending` is mined. Unbounded; the ledger has no
    /// deadline to offer and neither do we.
    async fn wait(&self, pending: &PendingTx) -> Result<Receipt, LedgerError>;
}
