use alloy_primitives::B256;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The transaction was mined but its execution reverted. Never retried
    /// automatically: resubmission is a deliberate caller decision.
    #[error("transaction {hash} reverted")]
    TransactionReverted { hash: B256 },

    /// The transaction left the pool without ever producing a receipt.
    #[error("transaction {hash} was dropped without a receipt")]
    TransactionDropped { hash: B256 },

    /// The node rejected or failed a request.
    #[error("ledger rpc failure: {0}")]
    Rpc(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed node response: {0}")]
    MalformedResponse(String),
}
