//! Local nonce assignment for same-account submission batches.

use alloy_primitives::Address;

use crate::client::LedgerClient;
use crate::error::LedgerError;

/// A nonce sequence for one account, snapshotted once and advanced locally.
///
/// The remote nonce counter is the shared mutable resource here. Re-querying
/// it between submissions can observe a stale value and hand two
/// transactions the same nonce, so a cursor is opened once per batch and
/// owned by the submitting code path until the batch is dispatched.
#[derive(Debug)]
pub struct NonceCursor {
    next: u64,
}

impl NonceCursor {
    /// Snapshot `address`'s current nonce from the node.
    pub async fn open<C>(client: &C, address: Address) -> Result<Self, LedgerError>
    where
        C: LedgerClient + ?Sized,
    {
        let next = client.get_transaction_count(address).await?;
        Ok(Self { next })
    }

    /// Start from a known value without touching the network.
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// The nonce to use for the next submission. Post-increments.
    pub fn next(&mut self) -> u64 {
        let assigned = self.next;
        self.next += 1;
        assigned
    }

    /// The value `next()` would return, without advancing.
    pub fn peek(&self) -> u64 {
        self.next
    }
}
