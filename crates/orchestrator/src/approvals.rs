//! Unlimited escrow allowances for the participants.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tracing::info;

use swaplab_ledger::{confirm_all, LedgerClient, NonceCursor, Receipt};

use crate::contracts::{Erc20Handle, TxOpts};
use crate::error::OrchestratorError;

/// Grants `U256::MAX` allowances toward the escrow.
pub struct ApprovalManager {
    client: Arc<dyn LedgerClient>,
    gas_limit: u64,
    gas_price: U256,
}

impl ApprovalManager {
    pub fn new(client: Arc<dyn LedgerClient>, gas_limit: u64, gas_price: U256) -> Self {
        Self {
            client,
            gas_limit,
            gas_price,
        }
    }

    /// Submit one unlimited approval per `(owner, token)` pair and confirm
    /// the whole batch at once.
    ///
    /// Nonces are assigned per owner from one snapshot each, so an owner may
    /// appear in `grants` any number of times.
    pub async fn grant_unlimited(
        &self,
        spender: Address,
        grants: &[(Address, &Erc20Handle)],
    ) -> Result<Vec<Receipt>, OrchestratorError> {
        let mut cursors: HashMap<Address, NonceCursor> = HashMap::new();
        let mut pendings = Vec::with_capacity(grants.len());
        for (owner, token) in grants {
            let nonce = match cursors.get_mut(owner) {
                Some(cursor) => cursor.next(),
                None => {
                    let mut cursor = NonceCursor::open(self.client.as_ref(), *owner).await?;
                    let nonce = cursor.next();
                    cursors.insert(*owner, cursor);
                    nonce
                }
            };
            let opts = TxOpts::default()
                .nonce(nonce)
                .gas_limit(self.gas_limit)
                .gas_price(self.gas_price);
            pendings.push(token.approve(*owner, spender, U256::MAX, opts).await?);
        }
        let receipts = confirm_all(self.client.as_ref(), &pendings).await?;
        info!(count = receipts.len(), "escrow allowances in place");
        Ok(receipts)
    }
}
