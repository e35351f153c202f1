//! The scripted swap exercise.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tracing::info;

use swaplab_ledger::{confirm_one, LedgerClient, PendingTx, Receipt};
use swaplab_signer::Signer;
use swaplab_types::{SwapInfo, SwapOrder};

use crate::contracts::{ContractSet, EscrowHandle, TxOpts};
use crate::error::OrchestratorError;

/// Drives swap lifecycle calls through their four authorization paths.
pub struct SwapCoordinator {
    client: Arc<dyn LedgerClient>,
    escrow: EscrowHandle,
}

impl SwapCoordinator {
    pub fn new(client: Arc<dyn LedgerClient>, escrow: EscrowHandle) -> Self {
        Self { client, escrow }
    }

    /// `initiateSwap` submitted by side A's party.
    pub async fn initiate_direct(&self, order: &SwapOrder) -> Result<Receipt, OrchestratorError> {
        let pending = self
            .escrow
            .initiate_swap(order.side_a.party, order, TxOpts::default())
            .await?;
        self.confirm(pending).await
    }

    /// `initiateSwapWithSig` submitted by `submitter`, with side A's consent
    /// carried in a signature from `authorizer`.
    pub async fn initiate_with_sig<S>(
        &self,
        submitter: Address,
        order: &SwapOrder,
        authorizer: &S,
    ) -> Result<Receipt, OrchestratorError>
    where
        S: Signer + ?Sized,
    {
        let signature = authorizer.sign_order(order)?;
        let pending = self
            .escrow
            .initiate_swap_with_sig(submitter, order, &signature, TxOpts::default())
            .await?;
        self.confirm(pending).await
    }

    /// `completeSwap` submitted by side B's party.
    pub async fn complete_direct(&self, order: &SwapOrder) -> Result<Receipt, OrchestratorError> {
        let pending = self
            .escrow
            .complete_swap(order.side_b.party, &order.side_a, TxOpts::default())
            .await?;
        self.confirm(pending).await
    }

    /// `completeSwapBySig` submitted by `submitter`, with side B's consent
    /// carried in a signature from `authorizer`.
    pub async fn complete_with_sig<S>(
        &self,
        submitter: Address,
        order: &SwapOrder,
        authorizer: &S,
    ) -> Result<Receipt, OrchestratorError>
    where
        S: Signer + ?Sized,
    {
        let signature = authorizer.sign_order(order)?;
        let pending = self
            .escrow
            .complete_swap_by_sig(submitter, &order.side_a, &signature, TxOpts::default())
            .await?;
        self.confirm(pending).await
    }

    /// Run the scripted exercise: one swap left open in escrow and two
    /// completed, covering every authorization path once.
    ///
    /// The third swap offers the legacy token from an empty balance. Its
    /// transfer fails silently, the escrow records the swap anyway, and the
    /// counterparty pays out against nothing.
    pub async fn run_exercise(
        &self,
        deployer: Address,
        contracts: &ContractSet,
        user1: &dyn Signer,
        user2: &dyn Signer,
    ) -> Result<(), OrchestratorError> {
        // Swap 1: bronze for silver, initiated by user1 and left open.
        let order = SwapOrder::new(
            SwapInfo::new(user1.address(), contracts.bronze.address, U256::from(100u64)),
            SwapInfo::new(user2.address(), contracts.silver.address, U256::from(50u64)),
        );
        self.initiate_direct(&order).await?;
        info!("done with swap 1");

        // Swap 2: silver for gold, initiated under user1's signature and
        // completed by user2 directly.
        let order = SwapOrder::new(
            SwapInfo::new(user1.address(), contracts.silver.address, U256::from(50u64)),
            SwapInfo::new(user2.address(), contracts.gold.address, U256::from(25u64)),
        );
        self.initiate_with_sig(deployer, &order, user1).await?;
        self.complete_direct(&order).await?;
        info!("done with swap 2");

        // Swap 3: legacy token for gold, initiated by user1 and completed
        // under user2's signature.
        let order = SwapOrder::new(
            SwapInfo::new(user1.address(), contracts.zrx.address, U256::from(100u64)),
            SwapInfo::new(user2.address(), contracts.gold.address, U256::from(25u64)),
        );
        self.initiate_direct(&order).await?;
        self.complete_with_sig(deployer, &order, user2).await?;
        info!("done with swap 3");

        Ok(())
    }

    async fn confirm(&self, pending: PendingTx) -> Result<Receipt, OrchestratorError> {
        Ok(confirm_one(self.client.as_ref(), &pending).await?)
    }
}
