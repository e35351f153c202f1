//! Ephemeral participant accounts and their funding.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tracing::info;

use swaplab_ledger::{confirm_all, confirm_one, LedgerClient, NonceCursor, TxRequest};
use swaplab_signer::{LocalWallet, Signer};

use crate::contracts::{Erc20Handle, TxOpts};
use crate::error::OrchestratorError;

/// Funding amounts for one provisioning run.
#[derive(Debug, Clone)]
pub struct FundingPlan {
    /// Native balance granted to each trading participant, in wei.
    pub participant_wei: U256,
    /// Native balance granted to the attacker account, in wei.
    pub attacker_wei: U256,
    /// Units of each target token granted to each participant.
    pub token_amount: U256,
    /// Gas limit attached to token transfers.
    pub gas_limit: u64,
}

impl Default for FundingPlan {
    fn default() -> Self {
        Self {
            // 0.0025 ether
            participant_wei: U256::from(2_500_000_000_000_000u64),
            // 0.1 ether
            attacker_wei: U256::from(100_000_000_000_000_000u64),
            token_amount: U256::from(100u64),
            gas_limit: 100_000,
        }
    }
}

/// Creates fresh keypairs and funds them from the deployer account.
pub struct AccountProvisioner {
    client: Arc<dyn LedgerClient>,
    plan: FundingPlan,
}

impl AccountProvisioner {
    pub fn new(client: Arc<dyn LedgerClient>, plan: FundingPlan) -> Self {
        Self { client, plan }
    }

    /// Create the two trading participants and fund each with native
    /// currency plus the three target tokens.
    ///
    /// All eight transfers are submitted under consecutive nonces from one
    /// snapshot of `funder`'s transaction count and confirmed as a batch.
    /// The legacy token is not distributed; the third swap offers it from an
    /// empty balance.
    pub async fn provision_users(
        &self,
        funder: Address,
        bronze: &Erc20Handle,
        silver: &Erc20Handle,
        gold: &Erc20Handle,
    ) -> Result<(LocalWallet, LocalWallet), OrchestratorError> {
        let user1 = LocalWallet::random();
        let user2 = LocalWallet::random();
        info!(user1 = %user1.address(), user2 = %user2.address(), "provisioning participants");

        let mut cursor = NonceCursor::open(self.client.as_ref(), funder).await?;
        let mut pendings = Vec::with_capacity(8);

        for user in [user1.address(), user2.address()] {
            let tx = TxRequest::to(funder, user)
                .value(self.plan.participant_wei)
                .nonce(cursor.next());
            pendings.push(self.client.send_transaction(tx).await?);
        }

        for user in [user1.address(), user2.address()] {
            for token in [bronze, silver, gold] {
                let opts = TxOpts::default()
                    .gas_limit(self.plan.gas_limit)
                    .nonce(cursor.next());
                pendings.push(
                    token
                        .transfer(funder, user, self.plan.token_amount, opts)
                        .await?,
                );
            }
        }

        confirm_all(self.client.as_ref(), &pendings).await?;
        info!("funded both participants");
        Ok((user1, user2))
    }

    /// Create the attacker account: native funding only, nonce left to the
    /// node, its key surfaced in the log for handout.
    pub async fn provision_attacker(
        &self,
        funder: Address,
    ) -> Result<LocalWallet, OrchestratorError> {
        let attacker = LocalWallet::random();
        let tx = TxRequest::to(funder, attacker.address()).value(self.plan.attacker_wei);
        let pending = self.client.send_transaction(tx).await?;
        confirm_one(self.client.as_ref(), &pending).await?;
        info!(
            address = %attacker.address(),
            private_key = %attacker.private_key_hex(),
            "created and funded attacker account"
        );
        Ok(attacker)
    }
}
