//! Typed handles over the deployed contracts.
//!
//! A handle binds a contract address to a shared ledger client. The sending
//! account is a per-call argument rather than handle state; the pipeline acts
//! for the deployer and both participants against the same five contracts.

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};

use swaplab_ledger::{CallRequest, LedgerClient, LedgerError, PendingTx, TxRequest};
use swaplab_signer::Signature;
use swaplab_types::abi;
use swaplab_types::calls::{erc20, escrow};
use swaplab_types::{SwapInfo, SwapOrder};

use crate::artifacts::ContractId;
use crate::error::OrchestratorError;

/// Per-transaction submission options. Everything left `None` is filled in
/// by the node.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxOpts {
    pub nonce: Option<u64>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<U256>,
}

impl TxOpts {
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

    fn apply(self, mut tx: TxRequest) -> TxRequest {
        if let Some(nonce) = self.nonce {
            tx = tx.nonce(nonce);
        }
        if let Some(gas_limit) = self.gas_limit {
            tx = tx.gas_limit(gas_limit);
        }
        if let Some(gas_price) = self.gas_price {
            tx = tx.gas_price(gas_price);
        }
        tx
    }
}

/// One of the deployed ERC-20 tokens.
#[derive(Clone)]
pub struct Erc20Handle {
    client: Arc<dyn LedgerClient>,
    pub address: Address,
}

impl Erc20Handle {
    pub fn new(client: Arc<dyn LedgerClient>, address: Address) -> Self {
        Self { client, address }
    }

    /// Submit `transfer(to, amount)` from `from`.
    pub async fn transfer(
        &self,
        from: Address,
        to: Address,
        amount: U256,
        opts: TxOpts,
    ) -> Result<PendingTx, OrchestratorError> {
        let tx = opts.apply(TxRequest::to(from, self.address).data(erc20::transfer(to, amount)));
        Ok(self.client.send_transaction(tx).await?)
    }

    /// Submit `approve(spender, amount)` from `from`.
    pub async fn approve(
        &self,
        from: Address,
        spender: Address,
        amount: U256,
        opts: TxOpts,
    ) -> Result<PendingTx, OrchestratorError> {
        let tx = opts.apply(TxRequest::to(from, self.address).data(erc20::approve(spender, amount)));
        Ok(self.client.send_transaction(tx).await?)
    }

    /// Read `balanceOf(owner)`.
    pub async fn balance_of(&self, owner: Address) -> Result<U256, OrchestratorError> {
        let raw = self
            .client
            .call(CallRequest::new(self.address, erc20::balance_of(owner)))
            .await?;
        abi::word_to_u256(&raw).ok_or_else(|| {
            LedgerError::MalformedResponse("balanceOf returned a short word".into()).into()
        })
    }
}

/// The escrow contract under exercise.
#[derive(Clone)]
pub struct EscrowHandle {
    client: Arc<dyn LedgerClient>,
    pub address: Address,
}

impl EscrowHandle {
    pub fn new(client: Arc<dyn LedgerClient>, address: Address) -> Self {
        Self { client, address }
    }

    /// Submit `initiateSwap(sideA, sideB)`. The contract requires the sender
    /// to be side A's party.
    pub async fn initiate_swap(
        &self,
        from: Address,
        order: &SwapOrder,
        opts: TxOpts,
    ) -> Result<PendingTx, OrchestratorError> {
        let tx = opts.apply(TxRequest::to(from, self.address).data(escrow::initiate_swap(order)));
        Ok(self.client.send_transaction(tx).await?)
    }

    /// Submit `initiateSwapWithSig(sideA, sideB, sig)`. Any sender; side A
    /// authorizes through `signature`.
    pub async fn initiate_swap_with_sig(
        &self,
        from: Address,
        order: &SwapOrder,
        signature: &Signature,
        opts: TxOpts,
    ) -> Result<PendingTx, OrchestratorError> {
        let data = escrow::initiate_swap_with_sig(order, signature.as_bytes());
        let tx = opts.apply(TxRequest::to(from, self.address).data(data));
        Ok(self.client.send_transaction(tx).await?)
    }

    /// Submit `completeSwap(sideA)`. The contract requires the sender to be
    /// the counterparty recorded for the open swap.
    pub async fn complete_swap(
        &self,
        from: Address,
        side_a: &SwapInfo,
        opts: TxOpts,
    ) -> Result<PendingTx, OrchestratorError> {
        let tx = opts.apply(TxRequest::to(from, self.address).data(escrow::complete_swap(side_a)));
        Ok(self.client.send_transaction(tx).await?)
    }

    /// Submit `completeSwapBySig(sideA, sig)`. Any sender; the counterparty
    /// authorizes through `signature`.
    pub async fn complete_swap_by_sig(
        &self,
        from: Address,
        side_a: &SwapInfo,
        signature: &Signature,
        opts: TxOpts,
    ) -> Result<PendingTx, OrchestratorError> {
        let data = escrow::complete_swap_by_sig(side_a, signature.as_bytes());
        let tx = opts.apply(TxRequest::to(from, self.address).data(data));
        Ok(self.client.send_transaction(tx).await?)
    }

    /// Read the stored keccak-256 commitment to the deploy secret.
    pub async fn secret_key_hash(&self) -> Result<B256, OrchestratorError> {
        let raw = self
            .client
            .call(CallRequest::new(self.address, escrow::get_secret_key_hash()))
            .await?;
        if raw.len() < abi::WORD {
            return Err(
                LedgerError::MalformedResponse("getSecretKeyHash returned a short word".into())
                    .into(),
            );
        }
        Ok(B256::from_slice(&raw[..abi::WORD]))
    }
}

/// Every contract a provisioning run deploys.
#[derive(Clone)]
pub struct ContractSet {
    pub escrow: EscrowHandle,
    pub bronze: Erc20Handle,
    pub silver: Erc20Handle,
    pub gold: Erc20Handle,
    pub zrx: Erc20Handle,
}

impl ContractSet {
    /// Deployed address for `id`.
    pub fn address_of(&self, id: ContractId) -> Address {
        match id {
            ContractId::Escrow => self.escrow.address,
            ContractId::Bronze => self.bronze.address,
            ContractId::Silver => self.silver.address,
            ContractId::Gold => self.gold.address,
            ContractId::Zrx => self.zrx.address,
        }
    }
}
