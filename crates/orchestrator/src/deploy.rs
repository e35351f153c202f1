//! Contract deployment and source verification.

use std::sync::Arc;

use alloy_primitives::{Address, B256};
use tracing::{debug, info};

use swaplab_ledger::{confirm_all, LedgerClient, NonceCursor, Receipt, TxRequest};
use swaplab_types::abi;
use swaplab_types::calls::escrow;
use swaplab_verify::{Explorer, Retrier, VerifyRequest};

use crate::artifacts::{ArtifactStore, ContractId};
use crate::contracts::{ContractSet, Erc20Handle, EscrowHandle};
use crate::error::OrchestratorError;

/// Deploys the full contract set from one nonce snapshot.
pub struct ContractDeployer {
    client: Arc<dyn LedgerClient>,
    artifacts: Arc<dyn ArtifactStore>,
}

impl ContractDeployer {
    pub fn new(client: Arc<dyn LedgerClient>, artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self { client, artifacts }
    }

    /// Deploy the escrow and the four tokens, assigning consecutive nonces
    /// from a single snapshot of `deployer`'s transaction count, then wait
    /// for all five creations together.
    ///
    /// The escrow is constructed over `secret` and its keccak-256 hash; only
    /// the hash is readable on-chain afterwards.
    pub async fn deploy_all(
        &self,
        deployer: Address,
        secret: &str,
    ) -> Result<ContractSet, OrchestratorError> {
        let mut cursor = NonceCursor::open(self.client.as_ref(), deployer).await?;
        info!(%deployer, nonce = cursor.peek(), "deploying contracts");

        let secret_hash = abi::keccak256(secret.as_bytes());
        let mut pendings = Vec::with_capacity(ContractId::ALL.len());
        for id in ContractId::ALL {
            let mut code = self.artifacts.creation_code(id)?;
            if id == ContractId::Escrow {
                code.extend_from_slice(&escrow::constructor_args(secret, secret_hash));
            }
            let pending = self
                .client
                .send_transaction(TxRequest::deploy(deployer, code).nonce(cursor.next()))
                .await?;
            debug!(contract = id.label(), tx = %pending, "creation submitted");
            pendings.push(pending);
        }

        // Receipts come back in submission order, which is `ContractId::ALL`.
        let receipts = confirm_all(self.client.as_ref(), &pendings).await?;
        let set = ContractSet {
            escrow: EscrowHandle::new(
                self.client.clone(),
                creation_address(ContractId::Escrow, &receipts[0])?,
            ),
            bronze: Erc20Handle::new(
                self.client.clone(),
                creation_address(ContractId::Bronze, &receipts[1])?,
            ),
            silver: Erc20Handle::new(
                self.client.clone(),
                creation_address(ContractId::Silver, &receipts[2])?,
            ),
            gold: Erc20Handle::new(
                self.client.clone(),
                creation_address(ContractId::Gold, &receipts[3])?,
            ),
            zrx: Erc20Handle::new(
                self.client.clone(),
                creation_address(ContractId::Zrx, &receipts[4])?,
            ),
        };
        for id in ContractId::ALL {
            info!(contract = id.label(), address = %set.address_of(id), "deployed");
        }
        Ok(set)
    }

    /// Submit each contract for source verification, in deployment order.
    ///
    /// Indexing lag and already-verified responses are absorbed by
    /// `retrier`; everything else aborts the run.
    pub async fn verify_all<E>(
        &self,
        explorer: &E,
        retrier: &Retrier,
        contracts: &ContractSet,
        secret: &str,
        compiler_version: &str,
    ) -> Result<(), OrchestratorError>
    where
        E: Explorer + ?Sized,
    {
        let secret_hash = abi::keccak256(secret.as_bytes());
        for id in ContractId::ALL {
            let request = verify_request(
                id,
                contracts.address_of(id),
                self.artifacts.source(id)?,
                compiler_version,
                secret,
                secret_hash,
            );
            retrier.verify(explorer, &request).await?;
        }
        info!("verified all contracts");
        Ok(())
    }
}

fn creation_address(id: ContractId, receipt: &Receipt) -> Result<Address, OrchestratorError> {
    receipt
        .contract_address
        .ok_or(OrchestratorError::MissingCreationAddress {
            contract: id.label(),
        })
}

fn verify_request(
    id: ContractId,
    address: Address,
    source: String,
    compiler_version: &str,
    secret: &str,
    secret_hash: B256,
) -> VerifyRequest {
    let request = VerifyRequest::new(address, id.qualified_name(), source, compiler_version);
    match id {
        // Only the escrow takes constructor arguments.
        ContractId::Escrow => {
            request.constructor_args(&escrow::constructor_args(secret, secret_hash))
        }
        _ => request,
    }
}
