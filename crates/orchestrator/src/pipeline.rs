//! The end-to-end provisioning pipeline.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use thiserror::Error;
use tracing::info;

use swaplab_config::AppConfig;
use swaplab_ledger::LedgerClient;
use swaplab_signer::{LocalWallet, Signer};
use swaplab_verify::{Explorer, Retrier};

use crate::accounts::{AccountProvisioner, FundingPlan};
use crate::approvals::ApprovalManager;
use crate::artifacts::ArtifactStore;
use crate::contracts::ContractSet;
use crate::deploy::ContractDeployer;
use crate::error::OrchestratorError;
use crate::swaps::SwapCoordinator;

/// Builder error
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("missing required field: {field}")]
    MissingField { field: String },
}

/// Everything a finished run hands back.
///
/// The attacker account is deliberately absent; its address and private key
/// surface only in the log.
pub struct Deployment {
    pub contracts: ContractSet,
    pub user1: LocalWallet,
    pub user2: LocalWallet,
}

/// Orchestrates deploy, verify, fund, approve, and the scripted swaps.
pub struct Provisioner {
    client: Arc<dyn LedgerClient>,
    artifacts: Arc<dyn ArtifactStore>,
    explorer: Option<Arc<dyn Explorer>>,
    retrier: Retrier,
    funding: FundingPlan,
    approval_gas_price: U256,
    compiler_version: String,
}

/// Builder for [`Provisioner`].
pub struct ProvisionerBuilder {
    client: Option<Arc<dyn LedgerClient>>,
    artifacts: Option<Arc<dyn ArtifactStore>>,
    explorer: Option<Arc<dyn Explorer>>,
    retrier: Retrier,
    funding: FundingPlan,
    approval_gas_price: U256,
    compiler_version: String,
}

impl ProvisionerBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            client: None,
            artifacts: None,
            explorer: None,
            retrier: Retrier::new(),
            funding: FundingPlan::default(),
            approval_gas_price: U256::from(2_000_000_009u64),
            compiler_version: "v0.8.21+commit.d9974bed".to_string(),
        }
    }

    /// Set the ledger client (required).
    pub fn with_client(mut self, client: Arc<dyn LedgerClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the artifact store (required).
    pub fn with_artifacts(mut self, artifacts: Arc<dyn ArtifactStore>) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    /// Enable source verification against `explorer`.
    pub fn with_explorer(mut self, explorer: Arc<dyn Explorer>) -> Self {
        self.explorer = Some(explorer);
        self
    }

    /// Override the verification retrier.
    pub fn with_retrier(mut self, retrier: Retrier) -> Self {
        self.retrier = retrier;
        self
    }

    /// Override the funding plan.
    pub fn with_funding(mut self, funding: FundingPlan) -> Self {
        self.funding = funding;
        self
    }

    /// Override the gas price attached to approvals.
    pub fn with_approval_gas_price(mut self, gas_price: U256) -> Self {
        self.approval_gas_price = gas_price;
        self
    }

    /// Override the compiler version submitted for verification.
    pub fn with_compiler_version(mut self, version: impl Into<String>) -> Self {
        self.compiler_version = version.into();
        self
    }

    /// Build the provisioner, validating that all required fields are set.
    pub fn build(self) -> Result<Provisioner, BuilderError> {
        Ok(Provisioner {
            client: self.client.ok_or(BuilderError::MissingField {
                field: "client".to_string(),
            })?,
            artifacts: self.artifacts.ok_or(BuilderError::MissingField {
                field: "artifacts".to_string(),
            })?,
            explorer: self.explorer,
            retrier: self.retrier,
            funding: self.funding,
            approval_gas_price: self.approval_gas_price,
            compiler_version: self.compiler_version,
        })
    }
}

impl Default for ProvisionerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Provisioner {
    pub fn builder() -> ProvisionerBuilder {
        ProvisionerBuilder::new()
    }

    /// Assemble a provisioner from loaded settings.
    ///
    /// `explorer` is required exactly when the settings enable verification.
    pub fn from_config(
        client: Arc<dyn LedgerClient>,
        artifacts: Arc<dyn ArtifactStore>,
        explorer: Option<Arc<dyn Explorer>>,
        config: &AppConfig,
    ) -> Result<Self, OrchestratorError> {
        let funding = FundingPlan {
            participant_wei: parse_wei(
                "funding.participant_wei",
                &config.funding.participant_wei,
            )?,
            attacker_wei: parse_wei("funding.attacker_wei", &config.funding.attacker_wei)?,
            token_amount: U256::from(config.funding.token_amount),
            gas_limit: config.funding.gas_limit,
        };
        let approval_gas_price = parse_wei(
            "funding.approval_gas_price_wei",
            &config.funding.approval_gas_price_wei,
        )?;

        let mut builder = Self::builder()
            .with_client(client)
            .with_artifacts(artifacts)
            .with_funding(funding)
            .with_approval_gas_price(approval_gas_price)
            .with_compiler_version(&config.verification.compiler_version)
            .with_retrier(Retrier::with_delay(Duration::from_secs(
                config.verification.retry_delay_secs,
            )));
        if config.verification.enabled {
            match explorer {
                Some(explorer) => builder = builder.with_explorer(explorer),
                None => {
                    return Err(OrchestratorError::Configuration(
                        "verification enabled but no explorer supplied".to_string(),
                    ))
                }
            }
        }
        builder
            .build()
            .map_err(|e| OrchestratorError::Configuration(e.to_string()))
    }

    /// Run the whole pipeline against a fresh contract set.
    ///
    /// `deployer` must be an account the node signs for; `secret` seeds the
    /// escrow's hash commitment and is submitted with the verification
    /// request, never logged.
    pub async fn run(
        &self,
        deployer: Address,
        secret: &str,
    ) -> Result<Deployment, OrchestratorError> {
        info!(%deployer, "using deployer");

        let contract_deployer = ContractDeployer::new(self.client.clone(), self.artifacts.clone());
        let contracts = contract_deployer.deploy_all(deployer, secret).await?;

        let committed = contracts.escrow.secret_key_hash().await?;
        info!(hash = %committed, "escrow holds the secret hash");

        match &self.explorer {
            Some(explorer) => {
                contract_deployer
                    .verify_all(
                        explorer.as_ref(),
                        &self.retrier,
                        &contracts,
                        secret,
                        &self.compiler_version,
                    )
                    .await?;
            }
            None => info!("source verification disabled"),
        }

        let accounts = AccountProvisioner::new(self.client.clone(), self.funding.clone());
        let (user1, user2) = accounts
            .provision_users(deployer, &contracts.bronze, &contracts.silver, &contracts.gold)
            .await?;

        let approvals = ApprovalManager::new(
            self.client.clone(),
            self.funding.gas_limit,
            self.approval_gas_price,
        );
        approvals
            .grant_unlimited(
                contracts.escrow.address,
                &[
                    (user1.address(), &contracts.bronze),
                    (user1.address(), &contracts.silver),
                    (user2.address(), &contracts.gold),
                ],
            )
            .await?;
        info!("set up accounts");

        let swaps = SwapCoordinator::new(self.client.clone(), contracts.escrow.clone());
        swaps
            .run_exercise(deployer, &contracts, &user1, &user2)
            .await?;

        accounts.provision_attacker(deployer).await?;

        info!(
            escrow = %contracts.escrow.address,
            bronze = %contracts.bronze.address,
            silver = %contracts.silver.address,
            gold = %contracts.gold.address,
            zrx = %contracts.zrx.address,
            "deployment complete"
        );

        Ok(Deployment {
            contracts,
            user1,
            user2,
        })
    }
}

fn parse_wei(field: &str, value: &str) -> Result<U256, OrchestratorError> {
    U256::from_str(value).map_err(|e| OrchestratorError::Configuration(format!("{field}: {e}")))
}
