pub mod accounts;
pub mod approvals;
pub mod artifacts;
pub mod contracts;
pub mod deploy;
pub mod error;
pub mod pipeline;
pub mod swaps;
pub mod telemetry;


// Re-export main types
pub use accounts::{AccountProvisioner, FundingPlan};
pub use approvals::ApprovalManager;
pub use artifacts::{ArtifactStore, ContractId, FileArtifacts, MemoryArtifacts};
pub use contracts::{ContractSet, Erc20Handle, EscrowHandle, TxOpts};
pub use deploy::ContractDeployer;
pub use error::OrchestratorError;
pub use pipeline::{BuilderError, Deployment, Provisioner, ProvisionerBuilder};
pub use swaps::SwapCoordinator;
pub use telemetry::{init_tracing, TelemetryError};
