//! Pipeline-level errors.

use swaplab_ledger::LedgerError;
use swaplab_signer::SignerError;
use swaplab_verify::VerifyError;
use thiserror::Error;

/// Anything that can abort a provisioning run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Signer(#[from] SignerError),

    #[error("source verification failed: {0}")]
    Verification(#[from] VerifyError),

    #[error("configuration: {0}")]
    Configuration(String),

    /// The node mined a creation transaction but the receipt carried no
    /// contract address.
    #[error("{contract} deployment receipt carried no contract address")]
    MissingCreationAddress { contract: &'static str },

    #[error("artifact for {contract}: {reason}")]
    Artifact {
        contract: &'static str,
        reason: String,
    },
}
