//! Creation bytecode and source text for the exercise contracts.

use std::fs;
use std::path::PathBuf;

use swaplab_ledger::{ContractKind, MemoryLedger};

use crate::error::OrchestratorError;

/// The five contracts every run deploys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractId {
    Escrow,
    Bronze,
    Silver,
    Gold,
    Zrx,
}

impl ContractId {
    /// Deployment order. Nonce assignment and receipt pairing both follow it.
    pub const ALL: [ContractId; 5] = [
        ContractId::Escrow,
        ContractId::Bronze,
        ContractId::Silver,
        ContractId::Gold,
        ContractId::Zrx,
    ];

    /// Contract name as it appears in logs and artifact file names.
    pub fn label(self) -> &'static str {
        match self {
            ContractId::Escrow => "BuggyEscrow",
            ContractId::Bronze => "BronzeToken",
            ContractId::Silver => "SilverToken",
            ContractId::Gold => "GoldToken",
            ContractId::Zrx => "ZRXToken",
        }
    }

    /// Fully qualified name submitted for source verification.
    pub fn qualified_name(self) -> &'static str {
        match self {
            ContractId::Escrow => "contracts/BuggyEscrow.sol:BuggyEscrow",
            ContractId::Bronze => "contracts/tokens/TargetTokens.sol:BronzeToken",
            ContractId::Silver => "contracts/tokens/TargetTokens.sol:SilverToken",
            ContractId::Gold => "contracts/tokens/TargetTokens.sol:GoldToken",
            ContractId::Zrx => "contracts/tokens/ZRXToken.sol:ZRXToken",
        }
    }

    /// Source path relative to the contracts directory. The three target
    /// tokens share one file.
    pub fn source_file(self) -> &'static str {
        match self {
            ContractId::Escrow => "BuggyEscrow.sol",
            ContractId::Bronze | ContractId::Silver | ContractId::Gold => "tokens/TargetTokens.sol",
            ContractId::Zrx => "tokens/ZRXToken.sol",
        }
    }
}

/// Where creation bytecode and verification sources come from.
pub trait ArtifactStore: Send + Sync {
    /// Creation bytecode for `id`, without constructor arguments.
    fn creation_code(&self, id: ContractId) -> Result<Vec<u8>, OrchestratorError>;

    /// Solidity source submitted for verification.
    fn source(&self, id: ContractId) -> Result<String, OrchestratorError>;
}

/// Artifacts laid out on disk: hex `<Contract>.bin` files in a build
/// directory next to the `contracts/` source tree.
pub struct FileArtifacts {
    build_dir: PathBuf,
    contracts_dir: PathBuf,
}

impl FileArtifacts {
    pub fn new(build_dir: impl Into<PathBuf>, contracts_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
            contracts_dir: contracts_dir.into(),
        }
    }
}

impl ArtifactStore for FileArtifacts {
    fn creation_code(&self, id: ContractId) -> Result<Vec<u8>, OrchestratorError> {
        let path = self.build_dir.join(format!("{}.bin", id.label()));
        let text = fs::read_to_string(&path).map_err(|e| OrchestratorError::Artifact {
            contract: id.label(),
            reason: format!("{}: {e}", path.display()),
        })?;
        let body = text.trim().trim_start_matches("0x");
        hex::decode(body).map_err(|e| OrchestratorError::Artifact {
            contract: id.label(),
            reason: format!("{}: {e}", path.display()),
        })
    }

    fn source(&self, id: ContractId) -> Result<String, OrchestratorError> {
        let path = self.contracts_dir.join(id.source_file());
        fs::read_to_string(&path).map_err(|e| OrchestratorError::Artifact {
            contract: id.label(),
            reason: format!("{}: {e}", path.display()),
        })
    }
}

/// Artifacts backed by [`MemoryLedger`]'s built-in contract images, so the
/// pipeline can run end to end without compiler output on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryArtifacts;

impl ArtifactStore for MemoryArtifacts {
    fn creation_code(&self, id: ContractId) -> Result<Vec<u8>, OrchestratorError> {
        let kind = match id {
            ContractId::Escrow => ContractKind::Escrow,
            ContractId::Zrx => ContractKind::LegacyToken,
            ContractId::Bronze | ContractId::Silver | ContractId::Gold => ContractKind::Token,
        };
        Ok(MemoryLedger::artifact(kind))
    }

    fn source(&self, id: ContractId) -> Result<String, OrchestratorError> {
        Ok(format!("// in-memory stand-in for {}\n", id.qualified_name()))
    }
}
