use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::error::VerifyError;

/// One contract's verification submission.
#[derive(Debug, Clone)]
pub struct VerifyRequest {
    pub address: Address,
    /// Fully qualified name, e.g. `contracts/Escrow.sol:Escrow`.
    pub contract_name: String,
    /// Flattened source text.
    pub source: String,
    /// Compiler release string, e.g. `v0.8.21+commit.d9974bed`.
    pub compiler_version: String,
    /// ABI-encoded constructor arguments, hex without a `0x` prefix.
    pub constructor_args: Option<String>,
}

impl VerifyRequest {
    pub fn new(
        address: Address,
        contract_name: impl Into<String>,
        source: impl Into<String>,
        compiler_version: impl Into<String>,
    ) -> Self {
        Self {
            address,
            contract_name: contract_name.into(),
            source: source.into(),
            compiler_version: compiler_version.into(),
            constructor_args: None,
        }
    }

    pub fn constructor_args(mut self, encoded: &[u8]) -> Self {
        self.constructor_args = Some(hex::encode(encoded));
        self
    }
}

/// A source-verification backend.
#[async_trait]
pub trait Explorer: Send + Sync {
    async fn verify(&self, request: &VerifyRequest) -> Result<(), VerifyError>;
}

/// Scripted response for [`MockExplorer`].
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Verified,
    AlreadyVerified,
    NotIndexed,
    Rejected(String),
}

/// Explorer double that replays a script of outcomes. With an empty script
/// every submission verifies.
#[derive(Clone, Default)]
pub struct MockExplorer {
    script: Arc<Mutex<VecDeque<ScriptedOutcome>>>,
    attempts: Arc<Mutex<Vec<Address>>>,
}

impl MockExplorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, outcomes: impl IntoIterator<Item = ScriptedOutcome>) {
        self.script.lock().unwrap().extend(outcomes);
    }

    /// Addresses submitted so far, one entry per attempt.
    pub fn attempts(&self) -> Vec<Address> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Explorer for MockExplorer {
    async fn verify(&self, request: &VerifyRequest) -> Result<(), VerifyError> {
        self.attempts.lock().unwrap().push(request.address);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            None | Some(ScriptedOutcome::Verified) => Ok(()),
            Some(ScriptedOutcome::AlreadyVerified) => Err(VerifyError::AlreadyVerified {
                address: request.address,
            }),
            Some(ScriptedOutcome::NotIndexed) => Err(VerifyError::NotIndexed {
                address: request.address,
            }),
            Some(ScriptedOutcome::Rejected(reason)) => Err(VerifyError::Rejected(reason)),
        }
    }
}
