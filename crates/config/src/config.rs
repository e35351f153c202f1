//! Core configuration structures for the swap exercise provisioner

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Target node configuration
    pub network: NetworkConfig,

    /// Participant funding configuration
    #[serde(default)]
    pub funding: FundingConfig,

    /// Names of the environment variables that hold secrets
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Source verification configuration
    #[serde(default)]
    pub verification: VerificationConfig,
}

/// Target node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL
    pub rpc_url: String,

    /// Log filter directives (e.g. "info" or "info,swaplab=debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Receipt polling interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Participant funding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingConfig {
    /// Native funding per trading participant, in wei
    #[serde(default = "default_participant_wei")]
    pub participant_wei: String,

    /// Native funding for the adversarial account, in wei
    #[serde(default = "default_attacker_wei")]
    pub attacker_wei: String,

    /// Units of every token granted to each trading participant
    #[serde(default = "default_token_amount")]
    pub token_amount: u64,

    /// Gas limit for token transfer and allowance transactions
    #[serde(default = "default_funding_gas_limit")]
    pub gas_limit: u64,

    /// Gas price for allowance transactions, in wei
    #[serde(default = "default_approval_gas_price_wei")]
    pub approval_gas_price_wei: String,
}

/// Names of the environment variables that hold secrets.
///
/// Only the variable names live in config files; the values are resolved
/// at runtime and never written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Variable holding the deployer's hex-encoded private key
    #[serde(default = "default_deployer_key_env")]
    pub deployer_key_env: String,

    /// Variable holding the escrow secret phrase
    #[serde(default = "default_escrow_secret_env")]
    pub escrow_secret_env: String,
}

/// Source verification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Submit contract sources to the explorer after deployment
    #[serde(default)]
    pub enabled: bool,

    /// Explorer API endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Variable holding the explorer API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Compiler release the sources were built with
    #[serde(default = "default_compiler_version")]
    pub compiler_version: String,

    /// Seconds between retries while the explorer indexes fresh bytecode
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl AppConfig {
    /// Resolve the deployer's private key from the environment.
    pub fn deployer_key(&self) -> Result<String> {
        resolve_env(&self.secrets.deployer_key_env)
    }

    /// Resolve the escrow secret phrase from the environment.
    pub fn escrow_secret(&self) -> Result<String> {
        resolve_env(&self.secrets.escrow_secret_env)
    }

    /// Resolve the explorer API key from the environment.
    pub fn explorer_api_key(&self) -> Result<String> {
        resolve_env(&self.verification.api_key_env)
    }
}

fn resolve_env(variable: &str) -> Result<String> {
    match std::env::var(variable) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingSecret {
            variable: variable.to_string(),
        }),
    }
}

// Default value functions
fn default_log_level() -> String {
    "info,swaplab=debug".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_participant_wei() -> String {
    // 0.0025 ether
    "2500000000000000".to_string()
}

fn default_attacker_wei() -> String {
    // 0.1 ether
    "100000000000000000".to_string()
}

fn default_token_amount() -> u64 {
    100
}

fn default_funding_gas_limit() -> u64 {
    100_000
}

fn default_approval_gas_price_wei() -> String {
    "2000000009".to_string()
}

fn default_deployer_key_env() -> String {
    "SWAPLAB_DEPLOYER_KEY".to_string()
}

fn default_escrow_secret_env() -> String {
    "SWAPLAB_ESCROW_SECRET".to_string()
}

fn default_api_url() -> String {
    "https://api.etherscan.io/api".to_string()
}

fn default_api_key_env() -> String {
    "SWAPLAB_EXPLORER_KEY".to_string()
}

fn default_compiler_version() -> String {
    "v0.8.21+commit.d9974bed".to_string()
}

fn default_retry_delay_secs() -> u64 {
    5
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            log_level: default_log_level(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for FundingConfig {
    fn default() -> Self {
        Self {
            participant_wei: default_participant_wei(),
            attacker_wei: default_attacker_wei(),
            token_amount: default_token_amount(),
            gas_limit: default_funding_gas_limit(),
            approval_gas_price_wei: default_approval_gas_price_wei(),
        }
    }
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            deployer_key_env: default_deployer_key_env(),
            escrow_secret_env: default_escrow_secret_env(),
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_api_url(),
            api_key_env: default_api_key_env(),
            compiler_version: default_compiler_version(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_resolution_reads_the_named_variable() {
        let mut config = AppConfig::default();
        config.secrets.escrow_secret_env = "SWAPLAB_TEST_SECRET_PRESENT".to_string();

        std::env::set_var("SWAPLAB_TEST_SECRET_PRESENT", "morpheus");
        assert_eq!(config.escrow_secret().unwrap(), "morpheus");
    }

    #[test]
    fn missing_secret_names_the_variable() {
        let mut config = AppConfig::default();
        config.secrets.deployer_key_env = "SWAPLAB_TEST_SECRET_ABSENT".to_string();

        let err = config.deployer_key().unwrap_err();
        match err {
            ConfigError::MissingSecret { variable } => {
                assert_eq!(variable, "SWAPLAB_TEST_SECRET_ABSENT")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_secret_values_count_as_missing() {
        let mut config = AppConfig::default();
        config.secrets.escrow_secret_env = "SWAPLAB_TEST_SECRET_BLANK".to_string();

        std::env::set_var("SWAPLAB_TEST_SECRET_BLANK", "   ");
        assert!(matches!(
            config.escrow_secret(),
            Err(ConfigError::MissingSecret { .. })
        ));
    }
}
