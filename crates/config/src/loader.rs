//! Configuration loading from multiple sources

use crate::{AppConfig, ConfigError, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use std::path::Path;
use tracing::debug;

/// Configuration loader with support for multiple formats and sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file
    ///
    /// Supports TOML, YAML, and JSON formats based on file extension
    pub fn from_file(path: &Path) -> Result<AppConfig> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        let content = std::fs::read_to_string(path)?;
        debug!("Loading config from {:?}", path);

        match extension {
            "toml" => Self::from_toml(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            "json" => Self::from_json(&content),
            _ => Err(ConfigError::LoadError(format!(
                "Unsupported file extension: {}",
                extension
            ))),
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<AppConfig> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration from YAML string
    pub fn from_yaml(content: &str) -> Result<AppConfig> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration from JSON string
    pub fn from_json(content: &str) -> Result<AppConfig> {
        serde_json::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration from environment variables
    ///
    /// Uses default prefix "SWAPLAB"
    pub fn from_env() -> Result<AppConfig> {
        Self::from_env_with_prefix("SWAPLAB")
    }

    /// Load configuration from environment variables with custom prefix
    ///
    /// Sections and keys are separated by a double underscore so that
    /// snake_case keys survive: SWAPLAB_NETWORK__RPC_URL=http://127.0.0.1:8545
    pub fn from_env_with_prefix(prefix: &str) -> Result<AppConfig> {
        let config = Config::builder()
            .add_source(Environment::with_prefix(prefix).separator("__"))
            .build()?;

        config.try_deserialize().map_err(ConfigError::from)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// File values form the base; variables with the given prefix override
    /// individual keys, e.g. `SWAPLAB_NETWORK__RPC_URL`.
    pub fn from_file_with_env(path: &Path, env_prefix: &str) -> Result<AppConfig> {
        Self::builder().add_file(path, true).add_env(env_prefix).build()
    }

    /// Build configuration using the config crate's builder pattern
    ///
    /// This allows for more complex configuration scenarios with multiple sources
    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder {
            builder: Config::builder(),
        }
    }
}

/// Builder for complex configuration loading scenarios
pub struct ConfigLoaderBuilder {
    builder: ConfigBuilder<config::builder::DefaultState>,
}

impl ConfigLoaderBuilder {
    /// Add a configuration file source
    pub fn add_file(mut self, path: &Path, required: bool) -> Self {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("json") => FileFormat::Json,
            _ => FileFormat::Toml,
        };

        self.builder = self
            .builder
            .add_source(File::from(path).format(format).required(required));
        self
    }

    /// Add environment variable source with prefix
    pub fn add_env(mut self, prefix: &str) -> Self {
        self.builder = self
            .builder
            .add_source(Environment::with_prefix(prefix).separator("__"));
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<AppConfig> {
        let config = self.builder.build()?;
        config.try_deserialize().map_err(ConfigError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_toml() {
        let toml = r#"
            [network]
            rpc_url = "http://127.0.0.1:8545"
            log_level = "debug"
            poll_interval_ms = 250

            [funding]
            participant_wei = "2500000000000000"
            attacker_wei = "100000000000000000"
            token_amount = 100
            gas_limit = 100000
            approval_gas_price_wei = "2000000009"

            [secrets]
            deployer_key_env = "SWAPLAB_DEPLOYER_KEY"
            escrow_secret_env = "SWAPLAB_ESCROW_SECRET"

            [verification]
            enabled = true
            api_url = "https://api-sepolia.etherscan.io/api"
            api_key_env = "SWAPLAB_EXPLORER_KEY"
            compiler_version = "v0.8.21+commit.d9974bed"
            retry_delay_secs = 5
        "#;

        let config = ConfigLoader::from_toml(toml).unwrap();
        assert_eq!(config.network.log_level, "debug");
        assert_eq!(config.network.poll_interval_ms, 250);
        assert_eq!(config.funding.token_amount, 100);
        assert!(config.verification.enabled);
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml = r#"
network:
  rpc_url: "http://127.0.0.1:8545"
  log_level: debug
  poll_interval_ms: 250

funding:
  participant_wei: "2500000000000000"
  attacker_wei: "100000000000000000"
  token_amount: 100
  gas_limit: 100000
  approval_gas_price_wei: "2000000009"

secrets:
  deployer_key_env: SWAPLAB_DEPLOYER_KEY
  escrow_secret_env: SWAPLAB_ESCROW_SECRET

verification:
  enabled: false
        "#;

        let config = ConfigLoader::from_yaml(yaml).unwrap();
        assert_eq!(config.network.log_level, "debug");
        assert_eq!(config.funding.attacker_wei, "100000000000000000");
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"
{
  "network": {
    "rpc_url": "http://127.0.0.1:8545",
    "log_level": "debug",
    "poll_interval_ms": 250
  },
  "funding": {
    "participant_wei": "2500000000000000",
    "attacker_wei": "100000000000000000",
    "token_amount": 100,
    "gas_limit": 100000,
    "approval_gas_price_wei": "2000000009"
  },
  "secrets": {
    "deployer_key_env": "SWAPLAB_DEPLOYER_KEY",
    "escrow_secret_env": "SWAPLAB_ESCROW_SECRET"
  },
  "verification": {
    "enabled": false
  }
}
        "#;

        let config = ConfigLoader::from_json(json).unwrap();
        assert_eq!(config.network.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.funding.gas_limit, 100_000);
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let toml = r#"
            [network]
            rpc_url = "http://10.0.0.5:8545"
        "#;

        let config = ConfigLoader::from_toml(toml).unwrap();
        assert_eq!(config.network.rpc_url, "http://10.0.0.5:8545");
        assert_eq!(config.network.log_level, "info,swaplab=debug");
        assert_eq!(config.funding.participant_wei, "2500000000000000");
        assert_eq!(config.secrets.escrow_secret_env, "SWAPLAB_ESCROW_SECRET");
        assert!(!config.verification.enabled);
    }

    #[test]
    fn test_load_from_file() {
        let toml = r#"
[network]
rpc_url = "http://127.0.0.1:8545"
log_level = "debug"
        "#;

        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let config = ConfigLoader::from_file(file.path()).unwrap();
        assert_eq!(config.network.log_level, "debug");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let toml = r#"
[network]
rpc_url = "http://127.0.0.1:8545"
log_level = "debug"
        "#;

        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        // Prefix unique to this test so parallel tests cannot interfere.
        std::env::set_var("SWAPLAB_LOADER_TEST_NETWORK__LOG_LEVEL", "trace");
        let config =
            ConfigLoader::from_file_with_env(file.path(), "SWAPLAB_LOADER_TEST").unwrap();

        assert_eq!(config.network.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.network.log_level, "trace");
    }
}
