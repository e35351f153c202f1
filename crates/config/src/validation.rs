//! Configuration validation

use crate::{AppConfig, ConfigError, Result};

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the entire application configuration
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    // Validate network config
    if let Err(e) = validate_url(&config.network.rpc_url) {
        errors.push(ValidationError::new("network.rpc_url", e));
    }

    if let Err(e) = validate_log_level(&config.network.log_level) {
        errors.push(e);
    }

    if config.network.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "network.poll_interval_ms",
            "must be greater than 0",
        ));
    }

    // Validate funding config
    if let Err(e) = validate_wei(&config.funding.participant_wei) {
        errors.push(ValidationError::new("funding.participant_wei", e));
    }

    if let Err(e) = validate_wei(&config.funding.attacker_wei) {
        errors.push(ValidationError::new("funding.attacker_wei", e));
    }

    if let Err(e) = validate_wei(&config.funding.approval_gas_price_wei) {
        errors.push(ValidationError::new("funding.approval_gas_price_wei", e));
    }

    if config.funding.token_amount == 0 {
        errors.push(ValidationError::new(
            "funding.token_amount",
            "must be greater than 0",
        ));
    }

    if config.funding.gas_limit < 21_000 {
        errors.push(ValidationError::new(
            "funding.gas_limit",
            "must cover at least a plain transfer (21000)",
        ));
    }

    // Validate secrets config
    if config.secrets.deployer_key_env.is_empty() {
        errors.push(ValidationError::new(
            "secrets.deployer_key_env",
            "variable name is required",
        ));
    }

    if config.secrets.escrow_secret_env.is_empty() {
        errors.push(ValidationError::new(
            "secrets.escrow_secret_env",
            "variable name is required",
        ));
    }

    // Validate verification config; the section is only binding when enabled
    if config.verification.enabled {
        if let Err(e) = validate_url(&config.verification.api_url) {
            errors.push(ValidationError::new("verification.api_url", e));
        }

        if config.verification.api_key_env.is_empty() {
            errors.push(ValidationError::new(
                "verification.api_key_env",
                "variable name is required",
            ));
        }

        if !config.verification.compiler_version.starts_with('v') {
            errors.push(ValidationError::new(
                "verification.compiler_version",
                "must be a full release string like v0.8.21+commit.d9974bed",
            ));
        }

        if config.verification.retry_delay_secs == 0 {
            errors.push(ValidationError::new(
                "verification.retry_delay_secs",
                "must be greater than 0",
            ));
        }
    }

    // Return all errors if any were found
    if !errors.is_empty() {
        let error_msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ConfigError::ValidationError(error_msg));
    }

    Ok(())
}

/// Validate a log filter string of comma-separated directives
///
/// Accepts plain levels ("info") and per-target directives ("swaplab=debug")
fn validate_log_level(filter: &str) -> std::result::Result<(), ValidationError> {
    const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

    for directive in filter.split(',') {
        let level = directive.rsplit('=').next().unwrap_or(directive).trim();
        if !LEVELS.contains(&level) {
            return Err(ValidationError::new(
                "network.log_level",
                format!("unknown level in directive '{directive}'"),
            ));
        }
    }
    Ok(())
}

/// Validate a URL
pub fn validate_url(url: &str) -> std::result::Result<(), String> {
    if url.is_empty() {
        return Err("URL cannot be empty".to_string());
    }

    if !url.starts_with("http://")
        && !url.starts_with("https://")
        && !url.starts_with("ws://")
        && !url.starts_with("wss://")
    {
        return Err(format!("URL must include a scheme: {url}"));
    }

    Ok(())
}

/// Validate a decimal wei amount
pub fn validate_wei(amount: &str) -> std::result::Result<(), String> {
    if amount.is_empty() {
        return Err("amount cannot be empty".to_string());
    }

    if !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("amount must be a plain decimal wei value: {amount}"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        validate_config(&AppConfig::default()).unwrap();
    }

    #[test]
    fn rejects_missing_url_scheme() {
        let mut config = AppConfig::default();
        config.network.rpc_url = "127.0.0.1:8545".to_string();

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("network.rpc_url"));
    }

    #[test]
    fn accepts_per_target_log_directives() {
        let mut config = AppConfig::default();
        config.network.log_level = "info,swaplab=debug,hyper=warn".to_string();
        validate_config(&config).unwrap();
    }

    #[test]
    fn rejects_unknown_log_levels() {
        let mut config = AppConfig::default();
        config.network.log_level = "verbose".to_string();

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn rejects_non_decimal_wei_amounts() {
        let mut config = AppConfig::default();
        config.funding.participant_wei = "0.0025 ether".to_string();

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("participant_wei"));
    }

    #[test]
    fn rejects_gas_limits_below_a_plain_transfer() {
        let mut config = AppConfig::default();
        config.funding.gas_limit = 20_000;

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("gas_limit"));
    }

    #[test]
    fn verification_section_is_only_binding_when_enabled() {
        let mut config = AppConfig::default();
        config.verification.api_url = String::new();
        config.verification.compiler_version = "0.8.21".to_string();

        // Disabled: bad values are ignored.
        validate_config(&config).unwrap();

        config.verification.enabled = true;
        let err = validate_config(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("verification.api_url"));
        assert!(message.contains("verification.compiler_version"));
    }

    #[test]
    fn reports_every_failure_at_once() {
        let mut config = AppConfig::default();
        config.network.rpc_url = "nowhere".to_string();
        config.funding.token_amount = 0;
        config.secrets.escrow_secret_env = String::new();

        let err = validate_config(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("network.rpc_url"));
        assert!(message.contains("funding.token_amount"));
        assert!(message.contains("secrets.escrow_secret_env"));
    }
}
