//! Integration tests for the config crate

use swaplab_config::{validate_config, AppConfig, ConfigLoader};

fn repo_config(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../config")
        .join(name)
}

#[test]
fn test_load_local_config() {
    let config = ConfigLoader::from_file(&repo_config("local.toml"))
        .expect("Failed to load local config");

    assert_eq!(config.network.rpc_url, "http://127.0.0.1:8545");
    assert_eq!(config.network.poll_interval_ms, 250);
    assert!(!config.verification.enabled);
    validate_config(&config).expect("local config should validate");
}

#[test]
fn test_load_testnet_config() {
    let config = ConfigLoader::from_file(&repo_config("testnet.toml"))
        .expect("Failed to load testnet config");

    assert!(config.verification.enabled);
    assert_eq!(
        config.verification.api_url,
        "https://api-sepolia.etherscan.io/api"
    );
    validate_config(&config).expect("testnet config should validate");
}

#[test]
fn test_shipped_configs_share_the_exercise_amounts() {
    let local = ConfigLoader::from_file(&repo_config("local.toml")).unwrap();
    let testnet = ConfigLoader::from_file(&repo_config("testnet.toml")).unwrap();

    assert_eq!(local.funding.participant_wei, testnet.funding.participant_wei);
    assert_eq!(local.funding.token_amount, testnet.funding.token_amount);
    assert_eq!(local.funding.token_amount, 100);
}

#[test]
fn test_default_config_round_trips_through_toml() {
    let default = AppConfig::default();
    let serialized = toml::to_string(&default).expect("serialize default config");
    let reloaded = ConfigLoader::from_toml(&serialized).expect("reload default config");

    assert_eq!(default.network.rpc_url, reloaded.network.rpc_url);
    assert_eq!(
        default.funding.approval_gas_price_wei,
        reloaded.funding.approval_gas_price_wei
    );
    validate_config(&reloaded).expect("default config should validate");
}
