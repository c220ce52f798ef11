//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::StoreConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<StoreConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load the file if it exists, otherwise fall back to validated defaults.
pub fn load_or_default(path: &Path) -> Result<StoreConfig, ConfigError> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        let config = StoreConfig::default();
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<StoreConfig, ConfigError> {
    let config: StoreConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("local_store_loader_test.toml");
        fs::write(
            &path,
            "[contract]\naddress = \"0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(
            config.contract.address,
            "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"
        );

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("local_store_definitely_missing.toml");
        let config = load_or_default(&path).unwrap();
        assert_eq!(config.network.rpc_url, "http://localhost:8545");
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = parse_config("[network]\nrpc_timeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("network.rpc_timeout_secs"));
    }

    #[test]
    fn test_syntax_errors_are_parse_errors() {
        let err = parse_config("[network\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
