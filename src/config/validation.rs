//! Configuration validation.
//!
//! Serde handles syntax; this pass checks values. It collects every problem
//! instead of stopping at the first so a broken file can be fixed in one go.

use std::fmt;
use std::net::SocketAddr;

use alloy::primitives::Address;

use crate::blockchain::units::Amount;
use crate::config::schema::StoreConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &StoreConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.network.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::new("network.rpc_url", e.to_string()));
    }
    if config.network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("network.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.network.confirmation_blocks == 0 {
        errors.push(ValidationError::new(
            "network.confirmation_blocks",
            "must be at least 1",
        ));
    }
    if config.network.confirmation_timeout_secs == Some(0) {
        errors.push(ValidationError::new(
            "network.confirmation_timeout_secs",
            "must be greater than 0 when set",
        ));
    }

    if let Err(e) = config.contract.address.parse::<Address>() {
        errors.push(ValidationError::new("contract.address", e.to_string()));
    }

    if config.wallet.account_poll_ms == 0 {
        errors.push(ValidationError::new("wallet.account_poll_ms", "must be greater than 0"));
    }
    if config.wallet.private_key_env.trim().is_empty() {
        errors.push(ValidationError::new("wallet.private_key_env", "must not be empty"));
    }

    match Amount::from_decimal(&config.purchase.fixed_amount) {
        Ok(amount) if amount.is_zero() => {
            errors.push(ValidationError::new("purchase.fixed_amount", "must be positive"));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("purchase.fixed_amount", e.to_string())),
    }

    if config.ui.error_display_secs == 0 {
        errors.push(ValidationError::new("ui.error_display_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
