//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default so a missing file or section is accepted.

use serde::{Deserialize, Serialize};

/// Root configuration for the store client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Ledger node connection.
    pub network: NetworkConfig,

    /// Deployed contract location.
    pub contract: ContractConfig,

    /// Where accounts and signatures come from.
    pub wallet: WalletConfig,

    /// Purchase settings.
    pub purchase: PurchaseConfig,

    /// Front end behaviour.
    pub ui: UiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// JSON-RPC network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (31337 for a local Hardhat or Anvil node).
    pub chain_id: u64,

    /// Read request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations awaited after each transaction.
    pub confirmation_blocks: u64,

    /// Upper bound on a confirmation wait. Unbounded when unset.
    pub confirmation_timeout_secs: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: None,
        }
    }
}

/// Contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Address printed by the deploy command.
    pub address: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            // First contract deployed by the default Hardhat account.
            address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
        }
    }
}

/// Wallet source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletKind {
    /// Accounts unlocked on the JSON-RPC node; the node signs.
    Node,
    /// A private key read from the environment; signed locally.
    LocalKey,
    /// No wallet at all.
    Disabled,
}

/// Wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    pub kind: WalletKind,

    /// Environment variable holding the hex private key for `local_key`.
    pub private_key_env: String,

    /// How often the authorized account is polled for changes.
    pub account_poll_ms: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            kind: WalletKind::Node,
            private_key_env: "LOCAL_STORE_PRIVATE_KEY".to_string(),
            account_poll_ms: 2000,
        }
    }
}

/// Purchase configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PurchaseConfig {
    /// Ether sent with every purchase, independent of the product price.
    pub fixed_amount: String,

    /// Refuse a second purchase of a product while one is in flight.
    pub dedupe_in_flight: bool,
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            fixed_amount: "1".to_string(),
            dedupe_in_flight: true,
        }
    }
}

/// Front end configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    /// Seconds a transient error message stays visible.
    pub error_display_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            error_display_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
