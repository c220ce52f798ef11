//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! local-store.toml (optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → StoreConfig (validated, immutable)
//!     → handed to wallet detection, binder and view settings at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a new contract address needs a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    ContractConfig, NetworkConfig, ObservabilityConfig, PurchaseConfig, StoreConfig, UiConfig,
    WalletConfig, WalletKind,
};
