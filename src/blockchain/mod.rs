//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! StoreConfig (RPC URL, wallet kind, contract address)
//!     → wallet.rs (detect provider, authorize account, watch for changes)
//!     → client.rs (RPC connection with timeouts)
//!     → binder.rs (LocalStore ABI + provider + account → ContractHandle)
//!     → deploy.rs (publish bytecode, report the new address)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - Reads have configurable timeouts; wallet prompts do not

pub mod binder;
pub mod client;
pub mod deploy;
pub mod types;
pub mod units;
pub mod wallet;

pub use binder::{AlloyBinder, BindSettings, ContractBinder, ContractHandle};
pub use client::BlockchainClient;
pub use types::{BlockchainError, BlockchainResult, ChainId, TxReceipt};
pub use units::Amount;
pub use wallet::{AccountWatcher, RpcWallet, WalletProvider};
