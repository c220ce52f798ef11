//! Store client subsystem.
//!
//! # Data Flow
//! ```text
//! ProductForm (raw strings)
//!     → validation.rs (local checks, decimal → wei)
//!     → client.rs (typed operations)
//!     → ledger.rs (StoreLedger trait, bound ContractHandle)
//!     → Product / Amount / TxReceipt back to the caller
//! ```

pub mod client;
pub mod ledger;
pub mod types;
pub mod validation;

pub use client::StoreClient;
pub use ledger::StoreLedger;
pub use types::{Balances, NewProduct, Product, ProductForm, StoreError, StoreResult};
pub use validation::ValidationError;
