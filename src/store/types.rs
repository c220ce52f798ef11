//! Store domain types and error taxonomy.

use std::str::FromStr;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::types::BlockchainError;
use crate::blockchain::units::Amount;
use crate::store::validation::ValidationError;

/// Snapshot of one product as stored by the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: U256,
    pub name: String,
    pub description: String,
    pub price: Amount,
    pub quantity: U256,
    pub category: String,
}

/// Raw add-product input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    /// Decimal ether amount, e.g. `"0.01"`.
    pub price: String,
    pub quantity: String,
    pub category: String,
}

impl ProductForm {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: impl Into<String>,
        quantity: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price: price.into(),
            quantity: quantity.into(),
            category: category.into(),
        }
    }
}

/// Parses `name | description | price | quantity | category`.
impl FromStr for ProductForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split('|').map(str::trim).collect();
        match fields.as_slice() {
            [name, description, price, quantity, category] => {
                Ok(Self::new(*name, *description, *price, *quantity, *category))
            }
            _ => Err(format!(
                "expected 5 fields separated by '|', got {}",
                fields.len()
            )),
        }
    }
}

/// A validated product ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Amount,
    pub quantity: U256,
    pub category: String,
}

/// Account and store balances read together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balances {
    pub account: Amount,
    pub store: Amount,
}

/// Failures surfaced by store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No wallet provider; fatal for the session.
    #[error("no wallet provider detected")]
    NoProvider,

    /// The wallet owner declined.
    #[error("request rejected in the wallet")]
    UserRejected,

    /// Local input check failed; nothing was sent.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Submission, confirmation or execution failed.
    #[error("transaction failed: {0}")]
    Transaction(String),

    /// A query failed.
    #[error("read failed: {0}")]
    Read(String),

    /// The wallet could not complete an account request.
    #[error("wallet connection failed: {0}")]
    Connect(String),
}

impl StoreError {
    /// Classify a failure on a read path.
    pub fn from_read(err: BlockchainError) -> Self {
        match err {
            BlockchainError::NoProvider => Self::NoProvider,
            BlockchainError::UserRejected => Self::UserRejected,
            other => Self::Read(other.to_string()),
        }
    }

    /// Classify a failure on a transaction path.
    pub fn from_write(err: BlockchainError) -> Self {
        match err {
            BlockchainError::NoProvider => Self::NoProvider,
            BlockchainError::UserRejected => Self::UserRejected,
            other => Self::Transaction(other.to_string()),
        }
    }

    /// Classify a failure of an account request.
    pub fn from_connect(err: BlockchainError) -> Self {
        match err {
            BlockchainError::NoProvider => Self::NoProvider,
            BlockchainError::UserRejected => Self::UserRejected,
            other => Self::Connect(other.to_string()),
        }
    }

    /// Everything except a missing provider can be retried by the user.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::NoProvider)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
