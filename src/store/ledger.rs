//! The call surface the store client needs from a bound contract.
//!
//! `ContractHandle` implements it over JSON-RPC; tests substitute an
//! in-memory ledger.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::blockchain::types::{BlockchainResult, TxReceipt};
use crate::blockchain::units::Amount;
use crate::store::types::{NewProduct, Product};

#[async_trait]
pub trait StoreLedger: Send + Sync {
    /// Account every transaction is sent from.
    fn account(&self) -> Address;

    async fn product_count(&self) -> BlockchainResult<u64>;

    async fn product(&self, index: u64) -> BlockchainResult<Product>;

    /// Submit and wait for confirmation.
    async fn add_product(&self, product: NewProduct) -> BlockchainResult<TxReceipt>;

    /// Submit with `payment` attached and wait for confirmation.
    async fn purchase_product(&self, id: U256, payment: Amount) -> BlockchainResult<TxReceipt>;

    async fn account_balance(&self, account: Address) -> BlockchainResult<Amount>;

    /// Ether held by the contract itself.
    async fn store_balance(&self) -> BlockchainResult<Amount>;
}
