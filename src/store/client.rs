//! Typed store operations over a bound ledger.
//!
//! # Responsibilities
//! - Validate input locally before anything reaches the network
//! - Read the product list as an all-or-nothing snapshot
//! - Submit transactions and classify their failures

use std::sync::Arc;

use alloy::primitives::{Address, U256};

use crate::blockchain::types::TxReceipt;
use crate::blockchain::units::Amount;
use crate::observability::metrics;
use crate::store::ledger::StoreLedger;
use crate::store::types::{Balances, Product, ProductForm, StoreError, StoreResult};
use crate::store::validation::validate_product;

/// Store operations bound to one account.
#[derive(Clone)]
pub struct StoreClient {
    ledger: Arc<dyn StoreLedger>,
    /// Sent with every purchase regardless of the product's price.
    purchase_amount: Amount,
}

impl StoreClient {
    pub fn new(ledger: Arc<dyn StoreLedger>, purchase_amount: Amount) -> Self {
        Self {
            ledger,
            purchase_amount,
        }
    }

    /// The account this client transacts as.
    pub fn account(&self) -> Address {
        self.ledger.account()
    }

    pub fn purchase_amount(&self) -> Amount {
        self.purchase_amount
    }

    /// Read every product in index order.
    ///
    /// A failure on any index fails the whole read; partial lists are
    /// never returned.
    pub async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let count = self
            .ledger
            .product_count()
            .await
            .map_err(StoreError::from_read)?;

        let mut products = Vec::new();
        for index in 0..count {
            match self.ledger.product(index).await {
                Ok(product) => products.push(product),
                Err(e) => {
                    tracing::warn!(
                        index,
                        count,
                        fetched = products.len(),
                        error = %e,
                        "Product list read failed, discarding partial result"
                    );
                    return Err(StoreError::from_read(e));
                }
            }
        }

        tracing::debug!(count, "Product list read");
        Ok(products)
    }

    /// Validate and submit a new product, waiting for confirmation.
    pub async fn add_product(&self, form: &ProductForm) -> StoreResult<TxReceipt> {
        let product = validate_product(form).map_err(|e| {
            tracing::info!(error = %e, "Product form refused");
            StoreError::from(e)
        })?;

        tracing::info!(
            account = %self.account(),
            name = %product.name,
            price = %product.price,
            quantity = %product.quantity,
            "Submitting product"
        );

        let result = self
            .ledger
            .add_product(product)
            .await
            .map_err(StoreError::from_write);
        metrics::record_transaction("addProduct", result.is_ok());

        match &result {
            Ok(receipt) => tracing::info!(tx_hash = %receipt.tx_hash, "Product added"),
            Err(e) => tracing::warn!(error = %e, "Adding product failed"),
        }
        result
    }

    /// Purchase a product, paying the configured fixed amount.
    pub async fn purchase_product(&self, id: U256) -> StoreResult<TxReceipt> {
        tracing::debug!(
            product_id = %id,
            payment = %self.purchase_amount,
            "Purchase pays the configured amount, not the listed price"
        );

        let result = self
            .ledger
            .purchase_product(id, self.purchase_amount)
            .await
            .map_err(StoreError::from_write);
        metrics::record_transaction("purchaseProduct", result.is_ok());

        match &result {
            Ok(receipt) => {
                tracing::info!(product_id = %id, tx_hash = %receipt.tx_hash, "Product purchased")
            }
            Err(e) => tracing::warn!(product_id = %id, error = %e, "Purchase failed"),
        }
        result
    }

    pub async fn account_balance(&self, account: Address) -> StoreResult<Amount> {
        self.ledger
            .account_balance(account)
            .await
            .map_err(StoreError::from_read)
    }

    pub async fn store_balance(&self) -> StoreResult<Amount> {
        self.ledger
            .store_balance()
            .await
            .map_err(StoreError::from_read)
    }

    /// Both balances, read concurrently.
    pub async fn balances(&self) -> StoreResult<Balances> {
        let (account, store) = tokio::join!(
            self.account_balance(self.account()),
            self.store_balance()
        );
        Ok(Balances {
            account: account?,
            store: store?,
        })
    }
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("account", &self.account())
            .field("purchase_amount", &self.purchase_amount)
            .finish()
    }
}
