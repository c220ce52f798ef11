//! Contract binding: ties the provider, the LocalStore ABI and a signer
//! account into a handle the store client calls through.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::network::Ethereum;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider};
use alloy::sol;
use async_trait::async_trait;

use crate::blockchain::client::{with_deadline, BlockchainClient};
use crate::blockchain::types::{BlockchainError, BlockchainResult, TxReceipt};
use crate::blockchain::units::Amount;
use crate::config::NetworkConfig;
use crate::observability::metrics;
use crate::store::ledger::StoreLedger;
use crate::store::types::{NewProduct, Product};

sol! {
    /// On-chain product catalogue with payable purchases.
    #[sol(rpc)]
    contract LocalStore {
        function getBalance() external view returns (uint256);

        function addProduct(
            string memory name,
            string memory description,
            uint256 price,
            uint256 quantity,
            string memory category
        ) external;

        function purchaseProduct(uint256 productId) external payable;

        function getProductCount() external view returns (uint256);

        function getProduct(uint256 index) external view returns (
            uint256 id,
            string memory name,
            string memory description,
            uint256 price,
            uint256 quantity,
            string memory category
        );
    }
}

/// Timing knobs applied to every handle a binder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindSettings {
    /// Deadline for view calls and balance reads.
    pub read_timeout: Duration,
    /// Blocks to wait for after a transaction is mined.
    pub confirmations: u64,
    /// Optional cap on the confirmation wait.
    pub confirmation_timeout: Option<Duration>,
}

impl BindSettings {
    pub fn from_network(config: &NetworkConfig) -> Self {
        Self {
            read_timeout: Duration::from_secs(config.rpc_timeout_secs),
            confirmations: config.confirmation_blocks,
            confirmation_timeout: config.confirmation_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Apply the configured confirmation depth and deadline to a pending transaction.
pub(crate) fn confirmation_policy(
    pending: PendingTransactionBuilder<Ethereum>,
    settings: &BindSettings,
) -> PendingTransactionBuilder<Ethereum> {
    pending
        .with_required_confirmations(settings.confirmations)
        .with_timeout(settings.confirmation_timeout)
}

/// LocalStore contract bound to one signing account.
pub struct ContractHandle {
    contract: LocalStore::LocalStoreInstance<DynProvider>,
    account: Address,
    settings: BindSettings,
}

impl ContractHandle {
    /// Bind without any I/O. `account` must already be authorized.
    pub fn bind(
        provider: DynProvider,
        address: Address,
        account: Address,
        settings: BindSettings,
    ) -> Self {
        Self {
            contract: LocalStore::new(address, provider),
            account,
            settings,
        }
    }

    /// Address of the bound contract.
    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn read<T, F>(&self, operation: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, alloy::contract::Error>>,
    {
        let started = Instant::now();
        let result = with_deadline(self.settings.read_timeout, fut, |e| {
            BlockchainError::Rpc(e.to_string())
        })
        .await;
        metrics::record_contract_call(operation, result.is_ok(), started);
        if let Err(e) = &result {
            tracing::debug!(operation, error = %e, "Contract read failed");
        }
        result
    }

    async fn confirm(
        &self,
        operation: &'static str,
        pending: PendingTransactionBuilder<Ethereum>,
    ) -> BlockchainResult<TxReceipt> {
        let tx_hash = *pending.tx_hash();
        tracing::info!(
            operation,
            tx_hash = %tx_hash,
            confirmations = self.settings.confirmations,
            "Transaction submitted, awaiting confirmation"
        );

        let receipt = confirmation_policy(pending, &self.settings)
            .get_receipt()
            .await
            .map_err(|e| BlockchainError::Transaction(e.to_string()))?;

        TxReceipt::from_receipt(&receipt)
    }
}

#[async_trait]
impl StoreLedger for ContractHandle {
    fn account(&self) -> Address {
        self.account
    }

    async fn product_count(&self) -> BlockchainResult<u64> {
        let count = self
            .read("getProductCount", self.contract.getProductCount().call())
            .await?;
        u64::try_from(count)
            .map_err(|_| BlockchainError::Rpc(format!("product count {count} out of range")))
    }

    async fn product(&self, index: u64) -> BlockchainResult<Product> {
        let raw = self
            .read("getProduct", self.contract.getProduct(U256::from(index)).call())
            .await?;
        Ok(Product {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            price: Amount::from_wei(raw.price),
            quantity: raw.quantity,
            category: raw.category,
        })
    }

    async fn add_product(&self, product: NewProduct) -> BlockchainResult<TxReceipt> {
        let pending = self
            .contract
            .addProduct(
                product.name,
                product.description,
                product.price.wei(),
                product.quantity,
                product.category,
            )
            .from(self.account)
            .send()
            .await
            .map_err(BlockchainError::from_contract)?;
        self.confirm("addProduct", pending).await
    }

    async fn purchase_product(&self, id: U256, payment: Amount) -> BlockchainResult<TxReceipt> {
        let pending = self
            .contract
            .purchaseProduct(id)
            .from(self.account)
            .value(payment.wei())
            .send()
            .await
            .map_err(BlockchainError::from_contract)?;
        self.confirm("purchaseProduct", pending).await
    }

    async fn account_balance(&self, account: Address) -> BlockchainResult<Amount> {
        let started = Instant::now();
        let result = with_deadline(
            self.settings.read_timeout,
            self.contract.provider().get_balance(account),
            |e| BlockchainError::from_rpc(&e),
        )
        .await;
        metrics::record_contract_call("eth_getBalance", result.is_ok(), started);
        result.map(Amount::from_wei)
    }

    async fn store_balance(&self) -> BlockchainResult<Amount> {
        self.read("getBalance", self.contract.getBalance().call())
            .await
            .map(Amount::from_wei)
    }
}

/// Produces a fresh ledger handle for an account.
///
/// Called again whenever the active account changes.
pub trait ContractBinder: Send + Sync {
    fn bind(&self, account: Address) -> Arc<dyn StoreLedger>;
}

/// Binder over a live JSON-RPC provider.
#[derive(Clone)]
pub struct AlloyBinder {
    provider: DynProvider,
    address: Address,
    settings: BindSettings,
}

impl AlloyBinder {
    pub fn new(client: &BlockchainClient, address: Address) -> Self {
        Self {
            provider: client.provider().clone(),
            address,
            settings: BindSettings::from_network(client.config()),
        }
    }

    pub fn bind_handle(&self, account: Address) -> ContractHandle {
        ContractHandle::bind(self.provider.clone(), self.address, account, self.settings)
    }
}

impl ContractBinder for AlloyBinder {
    fn bind(&self, account: Address) -> Arc<dyn StoreLedger> {
        tracing::debug!(contract = %self.address, account = %account, "Binding contract handle");
        Arc::new(self.bind_handle(account))
    }
}
