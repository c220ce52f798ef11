//! Shared in-memory doubles for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use local_store::blockchain::units::Amount;
use local_store::blockchain::{BlockchainError, BlockchainResult, ContractBinder, TxReceipt, WalletProvider};
use local_store::store::{NewProduct, Product, StoreLedger};

pub fn account(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn ether(value: &str) -> Amount {
    Amount::from_decimal(value).unwrap()
}

/// Contract state shared by every handle bound from one binder.
#[derive(Default)]
pub struct Chain {
    pub products: Vec<Product>,
    pub balances: std::collections::HashMap<Address, Amount>,
    pub store_balance: Amount,
    pub tx_count: u64,
}

#[derive(Default)]
pub struct Calls {
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub product_count: AtomicUsize,
    pub product: AtomicUsize,
    pub store_balance: AtomicUsize,
}

/// Shared backing store for `MemoryLedger` handles.
#[derive(Default)]
pub struct LedgerState {
    pub chain: Mutex<Chain>,
    pub calls: Calls,
    /// Fail every read with an RPC error.
    pub fail_reads: AtomicBool,
    /// Fail the product read at this index only; earlier indices succeed.
    pub fail_product_index: Mutex<Option<u64>>,
    /// Wallet owners decline every transaction.
    pub reject_writes: AtomicBool,
    /// Simulated confirmation latency for purchases, in milliseconds.
    pub purchase_delay_ms: AtomicU64,
}

impl LedgerState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fund(&self, account: Address, amount: Amount) {
        self.chain.lock().unwrap().balances.insert(account, amount);
    }

    pub fn seed(&self, name: &str, price: &str, quantity: u64) {
        let mut chain = self.chain.lock().unwrap();
        let id = U256::from(chain.products.len());
        chain.products.push(Product {
            id,
            name: name.to_string(),
            description: format!("{name} description"),
            price: ether(price),
            quantity: U256::from(quantity),
            category: "General".to_string(),
        });
    }

    pub fn writes(&self) -> usize {
        self.calls.writes.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.calls.reads.load(Ordering::SeqCst)
    }

    pub fn product_count_calls(&self) -> usize {
        self.calls.product_count.load(Ordering::SeqCst)
    }

    pub fn product_calls(&self) -> usize {
        self.calls.product.load(Ordering::SeqCst)
    }

    pub fn store_balance_calls(&self) -> usize {
        self.calls.store_balance.load(Ordering::SeqCst)
    }

    fn read_guard(&self) -> BlockchainResult<()> {
        self.calls.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("connection refused".to_string()));
        }
        Ok(())
    }

    fn write_guard(&self) -> BlockchainResult<TxReceipt> {
        self.calls.writes.fetch_add(1, Ordering::SeqCst);
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(BlockchainError::UserRejected);
        }
        let mut chain = self.chain.lock().unwrap();
        chain.tx_count += 1;
        Ok(TxReceipt {
            tx_hash: TxHash::with_last_byte(chain.tx_count as u8),
            block_number: Some(chain.tx_count),
            gas_used: 21_000,
        })
    }
}

/// In-memory stand-in for a bound contract handle.
pub struct MemoryLedger {
    pub state: Arc<LedgerState>,
    pub account: Address,
}

impl MemoryLedger {
    pub fn new(state: Arc<LedgerState>, account: Address) -> Self {
        Self { state, account }
    }
}

#[async_trait]
impl StoreLedger for MemoryLedger {
    fn account(&self) -> Address {
        self.account
    }

    async fn product_count(&self) -> BlockchainResult<u64> {
        self.state.calls.product_count.fetch_add(1, Ordering::SeqCst);
        self.state.read_guard()?;
        Ok(self.state.chain.lock().unwrap().products.len() as u64)
    }

    async fn product(&self, index: u64) -> BlockchainResult<Product> {
        self.state.calls.product.fetch_add(1, Ordering::SeqCst);
        self.state.read_guard()?;
        if *self.state.fail_product_index.lock().unwrap() == Some(index) {
            return Err(BlockchainError::Timeout(10));
        }
        self.state
            .chain
            .lock()
            .unwrap()
            .products
            .get(index as usize)
            .cloned()
            .ok_or_else(|| BlockchainError::Reverted("index out of range".to_string()))
    }

    async fn add_product(&self, product: NewProduct) -> BlockchainResult<TxReceipt> {
        let receipt = self.state.write_guard()?;
        let mut chain = self.state.chain.lock().unwrap();
        let id = U256::from(chain.products.len());
        chain.products.push(Product {
            id,
            name: product.name,
            description: product.description,
            price: product.price,
            quantity: product.quantity,
            category: product.category,
        });
        Ok(receipt)
    }

    async fn purchase_product(&self, id: U256, payment: Amount) -> BlockchainResult<TxReceipt> {
        let delay = self.state.purchase_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        {
            let chain = self.state.chain.lock().unwrap();
            let index: usize = id.try_into().unwrap_or(usize::MAX);
            match chain.products.get(index) {
                None => {
                    self.state.calls.writes.fetch_add(1, Ordering::SeqCst);
                    return Err(BlockchainError::Reverted("product does not exist".to_string()));
                }
                Some(p) if p.quantity.is_zero() => {
                    self.state.calls.writes.fetch_add(1, Ordering::SeqCst);
                    return Err(BlockchainError::Reverted("out of stock".to_string()));
                }
                Some(_) => {}
            }
        }

        let receipt = self.state.write_guard()?;
        let mut chain = self.state.chain.lock().unwrap();
        let index: usize = id.try_into().unwrap_or(usize::MAX);
        chain.products[index].quantity -= U256::from(1u8);
        let balance = chain.balances.get(&self.account).copied().unwrap_or_default();
        chain.balances.insert(
            self.account,
            Amount::from_wei(balance.wei().saturating_sub(payment.wei())),
        );
        chain.store_balance = Amount::from_wei(chain.store_balance.wei() + payment.wei());
        Ok(receipt)
    }

    async fn account_balance(&self, account: Address) -> BlockchainResult<Amount> {
        self.state.read_guard()?;
        Ok(self
            .state
            .chain
            .lock()
            .unwrap()
            .balances
            .get(&account)
            .copied()
            .unwrap_or_default())
    }

    async fn store_balance(&self) -> BlockchainResult<Amount> {
        self.state.calls.store_balance.fetch_add(1, Ordering::SeqCst);
        self.state.read_guard()?;
        Ok(self.state.chain.lock().unwrap().store_balance)
    }
}

/// Binder producing `MemoryLedger` handles and recording every bind.
pub struct MemoryBinder {
    pub state: Arc<LedgerState>,
    pub bound: Mutex<Vec<Address>>,
}

impl MemoryBinder {
    pub fn new(state: Arc<LedgerState>) -> Arc<Self> {
        Arc::new(Self {
            state,
            bound: Mutex::new(Vec::new()),
        })
    }

    pub fn bound(&self) -> Vec<Address> {
        self.bound.lock().unwrap().clone()
    }
}

impl ContractBinder for MemoryBinder {
    fn bind(&self, account: Address) -> Arc<dyn StoreLedger> {
        self.bound.lock().unwrap().push(account);
        Arc::new(MemoryLedger::new(self.state.clone(), account))
    }
}

/// How `ScriptedWallet` answers a connect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    Grant(Address),
    Reject,
    /// The node errors out instead of answering.
    Fail,
}

/// Wallet whose authorized accounts are set by the test.
pub struct ScriptedWallet {
    pub authorized: Mutex<Vec<Address>>,
    pub approval: Mutex<Approval>,
    pub requests: AtomicUsize,
}

impl ScriptedWallet {
    pub fn new(authorized: Option<Address>, approval: Approval) -> Arc<Self> {
        Arc::new(Self {
            authorized: Mutex::new(authorized.into_iter().collect()),
            approval: Mutex::new(approval),
            requests: AtomicUsize::new(0),
        })
    }

    /// Simulate the user switching or disconnecting accounts in the wallet.
    pub fn set_authorized(&self, account: Option<Address>) {
        *self.authorized.lock().unwrap() = account.into_iter().collect();
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for ScriptedWallet {
    async fn authorized_accounts(&self) -> BlockchainResult<Vec<Address>> {
        Ok(self.authorized.lock().unwrap().clone())
    }

    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let approval = *self.approval.lock().unwrap();
        match approval {
            Approval::Grant(account) => {
                self.set_authorized(Some(account));
                Ok(vec![account])
            }
            Approval::Reject => Err(BlockchainError::UserRejected),
            Approval::Fail => Err(BlockchainError::Rpc("connection refused".to_string())),
        }
    }
}
