//! Wallet gateway: provider detection and account authorization.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, METHOD_NOT_FOUND_CODE};
use crate::config::{StoreConfig, WalletKind};

/// Account source exposing the two EIP-1193 account methods.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts already authorized (`eth_accounts`). Never prompts.
    async fn authorized_accounts(&self) -> BlockchainResult<Vec<Address>>;

    /// Ask for authorization (`eth_requestAccounts`). May prompt the user.
    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>>;
}

#[derive(Debug, Clone)]
enum Signing {
    /// The node holds the keys and signs `eth_sendTransaction`.
    Node,
    /// A local key signs; its address is the only account.
    LocalKey(Address),
}

/// Wallet backed by a JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcWallet {
    client: BlockchainClient,
    signing: Signing,
}

impl RpcWallet {
    /// Wallet whose accounts live on the node.
    pub fn node(client: BlockchainClient) -> Self {
        Self {
            client,
            signing: Signing::Node,
        }
    }

    /// Wallet signing locally with a hex private key (with or without `0x`).
    pub fn from_private_key(config: &StoreConfig, private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;
        let address = signer.address();
        let client = BlockchainClient::connect(&config.network, Some(signer))?;

        tracing::info!(address = %address, "Local key wallet initialized");

        Ok(Self {
            client,
            signing: Signing::LocalKey(address),
        })
    }

    /// The RPC client transactions and reads go through.
    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn authorized_accounts(&self) -> BlockchainResult<Vec<Address>> {
        match &self.signing {
            Signing::LocalKey(address) => Ok(vec![*address]),
            Signing::Node => self.client.timed(self.client.provider().get_accounts()).await,
        }
    }

    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        match &self.signing {
            Signing::LocalKey(address) => Ok(vec![*address]),
            Signing::Node => {
                // No deadline: a wallet prompt waits on a human.
                let requested = self
                    .client
                    .provider()
                    .raw_request::<_, Vec<Address>>("eth_requestAccounts".into(), ())
                    .await;
                match requested {
                    Ok(accounts) => Ok(accounts),
                    Err(e)
                        if e.as_error_resp()
                            .is_some_and(|p| p.code == METHOD_NOT_FOUND_CODE) =>
                    {
                        tracing::debug!("Node lacks eth_requestAccounts, falling back to eth_accounts");
                        self.authorized_accounts().await
                    }
                    Err(e) => Err(BlockchainError::from_rpc(&e)),
                }
            }
        }
    }
}

/// Detect the configured wallet provider.
///
/// Returns `Ok(None)` when the wallet is disabled or the key variable is
/// unset; malformed settings are errors.
pub fn detect_provider(config: &StoreConfig) -> BlockchainResult<Option<RpcWallet>> {
    match config.wallet.kind {
        WalletKind::Disabled => Ok(None),
        WalletKind::Node => {
            let client = BlockchainClient::connect(&config.network, None)?;
            Ok(Some(RpcWallet::node(client)))
        }
        WalletKind::LocalKey => match std::env::var(&config.wallet.private_key_env) {
            Ok(key) => RpcWallet::from_private_key(config, key.trim()).map(Some),
            Err(_) => {
                tracing::warn!(
                    variable = %config.wallet.private_key_env,
                    "Private key variable not set, no wallet available"
                );
                Ok(None)
            }
        },
    }
}

/// First already-authorized account, without prompting.
pub async fn get_authorized_account(wallet: &dyn WalletProvider) -> Option<Address> {
    match wallet.authorized_accounts().await {
        Ok(accounts) => accounts.first().copied(),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read authorized accounts");
            None
        }
    }
}

/// Request authorization and return the first granted account.
pub async fn request_account(wallet: Option<&dyn WalletProvider>) -> BlockchainResult<Address> {
    let wallet = wallet.ok_or(BlockchainError::NoProvider)?;
    let accounts = wallet.request_accounts().await?;
    accounts.first().copied().ok_or(BlockchainError::UserRejected)
}

/// Polls the wallet and publishes the active account whenever it changes.
pub struct AccountWatcher;

impl AccountWatcher {
    /// Spawn the polling task. It exits once every receiver is dropped.
    pub fn spawn(
        wallet: Arc<dyn WalletProvider>,
        poll_interval: Duration,
        initial: Option<Address>,
    ) -> watch::Receiver<Option<Address>> {
        let (tx, rx) = watch::channel(initial);

        tokio::spawn(async move {
            let mut ticker = interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the initial value is already known.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    _ = ticker.tick() => {}
                }

                match wallet.authorized_accounts().await {
                    Ok(accounts) => {
                        let current = accounts.first().copied();
                        tx.send_if_modified(|last| {
                            if *last == current {
                                return false;
                            }
                            tracing::info!(previous = ?*last, current = ?current, "Active account changed");
                            *last = current;
                            true
                        });
                    }
                    Err(e) => tracing::warn!(error = %e, "Account poll failed"),
                }
            }

            tracing::debug!("Account watcher stopped");
        });

        rx
    }
}
