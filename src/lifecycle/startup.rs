//! Startup orchestration.
//!
//! # Responsibilities
//! - Detect the wallet provider from configuration
//! - Check the node serves the configured chain (warning only)
//! - Bind the store contract at the configured address

use std::sync::Arc;

use alloy::primitives::Address;
use thiserror::Error;

use crate::blockchain::binder::{AlloyBinder, ContractBinder};
use crate::blockchain::types::BlockchainError;
use crate::blockchain::units::{Amount, AmountError};
use crate::blockchain::wallet::{
    detect_provider, get_authorized_account, request_account, RpcWallet, WalletProvider,
};
use crate::config::{ConfigError, StoreConfig};
use crate::store::client::StoreClient;
use crate::view::controller::Gateway;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error("invalid purchase amount: {0}")]
    Amount(#[from] AmountError),

    #[error("no account is authorized; approve one in the wallet first")]
    NotAuthorized,
}

pub fn contract_address(config: &StoreConfig) -> Result<Address, BlockchainError> {
    config
        .contract
        .address
        .parse()
        .map_err(|_| BlockchainError::InvalidAddress(config.contract.address.clone()))
}

async fn check_chain(wallet: &RpcWallet) {
    match wallet.client().verify_chain_id().await {
        Ok(()) => tracing::debug!("Chain id verified"),
        Err(e) => tracing::warn!(error = %e, "Chain check failed, continuing"),
    }
}

/// Build the wallet gateway for the view controller.
///
/// `Ok(None)` means no provider is available; the session then runs in the
/// wallet-missing state.
pub async fn build_gateway(config: &StoreConfig) -> Result<Option<Gateway>, StartupError> {
    let Some(wallet) = detect_provider(config)? else {
        return Ok(None);
    };
    check_chain(&wallet).await;

    let address = contract_address(config)?;
    let binder = AlloyBinder::new(wallet.client(), address);
    tracing::info!(
        contract = %address,
        rpc_url = %config.network.rpc_url,
        "Wallet gateway ready"
    );

    Ok(Some(Gateway {
        wallet: Arc::new(wallet),
        binder: Arc::new(binder),
    }))
}

fn bind_store(
    config: &StoreConfig,
    wallet: &RpcWallet,
    account: Address,
) -> Result<StoreClient, StartupError> {
    let binder = AlloyBinder::new(wallet.client(), contract_address(config)?);
    let amount = Amount::from_decimal(&config.purchase.fixed_amount)?;
    Ok(StoreClient::new(binder.bind(account), amount))
}

/// Authorize an account and return a bound store client, for one-shot use.
///
/// May prompt the wallet owner.
pub async fn connect_store(config: &StoreConfig) -> Result<StoreClient, StartupError> {
    let wallet = detect_provider(config)?.ok_or(BlockchainError::NoProvider)?;
    check_chain(&wallet).await;

    let account = request_account(Some(&wallet as &dyn WalletProvider)).await?;
    bind_store(config, &wallet, account)
}

/// Bind a store client to an already-authorized account without prompting.
pub async fn open_store(config: &StoreConfig) -> Result<StoreClient, StartupError> {
    let wallet = detect_provider(config)?.ok_or(BlockchainError::NoProvider)?;
    check_chain(&wallet).await;

    let account = get_authorized_account(&wallet)
        .await
        .ok_or(StartupError::NotAuthorized)?;
    bind_store(config, &wallet, account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WalletKind;

    #[test]
    fn test_contract_address_parse() {
        let mut config = StoreConfig::default();
        assert!(contract_address(&config).is_ok());

        config.contract.address = "not-an-address".to_string();
        assert!(matches!(
            contract_address(&config),
            Err(BlockchainError::InvalidAddress(a)) if a == "not-an-address"
        ));
    }

    #[tokio::test]
    async fn test_disabled_wallet_yields_no_gateway() {
        let mut config = StoreConfig::default();
        config.wallet.kind = WalletKind::Disabled;
        assert!(build_gateway(&config).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_store_uses_authorized_account_without_prompt() {
        // Anvil's first account; publicly known and never holds real funds.
        const KEY_VAR: &str = "LOCAL_STORE_STARTUP_TEST_KEY";
        std::env::set_var(
            KEY_VAR,
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        );

        let mut config = StoreConfig::default();
        config.network.rpc_url = "http://127.0.0.1:1".to_string();
        config.network.rpc_timeout_secs = 1;
        config.wallet.kind = WalletKind::LocalKey;
        config.wallet.private_key_env = KEY_VAR.to_string();

        let store = open_store(&config).await.unwrap();
        let expected: Address = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap();
        assert_eq!(store.account(), expected);
    }

    #[tokio::test]
    async fn test_open_store_without_authorization() {
        let mut config = StoreConfig::default();
        config.network.rpc_url = "http://127.0.0.1:1".to_string();
        config.network.rpc_timeout_secs = 1;
        assert!(matches!(
            open_store(&config).await,
            Err(StartupError::NotAuthorized)
        ));

        config.wallet.kind = WalletKind::Disabled;
        assert!(matches!(
            open_store(&config).await,
            Err(StartupError::Blockchain(BlockchainError::NoProvider))
        ));
    }

    #[tokio::test]
    async fn test_connect_store_requires_provider() {
        let mut config = StoreConfig::default();
        config.wallet.kind = WalletKind::Disabled;
        assert!(matches!(
            connect_store(&config).await,
            Err(StartupError::Blockchain(BlockchainError::NoProvider))
        ));
    }
}
