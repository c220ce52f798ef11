//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Build the JSON-RPC provider, with a local signer when one is configured
//! - Query the chain id under a read timeout
//! - Verify the node serves the configured chain

use std::future::IntoFuture;
use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::TransportResult;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::config::NetworkConfig;

/// Await `fut` for at most `limit`, classifying its error with `classify`.
pub async fn with_deadline<T, E, F>(
    limit: Duration,
    fut: F,
    classify: impl FnOnce(E) -> BlockchainError,
) -> BlockchainResult<T>
where
    F: IntoFuture<Output = Result<T, E>>,
{
    match timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(classify(e)),
        Err(_) => Err(BlockchainError::Timeout(limit.as_secs())),
    }
}

/// JSON-RPC client wrapper.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: DynProvider,
    config: NetworkConfig,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Build a client. No request is sent until the first call.
    ///
    /// With a `signer`, transactions are signed locally and sent raw.
    /// Without one, `eth_sendTransaction` leaves signing to the node.
    pub fn connect(
        config: &NetworkConfig,
        signer: Option<PrivateKeySigner>,
    ) -> BlockchainResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let provider = match signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_http(url)
                .erased(),
            None => ProviderBuilder::new().connect_http(url).erased(),
        };

        Ok(Self {
            provider,
            config: config.clone(),
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
        })
    }

    /// Run an RPC future under the read timeout.
    pub async fn timed<T, F>(&self, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        with_deadline(self.timeout_duration, fut, |e| BlockchainError::from_rpc(&e)).await
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.timed(self.provider.get_chain_id()).await.map(ChainId)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Get the network configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> NetworkConfig {
        NetworkConfig {
            // Nothing listens here; requests fail fast with a connection error.
            rpc_url: "http://127.0.0.1:1".to_string(),
            rpc_timeout_secs: 2,
            ..NetworkConfig::default()
        }
    }

    #[test]
    fn test_rejects_invalid_url() {
        let config = NetworkConfig {
            rpc_url: "::not a url::".to_string(),
            ..NetworkConfig::default()
        };
        let err = BlockchainClient::connect(&config, None).unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_an_rpc_error() {
        let client = BlockchainClient::connect(&test_config(), None).unwrap();
        let err = client.get_chain_id().await.unwrap_err();
        assert!(matches!(err, BlockchainError::Rpc(_) | BlockchainError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_deadline_elapses() {
        let result: BlockchainResult<()> = with_deadline(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<(), String>(())
            },
            BlockchainError::Rpc,
        )
        .await;
        assert!(matches!(result, Err(BlockchainError::Timeout(_))));
    }
}
