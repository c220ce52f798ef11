//! Contract deployment from a compiled artifact.
//!
//! # Responsibilities
//! - Extract creation bytecode from Hardhat or Foundry artifact JSON
//! - Submit the create transaction and wait for confirmation
//! - Report the deployed address (copied into `[contract] address` by hand)

use std::fs;
use std::path::Path;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use serde::Serialize;
use serde_json::Value;

use crate::blockchain::binder::{confirmation_policy, BindSettings};
use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Outcome of a successful deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deployment {
    pub address: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

/// Read creation bytecode from an artifact file.
pub fn load_bytecode(path: &Path) -> BlockchainResult<Bytes> {
    let content = fs::read_to_string(path).map_err(|e| {
        BlockchainError::Deploy(format!("cannot read artifact {}: {}", path.display(), e))
    })?;
    bytecode_from_artifact(&content)
}

/// Extract creation bytecode from artifact JSON.
///
/// Accepts Hardhat (`"bytecode": "0x…"`) and Foundry
/// (`"bytecode": {"object": "0x…"}`) layouts.
pub fn bytecode_from_artifact(json: &str) -> BlockchainResult<Bytes> {
    let artifact: Value = serde_json::from_str(json)
        .map_err(|e| BlockchainError::Deploy(format!("artifact is not valid JSON: {}", e)))?;

    let hex = match artifact.get("bytecode") {
        Some(Value::String(hex)) => hex.as_str(),
        Some(Value::Object(obj)) => obj
            .get("object")
            .and_then(Value::as_str)
            .ok_or_else(|| BlockchainError::Deploy("bytecode.object missing".to_string()))?,
        _ => return Err(BlockchainError::Deploy("artifact has no bytecode field".to_string())),
    };

    let bytecode: Bytes = hex
        .parse()
        .map_err(|e| BlockchainError::Deploy(format!("bytecode is not hex: {}", e)))?;
    if bytecode.is_empty() {
        return Err(BlockchainError::Deploy(
            "bytecode is empty; abstract contracts and interfaces cannot be deployed".to_string(),
        ));
    }
    Ok(bytecode)
}

/// Deploy `bytecode` from `from` and wait for the configured confirmations,
/// bounded by `confirmation_timeout_secs` when set.
pub async fn deploy(
    client: &BlockchainClient,
    from: Address,
    bytecode: Bytes,
) -> BlockchainResult<Deployment> {
    tracing::info!(from = %from, size = bytecode.len(), "Deploying LocalStore contract");

    let tx = TransactionRequest::default()
        .with_from(from)
        .with_deploy_code(bytecode);

    let pending = client
        .provider()
        .send_transaction(tx)
        .await
        .map_err(|e| match BlockchainError::from_rpc(&e) {
            BlockchainError::UserRejected => BlockchainError::UserRejected,
            other => BlockchainError::Deploy(other.to_string()),
        })?;

    let settings = BindSettings::from_network(client.config());
    let receipt = confirmation_policy(pending, &settings)
        .get_receipt()
        .await
        .map_err(|e| BlockchainError::Deploy(e.to_string()))?;

    if !receipt.status() {
        return Err(BlockchainError::Deploy(format!(
            "creation transaction {} reverted",
            receipt.transaction_hash
        )));
    }

    let address = receipt.contract_address.ok_or_else(|| {
        BlockchainError::Deploy("receipt carries no contract address".to_string())
    })?;

    tracing::info!(
        address = %address,
        tx_hash = %receipt.transaction_hash,
        "LocalStore deployed"
    );

    Ok(Deployment {
        address,
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
    })
}
