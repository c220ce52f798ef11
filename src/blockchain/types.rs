//! Chain-specific types and error definitions.

use alloy::primitives::TxHash;
use alloy::rpc::types::TransactionReceipt;
use alloy::transports::{RpcError, TransportErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// EIP-1193 error code returned when the user declines a wallet request.
pub const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC error code for an unsupported method.
pub const METHOD_NOT_FOUND_CODE: i64 = -32601;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Clone, Error)]
pub enum BlockchainError {
    /// No wallet provider was detected.
    #[error("No wallet provider detected")]
    NoProvider,

    /// The wallet owner declined the request.
    #[error("Request rejected by the wallet user")]
    UserRejected,

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Transaction could not be submitted or confirmed.
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// An address string did not parse.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    /// Contract deployment failed.
    #[error("Deployment failed: {0}")]
    Deploy(String),
}

impl BlockchainError {
    /// Classify a transport-level error, recognising wallet rejections.
    pub fn from_rpc(err: &RpcError<TransportErrorKind>) -> Self {
        match err.as_error_resp() {
            Some(payload) if payload.code == USER_REJECTED_CODE => Self::UserRejected,
            _ => Self::Rpc(err.to_string()),
        }
    }

    /// Classify an error raised while submitting or awaiting a contract call.
    pub fn from_contract(err: alloy::contract::Error) -> Self {
        match err {
            alloy::contract::Error::TransportError(rpc) => match rpc.as_error_resp() {
                Some(payload) if payload.code == USER_REJECTED_CODE => Self::UserRejected,
                Some(payload) => Self::Transaction(payload.message.to_string()),
                None => Self::Transaction(rpc.to_string()),
            },
            other => Self::Transaction(other.to_string()),
        }
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Summary of a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// The transaction hash.
    pub tx_hash: TxHash,
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    /// Gas consumed by execution.
    pub gas_used: u64,
}

impl TxReceipt {
    /// Convert a successful receipt, failing with `Reverted` when execution reverted.
    pub fn from_receipt(receipt: &TransactionReceipt) -> BlockchainResult<Self> {
        if !receipt.status() {
            return Err(BlockchainError::Reverted(format!(
                "transaction {} reverted",
                receipt.transaction_hash
            )));
        }
        Ok(Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::rpc::json_rpc::ErrorPayload;

    fn rpc_error(code: i64, message: &'static str) -> RpcError<TransportErrorKind> {
        RpcError::ErrorResp(ErrorPayload {
            code,
            message: message.into(),
            data: None,
        })
    }

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(31337u64);
        assert_eq!(chain_id.0, 31337);
        assert_eq!(u64::from(chain_id), 31337);
    }

    #[test]
    fn test_user_rejection_is_recognised() {
        let err = BlockchainError::from_rpc(&rpc_error(4001, "User rejected the request."));
        assert!(matches!(err, BlockchainError::UserRejected));

        let err = BlockchainError::from_contract(alloy::contract::Error::TransportError(
            rpc_error(4001, "User denied transaction signature"),
        ));
        assert!(matches!(err, BlockchainError::UserRejected));
    }

    #[test]
    fn test_other_codes_are_not_rejections() {
        let err = BlockchainError::from_rpc(&rpc_error(-32000, "header not found"));
        assert!(matches!(err, BlockchainError::Rpc(_)));

        let err = BlockchainError::from_contract(alloy::contract::Error::TransportError(
            rpc_error(3, "execution reverted: out of stock"),
        ));
        match err {
            BlockchainError::Transaction(msg) => assert!(msg.contains("out of stock")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = BlockchainError::ChainMismatch {
            expected: 31337,
            actual: 1,
        };
        assert!(err.to_string().contains("31337"));
    }
}
