//! Chain-specific types and error definitions.

use alloy::primitives::TxHash;
use futures_util::future::BoxFuture;
use thiserror::Error;

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

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Contract return data could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid private key format or signing error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Signer has no RPC endpoint to send through.
    #[error("Blockchain not available: {0}")]
    NotAvailable(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Status code of a successful transaction.
pub const RECEIPT_STATUS_SUCCESS: u64 = 1;

/// Chain-confirmed outcome of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub status: u64,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == RECEIPT_STATUS_SUCCESS
    }
}

/// Pending wait for a receipt, driven to completion by whoever polls it.
pub type WaitReceipt<E> = BoxFuture<'static, Result<Receipt, E>>;
