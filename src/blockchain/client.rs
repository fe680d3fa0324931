//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint
//! - Query chain state (chain id, balances, code, read-only calls)
//! - Bound every read with a deadline

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};

/// Read-only chain access used by the fee selector and the wallet adapter.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Chain identity reported by the node.
    async fn chain_id(&self) -> BlockchainResult<ChainId>;

    /// Native balance at the latest block.
    async fn balance_at(&self, address: Address) -> BlockchainResult<U256>;

    /// `eth_call` against `to` at the latest block.
    async fn call_contract(&self, to: Address, data: Bytes) -> BlockchainResult<Bytes>;

    /// Deployed bytecode, empty when nothing lives at the address.
    async fn code_at(&self, address: Address) -> BlockchainResult<Bytes>;
}

/// Blockchain RPC client wrapper.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    rpc_url: Url,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// No request is made here; an unreachable node surfaces on first use.
    pub fn new(rpc_url: &str, timeout_duration: Duration) -> BlockchainResult<Self> {
        let url: Url = rpc_url
            .parse()
            .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;

        let provider = Arc::new(ProviderBuilder::new().connect_http(url.clone()))
            as Arc<dyn Provider + Send + Sync>;

        tracing::debug!(host = ?url.host_str(), "Blockchain client initialized");

        Ok(Self {
            provider,
            rpc_url: url,
            timeout_duration,
        })
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self, expected: u64) -> BlockchainResult<()> {
        let chain_id = self.chain_id().await?;
        if chain_id.0 != expected {
            return Err(BlockchainError::ChainMismatch {
                expected,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Endpoint the client talks to, access key included.
    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    async fn bounded<F, T, E>(&self, op: &'static str, call: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.timeout_duration, call.into_future()).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(op, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{}: {}", op, e)))
            }
            Err(_) => {
                tracing::warn!(op, "RPC timeout");
                Err(BlockchainError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

#[async_trait]
impl ChainProvider for BlockchainClient {
    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        self.bounded("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    async fn balance_at(&self, address: Address) -> BlockchainResult<U256> {
        self.bounded("eth_getBalance", self.provider.get_balance(address))
            .await
    }

    async fn call_contract(&self, to: Address, data: Bytes) -> BlockchainResult<Bytes> {
        let request = TransactionRequest::default().with_to(to).with_input(data);
        self.bounded("eth_call", self.provider.call(request)).await
    }

    async fn code_at(&self, address: Address) -> BlockchainResult<Bytes> {
        self.bounded("eth_getCode", self.provider.get_code_at(address))
            .await
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("host", &self.rpc_url.host_str())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
