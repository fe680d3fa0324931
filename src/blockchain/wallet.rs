//! Owner key management, hash signing and plain transaction sends.
//!
//! # Security
//! - Keys are never logged or serialized
//! - The owner key signs both the wallet's batches and the one-off
//!   deployment transaction

use alloy::network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash, B256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signature, SignerSync};
use async_trait::async_trait;
use url::Url;

use crate::blockchain::types::{BlockchainError, BlockchainResult, Receipt, WaitReceipt};

/// A plain (non-batched) transaction sent straight from the owner key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainTransaction {
    pub to: Address,
    pub data: Bytes,
    pub gas_limit: u64,
    pub chain_id: u64,
}

/// Broadcast transaction plus the handle that resolves to its receipt.
pub struct SentTransaction {
    pub tx_hash: TxHash,
    pub wait: WaitReceipt<BlockchainError>,
}

impl std::fmt::Debug for SentTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentTransaction")
            .field("tx_hash", &self.tx_hash)
            .finish_non_exhaustive()
    }
}

/// Signs and broadcasts plain transactions.
#[async_trait]
pub trait TransactionSender: Send + Sync {
    fn address(&self) -> Address;

    async fn send_transaction(&self, tx: PlainTransaction) -> BlockchainResult<SentTransaction>;
}

/// Owner key of the smart wallet.
#[derive(Debug, Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Endpoint used for plain transaction sends.
    rpc_url: Option<Url>,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::debug!(address = %signer.address(), "Signer initialized");

        Ok(Self {
            signer,
            rpc_url: None,
        })
    }

    /// Attach the node endpoint used by [`TransactionSender::send_transaction`].
    pub fn with_rpc_url(mut self, rpc_url: Url) -> Self {
        self.rpc_url = Some(rpc_url);
        self
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a 32-byte digest as-is (no message prefix).
    pub fn sign_hash(&self, hash: &B256) -> BlockchainResult<Signature> {
        self.signer
            .sign_hash_sync(hash)
            .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))
    }
}

#[async_trait]
impl TransactionSender for Wallet {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn send_transaction(&self, tx: PlainTransaction) -> BlockchainResult<SentTransaction> {
        let rpc_url = self
            .rpc_url
            .clone()
            .ok_or_else(|| BlockchainError::NotAvailable("signer has no RPC endpoint".into()))?;

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(self.signer.clone()))
            .connect_http(rpc_url);

        let request = TransactionRequest::default()
            .with_from(self.signer.address())
            .with_to(tx.to)
            .with_input(tx.data)
            .with_gas_limit(tx.gas_limit)
            .with_chain_id(tx.chain_id);

        let pending = provider
            .send_transaction(request)
            .await
            .map_err(|e| BlockchainError::Rpc(format!("eth_sendRawTransaction: {}", e)))?;
        let tx_hash = *pending.tx_hash();

        tracing::info!(tx_hash = %tx_hash, to = %tx.to, "Transaction broadcast");

        let wait: WaitReceipt<BlockchainError> = Box::pin(async move {
            let receipt = pending
                .get_receipt()
                .await
                .map_err(|e| BlockchainError::Rpc(format!("receipt: {}", e)))?;
            Ok(Receipt {
                tx_hash: receipt.transaction_hash,
                status: u64::from(receipt.status()),
            })
        });

        Ok(SentTransaction { tx_hash, wait })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::keccak256;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_wallet_with_0x_prefix() {
        let wallet = Wallet::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_invalid_private_key() {
        let result = Wallet::from_private_key("invalid_key");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_sign_hash_recovers_owner() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let digest = keccak256(b"relayed mint");
        let signature = wallet.sign_hash(&digest).unwrap();
        assert_eq!(signature.as_bytes().len(), 65);
        assert_eq!(
            signature.recover_address_from_prehash(&digest).unwrap(),
            wallet.address()
        );
    }

    #[tokio::test]
    async fn test_send_without_endpoint_fails() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let result = wallet
            .send_transaction(PlainTransaction {
                to: Address::ZERO,
                data: Bytes::new(),
                gas_limit: 21_000,
                chain_id: 1,
            })
            .await;
        assert!(matches!(result, Err(BlockchainError::NotAvailable(_))));
    }
}
