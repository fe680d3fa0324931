//! Smart wallet abstraction and its relayer-backed implementation.
//!
//! # Responsibilities
//! - Derive the counterfactual wallet address from its owner and context
//! - Report deployment status and build the deployment payload
//! - Sign transaction batches with the owner key
//! - Quote fees and submit signed batches through the relayer
//!
//! The wallet is a single-owner proxy created through a CREATE2 factory. Its
//! salt is the image hash of the signer configuration, so the address is
//! known before any code exists on-chain.

use alloy::primitives::{hex, keccak256, Address, Bytes, B256, U256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::abi::{IModuleCalls, IWalletFactory, MetaTransaction};
use crate::blockchain::{ChainProvider, WaitReceipt, Wallet};
use crate::config::WalletContextConfig;
use crate::relayer::client::RelayerClient;
use crate::relayer::types::{FeeOption, FeeQuote, MetaTxnId, RelayerError, Transaction, WalletConfig};

/// Proxy bytecode prefix; the main module address is appended as a word.
pub const WALLET_CREATION_CODE: [u8; 40] =
    hex!("603a600e3d39601a805130553df3363d3d373d3d3d363d30545af43d82803e903d91601857fd5bf3");

/// Signature part flag for an ECDSA signer entry.
const FLAG_SIGNATURE: u8 = 0x00;

/// Trailing byte marking a signature over the raw digest.
const SIG_TYPE_EIP712: u8 = 0x01;

/// Factory call that deploys the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletDeployment {
    pub factory: Address,
    pub data: Bytes,
}

/// A batch signed by the wallet owner, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedBatch {
    pub wallet: Address,
    pub chain_id: u64,
    pub nonce: U256,
    pub transactions: Vec<Transaction>,
    pub digest: B256,
    pub signature: Bytes,
}

/// Accepted meta-transaction and the handle resolving to its receipt.
pub struct Submission {
    pub meta_txn_id: MetaTxnId,
    pub wait: WaitReceipt<RelayerError>,
}

impl std::fmt::Debug for Submission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submission")
            .field("meta_txn_id", &self.meta_txn_id)
            .finish_non_exhaustive()
    }
}

/// Contract-based account that executes batched transactions.
#[async_trait]
pub trait SmartWallet: Send + Sync {
    /// Counterfactual address, valid before deployment.
    fn address(&self) -> Address;

    /// Signer configuration controlling the wallet.
    fn config(&self) -> WalletConfig;

    /// Factory call that brings the wallet on-chain.
    fn deployment(&self) -> Result<WalletDeployment, RelayerError>;

    async fn is_deployed(&self) -> Result<bool, RelayerError>;

    async fn fee_options(
        &self,
        txs: &[Transaction],
    ) -> Result<(Vec<FeeOption>, Option<FeeQuote>), RelayerError>;

    async fn sign_transactions(&self, txs: Vec<Transaction>) -> Result<SignedBatch, RelayerError>;

    async fn send_transactions(
        &self,
        signed: SignedBatch,
        quote: Option<FeeQuote>,
    ) -> Result<Submission, RelayerError>;
}

/// Single-owner wallet relayed through [`RelayerClient`].
pub struct RelayerWallet {
    owner: Wallet,
    chain: Arc<dyn ChainProvider>,
    relayer: RelayerClient,
    context: WalletContextConfig,
    chain_id: u64,
    address: Address,
}

impl RelayerWallet {
    pub fn new(
        owner: Wallet,
        chain: Arc<dyn ChainProvider>,
        relayer: RelayerClient,
        context: WalletContextConfig,
        chain_id: u64,
    ) -> Self {
        let image_hash = image_hash(&WalletConfig::single_owner(owner.address()));
        let address = counterfactual_address(&context, image_hash);
        Self {
            owner,
            chain,
            relayer,
            context,
            chain_id,
            address,
        }
    }

    fn image_hash(&self) -> B256 {
        image_hash(&self.config())
    }

    /// Current nonce in space 0; an undeployed wallet starts at zero.
    async fn read_nonce(&self) -> Result<U256, RelayerError> {
        if !self.is_deployed().await? {
            return Ok(U256::ZERO);
        }
        let call = IModuleCalls::readNonceCall { _space: U256::ZERO };
        let output = self
            .chain
            .call_contract(self.address, call.abi_encode().into())
            .await?;
        IModuleCalls::readNonceCall::abi_decode_returns(&output)
            .map_err(|e| RelayerError::Decode(format!("readNonce: {}", e)))
    }

    fn sub_digest(&self, digest: B256) -> B256 {
        sub_digest(self.chain_id, self.address, digest)
    }

    fn encode_signature(&self, signature: &[u8; 65]) -> Bytes {
        let config = self.config();
        let mut out = Vec::with_capacity(2 + 4 + 2 + 65 + 1);
        out.extend_from_slice(&config.threshold.to_be_bytes());
        out.extend_from_slice(&config.checkpoint.to_be_bytes());
        out.push(FLAG_SIGNATURE);
        out.push(config.signers[0].weight);
        out.extend_from_slice(signature);
        out.push(SIG_TYPE_EIP712);
        out.into()
    }
}

#[async_trait]
impl SmartWallet for RelayerWallet {
    fn address(&self) -> Address {
        self.address
    }

    fn config(&self) -> WalletConfig {
        WalletConfig::single_owner(self.owner.address())
    }

    fn deployment(&self) -> Result<WalletDeployment, RelayerError> {
        let call = IWalletFactory::deployCall {
            _mainModule: self.context.main_module,
            _salt: self.image_hash(),
        };
        Ok(WalletDeployment {
            factory: self.context.factory,
            data: call.abi_encode().into(),
        })
    }

    async fn is_deployed(&self) -> Result<bool, RelayerError> {
        let code = self.chain.code_at(self.address).await?;
        Ok(!code.is_empty())
    }

    async fn fee_options(
        &self,
        txs: &[Transaction],
    ) -> Result<(Vec<FeeOption>, Option<FeeQuote>), RelayerError> {
        let nonce = self.read_nonce().await?;
        let data = encode_execute(txs, nonce, Bytes::new());
        self.relayer.fee_options(self.address, &data).await
    }

    async fn sign_transactions(&self, txs: Vec<Transaction>) -> Result<SignedBatch, RelayerError> {
        let nonce = self.read_nonce().await?;
        let digest = batch_digest(nonce, &txs);
        let signature = self.owner.sign_hash(&self.sub_digest(digest))?;
        let signature = self.encode_signature(&signature.as_bytes());

        tracing::debug!(wallet = %self.address, nonce = %nonce, calls = txs.len(), "Batch signed");

        Ok(SignedBatch {
            wallet: self.address,
            chain_id: self.chain_id,
            nonce,
            transactions: txs,
            digest,
            signature,
        })
    }

    async fn send_transactions(
        &self,
        signed: SignedBatch,
        quote: Option<FeeQuote>,
    ) -> Result<Submission, RelayerError> {
        let input = encode_execute(&signed.transactions, signed.nonce, signed.signature);
        let meta_txn_id = self
            .relayer
            .send_meta_txn(signed.wallet, &input, quote.as_ref())
            .await?;

        tracing::info!(wallet = %signed.wallet, meta_txn_id = %meta_txn_id, "Meta-transaction accepted");

        let wait = self.relayer.wait_receipt(meta_txn_id.clone());
        Ok(Submission { meta_txn_id, wait })
    }
}

/// Image hash of a signer configuration: the signer tree root bound to the
/// threshold, then to the checkpoint.
pub fn image_hash(config: &WalletConfig) -> B256 {
    let root = config
        .signers
        .iter()
        .map(|signer| {
            let leaf = (U256::from(signer.weight) << 160usize)
                | U256::from_be_slice(signer.address.as_slice());
            B256::from(leaf.to_be_bytes::<32>())
        })
        .reduce(|left, right| keccak256((left, right).abi_encode_params()))
        .unwrap_or_default();

    let with_threshold = keccak256((root, U256::from(config.threshold)).abi_encode_params());
    keccak256((with_threshold, U256::from(config.checkpoint)).abi_encode_params())
}

/// CREATE2 address of the wallet proxy for `image_hash`.
pub fn counterfactual_address(context: &WalletContextConfig, image_hash: B256) -> Address {
    let mut init_code = WALLET_CREATION_CODE.to_vec();
    init_code.extend_from_slice(context.main_module.into_word().as_slice());
    context.factory.create2_from_code(image_hash, init_code)
}

/// Digest of a batch at a given nonce.
pub fn batch_digest(nonce: U256, txs: &[Transaction]) -> B256 {
    let calls: Vec<MetaTransaction> = txs.iter().map(MetaTransaction::from).collect();
    keccak256((nonce, calls).abi_encode_params())
}

/// Digest bound to the chain and the wallet, the value the owner signs.
pub fn sub_digest(chain_id: u64, wallet: Address, digest: B256) -> B256 {
    let mut packed = Vec::with_capacity(2 + 32 + 20 + 32);
    packed.extend_from_slice(b"\x19\x01");
    packed.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    packed.extend_from_slice(wallet.as_slice());
    packed.extend_from_slice(digest.as_slice());
    keccak256(packed)
}

/// `execute(txs, nonce, signature)` call data.
pub fn encode_execute(txs: &[Transaction], nonce: U256, signature: Bytes) -> Bytes {
    IModuleCalls::executeCall {
        _txs: txs.iter().map(MetaTransaction::from).collect(),
        _nonce: nonce,
        _signature: signature,
    }
    .abi_encode()
    .into()
}
