//! The mint flow, from validated config to confirmed receipt.
//!
//! # Data Flow
//! ```text
//! AppConfig
//!     → run(): build chain client, owner key, relayer wallet, directory
//!     → execute():
//!         publish wallet config (best-effort)
//!         → ensure wallet deployed
//!         → mint transaction
//!         → relayer fee payment (prepended when required)
//!         → sign → send → bounded receipt wait
//!     → RunSummary
//! ```

use alloy::primitives::Address;
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::{BlockchainClient, ChainProvider, Receipt, TransactionSender, Wallet};
use crate::config::{normalize_private_key, parse_target_address, AppConfig};
use crate::deployment::{ensure_wallet_deployed, DeploymentOutcome};
use crate::directory::{DirectoryClient, DirectoryPublisher};
use crate::error::AppError;
use crate::fees::{attach_fee_payment, TransactionAssembler};
use crate::relayer::{MetaTxnId, RelayerClient, RelayerWallet, SmartWallet};
use crate::resilience::timeouts::wait_for_receipt;

/// Everything the flow talks to.
pub struct Collaborators {
    pub wallet: Arc<dyn SmartWallet>,
    pub chain: Arc<dyn ChainProvider>,
    pub deployer: Arc<dyn TransactionSender>,
    pub directory: Arc<dyn DirectoryPublisher>,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub meta_txn_id: MetaTxnId,
    pub receipt: Receipt,
    /// Number of calls in the submitted batch, fee payment included.
    pub batch_len: usize,
    pub deployment: DeploymentOutcome,
}

/// Wire the concrete adapters for `config` and run the flow.
pub async fn run(config: &AppConfig) -> Result<RunSummary, AppError> {
    println!("--- Relayed mint ---");
    println!("Chain ID: {}", config.chain_id);

    let target = parse_target_address(&config.target_address)
        .map_err(|e| AppError::from_validation("parse target address", e))?;
    let private_key = normalize_private_key(&config.private_key)
        .map_err(|e| AppError::from_validation("init signer", e))?;

    let chain = BlockchainClient::new(&config.node_url_with_access_key(), config.rpc_timeout())
        .map_err(|e| AppError::from_blockchain("init provider", e))?;
    chain
        .verify_chain_id(config.chain_id)
        .await
        .map_err(|e| AppError::from_blockchain("verify chain id", e))?;

    let owner = Wallet::from_private_key(&private_key)
        .map_err(|e| AppError::from_blockchain("init signer", e))?
        .with_rpc_url(chain.rpc_url().clone());

    let chain: Arc<dyn ChainProvider> = Arc::new(chain);
    let relayer = RelayerClient::new(&config.relayer_url, &config.project_access_key)
        .map_err(|e| AppError::from_relayer("init relayer client", e))?;
    let directory = DirectoryClient::new(config.directory_url(), &config.project_access_key)
        .map_err(|e| AppError::network("init directory client", e))?;
    let wallet = RelayerWallet::new(
        owner.clone(),
        chain.clone(),
        relayer,
        config.wallet_context,
        config.chain_id,
    );

    println!("Signer address (EOA): {}", owner.address());
    println!("Smart wallet address: {}", wallet.address());
    println!("Target address:       {}", target);

    let collaborators = Collaborators {
        wallet: Arc::new(wallet),
        chain,
        deployer: Arc::new(owner),
        directory: Arc::new(directory),
    };

    let summary = execute(target, &collaborators, config.receipt_timeout()).await?;

    println!();
    println!("Transaction confirmed!");
    println!("Tx hash:  {}", summary.receipt.tx_hash);
    println!("Explorer: {}", config.explorer_tx_url(summary.receipt.tx_hash));

    Ok(summary)
}

/// Run the flow against already-built collaborators.
///
/// `wait_timeout` bounds each receipt wait separately.
pub async fn execute(
    target: Address,
    collaborators: &Collaborators,
    wait_timeout: Duration,
) -> Result<RunSummary, AppError> {
    let wallet = collaborators.wallet.as_ref();
    let chain = collaborators.chain.as_ref();

    publish_wallet_config(wallet, collaborators.directory.as_ref()).await;

    println!("Checking wallet deployment status...");
    let deployment =
        ensure_wallet_deployed(wallet, chain, collaborators.deployer.as_ref(), wait_timeout)
            .await?;

    let assembler = TransactionAssembler::new(target);
    let mint = assembler.mint_transaction(wallet.address())?;

    println!("Preparing transaction...");
    let (batch, quote) = attach_fee_payment(wallet, chain, &assembler, vec![mint])
        .await
        .map_err(|e| e.within("relay transaction"))?;
    let batch_len = batch.len();

    println!("Relaying transaction...");
    let signed = wallet
        .sign_transactions(batch)
        .await
        .map_err(|e| AppError::from_relayer("relay transaction: sign transaction", e))?;
    let submission = wallet
        .send_transactions(signed, quote)
        .await
        .map_err(|e| AppError::from_relayer("relay transaction: send transaction", e))?;

    println!("Transaction sent! OpHash: {}", submission.meta_txn_id);
    println!("Waiting for confirmation...");

    let receipt = wait_for_receipt(submission.wait, wait_timeout)
        .await
        .map_err(|e| AppError::from_wait("wait for confirmation", e))?;

    if !receipt.is_success() {
        return Err(AppError::Reverted {
            context: "wait for confirmation".to_string(),
            tx_hash: receipt.tx_hash,
            status: receipt.status,
        });
    }

    Ok(RunSummary {
        meta_txn_id: submission.meta_txn_id,
        receipt,
        batch_len,
        deployment,
    })
}

async fn publish_wallet_config(wallet: &dyn SmartWallet, directory: &dyn DirectoryPublisher) {
    match directory.publish(wallet.address(), &wallet.config()).await {
        Ok(()) => println!("Wallet configuration published to directory."),
        Err(e) => {
            tracing::warn!(wallet = %wallet.address(), error = %e, "Directory publication failed");
            println!("Note: could not publish config (might already exist). Continuing... ({})", e);
        }
    }
}
