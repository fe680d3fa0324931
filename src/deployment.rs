//! Makes sure the counterfactual wallet exists on-chain before it is used.
//!
//! ```text
//! is_deployed? ── yes ──▶ AlreadyDeployed
//!      │ no
//!      ▼
//! deploy(mainModule, salt) via factory, sent from the owner key
//!      ▼
//! receipt (bounded wait) ── status != 1 ──▶ error
//!      ▼
//! is_deployed? ── no ──▶ error
//!      │ yes
//!      ▼
//! Deployed { tx_hash }
//! ```

use alloy::primitives::TxHash;
use std::time::Duration;

use crate::blockchain::{ChainProvider, PlainTransaction, TransactionSender};
use crate::error::AppError;
use crate::relayer::SmartWallet;
use crate::resilience::timeouts::wait_for_receipt;

/// Gas limit of the factory deployment call.
pub const DEPLOYMENT_GAS_LIMIT: u64 = 3_000_000;

/// What [`ensure_wallet_deployed`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentOutcome {
    AlreadyDeployed,
    Deployed { tx_hash: TxHash },
}

/// Deploy the wallet if it has no code yet.
///
/// A single attempt; any failure is returned under the `deploy wallet`
/// context.
pub async fn ensure_wallet_deployed(
    wallet: &dyn SmartWallet,
    chain: &dyn ChainProvider,
    deployer: &dyn TransactionSender,
    wait_timeout: Duration,
) -> Result<DeploymentOutcome, AppError> {
    deploy_if_missing(wallet, chain, deployer, wait_timeout)
        .await
        .map_err(|e| e.within("deploy wallet"))
}

async fn deploy_if_missing(
    wallet: &dyn SmartWallet,
    chain: &dyn ChainProvider,
    deployer: &dyn TransactionSender,
    wait_timeout: Duration,
) -> Result<DeploymentOutcome, AppError> {
    let deployed = wallet
        .is_deployed()
        .await
        .map_err(|e| AppError::from_relayer("check deployment", e))?;
    if deployed {
        println!("Wallet already deployed on-chain.");
        return Ok(DeploymentOutcome::AlreadyDeployed);
    }

    println!("Wallet is not deployed. Deploying from signer EOA...");

    let deployment = wallet
        .deployment()
        .map_err(|e| AppError::from_relayer("build deployment payload", e))?;
    let chain_id = chain
        .chain_id()
        .await
        .map_err(|e| AppError::from_blockchain("fetch chain id", e))?;

    let sent = deployer
        .send_transaction(PlainTransaction {
            to: deployment.factory,
            data: deployment.data,
            gas_limit: DEPLOYMENT_GAS_LIMIT,
            chain_id: chain_id.0,
        })
        .await
        .map_err(|e| AppError::from_blockchain("send deployment tx", e))?;

    tracing::info!(
        wallet = %wallet.address(),
        factory = %deployment.factory,
        tx_hash = %sent.tx_hash,
        "Deployment transaction sent"
    );

    println!("Deployment sent! Tx hash: {}", sent.tx_hash);
    println!("Waiting for deployment confirmation...");

    let receipt = wait_for_receipt(sent.wait, wait_timeout)
        .await
        .map_err(|e| AppError::from_wait("wait for deployment receipt", e))?;

    if !receipt.is_success() {
        return Err(AppError::deployment(
            "deployment receipt",
            format!("deployment tx failed with status {}", receipt.status),
        ));
    }

    let deployed = wallet
        .is_deployed()
        .await
        .map_err(|e| AppError::from_relayer("re-check deployment", e))?;
    if !deployed {
        return Err(AppError::deployment(
            "post-deploy check",
            "wallet still not deployed after deployment tx",
        ));
    }

    println!("Wallet deployed at {}", wallet.address());
    Ok(DeploymentOutcome::Deployed {
        tx_hash: receipt.tx_hash,
    })
}
