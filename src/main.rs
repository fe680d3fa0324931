//! relayed-mint
//!
//! Mints one token from a counterfactual smart wallet through a
//! meta-transaction relayer.
//!
//! ```text
//! config.json ─▶ config ─▶ app::run ─┬─▶ directory (best-effort)
//!                                    ├─▶ deployment (owner EOA → factory)
//!                                    ├─▶ fees (options → cheapest affordable)
//!                                    ├─▶ relayer (sign → send)
//!                                    └─▶ resilience (receipt deadline)
//! ```

use std::process::ExitCode;

use relayed_mint::cli::Cli;
use relayed_mint::config::load_config;
use relayed_mint::observability::logging;
use relayed_mint::{app, AppError};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let cli = Cli::parse_args();

    match start(&cli).await {
        Ok(summary) => {
            tracing::debug!(
                meta_txn_id = %summary.meta_txn_id,
                tx_hash = %summary.receipt.tx_hash,
                batch_len = summary.batch_len,
                "Run complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(kind = ?e.kind(), "{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn start(cli: &Cli) -> Result<app::RunSummary, AppError> {
    let config = load_config(&cli.config).map_err(|e| AppError::from_config("load config", e))?;

    tracing::info!(
        chain_id = config.chain_id,
        config = %cli.config.display(),
        "Configuration loaded"
    );

    app::run(&config).await
}
