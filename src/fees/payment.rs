//! Relayer fee negotiation for a batch.

use crate::blockchain::ChainProvider;
use crate::error::AppError;
use crate::fees::assembler::TransactionAssembler;
use crate::fees::selector::select_fee_option;
use crate::relayer::{FeeQuote, SmartWallet, Transaction};

/// Ask the relayer what the batch costs and, if it costs anything, put the
/// cheapest affordable payment at the front.
///
/// The quote is returned even when no payment is needed; it must accompany
/// the submission unchanged.
pub async fn attach_fee_payment(
    wallet: &dyn SmartWallet,
    chain: &dyn ChainProvider,
    assembler: &TransactionAssembler,
    txs: Vec<Transaction>,
) -> Result<(Vec<Transaction>, Option<FeeQuote>), AppError> {
    let (options, quote) = wallet
        .fee_options(&txs)
        .await
        .map_err(|e| AppError::from_relayer("fetch fee options", e))?;

    if options.is_empty() {
        tracing::debug!(wallet = %wallet.address(), "Relayer requires no fee");
        return Ok((txs, quote));
    }

    let option = select_fee_option(chain, wallet.address(), &options).await?;
    let fee_txn = assembler.fee_payment_transaction(option)?;

    println!(
        "Including relayer fee payment of {} {}",
        option.required_amount(),
        option.token.symbol
    );
    tracing::info!(
        wallet = %wallet.address(),
        symbol = %option.token.symbol,
        amount = %option.required_amount(),
        "Fee option selected"
    );

    Ok((assembler.prepend_fee(fee_txn, txs), quote))
}
