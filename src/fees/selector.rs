//! Cheapest-affordable fee option selection.
//!
//! # Rules
//! - A zero (or missing) amount is affordable without any balance read
//! - Native options compare against the wallet's native balance
//! - ERC-20 options compare against `balanceOf(wallet)` on the token
//! - Other token kinds are skipped
//! - Smallest amount wins; equal amounts keep the first one seen
//! - A failed balance read aborts the selection

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;

use crate::blockchain::abi::IERC20;
use crate::blockchain::ChainProvider;
use crate::error::AppError;
use crate::relayer::FeeOption;

/// Outcome of checking one option against the wallet's balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceCheck {
    Affordable,
    Insufficient,
    Unsupported,
}

/// Pick the cheapest option `wallet` can pay right now.
pub async fn select_fee_option<'a>(
    chain: &dyn ChainProvider,
    wallet: Address,
    options: &'a [FeeOption],
) -> Result<&'a FeeOption, AppError> {
    let mut selected: Option<(&'a FeeOption, U256)> = None;

    for option in options {
        match check_balance(chain, wallet, option).await? {
            BalanceCheck::Affordable => {}
            BalanceCheck::Insufficient => {
                tracing::debug!(symbol = %option.token.symbol, "Fee option not affordable");
                continue;
            }
            BalanceCheck::Unsupported => {
                tracing::warn!(
                    symbol = %option.token.symbol,
                    kind = ?option.token.kind,
                    "Skipping unsupported fee token"
                );
                continue;
            }
        }

        let amount = option.required_amount();
        match selected {
            Some((_, best)) if amount >= best => {}
            _ => selected = Some((option, amount)),
        }
    }

    selected
        .map(|(option, _)| option)
        .ok_or_else(|| AppError::Affordability {
            context: "select fee option".to_string(),
            wallet,
        })
}

/// Whether `wallet` holds enough of the option's token.
pub async fn check_balance(
    chain: &dyn ChainProvider,
    wallet: Address,
    option: &FeeOption,
) -> Result<BalanceCheck, AppError> {
    let token = option.erc20_contract();
    if !option.is_native() && token.is_none() {
        return Ok(BalanceCheck::Unsupported);
    }

    let required = option.required_amount();
    if required.is_zero() {
        return Ok(BalanceCheck::Affordable);
    }

    let balance = match token {
        Some(token) => erc20_balance_of(chain, token, wallet).await?,
        None => chain
            .balance_at(wallet)
            .await
            .map_err(|e| AppError::from_blockchain("native balance", e))?,
    };

    if balance >= required {
        Ok(BalanceCheck::Affordable)
    } else {
        Ok(BalanceCheck::Insufficient)
    }
}

/// `balanceOf(owner)` on an ERC-20 token.
pub async fn erc20_balance_of(
    chain: &dyn ChainProvider,
    token: Address,
    owner: Address,
) -> Result<U256, AppError> {
    let calldata = IERC20::balanceOfCall { account: owner }.abi_encode();
    let output = chain
        .call_contract(token, calldata.into())
        .await
        .map_err(|e| AppError::from_blockchain("erc20 balanceOf call", e))?;

    IERC20::balanceOfCall::abi_decode_returns(&output)
        .map_err(|e| AppError::encoding("decode erc20 balanceOf", e))
}
