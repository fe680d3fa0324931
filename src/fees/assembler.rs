//! Batch assembly: the mint call and the relayer fee payment.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::blockchain::abi::{IMintable, IERC20};
use crate::error::AppError;
use crate::relayer::{FeeOption, Transaction};

/// Token id minted on every run.
pub const MINT_TOKEN_ID: u64 = 1;

/// Quantity minted on every run.
pub const MINT_AMOUNT: u64 = 1;

/// Builds the transactions submitted through the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionAssembler {
    target: Address,
}

impl TransactionAssembler {
    /// Assembler minting on `target`.
    pub fn new(target: Address) -> Self {
        Self { target }
    }

    /// `mint(to, tokenId, amount, data)` call data.
    pub fn encode_mint(
        &self,
        to: Address,
        token_id: Option<U256>,
        amount: Option<U256>,
        data: Option<Bytes>,
    ) -> Result<Bytes, AppError> {
        let (Some(token_id), Some(amount)) = (token_id, amount) else {
            return Err(AppError::encoding(
                "encode mint calldata",
                "tokenId and amount must be set",
            ));
        };

        let call = IMintable::mintCall {
            to,
            tokenId: token_id,
            amount,
            data: data.unwrap_or_default(),
        };
        Ok(call.abi_encode().into())
    }

    /// Mint one unit of the fixed token id to `recipient`.
    pub fn mint_transaction(&self, recipient: Address) -> Result<Transaction, AppError> {
        let data = self.encode_mint(
            recipient,
            Some(U256::from(MINT_TOKEN_ID)),
            Some(U256::from(MINT_AMOUNT)),
            None,
        )?;
        Ok(Transaction::call(self.target, U256::ZERO, data))
    }

    /// Transaction paying the relayer according to `option`.
    pub fn fee_payment_transaction(&self, option: &FeeOption) -> Result<Transaction, AppError> {
        let payee = option.to.ok_or_else(|| {
            AppError::encoding("build fee payment", "fee option has no payee")
        })?;

        let mut fee_txn = if option.is_native() {
            Transaction::call(payee, option.required_amount(), Bytes::new())
        } else if let Some(token) = option.erc20_contract() {
            let calldata = IERC20::transferCall {
                to: payee,
                value: option.required_amount(),
            }
            .abi_encode();
            Transaction::call(token, U256::ZERO, calldata.into())
        } else {
            return Err(AppError::encoding(
                "build fee payment",
                format!("unsupported fee token option {}", option.token.symbol),
            ));
        };

        if let Some(gas_limit) = option.gas_limit {
            fee_txn.gas_limit = gas_limit;
        }
        Ok(fee_txn)
    }

    /// Place the fee payment ahead of the rest of the batch.
    pub fn prepend_fee(&self, fee_txn: Transaction, txs: Vec<Transaction>) -> Vec<Transaction> {
        let mut batch = Vec::with_capacity(txs.len() + 1);
        batch.push(fee_txn);
        batch.extend(txs);
        batch
    }
}
