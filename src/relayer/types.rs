//! Wallet batch, fee option and relayer wire types.

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::blockchain::abi::MetaTransaction;
use crate::blockchain::BlockchainError;

/// Errors raised by the wallet adapter and the relayer client.
#[derive(Debug, Error)]
pub enum RelayerError {
    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The relayer answered with an error payload.
    #[error("relayer returned {status}: {message}")]
    Rpc { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Call data could not be built.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The meta-transaction reached a failed terminal state.
    #[error("meta-transaction {id} {status}: {reason}")]
    Failed {
        id: String,
        status: String,
        reason: String,
    },

    /// Chain read or signing failure inside the adapter.
    #[error(transparent)]
    Chain(#[from] BlockchainError),
}

/// One call in a wallet batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub to: Address,
    pub value: U256,
    pub gas_limit: U256,
    pub data: Bytes,
    pub delegate_call: bool,
    pub revert_on_error: bool,
}

impl Transaction {
    /// An ordinary call that reverts the whole batch on failure.
    pub fn call(to: Address, value: U256, data: Bytes) -> Self {
        Self {
            to,
            value,
            gas_limit: U256::ZERO,
            data,
            delegate_call: false,
            revert_on_error: true,
        }
    }
}

impl From<&Transaction> for MetaTransaction {
    fn from(tx: &Transaction) -> Self {
        MetaTransaction {
            delegateCall: tx.delegate_call,
            revertOnError: tx.revert_on_error,
            gasLimit: tx.gas_limit,
            target: tx.to,
            value: tx.value,
            data: tx.data.clone(),
        }
    }
}

/// Token classification reported by the relayer. Native currency is
/// reported as `Unknown` with no contract address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeTokenType {
    #[default]
    Unknown,
    #[serde(rename = "ERC20_TOKEN")]
    Erc20Token,
    #[serde(rename = "ERC1155_TOKEN")]
    Erc1155Token,
    /// Any kind this client cannot pay with.
    #[serde(other)]
    Unsupported,
}

/// Token a fee option is denominated in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeeToken {
    pub chain_id: Option<u64>,
    pub name: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: FeeTokenType,
    pub decimals: Option<u32>,
    pub contract_address: Option<Address>,
}

/// A relayer's offer to submit the batch in exchange for a payment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeeOption {
    pub token: FeeToken,
    /// Payee of the fee.
    pub to: Option<Address>,
    #[serde(deserialize_with = "deserialize_opt_u256")]
    pub value: Option<U256>,
    #[serde(deserialize_with = "deserialize_opt_u256")]
    pub gas_limit: Option<U256>,
}

impl FeeOption {
    /// Missing or zero contract address means the chain's native currency.
    /// Only `Unknown` and `Erc20Token` kinds qualify.
    pub fn is_native(&self) -> bool {
        if !matches!(
            self.token.kind,
            FeeTokenType::Unknown | FeeTokenType::Erc20Token
        ) {
            return false;
        }
        match self.token.contract_address {
            None => true,
            Some(address) => address == Address::ZERO,
        }
    }

    /// ERC-20 contract to pay from, if this option is an ERC-20 fee.
    pub fn erc20_contract(&self) -> Option<Address> {
        match (self.token.kind, self.token.contract_address) {
            (FeeTokenType::Erc20Token, Some(address)) if address != Address::ZERO => Some(address),
            _ => None,
        }
    }

    /// Required payment, a missing value counting as zero.
    pub fn required_amount(&self) -> U256 {
        self.value.unwrap_or(U256::ZERO)
    }
}

/// Opaque quote echoed back on submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeQuote(pub String);

/// Relayer-assigned id of a submitted meta-transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaTxnId(pub String);

impl std::fmt::Display for MetaTxnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single signer entry of the wallet configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSigner {
    pub weight: u8,
    pub address: Address,
}

/// Signer set that controls the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    pub threshold: u16,
    pub checkpoint: u32,
    pub signers: Vec<WalletSigner>,
}

impl WalletConfig {
    /// One owner whose signature alone meets the threshold.
    pub fn single_owner(owner: Address) -> Self {
        Self {
            threshold: 1,
            checkpoint: 0,
            signers: vec![WalletSigner {
                weight: 1,
                address: owner,
            }],
        }
    }
}

/// Amounts arrive as decimal strings, hex strings or plain numbers.
fn deserialize_opt_u256<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(U256::from(n))),
        Some(Raw::Text(s)) if s.is_empty() => Ok(None),
        Some(Raw::Text(s)) => U256::from_str(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
