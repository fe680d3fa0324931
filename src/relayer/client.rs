//! HTTP client for the meta-transaction relayer.
//!
//! Calls are JSON POSTs to `{base}/rpc/Relayer/{Method}` authenticated with
//! the project access key.

use alloy::primitives::{Address, Bytes, TxHash};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::interval;

use crate::blockchain::{Receipt, WaitReceipt};
use crate::relayer::types::{FeeOption, FeeQuote, MetaTxnId, RelayerError};

/// Header carrying the project access key.
pub const ACCESS_KEY_HEADER: &str = "X-Access-Key";

/// Delay between receipt polls.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Per-request deadline for relayer calls.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the relayer's RPC service.
#[derive(Debug, Clone)]
pub struct RelayerClient {
    http: reqwest::Client,
    base_url: String,
    access_key: String,
    poll_interval: Duration,
}

#[derive(Debug, Serialize)]
struct FeeOptionsRequest<'a> {
    wallet: Address,
    to: Address,
    data: &'a Bytes,
}

#[derive(Debug, Deserialize)]
struct FeeOptionsResponse {
    #[serde(default)]
    options: Vec<FeeOption>,
    #[serde(default)]
    quote: Option<FeeQuote>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetaTxnCall<'a> {
    wallet_address: Address,
    contract: Address,
    input: &'a Bytes,
}

#[derive(Debug, Serialize)]
struct SendMetaTxnRequest<'a> {
    call: MetaTxnCall<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quote: Option<&'a FeeQuote>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendMetaTxnResponse {
    status: bool,
    txn_hash: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetMetaTxnReceiptRequest<'a> {
    #[serde(rename = "metaTxID")]
    meta_tx_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct GetMetaTxnReceiptResponse {
    receipt: MetaTxnReceipt,
}

/// Lifecycle state of a relayed meta-transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetaTxnStatus {
    Dropped,
    Queued,
    Sent,
    Succeeded,
    PartiallyFailed,
    Failed,
    /// Also covers states this client does not model; polling continues.
    #[serde(other)]
    Unknown,
}

impl MetaTxnStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MetaTxnStatus::Dropped
                | MetaTxnStatus::Succeeded
                | MetaTxnStatus::PartiallyFailed
                | MetaTxnStatus::Failed
        )
    }
}

/// Relayer view of a meta-transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTxnReceipt {
    #[serde(default)]
    pub id: String,
    pub status: MetaTxnStatus,
    #[serde(default)]
    pub revert_reason: Option<String>,
    /// Native transaction receipt, JSON-encoded as a string.
    #[serde(default)]
    pub txn_receipt: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NativeReceipt {
    transaction_hash: TxHash,
    status: String,
}

impl MetaTxnReceipt {
    /// Native receipt of a meta-transaction that reached a terminal state.
    pub fn to_receipt(&self) -> Result<Receipt, RelayerError> {
        if matches!(self.status, MetaTxnStatus::Dropped) {
            return Err(RelayerError::Failed {
                id: self.id.clone(),
                status: "dropped".to_string(),
                reason: self.revert_reason.clone().unwrap_or_default(),
            });
        }

        let raw = match self.txn_receipt.as_deref() {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                return Err(RelayerError::Decode(format!(
                    "meta-transaction {} has no native receipt",
                    self.id
                )))
            }
        };
        let native: NativeReceipt =
            serde_json::from_str(raw).map_err(|e| RelayerError::Decode(e.to_string()))?;
        let status = parse_quantity(&native.status)?;

        Ok(Receipt {
            tx_hash: native.transaction_hash,
            status,
        })
    }
}

fn parse_quantity(value: &str) -> Result<u64, RelayerError> {
    let parsed = match value.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| RelayerError::Decode(format!("invalid quantity '{}': {}", value, e)))
}

/// Webrpc error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: String,
    #[serde(default)]
    cause: String,
}

impl RelayerClient {
    pub fn new(base_url: &str, access_key: &str) -> Result<Self, RelayerError> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
            poll_interval: RECEIPT_POLL_INTERVAL,
        })
    }

    /// Override the receipt polling cadence.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Fee options for executing `data` on the wallet, plus the quote that
    /// ties a chosen option to the relayer's accounting.
    pub async fn fee_options(
        &self,
        wallet: Address,
        data: &Bytes,
    ) -> Result<(Vec<FeeOption>, Option<FeeQuote>), RelayerError> {
        let response: FeeOptionsResponse = self
            .call(
                "FeeOptions",
                &FeeOptionsRequest {
                    wallet,
                    to: wallet,
                    data,
                },
            )
            .await?;

        tracing::debug!(wallet = %wallet, options = response.options.len(), "Fee options received");
        Ok((response.options, response.quote))
    }

    /// Submit `input` for execution on `wallet`.
    pub async fn send_meta_txn(
        &self,
        wallet: Address,
        input: &Bytes,
        quote: Option<&FeeQuote>,
    ) -> Result<MetaTxnId, RelayerError> {
        let response: SendMetaTxnResponse = self
            .call(
                "SendMetaTxn",
                &SendMetaTxnRequest {
                    call: MetaTxnCall {
                        wallet_address: wallet,
                        contract: wallet,
                        input,
                    },
                    quote,
                },
            )
            .await?;

        if !response.status {
            return Err(RelayerError::Rpc {
                status: 200,
                message: format!("meta-transaction {} rejected", response.txn_hash),
            });
        }

        Ok(MetaTxnId(response.txn_hash))
    }

    pub async fn meta_txn_receipt(&self, id: &MetaTxnId) -> Result<MetaTxnReceipt, RelayerError> {
        let response: GetMetaTxnReceiptResponse = self
            .call("GetMetaTxnReceipt", &GetMetaTxnReceiptRequest { meta_tx_id: &id.0 })
            .await?;
        Ok(response.receipt)
    }

    /// Poll until the meta-transaction reaches a terminal state.
    ///
    /// The returned future has no deadline of its own.
    pub fn wait_receipt(&self, id: MetaTxnId) -> WaitReceipt<RelayerError> {
        let client = self.clone();
        Box::pin(async move {
            let mut ticker = interval(client.poll_interval);
            loop {
                ticker.tick().await;

                let receipt = client.meta_txn_receipt(&id).await?;
                if !receipt.status.is_terminal() {
                    tracing::debug!(meta_txn_id = %id, status = ?receipt.status, "Meta-transaction pending");
                    continue;
                }
                return receipt.to_receipt();
            }
        })
    }

    async fn call<Req, Resp>(&self, method: &str, request: &Req) -> Result<Resp, RelayerError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/rpc/Relayer/{}", self.base_url, method);
        let response = self
            .http
            .post(&url)
            .header(ACCESS_KEY_HEADER, &self.access_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) if !err.cause.is_empty() => format!("{}: {}", err.msg, err.cause),
                Ok(err) if !err.msg.is_empty() => err.msg,
                _ => body,
            };
            return Err(RelayerError::Rpc {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| RelayerError::Decode(format!("{}: {}", method, e)))
    }
}
