//! HTTP client for the directory service's `Sessions` RPC.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::relayer::client::{ACCESS_KEY_HEADER, HTTP_TIMEOUT};
use crate::relayer::WalletConfig;

/// Wallet configuration format version sent with every registration.
pub const CONFIG_VERSION: u32 = 2;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("directory returned {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Publishes wallet configurations.
#[async_trait]
pub trait DirectoryPublisher: Send + Sync {
    async fn publish(&self, wallet: Address, config: &WalletConfig) -> Result<(), DirectoryError>;
}

#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
    access_key: String,
}

#[derive(Debug, Serialize)]
struct SaveConfigRequest<'a> {
    version: u32,
    config: &'a WalletConfig,
}

impl DirectoryClient {
    pub fn new(base_url: &str, access_key: &str) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/rpc/Sessions/{}", self.base_url, method)
    }
}

#[async_trait]
impl DirectoryPublisher for DirectoryClient {
    async fn publish(&self, wallet: Address, config: &WalletConfig) -> Result<(), DirectoryError> {
        let response = self
            .http
            .post(self.endpoint("SaveConfig"))
            .header(ACCESS_KEY_HEADER, &self.access_key)
            .json(&SaveConfigRequest {
                version: CONFIG_VERSION,
                config,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(wallet = %wallet, "Wallet configuration published");
        Ok(())
    }
}
