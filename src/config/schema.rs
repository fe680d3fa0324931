//! Configuration schema definitions.
//!
//! The config file is a single JSON object with camelCase keys. Optional
//! fields fall back to the defaults below so a minimal file only carries the
//! connection and credential values.

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Directory service used when `directoryUrl` is absent.
pub const DEFAULT_DIRECTORY_URL: &str = "https://keymachine.sequence.app";

/// Upper bound on each receipt wait.
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 5 * 60;

/// Per-call deadline for chain RPC reads.
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// Root configuration for a mint run.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Project access key, sent to the node, relayer and directory.
    pub project_access_key: String,

    /// Hex-encoded secp256k1 key of the wallet owner.
    pub private_key: String,

    /// Chain the wallet lives on.
    pub chain_id: u64,

    /// Contract receiving the mint call.
    pub target_address: String,

    /// JSON-RPC node base URL; the access key is appended as a path segment.
    pub node_url: String,

    /// Meta-transaction relayer base URL.
    pub relayer_url: String,

    /// Block explorer base URL used for the final link.
    pub explorer_url: String,

    /// Wallet directory service base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_url: Option<String>,

    /// Deadline for each receipt wait in seconds.
    pub receipt_timeout_secs: u64,

    /// Deadline for each chain RPC read in seconds.
    pub rpc_timeout_secs: u64,

    /// Factory and implementation used to derive the wallet address.
    pub wallet_context: WalletContextConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_access_key: String::new(),
            private_key: String::new(),
            chain_id: 0,
            target_address: String::new(),
            node_url: String::new(),
            relayer_url: String::new(),
            explorer_url: String::new(),
            directory_url: None,
            receipt_timeout_secs: DEFAULT_RECEIPT_TIMEOUT_SECS,
            rpc_timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
            wallet_context: WalletContextConfig::default(),
        }
    }
}

impl AppConfig {
    /// Node URL with the access key appended as the last path segment.
    pub fn node_url_with_access_key(&self) -> String {
        if self.node_url.ends_with('/') {
            format!("{}{}", self.node_url, self.project_access_key)
        } else {
            format!("{}/{}", self.node_url, self.project_access_key)
        }
    }

    /// Directory URL, falling back to the public service.
    pub fn directory_url(&self) -> &str {
        match self.directory_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => DEFAULT_DIRECTORY_URL,
        }
    }

    /// Explorer page for a transaction hash.
    pub fn explorer_tx_url(&self, tx_hash: impl std::fmt::Display) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }
}

// Keys stay out of logs and panic messages.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("project_access_key", &"<redacted>")
            .field("private_key", &"<redacted>")
            .field("chain_id", &self.chain_id)
            .field("target_address", &self.target_address)
            .field("node_url", &self.node_url)
            .field("relayer_url", &self.relayer_url)
            .field("explorer_url", &self.explorer_url)
            .field("directory_url", &self.directory_url())
            .finish()
    }
}

/// Contracts the counterfactual wallet address is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalletContextConfig {
    /// CREATE2 factory deploying wallet proxies.
    pub factory: Address,

    /// Implementation the wallet proxy delegates to.
    pub main_module: Address,
}

impl Default for WalletContextConfig {
    fn default() -> Self {
        Self {
            factory: address!("faa5c0b14d1bed5c888ca655b9a8a5911f78ef4a"),
            main_module: address!("fbf8f1a5e00034762d928f46d438b947f5d4065d"),
        }
    }
}
