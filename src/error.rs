//! Top-level error type for the mint flow.
//!
//! Every step failure is mapped into an [`AppError`] whose [`ErrorKind`]
//! callers can branch on. The message always leads with the step that failed
//! followed by the underlying cause.

use alloy::primitives::{Address, TxHash};
use std::time::Duration;
use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::config::loader::ConfigError;
use crate::config::validation::ValidationError;
use crate::relayer::RelayerError;
use crate::resilience::timeouts::WaitError;

/// Boxed cause carried by the network and encoding variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Validation,
    Network,
    Encoding,
    Affordability,
    Timeout,
    Deployment,
    Reverted,
}

/// Errors produced by the mint flow.
#[derive(Debug, Error)]
pub enum AppError {
    /// Config file could not be read or parsed.
    #[error("{context}: {source}")]
    Config {
        context: String,
        #[source]
        source: BoxError,
    },

    /// Config values or key material are malformed.
    #[error("{context}: {source}")]
    Validation {
        context: String,
        #[source]
        source: BoxError,
    },

    /// RPC, relayer or HTTP failure.
    #[error("{context}: {source}")]
    Network {
        context: String,
        #[source]
        source: BoxError,
    },

    /// ABI packing or response decoding failure.
    #[error("{context}: {source}")]
    Encoding {
        context: String,
        #[source]
        source: BoxError,
    },

    /// None of the relayer fee options can be paid.
    #[error("{context}: no affordable fee options for wallet {wallet}")]
    Affordability { context: String, wallet: Address },

    /// A receipt did not arrive before the deadline.
    #[error("{context}: timed out after {}s waiting for receipt", .timeout.as_secs())]
    Timeout { context: String, timeout: Duration },

    /// The wallet could not be brought on-chain.
    #[error("{context}: {reason}")]
    Deployment { context: String, reason: String },

    /// The relayed batch was mined but did not succeed.
    #[error("{context}: mint tx {tx_hash} failed with status {status}")]
    Reverted {
        context: String,
        tx_hash: TxHash,
        status: u64,
    },
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config { .. } => ErrorKind::Config,
            AppError::Validation { .. } => ErrorKind::Validation,
            AppError::Network { .. } => ErrorKind::Network,
            AppError::Encoding { .. } => ErrorKind::Encoding,
            AppError::Affordability { .. } => ErrorKind::Affordability,
            AppError::Timeout { .. } => ErrorKind::Timeout,
            AppError::Deployment { .. } => ErrorKind::Deployment,
            AppError::Reverted { .. } => ErrorKind::Reverted,
        }
    }

    /// The step description the error was raised under.
    pub fn context(&self) -> &str {
        match self {
            AppError::Config { context, .. }
            | AppError::Validation { context, .. }
            | AppError::Network { context, .. }
            | AppError::Encoding { context, .. }
            | AppError::Affordability { context, .. }
            | AppError::Timeout { context, .. }
            | AppError::Deployment { context, .. }
            | AppError::Reverted { context, .. } => context,
        }
    }

    /// Prefix the context with an enclosing step, e.g. `deploy wallet: ...`.
    pub fn within(mut self, outer: &str) -> Self {
        let context = match &mut self {
            AppError::Config { context, .. }
            | AppError::Validation { context, .. }
            | AppError::Network { context, .. }
            | AppError::Encoding { context, .. }
            | AppError::Affordability { context, .. }
            | AppError::Timeout { context, .. }
            | AppError::Deployment { context, .. }
            | AppError::Reverted { context, .. } => context,
        };
        *context = format!("{}: {}", outer, context);
        self
    }

    pub fn network(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        AppError::Network {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn encoding(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        AppError::Encoding {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn validation(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        AppError::Validation {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn deployment(context: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Deployment {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Map a config loading failure; validation problems keep their own kind.
    pub fn from_config(context: impl Into<String>, err: ConfigError) -> Self {
        match err {
            ConfigError::Validation(inner) => Self::from_validation(context, inner),
            other => AppError::Config {
                context: context.into(),
                source: Box::new(other),
            },
        }
    }

    pub fn from_validation(context: impl Into<String>, err: ValidationError) -> Self {
        Self::validation(context, err)
    }

    /// Key parsing problems are validation errors, everything else went over
    /// the wire.
    pub fn from_blockchain(context: impl Into<String>, err: BlockchainError) -> Self {
        match err {
            BlockchainError::Wallet(_) => Self::validation(context, err),
            BlockchainError::Decode(_) => Self::encoding(context, err),
            other => Self::network(context, other),
        }
    }

    pub fn from_relayer(context: impl Into<String>, err: RelayerError) -> Self {
        match err {
            RelayerError::Encoding(_) | RelayerError::Decode(_) => Self::encoding(context, err),
            RelayerError::Chain(inner) => Self::from_blockchain(context, inner),
            other => Self::network(context, other),
        }
    }

    /// Timeouts keep their own kind; a failed wait is reported like any
    /// other collaborator failure.
    pub fn from_wait<E>(context: impl Into<String>, err: WaitError<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match err {
            WaitError::Timeout(timeout) => AppError::Timeout {
                context: context.into(),
                timeout,
            },
            other => Self::network(context, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_variant() {
        let err = AppError::Affordability {
            context: "relay transaction".into(),
            wallet: Address::ZERO,
        };
        assert_eq!(err.kind(), ErrorKind::Affordability);
        assert!(err.to_string().contains("no affordable fee options"));
    }

    #[test]
    fn test_within_prefixes_context() {
        let err = AppError::deployment("post-deploy check", "wallet still not deployed")
            .within("deploy wallet");
        assert_eq!(err.context(), "deploy wallet: post-deploy check");
        assert_eq!(
            err.to_string(),
            "deploy wallet: post-deploy check: wallet still not deployed"
        );
    }

    #[test]
    fn test_validation_error_keeps_kind_through_config() {
        let err = AppError::from_config(
            "load config",
            ConfigError::Validation(ValidationError::MissingFields(vec!["nodeUrl"])),
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("nodeUrl"));
    }

    #[test]
    fn test_wallet_error_is_validation() {
        let err = AppError::from_blockchain("init signer", BlockchainError::Wallet("bad".into()));
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = AppError::from_blockchain("fetch chain id", BlockchainError::Timeout(30));
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[test]
    fn test_reverted_receipt_names_status() {
        let err = AppError::Reverted {
            context: "wait for confirmation".into(),
            tx_hash: TxHash::repeat_byte(0x33),
            status: 0,
        }
        .within("relay transaction");
        assert_eq!(err.kind(), ErrorKind::Reverted);
        assert_eq!(err.context(), "relay transaction: wait for confirmation");
        assert!(err.to_string().ends_with("failed with status 0"));
    }

    #[test]
    fn test_wait_timeout_maps_to_timeout_kind() {
        let err = AppError::from_wait::<BlockchainError>(
            "wait for confirmation",
            WaitError::Timeout(Duration::from_secs(300)),
        );
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.to_string().contains("300s"));
    }
}
