//! Configuration validation.
//!
//! # Responsibilities
//! - Required fields present (all missing names reported in one error)
//! - Target address is a well-formed hex address
//! - Private key is exactly 32 bytes of hex
//!
//! # Design Decisions
//! - Validation is a pure function: AppConfig → Result<(), ValidationError>
//! - Runs before the config is accepted into the system

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// A semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required config values: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid target address: {0}")]
    InvalidTargetAddress(String),

    #[error("private key must be 32 bytes (64 hex chars)")]
    PrivateKeyLength,

    #[error("invalid private key: contains non-hex characters")]
    PrivateKeyEncoding,
}

/// Validate a deserialized config.
pub fn validate_config(config: &AppConfig) -> Result<(), ValidationError> {
    let required: [(&'static str, bool); 7] = [
        ("projectAccessKey", config.project_access_key.is_empty()),
        ("privateKey", config.private_key.is_empty()),
        ("chainId", config.chain_id == 0),
        ("targetAddress", config.target_address.is_empty()),
        ("nodeUrl", config.node_url.is_empty()),
        ("relayerUrl", config.relayer_url.is_empty()),
        ("explorerUrl", config.explorer_url.is_empty()),
    ];

    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    parse_target_address(&config.target_address)?;
    normalize_private_key(&config.private_key)?;
    Ok(())
}

/// Trim whitespace and an optional `0x` prefix, then check the key is
/// 64 hex characters.
pub fn normalize_private_key(key: &str) -> Result<String, ValidationError> {
    let key = key.trim();
    let key = key.strip_prefix("0x").unwrap_or(key);
    if key.len() != 64 {
        return Err(ValidationError::PrivateKeyLength);
    }
    if !key.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::PrivateKeyEncoding);
    }
    Ok(key.to_string())
}

/// Parse the mint target. Checksums are not enforced.
pub fn parse_target_address(s: &str) -> Result<Address, ValidationError> {
    s.parse()
        .map_err(|_| ValidationError::InvalidTargetAddress(s.to_string()))
}
