//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config.json
//!     → loader.rs (read & deserialize)
//!     → validation.rs (required fields, address, key checks)
//!     → AppConfig (validated, immutable)
//!     → borrowed by the mint flow for the whole run
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All missing required fields are reported together
//! - Validation runs before any network activity

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, WalletContextConfig};
pub use validation::{
    normalize_private_key, parse_target_address, validate_config, ValidationError,
};
