//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config, chain, relayer, fees, deployment
//!     → tracing events with structured fields (wallet, tx_hash, ...)
//!     → logging.rs subscriber (env filter, stderr)
//! ```
//!
//! Private keys and access keys never appear in events.

pub mod logging;
