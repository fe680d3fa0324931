//! Wallet directory publication.
//!
//! Registering the wallet configuration lets other services resolve the
//! counterfactual address back to its signers. Publication is best-effort:
//! callers log failures and carry on.

pub mod client;

pub use client::{DirectoryClient, DirectoryError, DirectoryPublisher, CONFIG_VERSION};
