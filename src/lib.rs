//! Relayed mint library.
//!
//! Sends one token-mint meta-transaction through a counterfactual smart
//! wallet, paying the relayer from the wallet's own balance.

pub mod app;
pub mod blockchain;
pub mod cli;
pub mod config;
pub mod deployment;
pub mod directory;
pub mod error;
pub mod fees;
pub mod observability;
pub mod relayer;
pub mod resilience;

pub use config::schema::AppConfig;
pub use error::{AppError, ErrorKind};
