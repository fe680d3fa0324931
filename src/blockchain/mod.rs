//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Config (private key, node URL)
//!     → wallet.rs (key loading, hash signing, plain transaction sends)
//!     → client.rs (read-only RPC with per-call timeouts)
//!     → abi.rs (contract call descriptors shared by the fee and wallet code)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC reads have a configurable timeout

pub mod abi;
pub mod client;
pub mod types;
pub mod wallet;

pub use client::{BlockchainClient, ChainProvider};
pub use types::{BlockchainError, BlockchainResult, ChainId, Receipt, WaitReceipt};
pub use wallet::{PlainTransaction, SentTransaction, TransactionSender, Wallet};
