//! Smart wallet and relayer subsystem.
//!
//! # Data Flow
//! ```text
//! Transaction batch
//!     → wallet.rs (nonce read, digest, owner signature)
//!     → client.rs (fee quote, SendMetaTxn)
//!     → client.rs (GetMetaTxnReceipt polling behind a WaitReceipt)
//! ```
//!
//! # Design Decisions
//! - The mint flow only sees `SmartWallet`
//! - One submission attempt per run, no resubmission

pub mod client;
pub mod types;
pub mod wallet;

pub use client::{MetaTxnReceipt, MetaTxnStatus, RelayerClient};
pub use types::{
    FeeOption, FeeQuote, FeeToken, FeeTokenType, MetaTxnId, RelayerError, Transaction,
    WalletConfig, WalletSigner,
};
pub use wallet::{RelayerWallet, SignedBatch, SmartWallet, Submission, WalletDeployment};
