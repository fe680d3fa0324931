//! Fee policy subsystem.
//!
//! # Data Flow
//! ```text
//! mint transaction
//!     → payment.rs (ask the wallet's relayer for fee options + quote)
//!     → selector.rs (drop unaffordable options, keep the cheapest)
//!     → assembler.rs (fee payment transaction, placed before the mint)
//!     → (batch, quote) ready for signing
//! ```

pub mod assembler;
pub mod payment;
pub mod selector;

pub use assembler::TransactionAssembler;
pub use payment::attach_fee_payment;
pub use selector::{check_balance, erc20_balance_of, select_fee_option, BalanceCheck};
