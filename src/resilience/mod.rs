//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! deployment tx / relayed batch
//!     → WaitReceipt future
//!     → timeouts.rs (spawned, raced against the deadline, aborted on expiry)
//! ```

pub mod timeouts;
