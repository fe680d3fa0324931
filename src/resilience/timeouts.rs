//! Receipt waiting with a hard deadline.
//!
//! # Responsibilities
//! - Run a receipt future on its own task
//! - Return its result if it finishes before the deadline
//! - Abort the task once the deadline passes
//!
//! A late result arriving after the deadline is never observed.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

use crate::blockchain::Receipt;

/// Why a receipt wait ended without a receipt.
#[derive(Debug, Error)]
pub enum WaitError<E> {
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error(transparent)]
    Failed(E),

    #[error("receipt task failed: {0}")]
    Join(String),
}

/// Wait for `wait` to produce a receipt, giving up after `deadline`.
pub async fn wait_for_receipt<F, E>(wait: F, deadline: Duration) -> Result<Receipt, WaitError<E>>
where
    F: Future<Output = Result<Receipt, E>> + Send + 'static,
    E: Send + 'static,
{
    let mut task = tokio::spawn(wait);

    tokio::select! {
        joined = &mut task => match joined {
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(err)) => Err(WaitError::Failed(err)),
            Err(join_err) => Err(WaitError::Join(join_err.to_string())),
        },
        _ = sleep(deadline) => {
            task.abort();
            tracing::warn!(timeout_secs = deadline.as_secs(), "Receipt wait timed out");
            Err(WaitError::Timeout(deadline))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::BlockchainError;
    use alloy::primitives::TxHash;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn receipt(status: u64) -> Receipt {
        Receipt {
            tx_hash: TxHash::repeat_byte(0x11),
            status,
        }
    }

    #[tokio::test]
    async fn test_fast_receipt_is_returned() {
        let result = wait_for_receipt(
            async { Ok::<_, BlockchainError>(receipt(1)) },
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_failure_is_passed_through() {
        let result = wait_for_receipt(
            async { Err::<Receipt, _>(BlockchainError::Rpc("connection reset".into())) },
            Duration::from_secs(5),
        )
        .await;
        assert!(matches!(result, Err(WaitError::Failed(BlockchainError::Rpc(_)))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_aborts_the_wait() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let result = wait_for_receipt(
            async move {
                sleep(Duration::from_secs(600)).await;
                flag.store(true, Ordering::SeqCst);
                Ok::<_, BlockchainError>(receipt(1))
            },
            Duration::from_secs(300),
        )
        .await;

        assert!(matches!(result, Err(WaitError::Timeout(d)) if d == Duration::from_secs(300)));

        sleep(Duration::from_secs(600)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    async fn crashing_source() -> Result<Receipt, BlockchainError> {
        panic!("receipt source crashed")
    }

    #[tokio::test]
    async fn test_panicking_wait_is_a_join_error() {
        let result = wait_for_receipt(crashing_source(), Duration::from_secs(5)).await;
        assert!(matches!(result, Err(WaitError::Join(_))));
    }
}
