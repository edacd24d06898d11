//! Bounded parallel batch runner
//!
//! Generic fan-out executor: splits the input into fixed-size chunks, keeps
//! at most `max_in_flight` batch futures running (any completion unblocks
//! admission of the next chunk), and wraps the whole run in one transaction.
//! Any batch error rolls the transaction back in full; nothing partial is
//! visible to other readers once the run reports failure.

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{debug, warn};

use crate::config::ProcessingConfig;
use crate::utils::error::{Result, ServiceError};

/// Future returned by a batch action, borrowing the shared transaction
pub type BatchFuture<'t, R> = BoxFuture<'t, Result<R>>;

/// Executes batch actions with bounded parallelism inside one transaction
#[derive(Debug, Clone, Copy)]
pub struct BatchRunner {
    batch_size: usize,
    max_in_flight: usize,
}

impl BatchRunner {
    /// Create a runner from the configured batch size and parallelism degree
    pub fn new(processing: &ProcessingConfig) -> Self {
        Self {
            batch_size: processing.batch_size.max(1),
            max_in_flight: processing.parallelism_degree.max(1),
        }
    }

    /// Run `batch_action` over every chunk of `items` and collect the results
    ///
    /// Chunks are admitted in input order but may complete out of order; the
    /// result order is unspecified. Individual row-level outcomes are the
    /// batch action's business; an `Err` from any batch aborts the whole run.
    pub async fn run<T, R, F>(
        &self,
        db: &DatabaseConnection,
        items: Vec<T>,
        batch_action: F,
    ) -> Result<Vec<R>>
    where
        T: Send,
        R: Send,
        F: for<'t> Fn(&'t DatabaseTransaction, Vec<T>) -> BatchFuture<'t, R>,
    {
        let chunks = Self::chunked(items, self.batch_size);
        debug!(
            chunks = chunks.len(),
            max_in_flight = self.max_in_flight,
            "Starting batched transaction"
        );

        let txn = db.begin().await.map_err(ServiceError::Database)?;

        let run_result = {
            let mut results = Vec::with_capacity(chunks.len());
            let mut in_flight = FuturesUnordered::new();

            let drained: Result<()> = async {
                for chunk in chunks {
                    if in_flight.len() >= self.max_in_flight {
                        // Wait for any one batch to finish before admitting more.
                        if let Some(done) = in_flight.next().await {
                            results.push(done?);
                        }
                    }
                    in_flight.push(batch_action(&txn, chunk));
                }

                while let Some(done) = in_flight.next().await {
                    results.push(done?);
                }
                Ok(())
            }
            .await;

            drained.map(|()| results)
        };

        match run_result {
            Ok(results) => {
                txn.commit().await.map_err(ServiceError::Database)?;
                Ok(results)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!("Rollback after batch failure also failed: {}", rollback_err);
                }
                Err(ServiceError::BulkRolledBack(Box::new(e)))
            }
        }
    }

    /// Split `items` into chunks of `batch_size`; the last chunk may be smaller
    fn chunked<T>(items: Vec<T>, batch_size: usize) -> Vec<Vec<T>> {
        let mut chunks = Vec::new();
        let mut current = Vec::with_capacity(batch_size.min(items.len()));

        for item in items {
            current.push(item);
            if current.len() == batch_size {
                chunks.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunking_preserves_order_and_sizes() {
        let chunks = BatchRunner::chunked((1..=7).collect::<Vec<i32>>(), 3);
        assert_eq!(chunks, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
    }

    #[test]
    fn chunking_handles_exact_multiples() {
        let chunks = BatchRunner::chunked((1..=6).collect::<Vec<i32>>(), 3);
        assert_eq!(chunks, vec![vec![1, 2, 3], vec![4, 5, 6]]);
    }

    #[test]
    fn chunking_of_empty_input_yields_no_chunks() {
        let chunks = BatchRunner::chunked(Vec::<i32>::new(), 3);
        assert!(chunks.is_empty());
    }
}
