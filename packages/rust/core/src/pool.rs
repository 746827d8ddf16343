//! Bounded-concurrency mapping primitive.
//!
//! Both network stages of the check pipeline fan out over per-sentence
//! tasks. [`WorkerPool::map`] runs one task per item with a fixed number
//! in flight at once and hands results back in input order, so callers can
//! correlate outputs positionally instead of tracking completion order.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;

use copyscan_shared::{CopyscanError, Result};

/// Fixed-capacity pool of concurrent executors.
///
/// Excess tasks queue for a free slot; the queue itself is unbounded.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
}

impl WorkerPool {
    /// Create a pool running at most `size` tasks concurrently.
    /// A size of zero is treated as one.
    pub fn new(size: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(size.max(1))),
        }
    }

    /// Apply `task` to every item, bounded by the pool size.
    ///
    /// The output vec matches the input order index for index. Per-item
    /// fallibility belongs in `T` itself (an `Option` or similar); the only
    /// error this returns is a panicked task, which callers treat as an
    /// internal fault rather than a per-item miss.
    pub async fn map<I, T, F, Fut>(&self, items: Vec<I>, task: F) -> Result<Vec<T>>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(I) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let mut handles = Vec::with_capacity(items.len());
        for item in items {
            let semaphore = self.semaphore.clone();
            let task = task.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                task(item).await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = handle
                .await
                .map_err(|e| CopyscanError::internal(format!("worker task failed: {e}")))?;
            results.push(result);
        }

        Ok(results)
    }
}
