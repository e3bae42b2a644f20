//! Bounded-concurrency work queue.
//!
//! A fixed number of workers drain a shared FIFO of actions. The first
//! failing action stops workers from picking up new items; actions already
//! running are left to finish.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::{Error, Result};

type Action<T> = Box<dyn FnOnce(T) -> BoxFuture<'static, Result<()>> + Send>;

struct Item<T> {
    value: T,
    action: Action<T>,
}

struct Shared<T> {
    pending: Mutex<VecDeque<Item<T>>>,
    error: Mutex<Option<Error>>,
}

impl<T> Shared<T> {
    fn pending(&self) -> MutexGuard<'_, VecDeque<Item<T>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn error(&self) -> MutexGuard<'_, Option<Error>> {
        self.error.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn has_error(&self) -> bool {
        self.error().is_some()
    }

    /// Record a terminal error unless one is already set.
    fn record(&self, err: Error) {
        let mut slot = self.error();
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    fn next(&self) -> Option<Item<T>> {
        self.pending().pop_front()
    }
}

/// Queue of values, each paired with the action that processes it.
pub struct Queue<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Send + 'static> Queue<T> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                pending: Mutex::new(VecDeque::new()),
                error: Mutex::new(None),
            }),
        }
    }

    /// Append `value` to the tail of the queue.
    pub fn enqueue<F, Fut>(&self, value: T, action: F)
    where
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let action: Action<T> = Box::new(move |value| action(value).boxed());
        self.shared.pending().push_back(Item { value, action });
    }

    pub fn len(&self) -> usize {
        self.shared.pending().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every queued item on `concurrency` workers.
    ///
    /// Returns the first error recorded by any action. A concurrency of zero
    /// is treated as one.
    pub async fn process_all(&self, concurrency: usize) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        let workers = concurrency.max(1);
        tracing::debug!("Processing {} items on {} workers", self.len(), workers);

        let handles: Vec<_> = (0..workers)
            .map(|id| tokio::spawn(worker(id, Arc::clone(&self.shared))))
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                self.shared.record(Error::Task(e.to_string()));
            }
        }

        match self.shared.error().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<T: Send + 'static> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

async fn worker<T>(id: usize, shared: Arc<Shared<T>>) {
    loop {
        if shared.has_error() {
            break;
        }

        let Some(item) = shared.next() else {
            break;
        };

        if let Err(e) = (item.action)(item.value).await {
            tracing::debug!("Worker {} stopping after failed action: {}", id, e);
            shared.record(e);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrency_one_preserves_order() {
        let items = vec![1, 2, 3, 4, 5];
        let processed = Arc::new(Mutex::new(Vec::new()));

        let queue = Queue::new();
        for item in &items {
            let processed = Arc::clone(&processed);
            queue.enqueue(*item, move |v| async move {
                processed.lock().unwrap().push(v);
                Ok(())
            });
        }

        queue.process_all(1).await.unwrap();
        assert_eq!(*processed.lock().unwrap(), items);
        assert!(queue.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_each_item_processed_exactly_once() {
        let n = 100;
        let counts = Arc::new(Mutex::new(vec![0usize; n]));

        let queue = Queue::new();
        for i in 0..n {
            let counts = Arc::clone(&counts);
            queue.enqueue(i, move |v| async move {
                counts.lock().unwrap()[v] += 1;
                Ok(())
            });
        }

        queue.process_all(8).await.unwrap();
        assert!(counts.lock().unwrap().iter().all(|&c| c == 1));
    }

    #[tokio::test]
    async fn test_error_stops_further_processing() {
        let processed = Arc::new(AtomicUsize::new(0));

        let queue = Queue::new();
        for item in [10, 20, 30, 40, 50] {
            let processed = Arc::clone(&processed);
            queue.enqueue(item, move |v| async move {
                processed.fetch_add(1, Ordering::SeqCst);
                if v == 30 {
                    return Err(Error::Download("boom".into()));
                }
                Ok(())
            });
        }

        let err = queue.process_all(1).await.unwrap_err();
        assert!(matches!(err, Error::Download(ref m) if m == "boom"));
        assert_eq!(processed.load(Ordering::SeqCst), 3);
        assert_eq!(queue.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_in_flight_action_finishes_after_failure() {
        let slow_finished = Arc::new(AtomicBool::new(false));
        let later_started = Arc::new(AtomicUsize::new(0));

        let queue = Queue::new();
        {
            let slow_finished = Arc::clone(&slow_finished);
            queue.enqueue(0, move |_| async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                slow_finished.store(true, Ordering::SeqCst);
                Ok(())
            });
        }
        queue.enqueue(1, |_| async { Err(Error::Download("fail".into())) });
        for i in 2..10 {
            let later_started = Arc::clone(&later_started);
            queue.enqueue(i, move |_| async move {
                later_started.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        assert!(queue.process_all(2).await.is_err());
        assert!(slow_finished.load(Ordering::SeqCst));
        assert_eq!(later_started.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallelism_bounded_by_concurrency() {
        let limit = 5;
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));

        let queue = Queue::new();
        for i in 0..40 {
            let active = Arc::clone(&active);
            let max_active = Arc::clone(&max_active);
            queue.enqueue(i, move |_| async move {
                let current = active.fetch_add(1, Ordering::SeqCst) + 1;
                max_active.fetch_max(current, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            });
        }

        queue.process_all(limit).await.unwrap();
        let max_active = max_active.load(Ordering::SeqCst);
        assert!(max_active <= limit, "max active was {}", max_active);
        assert!(max_active > 1);
    }

    #[tokio::test]
    async fn test_empty_queue() {
        let queue: Queue<u32> = Queue::new();
        assert!(queue.process_all(3).await.is_ok());
    }

    #[tokio::test]
    async fn test_zero_concurrency_runs_one_worker() {
        let processed = Arc::new(AtomicUsize::new(0));
        let queue = Queue::new();
        for i in 0..3 {
            let processed = Arc::clone(&processed);
            queue.enqueue(i, move |_| async move {
                processed.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        queue.process_all(0).await.unwrap();
        assert_eq!(processed.load(Ordering::SeqCst), 3);
    }
}
