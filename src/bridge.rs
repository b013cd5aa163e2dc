//! Bounded pool for blocking work.
//!
//! Async handlers must never run blocking or CPU-heavy calls (argon2 hashing,
//! in particular) directly on the dispatch threads. `WorkerPool::run` hands
//! the closure to a blocking thread and caps how many may run at once with a
//! semaphore; callers suspend at the handoff and resume with the result.
//! Callers waiting for a slot queue without limit.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::error::ApiError;

pub const DEFAULT_SLOTS: usize = 20;

#[derive(Clone)]
pub struct WorkerPool {
    slots: Arc<Semaphore>,
}

impl WorkerPool {
    pub fn new(slots: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(slots)),
        }
    }

    /// Run `job` on a blocking thread, holding one pool slot for its duration.
    pub async fn run<F, T>(&self, job: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| ApiError::Internal(format!("worker pool closed: {e}")))?;
        tokio::task::spawn_blocking(move || {
            let _slot = permit;
            job()
        })
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_SLOTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn returns_the_job_result() {
        let pool = WorkerPool::new(2);
        let out = pool.run(|| 6 * 7).await.unwrap();
        assert_eq!(out, 42);
    }

    #[tokio::test]
    async fn propagates_inner_results() {
        let pool = WorkerPool::new(2);
        let out: Result<u32, String> = pool.run(|| Err("boom".to_owned())).await.unwrap();
        assert_eq!(out, Err("boom".to_owned()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_exceeds_the_slot_bound() {
        let pool = WorkerPool::new(1);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = pool.clone();
            let running = running.clone();
            let peak = peak.clone();
            handles.push(tokio::spawn(async move {
                pool.run(move || {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(std::time::Duration::from_millis(5));
                    running.fetch_sub(1, Ordering::SeqCst);
                })
                .await
                .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }
}
