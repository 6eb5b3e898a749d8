//! Bounded worker pool for downloads and uploads.

use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::warn;

use crate::error::{AppearanceError, AppearanceResult};

/// Runs jobs with at most `concurrency` in flight.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pool {
    pub stage: &'static str,
    pub concurrency: usize,
    /// Bound on each job.
    pub job_timeout: Option<Duration>,
    /// Bound on the whole batch; unfinished jobs are aborted and left out of
    /// the results.
    pub batch_timeout: Option<Duration>,
}

impl Pool {
    /// Runs `job` on every input. Results come back in completion order,
    /// tagged with the input's key.
    pub async fn run<I, K, T, F, Fut>(&self, inputs: Vec<(I, K)>, job: F) -> Vec<(I, AppearanceResult<T>)>
    where
        I: Copy + Debug + Send + 'static,
        K: Send + 'static,
        T: Send + 'static,
        F: Fn(K) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = AppearanceResult<T>> + Send + 'static,
    {
        if inputs.is_empty() {
            return Vec::new();
        }
        let permits = Arc::new(Semaphore::new(inputs.len().min(self.concurrency).max(1)));
        let mut tasks = JoinSet::new();
        for (key, input) in inputs {
            let permits = Arc::clone(&permits);
            let job = job.clone();
            let stage = self.stage;
            let job_timeout = self.job_timeout;
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                let result = match job_timeout {
                    Some(limit) => timeout(limit, job(input))
                        .await
                        .unwrap_or(Err(AppearanceError::Timeout { stage })),
                    None => job(input).await,
                };
                (key, result)
            });
        }

        let mut results = Vec::with_capacity(tasks.len());
        let collect = async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(done) => results.push(done),
                    Err(err) => warn!(stage = self.stage, error = %err, "pool task failed"),
                }
            }
        };
        match self.batch_timeout {
            Some(limit) => {
                if timeout(limit, collect).await.is_err() {
                    warn!(stage = self.stage, "batch timed out");
                }
            }
            None => collect.await,
        }
        tasks.abort_all();
        results
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn never_exceeds_concurrency() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let pool = Pool {
            stage: "test",
            concurrency: 3,
            job_timeout: None,
            batch_timeout: None,
        };
        let inputs = (0..10u32).map(|i| (i, i)).collect();
        let results = pool
            .run(inputs, {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                move |i: u32| {
                    let in_flight = Arc::clone(&in_flight);
                    let peak = Arc::clone(&peak);
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        Ok(i * 2)
                    }
                }
            })
            .await;
        assert_eq!(results.len(), 10);
        assert_eq!(peak.load(Ordering::SeqCst), 3);
        assert!(results.iter().all(|(i, r)| r.as_ref().ok() == Some(&(i * 2))));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_job_times_out() {
        let pool = Pool {
            stage: "slow",
            concurrency: 2,
            job_timeout: Some(Duration::from_millis(50)),
            batch_timeout: None,
        };
        let results = pool
            .run(vec![(1u8, 10u64), (2u8, 500u64)], |ms: u64| async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(ms)
            })
            .await;
        assert_eq!(results.len(), 2);
        for (key, result) in results {
            match key {
                1 => assert_eq!(result.unwrap(), 10),
                _ => assert!(matches!(result, Err(AppearanceError::Timeout { stage: "slow" }))),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn batch_timeout_drops_stragglers() {
        let pool = Pool {
            stage: "batch",
            concurrency: 1,
            job_timeout: None,
            batch_timeout: Some(Duration::from_millis(150)),
        };
        let results = pool
            .run(vec![(1u8, ()), (2u8, ()), (3u8, ())], |()| async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok(())
            })
            .await;
        assert_eq!(results.len(), 1);
    }
}
