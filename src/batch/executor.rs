//! 批处理执行器：屏障轮次与信号量限流两种调度策略。
//!
//! Batch executor.

use super::collector::{ResultCollector, ResultSet};
use super::sink::{ErrorSink, ItemFailure, LogErrorSink};
use crate::error::{Error, ErrorContext};
use crate::utils::chunk;
use crate::Result;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Environment variable overriding [`BatchExecutorConfig::size`].
pub const CONCURRENCY_ENV: &str = "BATCH_AWAIT_CONCURRENCY";
/// Environment variable overriding [`BatchExecutorConfig::strategy`].
pub const STRATEGY_ENV: &str = "BATCH_AWAIT_STRATEGY";

#[derive(Debug, Clone)]
pub struct BatchReport<T> {
    pub results: ResultSet<T>,
    pub failed: usize,
    pub total: usize,
    /// Barrier rounds executed; always zero for [`BatchStrategy::Bounded`].
    pub rounds: usize,
    pub execution_time: Duration,
}

impl<T> BatchReport<T> {
    pub fn success_count(&self) -> usize {
        self.results.len()
    }
    pub fn failure_count(&self) -> usize {
        self.failed
    }
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.results.len() as f64 / self.total as f64
        }
    }
    pub fn into_results(self) -> ResultSet<T> {
        self.results
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStrategy {
    /// Fixed rounds of `size` items; round k+1 starts after round k settles.
    Barrier,
    /// Permit-gated streaming; a finished item frees its slot immediately.
    #[default]
    Bounded,
}

impl fmt::Display for BatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStrategy::Barrier => f.write_str("barrier"),
            BatchStrategy::Bounded => f.write_str("bounded"),
        }
    }
}

impl FromStr for BatchStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "barrier" => Ok(BatchStrategy::Barrier),
            "bounded" => Ok(BatchStrategy::Bounded),
            other => Err(Error::configuration(
                "unknown batch strategy",
                ErrorContext::new()
                    .with_field_path("strategy")
                    .with_details(format!("expected 'barrier' or 'bounded', got '{}'", other)),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchExecutorConfig {
    pub strategy: BatchStrategy,
    /// Concurrency ceiling; also the round width for [`BatchStrategy::Barrier`].
    pub size: usize,
}

impl Default for BatchExecutorConfig {
    fn default() -> Self {
        Self {
            strategy: BatchStrategy::default(),
            size: 10,
        }
    }
}

impl BatchExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_strategy(mut self, s: BatchStrategy) -> Self {
        self.strategy = s;
        self
    }
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        Error::check_size(self.size, "BatchExecutorConfig")
    }

    /// Defaults overridden by `BATCH_AWAIT_CONCURRENCY` and `BATCH_AWAIT_STRATEGY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(CONCURRENCY_ENV) {
            config.size = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| {
                    Error::configuration(
                        "concurrency must be a positive integer",
                        ErrorContext::new()
                            .with_field_path(CONCURRENCY_ENV)
                            .with_details(raw.clone()),
                    )
                })?;
        }
        if let Some(raw) = lookup(STRATEGY_ENV) {
            config.strategy = raw.parse().map_err(|_| {
                Error::configuration(
                    "unknown batch strategy",
                    ErrorContext::new()
                        .with_field_path(STRATEGY_ENV)
                        .with_details(raw.clone()),
                )
            })?;
        }
        Ok(config)
    }
}

/// Runs one work item and routes its outcome: `Some` on success, `None` after
/// the failure has been reported.
async fn settle<F, Fut, T, E, S>(index: usize, work: F, sink: &S) -> Option<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    S: ErrorSink<E> + ?Sized,
{
    match work().await {
        Ok(value) => {
            trace!(index, "work item succeeded");
            Some(value)
        }
        Err(error) => {
            trace!(index, "work item failed");
            sink.report(ItemFailure::new(index, error));
            None
        }
    }
}

pub struct BatchExecutor {
    config: BatchExecutorConfig,
}

impl BatchExecutor {
    pub fn new() -> Self {
        Self {
            config: BatchExecutorConfig::default(),
        }
    }
    pub fn with_config(config: BatchExecutorConfig) -> Self {
        Self { config }
    }
    pub fn config(&self) -> &BatchExecutorConfig {
        &self.config
    }

    /// Run with the configured strategy, logging failures through [`LogErrorSink`].
    pub async fn execute<I, F, Fut, T, E>(&self, items: I) -> Result<BatchReport<T>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: fmt::Display,
    {
        self.execute_with_sink(items, &LogErrorSink).await
    }

    pub async fn execute_with_sink<I, F, Fut, T, E, S>(
        &self,
        items: I,
        sink: &S,
    ) -> Result<BatchReport<T>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        S: ErrorSink<E> + ?Sized,
    {
        match self.config.strategy {
            BatchStrategy::Barrier => self.execute_barrier(items, sink).await,
            BatchStrategy::Bounded => self.execute_bounded(items, sink).await,
        }
    }

    /// Barrier strategy: chunk the items into rounds of `size` and run each
    /// round fully concurrently, waiting for it to settle before the next.
    ///
    /// A slow item holds back the start of every later round.
    pub async fn execute_barrier<I, F, Fut, T, E, S>(
        &self,
        items: I,
        sink: &S,
    ) -> Result<BatchReport<T>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        S: ErrorSink<E> + ?Sized,
    {
        let size = self.config.size;
        Error::check_size(size, "run_batched")?;

        let start = Instant::now();
        let collector = ResultCollector::new();
        let (mut total, mut failed, mut rounds) = (0, 0, 0);
        debug!(strategy = "barrier", size, "batch run started");

        for round in chunk(items.into_iter().enumerate(), size)? {
            rounds += 1;
            total += round.len();
            debug!(round = rounds, width = round.len(), "barrier round started");

            // join_all builds every future before polling, so each item is invoked once.
            let settled = futures::future::join_all(
                round
                    .into_iter()
                    .map(|(index, work)| settle(index, work, sink)),
            )
            .await;

            for outcome in settled {
                match outcome {
                    Some(value) => collector.push(value),
                    None => failed += 1,
                }
            }
        }

        let report = BatchReport {
            results: collector.finish(),
            failed,
            total,
            rounds,
            execution_time: start.elapsed(),
        };
        debug!(
            strategy = "barrier",
            total,
            failed,
            rounds,
            elapsed = ?report.execution_time,
            "batch run finished"
        );
        Ok(report)
    }

    /// Bounded strategy: launch every item at once and gate execution on a
    /// semaphore with `size` permits.
    ///
    /// The permit is held by an RAII guard, so it is released on success,
    /// failure, and unwinding alike.
    pub async fn execute_bounded<I, F, Fut, T, E, S>(
        &self,
        items: I,
        sink: &S,
    ) -> Result<BatchReport<T>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        S: ErrorSink<E> + ?Sized,
    {
        let size = self.config.size;
        Error::check_size(size, "run_bounded")?;

        let start = Instant::now();
        let permits = Semaphore::new(size.min(Semaphore::MAX_PERMITS));
        let collector = ResultCollector::new();
        debug!(strategy = "bounded", size, "batch run started");

        let mut in_flight: FuturesUnordered<_> = items
            .into_iter()
            .enumerate()
            .map(|(index, work)| {
                let permits = &permits;
                let collector = &collector;
                async move {
                    // The pool is local and never closed, so acquisition cannot fail.
                    let _permit = permits.acquire().await.ok();
                    match settle(index, work, sink).await {
                        Some(value) => {
                            collector.push(value);
                            true
                        }
                        None => false,
                    }
                }
            })
            .collect();

        let total = in_flight.len();
        let mut failed = 0;
        while let Some(succeeded) = in_flight.next().await {
            if !succeeded {
                failed += 1;
            }
        }

        let report = BatchReport {
            results: collector.finish(),
            failed,
            total,
            rounds: 0,
            execution_time: start.elapsed(),
        };
        debug!(
            strategy = "bounded",
            total,
            failed,
            elapsed = ?report.execution_time,
            "batch run finished"
        );
        Ok(report)
    }
}

impl Default for BatchExecutor {
    fn default() -> Self {
        Self::new()
    }
}
