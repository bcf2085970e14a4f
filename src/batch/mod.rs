//! 批处理模块：提供有界并发的批量异步执行与结果汇总。
//!
//! # Bounded Batch Execution Module
//!
//! This module runs a sequence of independent async work items with a
//! bounded degree of concurrency, collects the successful results, and
//! routes every failure to a caller-chosen sink without aborting the run.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`run_batched`] | Barrier strategy: fixed rounds, next round waits for the current one |
//! | [`run_bounded`] | Semaphore strategy: continuous execution under a permit ceiling |
//! | [`BatchExecutor`] | Configured executor returning a [`BatchReport`] |
//! | [`BatchExecutorConfig`] | Strategy and concurrency size, with env overrides |
//! | [`ResultCollector`] / [`ResultSet`] | Thread-safe unordered result aggregation |
//! | [`ErrorSink`] | Destination for [`ItemFailure`]s |
//!
//! ## Example
//!
//! ```rust
//! use batch_await::batch::{run_bounded, CollectingErrorSink};
//!
//! # tokio_test::block_on(async {
//! let items = (1..=10).map(|i| move || async move {
//!     if i % 4 == 0 { Err(format!("item {} failed", i)) } else { Ok(i) }
//! });
//!
//! let failures = CollectingErrorSink::new();
//! let results = run_bounded(items, 3, failures.clone()).await.unwrap();
//!
//! assert_eq!(results.len(), 8);
//! assert_eq!(failures.len(), 2);
//! # });
//! ```
//!
//! ## Strategies
//!
//! - **Barrier**: at most `size` items per round; a single slow item delays
//!   the start of the whole next round.
//! - **Bounded**: at most `size` items at any instant; a finishing item
//!   frees its permit for the next waiting one. Never slower than Barrier
//!   for the same input and size.
//!
//! Results are unordered in both cases. Work items that panic are not
//! treated as failures; the panic propagates to the caller.

mod collector;
mod executor;
mod run;
mod sink;

pub use collector::{ResultCollector, ResultSet};
pub use executor::{
    BatchExecutor, BatchExecutorConfig, BatchReport, BatchStrategy, CONCURRENCY_ENV, STRATEGY_ENV,
};
pub use run::{run_batched, run_batched_unit, run_bounded, run_bounded_unit};
pub use sink::{CollectingErrorSink, ErrorSink, ItemFailure, LogErrorSink, NoopErrorSink};
