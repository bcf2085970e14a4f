//! # batch-await
//!
//! 批量等待库：以有界并发执行异步工作项并汇总结果。
//!
//! Bounded-concurrency execution of async work items.
//!
//! ## Overview
//!
//! A caller hands over an ordered sequence of nullary async functions, a
//! concurrency size and a failure sink, picks one of two scheduling
//! strategies, and gets back an unordered collection of the successful
//! results once every item has settled.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`batch`] | Barrier and semaphore executors, result aggregation, failure sinks |
//! | [`utils`] | Lazy order-preserving chunking for iterators and streams |
//! | [`error`] | Crate error type |
//!
//! ## Quick Start
//!
//! ```rust
//! use batch_await::{run_batched, run_bounded, LogErrorSink};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> batch_await::Result<()> {
//!     let items = || {
//!         (1..=6u64).map(|i| move || async move {
//!             tokio::time::sleep(Duration::from_millis(i)).await;
//!             Ok::<_, std::io::Error>(i)
//!         })
//!     };
//!
//!     let rounds = run_batched(items(), 4, LogErrorSink).await?;
//!     let streamed = run_bounded(items(), 4, LogErrorSink).await?;
//!     assert_eq!(rounds.into_sorted_vec(), streamed.into_sorted_vec());
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod error;
pub mod utils;

pub use batch::{
    run_batched, run_batched_unit, run_bounded, run_bounded_unit, BatchExecutor,
    BatchExecutorConfig, BatchReport, BatchStrategy, CollectingErrorSink, ErrorSink, ItemFailure,
    LogErrorSink, NoopErrorSink, ResultSet,
};
pub use error::{Error, ErrorContext};
pub use utils::{chunk, chunk_stream};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
