//! 便捷入口：基于执行器的自由函数及单元返回变体。
//!
//! Free-function entry points over [`BatchExecutor`].

use super::collector::ResultSet;
use super::executor::{BatchExecutor, BatchExecutorConfig, BatchStrategy};
use super::sink::ErrorSink;
use crate::Result;
use futures::TryFutureExt;
use std::future::Future;

fn executor(strategy: BatchStrategy, size: usize) -> BatchExecutor {
    BatchExecutor::with_config(
        BatchExecutorConfig::new()
            .with_strategy(strategy)
            .with_size(size),
    )
}

/// Run `items` in barrier rounds of at most `size`, returning the successful results.
///
/// Each failure goes to `on_error` exactly once. The only error returned is
/// [`Error::InvalidArgument`](crate::Error::InvalidArgument) for `size == 0`,
/// raised before any item is invoked.
///
/// ```rust
/// use batch_await::batch::{run_batched, NoopErrorSink};
///
/// # tokio_test::block_on(async {
/// let items = (1..=5).map(|i| move || async move {
///     if i == 3 { Err("three") } else { Ok(i) }
/// });
/// let results = run_batched(items, 2, NoopErrorSink).await.unwrap();
/// assert_eq!(results.into_sorted_vec(), vec![1, 2, 4, 5]);
/// # });
/// ```
pub async fn run_batched<I, F, Fut, T, E, S>(
    items: I,
    size: usize,
    on_error: S,
) -> Result<ResultSet<T>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    S: ErrorSink<E>,
{
    executor(BatchStrategy::Barrier, size)
        .execute_barrier(items, &on_error)
        .await
        .map(|report| report.into_results())
}

/// Run `items` all at once behind a `size`-permit semaphore, returning the
/// successful results.
///
/// Same failure contract as [`run_batched`], without round barriers.
pub async fn run_bounded<I, F, Fut, T, E, S>(
    items: I,
    size: usize,
    on_error: S,
) -> Result<ResultSet<T>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    S: ErrorSink<E>,
{
    executor(BatchStrategy::Bounded, size)
        .execute_bounded(items, &on_error)
        .await
        .map(|report| report.into_results())
}

/// [`run_batched`] for work items without a result; yields one `true` marker
/// per successful item.
pub async fn run_batched_unit<I, F, Fut, E, S>(
    items: I,
    size: usize,
    on_error: S,
) -> Result<ResultSet<bool>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<(), E>>,
    S: ErrorSink<E>,
{
    run_batched(settled_markers(items), size, on_error).await
}

/// [`run_bounded`] for work items without a result; yields one `true` marker
/// per successful item.
pub async fn run_bounded_unit<I, F, Fut, E, S>(
    items: I,
    size: usize,
    on_error: S,
) -> Result<ResultSet<bool>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<(), E>>,
    S: ErrorSink<E>,
{
    run_bounded(settled_markers(items), size, on_error).await
}

fn settled_markers<I, F, Fut, E>(
    items: I,
) -> impl Iterator<Item = impl FnOnce() -> futures::future::MapOk<Fut, fn(()) -> bool>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<(), E>>,
{
    let marker: fn(()) -> bool = |()| true;
    items
        .into_iter()
        .map(move |work| move || work().map_ok(marker))
}
