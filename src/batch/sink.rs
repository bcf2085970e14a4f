//! 失败路由：将工作项错误交给调用方选择的错误接收器。
//!
//! Failure routing for work items.
//!
//! An executor never returns a work item's error to its own caller. Each
//! failure is wrapped in an [`ItemFailure`] and handed to exactly one
//! [`ErrorSink::report`] call. A sink that panics aborts the whole run: the
//! panic unwinds out of the executor.

use std::fmt;
use std::sync::{Arc, Mutex};

/// A failed work item: its position in the input sequence and the error it raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure<E> {
    pub index: usize,
    pub error: E,
}

impl<E> ItemFailure<E> {
    pub fn new(index: usize, error: E) -> Self {
        Self { index, error }
    }
}

impl<E: fmt::Display> fmt::Display for ItemFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "work item {} failed: {}", self.index, self.error)
    }
}

impl<E: std::error::Error + 'static> std::error::Error for ItemFailure<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Destination for work item failures.
///
/// Any `Fn(ItemFailure<E>)` closure is a sink.
pub trait ErrorSink<E> {
    fn report(&self, failure: ItemFailure<E>);
}

impl<E, F> ErrorSink<E> for F
where
    F: Fn(ItemFailure<E>),
{
    fn report(&self, failure: ItemFailure<E>) {
        self(failure)
    }
}

/// Drops every failure. Choosing this sink means failed items vanish without a trace.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopErrorSink;

impl<E> ErrorSink<E> for NoopErrorSink {
    fn report(&self, _failure: ItemFailure<E>) {}
}

/// Logs each failure at `WARN`. Used when the caller does not pick a sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrorSink;

impl<E: fmt::Display> ErrorSink<E> for LogErrorSink {
    fn report(&self, failure: ItemFailure<E>) {
        tracing::warn!(index = failure.index, error = %failure.error, "work item failed");
    }
}

/// In-memory sink; clones share the same storage.
#[derive(Debug)]
pub struct CollectingErrorSink<E> {
    failures: Arc<Mutex<Vec<ItemFailure<E>>>>,
}

impl<E> Clone for CollectingErrorSink<E> {
    fn clone(&self) -> Self {
        Self {
            failures: Arc::clone(&self.failures),
        }
    }
}

impl<E> Default for CollectingErrorSink<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> CollectingErrorSink<E> {
    pub fn new() -> Self {
        Self {
            failures: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.failures.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the recorded failures, sorted by item index.
    pub fn take(&self) -> Vec<ItemFailure<E>> {
        let mut failures =
            std::mem::take(&mut *self.failures.lock().unwrap_or_else(|e| e.into_inner()));
        failures.sort_by_key(|f| f.index);
        failures
    }
}

impl<E> ErrorSink<E> for CollectingErrorSink<E> {
    fn report(&self, failure: ItemFailure<E>) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_item_failure_display() {
        let failure = ItemFailure::new(3, "boom");
        assert_eq!(failure.to_string(), "work item 3 failed: boom");
        assert_eq!(failure.error, "boom");
    }

    #[test]
    fn test_closure_is_a_sink() {
        let seen = RefCell::new(Vec::new());
        let sink = |f: ItemFailure<i32>| seen.borrow_mut().push((f.index, f.error));
        sink.report(ItemFailure::new(1, -1));
        sink.report(ItemFailure::new(4, -4));
        assert_eq!(*seen.borrow(), vec![(1, -1), (4, -4)]);
    }

    #[test]
    fn test_collecting_sink_sorted_take() {
        let sink = CollectingErrorSink::new();
        let handle = sink.clone();
        sink.report(ItemFailure::new(7, "late"));
        sink.report(ItemFailure::new(2, "early"));
        assert_eq!(handle.len(), 2);

        let failures = handle.take();
        assert_eq!(failures[0], ItemFailure::new(2, "early"));
        assert_eq!(failures[1], ItemFailure::new(7, "late"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_noop_and_log_sinks_accept_failures() {
        NoopErrorSink.report(ItemFailure::new(0, "ignored"));
        LogErrorSink.report(ItemFailure::new(0, "logged"));
    }
}
