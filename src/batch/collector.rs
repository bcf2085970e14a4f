//! 结果聚合：并发安全、无序、只追加的成功结果集合。
//!
//! Result aggregation.

use std::sync::{Mutex, MutexGuard};

/// Append-only sink for successful work item results.
///
/// Every in-flight item pushes through a shared reference, so no
/// coordination is needed from the caller. Insertion order is not
/// meaningful.
#[derive(Debug)]
pub struct ResultCollector<T> {
    items: Mutex<Vec<T>>,
}

impl<T> Default for ResultCollector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResultCollector<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    // Pushes never leave the Vec half-written, so a poisoned lock still guards valid data.
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, item: T) {
        self.lock().push(item);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take everything collected so far.
    ///
    /// Executors call this once, after every producer has settled.
    pub fn finish(&self) -> ResultSet<T> {
        ResultSet {
            items: std::mem::take(&mut *self.lock()),
        }
    }
}

/// Finalized, unordered multiset of successful results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet<T> {
    items: Vec<T>,
}

impl<T> ResultSet<T> {
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Ord> ResultSet<T> {
    /// Results in ascending order, for comparisons that ignore arrival order.
    pub fn into_sorted_vec(self) -> Vec<T> {
        let mut items = self.items;
        items.sort();
        items
    }
}

impl<T> Default for ResultSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> IntoIterator for ResultSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ResultSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> FromIterator<T> for ResultSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_empty() {
        let collector: ResultCollector<String> = ResultCollector::new();
        assert!(collector.is_empty());
        assert_eq!(collector.len(), 0);
        assert!(collector.finish().is_empty());
    }

    #[test]
    fn test_collector_push_and_finish() {
        let collector = ResultCollector::new();
        collector.push(3);
        collector.push(1);
        collector.push(2);
        assert_eq!(collector.len(), 3);

        let set = collector.finish();
        assert_eq!(set.len(), 3);
        assert_eq!(set.into_sorted_vec(), vec![1, 2, 3]);

        // finish drains the storage
        assert!(collector.is_empty());
    }

    #[test]
    fn test_collector_thread_safe() {
        use std::thread;

        let collector: ResultCollector<i32> = ResultCollector::new();

        thread::scope(|scope| {
            for i in 0..10 {
                let c = &collector;
                scope.spawn(move || {
                    for j in 0..10 {
                        c.push(i * 10 + j);
                    }
                });
            }
        });

        let set = collector.finish();
        assert_eq!(set.len(), 100);
        assert_eq!(set.into_sorted_vec(), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_result_set_iteration() {
        let set: ResultSet<u8> = vec![5, 6].into_iter().collect();
        assert_eq!(set.iter().copied().sum::<u8>(), 11);
        assert_eq!((&set).into_iter().count(), 2);
        assert_eq!(set.into_vec().len(), 2);
        assert!(ResultSet::<u8>::default().is_empty());
    }
}
