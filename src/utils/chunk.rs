//! 分组工具：按固定大小惰性切分迭代器与流，保持原有顺序。
//!
//! Order-preserving fixed-size grouping for iterators and streams.
//!
//! Both adapters are lazy: a group is formed by pulling at most `size`
//! elements from the source, and nothing is pulled until the group is
//! requested.

use crate::error::Error;
use crate::Result;
use futures::{Stream, StreamExt};
use std::iter::{Fuse, FusedIterator};

/// Lazy iterator over consecutive groups of `size` elements.
///
/// Every group has exactly `size` elements except possibly the last, which
/// holds the non-empty remainder.
#[derive(Debug, Clone)]
pub struct Chunks<I: Iterator> {
    iter: Fuse<I>,
    size: usize,
}

impl<I: Iterator> Iterator for Chunks<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let group: Vec<I::Item> = self.iter.by_ref().take(self.size).collect();
        if group.is_empty() {
            None
        } else {
            Some(group)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        (
            lower.div_ceil(self.size),
            upper.map(|u| u.div_ceil(self.size)),
        )
    }
}

impl<I: Iterator> FusedIterator for Chunks<I> {}

/// Split `items` into consecutive groups of `size`, preserving order.
///
/// Fails with [`Error::InvalidArgument`] when `size` is zero; the source is
/// not touched in that case.
///
/// ```rust
/// use batch_await::utils::chunk;
///
/// let groups: Vec<Vec<i32>> = chunk(1..=7, 3).unwrap().collect();
/// assert_eq!(groups, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
/// ```
pub fn chunk<I>(items: I, size: usize) -> Result<Chunks<I::IntoIter>>
where
    I: IntoIterator,
{
    Error::check_size(size, "chunk")?;
    Ok(Chunks {
        iter: items.into_iter().fuse(),
        size,
    })
}

/// Stream counterpart of [`chunk`].
///
/// Groups are emitted once `size` elements have arrived or the source ends;
/// a pending source never yields a partial group early.
pub fn chunk_stream<S>(stream: S, size: usize) -> Result<futures::stream::Chunks<S>>
where
    S: Stream,
{
    Error::check_size(size, "chunk_stream")?;
    Ok(stream.chunks(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_chunk_even_split() {
        let groups: Vec<Vec<i32>> = chunk(vec![1, 2, 3, 4], 2).unwrap().collect();
        assert_eq!(groups, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_chunk_short_last_group() {
        let groups: Vec<Vec<char>> = chunk("abcde".chars(), 2).unwrap().collect();
        assert_eq!(groups, vec![vec!['a', 'b'], vec!['c', 'd'], vec!['e']]);
    }

    #[test]
    fn test_chunk_reconstructs_input() {
        for size in 1..=12 {
            let input: Vec<u32> = (0..37).collect();
            let groups: Vec<Vec<u32>> = chunk(input.clone(), size).unwrap().collect();
            let (last, full) = groups.split_last().unwrap();
            assert!(full.iter().all(|g| g.len() == size));
            assert!(!last.is_empty() && last.len() <= size);
            assert_eq!(groups.concat(), input);
        }
    }

    #[test]
    fn test_chunk_empty_input() {
        let mut groups = chunk(Vec::<u8>::new(), 3).unwrap();
        assert!(groups.next().is_none());
        assert!(groups.next().is_none());
    }

    #[test]
    fn test_chunk_zero_size_rejected() {
        let err = chunk(vec![1, 2, 3], 0).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_chunk_is_lazy() {
        let pulled = Cell::new(0);
        let source = (0..100).inspect(|_| pulled.set(pulled.get() + 1));
        let mut groups = chunk(source, 4).unwrap();
        assert_eq!(pulled.get(), 0);

        assert_eq!(groups.next(), Some(vec![0, 1, 2, 3]));
        assert_eq!(pulled.get(), 4);
    }

    #[test]
    fn test_chunk_size_hint() {
        let groups = chunk(0..10, 4).unwrap();
        assert_eq!(groups.size_hint(), (3, Some(3)));
    }

    #[tokio::test]
    async fn test_chunk_stream() {
        let groups: Vec<Vec<i32>> = chunk_stream(futures::stream::iter(1..=5), 2)
            .unwrap()
            .collect()
            .await;
        assert_eq!(groups, vec![vec![1, 2], vec![3, 4], vec![5]]);
    }

    #[test]
    fn test_chunk_stream_zero_size_rejected() {
        assert!(chunk_stream(futures::stream::iter(1..=5), 0).is_err());
    }
}
