use itertools::{Itertools, ZipEq};

use crate::BiMapError;

/// Forward iterator over `(key, value)` pairs in storage order.
///
/// Returns `None` once when the pairs run out. Calling `next` again after that
/// panics; use [`try_next`](Iter::try_next) for a non-panicking form.
pub struct Iter<'a, K, V> {
    pairs: ZipEq<std::slice::Iter<'a, K>, std::slice::Iter<'a, V>>,
    exhausted: bool,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(keys: &'a [K], values: &'a [V]) -> Self {
        Self {
            pairs: keys.iter().zip_eq(values),
            exhausted: false,
        }
    }

    pub fn try_next(&mut self) -> Result<(&'a K, &'a V), BiMapError> {
        if self.exhausted {
            return Err(BiMapError::IteratorExhausted);
        }
        match self.pairs.next() {
            Some(pair) => Ok(pair),
            None => {
                self.exhausted = true;
                Err(BiMapError::IteratorExhausted)
            }
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            panic!("{}", BiMapError::IteratorExhausted);
        }
        self.try_next().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted {
            (0, Some(0))
        } else {
            self.pairs.size_hint()
        }
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> std::fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.len())
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

#[cfg(test)]
use super::OrderedBiMap;

#[test]
fn test_iter_yields_pairs_in_order() {
    let mut map = OrderedBiMap::new();
    map.put('a', 1).put('b', 2).put('c', 3).remove_by_key(&'b');
    let mut iter = map.iter();
    assert_eq!(iter.len(), 2);
    assert_eq!(iter.next(), Some((&'a', &1)));
    assert_eq!(iter.next(), Some((&'c', &3)));
    assert_eq!(iter.len(), 0);
    assert_eq!(iter.next(), None);
}

#[test]
fn test_iter_counts_every_entry_once() {
    let map: OrderedBiMap<u16, u16> = (0..64).map(|i| (i, 63 - i)).collect();
    let pairs = map.iter().map(|(k, v)| (*k, *v)).collect_vec();
    assert_eq!(pairs.len(), map.len());
    assert!(pairs.iter().all(|(k, v)| k + v == 63));
    assert_eq!(pairs.first(), Some(&(0, 63)));
    assert_eq!((&map).into_iter().count(), 64);
}

#[test]
#[should_panic(expected = "iterator advanced past its end")]
fn test_next_after_exhaustion_panics() {
    let mut map = OrderedBiMap::new();
    map.put("only", 1);
    let mut iter = map.iter();
    assert!(iter.next().is_some());
    assert!(iter.next().is_none());
    iter.next();
}

#[test]
fn test_try_next_reports_exhaustion() {
    let mut map = OrderedBiMap::new();
    map.put("only", 1);
    let mut iter = map.iter();
    assert_eq!(iter.try_next(), Ok((&"only", &1)));
    assert_eq!(iter.try_next(), Err(BiMapError::IteratorExhausted));
    assert_eq!(iter.try_next(), Err(BiMapError::IteratorExhausted));
}

#[test]
fn test_fresh_iterator_starts_over() {
    let map: OrderedBiMap<_, _> = [("x", 1), ("y", 2)].into_iter().collect();
    let first = map.iter().collect_vec();
    let second = map.iter().collect_vec();
    assert_eq!(first, second);
}
