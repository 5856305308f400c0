mod iter;
mod serde_impl;

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use itertools::Itertools;

use crate::BiMapError;

pub use iter::Iter;

/// One-to-one map between keys and values, kept in insertion order.
///
/// Keys and values live in two parallel vectors; `keys[i]` is paired with
/// `values[i]`. Each side has a hash index from element to its position, so
/// lookups are O(1) in both directions. Removal is stable: later entries move
/// down by one and their positions are rewritten, which costs O(n).
#[derive(Clone)]
pub struct OrderedBiMap<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
    key_positions: HashMap<K, usize>,
    value_positions: HashMap<V, usize>,
}

impl<K, V> OrderedBiMap<K, V> {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            key_positions: HashMap::new(),
            value_positions: HashMap::new(),
        }
    }

    /// Pre-sizes storage for `capacity` entries. Behaves exactly like `new`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            key_positions: HashMap::with_capacity(capacity),
            value_positions: HashMap::with_capacity(capacity),
        }
    }

    #[doc(alias = "size")]
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.keys.len(), self.values.len());
        debug_assert_eq!(self.keys.len(), self.key_positions.len());
        debug_assert_eq!(self.keys.len(), self.value_positions.len());
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys in storage order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Values in storage order, paired index-wise with [`keys`](Self::keys).
    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        Some((self.keys.get(index)?, self.values.get(index)?))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.keys, &self.values)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
        self.key_positions.clear();
        self.value_positions.clear();
    }
}

impl<K, V> OrderedBiMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    pub fn reserve(&mut self, additional: usize) {
        self.keys.reserve(additional);
        self.values.reserve(additional);
        self.key_positions.reserve(additional);
        self.value_positions.reserve(additional);
    }

    /// Binds `key` to `value`.
    ///
    /// An existing key keeps its place and only has its value replaced. A new
    /// key is appended. If `value` already belonged to some other key, that
    /// entry is removed first so values stay unique.
    pub fn put(&mut self, key: K, value: V) -> &mut Self {
        if let Some(&owner) = self.value_positions.get(&value) {
            if self.keys[owner] == key {
                return self;
            }
            log::debug!("put: evicting entry at position {owner} to rebind its value");
            self.remove_at(owner);
        }

        match self.key_positions.get(&key) {
            Some(&position) => {
                let old = std::mem::replace(&mut self.values[position], value.clone());
                self.value_positions.remove(&old);
                self.value_positions.insert(value, position);
            }
            None => self.push(key, value),
        }
        debug_assert_eq!(self.key_positions.len(), self.value_positions.len());
        self
    }

    /// Like [`put`](Self::put), but refuses to steal a value from another key.
    pub fn try_put(&mut self, key: K, value: V) -> Result<&mut Self, BiMapError> {
        if let Some(&position) = self.value_positions.get(&value) {
            if self.keys[position] != key {
                return Err(BiMapError::ValueCollision { position });
            }
        }
        Ok(self.put(key, value))
    }

    /// Puts every entry of `other`, in its order. On a shared key `other` wins.
    pub fn put_all(&mut self, other: &Self) -> &mut Self {
        self.reserve(other.len());
        for (key, value) in other {
            self.put(key.clone(), value.clone());
        }
        self
    }

    pub fn get_value<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.key_positions
            .get(key)
            .map(|&position| &self.values[position])
    }

    pub fn get_key<Q>(&self, value: &Q) -> Option<&K>
    where
        V: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.value_positions
            .get(value)
            .map(|&position| &self.keys[position])
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.key_positions.contains_key(key)
    }

    pub fn contains_value<Q>(&self, value: &Q) -> bool
    where
        V: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.value_positions.contains_key(value)
    }

    pub fn position_of_key<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.key_positions.get(key).copied()
    }

    pub fn position_of_value<Q>(&self, value: &Q) -> Option<usize>
    where
        V: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.value_positions.get(value).copied()
    }

    /// Removes the entry for `key` and returns its value. Absent keys are a no-op.
    pub fn remove_by_key<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let position = *self.key_positions.get(key)?;
        Some(self.remove_at(position).1)
    }

    pub fn remove_by_value<Q>(&mut self, value: &Q) -> Option<K>
    where
        V: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let position = *self.value_positions.get(value)?;
        Some(self.remove_at(position).0)
    }

    /// Deep copy with keys and values swapped, in the same order.
    pub fn inverse(&self) -> OrderedBiMap<V, K> {
        OrderedBiMap {
            keys: self.values.clone(),
            values: self.keys.clone(),
            key_positions: self.value_positions.clone(),
            value_positions: self.key_positions.clone(),
        }
    }

    fn push(&mut self, key: K, value: V) {
        let position = self.keys.len();
        self.key_positions.insert(key.clone(), position);
        self.value_positions.insert(value.clone(), position);
        self.keys.push(key);
        self.values.push(value);
    }

    fn remove_at(&mut self, position: usize) -> (K, V) {
        let key = self.keys.remove(position);
        let value = self.values.remove(position);
        self.key_positions.remove(&key);
        self.value_positions.remove(&value);

        let shifted = self.keys.len() - position;
        if shifted > 0 {
            log::trace!("remove: compacting {shifted} entries after position {position}");
        }
        for (offset, (k, v)) in self.keys[position..]
            .iter()
            .zip_eq(&self.values[position..])
            .enumerate()
        {
            let new_position = position + offset;
            if let Some(slot) = self.key_positions.get_mut(k) {
                *slot = new_position;
            }
            if let Some(slot) = self.value_positions.get_mut(v) {
                *slot = new_position;
            }
        }
        (key, value)
    }
}

impl<K, V> Default for OrderedBiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Order-sensitive: equal maps hold the same pairs at the same positions.
impl<K: PartialEq, V: PartialEq> PartialEq for OrderedBiMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.values == other.values
    }
}

impl<K: Eq, V: Eq> Eq for OrderedBiMap<K, V> {}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for OrderedBiMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedBiMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Extend<(K, V)> for OrderedBiMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedBiMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

#[cfg(test)]
fn hello_there() -> OrderedBiMap<&'static str, i32> {
    let mut map = OrderedBiMap::new();
    map.put("Hello", 1).put("there!", 2);
    map
}

#[cfg(test)]
fn assert_consistent<K, V>(map: &OrderedBiMap<K, V>)
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Eq + Hash + Clone + std::fmt::Debug,
{
    assert_eq!(map.keys().len(), map.len());
    assert_eq!(map.values().len(), map.len());
    for (position, (key, value)) in map.keys().iter().zip_eq(map.values()).enumerate() {
        assert_eq!(map.position_of_key(key), Some(position));
        assert_eq!(map.position_of_value(value), Some(position));
        assert_eq!(map.get_value(key), Some(value));
        assert_eq!(map.get_key(value), Some(key));
    }
}

#[test]
fn test_empty() {
    let map = OrderedBiMap::<String, i32>::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.get_value("x"), None);
    assert_eq!(map.get_key(&0), None);
    assert!(map.keys().is_empty());
    assert_eq!(map, OrderedBiMap::with_capacity(16));
}

#[test]
fn test_put_keeps_insertion_order() {
    let map = hello_there();
    assert_eq!(map.len(), 2);
    assert_eq!(map.keys(), ["Hello", "there!"]);
    assert_eq!(map.values(), [1, 2]);
    assert_eq!(map.get_value("Hello"), Some(&1));
    assert_eq!(map.get_key(&2), Some(&"there!"));
    assert!(map.contains_key("there!"));
    assert!(map.contains_value(&1));
    assert!(!map.contains_value(&3));
    assert_eq!(map.get_index(1), Some((&"there!", &2)));
    assert_eq!(map.get_index(2), None);
}

#[test]
fn test_put_overwrites_value() {
    let mut map = OrderedBiMap::new();
    map.put("Hello", 1).put("Hello", 2);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get_value("Hello"), Some(&2));
    assert_eq!(map.get_key(&1), None);
    assert!(!map.contains_value(&1));
    assert_consistent(&map);
}

#[test]
fn test_overwrite_keeps_position() {
    let mut map = hello_there();
    map.put("Hello", 7);
    assert_eq!(map.keys(), ["Hello", "there!"]);
    assert_eq!(map.values(), [7, 2]);
    assert_consistent(&map);
}

#[test]
fn test_put_same_pair_is_noop() {
    let mut map = hello_there();
    map.put("Hello", 1);
    assert_eq!(map, hello_there());
}

#[test]
fn test_put_evicts_previous_owner_of_value() {
    let mut map = hello_there();
    map.put("again", 1);
    assert_eq!(map.len(), 2);
    assert!(!map.contains_key("Hello"));
    assert_eq!(map.get_key(&1), Some(&"again"));
    assert_eq!(map.keys(), ["there!", "again"]);
    assert_consistent(&map);
}

#[test]
fn test_put_existing_key_with_value_of_other_key() {
    let mut map = hello_there();
    map.put("there!", 1);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get_value("there!"), Some(&1));
    assert_eq!(map.get_key(&2), None);
    assert_eq!(map.position_of_key("there!"), Some(0));
    assert_consistent(&map);
}

#[test]
fn test_try_put_rejects_collision() {
    let mut map = hello_there();
    assert_eq!(
        map.try_put("again", 2).err(),
        Some(BiMapError::ValueCollision { position: 1 })
    );
    assert_eq!(map, hello_there());

    map.try_put("Hello", 5).unwrap().try_put("again", 3).unwrap();
    assert_eq!(map.values(), [5, 2, 3]);
    assert_consistent(&map);
}

#[test]
fn test_remove_by_key() {
    let mut map = hello_there();
    assert_eq!(map.remove_by_key("Hello"), Some(1));
    assert_eq!(map.len(), 1);
    assert!(!map.contains_key("Hello"));
    assert_eq!(map.get_value("Hello"), None);
    assert_eq!(map.get_index(0), Some((&"there!", &2)));
    assert_eq!(map.get_key(&2), Some(&"there!"));
    assert_consistent(&map);

    assert_eq!(map.remove_by_key("Hello"), None);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_remove_by_value() {
    let mut map = hello_there();
    assert_eq!(map.remove_by_value(&2), Some("there!"));
    assert_eq!(map.remove_by_value(&2), None);
    assert_eq!(map.remove_by_value(&1), Some("Hello"));
    assert!(map.is_empty());
}

#[test]
fn test_removal_is_stable() {
    let mut map: OrderedBiMap<u32, String> = (0..10).map(|i| (i, format!("v{i}"))).collect();
    map.remove_by_key(&3);
    map.remove_by_value("v0");
    map.remove_by_key(&9);
    assert_eq!(map.keys(), [1, 2, 4, 5, 6, 7, 8]);
    for key in map.keys() {
        assert_eq!(map.get_value(key), Some(&format!("v{key}")));
    }
    assert_consistent(&map);
}

#[test]
fn test_distinct_puts() {
    let pairs = (0..200u32).map(|i| (i * 7 % 211, i * 13 % 223)).collect_vec();
    let mut map = OrderedBiMap::new();
    for &(k, v) in &pairs {
        map.put(k, v);
    }
    assert_eq!(map.len(), pairs.len());
    for (k, v) in &pairs {
        assert_eq!(map.get_value(k), Some(v));
        assert_eq!(map.get_key(v), Some(k));
    }
    assert_consistent(&map);
}

#[test]
fn test_interleaved_operations_stay_consistent() {
    let mut map = OrderedBiMap::new();
    for i in 0..300u64 {
        let key = i * 31 % 50;
        let value = i * 17 % 40;
        match i % 5 {
            0 | 1 | 2 => {
                map.put(key, value);
            }
            3 => {
                map.remove_by_key(&key);
            }
            _ => {
                map.remove_by_value(&value);
            }
        }
        assert_consistent(&map);
    }
}

#[test]
fn test_inverse() {
    let map = hello_there();
    let mut inverse = map.inverse();
    assert_eq!(inverse.get_value(&1), Some(&"Hello"));
    assert_eq!(inverse.get_value(&2), Some(&"there!"));
    assert_eq!(inverse.keys(), [1, 2]);

    inverse.remove_by_key(&1);
    assert_eq!(inverse.len(), 1);
    assert_eq!(map.len(), 2);
}

#[test]
fn test_double_inverse_is_identity() {
    let mut map: OrderedBiMap<i32, char> = "bimap".chars().zip(0..).map(|(c, i)| (i, c)).collect();
    map.remove_by_key(&1);
    assert_eq!(map.inverse().inverse(), map);
    assert_consistent(&map.inverse());
}

#[test]
fn test_equality_is_order_sensitive() {
    let mut reordered = OrderedBiMap::new();
    reordered.put("there!", 2).put("Hello", 1);
    assert_ne!(hello_there(), reordered);

    let mut other = hello_there();
    other.put("extra", 3);
    assert_ne!(hello_there(), other);
    other.remove_by_key("extra");
    assert_eq!(hello_there(), other);
}

#[test]
fn test_put_all_other_wins() {
    let mut map = hello_there();
    let mut other = OrderedBiMap::new();
    other.put("there!", 20).put("new", 3);
    map.put_all(&other);
    assert_eq!(map.keys(), ["Hello", "there!", "new"]);
    assert_eq!(map.values(), [1, 20, 3]);
    assert_eq!(other.len(), 2);
    assert_consistent(&map);
}

#[test]
fn test_clear() {
    let mut map = hello_there();
    map.clear();
    assert!(map.is_empty());
    map.put("Hello", 2);
    assert_eq!(map.position_of_key("Hello"), Some(0));
}

#[test]
fn test_debug_format() {
    assert_eq!(format!("{:?}", hello_there()), r#"{"Hello": 1, "there!": 2}"#);
}
