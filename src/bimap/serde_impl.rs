use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::OrderedBiMap;
use crate::BiMapError;

// Serialized as a sequence of [key, value] pairs in storage order.
impl<K: Serialize, V: Serialize> Serialize for OrderedBiMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for pair in self {
            seq.serialize_element(&pair)?;
        }
        seq.end()
    }
}

struct OrderedBiMapVisitor<K, V>(PhantomData<fn() -> OrderedBiMap<K, V>>);

impl<'de, K, V> Visitor<'de> for OrderedBiMapVisitor<K, V>
where
    K: Deserialize<'de> + Eq + Hash + Clone,
    V: Deserialize<'de> + Eq + Hash + Clone,
{
    type Value = OrderedBiMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of [key, value] pairs")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        // Size hints come from the input; cap the preallocation.
        let mut map = OrderedBiMap::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some((key, value)) = seq.next_element::<(K, V)>()? {
            let position = map.len();
            if map.contains_key(&key) {
                return Err(de::Error::custom(BiMapError::DuplicateKey(position)));
            }
            if map.contains_value(&value) {
                return Err(de::Error::custom(BiMapError::DuplicateValue(position)));
            }
            map.push(key, value);
        }
        Ok(map)
    }
}

impl<'de, K, V> Deserialize<'de> for OrderedBiMap<K, V>
where
    K: Deserialize<'de> + Eq + Hash + Clone,
    V: Deserialize<'de> + Eq + Hash + Clone,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(OrderedBiMapVisitor(PhantomData))
    }
}

#[test]
fn test_serialize_as_pair_sequence() {
    let mut map = OrderedBiMap::new();
    map.put("Hello".to_string(), 1).put("there!".to_string(), 2);
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"[["Hello",1],["there!",2]]"#);

    let back: OrderedBiMap<String, i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, map);
    assert_eq!(back.get_key(&2).map(String::as_str), Some("there!"));
}

#[test]
fn test_deserialize_rejects_non_bijection() {
    let err = serde_json::from_str::<OrderedBiMap<String, i32>>(r#"[["a",1],["a",2]]"#)
        .unwrap_err();
    assert!(err.to_string().contains("duplicate key at position 1"));

    let err = serde_json::from_str::<OrderedBiMap<String, i32>>(r#"[["a",1],["b",3],["c",1]]"#)
        .unwrap_err();
    assert!(err.to_string().contains("duplicate value at position 2"));
}

#[test]
fn test_deserialize_empty() {
    let map: OrderedBiMap<u8, u8> = serde_json::from_str("[]").unwrap();
    assert!(map.is_empty());
}
