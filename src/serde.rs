use std::{fmt, hash::BuildHasher, marker::PhantomData};

use ::serde::{
    de::{self, MapAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{bimap::BiMap, comparer::Comparer};

/// Upper bound on preallocation driven by an untrusted size hint.
const MAX_PREALLOCATED_PAIRS: usize = 4096;

impl<K, V, CK, CV, S> Serialize for BiMap<K, V, CK, CV, S>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_map(self.iter())
    }
}

struct BiMapVisitor<K, V, CK, CV, S> {
    marker: PhantomData<fn() -> BiMap<K, V, CK, CV, S>>,
}

impl<'de, K, V, CK, CV, S> Visitor<'de> for BiMapVisitor<K, V, CK, CV, S>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    CK: Comparer<K> + Default,
    CV: Comparer<V> + Default,
    S: BuildHasher + Default,
{
    type Value = BiMap<K, V, CK, CV, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with unique keys and unique values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let capacity = access.size_hint().unwrap_or(0).min(MAX_PREALLOCATED_PAIRS);
        let mut map = BiMap::with_capacity_comparers_and_hasher(
            capacity,
            CK::default(),
            CV::default(),
            S::default(),
        );
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value).map_err(de::Error::custom)?;
        }

        Ok(map)
    }
}

/// Rejects input in which two keys share a value, like
/// [`BiMap::try_from_pairs`].
impl<'de, K, V, CK, CV, S> Deserialize<'de> for BiMap<K, V, CK, CV, S>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    CK: Comparer<K> + Default,
    CV: Comparer<V> + Default,
    S: BuildHasher + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BiMapVisitor {
            marker: PhantomData,
        })
    }
}
