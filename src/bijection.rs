//! Collection traits shared by both directions of a map and by read-only views.

use std::hash::BuildHasher;

use crate::{
    bimap::{BiMap, Inverse},
    comparer::Comparer,
    error::Error,
};

/// Query surface of a one-to-one map.
pub trait Bijection {
    type Key;
    type Value;
    type KeyComparer;
    type ValueComparer;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;

    /// Like [`get`](Self::get), but a missing key is an [`Error::KeyNotFound`].
    fn lookup(&self, key: &Self::Key) -> Result<&Self::Value, Error> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    fn contains_key(&self, key: &Self::Key) -> bool {
        self.get(key).is_some()
    }

    fn contains_value(&self, value: &Self::Value) -> bool;

    fn keys(&self) -> impl Iterator<Item = &Self::Key>;

    fn values(&self) -> impl Iterator<Item = &Self::Value>;

    fn iter(&self) -> impl Iterator<Item = (&Self::Key, &Self::Value)>;

    fn key_comparer(&self) -> &Self::KeyComparer;

    fn value_comparer(&self) -> &Self::ValueComparer;
}

/// Mutation surface of a one-to-one map.
///
/// Every method is fallible so that views can refuse with
/// [`Error::Unsupported`].
pub trait BijectionMut: Bijection {
    fn insert(&mut self, key: Self::Key, value: Self::Value) -> Result<(), Error>;

    /// `Ok(false)` when either side is already present.
    fn try_insert(&mut self, key: Self::Key, value: Self::Value) -> Result<bool, Error>;

    fn set(&mut self, key: Self::Key, value: Self::Value) -> Result<Option<Self::Value>, Error>;

    fn remove(&mut self, key: &Self::Key) -> Result<Option<Self::Value>, Error>;

    fn clear(&mut self) -> Result<(), Error>;
}

/// A map permanently paired with its value→key counterpart.
///
/// `map.inverse().inverse()` is `map`.
pub trait Paired: Bijection + Sized {
    type Inverse: Paired<Inverse = Self, Key = Self::Value, Value = Self::Key>;

    fn inverse(&self) -> &Self::Inverse;
}

impl<K, V, CK, CV, S> Bijection for BiMap<K, V, CK, CV, S>
where
    CK: Comparer<K>,
    CV: Comparer<V>,
    S: BuildHasher,
{
    type Key = K;
    type Value = V;
    type KeyComparer = CK;
    type ValueComparer = CV;

    fn len(&self) -> usize {
        BiMap::len(self)
    }

    fn get(&self, key: &K) -> Option<&V> {
        BiMap::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        BiMap::contains_key(self, key)
    }

    fn contains_value(&self, value: &V) -> bool {
        BiMap::contains_value(self, value)
    }

    fn keys(&self) -> impl Iterator<Item = &K> {
        BiMap::keys(self)
    }

    fn values(&self) -> impl Iterator<Item = &V> {
        BiMap::values(self)
    }

    fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        BiMap::iter(self)
    }

    fn key_comparer(&self) -> &CK {
        BiMap::key_comparer(self)
    }

    fn value_comparer(&self) -> &CV {
        BiMap::value_comparer(self)
    }
}

impl<K, V, CK, CV, S> BijectionMut for BiMap<K, V, CK, CV, S>
where
    CK: Comparer<K>,
    CV: Comparer<V>,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) -> Result<(), Error> {
        BiMap::insert(self, key, value)
    }

    fn try_insert(&mut self, key: K, value: V) -> Result<bool, Error> {
        Ok(BiMap::try_insert(self, key, value))
    }

    fn set(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        BiMap::set(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Result<Option<V>, Error> {
        Ok(BiMap::remove(self, key))
    }

    fn clear(&mut self) -> Result<(), Error> {
        BiMap::clear(self);
        Ok(())
    }
}

impl<K, V, CK, CV, S> Paired for BiMap<K, V, CK, CV, S>
where
    CK: Comparer<K>,
    CV: Comparer<V>,
    S: BuildHasher,
{
    type Inverse = Inverse<K, V, CK, CV, S>;

    fn inverse(&self) -> &Self::Inverse {
        BiMap::inverse(self)
    }
}

impl<K, V, CK, CV, S> Bijection for Inverse<K, V, CK, CV, S>
where
    CK: Comparer<K>,
    CV: Comparer<V>,
    S: BuildHasher,
{
    type Key = V;
    type Value = K;
    type KeyComparer = CV;
    type ValueComparer = CK;

    fn len(&self) -> usize {
        Inverse::len(self)
    }

    fn get(&self, key: &V) -> Option<&K> {
        Inverse::get(self, key)
    }

    fn contains_key(&self, key: &V) -> bool {
        Inverse::contains_key(self, key)
    }

    fn contains_value(&self, value: &K) -> bool {
        Inverse::contains_value(self, value)
    }

    fn keys(&self) -> impl Iterator<Item = &V> {
        Inverse::keys(self)
    }

    fn values(&self) -> impl Iterator<Item = &K> {
        Inverse::values(self)
    }

    fn iter(&self) -> impl Iterator<Item = (&V, &K)> {
        Inverse::iter(self)
    }

    fn key_comparer(&self) -> &CV {
        Inverse::key_comparer(self)
    }

    fn value_comparer(&self) -> &CK {
        Inverse::value_comparer(self)
    }
}

impl<K, V, CK, CV, S> BijectionMut for Inverse<K, V, CK, CV, S>
where
    CK: Comparer<K>,
    CV: Comparer<V>,
    S: BuildHasher,
{
    fn insert(&mut self, key: V, value: K) -> Result<(), Error> {
        Inverse::insert(self, key, value)
    }

    fn try_insert(&mut self, key: V, value: K) -> Result<bool, Error> {
        Ok(Inverse::try_insert(self, key, value))
    }

    fn set(&mut self, key: V, value: K) -> Result<Option<K>, Error> {
        Inverse::set(self, key, value)
    }

    fn remove(&mut self, key: &V) -> Result<Option<K>, Error> {
        Ok(Inverse::remove(self, key))
    }

    fn clear(&mut self) -> Result<(), Error> {
        Inverse::clear(self);
        Ok(())
    }
}

impl<K, V, CK, CV, S> Paired for Inverse<K, V, CK, CV, S>
where
    CK: Comparer<K>,
    CV: Comparer<V>,
    S: BuildHasher,
{
    type Inverse = BiMap<K, V, CK, CV, S>;

    fn inverse(&self) -> &Self::Inverse {
        Inverse::inverse(self)
    }
}
