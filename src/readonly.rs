use std::fmt;

use crate::{
    bijection::{Bijection, BijectionMut, Paired},
    error::Error,
};

/// A borrowed, query-only view of a map or of its inverse.
///
/// This is a view, not a snapshot: it answers every query from the map it
/// borrows. Mutations through [`BijectionMut`] always fail with
/// [`Error::Unsupported`] and never reach the map.
pub struct ReadOnly<'a, M: ?Sized> {
    map: &'a M,
}

impl<'a, M: ?Sized> ReadOnly<'a, M> {
    pub fn new(map: &'a M) -> Self {
        Self { map }
    }

    /// The map behind this view.
    pub fn get_ref(&self) -> &'a M {
        self.map
    }
}

impl<'a, M: Paired> ReadOnly<'a, M> {
    /// Read-only view of the wrapped map's inverse.
    pub fn inverse(&self) -> ReadOnly<'a, M::Inverse> {
        ReadOnly::new(self.map.inverse())
    }
}

impl<M: ?Sized> Clone for ReadOnly<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: ?Sized> Copy for ReadOnly<'_, M> {}

impl<M: fmt::Debug + ?Sized> fmt::Debug for ReadOnly<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.map, f)
    }
}

impl<M: Bijection + ?Sized> Bijection for ReadOnly<'_, M> {
    type Key = M::Key;
    type Value = M::Value;
    type KeyComparer = M::KeyComparer;
    type ValueComparer = M::ValueComparer;

    fn len(&self) -> usize {
        self.map.len()
    }

    fn get(&self, key: &M::Key) -> Option<&M::Value> {
        self.map.get(key)
    }

    fn lookup(&self, key: &M::Key) -> Result<&M::Value, Error> {
        self.map.lookup(key)
    }

    fn contains_key(&self, key: &M::Key) -> bool {
        self.map.contains_key(key)
    }

    fn contains_value(&self, value: &M::Value) -> bool {
        self.map.contains_value(value)
    }

    fn keys(&self) -> impl Iterator<Item = &M::Key> {
        self.map.keys()
    }

    fn values(&self) -> impl Iterator<Item = &M::Value> {
        self.map.values()
    }

    fn iter(&self) -> impl Iterator<Item = (&M::Key, &M::Value)> {
        self.map.iter()
    }

    fn key_comparer(&self) -> &M::KeyComparer {
        self.map.key_comparer()
    }

    fn value_comparer(&self) -> &M::ValueComparer {
        self.map.value_comparer()
    }
}

impl<M: Bijection + ?Sized> BijectionMut for ReadOnly<'_, M> {
    fn insert(&mut self, _key: M::Key, _value: M::Value) -> Result<(), Error> {
        Err(Error::Unsupported { operation: "insert" })
    }

    fn try_insert(&mut self, _key: M::Key, _value: M::Value) -> Result<bool, Error> {
        Err(Error::Unsupported {
            operation: "try_insert",
        })
    }

    fn set(&mut self, _key: M::Key, _value: M::Value) -> Result<Option<M::Value>, Error> {
        Err(Error::Unsupported { operation: "set" })
    }

    fn remove(&mut self, _key: &M::Key) -> Result<Option<M::Value>, Error> {
        Err(Error::Unsupported { operation: "remove" })
    }

    fn clear(&mut self) -> Result<(), Error> {
        Err(Error::Unsupported { operation: "clear" })
    }
}
