use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt,
    hash::{BuildHasher, Hash},
    ops::Index,
};

use hashbrown::DefaultHashBuilder;
use ref_cast::{ref_cast_custom, RefCastCustom};

use crate::{
    comparer::{Comparer, DefaultComparer},
    doublemap::{Conflict, DoubleMap},
    error::Error,
    iter::{IntoIter, InverseIter, Iter, Keys, Values},
    readonly::ReadOnly,
};

/// A map in which keys and values are both unique.
///
/// Every pair is stored once and indexed by key and by value, so lookups in
/// either direction take constant expected time. The value→key direction is
/// [`Inverse`], reached through [`inverse`](Self::inverse); it is the same
/// storage seen from the other side, so `map.inverse().inverse()` is `map`
/// itself.
///
/// Uniqueness on each side is decided by a [`Comparer`]; both default to the
/// natural [`Eq`] + [`Hash`] of the type.
///
/// ```
/// use bidimap::BiMap;
///
/// let mut map = BiMap::new();
/// map.insert('a', 1).unwrap();
/// map.insert('b', 2).unwrap();
///
/// assert_eq!(map.get(&'a'), Some(&1));
/// assert_eq!(map.inverse().get(&2), Some(&'b'));
/// assert!(map.insert('c', 1).is_err());
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct BiMap<K, V, CK = DefaultComparer, CV = DefaultComparer, S = DefaultHashBuilder> {
    table: DoubleMap<K, V, CK, CV, S>,
}

/// The value→key direction of a [`BiMap`].
///
/// Only reachable by reference through [`BiMap::inverse`] and
/// [`BiMap::inverse_mut`]. Its keys are the map's values and its comparers are
/// the map's comparers swapped. Mutations through it are mutations of the map.
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct Inverse<K, V, CK = DefaultComparer, CV = DefaultComparer, S = DefaultHashBuilder> {
    table: DoubleMap<K, V, CK, CV, S>,
}

impl<K, V> BiMap<K, V> {
    pub fn new() -> Self {
        Self::with_comparers(DefaultComparer, DefaultComparer)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparers(capacity, DefaultComparer, DefaultComparer)
    }

    /// Like [`with_capacity`](Self::with_capacity), but reports an allocation
    /// that cannot be satisfied instead of aborting.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        let mut map = Self::new();
        map.table.try_reserve(capacity)?;
        Ok(map)
    }
}

impl<K, V> BiMap<K, V>
where
    K: Hash + Eq,
    V: Hash + Eq,
{
    /// Builds a map from pairs.
    ///
    /// Fails with [`Error::DuplicateKey`] or [`Error::DuplicateValue`] on the
    /// first pair that repeats a key or a value; no pair is silently dropped.
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::try_from_pairs_with_comparers(pairs, DefaultComparer, DefaultComparer)
    }
}

impl<K, V, CK, CV> BiMap<K, V, CK, CV> {
    pub fn with_comparers(key_comparer: CK, value_comparer: CV) -> Self {
        Self::with_comparers_and_hasher(key_comparer, value_comparer, DefaultHashBuilder::default())
    }

    pub fn with_capacity_and_comparers(capacity: usize, key_comparer: CK, value_comparer: CV) -> Self {
        Self::with_capacity_comparers_and_hasher(
            capacity,
            key_comparer,
            value_comparer,
            DefaultHashBuilder::default(),
        )
    }
}

impl<K, V, CK, CV> BiMap<K, V, CK, CV>
where
    CK: Comparer<K>,
    CV: Comparer<V>,
{
    pub fn try_from_pairs_with_comparers<I>(
        pairs: I,
        key_comparer: CK,
        value_comparer: CV,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let table = DoubleMap::try_from_pairs(
            pairs,
            key_comparer,
            value_comparer,
            DefaultHashBuilder::default(),
        )
        .map_err(Conflict::forward)?;
        Ok(Self { table })
    }
}

impl<K, V, CK, CV, S> BiMap<K, V, CK, CV, S> {
    #[ref_cast_custom]
    pub(crate) fn from_table(table: &DoubleMap<K, V, CK, CV, S>) -> &Self;

    #[ref_cast_custom]
    pub(crate) fn from_table_mut(table: &mut DoubleMap<K, V, CK, CV, S>) -> &mut Self;

    pub fn with_comparers_and_hasher(key_comparer: CK, value_comparer: CV, hash_builder: S) -> Self {
        Self {
            table: DoubleMap::new(key_comparer, value_comparer, hash_builder),
        }
    }

    pub fn with_capacity_comparers_and_hasher(
        capacity: usize,
        key_comparer: CK,
        value_comparer: CV,
        hash_builder: S,
    ) -> Self {
        Self {
            table: DoubleMap::with_capacity(capacity, key_comparer, value_comparer, hash_builder),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Pairs in unspecified order.
    ///
    /// The borrow prevents the map from being mutated while iterating; call
    /// again to restart.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.table.rows())
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.table.rows())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.table.rows())
    }

    pub fn key_comparer(&self) -> &CK {
        self.table.left_comparer()
    }

    pub fn value_comparer(&self) -> &CV {
        self.table.right_comparer()
    }

    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    /// The value→key view of this map.
    pub fn inverse(&self) -> &Inverse<K, V, CK, CV, S> {
        Inverse::from_table(&self.table)
    }

    /// The value→key view of this map, allowing mutation keyed by value.
    pub fn inverse_mut(&mut self) -> &mut Inverse<K, V, CK, CV, S> {
        Inverse::from_table_mut(&mut self.table)
    }

    pub fn as_read_only(&self) -> ReadOnly<'_, Self> {
        ReadOnly::new(self)
    }

    /// Removes every pair from both directions.
    pub fn clear(&mut self) {
        self.table.clear()
    }
}

impl<K, V, CK, CV, S> BiMap<K, V, CK, CV, S>
where
    S: BuildHasher,
{
    /// Value paired with `key`, if any.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        CK: Comparer<Q>,
    {
        let row = self.table.find_left(key)?;
        Some(&self.table.row(row).right)
    }

    /// Like [`get`](Self::get), but a missing key is an [`Error::KeyNotFound`].
    pub fn lookup<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        CK: Comparer<Q>,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Key paired with `value`, if any.
    pub fn get_by_value<Q>(&self, value: &Q) -> Option<&K>
    where
        Q: ?Sized,
        V: Borrow<Q>,
        CV: Comparer<Q>,
    {
        self.inverse().get(value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        K: Borrow<Q>,
        CK: Comparer<Q>,
    {
        self.table.find_left(key).is_some()
    }

    pub fn contains_value<Q>(&self, value: &Q) -> bool
    where
        Q: ?Sized,
        V: Borrow<Q>,
        CV: Comparer<Q>,
    {
        self.inverse().contains_key(value)
    }

    /// True when `key` is paired with a value equal to `value`.
    pub fn contains_pair<Q, P>(&self, key: &Q, value: &P) -> bool
    where
        Q: ?Sized,
        P: ?Sized,
        K: Borrow<Q>,
        V: Borrow<P>,
        CK: Comparer<Q>,
        CV: Comparer<P>,
    {
        self.table.contains_pair(key, value)
    }

    /// Removes `key` and its value from both directions, returning the value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        CK: Comparer<Q>,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        CK: Comparer<Q>,
    {
        self.table.remove_by_left(key)
    }

    /// Removes the pair only if `key` is currently paired with `value`.
    pub fn remove_pair<Q, P>(&mut self, key: &Q, value: &P) -> bool
    where
        Q: ?Sized,
        P: ?Sized,
        K: Borrow<Q>,
        V: Borrow<P>,
        CK: Comparer<Q>,
        CV: Comparer<P>,
    {
        self.table.remove_pair(key, value).is_some()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional)
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.table.try_reserve(additional)
    }

    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to_fit()
    }
}

impl<K, V, CK, CV, S> BiMap<K, V, CK, CV, S>
where
    CK: Comparer<K>,
    CV: Comparer<V>,
    S: BuildHasher,
{
    /// Adds a new pair.
    ///
    /// Fails with [`Error::DuplicateKey`] if `key` is present and with
    /// [`Error::DuplicateValue`] if `value` is present; the map is unchanged
    /// on failure.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), Error> {
        self.table.try_insert(key, value).map_err(Conflict::forward)
    }

    /// Adds a new pair, returning `false` instead of failing when either side
    /// is already present.
    pub fn try_insert(&mut self, key: K, value: V) -> bool {
        self.table.try_insert(key, value).is_ok()
    }

    /// Pairs `key` with `value`, replacing the value `key` had.
    ///
    /// Returns the replaced value. Setting a key to a value equal to its
    /// current one changes nothing and returns `None`; so does setting a new
    /// key. Fails with [`Error::DuplicateValue`], leaving the map unchanged,
    /// when `value` already belongs to another key.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        self.table.assign_right(key, value).map_err(Conflict::forward)
    }
}

impl<K, V, CK, CV, S> Inverse<K, V, CK, CV, S> {
    #[ref_cast_custom]
    pub(crate) fn from_table(table: &DoubleMap<K, V, CK, CV, S>) -> &Self;

    #[ref_cast_custom]
    pub(crate) fn from_table_mut(table: &mut DoubleMap<K, V, CK, CV, S>) -> &mut Self;

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// `(value, key)` pairs of the primary map.
    pub fn iter(&self) -> InverseIter<'_, K, V> {
        InverseIter::new(self.table.rows())
    }

    /// The primary map's values.
    pub fn keys(&self) -> Values<'_, K, V> {
        Values::new(self.table.rows())
    }

    /// The primary map's keys.
    pub fn values(&self) -> Keys<'_, K, V> {
        Keys::new(self.table.rows())
    }

    /// The primary map's value comparer.
    pub fn key_comparer(&self) -> &CV {
        self.table.right_comparer()
    }

    /// The primary map's key comparer.
    pub fn value_comparer(&self) -> &CK {
        self.table.left_comparer()
    }

    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    /// The primary map.
    pub fn inverse(&self) -> &BiMap<K, V, CK, CV, S> {
        BiMap::from_table(&self.table)
    }

    pub fn inverse_mut(&mut self) -> &mut BiMap<K, V, CK, CV, S> {
        BiMap::from_table_mut(&mut self.table)
    }

    pub fn as_read_only(&self) -> ReadOnly<'_, Self> {
        ReadOnly::new(self)
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }
}

impl<K, V, CK, CV, S> Inverse<K, V, CK, CV, S>
where
    S: BuildHasher,
{
    /// Key of the primary map paired with `key` (one of its values).
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        Q: ?Sized,
        V: Borrow<Q>,
        CV: Comparer<Q>,
    {
        let row = self.table.find_right(key)?;
        Some(&self.table.row(row).left)
    }

    pub fn lookup<Q>(&self, key: &Q) -> Result<&K, Error>
    where
        Q: ?Sized,
        V: Borrow<Q>,
        CV: Comparer<Q>,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    pub fn get_by_value<Q>(&self, value: &Q) -> Option<&V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        CK: Comparer<Q>,
    {
        self.inverse().get(value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        V: Borrow<Q>,
        CV: Comparer<Q>,
    {
        self.table.find_right(key).is_some()
    }

    pub fn contains_value<Q>(&self, value: &Q) -> bool
    where
        Q: ?Sized,
        K: Borrow<Q>,
        CK: Comparer<Q>,
    {
        self.inverse().contains_key(value)
    }

    pub fn contains_pair<Q, P>(&self, key: &Q, value: &P) -> bool
    where
        Q: ?Sized,
        P: ?Sized,
        V: Borrow<Q>,
        K: Borrow<P>,
        CV: Comparer<Q>,
        CK: Comparer<P>,
    {
        self.table.contains_pair(value, key)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        Q: ?Sized,
        V: Borrow<Q>,
        CV: Comparer<Q>,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(V, K)>
    where
        Q: ?Sized,
        V: Borrow<Q>,
        CV: Comparer<Q>,
    {
        let (value, key) = self.table.remove_by_right(key)?;
        Some((key, value))
    }

    pub fn remove_pair<Q, P>(&mut self, key: &Q, value: &P) -> bool
    where
        Q: ?Sized,
        P: ?Sized,
        V: Borrow<Q>,
        K: Borrow<P>,
        CV: Comparer<Q>,
        CK: Comparer<P>,
    {
        self.table.remove_pair(value, key).is_some()
    }
}

impl<K, V, CK, CV, S> Inverse<K, V, CK, CV, S>
where
    CK: Comparer<K>,
    CV: Comparer<V>,
    S: BuildHasher,
{
    /// Adds the pair `(value, key)` to the primary map.
    ///
    /// Errors are reported from this side: a `key` already among the primary's
    /// values is a [`Error::DuplicateKey`].
    pub fn insert(&mut self, key: V, value: K) -> Result<(), Error> {
        self.table.try_insert(value, key).map_err(Conflict::backward)
    }

    pub fn try_insert(&mut self, key: V, value: K) -> bool {
        self.table.try_insert(value, key).is_ok()
    }

    /// Re-pairs `key` (a value of the primary map) with the primary key `value`.
    pub fn set(&mut self, key: V, value: K) -> Result<Option<K>, Error> {
        self.table.assign_left(key, value).map_err(Conflict::backward)
    }
}

impl<K, V, CK, CV, S> Default for BiMap<K, V, CK, CV, S>
where
    CK: Default,
    CV: Default,
    S: Default,
{
    fn default() -> Self {
        Self::with_comparers_and_hasher(CK::default(), CV::default(), S::default())
    }
}

impl<K, V, CK, CV, S> Clone for BiMap<K, V, CK, CV, S>
where
    K: Clone,
    V: Clone,
    CK: Clone,
    CV: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<K, V, CK, CV, S> fmt::Debug for BiMap<K, V, CK, CV, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, CK, CV, S> fmt::Debug for Inverse<K, V, CK, CV, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, CK, CV, S> PartialEq for BiMap<K, V, CK, CV, S>
where
    CK: Comparer<K>,
    CV: Comparer<V>,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.contains_pair(key, value))
    }
}

impl<K, V, CK, CV, S> Eq for BiMap<K, V, CK, CV, S>
where
    CK: Comparer<K>,
    CV: Comparer<V>,
    S: BuildHasher,
{
}

impl<K, V, CK, CV, S, Q> Index<&Q> for BiMap<K, V, CK, CV, S>
where
    Q: ?Sized,
    K: Borrow<Q>,
    CK: Comparer<Q>,
    S: BuildHasher,
{
    type Output = V;

    /// Panics if `key` is not present; see [`BiMap::lookup`].
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<K, V, CK, CV, S, Q> Index<&Q> for Inverse<K, V, CK, CV, S>
where
    Q: ?Sized,
    V: Borrow<Q>,
    CV: Comparer<Q>,
    S: BuildHasher,
{
    type Output = K;

    fn index(&self, key: &Q) -> &K {
        self.get(key).expect("key not found")
    }
}

impl<K, V, CK, CV, S> IntoIterator for BiMap<K, V, CK, CV, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.table.into_rows())
    }
}

impl<'a, K, V, CK, CV, S> IntoIterator for &'a BiMap<K, V, CK, CV, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, CK, CV, S> IntoIterator for &'a Inverse<K, V, CK, CV, S> {
    type Item = (&'a V, &'a K);
    type IntoIter = InverseIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, CK, CV, S, H> TryFrom<HashMap<K, V, H>> for BiMap<K, V, CK, CV, S>
where
    CK: Comparer<K> + Default,
    CV: Comparer<V> + Default,
    S: BuildHasher + Default,
{
    type Error = Error;

    /// Fails with [`Error::DuplicateValue`] when two keys share a value.
    fn try_from(source: HashMap<K, V, H>) -> Result<Self, Self::Error> {
        Self::try_from_iter(source)
    }
}

impl<K, V, CK, CV, S> TryFrom<Vec<(K, V)>> for BiMap<K, V, CK, CV, S>
where
    CK: Comparer<K> + Default,
    CV: Comparer<V> + Default,
    S: BuildHasher + Default,
{
    type Error = Error;

    fn try_from(source: Vec<(K, V)>) -> Result<Self, Self::Error> {
        Self::try_from_iter(source)
    }
}

impl<K, V, CK, CV, S, const N: usize> TryFrom<[(K, V); N]> for BiMap<K, V, CK, CV, S>
where
    CK: Comparer<K> + Default,
    CV: Comparer<V> + Default,
    S: BuildHasher + Default,
{
    type Error = Error;

    fn try_from(source: [(K, V); N]) -> Result<Self, Self::Error> {
        Self::try_from_iter(source)
    }
}

impl<K, V, CK, CV, S> BiMap<K, V, CK, CV, S>
where
    CK: Comparer<K> + Default,
    CV: Comparer<V> + Default,
    S: BuildHasher + Default,
{
    fn try_from_iter<I>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let table = DoubleMap::try_from_pairs(pairs, CK::default(), CV::default(), S::default())
            .map_err(Conflict::forward)?;
        Ok(Self { table })
    }
}
