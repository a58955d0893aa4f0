//! Iterators over the pairs of a map, in either direction.
//!
//! Type names are relative to the primary map: [`Keys`] always yields the
//! primary's keys, so the inverse's `values()` returns a [`Keys`].

use std::{iter::FusedIterator, slice, vec};

use crate::doublemap::Row;

macro_rules! row_iterator {
    ($(#[$meta:meta])* $name:ident, $item:ty, $project:expr) => {
        $(#[$meta])*
        pub struct $name<'a, K, V> {
            rows: slice::Iter<'a, Row<K, V>>,
        }

        impl<'a, K, V> $name<'a, K, V> {
            pub(crate) fn new(rows: &'a [Row<K, V>]) -> Self {
                Self { rows: rows.iter() }
            }
        }

        impl<'a, K, V> Iterator for $name<'a, K, V> {
            type Item = $item;

            fn next(&mut self) -> Option<Self::Item> {
                self.rows.next().map($project)
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                self.rows.size_hint()
            }
        }

        impl<'a, K, V> DoubleEndedIterator for $name<'a, K, V> {
            fn next_back(&mut self) -> Option<Self::Item> {
                self.rows.next_back().map($project)
            }
        }

        impl<K, V> ExactSizeIterator for $name<'_, K, V> {}

        impl<K, V> FusedIterator for $name<'_, K, V> {}

        impl<K, V> Clone for $name<'_, K, V> {
            fn clone(&self) -> Self {
                Self {
                    rows: self.rows.clone(),
                }
            }
        }
    };
}

row_iterator!(
    /// Borrowed `(key, value)` pairs of a map.
    Iter,
    (&'a K, &'a V),
    Row::pair
);

row_iterator!(
    /// Borrowed `(value, key)` pairs, the entries of an inverse map.
    InverseIter,
    (&'a V, &'a K),
    Row::flipped
);

row_iterator!(
    /// The primary map's keys.
    Keys,
    &'a K,
    |row: &'a Row<K, V>| &row.left
);

row_iterator!(
    /// The primary map's values.
    Values,
    &'a V,
    |row: &'a Row<K, V>| &row.right
);

/// Owned `(key, value)` pairs, consuming the map.
pub struct IntoIter<K, V> {
    rows: vec::IntoIter<Row<K, V>>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(rows: Vec<Row<K, V>>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(Row::into_pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.rows.next_back().map(Row::into_pair)
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
