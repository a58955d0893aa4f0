use std::{
    borrow::Borrow,
    hash::{BuildHasher, Hasher},
    mem,
};

use hashbrown::HashTable;

use crate::{comparer::Comparer, error::Error};

/// One stored pair together with the hash of each side.
#[derive(Clone, Debug)]
pub(crate) struct Row<L, R> {
    pub(crate) left: L,
    pub(crate) right: R,
    left_hash: u64,
    right_hash: u64,
}

impl<L, R> Row<L, R> {
    pub(crate) fn pair(&self) -> (&L, &R) {
        (&self.left, &self.right)
    }

    pub(crate) fn flipped(&self) -> (&R, &L) {
        (&self.right, &self.left)
    }

    pub(crate) fn into_pair(self) -> (L, R) {
        (self.left, self.right)
    }
}

/// Side of a pair that collides with an element already stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Conflict {
    Left,
    Right,
}

impl Conflict {
    /// Error as seen by a map keyed by the left side.
    pub(crate) fn forward(self) -> Error {
        match self {
            Conflict::Left => Error::DuplicateKey,
            Conflict::Right => Error::DuplicateValue,
        }
    }

    /// Error as seen by a map keyed by the right side.
    pub(crate) fn backward(self) -> Error {
        match self {
            Conflict::Left => Error::DuplicateValue,
            Conflict::Right => Error::DuplicateKey,
        }
    }
}

/// Pairs stored once and indexed from both sides.
///
/// `left` and `right` hold row numbers into `rows`. Every row is referenced by
/// exactly one slot in each table, so both tables always have `rows.len()`
/// entries. All methods that can fail check both tables before writing.
#[derive(Clone)]
pub struct DoubleMap<L, R, CL, CR, S> {
    rows: Vec<Row<L, R>>,
    left: HashTable<usize>,
    right: HashTable<usize>,
    left_comparer: CL,
    right_comparer: CR,
    hash_builder: S,
}

fn make_hash<T, C, S>(hash_builder: &S, comparer: &C, value: &T) -> u64
where
    T: ?Sized,
    C: Comparer<T>,
    S: BuildHasher,
{
    let mut state = hash_builder.build_hasher();
    comparer.hash_value(value, &mut state);
    state.finish()
}

fn erase(table: &mut HashTable<usize>, hash: u64, row: usize) {
    if let Ok(slot) = table.find_entry(hash, |&slot| slot == row) {
        slot.remove();
    }
}

fn repoint(table: &mut HashTable<usize>, hash: u64, from: usize, to: usize) {
    if let Some(slot) = table.find_mut(hash, |&slot| slot == from) {
        *slot = to;
    }
}

impl<L, R, CL, CR, S> DoubleMap<L, R, CL, CR, S> {
    pub(crate) fn new(left_comparer: CL, right_comparer: CR, hash_builder: S) -> Self {
        Self {
            rows: Vec::new(),
            left: HashTable::new(),
            right: HashTable::new(),
            left_comparer,
            right_comparer,
            hash_builder,
        }
    }

    pub(crate) fn with_capacity(
        capacity: usize,
        left_comparer: CL,
        right_comparer: CR,
        hash_builder: S,
    ) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            left: HashTable::with_capacity(capacity),
            right: HashTable::with_capacity(capacity),
            left_comparer,
            right_comparer,
            hash_builder,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    /// Number of pairs that fit without reallocating any of the three stores.
    pub(crate) fn capacity(&self) -> usize {
        self.rows
            .capacity()
            .min(self.left.capacity())
            .min(self.right.capacity())
    }

    pub(crate) fn rows(&self) -> &[Row<L, R>] {
        &self.rows
    }

    pub(crate) fn into_rows(self) -> Vec<Row<L, R>> {
        self.rows
    }

    pub(crate) fn row(&self, row: usize) -> &Row<L, R> {
        &self.rows[row]
    }

    pub(crate) fn left_comparer(&self) -> &CL {
        &self.left_comparer
    }

    pub(crate) fn right_comparer(&self) -> &CR {
        &self.right_comparer
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hash_builder
    }

    pub(crate) fn clear(&mut self) {
        log::trace!("clearing {} pairs", self.rows.len());
        self.left.clear();
        self.right.clear();
        self.rows.clear();
    }
}

impl<L, R, CL, CR, S> DoubleMap<L, R, CL, CR, S>
where
    S: BuildHasher,
{
    fn locate_left<Q>(&self, hash: u64, left: &Q) -> Option<usize>
    where
        Q: ?Sized,
        L: Borrow<Q>,
        CL: Comparer<Q>,
    {
        let rows = &self.rows;
        let comparer = &self.left_comparer;
        self.left
            .find(hash, |&slot| {
                let row = &rows[slot];
                row.left_hash == hash && comparer.equals(row.left.borrow(), left)
            })
            .copied()
    }

    fn locate_right<Q>(&self, hash: u64, right: &Q) -> Option<usize>
    where
        Q: ?Sized,
        R: Borrow<Q>,
        CR: Comparer<Q>,
    {
        let rows = &self.rows;
        let comparer = &self.right_comparer;
        self.right
            .find(hash, |&slot| {
                let row = &rows[slot];
                row.right_hash == hash && comparer.equals(row.right.borrow(), right)
            })
            .copied()
    }

    /// Row holding `left`, if any.
    pub(crate) fn find_left<Q>(&self, left: &Q) -> Option<usize>
    where
        Q: ?Sized,
        L: Borrow<Q>,
        CL: Comparer<Q>,
    {
        if self.rows.is_empty() {
            return None;
        }
        let hash = make_hash(&self.hash_builder, &self.left_comparer, left);
        self.locate_left(hash, left)
    }

    /// Row holding `right`, if any.
    pub(crate) fn find_right<Q>(&self, right: &Q) -> Option<usize>
    where
        Q: ?Sized,
        R: Borrow<Q>,
        CR: Comparer<Q>,
    {
        if self.rows.is_empty() {
            return None;
        }
        let hash = make_hash(&self.hash_builder, &self.right_comparer, right);
        self.locate_right(hash, right)
    }

    /// True when `left` is stored and paired with something equal to `right`.
    pub(crate) fn contains_pair<QL, QR>(&self, left: &QL, right: &QR) -> bool
    where
        QL: ?Sized,
        QR: ?Sized,
        L: Borrow<QL>,
        R: Borrow<QR>,
        CL: Comparer<QL>,
        CR: Comparer<QR>,
    {
        self.find_left(left).is_some_and(|row| {
            self.right_comparer
                .equals(self.rows[row].right.borrow(), right)
        })
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        let rows = &self.rows;
        self.left.reserve(additional, |&slot| rows[slot].left_hash);
        self.right.reserve(additional, |&slot| rows[slot].right_hash);
        self.rows.reserve(additional);
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        let rows = &self.rows;
        self.left
            .try_reserve(additional, |&slot| rows[slot].left_hash)
            .map_err(|_| Error::CapacityOverflow)?;
        self.right
            .try_reserve(additional, |&slot| rows[slot].right_hash)
            .map_err(|_| Error::CapacityOverflow)?;
        self.rows
            .try_reserve(additional)
            .map_err(|_| Error::CapacityOverflow)
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        let rows = &self.rows;
        self.left.shrink_to_fit(|&slot| rows[slot].left_hash);
        self.right.shrink_to_fit(|&slot| rows[slot].right_hash);
        self.rows.shrink_to_fit();
    }

    /// Drops the row from both tables and from storage.
    ///
    /// The last row takes the freed position, so its slots are repointed.
    fn remove_row(&mut self, row: usize) -> (L, R) {
        let (left_hash, right_hash) = (self.rows[row].left_hash, self.rows[row].right_hash);
        erase(&mut self.left, left_hash, row);
        erase(&mut self.right, right_hash, row);

        let removed = self.rows.swap_remove(row);
        let last = self.rows.len();
        if row != last {
            let moved = &self.rows[row];
            repoint(&mut self.left, moved.left_hash, last, row);
            repoint(&mut self.right, moved.right_hash, last, row);
        }

        removed.into_pair()
    }

    pub(crate) fn remove_by_left<Q>(&mut self, left: &Q) -> Option<(L, R)>
    where
        Q: ?Sized,
        L: Borrow<Q>,
        CL: Comparer<Q>,
    {
        let row = self.find_left(left)?;
        Some(self.remove_row(row))
    }

    pub(crate) fn remove_by_right<Q>(&mut self, right: &Q) -> Option<(L, R)>
    where
        Q: ?Sized,
        R: Borrow<Q>,
        CR: Comparer<Q>,
    {
        let row = self.find_right(right)?;
        Some(self.remove_row(row))
    }

    /// Removes the pair only if `left` is currently paired with `right`.
    pub(crate) fn remove_pair<QL, QR>(&mut self, left: &QL, right: &QR) -> Option<(L, R)>
    where
        QL: ?Sized,
        QR: ?Sized,
        L: Borrow<QL>,
        R: Borrow<QR>,
        CL: Comparer<QL>,
        CR: Comparer<QR>,
    {
        let row = self.find_left(left)?;
        if !self
            .right_comparer
            .equals(self.rows[row].right.borrow(), right)
        {
            return None;
        }
        Some(self.remove_row(row))
    }
}

impl<L, R, CL, CR, S> DoubleMap<L, R, CL, CR, S>
where
    CL: Comparer<L>,
    CR: Comparer<R>,
    S: BuildHasher,
{
    fn hash_left(&self, left: &L) -> u64 {
        make_hash(&self.hash_builder, &self.left_comparer, left)
    }

    fn hash_right(&self, right: &R) -> u64 {
        make_hash(&self.hash_builder, &self.right_comparer, right)
    }

    /// Appends a pair neither side of which is stored yet.
    fn push(&mut self, left: L, right: R, left_hash: u64, right_hash: u64) {
        let row = self.rows.len();
        self.rows.push(Row {
            left,
            right,
            left_hash,
            right_hash,
        });
        let rows = &self.rows;
        self.left
            .insert_unique(left_hash, row, |&slot| rows[slot].left_hash);
        self.right
            .insert_unique(right_hash, row, |&slot| rows[slot].right_hash);
    }

    /// Inserts a new pair, refusing it when either side is already stored.
    pub(crate) fn try_insert(&mut self, left: L, right: R) -> Result<(), Conflict> {
        let left_hash = self.hash_left(&left);
        if self.locate_left(left_hash, &left).is_some() {
            return Err(Conflict::Left);
        }
        let right_hash = self.hash_right(&right);
        if self.locate_right(right_hash, &right).is_some() {
            return Err(Conflict::Right);
        }

        self.push(left, right, left_hash, right_hash);
        Ok(())
    }

    /// Pairs `left` with `right`, replacing whatever `left` was paired with.
    ///
    /// Returns the displaced right element. Nothing happens when `left` is
    /// already paired with an equal `right`. Fails when `right` belongs to a
    /// different left element.
    pub(crate) fn assign_right(&mut self, left: L, right: R) -> Result<Option<R>, Conflict> {
        let left_hash = self.hash_left(&left);
        let right_hash = self.hash_right(&right);

        let Some(row) = self.locate_left(left_hash, &left) else {
            if self.locate_right(right_hash, &right).is_some() {
                return Err(Conflict::Right);
            }
            self.push(left, right, left_hash, right_hash);
            return Ok(None);
        };

        if self.right_comparer.equals(&self.rows[row].right, &right) {
            return Ok(None);
        }
        if self.locate_right(right_hash, &right).is_some() {
            return Err(Conflict::Right);
        }

        let old_hash = self.rows[row].right_hash;
        erase(&mut self.right, old_hash, row);
        let entry = &mut self.rows[row];
        let old = mem::replace(&mut entry.right, right);
        entry.right_hash = right_hash;
        let rows = &self.rows;
        self.right
            .insert_unique(right_hash, row, |&slot| rows[slot].right_hash);

        Ok(Some(old))
    }

    /// Mirror of [`assign_right`](Self::assign_right) keyed by the right side.
    pub(crate) fn assign_left(&mut self, right: R, left: L) -> Result<Option<L>, Conflict> {
        let left_hash = self.hash_left(&left);
        let right_hash = self.hash_right(&right);

        let Some(row) = self.locate_right(right_hash, &right) else {
            if self.locate_left(left_hash, &left).is_some() {
                return Err(Conflict::Left);
            }
            self.push(left, right, left_hash, right_hash);
            return Ok(None);
        };

        if self.left_comparer.equals(&self.rows[row].left, &left) {
            return Ok(None);
        }
        if self.locate_left(left_hash, &left).is_some() {
            return Err(Conflict::Left);
        }

        let old_hash = self.rows[row].left_hash;
        erase(&mut self.left, old_hash, row);
        let entry = &mut self.rows[row];
        let old = mem::replace(&mut entry.left, left);
        entry.left_hash = left_hash;
        let rows = &self.rows;
        self.left
            .insert_unique(left_hash, row, |&slot| rows[slot].left_hash);

        Ok(Some(old))
    }

    /// Builds a map from pairs, failing on the first repeated element.
    pub(crate) fn try_from_pairs<I>(
        pairs: I,
        left_comparer: CL,
        right_comparer: CR,
        hash_builder: S,
    ) -> Result<Self, Conflict>
    where
        I: IntoIterator<Item = (L, R)>,
    {
        let pairs = pairs.into_iter();
        let mut result = Self::with_capacity(
            pairs.size_hint().0,
            left_comparer,
            right_comparer,
            hash_builder,
        );
        for (left, right) in pairs {
            result.try_insert(left, right)?;
        }

        log::trace!("built bijective map from {} pairs", result.len());
        Ok(result)
    }
}

#[cfg(test)]
impl<L, R, CL, CR, S> DoubleMap<L, R, CL, CR, S>
where
    CL: Comparer<L>,
    CR: Comparer<R>,
    S: BuildHasher,
{
    /// Panics unless every row is reachable from both tables and nothing else is.
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.left.len(), self.rows.len());
        assert_eq!(self.right.len(), self.rows.len());
        for (index, row) in self.rows.iter().enumerate() {
            assert_eq!(row.left_hash, self.hash_left(&row.left));
            assert_eq!(row.right_hash, self.hash_right(&row.right));
            assert_eq!(self.find_left(&row.left), Some(index));
            assert_eq!(self.find_right(&row.right), Some(index));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use hashbrown::DefaultHashBuilder;
    use proptest::prelude::*;

    use super::{Conflict, DoubleMap};
    use crate::comparer::{tests::IgnoreAsciiCase, DefaultComparer};

    type Plain = DoubleMap<u8, u8, DefaultComparer, DefaultComparer, DefaultHashBuilder>;

    fn plain() -> Plain {
        DoubleMap::new(DefaultComparer, DefaultComparer, DefaultHashBuilder::default())
    }

    #[test]
    fn inserted_pair_is_found_from_both_sides() {
        let mut map = plain();
        map.try_insert(1, 10).unwrap();
        map.try_insert(2, 20).unwrap();

        assert_eq!(map.find_left(&2), Some(1));
        assert_eq!(map.find_right(&10), Some(0));
        assert_eq!(map.find_left(&10), None);
        map.assert_consistent();
    }

    #[test]
    fn conflicts_name_the_colliding_side() {
        let mut map = plain();
        map.try_insert(1, 10).unwrap();

        assert_eq!(map.try_insert(1, 11), Err(Conflict::Left));
        assert_eq!(map.try_insert(2, 10), Err(Conflict::Right));
        assert_eq!(map.len(), 1);
        map.assert_consistent();
    }

    #[test]
    fn removing_a_middle_row_repoints_the_last_one() {
        let mut map = plain();
        for i in 0..4 {
            map.try_insert(i, i + 100).unwrap();
        }

        assert_eq!(map.remove_by_left(&1), Some((1, 101)));
        assert_eq!(map.find_left(&3), Some(1));
        assert_eq!(map.find_right(&103), Some(1));
        map.assert_consistent();

        assert_eq!(map.remove_by_right(&103), Some((3, 103)));
        assert_eq!(map.remove_by_right(&103), None);
        map.assert_consistent();
    }

    #[test]
    fn assign_replaces_the_stale_inverse_slot() {
        let mut map = plain();
        map.try_insert(1, 10).unwrap();

        assert_eq!(map.assign_right(1, 11), Ok(Some(10)));
        assert_eq!(map.find_right(&10), None);
        assert_eq!(map.find_right(&11), Some(0));

        assert_eq!(map.assign_left(11, 2), Ok(Some(1)));
        assert_eq!(map.find_left(&1), None);
        assert_eq!(map.find_left(&2), Some(0));
        map.assert_consistent();
    }

    #[test]
    fn remove_pair_requires_a_matching_partner() {
        let mut map = plain();
        map.try_insert(1, 10).unwrap();

        assert_eq!(map.remove_pair(&1, &11), None);
        assert!(map.contains_pair(&1, &10));
        assert_eq!(map.remove_pair(&1, &10), Some((1, 10)));
        assert!(!map.contains_pair(&1, &10));
    }

    #[test]
    fn custom_comparer_decides_uniqueness() {
        let mut map: DoubleMap<String, u8, IgnoreAsciiCase, DefaultComparer, _> =
            DoubleMap::new(IgnoreAsciiCase, DefaultComparer, DefaultHashBuilder::default());
        map.try_insert("Term".to_string(), 1).unwrap();

        assert_eq!(map.try_insert("TERM".to_string(), 2), Err(Conflict::Left));
        assert_eq!(map.find_left("term"), Some(0));
        map.assert_consistent();
    }

    #[test]
    fn try_from_pairs_rejects_repeated_right_elements() {
        let pairs = vec![(1u8, 10u8), (2, 10)];
        let result = Plain::try_from_pairs(
            pairs,
            DefaultComparer,
            DefaultComparer,
            DefaultHashBuilder::default(),
        );

        assert!(matches!(result, Err(Conflict::Right)));
    }

    #[test]
    fn reserve_keeps_rows_reachable() {
        let mut map = plain();
        for i in 0..8 {
            map.try_insert(i, 255 - i).unwrap();
        }
        map.reserve(1000);
        assert!(map.capacity() >= 1008);
        map.assert_consistent();

        map.try_reserve(10).unwrap();
        map.shrink_to_fit();
        map.assert_consistent();
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(u8, u8),
        AssignRight(u8, u8),
        AssignLeft(u8, u8),
        RemoveLeft(u8),
        RemoveRight(u8),
        Clear,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u8..12, 0u8..12).prop_map(|(l, r)| Op::Insert(l, r)),
            3 => (0u8..12, 0u8..12).prop_map(|(l, r)| Op::AssignRight(l, r)),
            3 => (0u8..12, 0u8..12).prop_map(|(r, l)| Op::AssignLeft(r, l)),
            2 => (0u8..12).prop_map(Op::RemoveLeft),
            2 => (0u8..12).prop_map(Op::RemoveRight),
            1 => Just(Op::Clear),
        ]
    }

    /// Naive model: a forward map whose values are kept unique by hand.
    #[derive(Default)]
    struct Model {
        forward: HashMap<u8, u8>,
    }

    impl Model {
        fn holder_of(&self, right: u8) -> Option<u8> {
            self.forward
                .iter()
                .find(|(_, &r)| r == right)
                .map(|(&l, _)| l)
        }

        fn apply(&mut self, op: &Op) {
            match *op {
                Op::Insert(l, r) => {
                    if !self.forward.contains_key(&l) && self.holder_of(r).is_none() {
                        self.forward.insert(l, r);
                    }
                }
                Op::AssignRight(l, r) => match self.holder_of(r) {
                    Some(holder) if holder != l => {}
                    _ => {
                        self.forward.insert(l, r);
                    }
                },
                Op::AssignLeft(r, l) => {
                    if let Some(holder) = self.holder_of(r) {
                        if holder == l {
                            return;
                        }
                        if !self.forward.contains_key(&l) {
                            self.forward.remove(&holder);
                            self.forward.insert(l, r);
                        }
                    } else if !self.forward.contains_key(&l) {
                        self.forward.insert(l, r);
                    }
                }
                Op::RemoveLeft(l) => {
                    self.forward.remove(&l);
                }
                Op::RemoveRight(r) => {
                    if let Some(holder) = self.holder_of(r) {
                        self.forward.remove(&holder);
                    }
                }
                Op::Clear => self.forward.clear(),
            }
        }
    }

    proptest! {
        /// Any sequence of operations keeps both tables in step with the rows
        /// and with a naive model.
        #[test]
        fn prop_tables_stay_in_step(ops in prop::collection::vec(op(), 0..64)) {
            let mut map = plain();
            let mut model = Model::default();

            for op in &ops {
                let len_before = map.len();
                let outcome = match *op {
                    Op::Insert(l, r) => map.try_insert(l, r).err(),
                    Op::AssignRight(l, r) => map.assign_right(l, r).err(),
                    Op::AssignLeft(r, l) => map.assign_left(r, l).err(),
                    Op::RemoveLeft(l) => { map.remove_by_left(&l); None }
                    Op::RemoveRight(r) => { map.remove_by_right(&r); None }
                    Op::Clear => { map.clear(); None }
                };
                if outcome.is_some() {
                    prop_assert_eq!(map.len(), len_before, "rejected operation changed the map");
                }
                model.apply(op);

                map.assert_consistent();
                prop_assert_eq!(map.len(), model.forward.len());
                for (&l, &r) in &model.forward {
                    prop_assert!(map.contains_pair(&l, &r));
                }
            }
        }
    }
}
