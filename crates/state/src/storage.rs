use primitives::U256;
use std::collections::{btree_map, BTreeMap, BTreeSet};

/// Sparse account storage.
///
/// Every slot that is not present holds zero, so a slot explicitly set to zero is
/// the same as an absent one: equality and [`get`](Self::get) ignore zero entries.
/// Entries are kept ordered by key, which makes iteration deterministic.
#[derive(Clone, Debug, Default)]
pub struct Storage(BTreeMap<U256, U256>);

impl Storage {
    /// Creates empty storage.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Value of `key`, zero if unset.
    #[inline]
    pub fn get(&self, key: &U256) -> U256 {
        self.0.get(key).copied().unwrap_or_default()
    }

    /// Sets `key` to `value` and returns the previous value (zero if unset).
    pub fn insert(&mut self, key: U256, value: U256) -> U256 {
        self.0.insert(key, value).unwrap_or_default()
    }

    /// Builder style [`insert`](Self::insert).
    pub fn with_slot(mut self, key: U256, value: U256) -> Self {
        self.insert(key, value);
        self
    }

    /// All declared entries, zero values included, ordered by key.
    pub fn iter(&self) -> btree_map::Iter<'_, U256, U256> {
        self.0.iter()
    }

    /// Entries with a non-zero value, ordered by key.
    pub fn non_zero(&self) -> impl Iterator<Item = (&U256, &U256)> + '_ {
        self.0.iter().filter(|(_, value)| !value.is_zero())
    }

    /// Returns `true` if no slot holds a non-zero value.
    pub fn is_empty(&self) -> bool {
        self.non_zero().next().is_none()
    }

    /// Keys present in either storage, ordered.
    pub fn key_union(&self, other: &Self) -> BTreeSet<U256> {
        self.0.keys().chain(other.0.keys()).copied().collect()
    }

    /// `(key, self value, other value)` for every slot whose effective value differs.
    pub fn differing_slots(&self, other: &Self) -> Vec<(U256, U256, U256)> {
        self.key_union(other)
            .into_iter()
            .filter_map(|key| {
                let (ours, theirs) = (self.get(&key), other.get(&key));
                (ours != theirs).then_some((key, ours, theirs))
            })
            .collect()
    }
}

impl PartialEq for Storage {
    fn eq(&self, other: &Self) -> bool {
        self.non_zero().eq(other.non_zero())
    }
}

impl Eq for Storage {}

impl FromIterator<(U256, U256)> for Storage {
    fn from_iter<I: IntoIterator<Item = (U256, U256)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromIterator<(u64, u64)> for Storage {
    fn from_iter<I: IntoIterator<Item = (u64, u64)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(key, value)| (U256::from(key), U256::from(value)))
            .collect()
    }
}

impl<const N: usize> From<[(U256, U256); N]> for Storage {
    fn from(entries: [(U256, U256); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<const N: usize> From<[(u64, u64); N]> for Storage {
    fn from(entries: [(u64, u64); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Storage {
    type Item = (&'a U256, &'a U256);
    type IntoIter = btree_map::Iter<'a, U256, U256>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_reads_as_zero() {
        let storage = Storage::from([(1u64, 5u64)]);
        assert_eq!(storage.get(&U256::from(1)), U256::from(5));
        assert_eq!(storage.get(&U256::from(2)), U256::ZERO);
    }

    #[test]
    fn zero_entries_are_ignored_by_equality() {
        let explicit = Storage::from([(0u64, 0u64), (1, 7)]);
        let sparse = Storage::from([(1u64, 7u64)]);
        assert_eq!(explicit, sparse);
        assert_ne!(sparse, Storage::from([(1u64, 8u64)]));
        assert!(Storage::from([(3u64, 0u64)]).is_empty());
    }

    #[test]
    fn differing_slots_cover_both_sides() {
        let a = Storage::from([(0u64, 1u64), (1, 0), (2, 9)]);
        let b = Storage::from([(0u64, 1u64), (3, 4)]);
        assert_eq!(
            a.differing_slots(&b),
            vec![
                (U256::from(2), U256::from(9), U256::ZERO),
                (U256::from(3), U256::ZERO, U256::from(4)),
            ]
        );
    }

    #[test]
    fn insert_returns_previous() {
        let mut storage = Storage::new();
        assert_eq!(storage.insert(U256::from(1), U256::from(2)), U256::ZERO);
        assert_eq!(storage.insert(U256::from(1), U256::from(3)), U256::from(2));
        assert_eq!(storage.iter().count(), 1);
    }
}
