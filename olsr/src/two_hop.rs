//! Two-hop neighbor set.
//!
//! Holds the (neighbor, two-hop neighbor) pairs learned from the neighbor
//! lists carried in HELLOs. Self-referential and malformed pairs are dropped
//! on insertion; they arise naturally from broadcast and are not errors.

use hashbrown::HashSet;

use crate::collections::BoundedVec;
use crate::neighbor::NeighborTable;
use crate::types::{Address, Error, Table, TwoHopEntry};

/// Bounded set of unique (via, two_hop) pairs.
#[derive(Debug, Clone)]
pub struct TwoHopTable {
    owner: Address,
    entries: BoundedVec<TwoHopEntry>,
}

impl TwoHopTable {
    /// Create an empty table for the node at `owner`.
    pub fn new(owner: Address, max_two_hop: usize) -> Self {
        Self {
            owner,
            entries: BoundedVec::with_max_capacity(max_two_hop),
        }
    }

    pub fn contains(&self, via: Address, two_hop: Address) -> bool {
        self.entries
            .iter()
            .any(|e| e.via == via && e.two_hop == two_hop)
    }

    /// Record that `two_hop` is reachable through the neighbor `via`.
    ///
    /// Returns `Ok(false)` without touching the table when `two_hop` is the
    /// owner, equals `via`, `via` is not a current neighbor, or the pair is
    /// already present.
    pub fn insert(
        &mut self,
        neighbors: &NeighborTable,
        via: Address,
        two_hop: Address,
    ) -> Result<bool, Error> {
        if two_hop == self.owner
            || two_hop == via
            || !neighbors.contains(via)
            || self.contains(via, two_hop)
        {
            return Ok(false);
        }
        self.entries
            .try_push(TwoHopEntry { via, two_hop })
            .map_err(|_| Error::CapacityExceeded {
                table: Table::TwoHop,
                capacity: self.entries.max_capacity(),
            })?;
        Ok(true)
    }

    /// Two-hop addresses reachable through `via`, in insertion order.
    pub fn reachable_via(&self, via: Address) -> impl Iterator<Item = Address> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.via == via)
            .map(|e| e.two_hop)
    }

    /// Degree D(y) of neighbor `target` (RFC 3626 §8.3.1).
    ///
    /// Counts distinct two-hop addresses reachable through `target` that are
    /// neither one-hop neighbors nor the owner.
    pub fn degree_excluding_neighbors(&self, target: Address, neighbors: &NeighborTable) -> usize {
        let mut seen = HashSet::new();
        for two_hop in self.reachable_via(target) {
            if two_hop != self.owner && !neighbors.contains(two_hop) {
                seen.insert(two_hop);
            }
        }
        seen.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TwoHopEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn addr(n: u64) -> Address {
        Address::new(n)
    }

    fn neighbors_of(owner: u64, members: &[u64]) -> NeighborTable {
        let mut table = NeighborTable::new(addr(owner), 16);
        for &m in members {
            table.insert(addr(m)).unwrap();
        }
        table
    }

    #[test]
    fn test_insert_pair() {
        let n = neighbors_of(0, &[1]);
        let mut table = TwoHopTable::new(addr(0), 8);
        assert_eq!(table.insert(&n, addr(1), addr(2)), Ok(true));
        assert!(table.contains(addr(1), addr(2)));
        assert!(!table.contains(addr(2), addr(1)));
    }

    #[test]
    fn test_duplicate_pair_stored_once() {
        let n = neighbors_of(0, &[1]);
        let mut table = TwoHopTable::new(addr(0), 8);
        table.insert(&n, addr(1), addr(2)).unwrap();
        assert_eq!(table.insert(&n, addr(1), addr(2)), Ok(false));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_rejects_malformed_pairs() {
        let n = neighbors_of(0, &[1]);
        let mut table = TwoHopTable::new(addr(0), 8);
        // Owner as two-hop neighbor
        assert_eq!(table.insert(&n, addr(1), addr(0)), Ok(false));
        // Self loop through the neighbor
        assert_eq!(table.insert(&n, addr(1), addr(1)), Ok(false));
        // Via is not a neighbor
        assert_eq!(table.insert(&n, addr(9), addr(2)), Ok(false));
        assert!(table.is_empty());
    }

    #[test]
    fn test_capacity_exceeded() {
        let n = neighbors_of(0, &[1]);
        let mut table = TwoHopTable::new(addr(0), 2);
        table.insert(&n, addr(1), addr(2)).unwrap();
        table.insert(&n, addr(1), addr(3)).unwrap();
        assert_eq!(
            table.insert(&n, addr(1), addr(4)),
            Err(Error::CapacityExceeded {
                table: Table::TwoHop,
                capacity: 2
            })
        );
        // Rejections that never reach the push are not capacity errors.
        assert_eq!(table.insert(&n, addr(1), addr(3)), Ok(false));
    }

    #[test]
    fn test_degree_excludes_neighbors() {
        // Owner 0 has neighbors 1 and 2. Neighbor 1 reports 2, 3 and 4.
        let n = neighbors_of(0, &[1, 2]);
        let mut table = TwoHopTable::new(addr(0), 8);
        for t in [2, 3, 4] {
            table.insert(&n, addr(1), addr(t)).unwrap();
        }
        table.insert(&n, addr(2), addr(3)).unwrap();
        assert_eq!(table.degree_excluding_neighbors(addr(1), &n), 2);
        assert_eq!(table.degree_excluding_neighbors(addr(2), &n), 1);
        assert_eq!(table.degree_excluding_neighbors(addr(7), &n), 0);
    }

    #[test]
    fn test_reachable_via() {
        let n = neighbors_of(0, &[1, 2]);
        let mut table = TwoHopTable::new(addr(0), 8);
        table.insert(&n, addr(1), addr(5)).unwrap();
        table.insert(&n, addr(2), addr(6)).unwrap();
        table.insert(&n, addr(1), addr(7)).unwrap();
        let via_one: Vec<_> = table.reachable_via(addr(1)).collect();
        assert_eq!(via_one, vec![addr(5), addr(7)]);
    }

    proptest! {
        #[test]
        fn prop_never_stores_owner_or_duplicates(
            pairs in prop::collection::vec((0u64..6, 0u64..6), 0..64)
        ) {
            let n = neighbors_of(0, &[1, 2, 3, 4, 5]);
            let mut table = TwoHopTable::new(addr(0), 64);
            for (via, two_hop) in pairs {
                table.insert(&n, addr(via), addr(two_hop)).unwrap();
            }
            let entries: Vec<_> = table.iter().copied().collect();
            for (i, e) in entries.iter().enumerate() {
                prop_assert_ne!(e.two_hop, addr(0));
                prop_assert_ne!(e.two_hop, e.via);
                prop_assert!(n.contains(e.via));
                prop_assert!(!entries[i + 1..].contains(e));
            }
        }
    }
}
