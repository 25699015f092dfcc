//! One-hop neighbor set.
//!
//! Entries are only ever added: the model has no link expiry. The table keeps
//! insertion order, which is also the order neighbors are advertised in HELLOs.

use crate::collections::BoundedVec;
use crate::types::{Address, Error, LinkStatus, NeighborEntry, Table};

/// Bounded set of symmetric one-hop neighbors.
#[derive(Debug, Clone)]
pub struct NeighborTable {
    owner: Address,
    entries: BoundedVec<NeighborEntry>,
}

impl NeighborTable {
    /// Create an empty table for the node at `owner`.
    pub fn new(owner: Address, max_neighbors: usize) -> Self {
        Self {
            owner,
            entries: BoundedVec::with_max_capacity(max_neighbors),
        }
    }

    /// Linear scan by address.
    pub fn contains(&self, address: Address) -> bool {
        self.entries.iter().any(|e| e.address == address)
    }

    /// Add `address` as a symmetric neighbor.
    ///
    /// Returns `Ok(true)` if it was added, `Ok(false)` if it was already
    /// present or is the owner's own address.
    pub fn insert(&mut self, address: Address) -> Result<bool, Error> {
        if address == self.owner || self.contains(address) {
            return Ok(false);
        }
        let entry = NeighborEntry {
            address,
            status: LinkStatus::Symmetric,
        };
        self.entries
            .try_push(entry)
            .map_err(|_| Error::CapacityExceeded {
                table: Table::Neighbors,
                capacity: self.entries.max_capacity(),
            })?;
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NeighborEntry> {
        self.entries.iter()
    }

    /// Neighbor addresses in insertion order.
    pub fn addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.entries.iter().map(|e| e.address)
    }
}
