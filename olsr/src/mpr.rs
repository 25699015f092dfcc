//! Multipoint relay selection (RFC 3626 §8.3.1, symmetric links, no willingness).
//!
//! The MPR set is recomputed from scratch from the neighbor and two-hop tables.
//! Only strict two-hop neighbors count: addresses in the two-hop table that
//! are neither one-hop neighbors nor the computing node itself.
//!
//! 1. **Forced selection**: a two-hop neighbor reachable through exactly one
//!    neighbor makes that neighbor an MPR.
//! 2. **Greedy coverage**: while two-hop neighbors remain uncovered, add the
//!    neighbor covering the most of them, lowest address first on ties.
//!
//! If no remaining neighbor covers anything the selection stops and reports the
//! leftovers rather than looping.
//!
//! All scratch state is local to one call.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::neighbor::NeighborTable;
use crate::two_hop::TwoHopTable;
use crate::types::Address;

/// Selected multipoint relays, kept sorted by address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MprSet {
    members: Vec<Address>,
}

impl MprSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, address: Address) -> bool {
        self.members.binary_search(&address).is_ok()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Address> + '_ {
        self.members.iter().copied()
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.members
    }

    fn insert(&mut self, address: Address) -> bool {
        match self.members.binary_search(&address) {
            Ok(_) => false,
            Err(pos) => {
                self.members.insert(pos, address);
                true
            }
        }
    }
}

/// Outcome of one MPR computation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MprSelection {
    /// Chosen relays. Always a subset of the neighbor table.
    pub mprs: MprSet,
    /// Two-hop neighbors no selected relay reaches, sorted.
    pub uncovered: Vec<Address>,
}

impl MprSelection {
    /// Whether every strict two-hop neighbor is covered.
    pub fn is_complete(&self) -> bool {
        self.uncovered.is_empty()
    }
}

/// Compute the MPR set for a node from its current tables.
pub fn select_mprs(neighbors: &NeighborTable, two_hop: &TwoHopTable) -> MprSelection {
    // two-hop address -> neighbors it is reachable through
    let mut reach: BTreeMap<Address, BTreeSet<Address>> = BTreeMap::new();
    // neighbor -> strict two-hop addresses it reaches
    let mut covers: BTreeMap<Address, BTreeSet<Address>> = BTreeMap::new();
    let mut uncovered: BTreeSet<Address> = BTreeSet::new();

    for entry in two_hop.iter() {
        if neighbors.contains(entry.two_hop) {
            continue;
        }
        uncovered.insert(entry.two_hop);
        // A pair whose via is no longer a neighbor cannot be used, but its
        // target still has to be covered.
        if neighbors.contains(entry.via) {
            reach.entry(entry.two_hop).or_default().insert(entry.via);
            covers.entry(entry.via).or_default().insert(entry.two_hop);
        }
    }

    let mut mprs = MprSet::new();

    // Forced selection
    for vias in reach.values() {
        if vias.len() != 1 {
            continue;
        }
        if let Some(&via) = vias.iter().next() {
            if mprs.insert(via) {
                if let Some(reached) = covers.get(&via) {
                    for t in reached {
                        uncovered.remove(t);
                    }
                }
            }
        }
    }

    // Greedy coverage. BTreeMap iteration is ascending, so keeping the first
    // strict maximum selects the lowest address among ties.
    while !uncovered.is_empty() {
        let mut best: Option<(Address, usize)> = None;
        for (&via, reached) in &covers {
            if mprs.contains(via) {
                continue;
            }
            let gain = reached.iter().filter(|t| uncovered.contains(*t)).count();
            if gain > 0 && best.map_or(true, |(_, g)| gain > g) {
                best = Some((via, gain));
            }
        }

        let Some((via, _)) = best else {
            break;
        };
        mprs.insert(via);
        if let Some(reached) = covers.get(&via) {
            for t in reached {
                uncovered.remove(t);
            }
        }
    }

    let uncovered: Vec<Address> = uncovered.into_iter().collect();
    if !uncovered.is_empty() {
        warn!(
            uncovered = ?uncovered,
            "MPR selection incomplete: two-hop neighbors unreachable through any neighbor"
        );
    }

    MprSelection { mprs, uncovered }
}
