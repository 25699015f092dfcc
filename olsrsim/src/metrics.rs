//! Metrics collection for simulation analysis.

use hashbrown::{HashMap, HashSet};
use olsr::{Address, Timestamp};

use crate::placement::canonical;

/// Neighbor and MPR state of every node at a point in time.
#[derive(Debug, Clone)]
pub struct NeighborSnapshot {
    pub time: Timestamp,
    /// One-hop neighbors per node.
    pub neighbors: HashMap<Address, Vec<Address>>,
    /// MPR set per node.
    pub mprs: HashMap<Address, Vec<Address>>,
    /// Two-hop neighbors per node that no MPR covers.
    pub uncovered: HashMap<Address, Vec<Address>>,
}

impl NeighborSnapshot {
    pub fn new(time: Timestamp) -> Self {
        Self {
            time,
            neighbors: HashMap::new(),
            mprs: HashMap::new(),
            uncovered: HashMap::new(),
        }
    }

    /// Record a node's state.
    pub fn record_node(
        &mut self,
        address: Address,
        neighbors: Vec<Address>,
        mprs: Vec<Address>,
        uncovered: Vec<Address>,
    ) {
        self.neighbors.insert(address, neighbors);
        self.mprs.insert(address, mprs);
        self.uncovered.insert(address, uncovered);
    }

    pub fn neighbors_of(&self, address: Address) -> &[Address] {
        self.neighbors
            .get(&address)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether every neighbor relation is mutual.
    pub fn symmetric(&self) -> bool {
        self.neighbors.iter().all(|(&a, list)| {
            list.iter()
                .all(|b| self.neighbors_of(*b).contains(&a))
        })
    }

    /// Whether every node's MPR set covers all of its two-hop neighbors.
    pub fn mpr_coverage_complete(&self) -> bool {
        self.uncovered.values().all(Vec::is_empty)
    }

    /// Sum of neighbor table sizes (each symmetric link counts twice).
    pub fn total_links(&self) -> usize {
        self.neighbors.values().map(Vec::len).sum()
    }

    /// Discovered links as unordered pairs.
    pub fn links(&self) -> HashSet<(Address, Address)> {
        self.neighbors
            .iter()
            .flat_map(|(&a, list)| list.iter().map(move |&b| canonical(a, b)))
            .collect()
    }
}

/// Simulation metrics collected over time.
#[derive(Debug, Clone, Default)]
pub struct SimMetrics {
    /// Deliveries requested by nodes.
    pub messages_scheduled: u64,
    /// Deliveries handed to a node.
    pub messages_delivered: u64,
    /// Deliveries addressed to an unknown node.
    pub messages_dropped: u64,
    /// HELLO timers fired.
    pub hello_rounds: u64,
    /// HELLO relay hops delivered.
    pub relay_hops: u64,
    /// Snapshots taken at intervals and at the end of each run.
    pub snapshots: Vec<NeighborSnapshot>,
}

impl SimMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_snapshot(&mut self, snapshot: NeighborSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn latest_snapshot(&self) -> Option<&NeighborSnapshot> {
        self.snapshots.last()
    }

    /// First snapshot time from which the link set never changed again.
    pub fn stable_since(&self) -> Option<Timestamp> {
        let last = self.snapshots.last()?.links();
        let mut since = None;
        for snapshot in self.snapshots.iter().rev() {
            if snapshot.links() != last {
                break;
            }
            since = Some(snapshot.time);
        }
        since
    }
}

/// Result of running a simulation.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Final simulation time.
    pub end_time: Timestamp,
    pub metrics: SimMetrics,
    /// Whether the run ended because the event queue was empty.
    pub queue_exhausted: bool,
}

impl SimulationResult {
    pub fn symmetric(&self) -> bool {
        self.metrics
            .latest_snapshot()
            .is_some_and(NeighborSnapshot::symmetric)
    }

    pub fn mpr_coverage_complete(&self) -> bool {
        self.metrics
            .latest_snapshot()
            .is_some_and(NeighborSnapshot::mpr_coverage_complete)
    }

    pub fn final_total_links(&self) -> usize {
        self.metrics
            .latest_snapshot()
            .map(NeighborSnapshot::total_links)
            .unwrap_or(0)
    }
}
