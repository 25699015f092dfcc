//! Node implementation - per-node protocol state and message dispatch.
//!
//! A [`Node`] owns its neighbor table, two-hop table and MPR set. Nothing
//! outside the node mutates them: the scheduler delivers a [`Message`], the
//! node updates its state and asks the scheduler for follow-up deliveries.
//!
//! # Lifecycle
//!
//! ```
//! use olsr::{Address, Message, Node, Position, Timestamp};
//! use olsr::traits::test_impls::MockScheduler;
//!
//! let mut sched = MockScheduler::with_nodes(1);
//! let mut node: Node = Node::new(Address::new(0), Position::new(10.0, 10.0));
//! node.start(&mut sched);
//!
//! // The first HELLO timer is armed for this node.
//! let first = sched.take_scheduled();
//! assert_eq!(first[0].message, Message::HelloTx);
//!
//! node.on_message(&Message::HelloTx, Timestamp::ZERO, &mut sched).unwrap();
//! let report = node.finalize();
//! assert!(report.neighbors.is_empty());
//! ```

use std::marker::PhantomData;

use tracing::info;

use crate::adapter::SchedulerAdapter;
use crate::config::{DefaultConfig, NodeConfig};
use crate::debug::DebugEvent;
use crate::message::Message;
use crate::mpr::{select_mprs, MprSet};
use crate::neighbor::NeighborTable;
use crate::range::RadioRange;
use crate::time::Timestamp;
use crate::traits::Scheduler;
use crate::two_hop::TwoHopTable;
use crate::types::{Address, Error, Position, TwoHopEntry, GRID_MAX, STAGGER_MAX};

/// Per-node protocol counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProtocolMetrics {
    pub hellos_sent: u64,
    /// Every HELLO delivered to this node, usable or not.
    pub hellos_received: u64,
    pub hellos_relayed: u64,
    pub self_echoes: u64,
    pub out_of_range: u64,
    pub hellos_accepted: u64,
    pub mpr_recomputations: u64,
    pub mpr_incomplete: u64,
}

/// Final state of a node, produced by [`Node::finalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeReport {
    pub address: Address,
    pub position: Position,
    /// One-hop neighbors in insertion order.
    pub neighbors: Vec<Address>,
    /// Two-hop pairs in insertion order.
    pub two_hop: Vec<TwoHopEntry>,
    /// MPR set, sorted.
    pub mprs: Vec<Address>,
    /// Two-hop neighbors the last MPR selection could not cover.
    pub uncovered: Vec<Address>,
    pub metrics: ProtocolMetrics,
}

/// Protocol state of one simulated node.
///
/// `C` fixes the table bounds at compile time.
pub struct Node<C: NodeConfig = DefaultConfig> {
    pub(crate) address: Address,
    pub(crate) position: Position,
    pub(crate) range: RadioRange,

    pub(crate) neighbors: NeighborTable,
    pub(crate) two_hop: TwoHopTable,
    pub(crate) mprs: MprSet,
    pub(crate) uncovered: Vec<Address>,

    pub(crate) metrics: ProtocolMetrics,
    pub(crate) debug_log: Option<Vec<DebugEvent>>,

    _config: PhantomData<C>,
}

impl<C: NodeConfig> Node<C> {
    /// Create a node at a known position with empty tables.
    ///
    /// Call [`start`](Self::start) to arm its first HELLO.
    pub fn new(address: Address, position: Position) -> Self {
        Self {
            address,
            position,
            range: RadioRange::default(),
            neighbors: NeighborTable::new(address, C::MAX_NEIGHBORS),
            two_hop: TwoHopTable::new(address, C::MAX_TWO_HOP),
            mprs: MprSet::new(),
            uncovered: Vec::new(),
            metrics: ProtocolMetrics::default(),
            debug_log: None,
            _config: PhantomData,
        }
    }

    /// Create a node at a random grid position and arm its first HELLO.
    ///
    /// Draws longitude, latitude and the start stagger, in that order, from
    /// the scheduler's stream for this node.
    pub fn initialize<S: Scheduler>(address: Address, scheduler: &mut S) -> Self {
        let lng = scheduler.random_uniform() * GRID_MAX;
        let lat = scheduler.random_uniform() * GRID_MAX;
        let mut node = Self::new(address, Position::new(lng, lat));
        node.start(scheduler);
        node
    }

    /// Override the radio range (default [`RANGE`](crate::types::RANGE)).
    pub fn with_range(mut self, range: f64) -> Self {
        self.range = RadioRange::new(range);
        self
    }

    /// Schedule the first HELLO after a uniform stagger in `[0, STAGGER_MAX)`.
    pub fn start<S: Scheduler>(&mut self, scheduler: &mut S) {
        let mut adapter = SchedulerAdapter::new(scheduler);
        let stagger = STAGGER_MAX.mul_f64(adapter.uniform());
        adapter.schedule_hello_tx(self.address, stagger);
    }

    /// Handle one delivered message.
    ///
    /// Errors are fatal for the node: a table outgrew its configured bound.
    pub fn on_message<S: Scheduler>(
        &mut self,
        message: &Message,
        now: Timestamp,
        scheduler: &mut S,
    ) -> Result<(), Error> {
        match message {
            Message::HelloTx => {
                self.handle_hello_tx(now, scheduler);
                Ok(())
            }
            Message::HelloRx(envelope) => self.handle_hello_rx(envelope, now, scheduler),
        }
    }

    /// Snapshot the tables for reporting.
    pub fn finalize(&self) -> NodeReport {
        let report = NodeReport {
            address: self.address,
            position: self.position,
            neighbors: self.neighbors.addresses().collect(),
            two_hop: self.two_hop.iter().copied().collect(),
            mprs: self.mprs.as_slice().to_vec(),
            uncovered: self.uncovered.clone(),
            metrics: self.metrics,
        };
        info!(
            node = %self.address,
            neighbors = ?report.neighbors,
            two_hop = report.two_hop.len(),
            mprs = ?report.mprs,
            "final state"
        );
        report
    }

    // --- Accessors ---

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn range(&self) -> &RadioRange {
        &self.range
    }

    pub fn neighbors(&self) -> &NeighborTable {
        &self.neighbors
    }

    pub fn two_hop(&self) -> &TwoHopTable {
        &self.two_hop
    }

    pub fn mprs(&self) -> &MprSet {
        &self.mprs
    }

    /// Two-hop neighbors left uncovered by the last MPR selection.
    pub fn uncovered(&self) -> &[Address] {
        &self.uncovered
    }

    pub fn metrics(&self) -> &ProtocolMetrics {
        &self.metrics
    }

    /// D(y) of a neighbor, see [`TwoHopTable::degree_excluding_neighbors`].
    pub fn degree(&self, neighbor: Address) -> usize {
        self.two_hop
            .degree_excluding_neighbors(neighbor, &self.neighbors)
    }

    // --- Debug ---

    /// Start collecting [`DebugEvent`]s.
    pub fn enable_debug(&mut self) {
        if self.debug_log.is_none() {
            self.debug_log = Some(Vec::new());
        }
    }

    /// Drain collected events. Empty if collection is off.
    pub fn take_debug_events(&mut self) -> Vec<DebugEvent> {
        self.debug_log
            .as_mut()
            .map(std::mem::take)
            .unwrap_or_default()
    }
}

impl<C: NodeConfig> std::fmt::Debug for Node<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("address", &self.address)
            .field("position", &self.position)
            .field("neighbors", &self.neighbors.len())
            .field("two_hop", &self.two_hop.len())
            .field("mprs", &self.mprs.as_slice())
            .finish()
    }
}
