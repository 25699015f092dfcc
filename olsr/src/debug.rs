//! Debug events for protocol tracing.
//!
//! Collection is off by default. A harness turns it on per node with
//! [`Node::enable_debug`](crate::Node::enable_debug) and drains the log with
//! [`Node::take_debug_events`](crate::Node::take_debug_events).

use crate::time::Timestamp;
use crate::types::Address;

/// Push an event to the node's debug log if collection is enabled.
///
/// The event expression is only evaluated when collection is on.
macro_rules! emit_debug {
    ($node:expr, $event:expr) => {
        if let Some(log) = $node.debug_log.as_mut() {
            log.push($event);
        }
    };
}

/// Debug events emitted by a node for protocol tracing.
#[derive(Debug, Clone, PartialEq)]
pub enum DebugEvent {
    /// HELLO built and handed to the relay chain.
    HelloSent {
        timestamp: Timestamp,
        neighbor_count: usize,
    },
    /// HELLO forwarded to the next hop.
    HelloRelayed {
        timestamp: Timestamp,
        originator: Address,
        hop_index: usize,
    },
    /// Our own HELLO came back through the chain.
    SelfEcho { timestamp: Timestamp },
    /// HELLO heard from a node too far away to use.
    OutOfRange {
        timestamp: Timestamp,
        originator: Address,
        distance: f64,
    },
    /// HELLO contents merged into the tables.
    HelloAccepted {
        timestamp: Timestamp,
        originator: Address,
        new_neighbor: bool,
        new_two_hop: usize,
    },
    /// MPR set recomputed.
    MprRecomputed {
        timestamp: Timestamp,
        mprs: Vec<Address>,
    },
    /// MPR selection left two-hop neighbors uncovered.
    MprIncomplete {
        timestamp: Timestamp,
        uncovered: Vec<Address>,
    },
}

impl DebugEvent {
    pub fn timestamp(&self) -> Timestamp {
        match self {
            DebugEvent::HelloSent { timestamp, .. }
            | DebugEvent::HelloRelayed { timestamp, .. }
            | DebugEvent::SelfEcho { timestamp }
            | DebugEvent::OutOfRange { timestamp, .. }
            | DebugEvent::HelloAccepted { timestamp, .. }
            | DebugEvent::MprRecomputed { timestamp, .. }
            | DebugEvent::MprIncomplete { timestamp, .. } => *timestamp,
        }
    }
}
