#![forbid(unsafe_code)]
//! olsr - neighbor discovery and MPR selection for simulated OLSR networks
//!
//! A simplified model of the Optimized Link State Routing protocol
//! (RFC 3626) link-sensing core, designed to be driven by a discrete-event
//! scheduler.
//!
//! # Key Properties
//!
//! - Nodes discover one-hop neighbors from periodic HELLO broadcasts
//! - Neighbor lists carried in HELLOs populate a two-hop neighbor table
//! - Each node selects multipoint relays (MPRs) covering its two-hop neighbors
//! - A broadcast is emulated as a chained relay over a fixed node ordering:
//!   every node forwards every HELLO, only nodes in radio range use it
//! - All tables are bounded; overflow is a fatal error, never a silent drop
//! - No I/O, no clocks, no threads: time, randomness and delivery belong to
//!   the [`Scheduler`]
//!
//! # Example
//!
//! ```
//! use olsr::{Address, Message, Node, Position, Timestamp};
//! use olsr::traits::test_impls::MockScheduler;
//!
//! let mut sched = MockScheduler::with_nodes(2);
//! let mut a: Node = Node::new(Address::new(0), Position::new(0.0, 0.0));
//! let mut b: Node = Node::new(Address::new(1), Position::new(10.0, 0.0));
//!
//! // B emits a HELLO; hop 0 of the relay is addressed to A.
//! b.on_message(&Message::HelloTx, Timestamp::ZERO, &mut sched).unwrap();
//! let hop = sched
//!     .take_scheduled()
//!     .into_iter()
//!     .find(|s| s.target == a.address())
//!     .unwrap();
//!
//! a.on_message(&hop.message, Timestamp::ZERO + hop.delay, &mut sched).unwrap();
//! assert!(a.neighbors().contains(b.address()));
//! ```
//!
//! # Module Structure
//!
//! - [`types`] - Addresses, positions, table entries, errors, constants
//! - [`range`] - Radio range model
//! - [`neighbor`] - One-hop neighbor table
//! - [`two_hop`] - Two-hop neighbor table
//! - [`mpr`] - MPR selection
//! - [`message`] - HELLO payloads and relay envelopes
//! - [`traits`] - The scheduler contract
//! - [`adapter`] - Protocol actions as scheduler requests
//! - [`node`] - Node state, dispatch and final reports
//! - [`hello`] - HELLO handlers
//! - [`time`] - Timestamp and Duration types
//! - [`config`] - Compile-time table bounds

#[macro_use]
pub mod debug;

pub mod adapter;
pub mod collections;
pub mod config;
pub mod hello;
pub mod message;
pub mod mpr;
pub mod neighbor;
pub mod node;
pub mod range;
pub mod time;
pub mod traits;
pub mod two_hop;
pub mod types;

// Re-export main types at crate root
pub use adapter::SchedulerAdapter;
pub use config::{DefaultConfig, NodeConfig, SmallConfig};
pub use debug::DebugEvent;
pub use message::{HelloMessage, Message, RelayEnvelope};
pub use mpr::{select_mprs, MprSelection, MprSet};
pub use neighbor::NeighborTable;
pub use node::{Node, NodeReport, ProtocolMetrics};
pub use range::RadioRange;
pub use time::{Duration, Timestamp};
pub use traits::Scheduler;
pub use two_hop::TwoHopTable;
pub use types::{Address, Error, LinkStatus, NeighborEntry, Position, Table, TwoHopEntry};

// Re-export constants
pub use types::{GRID_MAX, HELLO_DELTA_SECS, HELLO_INTERVAL, RANGE, STAGGER_MAX};
