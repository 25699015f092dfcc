//! olsrsim - Discrete event simulator for the olsr protocol core.
//!
//! This crate drives many [`olsr::Node`]s in one process with virtual time,
//! playing the scheduler role the protocol core delegates: it owns the clock,
//! the event queue, each node's random stream and the node ordering HELLO
//! relays walk through.
//!
//! # Features
//!
//! - **Discrete event simulation**: no real-time delays, deterministic ordering
//! - **Per-node random streams**: results depend only on the seed
//! - **Placement**: random, explicit, chain or grid node positions
//! - **Scenario builder**: one-call setup and run
//! - **Metrics collection**: neighbor snapshots, message counts, final reports
//!
//! # Example
//!
//! ```
//! use olsrsim::{Duration, ScenarioBuilder};
//!
//! // Three nodes on a line, 30 apart: the ends only hear the middle.
//! let result = ScenarioBuilder::new(3)
//!     .chain_placement(30.0)
//!     .with_seed(42)
//!     .run_for(Duration::from_secs(30))
//!     .unwrap();
//!
//! assert!(result.symmetric());
//! assert_eq!(result.final_total_links(), 4);
//! ```
//!
//! # Architecture
//!
//! The simulator uses a priority queue of events ordered by (time, sequence_number).
//! The main loop:
//! 1. Pop next event from queue
//! 2. Advance simulation time
//! 3. Hand the message to the target node's handler
//! 4. Drain the deliveries the node requested into the queue
//!
//! A node sees the simulator only through the `olsr::Scheduler` trait, lent
//! to it for the duration of one handler call.

pub mod error;
pub mod event;
pub mod metrics;
pub mod node;
pub mod placement;
pub mod scenario;
pub mod sim;

// Re-export main types
pub use error::SimError;
pub use event::{Event, ScheduledEvent};
pub use metrics::{NeighborSnapshot, SimMetrics, SimulationResult};
pub use node::{SimContext, SimNode};
pub use olsr::{Address, Duration, NodeReport, Position, Timestamp};
pub use placement::{in_range_pairs, Placement};
pub use scenario::{chain_scenario, ScenarioBuilder};
pub use sim::Simulator;

#[cfg(test)]
mod tests {
    use olsr::config::{NodeConfig, SmallConfig};
    use olsr::{DebugEvent, Error, RadioRange, TwoHopEntry};

    use super::*;

    /// Bounds no random 12-node scenario can exceed.
    struct RoomyConfig;

    impl NodeConfig for RoomyConfig {
        const MAX_NEIGHBORS: usize = 16;
        const MAX_TWO_HOP: usize = 16 * 15;
    }

    fn addr(n: u64) -> Address {
        Address::new(n)
    }

    #[test]
    fn test_single_node_has_no_neighbors() {
        let result = ScenarioBuilder::new(1)
            .with_seed(42)
            .run_for(Duration::from_secs(20))
            .unwrap();

        let snapshot = result.metrics.latest_snapshot().unwrap();
        assert_eq!(snapshot.neighbors_of(addr(0)), &[] as &[Address]);
        assert!(result.metrics.hello_rounds > 0);
    }

    /// A(0,0) - B(30,0) - C(60,0): A and C only hear B.
    #[test]
    fn test_line_of_three_selects_middle_as_mpr() {
        let (mut sim, nodes) = ScenarioBuilder::new(3)
            .placement(vec![
                Position::new(0.0, 0.0),
                Position::new(30.0, 0.0),
                Position::new(60.0, 0.0),
            ])
            .with_seed(42)
            .build();
        let (a, b, c) = (nodes[0], nodes[1], nodes[2]);

        let result = sim.run_for(Duration::from_secs(30)).unwrap();
        assert!(result.symmetric());
        assert!(result.mpr_coverage_complete());

        let reports = sim.finalize();
        let ra = &reports[0];
        assert_eq!(ra.neighbors, vec![b]);
        assert_eq!(ra.two_hop, vec![TwoHopEntry { via: b, two_hop: c }]);
        assert_eq!(ra.mprs, vec![b]);

        let rc = &reports[2];
        assert_eq!(rc.neighbors, vec![b]);
        assert_eq!(rc.two_hop, vec![TwoHopEntry { via: b, two_hop: a }]);
        assert_eq!(rc.mprs, vec![b]);

        let rb = &reports[1];
        let mut b_neighbors = rb.neighbors.clone();
        b_neighbors.sort();
        assert_eq!(b_neighbors, vec![a, c]);
        assert!(rb.two_hop.is_empty());
        assert!(rb.mprs.is_empty());
    }

    #[test]
    fn test_chain_mprs() {
        let (mut sim, _) = chain_scenario(5).with_seed(7).build();
        let result = sim.run_for(Duration::from_secs(30)).unwrap();

        assert!(result.symmetric());
        assert_eq!(result.final_total_links(), 2 * 4);

        let reports = sim.finalize();
        assert_eq!(reports[0].mprs, vec![addr(1)]);
        assert_eq!(reports[1].mprs, vec![addr(2)]);
        assert_eq!(reports[2].mprs, vec![addr(1), addr(3)]);
        assert_eq!(reports[4].mprs, vec![addr(3)]);
        assert!(reports.iter().all(|r| r.uncovered.is_empty()));
    }

    #[test]
    fn test_in_range_nodes_become_mutual_neighbors() {
        let (mut sim, nodes) = ScenarioBuilder::new(12)
            .with_seed(2024)
            .with_node_config::<RoomyConfig>()
            .build();

        let result = sim.run_for(Duration::from_secs(40)).unwrap();
        assert!(result.symmetric());

        let placed: Vec<_> = nodes
            .iter()
            .filter_map(|&a| sim.node(a).map(|n| (a, n.position())))
            .collect();
        let expected = in_range_pairs(&placed, &RadioRange::default());
        let discovered = result.metrics.latest_snapshot().unwrap().links();
        assert_eq!(discovered, expected);
    }

    #[test]
    fn test_two_hop_tables_never_hold_owner() {
        let (mut sim, _) = ScenarioBuilder::new(10)
            .with_seed(99)
            .with_node_config::<RoomyConfig>()
            .build();
        sim.run_for(Duration::from_secs(30)).unwrap();

        for report in sim.finalize() {
            for (i, entry) in report.two_hop.iter().enumerate() {
                assert_ne!(entry.two_hop, report.address);
                assert_ne!(entry.two_hop, entry.via);
                assert!(report.neighbors.contains(&entry.via));
                assert!(!report.two_hop[i + 1..].contains(entry));
            }
            for mpr in &report.mprs {
                assert!(report.neighbors.contains(mpr));
            }
        }
    }

    #[test]
    fn test_neighbor_overflow_is_reported() {
        let result = ScenarioBuilder::new(6)
            .placement(vec![Position::new(50.0, 50.0); 6])
            .with_node_config::<SmallConfig>()
            .run_for(Duration::from_secs(30));

        let err = result.unwrap_err();
        let SimError::Node { source, .. } = &err;
        assert!(matches!(source, Error::CapacityExceeded { .. }));
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn test_eight_random_nodes_fit_default_bounds() {
        for seed in 0..10 {
            let result = ScenarioBuilder::new(8)
                .with_seed(seed)
                .run_for(Duration::from_secs(60));
            let result = result.unwrap_or_else(|err| panic!("seed {seed}: {err}"));
            assert!(result.symmetric());
            assert!(result.metrics.stable_since().is_some());
        }
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let run = |seed| {
            let (mut sim, _) = ScenarioBuilder::new(8)
                .with_seed(seed)
                .with_node_config::<RoomyConfig>()
                .build();
            let result = sim.run_for(Duration::from_secs(25)).unwrap();
            (sim.finalize(), result.metrics.messages_delivered)
        };

        assert_eq!(run(5), run(5));
    }

    #[test]
    fn test_debug_events_from_simulation() {
        let (mut sim, nodes) = chain_scenario(2).build();
        if let Some(node) = sim.node_mut(nodes[0]) {
            node.enable_debug();
        }
        sim.run_for(Duration::from_secs(15)).unwrap();

        let events = sim
            .node_mut(nodes[0])
            .map(SimNode::take_debug_events)
            .unwrap_or_default();
        assert!(events
            .iter()
            .any(|e| matches!(e, DebugEvent::HelloSent { .. })));
        assert!(events.iter().any(
            |e| matches!(e, DebugEvent::HelloAccepted { originator, .. } if *originator == nodes[1])
        ));
        assert!(events.windows(2).all(|w| w[0].timestamp() <= w[1].timestamp()));
    }
}
