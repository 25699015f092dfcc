//! Discrete event simulator for olsr networks.

use std::collections::BinaryHeap;
use std::marker::PhantomData;

use olsr::config::{DefaultConfig, NodeConfig};
use olsr::{Address, Duration, Message, NodeReport, Position, Timestamp, RANGE};
use tracing::{error, warn};

use crate::error::SimError;
use crate::event::{Event, ScheduledEvent, SequenceNumber};
use crate::metrics::{NeighborSnapshot, SimMetrics, SimulationResult};
use crate::node::SimNode;

/// Discrete event simulator for olsr networks.
///
/// Nodes get sequential addresses in registration order, and that order is
/// the relay ordering every HELLO walks through.
pub struct Simulator<C: NodeConfig = DefaultConfig> {
    /// Nodes indexed by address.
    nodes: Vec<SimNode<C>>,
    /// Relay ordering.
    order: Vec<Address>,
    /// Root seed for every node's random stream.
    seed: u64,
    /// Radio range given to new nodes.
    range: f64,
    current_time: Timestamp,
    event_queue: BinaryHeap<ScheduledEvent>,
    metrics: SimMetrics,
    next_seq: u64,
    snapshot_interval: Option<Duration>,
    next_snapshot: Option<Timestamp>,
    _config: PhantomData<C>,
}

impl Simulator<DefaultConfig> {
    /// Create a simulator with the default table bounds.
    pub fn new(seed: u64) -> Self {
        Self::with_seed(seed)
    }
}

impl<C: NodeConfig> Simulator<C> {
    /// Create a simulator for nodes with bounds `C`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            nodes: Vec::new(),
            order: Vec::new(),
            seed,
            range: RANGE,
            current_time: Timestamp::ZERO,
            event_queue: BinaryHeap::new(),
            metrics: SimMetrics::new(),
            next_seq: 0,
            snapshot_interval: None,
            next_snapshot: None,
            _config: PhantomData,
        }
    }

    /// Radio range for nodes added after this call.
    pub fn with_range(mut self, range: f64) -> Self {
        self.range = range;
        self
    }

    /// Set the snapshot interval for automatic neighbor state recording.
    pub fn with_snapshot_interval(mut self, interval: Duration) -> Self {
        self.snapshot_interval = Some(interval);
        self.next_snapshot = Some(self.current_time + interval);
        self
    }

    /// Add a node that draws its own position.
    pub fn add_node(&mut self) -> Address {
        let address = self.next_address();
        self.order.push(address);
        let node = SimNode::random(address, self.seed, self.range, &self.order);
        self.register(node)
    }

    /// Add a node at a fixed position.
    pub fn add_node_at(&mut self, position: Position) -> Address {
        let address = self.next_address();
        self.order.push(address);
        let node = SimNode::placed(address, position, self.seed, self.range, &self.order);
        self.register(node)
    }

    fn next_address(&self) -> Address {
        Address::new(self.nodes.len() as u64)
    }

    fn register(&mut self, node: SimNode<C>) -> Address {
        let address = node.address();
        self.nodes.push(node);
        self.collect_outgoing(address);
        address
    }

    pub fn node(&self, address: Address) -> Option<&SimNode<C>> {
        self.nodes.get(Self::index(address)?)
    }

    pub fn node_mut(&mut self, address: Address) -> Option<&mut SimNode<C>> {
        self.nodes.get_mut(Self::index(address)?)
    }

    fn index(address: Address) -> Option<usize> {
        usize::try_from(address.raw()).ok()
    }

    /// Addresses in relay order.
    pub fn addresses(&self) -> &[Address] {
        &self.order
    }

    pub fn current_time(&self) -> Timestamp {
        self.current_time
    }

    pub fn metrics(&self) -> &SimMetrics {
        &self.metrics
    }

    /// Schedule an event.
    pub fn schedule(&mut self, time: Timestamp, event: Event) {
        let seq = SequenceNumber::new(self.next_seq);
        self.next_seq += 1;
        self.event_queue.push(ScheduledEvent::new(time, seq, event));
    }

    /// Schedule a snapshot at a specific time.
    pub fn schedule_snapshot(&mut self, time: Timestamp) {
        self.schedule(time, Event::TakeSnapshot);
    }

    /// Run simulation until the specified time.
    ///
    /// Stops at the first fatal node error.
    pub fn run_until(&mut self, end_time: Timestamp) -> Result<SimulationResult, SimError> {
        while self
            .event_queue
            .peek()
            .is_some_and(|event| event.time <= end_time)
        {
            let Some(event) = self.event_queue.pop() else {
                break;
            };
            self.advance_time(event.time);
            self.process_event(event.event)?;
            self.maybe_take_snapshot();
        }

        // Advance to end_time even if no more events
        self.advance_time(end_time);
        self.take_snapshot();

        Ok(self.result())
    }

    /// Run simulation for the specified duration.
    pub fn run_for(&mut self, duration: Duration) -> Result<SimulationResult, SimError> {
        self.run_until(self.current_time + duration)
    }

    /// Run until the event queue is empty or `max_events` were processed.
    pub fn run_events(&mut self, max_events: usize) -> Result<SimulationResult, SimError> {
        let mut processed = 0;

        while processed < max_events {
            let Some(event) = self.event_queue.pop() else {
                break;
            };
            self.advance_time(event.time);
            self.process_event(event.event)?;
            processed += 1;
            self.maybe_take_snapshot();
        }

        self.take_snapshot();
        Ok(self.result())
    }

    /// Final report of every node, in relay order.
    pub fn finalize(&self) -> Vec<NodeReport> {
        self.nodes.iter().map(SimNode::finalize).collect()
    }

    fn result(&self) -> SimulationResult {
        SimulationResult {
            end_time: self.current_time,
            metrics: self.metrics.clone(),
            queue_exhausted: self.event_queue.is_empty(),
        }
    }

    fn advance_time(&mut self, time: Timestamp) {
        if time > self.current_time {
            self.current_time = time;
        }
    }

    fn process_event(&mut self, event: Event) -> Result<(), SimError> {
        match event {
            Event::Deliver { to, message } => self.deliver(to, message),
            Event::TakeSnapshot => {
                self.take_snapshot();
                Ok(())
            }
        }
    }

    fn deliver(&mut self, to: Address, message: Message) -> Result<(), SimError> {
        let now = self.current_time;
        let Some(node) = Self::index(to).and_then(|idx| self.nodes.get_mut(idx)) else {
            warn!(to = %to, kind = message.kind(), "delivery to unknown node dropped");
            self.metrics.messages_dropped += 1;
            return Ok(());
        };

        match &message {
            Message::HelloTx => self.metrics.hello_rounds += 1,
            Message::HelloRx(_) => self.metrics.relay_hops += 1,
        }
        self.metrics.messages_delivered += 1;

        if let Err(source) = node.handle(&message, now, &self.order) {
            error!(node = %to, %now, error = %source, "fatal node error");
            return Err(SimError::Node {
                address: to,
                source,
            });
        }

        self.collect_outgoing(to);
        Ok(())
    }

    /// Move a node's requested deliveries into the event queue.
    fn collect_outgoing(&mut self, sender: Address) {
        let outgoing = match self.node_mut(sender) {
            Some(node) => node.take_outgoing(),
            None => return,
        };

        let now = self.current_time;
        for out in outgoing {
            self.metrics.messages_scheduled += 1;
            self.schedule(
                now + out.delay,
                Event::Deliver {
                    to: out.target,
                    message: out.message,
                },
            );
        }
    }

    fn maybe_take_snapshot(&mut self) {
        if let Some(next) = self.next_snapshot {
            if self.current_time >= next {
                self.take_snapshot();
                if let Some(interval) = self.snapshot_interval {
                    self.next_snapshot = Some(next + interval);
                }
            }
        }
    }

    /// Record every node's neighbor and MPR state.
    pub fn take_snapshot(&mut self) {
        let mut snapshot = NeighborSnapshot::new(self.current_time);
        for node in &self.nodes {
            snapshot.record_node(
                node.address(),
                node.neighbor_addresses(),
                node.mpr_addresses(),
                node.inner().uncovered().to_vec(),
            );
        }
        self.metrics.add_snapshot(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use olsr::config::SmallConfig;
    use olsr::{Error, Table};

    use super::*;

    #[test]
    fn test_simulator_creation() {
        let sim = Simulator::new(42);
        assert_eq!(sim.current_time(), Timestamp::ZERO);
        assert!(sim.addresses().is_empty());
    }

    #[test]
    fn test_add_nodes_sequential_addresses() {
        let mut sim = Simulator::new(42);
        let a = sim.add_node();
        let b = sim.add_node_at(Position::new(5.0, 5.0));

        assert_eq!(a, Address::new(0));
        assert_eq!(b, Address::new(1));
        assert_eq!(sim.addresses(), &[a, b]);
        assert_eq!(sim.node(b).map(SimNode::position), Some(Position::new(5.0, 5.0)));
        assert!(sim.node(Address::new(2)).is_none());
        // One armed HELLO timer per node.
        assert_eq!(sim.metrics().messages_scheduled, 2);
    }

    #[test]
    fn test_run_single_node() {
        let mut sim = Simulator::new(42);
        let a = sim.add_node();

        let result = sim.run_for(Duration::from_secs(20)).unwrap();

        assert_eq!(result.end_time, Timestamp::from_secs(20));
        // Stagger < 10 s, then every 2 s.
        assert!(result.metrics.hello_rounds >= 5);
        let node = sim.node(a).unwrap();
        assert!(node.neighbor_addresses().is_empty());
        // Every HELLO comes back to its only node as an echo.
        assert!(node.inner().metrics().self_echoes >= 4);
        assert_eq!(node.inner().metrics().hellos_relayed, 0);
    }

    #[test]
    fn test_two_nodes_in_range() {
        let mut sim = Simulator::new(1);
        let a = sim.add_node_at(Position::new(10.0, 10.0));
        let b = sim.add_node_at(Position::new(20.0, 20.0));

        let result = sim.run_for(Duration::from_secs(15)).unwrap();

        assert!(result.symmetric());
        assert_eq!(sim.node(a).unwrap().neighbor_addresses(), vec![b]);
        assert_eq!(sim.node(b).unwrap().neighbor_addresses(), vec![a]);
        assert_eq!(result.final_total_links(), 2);
    }

    #[test]
    fn test_with_range_limits_links() {
        let mut sim = Simulator::new(1).with_range(5.0);
        sim.add_node_at(Position::new(10.0, 10.0));
        sim.add_node_at(Position::new(20.0, 20.0));

        let result = sim.run_for(Duration::from_secs(15)).unwrap();
        assert_eq!(result.final_total_links(), 0);
    }

    #[test]
    fn test_snapshot_interval() {
        let mut sim = Simulator::new(3).with_snapshot_interval(Duration::from_secs(1));
        sim.add_node_at(Position::new(0.0, 0.0));
        sim.schedule_snapshot(Timestamp::from_millis(2500));

        let result = sim.run_for(Duration::from_secs(12)).unwrap();
        assert!(result.metrics.snapshots.len() >= 2);
        assert!(result
            .metrics
            .snapshots
            .iter()
            .any(|s| s.time == Timestamp::from_millis(2500)));
    }

    #[test]
    fn test_run_events_bounded() {
        let mut sim = Simulator::new(9);
        sim.add_node_at(Position::new(0.0, 0.0));
        sim.add_node_at(Position::new(1.0, 0.0));

        let result = sim.run_events(5).unwrap();
        assert_eq!(result.metrics.messages_delivered, 5);
        assert!(!result.queue_exhausted);
    }

    #[test]
    fn test_unknown_target_dropped() {
        let mut sim = Simulator::new(1);
        sim.schedule(
            Timestamp::from_secs(1),
            Event::Deliver {
                to: Address::new(99),
                message: Message::HelloTx,
            },
        );
        let result = sim.run_for(Duration::from_secs(2)).unwrap();
        assert_eq!(result.metrics.messages_dropped, 1);
        assert_eq!(result.metrics.messages_delivered, 0);
    }

    #[test]
    fn test_overflow_stops_run() {
        let mut sim: Simulator<SmallConfig> = Simulator::with_seed(5);
        for _ in 0..6 {
            sim.add_node_at(Position::new(50.0, 50.0));
        }

        let err = sim.run_for(Duration::from_secs(30)).unwrap_err();
        let SimError::Node { source, .. } = err;
        assert!(matches!(
            source,
            Error::CapacityExceeded {
                table: Table::Neighbors | Table::TwoHop,
                ..
            }
        ));
    }
}
