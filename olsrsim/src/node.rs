//! SimNode wrapper for simulated olsr nodes.
//!
//! Each node carries its own random stream and an outbox. While a handler
//! runs, a [`SimContext`] lends the node's stream and outbox to the protocol
//! as its [`Scheduler`], together with a read-only view of the node ordering.
//! The simulator drains the outbox into its event queue afterwards.

use olsr::config::{DefaultConfig, NodeConfig};
use olsr::{Address, Message, Node, NodeReport, Position, Scheduler, Timestamp};
use olsr::{DebugEvent, Duration};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A delivery requested by a node, not yet queued.
#[derive(Debug, Clone)]
pub struct Outgoing {
    pub target: Address,
    pub message: Message,
    pub delay: Duration,
}

/// Random stream for one node: the simulation seed, with the address as the
/// ChaCha stream id so streams never overlap.
pub fn node_rng(seed: u64, address: Address) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(address.raw());
    rng
}

/// The simulator as seen by one node during one handler call.
pub struct SimContext<'a> {
    order: &'a [Address],
    rng: &'a mut ChaCha8Rng,
    outbox: &'a mut Vec<Outgoing>,
}

impl Scheduler for SimContext<'_> {
    fn schedule(&mut self, target: Address, message: Message, delay: Duration) {
        self.outbox.push(Outgoing {
            target,
            message,
            delay,
        });
    }

    fn random_uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn node_count(&self) -> usize {
        self.order.len()
    }

    fn node_at(&self, index: usize) -> Option<Address> {
        self.order.get(index).copied()
    }
}

/// A simulated node.
pub struct SimNode<C: NodeConfig = DefaultConfig> {
    inner: Node<C>,
    rng: ChaCha8Rng,
    outbox: Vec<Outgoing>,
}

impl<C: NodeConfig> SimNode<C> {
    /// Create a node at a position drawn from its own stream and arm its
    /// first HELLO.
    pub fn random(address: Address, seed: u64, range: f64, order: &[Address]) -> Self {
        let mut rng = node_rng(seed, address);
        let mut outbox = Vec::new();
        let inner = {
            let mut ctx = SimContext {
                order,
                rng: &mut rng,
                outbox: &mut outbox,
            };
            Node::initialize(address, &mut ctx).with_range(range)
        };
        Self { inner, rng, outbox }
    }

    /// Create a node at a fixed position and arm its first HELLO.
    pub fn placed(
        address: Address,
        position: Position,
        seed: u64,
        range: f64,
        order: &[Address],
    ) -> Self {
        let mut node = Self {
            inner: Node::new(address, position).with_range(range),
            rng: node_rng(seed, address),
            outbox: Vec::new(),
        };
        let mut ctx = SimContext {
            order,
            rng: &mut node.rng,
            outbox: &mut node.outbox,
        };
        node.inner.start(&mut ctx);
        node
    }

    /// Handle one delivered message.
    pub fn handle(
        &mut self,
        message: &Message,
        now: Timestamp,
        order: &[Address],
    ) -> Result<(), olsr::Error> {
        let mut ctx = SimContext {
            order,
            rng: &mut self.rng,
            outbox: &mut self.outbox,
        };
        self.inner.on_message(message, now, &mut ctx)
    }

    /// Take all deliveries requested since the last call.
    pub fn take_outgoing(&mut self) -> Vec<Outgoing> {
        std::mem::take(&mut self.outbox)
    }

    pub fn address(&self) -> Address {
        self.inner.address()
    }

    pub fn position(&self) -> Position {
        self.inner.position()
    }

    /// One-hop neighbors in insertion order.
    pub fn neighbor_addresses(&self) -> Vec<Address> {
        self.inner.neighbors().addresses().collect()
    }

    pub fn mpr_addresses(&self) -> Vec<Address> {
        self.inner.mprs().as_slice().to_vec()
    }

    pub fn inner(&self) -> &Node<C> {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut Node<C> {
        &mut self.inner
    }

    pub fn finalize(&self) -> NodeReport {
        self.inner.finalize()
    }

    pub fn enable_debug(&mut self) {
        self.inner.enable_debug();
    }

    pub fn take_debug_events(&mut self) -> Vec<DebugEvent> {
        self.inner.take_debug_events()
    }
}

#[cfg(test)]
mod tests {
    use olsr::traits::test_impls::MockScheduler;

    use super::*;

    type TestNode = SimNode<DefaultConfig>;

    fn order(n: u64) -> Vec<Address> {
        (0..n).map(Address::new).collect()
    }

    #[test]
    fn test_streams_differ_per_address() {
        let mut a = node_rng(7, Address::new(0));
        let mut b = node_rng(7, Address::new(1));
        let xs: Vec<u64> = (0..4).map(|_| a.gen()).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.gen()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_random_node_is_reproducible() {
        let order = order(2);
        let a = TestNode::random(Address::new(1), 42, 40.0, &order);
        let b = TestNode::random(Address::new(1), 42, 40.0, &order);
        assert_eq!(a.position(), b.position());
    }

    #[test]
    fn test_start_arms_hello_timer() {
        let order = order(1);
        let mut node = TestNode::placed(Address::new(0), Position::new(1.0, 1.0), 1, 40.0, &order);
        let out = node.take_outgoing();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].target, Address::new(0));
        assert_eq!(out[0].message, Message::HelloTx);
        assert!(out[0].delay < olsr::STAGGER_MAX);
        assert!(node.take_outgoing().is_empty());
    }

    #[test]
    fn test_handle_hello_tx_queues_relay() {
        let order = order(3);
        let mut node = TestNode::placed(Address::new(1), Position::new(1.0, 1.0), 1, 40.0, &order);
        node.take_outgoing();

        node.handle(&Message::HelloTx, Timestamp::from_secs(3), &order)
            .unwrap();
        let out = node.take_outgoing();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].target, Address::new(0));
        assert!(matches!(out[0].message, Message::HelloRx(_)));
        assert_eq!(out[1].message, Message::HelloTx);
    }

    #[test]
    fn test_context_requests_match_mock_scheduler() {
        let order = order(3);
        let position = Position::new(12.0, 7.0);
        let now = Timestamp::from_secs(5);

        let mut sim_node = TestNode::placed(Address::new(1), position, 9, olsr::RANGE, &order);
        sim_node.take_outgoing();
        sim_node.handle(&Message::HelloTx, now, &order).unwrap();
        let through_context: Vec<(Address, Message)> = sim_node
            .take_outgoing()
            .into_iter()
            .map(|o| (o.target, o.message))
            .collect();

        let mut mock = MockScheduler::with_order(order.clone());
        let mut node: Node = Node::new(Address::new(1), position);
        node.on_message(&Message::HelloTx, now, &mut mock).unwrap();
        let through_mock: Vec<(Address, Message)> = mock
            .take_scheduled()
            .into_iter()
            .map(|s| (s.target, s.message))
            .collect();

        assert_eq!(through_context, through_mock);
        assert_eq!(through_context.len(), 2);
    }
}
