//! The scheduler contract.
//!
//! The protocol core does not own time, randomness or the set of nodes. A
//! scheduler (a discrete-event simulator, or anything that can deliver
//! messages in causal order) provides them through [`Scheduler`]. Handlers
//! receive a `&mut` scheduler for the duration of one call and use it for
//! every side effect that leaves the node.

use crate::message::Message;
use crate::time::Duration;
use crate::types::Address;

/// Services a node consumes from the scheduler that drives it.
///
/// Random draws come from the calling node's own stream, so results do not
/// depend on how nodes are spread across workers.
pub trait Scheduler {
    /// Deliver `message` to `target` after `delay` of virtual time.
    fn schedule(&mut self, target: Address, message: Message, delay: Duration);

    /// Uniform draw in `[0, 1)`.
    fn random_uniform(&mut self) -> f64;

    /// Exponential draw with the given mean, always `>= 0`.
    fn random_exponential(&mut self, mean: f64) -> f64 {
        let u = self.random_uniform();
        // 1 - u is in (0, 1], so the log is finite.
        -mean * (1.0 - u).ln()
    }

    /// Number of nodes in the global ordering.
    fn node_count(&self) -> usize;

    /// Address at `index` in the global ordering.
    fn node_at(&self, index: usize) -> Option<Address>;
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_impls {
    //! Mock scheduler for unit tests and doc tests.
    //!
    //! Available when running tests or with the `test-support` feature enabled.

    use std::collections::VecDeque;

    use super::*;

    /// A scheduling request captured by [`MockScheduler`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct Scheduled {
        pub target: Address,
        pub message: Message,
        pub delay: Duration,
    }

    /// Records scheduled messages instead of delivering them.
    ///
    /// Uniform draws come from values queued with [`push_uniform`](Self::push_uniform),
    /// then from a deterministic LCG.
    pub struct MockScheduler {
        order: Vec<Address>,
        scheduled: Vec<Scheduled>,
        uniforms: VecDeque<f64>,
        state: u64,
    }

    impl MockScheduler {
        /// Ordering of `count` nodes addressed `0..count`.
        pub fn with_nodes(count: u64) -> Self {
            Self::with_order((0..count).map(Address::new).collect())
        }

        pub fn with_order(order: Vec<Address>) -> Self {
            Self {
                order,
                scheduled: Vec::new(),
                uniforms: VecDeque::new(),
                state: 12345,
            }
        }

        /// Queue the next value returned by `random_uniform`.
        pub fn push_uniform(&mut self, value: f64) -> &mut Self {
            self.uniforms.push_back(value);
            self
        }

        /// Take everything scheduled so far.
        pub fn take_scheduled(&mut self) -> Vec<Scheduled> {
            std::mem::take(&mut self.scheduled)
        }

        pub fn scheduled(&self) -> &[Scheduled] {
            &self.scheduled
        }
    }

    impl Scheduler for MockScheduler {
        fn schedule(&mut self, target: Address, message: Message, delay: Duration) {
            self.scheduled.push(Scheduled {
                target,
                message,
                delay,
            });
        }

        fn random_uniform(&mut self) -> f64 {
            if let Some(value) = self.uniforms.pop_front() {
                return value;
            }
            self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
            (self.state >> 11) as f64 / (1u64 << 53) as f64
        }

        fn node_count(&self) -> usize {
            self.order.len()
        }

        fn node_at(&self, index: usize) -> Option<Address> {
            self.order.get(index).copied()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_impls::MockScheduler;
    use super::*;

    #[test]
    fn test_exponential_from_uniform() {
        let mut sched = MockScheduler::with_nodes(1);
        sched.push_uniform(0.0).push_uniform(1.0 - (-1.0f64).exp());
        assert_eq!(sched.random_exponential(0.2), 0.0);
        let draw = sched.random_exponential(0.2);
        assert!((draw - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_stays_in_unit_interval() {
        let mut sched = MockScheduler::with_nodes(1);
        for _ in 0..1000 {
            let u = sched.random_uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_node_ordering() {
        let sched = MockScheduler::with_order(vec![Address::new(7), Address::new(3)]);
        assert_eq!(sched.node_count(), 2);
        assert_eq!(sched.node_at(1), Some(Address::new(3)));
        assert_eq!(sched.node_at(2), None);
    }
}
