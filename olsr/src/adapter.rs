//! Protocol actions expressed as scheduler requests.
//!
//! [`SchedulerAdapter`] is the only place that knows how a HELLO becomes
//! scheduled deliveries: the periodic self-timer, and the chained relay that
//! walks the global node ordering one hop at a time. It holds nothing but a
//! borrow of the scheduler for the duration of one handler call.

use std::sync::Arc;

use crate::message::{HelloMessage, Message, RelayEnvelope};
use crate::time::Duration;
use crate::traits::Scheduler;
use crate::types::{Address, HELLO_DELTA_SECS};

pub struct SchedulerAdapter<'a, S: Scheduler> {
    scheduler: &'a mut S,
}

impl<'a, S: Scheduler> SchedulerAdapter<'a, S> {
    pub fn new(scheduler: &'a mut S) -> Self {
        Self { scheduler }
    }

    /// Arm the HELLO timer of `node` to fire after `delay`.
    pub fn schedule_hello_tx(&mut self, node: Address, delay: Duration) {
        self.scheduler.schedule(node, Message::HelloTx, delay);
    }

    /// Send hop 0 of a new relay chain to the first node in the ordering.
    ///
    /// Returns `false` if the ordering is empty and nothing was scheduled.
    pub fn start_relay(&mut self, hello: Arc<HelloMessage>) -> bool {
        self.send_hop(RelayEnvelope::new(hello, 0))
    }

    /// Forward `envelope` to the next node in the ordering.
    ///
    /// Returns `false` at the end of the chain.
    pub fn continue_relay(&mut self, envelope: &RelayEnvelope) -> bool {
        if self.is_last_hop(envelope.hop_index) {
            return false;
        }
        self.send_hop(envelope.next_hop())
    }

    /// Whether `hop_index` addresses the last node in the ordering.
    pub fn is_last_hop(&self, hop_index: usize) -> bool {
        hop_index.saturating_add(1) >= self.scheduler.node_count()
    }

    pub fn uniform(&mut self) -> f64 {
        self.scheduler.random_uniform()
    }

    pub fn exponential(&mut self, mean: f64) -> f64 {
        self.scheduler.random_exponential(mean)
    }

    fn send_hop(&mut self, envelope: RelayEnvelope) -> bool {
        let Some(target) = self.scheduler.node_at(envelope.hop_index) else {
            return false;
        };
        let delay = Duration::from_secs_f64(self.exponential(HELLO_DELTA_SECS));
        self.scheduler
            .schedule(target, Message::HelloRx(envelope), delay);
        true
    }
}
