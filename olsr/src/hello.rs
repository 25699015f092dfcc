//! HELLO emission, relay and processing.
//!
//! A HELLO travels as a chained relay over the global node ordering: every
//! node that receives hop `k` forwards hop `k + 1`, whether or not it can use
//! the contents. Only after forwarding does the node decide whether the
//! HELLO means anything to it:
//!
//! 1. its own HELLO coming back is ignored,
//! 2. a HELLO from outside radio range is ignored,
//! 3. otherwise the originator becomes a neighbor, the originator's neighbor
//!    list becomes two-hop entries through it, and the MPR set is recomputed.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::adapter::SchedulerAdapter;
use crate::config::NodeConfig;
use crate::debug::DebugEvent;
use crate::message::{HelloMessage, RelayEnvelope};
use crate::mpr::select_mprs;
use crate::node::Node;
use crate::time::Timestamp;
use crate::traits::Scheduler;
use crate::types::{Error, HELLO_INTERVAL};

impl<C: NodeConfig> Node<C> {
    /// Emit a HELLO describing the current neighbor table and re-arm the timer.
    pub(crate) fn handle_hello_tx<S: Scheduler>(&mut self, now: Timestamp, scheduler: &mut S) {
        let hello = Arc::new(HelloMessage {
            originator: self.address,
            sender_position: self.position,
            neighbors: self.neighbors.addresses().collect(),
        });
        let neighbor_count = hello.neighbors.len();

        let mut adapter = SchedulerAdapter::new(scheduler);
        adapter.start_relay(hello);
        adapter.schedule_hello_tx(self.address, HELLO_INTERVAL);

        self.metrics.hellos_sent += 1;
        debug!(node = %self.address, %now, neighbor_count, "HELLO sent");
        emit_debug!(
            self,
            DebugEvent::HelloSent {
                timestamp: now,
                neighbor_count,
            }
        );
    }

    /// Relay a received HELLO, then merge it if usable.
    pub(crate) fn handle_hello_rx<S: Scheduler>(
        &mut self,
        envelope: &RelayEnvelope,
        now: Timestamp,
        scheduler: &mut S,
    ) -> Result<(), Error> {
        self.metrics.hellos_received += 1;
        let hello = &envelope.payload;

        // Forwarding does not depend on range or origin.
        if SchedulerAdapter::new(scheduler).continue_relay(envelope) {
            self.metrics.hellos_relayed += 1;
            trace!(
                node = %self.address,
                originator = %hello.originator,
                hop = envelope.hop_index + 1,
                "HELLO relayed"
            );
            emit_debug!(
                self,
                DebugEvent::HelloRelayed {
                    timestamp: now,
                    originator: hello.originator,
                    hop_index: envelope.hop_index + 1,
                }
            );
        }

        if hello.originator == self.address {
            self.metrics.self_echoes += 1;
            trace!(node = %self.address, "own HELLO echoed");
            emit_debug!(self, DebugEvent::SelfEcho { timestamp: now });
            return Ok(());
        }

        if !self.range.in_range(&self.position, &hello.sender_position) {
            self.metrics.out_of_range += 1;
            let distance = self.position.distance_to(&hello.sender_position);
            trace!(
                node = %self.address,
                originator = %hello.originator,
                distance,
                "HELLO out of range"
            );
            emit_debug!(
                self,
                DebugEvent::OutOfRange {
                    timestamp: now,
                    originator: hello.originator,
                    distance,
                }
            );
            return Ok(());
        }

        self.accept_hello(hello, now)
    }

    fn accept_hello(&mut self, hello: &HelloMessage, now: Timestamp) -> Result<(), Error> {
        let new_neighbor = self.neighbors.insert(hello.originator)?;

        let mut new_two_hop = 0;
        for &two_hop in &hello.neighbors {
            if self
                .two_hop
                .insert(&self.neighbors, hello.originator, two_hop)?
            {
                new_two_hop += 1;
            }
        }

        self.metrics.hellos_accepted += 1;
        debug!(
            node = %self.address,
            originator = %hello.originator,
            new_neighbor,
            new_two_hop,
            "HELLO accepted"
        );
        emit_debug!(
            self,
            DebugEvent::HelloAccepted {
                timestamp: now,
                originator: hello.originator,
                new_neighbor,
                new_two_hop,
            }
        );

        self.recompute_mprs(now);
        Ok(())
    }

    fn recompute_mprs(&mut self, now: Timestamp) {
        let selection = select_mprs(&self.neighbors, &self.two_hop);
        self.metrics.mpr_recomputations += 1;

        if !selection.is_complete() {
            self.metrics.mpr_incomplete += 1;
            emit_debug!(
                self,
                DebugEvent::MprIncomplete {
                    timestamp: now,
                    uncovered: selection.uncovered.clone(),
                }
            );
        }
        emit_debug!(
            self,
            DebugEvent::MprRecomputed {
                timestamp: now,
                mprs: selection.mprs.as_slice().to_vec(),
            }
        );

        self.mprs = selection.mprs;
        self.uncovered = selection.uncovered;
    }
}
