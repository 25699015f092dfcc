//! Messages exchanged through the scheduler.

use std::sync::Arc;

use crate::types::{Address, Position};

/// Link-sensing broadcast describing the originator's one-hop neighbors.
#[derive(Debug, Clone, PartialEq)]
pub struct HelloMessage {
    /// Node that built the HELLO.
    pub originator: Address,
    /// Originator position, used by receivers for the range check.
    pub sender_position: Position,
    /// Originator's neighbor table at emission time, in table order.
    pub neighbors: Vec<Address>,
}

/// One hop of the chained relay that carries a HELLO to every node.
///
/// The payload is shared, never copied, so relaying nodes cannot alter what
/// later hops receive.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayEnvelope {
    pub payload: Arc<HelloMessage>,
    /// Position of the receiving node in the global node ordering.
    pub hop_index: usize,
}

impl RelayEnvelope {
    pub fn new(payload: Arc<HelloMessage>, hop_index: usize) -> Self {
        Self { payload, hop_index }
    }

    /// Envelope for the following hop, carrying the same payload.
    pub fn next_hop(&self) -> Self {
        Self {
            payload: Arc::clone(&self.payload),
            hop_index: self.hop_index + 1,
        }
    }
}

/// Everything a node can be asked to handle.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Self-addressed timer: emit a HELLO now.
    HelloTx,
    /// A HELLO arriving over the relay chain.
    HelloRx(RelayEnvelope),
}

impl Message {
    /// Short name for logs and counters.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::HelloTx => "hello_tx",
            Message::HelloRx(_) => "hello_rx",
        }
    }
}
