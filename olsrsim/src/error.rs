//! Simulation errors.

use olsr::Address;
use thiserror::Error;

/// A run stopped early.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A node hit a fatal protocol error while handling a message.
    #[error("node {address} failed: {source}")]
    Node {
        address: Address,
        source: olsr::Error,
    },
}

impl SimError {
    /// Address of the node that failed.
    pub fn address(&self) -> Address {
        match self {
            SimError::Node { address, .. } => *address,
        }
    }
}
