//! Core types and constants for the OLSR model.

use core::fmt;

use thiserror::Error;

use crate::time::Duration;

// Timing
pub const HELLO_INTERVAL: Duration = Duration::from_secs(2);
pub const STAGGER_MAX: Duration = Duration::from_secs(10);
/// Mean of the exponential per-hop relay delay, in seconds.
pub const HELLO_DELTA_SECS: f64 = 0.2;

// Geometry
/// Side of the square area positions are drawn from.
pub const GRID_MAX: f64 = 100.0;
/// Hearing range of every radio.
pub const RANGE: f64 = 40.0;

/// Node address, assigned once by the scheduler and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub u64);

impl Address {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Address(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for Address {
    fn from(raw: u64) -> Self {
        Address(raw)
    }
}

/// Fixed (longitude, latitude) of a node, used only for range checks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
}

impl Position {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.lng - other.lng;
        let dy = self.lat - other.lat;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Link state of a one-hop neighbor. Only symmetric links are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStatus {
    #[default]
    Symmetric,
}

/// One row of the one-hop neighbor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborEntry {
    pub address: Address,
    pub status: LinkStatus,
}

/// One row of the two-hop neighbor set: `two_hop` is heard through `via`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TwoHopEntry {
    pub via: Address,
    pub two_hop: Address,
}

/// Identifies which bounded table overflowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Neighbors,
    TwoHop,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Neighbors => f.write_str("neighbor table"),
            Table::TwoHop => f.write_str("two-hop table"),
        }
    }
}

/// Errors raised by the protocol core.
///
/// Any error is fatal to the node that raised it: the topology exceeded the
/// bounds the node was configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{table} capacity of {capacity} entries exceeded")]
    CapacityExceeded { table: Table, capacity: usize },
}
