//! Radio range model.

use crate::types::{Position, RANGE};

/// Fixed-radius hearing model: two radios hear each other when their
/// Euclidean distance is at most `range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadioRange {
    range: f64,
}

impl Default for RadioRange {
    fn default() -> Self {
        Self { range: RANGE }
    }
}

impl RadioRange {
    pub fn new(range: f64) -> Self {
        Self { range }
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    /// Whether a transmission from `other` is usable at `own`.
    pub fn in_range(&self, own: &Position, other: &Position) -> bool {
        own.distance_to(other) <= self.range
    }
}
