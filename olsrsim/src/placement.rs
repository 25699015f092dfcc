//! Node placement and the radio graph it implies.

use hashbrown::HashSet;
use olsr::{Address, Position, RadioRange};

/// Where nodes are put when a scenario is built.
#[derive(Debug, Clone, Default)]
pub enum Placement {
    /// Each node draws its own position on the grid.
    #[default]
    Random,
    /// Fixed positions, by registration order.
    Explicit(Vec<Position>),
    /// Nodes on the x axis, `spacing` apart, starting at the origin.
    Chain { spacing: f64 },
    /// Row-major grid with `columns` nodes per row.
    Grid { columns: usize, spacing: f64 },
}

impl Placement {
    /// Position of the `index`-th node, or `None` if the node draws its own.
    ///
    /// Explicit placements return `None` past the last given position.
    pub fn position(&self, index: usize) -> Option<Position> {
        match self {
            Placement::Random => None,
            Placement::Explicit(positions) => positions.get(index).copied(),
            Placement::Chain { spacing } => Some(Position::new(index as f64 * spacing, 0.0)),
            Placement::Grid { columns, spacing } => {
                let columns = (*columns).max(1);
                let col = index % columns;
                let row = index / columns;
                Some(Position::new(col as f64 * spacing, row as f64 * spacing))
            }
        }
    }
}

/// Unordered pairs of nodes within radio range of each other.
///
/// This is the graph a converged network should have discovered.
pub fn in_range_pairs(
    nodes: &[(Address, Position)],
    range: &RadioRange,
) -> HashSet<(Address, Address)> {
    let mut pairs = HashSet::new();
    for (i, &(a, pa)) in nodes.iter().enumerate() {
        for &(b, pb) in nodes.iter().skip(i + 1) {
            if range.in_range(&pa, &pb) {
                pairs.insert(canonical(a, b));
            }
        }
    }
    pairs
}

/// Pair with the lower address first.
pub fn canonical(a: Address, b: Address) -> (Address, Address) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
