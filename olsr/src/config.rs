//! Compile-time configuration for table bounds.
//!
//! Every node table is bounded. The `NodeConfig` trait fixes those bounds per
//! node type so a simulated topology that outgrows them fails loudly instead of
//! silently dropping entries.
//!
//! | Config | `MAX_NEIGHBORS` | `MAX_TWO_HOP` |
//! |--------|----------------:|--------------:|
//! | `DefaultConfig` | 16 | 48 |
//! | `SmallConfig` | 4 | 12 |
//!
//! # Example
//!
//! ```
//! use olsr::config::NodeConfig;
//!
//! struct DenseConfig;
//! impl NodeConfig for DenseConfig {
//!     const MAX_NEIGHBORS: usize = 64;
//! }
//!
//! assert_eq!(DenseConfig::MAX_TWO_HOP, 192);
//! ```

/// Configuration trait for table bounds. All bounds must be non-zero.
pub trait NodeConfig {
    /// Maximum one-hop neighbors, and so the longest HELLO neighbor list.
    const MAX_NEIGHBORS: usize;

    /// Maximum (neighbor, two-hop neighbor) pairs.
    const MAX_TWO_HOP: usize = 3 * Self::MAX_NEIGHBORS;
}

/// Bounds of the reference model.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConfig;

impl NodeConfig for DefaultConfig {
    const MAX_NEIGHBORS: usize = 16;
}

/// Tight bounds, useful for exercising overflow handling.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmallConfig;

impl NodeConfig for SmallConfig {
    const MAX_NEIGHBORS: usize = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(DefaultConfig::MAX_NEIGHBORS, 16);
        assert_eq!(DefaultConfig::MAX_TWO_HOP, 48);
    }

    #[test]
    fn test_small_config_values() {
        assert_eq!(SmallConfig::MAX_NEIGHBORS, 4);
        assert_eq!(SmallConfig::MAX_TWO_HOP, 12);
    }

    #[test]
    fn test_small_config_smaller_than_default() {
        assert!(SmallConfig::MAX_NEIGHBORS < DefaultConfig::MAX_NEIGHBORS);
        assert!(SmallConfig::MAX_TWO_HOP < DefaultConfig::MAX_TWO_HOP);
    }
}
