//! Scenario builder for setting up and running simulations.

use std::marker::PhantomData;

use olsr::config::{DefaultConfig, NodeConfig};
use olsr::{Address, Duration, Position, Timestamp, RANGE};

use crate::error::SimError;
use crate::metrics::SimulationResult;
use crate::placement::Placement;
use crate::sim::Simulator;

/// Builder for simulation scenarios.
pub struct ScenarioBuilder<C: NodeConfig = DefaultConfig> {
    num_nodes: usize,
    /// RNG seed for determinism.
    seed: u64,
    range: f64,
    placement: Placement,
    snapshot_interval: Option<Duration>,
    snapshots: Vec<Timestamp>,
    _config: PhantomData<C>,
}

impl Default for ScenarioBuilder<DefaultConfig> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ScenarioBuilder<DefaultConfig> {
    /// Create a scenario with `num_nodes` randomly placed nodes.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            seed: 42,
            range: RANGE,
            placement: Placement::Random,
            snapshot_interval: None,
            snapshots: Vec::new(),
            _config: PhantomData,
        }
    }
}

impl<C: NodeConfig> ScenarioBuilder<C> {
    /// Switch to nodes with table bounds `D`.
    pub fn with_node_config<D: NodeConfig>(self) -> ScenarioBuilder<D> {
        ScenarioBuilder {
            num_nodes: self.num_nodes,
            seed: self.seed,
            range: self.range,
            placement: self.placement,
            snapshot_interval: self.snapshot_interval,
            snapshots: self.snapshots,
            _config: PhantomData,
        }
    }

    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_range(mut self, range: f64) -> Self {
        self.range = range;
        self
    }

    /// Place nodes at the given positions, one node per position.
    pub fn placement(mut self, positions: Vec<Position>) -> Self {
        self.num_nodes = positions.len();
        self.placement = Placement::Explicit(positions);
        self
    }

    /// Let every node draw its own position.
    pub fn random_placement(mut self) -> Self {
        self.placement = Placement::Random;
        self
    }

    /// Nodes on a line, `spacing` apart.
    pub fn chain_placement(mut self, spacing: f64) -> Self {
        self.placement = Placement::Chain { spacing };
        self
    }

    /// Nodes on a row-major grid.
    pub fn grid_placement(mut self, columns: usize, spacing: f64) -> Self {
        self.placement = Placement::Grid { columns, spacing };
        self
    }

    /// Set snapshot interval for metrics collection.
    pub fn with_snapshot_interval(mut self, interval: Duration) -> Self {
        self.snapshot_interval = Some(interval);
        self
    }

    /// Schedule a snapshot at the specified time.
    pub fn snapshot_at(mut self, time: Timestamp) -> Self {
        self.snapshots.push(time);
        self
    }

    /// Build the simulator with all nodes registered.
    pub fn build(self) -> (Simulator<C>, Vec<Address>) {
        let mut sim = Simulator::<C>::with_seed(self.seed).with_range(self.range);
        if let Some(interval) = self.snapshot_interval {
            sim = sim.with_snapshot_interval(interval);
        }

        let mut addresses = Vec::with_capacity(self.num_nodes);
        for i in 0..self.num_nodes {
            let address = match self.placement.position(i) {
                Some(position) => sim.add_node_at(position),
                None => sim.add_node(),
            };
            addresses.push(address);
        }

        for time in self.snapshots {
            sim.schedule_snapshot(time);
        }

        (sim, addresses)
    }

    /// Build and run the simulation for the specified duration.
    pub fn run_for(self, duration: Duration) -> Result<SimulationResult, SimError> {
        let (mut sim, _) = self.build();
        sim.run_for(duration)
    }

    /// Build and run until the specified time.
    pub fn run_until(self, time: Timestamp) -> Result<SimulationResult, SimError> {
        let (mut sim, _) = self.build();
        sim.run_until(time)
    }
}

/// `num_nodes` nodes on a line, consecutive nodes in range of each other
/// and nothing else.
pub fn chain_scenario(num_nodes: usize) -> ScenarioBuilder {
    ScenarioBuilder::new(num_nodes).chain_placement(RANGE * 0.75)
}
