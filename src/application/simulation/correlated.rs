use tracing::debug;

use super::cancel::CancellationToken;
use super::engine::SimulationEngine;
use crate::domain::{CorrelatedSimulationResult, PlayerAllocation, Projection};
use crate::error::Result;

/// Runs the team-level engine and derives player lines from every draw.
#[derive(Debug, Clone)]
pub struct CorrelatedSimulator {
    engine: SimulationEngine,
}

impl CorrelatedSimulator {
    pub fn new(engine: SimulationEngine) -> Self {
        Self { engine }
    }

    pub const fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// Simulate the game and allocate player stats from each team draw.
    ///
    /// Allocations are validated before any game is simulated.
    ///
    /// # Errors
    ///
    /// Fails on invalid allocations and on every [`SimulationEngine::run`]
    /// error.
    pub fn run(
        &self,
        projection: &Projection,
        allocations: Vec<PlayerAllocation>,
        iterations: usize,
        seed: Option<u64>,
        cancel: Option<&CancellationToken>,
    ) -> Result<CorrelatedSimulationResult> {
        crate::domain::validate_allocations(&allocations)?;
        let base = self.engine.run(projection, iterations, seed, cancel)?;
        let players = allocations.len();
        let result = CorrelatedSimulationResult::derive(base, allocations)?;
        debug!(players, "Player lines derived from team draws");
        Ok(result)
    }
}
