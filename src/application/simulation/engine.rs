//! Monte Carlo simulation engine.
//!
//! Iterations are split into fixed-size chunks. Chunk `i` draws from
//! `ChaCha8Rng::seed_from_u64(seed)` on stream `i`, so every chunk has its own
//! independent generator and the concatenated draws depend only on the seed,
//! the chunk size and the projection, never on how rayon schedules the chunks.

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::cancel::CancellationToken;
use super::mechanics::{GameModel, MechanicsParams};
use crate::domain::{GameDraw, League, Projection, SimulationResult};
use crate::error::{ConfigError, Result, SimulationError};

/// Absolute floor on iterations per run; configuration may only raise it.
pub const MIN_ITERATIONS: usize = 10_000;
pub const DEFAULT_CHUNK_SIZE: usize = 1_000;
pub const DEFAULT_MAX_RESAMPLE_ATTEMPTS: usize = 1_000;

/// Engine parameters for one league.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub min_iterations: usize,
    /// Iterations per random stream.
    pub chunk_size: usize,
    pub max_resample_attempts: usize,
    pub mechanics: MechanicsParams,
}

impl EngineSettings {
    #[must_use]
    pub fn for_league(league: League) -> Self {
        Self {
            min_iterations: MIN_ITERATIONS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_resample_attempts: DEFAULT_MAX_RESAMPLE_ATTEMPTS,
            mechanics: MechanicsParams::for_league(league),
        }
    }
}

/// Draws N independent games from a projection.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    settings: EngineSettings,
}

impl SimulationEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Run `iterations` games.
    ///
    /// Without a seed one is drawn from the thread RNG and recorded in the
    /// result.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InsufficientIterations`] if `iterations` is below the
    ///   configured minimum (nothing is simulated).
    /// - A validation error if the projection lacks a stat its league needs.
    /// - [`SimulationError::Cancelled`] if `cancel` fires before every chunk
    ///   has been scheduled.
    /// - [`SimulationError::ResampleExhausted`] if a stat cannot be drawn
    ///   inside its valid domain.
    pub fn run(
        &self,
        projection: &Projection,
        iterations: usize,
        seed: Option<u64>,
        cancel: Option<&CancellationToken>,
    ) -> Result<SimulationResult> {
        let minimum = self.settings.min_iterations.max(MIN_ITERATIONS);
        if iterations < minimum {
            return Err(ConfigError::InsufficientIterations {
                requested: iterations,
                minimum,
            }
            .into());
        }

        let model = GameModel::build(
            projection,
            self.settings.mechanics,
            self.settings.max_resample_attempts,
        )?;
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        let chunk_size = self.settings.chunk_size.max(1);
        let chunks = iterations.div_ceil(chunk_size);
        let started = Instant::now();

        debug!(league = %projection.league(), iterations, chunks, seed, "Starting simulation");

        let results: Vec<Option<Vec<GameDraw>>> = (0..chunks)
            .into_par_iter()
            .map(|chunk| {
                if cancel.is_some_and(CancellationToken::is_cancelled) {
                    return Ok(None);
                }
                let len = chunk_size.min(iterations - chunk * chunk_size);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(chunk as u64);
                (0..len)
                    .map(|_| model.draw(&mut rng))
                    .collect::<std::result::Result<Vec<_>, SimulationError>>()
                    .map(Some)
            })
            .collect::<std::result::Result<_, SimulationError>>()?;

        let completed: usize = results.iter().flatten().map(Vec::len).sum();
        if completed < iterations {
            warn!(completed, required = iterations, "Simulation cancelled");
            return Err(SimulationError::Cancelled {
                completed,
                required: iterations,
            }
            .into());
        }

        let draws: Vec<GameDraw> = results.into_iter().flatten().flatten().collect();
        info!(
            league = %projection.league(),
            iterations,
            seed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Simulation complete"
        );
        Ok(SimulationResult::new(projection.league(), draws, seed))
    }
}
