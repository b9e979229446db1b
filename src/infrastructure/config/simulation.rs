//! Simulation engine configuration.

use serde::Deserialize;

use crate::application::simulation::{
    DEFAULT_CHUNK_SIZE, DEFAULT_MAX_RESAMPLE_ATTEMPTS, MIN_ITERATIONS,
};

/// `[simulation]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Iterations run when a request does not name a count.
    #[serde(default = "default_iterations")]
    pub default_iterations: usize,
    /// Smallest run accepted. Never below 10 000.
    #[serde(default = "default_iterations")]
    pub min_iterations: usize,
    /// Iterations per RNG stream.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Draws attempted before a bounded stat gives up.
    #[serde(default = "default_max_resample_attempts")]
    pub max_resample_attempts: usize,
}

const fn default_iterations() -> usize {
    MIN_ITERATIONS
}

const fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

const fn default_max_resample_attempts() -> usize {
    DEFAULT_MAX_RESAMPLE_ATTEMPTS
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_iterations: default_iterations(),
            min_iterations: default_iterations(),
            chunk_size: default_chunk_size(),
            max_resample_attempts: default_max_resample_attempts(),
        }
    }
}
