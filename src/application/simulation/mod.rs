//! Monte Carlo simulation of games and derived player lines.

mod cancel;
mod correlated;
mod distribution;
mod engine;
mod mechanics;

pub use cancel::CancellationToken;
pub use correlated::CorrelatedSimulator;
pub use distribution::StatSampler;
pub use engine::{
    EngineSettings, SimulationEngine, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_RESAMPLE_ATTEMPTS,
    MIN_ITERATIONS,
};
pub use mechanics::{drive_score_probability, GameModel, MechanicsParams};
