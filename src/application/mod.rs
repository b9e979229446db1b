//! Application services (use cases).
//!
//! Each pipeline stage is a small service configured once per league and
//! then applied to any number of matchups. [`analysis::MatchupAnalyzer`]
//! wires them together in pipeline order.

pub mod analysis;
pub mod calibration;
pub mod context;
pub mod edge;
pub mod injury;
pub mod parlay;
pub mod projection;
pub mod settings;
pub mod simulation;
pub mod staking;

pub use analysis::{AnalysisRequest, MatchupAnalysis, MatchupAnalyzer, ParlayRequest};
pub use calibration::{CalibrationCurve, CalibrationParams, Calibrator};
pub use context::ContextNormalizer;
pub use edge::EdgeEvaluator;
pub use injury::InjuryAdjuster;
pub use parlay::{ParlayEvaluator, ParlayLeg, ParlayParams};
pub use projection::ProjectionModel;
pub use settings::LeagueSettings;
pub use simulation::{CancellationToken, CorrelatedSimulator, EngineSettings, SimulationEngine};
pub use staking::{KellyStaker, StakingPolicy};
