//! Sport-agnostic domain types and their invariants.

mod context;
mod correlated;
mod entity;
mod evaluation;
mod id;
mod injury;
mod league;
mod market;
mod odds;
mod projection;
mod simulation;

pub mod error;

pub use context::{ContextFactor, MatchupContext, Side, SideContext};
pub use correlated::{
    validate_allocations, AllocationBasis, CorrelatedSimulationResult, PlayerAllocation,
};
pub use entity::{Entity, EntityKind};
pub use evaluation::{
    BetOutcome, BetRecord, CalibratedProbability, CalibrationMethod, EdgeResult,
    StakeRecommendation,
};
pub use id::{BetId, EntityId, MarketId};
pub use injury::{InjuryRecord, InjuryStatus, SeverityTable, SeverityTier};
pub use league::{League, Mechanics};
pub use market::{Direction, GameOutcome, Market, MarketKind, Selection};
pub use odds::{remove_vig, Odds, OddsFormat};
pub use projection::{stat, Projection, SideProjection, StatDistribution};
pub use simulation::{
    settle_game, settle_line, GameDraw, Moments, OutcomeProbabilities, ProbabilityQuery,
    SelectionProbability, Settlement, SimulationResult, SimulationSummary,
};
