//! End-to-end matchup analysis.
//!
//! Runs the pipeline stages in order for one game: context, injuries,
//! projection, correlated simulation, then per-market calibration, edge and
//! staking. Each stage only sees the outputs of the stages before it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::calibration::{CalibrationCurve, Calibrator};
use super::context::ContextNormalizer;
use super::edge::EdgeEvaluator;
use super::injury::InjuryAdjuster;
use super::parlay::{average_correlation, ParlayEvaluation, ParlayEvaluator, ParlayLeg};
use super::projection::ProjectionModel;
use super::settings::LeagueSettings;
use super::simulation::{CancellationToken, CorrelatedSimulator, SimulationEngine};
use super::staking::KellyStaker;
use crate::domain::error::ValidationError;
use crate::domain::{
    BetId, BetRecord, CalibratedProbability, ContextFactor, EdgeResult, Entity, InjuryRecord,
    Market, MarketId, MatchupContext, Odds, PlayerAllocation, ProbabilityQuery, Projection,
    SelectionProbability, Side, SimulationSummary, StakeRecommendation,
};
use crate::error::Result;
use crate::port::BetLedger;

/// A parlay to price from markets in the same request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlayRequest {
    pub id: MarketId,
    pub legs: Vec<MarketId>,
    /// Book price for the parlay; leg prices are multiplied when absent.
    #[serde(default)]
    pub quoted_odds: Option<Odds>,
}

/// Inputs for one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub date: NaiveDate,
    pub home: Entity,
    pub away: Entity,
    #[serde(default)]
    pub home_injuries: Vec<InjuryRecord>,
    #[serde(default)]
    pub away_injuries: Vec<InjuryRecord>,
    #[serde(default)]
    pub signals: Value,
    #[serde(default)]
    pub allocations: Vec<PlayerAllocation>,
    #[serde(default)]
    pub markets: Vec<Market>,
    #[serde(default)]
    pub parlays: Vec<ParlayRequest>,
    pub bankroll: Decimal,
    /// Falls back to the league's default iteration count.
    #[serde(default)]
    pub iterations: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Sequence number of the first bet id issued for this request.
    #[serde(default = "default_first_sequence")]
    pub first_sequence: u32,
}

fn default_first_sequence() -> u32 {
    1
}

/// One single-market evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub market: Market,
    pub probability: SelectionProbability,
    pub calibrated: CalibratedProbability,
    pub edge: EdgeResult,
    pub stake: StakeRecommendation,
    pub record: BetRecord,
}

/// One parlay evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlayAnalysis {
    pub request: ParlayRequest,
    pub evaluation: ParlayEvaluation,
    pub stake: StakeRecommendation,
    pub record: BetRecord,
}

/// Everything produced for one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupAnalysis {
    pub context: MatchupContext,
    pub projection: Projection,
    pub summary: SimulationSummary,
    pub markets: Vec<MarketAnalysis>,
    pub parlays: Vec<ParlayAnalysis>,
}

impl MatchupAnalysis {
    /// Bet records in issue order, singles first.
    pub fn records(&self) -> impl Iterator<Item = &BetRecord> {
        self.markets
            .iter()
            .map(|m| &m.record)
            .chain(self.parlays.iter().map(|p| &p.record))
    }

    /// Log every recommended bet together with the simulation it came from.
    ///
    /// Returns the number of bets written; markets without a stake are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns the first ledger error.
    pub fn log_to(&self, ledger: &dyn BetLedger) -> Result<usize> {
        let mut logged = 0;
        for record in self.records().filter(|r| r.stake_recommendation > Decimal::ZERO) {
            ledger.log_bet(record)?;
            ledger.log_simulation(&record.bet_id, &self.summary)?;
            logged += 1;
        }
        info!(logged, "Recommended bets written to ledger");
        Ok(logged)
    }
}

/// Runs the full pipeline for one league.
#[derive(Debug, Clone)]
pub struct MatchupAnalyzer {
    settings: LeagueSettings,
    normalizer: ContextNormalizer,
    injuries: InjuryAdjuster,
    projections: ProjectionModel,
    simulator: CorrelatedSimulator,
    calibrator: Calibrator,
    edges: EdgeEvaluator,
    parlays: ParlayEvaluator,
    staker: KellyStaker,
}

impl MatchupAnalyzer {
    pub fn new(settings: LeagueSettings) -> Self {
        Self {
            normalizer: ContextNormalizer::new(),
            injuries: InjuryAdjuster::new(settings.severity),
            projections: ProjectionModel::new(),
            simulator: CorrelatedSimulator::new(SimulationEngine::new(settings.engine)),
            calibrator: Calibrator::new(settings.calibration),
            edges: EdgeEvaluator::new(),
            parlays: ParlayEvaluator::new(settings.parlay),
            staker: KellyStaker::new(settings.staking),
            settings,
        }
    }

    /// Calibrate through a fitted curve instead of plain shrinkage.
    #[must_use]
    pub fn with_curve(mut self, curve: CalibrationCurve) -> Self {
        self.calibrator = self.calibrator.with_curve(curve);
        self
    }

    pub const fn settings(&self) -> &LeagueSettings {
        &self.settings
    }

    /// Analyze one game.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::LeagueMismatch`] if either entity is not in the
    ///   analyzer's league.
    /// - Any error of the individual stages, including
    ///   [`ValidationError::UnknownMarket`] for a parlay leg that is not one
    ///   of the request's markets.
    pub fn analyze(
        &self,
        request: &AnalysisRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<MatchupAnalysis> {
        let league = self.settings.league;
        for entity in [&request.home, &request.away] {
            if entity.league() != league {
                return Err(ValidationError::LeagueMismatch {
                    expected: league.to_string(),
                    actual: entity.league().to_string(),
                }
                .into());
            }
        }

        let home = self.injuries.adjust(&request.home, &request.home_injuries);
        let away = self.injuries.adjust(&request.away, &request.away_injuries);
        let context = self
            .normalizer
            .normalize(league, &request.signals)?
            .with_factor(ContextFactor::Injury, Side::Home, home.injury_multiplier())
            .with_factor(ContextFactor::Injury, Side::Away, away.injury_multiplier());

        let projection = self.projections.project(&home, &away, &context)?;
        let iterations = request.iterations.unwrap_or(self.settings.default_iterations);
        let result = self.simulator.run(
            &projection,
            request.allocations.clone(),
            iterations,
            request.seed,
            cancel,
        )?;
        let summary = result.base().summary();

        let mut bet_id = BetId::new(request.date, league, request.first_sequence.max(1));
        let mut markets = Vec::with_capacity(request.markets.len());
        for market in &request.markets {
            let probability = result.probability(&market.selection)?;
            let calibrated = self.calibrator.calibrate(probability.conditional_win())?;
            let edge = self.edges.evaluate(calibrated.calibrated, &market.odds)?;
            let stake = self
                .staker
                .recommend(edge.expected_value, &market.odds, request.bankroll)?;
            let record = self.record(
                &bet_id,
                &market.id,
                market.selection.to_string(),
                market.odds,
                &edge,
                &stake,
                &summary,
            );
            debug!(
                market = %market.id,
                raw = calibrated.raw,
                calibrated = calibrated.calibrated,
                edge_pct = edge.edge_pct,
                stake = %stake.stake,
                "Market evaluated"
            );
            markets.push(MarketAnalysis {
                market: market.clone(),
                probability,
                calibrated,
                edge,
                stake,
                record,
            });
            bet_id = bet_id.next();
        }

        let mut parlays = Vec::with_capacity(request.parlays.len());
        for parlay in &request.parlays {
            let legs = parlay
                .legs
                .iter()
                .map(|id| {
                    markets
                        .iter()
                        .find(|m| &m.market.id == id)
                        .ok_or_else(|| ValidationError::UnknownMarket {
                            market: id.to_string(),
                        })
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let selections: Vec<_> = legs.iter().map(|m| m.market.selection.clone()).collect();
            let correlation = average_correlation(&result.correlation_matrix(&selections)?);
            let priced: Vec<ParlayLeg> = legs
                .iter()
                .map(|m| ParlayLeg {
                    probability: m.calibrated.calibrated,
                    odds: m.market.odds,
                })
                .collect();
            let evaluation = self
                .parlays
                .evaluate(&priced, Some(correlation), parlay.quoted_odds)?;
            let stake = self.staker.recommend(
                evaluation.edge.expected_value,
                &evaluation.odds,
                request.bankroll,
            )?;
            let selection = legs
                .iter()
                .map(|m| m.market.selection.to_string())
                .collect::<Vec<_>>()
                .join(" + ");
            let record = self.record(
                &bet_id,
                &parlay.id,
                selection,
                evaluation.odds,
                &evaluation.edge,
                &stake,
                &summary,
            );
            parlays.push(ParlayAnalysis {
                request: parlay.clone(),
                evaluation,
                stake,
                record,
            });
            bet_id = bet_id.next();
        }

        info!(
            league = %league,
            home = %request.home.id(),
            away = %request.away.id(),
            iterations = summary.iterations,
            seed = summary.seed,
            markets = markets.len(),
            parlays = parlays.len(),
            "Matchup analyzed"
        );

        Ok(MatchupAnalysis {
            context,
            projection,
            summary,
            markets,
            parlays,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        &self,
        bet_id: &BetId,
        market_id: &MarketId,
        selection: String,
        odds: Odds,
        edge: &EdgeResult,
        stake: &StakeRecommendation,
        summary: &SimulationSummary,
    ) -> BetRecord {
        BetRecord {
            bet_id: bet_id.clone(),
            market_id: market_id.clone(),
            selection,
            odds: odds.into(),
            edge_pct: edge.edge_pct,
            calibrated_prob: edge.calibrated_probability,
            implied_prob: edge.implied_probability,
            ev: edge.expected_value,
            kelly_fraction: stake.kelly_fraction,
            stake_recommendation: stake.stake,
            n_iterations: summary.iterations,
            simulation_seed: summary.seed,
        }
    }
}
