//! Builders for domain primitives used across tests.
//!
//! Teams carry league-average baselines unless a test asks for something
//! else, so a matchup between two `team(..)` calls is a coin flip.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::application::analysis::AnalysisRequest;
use crate::application::ProjectionModel;
use crate::domain::{
    BetId, BetRecord, Direction, Entity, GameOutcome, League, Market, MarketId, Mechanics, Odds,
    Projection, Selection, Side,
};

/// Fixed date for bet ids in tests.
pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap_or_default()
}

/// Basketball team with explicit pace and per-100 ratings.
pub fn basketball_team(id: &str, league: League, pace: f64, off: f64, def: f64) -> Entity {
    Entity::team(id, league)
        .with_stat("pace", pace, 16.0)
        .with_stat("off_rating", off, 36.0)
        .with_stat("def_rating", def, 36.0)
}

/// Football team with explicit drive volume and per-drive scoring.
pub fn football_team(id: &str, league: League, drives: f64, ppd: f64, allowed: f64) -> Entity {
    Entity::team(id, league)
        .with_stat("drives", drives, 1.5)
        .with_stat("points_per_drive", ppd, 0.09)
        .with_stat("points_allowed_per_drive", allowed, 0.09)
}

pub fn baseball_team(id: &str, runs: f64, allowed: f64) -> Entity {
    Entity::team(id, League::Mlb)
        .with_stat("runs_per_game", runs, 9.0)
        .with_stat("runs_allowed_per_game", allowed, 9.0)
}

pub fn goal_team(id: &str, league: League, goals_for: f64, goals_against: f64) -> Entity {
    Entity::team(id, league)
        .with_stat("goals_for", goals_for, goals_for * 1.2)
        .with_stat("goals_against", goals_against, goals_against * 1.2)
}

/// League-average team.
pub fn team(id: &str, league: League) -> Entity {
    match league.mechanics() {
        Mechanics::Possession => match league {
            League::Nba => basketball_team(id, league, 99.0, 115.0, 115.0),
            _ => basketball_team(id, league, 80.0, 100.0, 100.0),
        },
        Mechanics::Drive => football_team(id, league, 11.0, 2.0, 2.0),
        Mechanics::Inning => baseball_team(id, 4.5, 4.5),
        Mechanics::Goal => match league {
            League::Nhl => goal_team(id, league, 3.1, 3.1),
            _ => goal_team(id, league, 1.4, 1.4),
        },
    }
}

/// Baseline projection of two league-average teams.
pub fn projection(league: League) -> Projection {
    ProjectionModel::new()
        .compute_baseline(&team("HOME", league), &team("AWAY", league))
        .unwrap_or_else(|e| panic!("testkit teams must project: {e}"))
}

pub fn odds(american: f64) -> Odds {
    Odds::american(american).unwrap_or_else(|e| panic!("bad test odds: {e}"))
}

pub fn moneyline(id: &str, outcome: GameOutcome, american: f64) -> Market {
    Market::new(id, Selection::Moneyline { outcome }, odds(american))
}

pub fn spread(id: &str, side: Side, line: f64, american: f64) -> Market {
    Market::new(id, Selection::Spread { side, line }, odds(american))
}

pub fn total(id: &str, direction: Direction, line: f64, american: f64) -> Market {
    Market::new(id, Selection::Total { direction, line }, odds(american))
}

/// Analysis request for two league-average teams with no markets.
pub fn request(league: League, seed: u64) -> AnalysisRequest {
    AnalysisRequest {
        date: day(),
        home: team("HOME", league),
        away: team("AWAY", league),
        home_injuries: Vec::new(),
        away_injuries: Vec::new(),
        signals: Value::Null,
        allocations: Vec::new(),
        markets: Vec::new(),
        parlays: Vec::new(),
        bankroll: Decimal::from(1000),
        iterations: None,
        seed: Some(seed),
        first_sequence: 1,
    }
}

/// A pending bet record with plausible pricing fields.
pub fn bet_record(date: NaiveDate, league: League, sequence: u32) -> BetRecord {
    BetRecord {
        bet_id: BetId::new(date, league, sequence),
        market_id: MarketId::new(format!("m-{sequence}")),
        selection: "home ML".to_string(),
        odds: "-110".to_string(),
        edge_pct: 1.62,
        calibrated_prob: 0.54,
        implied_prob: 0.5238,
        ev: 0.0309,
        kelly_fraction: 0.034,
        stake_recommendation: Decimal::new(850, 2),
        n_iterations: 10_000,
        simulation_seed: 42,
    }
}
