//! Bet history persistence port.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{BetId, BetOutcome, BetRecord, SimulationSummary};
use crate::error::Result;

/// A logged bet with its settlement state and simulation digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub record: BetRecord,
    #[serde(default)]
    pub outcome: BetOutcome,
    #[serde(default)]
    pub simulation: Option<SimulationSummary>,
}

impl LedgerEntry {
    pub fn new(record: BetRecord) -> Self {
        Self {
            record,
            outcome: BetOutcome::Pending,
            simulation: None,
        }
    }

    pub fn bet_id(&self) -> &BetId {
        &self.record.bet_id
    }
}

/// Storage for evaluated bets and the simulations behind them.
pub trait BetLedger: Send + Sync {
    /// Record a bet, replacing any entry with the same ID.
    fn log_bet(&self, record: &BetRecord) -> Result<()>;

    /// Attach the simulation digest a bet was priced from.
    ///
    /// Fails with [`crate::error::Error::UnknownBet`] if the bet was never logged.
    fn log_simulation(&self, bet_id: &BetId, summary: &SimulationSummary) -> Result<()>;

    /// Bets dated within `[from, to]`, ordered by ID.
    fn query_by_date_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<LedgerEntry>>;

    /// Settle a bet.
    ///
    /// Fails with [`crate::error::Error::UnknownBet`] if the bet was never logged.
    fn update_result(&self, bet_id: &BetId, outcome: BetOutcome) -> Result<()>;
}
