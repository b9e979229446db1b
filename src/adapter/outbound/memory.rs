//! In-memory ledger, for tests and single-process runs.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::domain::{BetId, BetOutcome, BetRecord, SimulationSummary};
use crate::error::{Error, Result};
use crate::port::{BetLedger, LedgerEntry};

#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: RwLock<BTreeMap<BetId, LedgerEntry>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn get(&self, bet_id: &BetId) -> Option<LedgerEntry> {
        self.entries.read().get(bet_id).cloned()
    }
}

impl BetLedger for MemoryLedger {
    fn log_bet(&self, record: &BetRecord) -> Result<()> {
        self.entries
            .write()
            .insert(record.bet_id.clone(), LedgerEntry::new(record.clone()));
        Ok(())
    }

    fn log_simulation(&self, bet_id: &BetId, summary: &SimulationSummary) -> Result<()> {
        let mut entries = self.entries.write();
        let entry = entries.get_mut(bet_id).ok_or_else(|| unknown(bet_id))?;
        entry.simulation = Some(summary.clone());
        Ok(())
    }

    fn query_by_date_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<LedgerEntry>> {
        Ok(self
            .entries
            .read()
            .values()
            .filter(|e| (from..=to).contains(&e.bet_id().date()))
            .cloned()
            .collect())
    }

    fn update_result(&self, bet_id: &BetId, outcome: BetOutcome) -> Result<()> {
        let mut entries = self.entries.write();
        let entry = entries.get_mut(bet_id).ok_or_else(|| unknown(bet_id))?;
        entry.outcome = outcome;
        Ok(())
    }
}

fn unknown(bet_id: &BetId) -> Error {
    Error::UnknownBet {
        bet_id: bet_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{League, MarketId};
    use rust_decimal_macros::dec;

    fn record(day: u32, sequence: u32) -> BetRecord {
        BetRecord {
            bet_id: BetId::new(
                NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
                League::Nhl,
                sequence,
            ),
            market_id: MarketId::new("ml"),
            selection: "home ML".to_string(),
            odds: "-120".to_string(),
            edge_pct: 2.0,
            calibrated_prob: 0.57,
            implied_prob: 0.545,
            ev: 0.045,
            kelly_fraction: 0.05,
            stake_recommendation: dec!(12.50),
            n_iterations: 10_000,
            simulation_seed: 7,
        }
    }

    #[test]
    fn query_filters_by_inclusive_date_range() {
        let ledger = MemoryLedger::new();
        for day in [1, 5, 10] {
            ledger.log_bet(&record(day, 1)).unwrap();
        }
        let from = NaiveDate::from_ymd_opt(2026, 10, 5).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 10, 10).unwrap();
        let found = ledger.query_by_date_range(from, to).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|e| e.outcome == BetOutcome::Pending));
    }

    #[test]
    fn update_result_settles_bet() {
        let ledger = MemoryLedger::new();
        let bet = record(3, 2);
        ledger.log_bet(&bet).unwrap();
        ledger.update_result(&bet.bet_id, BetOutcome::Won).unwrap();
        assert_eq!(ledger.get(&bet.bet_id).unwrap().outcome, BetOutcome::Won);
    }

    #[test]
    fn unknown_bet_is_an_error() {
        let ledger = MemoryLedger::new();
        let missing = record(3, 9).bet_id;
        let err = ledger.update_result(&missing, BetOutcome::Lost).unwrap_err();
        assert!(matches!(err, Error::UnknownBet { .. }));
    }
}
