//! Append-only JSON-lines ledger.
//!
//! Every ledger call appends one event line; opening the file replays the
//! events to rebuild the current state. Settling a bet therefore never
//! rewrites earlier lines.
//!
//! A write cut short leaves an unterminated final line. Replay drops it and
//! truncates the file back to the last complete event.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{BetId, BetOutcome, BetRecord, SimulationSummary};
use crate::error::{Error, Result};
use crate::port::{BetLedger, LedgerEntry};

/// One line of the ledger file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum LedgerEvent {
    Bet {
        record: BetRecord,
    },
    Simulation {
        bet_id: BetId,
        summary: SimulationSummary,
    },
    Result {
        bet_id: BetId,
        outcome: BetOutcome,
    },
}

#[derive(Debug)]
pub struct JsonlLedger {
    path: PathBuf,
    file: Mutex<File>,
    entries: RwLock<BTreeMap<BetId, LedgerEntry>>,
}

impl JsonlLedger {
    /// Open (or create) a ledger file and replay its events.
    ///
    /// An unparseable final line without a trailing newline is a torn write:
    /// it is logged, skipped and truncated away.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be opened or read, and a JSON
    /// error for a complete line that is not a ledger event.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        let mut content = String::new();
        BufReader::new(&file).read_to_string(&mut content)?;

        let mut entries = BTreeMap::new();
        let mut events = 0usize;
        let mut offset = 0usize;
        for line in content.split_inclusive('\n') {
            let start = offset;
            offset += line.len();
            let complete = line.ends_with('\n');
            if line.trim().is_empty() {
                continue;
            }
            let event: LedgerEvent = match serde_json::from_str(line) {
                Ok(event) => event,
                Err(err) if !complete => {
                    warn!(
                        path = %path.display(),
                        offset = start,
                        error = %err,
                        "Dropping torn final ledger line"
                    );
                    file.set_len(start as u64)?;
                    break;
                }
                Err(err) => return Err(err.into()),
            };
            apply(&mut entries, event)?;
            events += 1;
            if !complete {
                file.write_all(b"\n")?;
                file.flush()?;
            }
        }
        info!(path = %path.display(), events, bets = entries.len(), "Ledger opened");

        Ok(Self {
            path,
            file: Mutex::new(file),
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate, persist, then apply an event.
    fn record(&self, event: LedgerEvent) -> Result<()> {
        let mut entries = self.entries.write();
        // The file must never hold an event that cannot replay.
        if let LedgerEvent::Simulation { bet_id, .. } | LedgerEvent::Result { bet_id, .. } = &event {
            entry(&mut entries, bet_id)?;
        }

        let mut line = serde_json::to_string(&event)?;
        line.push('\n');
        {
            let mut file = self.file.lock();
            let start = file.metadata()?.len();
            if let Err(err) = file.write_all(line.as_bytes()).and_then(|()| file.flush()) {
                if let Err(rollback) = file.set_len(start) {
                    warn!(path = %self.path.display(), error = %rollback, "Ledger rollback failed");
                }
                return Err(err.into());
            }
        }
        apply(&mut entries, event)?;
        debug!(path = %self.path.display(), "Ledger event appended");
        Ok(())
    }
}

fn apply(entries: &mut BTreeMap<BetId, LedgerEntry>, event: LedgerEvent) -> Result<()> {
    match event {
        LedgerEvent::Bet { record } => {
            entries.insert(record.bet_id.clone(), LedgerEntry::new(record));
        }
        LedgerEvent::Simulation { bet_id, summary } => {
            entry(entries, &bet_id)?.simulation = Some(summary);
        }
        LedgerEvent::Result { bet_id, outcome } => {
            entry(entries, &bet_id)?.outcome = outcome;
        }
    }
    Ok(())
}

fn entry<'a>(
    entries: &'a mut BTreeMap<BetId, LedgerEntry>,
    bet_id: &BetId,
) -> Result<&'a mut LedgerEntry> {
    entries.get_mut(bet_id).ok_or_else(|| Error::UnknownBet {
        bet_id: bet_id.to_string(),
    })
}

impl BetLedger for JsonlLedger {
    fn log_bet(&self, record: &BetRecord) -> Result<()> {
        self.record(LedgerEvent::Bet {
            record: record.clone(),
        })
    }

    fn log_simulation(&self, bet_id: &BetId, summary: &SimulationSummary) -> Result<()> {
        self.record(LedgerEvent::Simulation {
            bet_id: bet_id.clone(),
            summary: summary.clone(),
        })
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
        self.record(LedgerEvent::Result {
            bet_id: bet_id.clone(),
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{League, Moments, OutcomeProbabilities};
    use crate::testkit::domain::{bet_record, day};
    use tempfile::tempdir;

    fn summary() -> SimulationSummary {
        SimulationSummary {
            league: League::Nba,
            iterations: 10_000,
            seed: 42,
            outcomes: OutcomeProbabilities {
                home_win: 0.55,
                away_win: 0.45,
                draw: 0.0,
            },
            home_score: Moments {
                mean: 112.0,
                variance: 140.0,
            },
            away_score: Moments {
                mean: 109.0,
                variance: 138.0,
            },
        }
    }

    #[test]
    fn reopening_replays_bets_simulations_and_results() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let first = bet_record(day(), League::Nba, 1);
        let second = bet_record(day(), League::Nba, 2);

        {
            let ledger = JsonlLedger::open(&path).unwrap();
            ledger.log_bet(&first).unwrap();
            ledger.log_bet(&second).unwrap();
            ledger.log_simulation(&first.bet_id, &summary()).unwrap();
            ledger.update_result(&first.bet_id, BetOutcome::Won).unwrap();
        }

        let reopened = JsonlLedger::open(&path).unwrap();
        let entries = reopened.query_by_date_range(day(), day()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].record, first);
        assert_eq!(entries[0].outcome, BetOutcome::Won);
        assert_eq!(entries[0].simulation, Some(summary()));
        assert_eq!(entries[1].outcome, BetOutcome::Pending);
        assert!(entries[1].simulation.is_none());
    }

    #[test]
    fn rejected_event_is_not_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let ledger = JsonlLedger::open(&path).unwrap();
        let missing = bet_record(day(), League::Nhl, 3).bet_id;

        let err = ledger.update_result(&missing, BetOutcome::Lost).unwrap_err();
        assert!(matches!(err, Error::UnknownBet { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn events_are_tagged_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let ledger = JsonlLedger::open(&path).unwrap();
        let bet = bet_record(day(), League::Mlb, 1);
        ledger.log_bet(&bet).unwrap();
        ledger.update_result(&bet.bet_id, BetOutcome::Push).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let events: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["event"], "bet");
        assert_eq!(events[1]["event"], "result");
        assert_eq!(events[1]["outcome"], "push");
        assert_eq!(events[1]["bet_id"], "2026-10-19_MLB_1");
    }

    #[test]
    fn torn_final_line_is_dropped_on_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let bet = bet_record(day(), League::Nba, 1);
        {
            let ledger = JsonlLedger::open(&path).unwrap();
            ledger.log_bet(&bet).unwrap();
        }
        let intact = std::fs::read_to_string(&path).unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"{\"event\":\"result\",\"bet_id\":\"2026-10").unwrap();
        drop(file);

        let ledger = JsonlLedger::open(&path).unwrap();
        let entries = ledger.query_by_date_range(day(), day()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outcome, BetOutcome::Pending);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), intact);

        // Appends after the repair replay cleanly.
        ledger.update_result(&bet.bet_id, BetOutcome::Won).unwrap();
        drop(ledger);
        let reopened = JsonlLedger::open(&path).unwrap();
        let entries = reopened.query_by_date_range(day(), day()).unwrap();
        assert_eq!(entries[0].outcome, BetOutcome::Won);
    }

    #[test]
    fn unterminated_valid_final_line_is_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let bet = bet_record(day(), League::Nfl, 4);
        {
            let ledger = JsonlLedger::open(&path).unwrap();
            ledger.log_bet(&bet).unwrap();
        }
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, content.trim_end()).unwrap();

        let ledger = JsonlLedger::open(&path).unwrap();
        ledger.update_result(&bet.bet_id, BetOutcome::Lost).unwrap();
        drop(ledger);

        let reopened = JsonlLedger::open(&path).unwrap();
        let entries = reopened.query_by_date_range(day(), day()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outcome, BetOutcome::Lost);
    }

    #[test]
    fn corrupt_line_fails_to_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        std::fs::write(&path, "{\"event\":\"bet\"\n").unwrap();
        let err = JsonlLedger::open(&path).unwrap_err();
        assert!(matches!(err, Error::Json(_)));

        // A complete but corrupt line is never truncated away.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"event\":\"bet\"\n");
    }
}
