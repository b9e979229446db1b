//! Injury report records and the severity impact table.

use serde::{Deserialize, Serialize};

use super::id::EntityId;

/// How serious an injury is, in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Minor,
    Moderate,
    Major,
    Severe,
}

/// Availability designation from the injury report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjuryStatus {
    Probable,
    Questionable,
    Doubtful,
    Out,
}

impl InjuryStatus {
    /// Probability the player misses the game.
    #[must_use]
    pub const fn absence_probability(&self) -> f64 {
        match self {
            InjuryStatus::Probable => 0.1,
            InjuryStatus::Questionable => 0.5,
            InjuryStatus::Doubtful => 0.75,
            InjuryStatus::Out => 1.0,
        }
    }
}

/// One line of an injury report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryRecord {
    pub player: EntityId,
    pub severity: SeverityTier,
    pub status: InjuryStatus,
}

impl InjuryRecord {
    pub fn new(player: impl Into<EntityId>, severity: SeverityTier, status: InjuryStatus) -> Self {
        Self {
            player: player.into(),
            severity,
            status,
        }
    }
}

/// Fraction of team output lost when a player of each tier is fully absent.
///
/// Must be non-decreasing from `minor` to `severe` and every value within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityTable {
    pub minor: f64,
    pub moderate: f64,
    pub major: f64,
    pub severe: f64,
}

impl SeverityTable {
    #[must_use]
    pub const fn impact(&self, tier: SeverityTier) -> f64 {
        match tier {
            SeverityTier::Minor => self.minor,
            SeverityTier::Moderate => self.moderate,
            SeverityTier::Major => self.major,
            SeverityTier::Severe => self.severe,
        }
    }

    /// True when every impact is within [0, 1] and impacts never decrease with severity.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let values = [self.minor, self.moderate, self.major, self.severe];
        values.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v))
            && values.windows(2).all(|w| w[0] <= w[1])
    }
}

impl Default for SeverityTable {
    fn default() -> Self {
        Self {
            minor: 0.01,
            moderate: 0.03,
            major: 0.06,
            severe: 0.10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_monotonic() {
        assert!(SeverityTable::default().is_valid());
    }

    #[test]
    fn decreasing_table_is_invalid() {
        let table = SeverityTable {
            minor: 0.05,
            moderate: 0.03,
            major: 0.06,
            severe: 0.10,
        };
        assert!(!table.is_valid());
    }

    #[test]
    fn out_of_range_table_is_invalid() {
        let table = SeverityTable {
            severe: 1.5,
            ..SeverityTable::default()
        };
        assert!(!table.is_valid());
    }

    #[test]
    fn severity_orders_by_seriousness() {
        assert!(SeverityTier::Minor < SeverityTier::Severe);
        assert!(InjuryStatus::Out.absence_probability() > InjuryStatus::Doubtful.absence_probability());
    }
}
