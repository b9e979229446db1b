//! Injury adjustment of entity baselines.
//!
//! Each injured player costs the team `severity_impact × absence_probability`
//! of its output. Impacts add up across players and the resulting multiplier
//! is floored at the bottom of the injury factor range. The multiplier always
//! replaces whatever was applied before, so adjusting an already adjusted
//! entity with the same report changes nothing.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{ContextFactor, Entity, EntityId, InjuryRecord, SeverityTable};

/// Applies injury reports to entity baselines.
#[derive(Debug, Clone, Copy)]
pub struct InjuryAdjuster {
    table: SeverityTable,
}

impl InjuryAdjuster {
    pub const fn new(table: SeverityTable) -> Self {
        Self { table }
    }

    pub const fn table(&self) -> &SeverityTable {
        &self.table
    }

    /// Multiplier implied by an injury report.
    ///
    /// Duplicate lines for the same player count once, at their worst.
    #[must_use]
    pub fn multiplier(&self, injuries: &[InjuryRecord]) -> f64 {
        let mut worst: BTreeMap<&EntityId, f64> = BTreeMap::new();
        for record in injuries {
            let impact =
                self.table.impact(record.severity) * record.status.absence_probability();
            let entry = worst.entry(&record.player).or_insert(0.0);
            *entry = entry.max(impact);
        }
        let total: f64 = worst.values().sum();
        ContextFactor::Injury.bound(1.0 - total)
    }

    /// Copy of `entity` with the report's multiplier applied to its baselines.
    ///
    /// Computed from the entity's original baselines, never chained.
    #[must_use]
    pub fn adjust(&self, entity: &Entity, injuries: &[InjuryRecord]) -> Entity {
        let multiplier = self.multiplier(injuries);
        debug!(
            entity = %entity.id(),
            injuries = injuries.len(),
            multiplier,
            "Injury adjustment applied"
        );
        entity.with_injury_multiplier(multiplier)
    }
}

impl Default for InjuryAdjuster {
    fn default() -> Self {
        Self::new(SeverityTable::default())
    }
}
