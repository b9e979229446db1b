//! Teams and players with their per-stat baselines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::id::EntityId;
use super::league::League;

/// Whether an entity is a team or a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Team,
    Player,
}

/// A team or player loaded from upstream data.
///
/// Holds the original stat baselines and their variances. Injury adjustment
/// never rewrites the originals; it replaces a single multiplier that is
/// applied on read, so re-applying the same injury list is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    league: League,
    kind: EntityKind,
    baselines: BTreeMap<String, f64>,
    variances: BTreeMap<String, f64>,
    #[serde(default = "neutral")]
    injury_multiplier: f64,
}

const fn neutral() -> f64 {
    1.0
}

impl Entity {
    /// Create an entity with no stats.
    pub fn new(id: impl Into<EntityId>, league: League, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            league,
            kind,
            baselines: BTreeMap::new(),
            variances: BTreeMap::new(),
            injury_multiplier: 1.0,
        }
    }

    /// Shorthand for a team entity.
    pub fn team(id: impl Into<EntityId>, league: League) -> Self {
        Self::new(id, league, EntityKind::Team)
    }

    /// Shorthand for a player entity.
    pub fn player(id: impl Into<EntityId>, league: League) -> Self {
        Self::new(id, league, EntityKind::Player)
    }

    /// Add (or replace) a stat baseline and its variance.
    #[must_use]
    pub fn with_stat(mut self, stat: impl Into<String>, mean: f64, variance: f64) -> Self {
        let stat = stat.into();
        self.baselines.insert(stat.clone(), mean);
        self.variances.insert(stat, variance);
        self
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub const fn league(&self) -> League {
        self.league
    }

    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Injury multiplier currently applied on read (1.0 when healthy).
    pub const fn injury_multiplier(&self) -> f64 {
        self.injury_multiplier
    }

    /// Baseline as loaded, ignoring injuries.
    pub fn raw_baseline(&self, stat: &str) -> Option<f64> {
        self.baselines.get(stat).copied()
    }

    /// Baseline after the injury multiplier.
    pub fn baseline(&self, stat: &str) -> Option<f64> {
        self.raw_baseline(stat).map(|b| b * self.injury_multiplier)
    }

    /// Variance after the injury multiplier.
    ///
    /// Scales with the square of the multiplier so the coefficient of
    /// variation is unchanged.
    pub fn variance(&self, stat: &str) -> Option<f64> {
        self.variances
            .get(stat)
            .map(|v| v * self.injury_multiplier * self.injury_multiplier)
    }

    /// Names of all stats with a baseline.
    pub fn stats(&self) -> impl Iterator<Item = &str> {
        self.baselines.keys().map(String::as_str)
    }

    /// Copy of this entity with the given injury multiplier.
    ///
    /// Replaces rather than compounds any previously applied multiplier.
    #[must_use]
    pub fn with_injury_multiplier(&self, multiplier: f64) -> Self {
        Self {
            injury_multiplier: multiplier,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_team() -> Entity {
        Entity::team("BOS", League::Nba)
            .with_stat("pace", 99.0, 9.0)
            .with_stat("off_rating", 118.0, 16.0)
    }

    #[test]
    fn baseline_applies_injury_multiplier() {
        let team = make_team().with_injury_multiplier(0.9);
        assert_eq!(team.raw_baseline("pace"), Some(99.0));
        assert!((team.baseline("pace").unwrap() - 89.1).abs() < 1e-9);
        assert!((team.variance("pace").unwrap() - 9.0 * 0.81).abs() < 1e-9);
    }

    #[test]
    fn injury_multiplier_replaces_previous() {
        let team = make_team()
            .with_injury_multiplier(0.9)
            .with_injury_multiplier(0.9);
        assert_eq!(team.injury_multiplier(), 0.9);
    }

    #[test]
    fn missing_stat_is_none() {
        assert!(make_team().baseline("drives").is_none());
        assert!(make_team().variance("drives").is_none());
    }

    #[test]
    fn deserializes_without_injury_multiplier() {
        let json = r#"{
            "id": "NYR",
            "league": "nhl",
            "kind": "team",
            "baselines": {"goals_for": 3.1},
            "variances": {"goals_for": 3.1}
        }"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.injury_multiplier(), 1.0);
        assert_eq!(entity.baseline("goals_for"), Some(3.1));
    }
}
