//! Probability calibration configuration.

use serde::Deserialize;

use crate::application::calibration::{
    CalibrationParams, DEFAULT_CEILING, DEFAULT_EPSILON, DEFAULT_FLOOR, DEFAULT_SHRINK_FACTOR,
};
use crate::domain::CalibrationMethod;

/// `[calibration]` section.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CalibrationConfig {
    #[serde(default)]
    pub method: CalibrationMethod,
    /// Weight kept on the distance from 0.5 (1.0 keeps the raw probability).
    #[serde(default = "default_shrink_factor")]
    pub shrink_factor: f64,
    #[serde(default = "default_floor")]
    pub floor: f64,
    #[serde(default = "default_ceiling")]
    pub ceiling: f64,
    /// Distance kept from 0 and 1 so odds stay finite.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

const fn default_shrink_factor() -> f64 {
    DEFAULT_SHRINK_FACTOR
}

const fn default_floor() -> f64 {
    DEFAULT_FLOOR
}

const fn default_ceiling() -> f64 {
    DEFAULT_CEILING
}

const fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            method: CalibrationMethod::default(),
            shrink_factor: default_shrink_factor(),
            floor: default_floor(),
            ceiling: default_ceiling(),
            epsilon: default_epsilon(),
        }
    }
}

impl From<CalibrationConfig> for CalibrationParams {
    fn from(config: CalibrationConfig) -> Self {
        Self {
            method: config.method,
            shrink_factor: config.shrink_factor,
            floor: config.floor,
            ceiling: config.ceiling,
            epsilon: config.epsilon,
        }
    }
}
