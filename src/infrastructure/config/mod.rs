//! Infrastructure configuration modules.

pub mod calibration;
pub mod league;
pub mod logging;
pub mod settings;
pub mod simulation;
pub mod staking;

pub use settings::Config;
