//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`]: Builders for teams, projections, markets and bet records.
//! - [`config`]: Canonical TOML samples and fast engine settings.

pub mod config;
pub mod domain;
