//! Infrastructure layer.
//!
//! Technical concerns that support the pipeline without containing betting
//! logic: configuration loading, validation, and logging setup.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation

pub mod config;
