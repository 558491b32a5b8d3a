//! Configuration module for Tally
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - Settings persistence

pub mod paths;
pub mod settings;

pub use paths::TallyPaths;
pub use settings::Settings;
