//! Configuration management for the correlator.
//!
//! This module provides:
//! - TOML-based configuration with `[gcc]` and `[logging]` sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only the changed section is modified)
//!
//! # Example
//!
//! ```no_run
//! use gcc_core::config::{ConfigManager, ConfigSection};
//! use gcc_core::gcc::Gcc;
//!
//! let mut config = ConfigManager::new(".config/gcc.toml");
//! config.load_or_create().unwrap();
//!
//! let correlator = Gcc::from_settings(1024, &config.settings().gcc).unwrap();
//!
//! config.settings_mut().gcc.weighting = "phat".to_string();
//! config.update_section(ConfigSection::Gcc).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigManager, SettingsError, SettingsResult};
pub use settings::{ConfigSection, GccSection, GccSettings, LoggingSection};
