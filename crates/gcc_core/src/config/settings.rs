//! Settings struct with TOML-based sections.
//!
//! Each section maps to a TOML table and can be updated independently.

use serde::{Deserialize, Serialize};

use crate::gcc::DEFAULT_IMAGINARY_TOLERANCE;
use crate::logging::LogLevel;
use crate::models::{Padding, PeakMode, ScaleMode, WeightingKind};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GccSettings {
    /// Correlation settings.
    #[serde(default)]
    pub gcc: GccSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Correlator configuration as stored on disk.
///
/// The weighting is kept as a name so that an unknown value surfaces as a
/// configuration error when the correlator is built, not as a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GccSection {
    /// Weighting name (identity, phat, scot, roth).
    #[serde(default = "default_weighting")]
    pub weighting: String,

    /// Sample rate in Hz for delays in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<f64>,

    /// Parabolic sub-sample refinement.
    #[serde(default)]
    pub subsample: bool,

    #[serde(default)]
    pub scale: ScaleMode,

    #[serde(default)]
    pub padding: Padding,

    #[serde(default)]
    pub peak_mode: PeakMode,

    /// Largest |lag| considered by the peak search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lag: Option<usize>,

    /// Subtract the mean of each signal first.
    #[serde(default)]
    pub remove_dc: bool,

    /// Relative tolerance for the imaginary residue warning.
    #[serde(default = "default_imaginary_tolerance")]
    pub imaginary_tolerance: f64,
}

fn default_weighting() -> String {
    WeightingKind::default().as_str().to_string()
}

fn default_imaginary_tolerance() -> f64 {
    DEFAULT_IMAGINARY_TOLERANCE
}

impl Default for GccSection {
    fn default() -> Self {
        Self {
            weighting: default_weighting(),
            sample_rate: None,
            subsample: false,
            scale: ScaleMode::default(),
            padding: Padding::default(),
            peak_mode: PeakMode::default(),
            max_lag: None,
            remove_dc: false,
            imaginary_tolerance: default_imaginary_tolerance(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Include the module target in log lines.
    #[serde(default = "default_true")]
    pub show_target: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            show_target: true,
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Gcc,
    Logging,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 2] = [ConfigSection::Gcc, ConfigSection::Logging];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Gcc => "gcc",
            ConfigSection::Logging => "logging",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = GccSettings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[gcc]"));
        assert!(toml.contains("[logging]"));
        assert!(toml.contains("weighting = \"identity\""));
        assert!(!toml.contains("sample_rate"));
    }

    #[test]
    fn settings_round_trip() {
        let mut settings = GccSettings::default();
        settings.gcc.weighting = "phat".to_string();
        settings.gcc.sample_rate = Some(44_100.0);
        settings.gcc.padding = Padding::Linear;
        settings.gcc.peak_mode = PeakMode::AbsMax;
        settings.logging.level = LogLevel::Debug;

        let toml = toml::to_string_pretty(&settings).unwrap();
        let parsed: GccSettings = toml::from_str(&toml).unwrap();

        assert_eq!(parsed, settings);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[gcc]\nweighting = \"scot\"\nmax_lag = 40";
        let parsed: GccSettings = toml::from_str(minimal).unwrap();
        // Custom values preserved
        assert_eq!(parsed.gcc.weighting, "scot");
        assert_eq!(parsed.gcc.max_lag, Some(40));
        // Defaults applied for missing
        assert_eq!(parsed.gcc.scale, ScaleMode::None);
        assert_eq!(parsed.gcc.imaginary_tolerance, DEFAULT_IMAGINARY_TOLERANCE);
        assert_eq!(parsed.logging, LoggingSection::default());
    }

    #[test]
    fn enum_values_are_lowercase() {
        let parsed: GccSettings =
            toml::from_str("[gcc]\nscale = \"unbiased\"\npeak_mode = \"absmax\"\n").unwrap();
        assert_eq!(parsed.gcc.scale, ScaleMode::Unbiased);
        assert_eq!(parsed.gcc.peak_mode, PeakMode::AbsMax);
    }
}
