//! Config manager for loading, saving, and atomic updates.
//!
//! - Atomic writes (write to temp file, then rename)
//! - Section-level updates through `toml_edit`, so other sections and their
//!   comments stay as they are on disk

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{DocumentMut, Item};

use super::settings::{ConfigSection, GccSettings};

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Failed to parse config for editing: {0}")]
    EditParseError(#[from] toml_edit::TomlError),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for config operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Manages the correlator configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: GccSettings,
}

impl ConfigManager {
    /// Create a manager for `config_path`.
    ///
    /// Does not touch the file; call `load()` or `load_or_create()` after.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: GccSettings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &GccSettings {
        &self.settings
    }

    /// Mutable settings. Changes stay in memory until `save()` or
    /// `update_section()` is called.
    pub fn settings_mut(&mut self) -> &mut GccSettings {
        &mut self.settings
    }

    /// Load config from file.
    ///
    /// Returns error if file doesn't exist.
    pub fn load(&mut self) -> SettingsResult<()> {
        if !self.config_path.exists() {
            return Err(SettingsError::NotFound(self.config_path.clone()));
        }

        let content = fs::read_to_string(&self.config_path)?;
        self.settings = toml::from_str(&content)?;
        tracing::debug!("Loaded settings from {}", self.config_path.display());
        Ok(())
    }

    /// Load config from file, creating it with defaults if it doesn't exist.
    ///
    /// Sections missing from an existing file are written back with their
    /// defaults.
    pub fn load_or_create(&mut self) -> SettingsResult<()> {
        if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)?;
            let doc: DocumentMut = content.parse()?;
            self.settings = toml::from_str(&content)?;

            let missing: Vec<ConfigSection> = ConfigSection::ALL
                .into_iter()
                .filter(|section| !doc.contains_key(section.table_name()))
                .collect();
            for section in missing {
                tracing::info!(
                    "Adding missing [{}] section to {}",
                    section.table_name(),
                    self.config_path.display()
                );
                self.update_section(section)?;
            }
        } else {
            tracing::info!(
                "Creating default settings at {}",
                self.config_path.display()
            );
            self.settings = GccSettings::default();
            self.save()?;
        }
        Ok(())
    }

    /// Save the entire config atomically.
    pub fn save(&self) -> SettingsResult<()> {
        let content = self.generate_config_with_comments()?;
        self.atomic_write(&content)?;
        Ok(())
    }

    /// Rewrite one section on disk, leaving the rest of the file untouched.
    ///
    /// The file is re-read first so only the in-memory copy of `section` is
    /// written.
    pub fn update_section(&mut self, section: ConfigSection) -> SettingsResult<()> {
        let current_content = if self.config_path.exists() {
            fs::read_to_string(&self.config_path)?
        } else {
            String::new()
        };

        let mut doc: DocumentMut = if current_content.is_empty() {
            DocumentMut::new()
        } else {
            current_content.parse()?
        };

        let section_toml = match section {
            ConfigSection::Gcc => toml::to_string_pretty(&self.settings.gcc)?,
            ConfigSection::Logging => toml::to_string_pretty(&self.settings.logging)?,
        };

        let section_doc: DocumentMut = section_toml.parse()?;
        let section_table = section_doc.as_table().clone();

        doc[section.table_name()] = Item::Table(section_table);

        self.atomic_write(&doc.to_string())?;
        tracing::debug!("Updated [{}] section", section.table_name());

        Ok(())
    }

    /// Generate config content with helpful comments.
    fn generate_config_with_comments(&self) -> SettingsResult<String> {
        let mut output = String::new();

        output.push_str("# GCC correlator configuration\n");
        output.push_str(
            "# Comments are preserved when a single section is updated.\n\n",
        );

        output.push_str("# weighting: identity | phat | scot | roth\n");
        output.push_str("# scale: none | biased | unbiased\n");
        output.push_str("# padding: circular | linear\n");
        output.push_str("# peak_mode: max | absmax\n");
        output.push_str("[gcc]\n");
        output.push_str(&toml::to_string_pretty(&self.settings.gcc)?);
        output.push('\n');

        output.push_str("# Logging configuration (RUST_LOG overrides level)\n");
        output.push_str("[logging]\n");
        output.push_str(&toml::to_string_pretty(&self.settings.logging)?);

        Ok(output)
    }

    /// Write content to the config file through a temp file and rename.
    fn atomic_write(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Same directory so the rename stays on one filesystem
        let temp_path = self.config_path.with_extension("toml.tmp");

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcc::{Gcc, GccConfig};
    use crate::logging::LogLevel;
    use crate::models::{Padding, WeightingKind};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_or_create_creates_default() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(".config").join("gcc.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert!(config_path.exists());
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[gcc]"));
        assert!(content.contains("[logging]"));

        // The generated file parses back to the defaults
        let mut reloaded = ConfigManager::new(&config_path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.settings(), &GccSettings::default());
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(dir.path().join("absent.toml"));
        assert!(matches!(manager.load(), Err(SettingsError::NotFound(_))));
    }

    #[test]
    fn load_or_create_preserves_existing() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("gcc.toml");

        fs::write(
            &config_path,
            "# keep me\n[gcc]\nweighting = \"phat\"\nsample_rate = 16000.0\n",
        )
        .unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert_eq!(manager.settings().gcc.weighting, "phat");
        assert_eq!(manager.settings().gcc.sample_rate, Some(16_000.0));

        // Missing [logging] was appended, the comment survived
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("# keep me"));
        assert!(content.contains("[logging]"));
    }

    #[test]
    fn update_section_only_changes_target() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("gcc.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        manager.settings_mut().logging.level = LogLevel::Trace;
        manager.settings_mut().gcc.weighting = "roth".to_string();

        manager.update_section(ConfigSection::Logging).unwrap();

        let mut reloaded = ConfigManager::new(&config_path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.settings().logging.level, LogLevel::Trace);
        // Gcc change was not written
        assert_eq!(reloaded.settings().gcc.weighting, "identity");

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("# weighting: identity | phat | scot | roth"));
    }

    #[test]
    fn atomic_write_creates_no_temp_on_success() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("gcc.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        let temp_path = config_path.with_extension("toml.tmp");
        assert!(!temp_path.exists());
    }

    #[test]
    fn saved_settings_build_a_correlator() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("gcc.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.settings_mut().gcc.weighting = "gcc-phat".to_string();
        manager.settings_mut().gcc.padding = Padding::Linear;
        manager.save().unwrap();

        let mut reloaded = ConfigManager::new(&config_path);
        reloaded.load().unwrap();
        let config = GccConfig::try_from(&reloaded.settings().gcc).unwrap();

        assert_eq!(config.weighting, WeightingKind::Phat);
        assert_eq!(config.padding, Padding::Linear);
        assert!(Gcc::new(32, config).is_ok());
    }
}
