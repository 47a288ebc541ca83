// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration for fretwise.
//!
//! A config file supplies the defaults used when a request or CLI
//! invocation leaves a field out. YAML and TOML are both accepted; the
//! format is picked from the file extension.
//!
//! ```yaml
//! defaults:
//!   pattern: updown
//!   position: mid
//!   length: 16
//!   tempo: 100
//!   subdivision: 4
//! tuning: drop-d
//! spelling: auto
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::{
    RequestDefaults, MAX_LENGTH, MAX_SUBDIVISION, MAX_TEMPO, MIN_LENGTH, MIN_SUBDIVISION, MIN_TEMPO,
};
use crate::fretboard::{HandPosition, TuningPreset};
use crate::generators::ArpPattern;
use crate::music::note::SpellingPolicy;

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Tuning preset id
    #[serde(default = "default_tuning")]
    pub tuning: String,
    /// Note-name spelling
    #[serde(default)]
    pub spelling: SpellingPolicy,
    /// Request defaults
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

fn default_tuning() -> String {
    "standard-6".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tuning: default_tuning(),
            spelling: SpellingPolicy::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from a `.yaml`/`.yml` or `.toml` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if is_toml(path) {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize configuration to TOML")
    }

    /// Save in the format matching the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = if is_toml(path) { self.to_toml()? } else { self.to_yaml()? };
        fs::write(path, text).with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Check ranges and the tuning preset name
    pub fn validate(&self) -> Result<()> {
        let d = &self.defaults;
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&d.length) {
            bail!("length {} out of range {}-{}", d.length, MIN_LENGTH, MAX_LENGTH);
        }
        if !(MIN_TEMPO..=MAX_TEMPO).contains(&d.tempo) {
            bail!("tempo {} out of range {}-{}", d.tempo, MIN_TEMPO, MAX_TEMPO);
        }
        if !(MIN_SUBDIVISION..=MAX_SUBDIVISION).contains(&d.subdivision) {
            bail!(
                "subdivision {} out of range {}-{}",
                d.subdivision,
                MIN_SUBDIVISION,
                MAX_SUBDIVISION
            );
        }
        if TuningPreset::find(&self.tuning).is_none() {
            bail!("unknown tuning preset: {}", self.tuning);
        }
        Ok(())
    }

    /// Request defaults described by this config
    pub fn request_defaults(&self) -> Result<RequestDefaults> {
        self.validate()?;
        let tuning = TuningPreset::find(&self.tuning)
            .map(TuningPreset::tuning)
            .with_context(|| format!("unknown tuning preset: {}", self.tuning))?;

        Ok(RequestDefaults {
            pattern: self.defaults.pattern,
            position: self.defaults.position,
            length: self.defaults.length,
            tempo: self.defaults.tempo,
            subdivision: self.defaults.subdivision,
            tuning,
            spelling: self.spelling,
        })
    }
}

/// Defaults for omitted request fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub pattern: ArpPattern,
    #[serde(default)]
    pub position: HandPosition,
    /// Notes per arpeggio
    #[serde(default = "default_length")]
    pub length: usize,
    /// Tempo in BPM
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    /// Notes per beat
    #[serde(default = "default_subdivision")]
    pub subdivision: u32,
}

fn default_length() -> usize {
    16
}
fn default_tempo() -> f64 {
    120.0
}
fn default_subdivision() -> u32 {
    2
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            pattern: ArpPattern::default(),
            position: HandPosition::default(),
            length: default_length(),
            tempo: default_tempo(),
            subdivision: default_subdivision(),
        }
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("toml"))
}

/// Load and validate a configuration file
pub fn validate_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let config = AppConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
defaults:
  pattern: updown
  position: mid
  length: 12
  tempo: 90
  subdivision: 4
tuning: drop-d
spelling: flats
"#;

        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.defaults.pattern, ArpPattern::UpDown);
        assert_eq!(config.defaults.position, HandPosition::Mid);
        assert_eq!(config.defaults.length, 12);
        assert_eq!(config.defaults.tempo, 90.0);
        assert_eq!(config.defaults.subdivision, 4);
        assert_eq!(config.tuning, "drop-d");
        assert_eq!(config.spelling, SpellingPolicy::Flats);
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
tuning = "standard-7"
spelling = "auto"

[defaults]
pattern = "sweep"
tempo = 140.0
"#;

        let config = AppConfig::from_toml(text).unwrap();
        assert_eq!(config.defaults.pattern, ArpPattern::Sweep);
        assert_eq!(config.defaults.tempo, 140.0);
        assert_eq!(config.defaults.length, 16);
        assert_eq!(config.tuning, "standard-7");
        assert_eq!(config.spelling, SpellingPolicy::Auto);
    }

    #[test]
    fn test_default_values() {
        let config = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(config, AppConfig::default());

        let defaults = config.request_defaults().unwrap();
        assert_eq!(defaults, RequestDefaults::default());
    }

    #[test]
    fn test_unknown_pattern_rejected() {
        assert!(AppConfig::from_yaml("defaults:\n  pattern: zigzag\n").is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.defaults.length = 0;
        assert!(config.validate().is_err());

        config.defaults.length = 8;
        config.defaults.tempo = 301.0;
        assert!(config.validate().is_err());

        config.defaults.tempo = 120.0;
        config.defaults.subdivision = 9;
        assert!(config.validate().is_err());

        config.defaults.subdivision = 2;
        config.tuning = "banjo".to_string();
        assert!(config.validate().is_err());
        assert!(config.request_defaults().is_err());
    }

    #[test]
    fn test_request_defaults_use_tuning() {
        let config = AppConfig {
            tuning: "standard-8".to_string(),
            ..AppConfig::default()
        };
        let defaults = config.request_defaults().unwrap();
        assert_eq!(defaults.tuning.string_count(), 8);
    }

    #[test]
    fn test_round_trip_files() {
        let dir = tempdir().unwrap();
        let original = AppConfig {
            defaults: DefaultsConfig {
                pattern: ArpPattern::Descending,
                position: HandPosition::High,
                length: 32,
                tempo: 75.0,
                subdivision: 3,
            },
            tuning: "dadgad".to_string(),
            spelling: SpellingPolicy::Auto,
        };

        for name in ["fretwise.yaml", "fretwise.toml"] {
            let path = dir.path().join(name);
            original.save(&path).unwrap();
            let loaded = validate_config(&path).unwrap();
            assert_eq!(loaded, original, "{}", name);
        }
    }

    #[test]
    fn test_validate_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "this is not valid yaml: [").unwrap();
        assert!(validate_config(&path).is_err());

        assert!(validate_config(dir.path().join("missing.yaml")).is_err());
    }
}
