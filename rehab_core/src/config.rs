//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/rehab/config.toml`.
//! Every clinician-tunable knob of the engine (scoring weights, safety
//! floor, backfill ratio, adjacency tables) can be overridden there;
//! partial files fill the rest from defaults.

use crate::knowledge::ClinicalKnowledge;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub equipment: EquipmentConfig,

    #[serde(default)]
    pub knowledge: ClinicalKnowledge,
}

/// Catalog source configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

/// Equipment the patient has available by default
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EquipmentConfig {
    #[serde(default = "default_equipment")]
    pub available: Vec<String>,
}

impl Default for EquipmentConfig {
    fn default() -> Self {
        Self {
            available: default_equipment(),
        }
    }
}

// Default value functions
fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/exercises.csv")
}

fn default_equipment() -> Vec<String> {
    vec!["resistance_band".into(), "mat".into()]
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("rehab").join("config.toml")
    }

    /// Save the current configuration to a specific path
    ///
    /// Used to materialize a full config file that clinicians can edit.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.path, PathBuf::from("data/exercises.csv"));
        assert!(!config.equipment.available.is_empty());
        assert_eq!(config.knowledge.safety_score_floor, -1.0);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.catalog.path, config.catalog.path);
        assert_eq!(parsed.equipment.available, config.equipment.available);
        assert_eq!(
            parsed.knowledge.weights.target_match,
            config.knowledge.weights.target_match
        );
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[knowledge]
safety_score_floor = -0.5

[knowledge.weights]
target_match = 4.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.knowledge.safety_score_floor, -0.5);
        assert_eq!(config.knowledge.weights.target_match, 4.0);
        assert_eq!(config.knowledge.weights.pain_type_compat, 2.5); // default
        assert_eq!(config.catalog.path, PathBuf::from("data/exercises.csv")); // default
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.equipment.available = vec!["chair".into()];
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.equipment.available, vec!["chair".to_string()]);
    }
}
