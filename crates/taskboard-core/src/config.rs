//! Configuration for Taskboard.

use crate::error::Result;
use crate::planner::Stage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Board configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Directory holding the collection files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File name of the task collection
    #[serde(default = "default_tasks_file")]
    pub tasks_file: String,

    /// File name of the staff collection
    #[serde(default = "default_staff_file")]
    pub staff_file: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Defaults for the production planner
    #[serde(default)]
    pub production: ProductionConfig,
}

/// Production planner defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionConfig {
    /// Order quantity used when none is given
    #[serde(default = "default_orders")]
    pub orders: u32,

    /// Stage names and per-unit durations in minutes
    #[serde(default = "default_stages")]
    pub stages: Vec<Stage>,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".taskboard")
}

fn default_tasks_file() -> String {
    "gorevler.csv".to_string()
}

fn default_staff_file() -> String {
    "personel.csv".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_orders() -> u32 {
    50
}

fn default_stages() -> Vec<Stage> {
    vec![
        Stage::new("Kesim", 10.0),
        Stage::new("Montaj", 25.0),
        Stage::new("Boya", 15.0),
    ]
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            orders: default_orders(),
            stages: default_stages(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            tasks_file: default_tasks_file(),
            staff_file: default_staff_file(),
            log_level: default_log_level(),
            production: ProductionConfig::default(),
        }
    }
}

impl BoardConfig {
    /// Load configuration from the default location, falling back to defaults
    pub fn load() -> Self {
        let config_path = default_data_dir().join("config.yaml");

        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_yaml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config file: {}", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config file: {}", e);
                }
            }
        }

        Self::default()
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Path of the task collection file
    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join(&self.tasks_file)
    }

    /// Path of the staff collection file
    pub fn staff_path(&self) -> PathBuf {
        self.data_dir.join(&self.staff_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = BoardConfig::default();
        assert_eq!(config.tasks_file, "gorevler.csv");
        assert_eq!(config.staff_file, "personel.csv");
        assert_eq!(config.production.orders, 50);
        assert_eq!(config.production.stages.len(), 3);
        assert!(config.tasks_path().ends_with("gorevler.csv"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "data_dir: /srv/board\nproduction:\n  orders: 10\n",
        )
        .unwrap();

        let config = BoardConfig::load_from(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/board"));
        assert_eq!(config.production.orders, 10);
        assert_eq!(config.production.stages[1].name, "Montaj");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_load_from_rejects_garbage() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "production: [not, a, map]\n").unwrap();

        assert!(BoardConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = BoardConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: BoardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.production.stages, parsed.production.stages);
    }
}
