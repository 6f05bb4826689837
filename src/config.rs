//! Engine Configuration - Publish Policy and Rule Selection

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::rules;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown rule in disabledRules: {0}")]
    UnknownRule(String),
}

/// What the publish gate does with error-severity findings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    #[default]
    Block,
    Warn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default = "default_min_version")]
    pub engine_min_version: String,
    #[serde(default)]
    pub failure_mode: FailureMode,
    #[serde(default = "default_max_fix_passes")]
    pub max_fix_passes: u32,
    #[serde(default)]
    pub disabled_rules: Vec<String>,
}

fn default_min_version() -> String { crate::MIN_ENGINE_VERSION.to_string() }
fn default_max_fix_passes() -> u32 { 5 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_min_version: default_min_version(),
            failure_mode: FailureMode::default(),
            max_fix_passes: default_max_fix_passes(),
            disabled_rules: vec![],
        }
    }
}

impl EngineConfig {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.check_rule_ids()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    fn check_rule_ids(&self) -> Result<(), ConfigError> {
        match self.disabled_rules.iter().find(|id| rules::find_rule(id.as_str()).is_none()) {
            Some(id) => Err(ConfigError::UnknownRule(id.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config.failure_mode, FailureMode::Block);
        assert_eq!(config.max_fix_passes, 5);
        assert!(config.disabled_rules.is_empty());
        assert_eq!(config.engine_min_version, "1.0.0");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"failureMode": "warn", "maxFixPasses": 2, "disabledRules": ["canvas_aspect_ratio"]}}"#
        )
        .unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.failure_mode, FailureMode::Warn);
        assert_eq!(config.max_fix_passes, 2);
        assert_eq!(config.disabled_rules, vec!["canvas_aspect_ratio"]);
    }

    #[test]
    fn test_unknown_rule_rejected() {
        let err = EngineConfig::from_json(r#"{"disabledRules": ["blur_detection"]}"#).unwrap_err();
        assert!(err.to_string().contains("blur_detection"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
