//! Shared configuration for mesh simplification
//!
//! This crate provides the single source of truth for simplification
//! settings shared by the library and the command-line front end. Values
//! come from defaults, an optional JSON file and `LOD_*` environment
//! variables.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default number of collapse iterations
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Default per-axis tolerance for merging coincident vertices
pub const DEFAULT_WELD_EPSILON: f32 = 1e-4;

/// Environment variable overriding [`SimplifyConfig::iterations`]
pub const ENV_ITERATIONS: &str = "LOD_ITERATIONS";

/// Environment variable overriding [`SimplifyConfig::target_faces`]
pub const ENV_TARGET_FACES: &str = "LOD_TARGET_FACES";

/// Environment variable overriding [`SimplifyConfig::weld_epsilon`]
pub const ENV_WELD_EPSILON: &str = "LOD_WELD_EPSILON";

/// Errors loading or overriding configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}

/// Settings for one simplification run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyConfig {
    /// Maximum number of edge collapses
    pub iterations: usize,
    /// Stop once the live face count is at or below this
    pub target_faces: Option<usize>,
    /// Weld tolerance used when loading meshes
    pub weld_epsilon: f32,
    /// Run a full topology validation after every collapse
    pub validate_each_step: bool,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            target_faces: None,
            weld_epsilon: DEFAULT_WELD_EPSILON,
            validate_each_step: false,
        }
    }
}

impl SimplifyConfig {
    /// Create a config running `iterations` collapses
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Apply `LOD_ITERATIONS`, `LOD_TARGET_FACES` and `LOD_WELD_EPSILON`
    /// from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ITERATIONS) {
            self.iterations = parse_value(ENV_ITERATIONS, &value)?;
        }
        if let Some(value) = lookup(ENV_TARGET_FACES) {
            self.target_faces = Some(parse_value(ENV_TARGET_FACES, &value)?);
        }
        if let Some(value) = lookup(ENV_WELD_EPSILON) {
            let epsilon: f32 = parse_value(ENV_WELD_EPSILON, &value)?;
            if !(epsilon.is_finite() && epsilon > 0.0) {
                return Err(invalid(ENV_WELD_EPSILON, &value));
            }
            self.weld_epsilon = epsilon;
        }
        Ok(self)
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_default_config() {
        let config = SimplifyConfig::default();
        assert_eq!(config.iterations, DEFAULT_ITERATIONS);
        assert_eq!(config.target_faces, None);
        assert_eq!(config.weld_epsilon, DEFAULT_WELD_EPSILON);
        assert!(!config.validate_each_step);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimplifyConfig::from_json_str(r#"{ "iterations": 25 }"#).unwrap();
        assert_eq!(config.iterations, 25);
        assert_eq!(config.weld_epsilon, DEFAULT_WELD_EPSILON);

        let config =
            SimplifyConfig::from_json_str(r#"{ "target_faces": 500, "validate_each_step": true }"#)
                .unwrap();
        assert_eq!(config.target_faces, Some(500));
        assert!(config.validate_each_step);
    }

    #[test]
    fn test_bad_json_rejected() {
        let result = SimplifyConfig::from_json_str(r#"{ "iterations": "many" }"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_overrides() {
        let config = SimplifyConfig::new(10)
            .apply_overrides(lookup(&[
                (ENV_ITERATIONS, "200"),
                (ENV_TARGET_FACES, " 64 "),
                (ENV_WELD_EPSILON, "0.001"),
            ]))
            .unwrap();
        assert_eq!(config.iterations, 200);
        assert_eq!(config.target_faces, Some(64));
        assert_eq!(config.weld_epsilon, 0.001);
    }

    #[test]
    fn test_missing_overrides_keep_values() {
        let config = SimplifyConfig::new(10).apply_overrides(lookup(&[])).unwrap();
        assert_eq!(config, SimplifyConfig::new(10));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let result = SimplifyConfig::default().apply_overrides(lookup(&[(ENV_ITERATIONS, "-3")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref key, .. }) if key == ENV_ITERATIONS
        ));

        let result =
            SimplifyConfig::default().apply_overrides(lookup(&[(ENV_WELD_EPSILON, "0")]));
        assert!(result.is_err());
    }
}
