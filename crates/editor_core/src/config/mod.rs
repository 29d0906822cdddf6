//! Editor configuration
//!
//! Typed settings for the scene-side subsystems, deserializable from TOML.
//! Reading and writing config files is the surrounding application's job;
//! this module only defines the schema, defaults, and (de)serialization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML text was not a valid editor configuration
    #[error("failed to parse editor config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized back to TOML
    #[error("failed to serialize editor config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Picking subsystem settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingConfig {
    /// Default maximum ray length in world units
    pub max_distance: f32,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self { max_distance: 1000.0 }
    }
}

/// Selection subsystem settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// RGBA outline color for selected entities
    pub highlight_color: [f32; 4],
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            highlight_color: [1.0, 0.6, 0.0, 1.0],
        }
    }
}

/// Top-level editor core configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Picking settings
    pub picking: PickingConfig,
    /// Selection settings
    pub selection: SelectionConfig,
}

impl EditorConfig {
    /// Parse a configuration from TOML text
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize the configuration to TOML text
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_relative_eq!(config.picking.max_distance, 1000.0);
        assert_eq!(config.selection.highlight_color, [1.0, 0.6, 0.0, 1.0]);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = EditorConfig::from_toml_str(
            r#"
            [picking]
            max_distance = 250.0
            "#,
        )
        .expect("valid config");

        assert_relative_eq!(config.picking.max_distance, 250.0);
        assert_eq!(config.selection.highlight_color, [1.0, 0.6, 0.0, 1.0]);
    }

    #[test]
    fn test_round_trip() {
        let mut config = EditorConfig::default();
        config.picking.max_distance = 42.0;
        config.selection.highlight_color = [0.0, 1.0, 0.0, 1.0];

        let text = config.to_toml_string().expect("serializable");
        let parsed = EditorConfig::from_toml_str(&text).expect("round trip");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result = EditorConfig::from_toml_str("picking = \"not a table\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
