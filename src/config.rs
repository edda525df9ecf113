use std::path::Path;

use thiserror::Error;

use crate::labeler::ValidLabels;

/// Labels whose name contains this marker describe workflow state and may be removed by the bot.
pub const DEFAULT_REMOVABLE_LABEL_MARKER: &str = "Status: ";

/// Configuration of the bot, optionally loaded from a TOML file passed on the command line.
#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LabelerConfig {
    /// Labels that may be detected in a PR title. Falls back to the built-in list.
    #[serde(default = "default_valid_labels")]
    pub valid_labels: ValidLabels,
    #[serde(default = "default_removable_label_marker")]
    pub removable_label_marker: String,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            valid_labels: default_valid_labels(),
            removable_label_marker: default_removable_label_marker(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("The list of valid labels must not be empty")]
    EmptyValidLabels,
    #[error("The removable label marker must not be empty")]
    EmptyRemovableLabelMarker,
}

impl LabelerConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: LabelerConfig = toml::from_str(text)?;
        if config.valid_labels.is_empty() {
            return Err(ConfigError::EmptyValidLabels);
        }
        if config.removable_label_marker.is_empty() {
            return Err(ConfigError::EmptyRemovableLabelMarker);
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }
}

fn default_valid_labels() -> ValidLabels {
    ValidLabels::default()
}

fn default_removable_label_marker() -> String {
    DEFAULT_REMOVABLE_LABEL_MARKER.to_string()
}
