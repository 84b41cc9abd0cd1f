use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use solstice_core::{LoadingSettings, MessageSettings, VisibilitySettings};

/// Where the configuration document came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::EnvPath(path) | Self::File(path) => Some(path),
            Self::Default | Self::EnvInline => None,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset, e.g.
    /// `"info"` or `"solstice_core=debug,info"`.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Everything the gallery runtime reads at startup. Every section is
/// optional in files; missing fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub visibility: VisibilitySettings,
    pub messages: MessageSettings,
    pub loading: LoadingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMetadata {
    pub source: ConfigSource,
    pub env_file_loaded: bool,
    /// Environment variables that overrode a file or default value.
    pub overrides: Vec<&'static str>,
}
