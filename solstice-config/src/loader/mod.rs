pub mod error;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::models::{ConfigMetadata, ConfigSource, GalleryConfig};
use crate::validation::{self, ConfigWarnings};
use error::ConfigLoadError;

pub const CONFIG_PATH_VAR: &str = "SOLSTICE_CONFIG_PATH";
pub const CONFIG_JSON_VAR: &str = "SOLSTICE_CONFIG_JSON";
pub const LOG_VAR: &str = "SOLSTICE_LOG";

const DEFAULT_CONFIG_LOCATIONS: &[&str] = &[
    "solstice.toml",
    "solstice.json",
    "config/solstice.toml",
    "config/solstice.json",
];

/// Reads one environment variable. Swapped out in tests so the process
/// environment is never touched.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ConfigLoaderOptions {
    /// Explicit file, e.g. from `--config`. Takes precedence over the
    /// environment.
    pub config_path: Option<PathBuf>,
    /// `.env` file to merge into the lookup. Defaults to `<search_root>/.env`.
    pub env_file: Option<PathBuf>,
    /// Directory the default file locations are resolved against.
    pub search_root: PathBuf,
}

impl Default for ConfigLoaderOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            env_file: None,
            search_root: PathBuf::from("."),
        }
    }
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: GalleryConfig,
    pub warnings: ConfigWarnings,
    pub metadata: ConfigMetadata,
}

pub struct ConfigLoader {
    options: ConfigLoaderOptions,
    env: EnvLookup,
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::with_options(ConfigLoaderOptions::default())
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self {
            options,
            env: Arc::new(|key| std::env::var(key).ok()),
        }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_search_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.options.search_root = root.into();
        self
    }

    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (dotenv, env_file_loaded) = self.read_env_file()?;
        // Real environment wins over `.env`, matching dotenvy's own rule.
        let lookup = |key: &str| {
            (self.env)(key)
                .or_else(|| dotenv.get(key).cloned())
                .filter(|value| !value.trim().is_empty())
        };

        let (mut config, source) = self.load_document(&lookup)?;
        let overrides = apply_env_overrides(&mut config, &lookup)?;
        let warnings = validation::apply_guard_rails(&config)?;

        info!(
            source = ?source,
            env_file_loaded,
            overrides = overrides.len(),
            warnings = warnings.len(),
            "configuration loaded"
        );

        Ok(ConfigLoad {
            config,
            warnings,
            metadata: ConfigMetadata {
                source,
                env_file_loaded,
                overrides,
            },
        })
    }

    fn read_env_file(
        &self,
    ) -> Result<(HashMap<String, String>, bool), ConfigLoadError> {
        let path = self
            .options
            .env_file
            .clone()
            .unwrap_or_else(|| self.options.search_root.join(".env"));

        let iter = match dotenvy::from_path_iter(&path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(_)) => {
                debug!(path = %path.display(), "no env file");
                return Ok((HashMap::new(), false));
            }
            Err(err) => return Err(err.into()),
        };

        let vars = iter.collect::<Result<HashMap<_, _>, _>>()?;
        debug!(path = %path.display(), vars = vars.len(), "env file read");
        Ok((vars, true))
    }

    fn load_document(
        &self,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<(GalleryConfig, ConfigSource), ConfigLoadError> {
        if let Some(path) = &self.options.config_path {
            let config = load_from_file(path)?;
            return Ok((config, ConfigSource::File(path.clone())));
        }

        if let Some(raw) = lookup(CONFIG_PATH_VAR) {
            let path = PathBuf::from(raw.trim());
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = lookup(CONFIG_JSON_VAR) {
            let config = parse_json(&raw, CONFIG_JSON_VAR)?;
            return Ok((config, ConfigSource::EnvInline));
        }

        if let Some(path) = self.find_default_file() {
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((GalleryConfig::default(), ConfigSource::Default))
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        DEFAULT_CONFIG_LOCATIONS
            .iter()
            .map(|candidate| self.options.search_root.join(candidate))
            .find(|path| path.is_file())
    }
}

pub fn load_from_file(path: &Path) -> Result<GalleryConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let origin = path.display().to_string();

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => parse_json(&contents, &origin),
        Some("toml") => {
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                origin,
                message: err.to_string(),
            })
        }
        _ => parse_from_str(&contents, &origin),
    }
}

/// Parse a document of unknown format: TOML first, then JSON.
pub fn parse_from_str(
    contents: &str,
    origin: &str,
) -> Result<GalleryConfig, ConfigLoadError> {
    toml::from_str(contents).or_else(|toml_err| {
        serde_json::from_str(contents).map_err(|json_err| {
            ConfigLoadError::Parse {
                origin: origin.to_string(),
                message: format!(
                    "toml error: {toml_err}; json error: {json_err}"
                ),
            }
        })
    })
}

fn parse_json(raw: &str, origin: &str) -> Result<GalleryConfig, ConfigLoadError> {
    serde_json::from_str(raw).map_err(|err| ConfigLoadError::Parse {
        origin: origin.to_string(),
        message: err.to_string(),
    })
}

fn apply_env_overrides(
    config: &mut GalleryConfig,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<Vec<&'static str>, ConfigLoadError> {
    let mut applied = Vec::new();

    override_millis(
        lookup,
        "SOLSTICE_DEBOUNCE_WINDOW",
        &mut config.visibility.debounce_window_ms,
        &mut applied,
    )?;
    override_millis(
        lookup,
        "SOLSTICE_SETTLE_DELAY",
        &mut config.visibility.settle_delay_ms,
        &mut applied,
    )?;
    override_millis(
        lookup,
        "SOLSTICE_MESSAGE_DURATION",
        &mut config.messages.default_duration_ms,
        &mut applied,
    )?;
    override_millis(
        lookup,
        "SOLSTICE_LOADING_WATCHDOG",
        &mut config.loading.watchdog_ms,
        &mut applied,
    )?;

    if let Some(filter) = lookup(LOG_VAR) {
        config.logging.filter = filter.trim().to_string();
        applied.push(LOG_VAR);
    }

    Ok(applied)
}

fn override_millis(
    lookup: &dyn Fn(&str) -> Option<String>,
    key: &'static str,
    slot: &mut u64,
    applied: &mut Vec<&'static str>,
) -> Result<(), ConfigLoadError> {
    let Some(raw) = lookup(key) else {
        return Ok(());
    };
    let duration = humantime::parse_duration(raw.trim()).map_err(|source| {
        ConfigLoadError::InvalidOverride {
            key,
            value: raw.clone(),
            source,
        }
    })?;
    *slot = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    debug!(key, millis = *slot, "env override applied");
    applied.push(key);
    Ok(())
}
