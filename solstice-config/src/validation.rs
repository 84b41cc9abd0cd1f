use std::fmt;

use thiserror::Error;

use crate::models::GalleryConfig;

const MAX_COMFORTABLE_DEBOUNCE_MS: u64 = 1_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error(
        "loading watchdog ({watchdog_ms} ms) must be longer than the show delay ({show_delay_ms} ms)"
    )]
    WatchdogTooShort {
        watchdog_ms: u64,
        show_delay_ms: u64,
    },
    #[error("message stack spacing must be greater than zero")]
    ZeroMessageSpacing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "{} (hint: {hint})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

pub fn apply_guard_rails(
    config: &GalleryConfig,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let loading = &config.loading;
    if loading.watchdog_ms <= loading.show_delay_ms {
        return Err(ConfigGuardRailError::WatchdogTooShort {
            watchdog_ms: loading.watchdog_ms,
            show_delay_ms: loading.show_delay_ms,
        });
    }

    if config.messages.stack_spacing_px == 0 {
        return Err(ConfigGuardRailError::ZeroMessageSpacing);
    }

    let visibility = &config.visibility;
    if visibility.debounce_window_ms > MAX_COMFORTABLE_DEBOUNCE_MS {
        warnings.push_with_hint(
            format!(
                "visibility debounce window is {} ms; the header will lag noticeably behind scrolling",
                visibility.debounce_window_ms
            ),
            "Values between 50 and 300 ms keep the header responsive",
        );
    }

    if visibility.settle_delay_ms < visibility.debounce_window_ms {
        warnings.push(format!(
            "settle delay ({} ms) is shorter than the debounce window ({} ms)",
            visibility.settle_delay_ms, visibility.debounce_window_ms
        ));
    }

    Ok(warnings)
}
