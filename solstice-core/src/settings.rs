//! User-facing tuning knobs.
//!
//! These structs are what configuration files deserialize into. Every field
//! is in milliseconds or pixels so the files stay readable; the runtime
//! components convert them into `Duration`-based configs on construction.

use serde::{Deserialize, Serialize};

/// Visibility statistics tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct VisibilitySettings {
    /// Quiet period (ms) after the last scroll/resize/intersection signal
    /// before the visible summary is recomputed. Larger values cut work
    /// during fast scrolling but make the header lag behind.
    pub debounce_window_ms: u64,
    /// Delay (ms) after activation before regions are observed, giving the
    /// first batch of grid items time to register.
    pub settle_delay_ms: u64,
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            debounce_window_ms: 100,
            settle_delay_ms: 100,
        }
    }
}

/// Transient message (toast) tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MessageSettings {
    /// Lifetime (ms) of a message shown without an explicit duration.
    pub default_duration_ms: u64,
    /// Distance (px) from the top of the window to the first message.
    pub stack_offset_px: u32,
    /// Vertical distance (px) between stacked messages, gap included.
    pub stack_spacing_px: u32,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            default_duration_ms: 3_000,
            stack_offset_px: 32,
            stack_spacing_px: 70,
        }
    }
}

/// Route loading indicator tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadingSettings {
    /// Navigations finishing faster than this (ms) never show the indicator.
    pub show_delay_ms: u64,
    /// Pause (ms) after a navigation completes before the indicator hides.
    pub finish_delay_ms: u64,
    /// Fade-out length (ms) between `is_transitioning` and `is_loading`
    /// dropping.
    pub fade_out_ms: u64,
    /// Hard limit (ms) after which a stuck indicator is hidden regardless.
    pub watchdog_ms: u64,
}

impl Default for LoadingSettings {
    fn default() -> Self {
        Self {
            show_delay_ms: 200,
            finish_delay_ms: 300,
            fade_out_ms: 300,
            watchdog_ms: 8_000,
        }
    }
}
