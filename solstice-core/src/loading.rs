//! Global route loading indicator.
//!
//! Navigations that finish quickly never flash the indicator: it only shows
//! once a navigation has been running for `show_delay`. Hiding is two-step so
//! the renderer can fade out: `is_transitioning` drops first, `is_loading`
//! follows after `fade_out`. A watchdog hides an indicator that was left on
//! by a navigation that never reported completion.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::Result;
use crate::settings::LoadingSettings;
use crate::timer::{DebounceTimer, TimerEpoch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingConfig {
    pub show_delay: Duration,
    pub finish_delay: Duration,
    pub fade_out: Duration,
    pub watchdog: Duration,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        LoadingSettings::default().into()
    }
}

impl From<LoadingSettings> for LoadingConfig {
    fn from(settings: LoadingSettings) -> Self {
        let ms = |value: u64| Duration::from_millis(value.max(1));
        Self {
            show_delay: ms(settings.show_delay_ms),
            finish_delay: ms(settings.finish_delay_ms),
            fade_out: ms(settings.fade_out_ms),
            watchdog: ms(settings.watchdog_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingState {
    pub is_loading: bool,
    pub is_transitioning: bool,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Show,
    Finish,
    Fade,
    Watchdog,
}

struct IndicatorState {
    current: LoadingState,
    disposed: bool,
    show: DebounceTimer,
    finish: DebounceTimer,
    fade: DebounceTimer,
    watchdog: DebounceTimer,
}

impl IndicatorState {
    fn timer(&mut self, slot: Slot) -> &mut DebounceTimer {
        match slot {
            Slot::Show => &mut self.show,
            Slot::Finish => &mut self.finish,
            Slot::Fade => &mut self.fade,
            Slot::Watchdog => &mut self.watchdog,
        }
    }

    fn cancel_all(&mut self) {
        self.show.cancel();
        self.finish.cancel();
        self.fade.cancel();
        self.watchdog.cancel();
    }
}

struct Shared {
    state: Mutex<IndicatorState>,
    published: watch::Sender<LoadingState>,
}

impl Shared {
    fn arm(self: &Arc<Self>, state: &mut IndicatorState, slot: Slot) {
        let shared = Arc::downgrade(self);
        state
            .timer(slot)
            .schedule(move |epoch| Shared::on_elapsed(&shared, slot, epoch));
    }

    fn on_elapsed(shared: &Weak<Self>, slot: Slot, epoch: TimerEpoch) {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let mut state = shared.state.lock();
        if state.disposed || !state.timer(slot).settle(epoch) {
            return;
        }

        match slot {
            Slot::Show => shared.show_locked(&mut state),
            Slot::Finish => shared.hide_locked(&mut state),
            Slot::Watchdog => {
                if state.current.is_loading {
                    warn!("route loading indicator stuck, forcing hide");
                    shared.hide_locked(&mut state);
                }
            }
            Slot::Fade => {
                state.current.is_loading = false;
                state.watchdog.cancel();
                shared.publish(&state);
            }
        }
    }

    fn show_locked(&self, state: &mut IndicatorState) {
        state.fade.cancel();
        state.current = LoadingState {
            is_loading: true,
            is_transitioning: true,
        };
        debug!("route loading indicator shown");
        self.publish(state);
    }

    fn hide_locked(self: &Arc<Self>, state: &mut IndicatorState) {
        state.current.is_transitioning = false;
        self.publish(state);
        self.arm(state, Slot::Fade);
        debug!("route loading indicator fading out");
    }

    fn publish(&self, state: &IndicatorState) {
        self.published.send_replace(state.current);
    }
}

/// Navigation-driven loading flag shared by the whole app.
pub struct RouteLoadingIndicator {
    config: LoadingConfig,
    shared: Arc<Shared>,
}

impl fmt::Debug for RouteLoadingIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteLoadingIndicator")
            .field("config", &self.config)
            .field("state", &*self.shared.published.borrow())
            .finish()
    }
}

impl RouteLoadingIndicator {
    pub fn new(config: LoadingConfig) -> Result<Self> {
        Ok(Self::with_runtime(config, Handle::try_current()?))
    }

    pub fn with_runtime(config: LoadingConfig, runtime: Handle) -> Self {
        let (published, _) = watch::channel(LoadingState::default());
        let state = IndicatorState {
            current: LoadingState::default(),
            disposed: false,
            show: DebounceTimer::new(config.show_delay, runtime.clone()),
            finish: DebounceTimer::new(config.finish_delay, runtime.clone()),
            fade: DebounceTimer::new(config.fade_out, runtime.clone()),
            watchdog: DebounceTimer::new(config.watchdog, runtime),
        };
        Self {
            config,
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                published,
            }),
        }
    }

    /// A route change began. Replaces any pending delayed show and re-arms
    /// the watchdog.
    pub fn navigation_started(&self) {
        let mut state = self.shared.state.lock();
        if state.disposed {
            return;
        }
        self.shared.arm(&mut state, Slot::Show);
        self.shared.arm(&mut state, Slot::Watchdog);
    }

    /// The route change completed.
    pub fn navigation_finished(&self) {
        let mut state = self.shared.state.lock();
        if state.disposed {
            return;
        }
        state.show.cancel();
        if state.current.is_loading {
            self.shared.arm(&mut state, Slot::Finish);
        }
    }

    pub fn show(&self) {
        let mut state = self.shared.state.lock();
        if !state.disposed {
            self.shared.show_locked(&mut state);
        }
    }

    pub fn hide(&self) {
        let mut state = self.shared.state.lock();
        if !state.disposed {
            self.shared.hide_locked(&mut state);
        }
    }

    pub fn state(&self) -> LoadingState {
        *self.shared.published.borrow()
    }

    pub fn watch(&self) -> watch::Receiver<LoadingState> {
        self.shared.published.subscribe()
    }

    pub fn dispose(&self) {
        let mut state = self.shared.state.lock();
        if state.disposed {
            return;
        }
        state.disposed = true;
        state.cancel_all();
    }
}

impl Drop for RouteLoadingIndicator {
    fn drop(&mut self) {
        self.dispose();
    }
}
