//! Debounced tracker of which gallery items are on screen.
//!
//! Items register with a [`RegionHandle`]; the host forwards scroll, resize
//! and intersection signals through [`VisibilityTracker::notify`]. Every
//! signal lands in the same single-slot debounce timer, so a burst of events
//! produces one recomputation that reads item geometry as of the moment the
//! timer fires.
//!
//! Lifecycle:
//!
//! ```text
//! Inactive --activate--> Settling --settle delay--> Idle
//! Idle --trigger--> PendingRecompute --window elapsed--> Idle (publish)
//! any --dispose--> Disposed
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard, ReentrantMutex};
use solstice_model::{AggregateStats, ItemMetadata};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, trace};

use super::aggregate::aggregate;
use super::region::{RegionHandle, RegionKey, ViewportHost};
use crate::error::{GalleryError, Result};
use crate::settings::VisibilitySettings;
use crate::timer::{DebounceTimer, TimerEpoch};

/// Runtime timings for a [`VisibilityTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Trailing-edge debounce applied to every recompute trigger.
    pub debounce_window: Duration,
    /// Wait between `activate` and the start of observation.
    pub settle_delay: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        VisibilitySettings::default().into()
    }
}

impl From<VisibilitySettings> for TrackerConfig {
    fn from(settings: VisibilitySettings) -> Self {
        Self {
            debounce_window: Duration::from_millis(
                settings.debounce_window_ms.max(1),
            ),
            settle_delay: Duration::from_millis(settings.settle_delay_ms.max(1)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    /// Constructed, not yet activated. Explicit `compute_stats` calls still work.
    Inactive,
    /// Activated, waiting for the initial registrations to land.
    Settling,
    Idle,
    PendingRecompute,
    Disposed,
}

/// Host signals that may change what is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityTrigger {
    /// Window scrolled. Ignored until the listener is attached.
    Scroll,
    /// Window resized. Ignored until the listener is attached.
    Resize,
    /// An observed region crossed the viewport boundary.
    Intersection(RegionKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type StatsCallback = Arc<dyn Fn(&AggregateStats) + Send + Sync>;

struct TrackedItem {
    key: RegionKey,
    metadata: ItemMetadata,
    region: RegionHandle,
}

struct TrackerState {
    items: Vec<TrackedItem>,
    observed: HashSet<RegionKey>,
    listening: bool,
    disposed: bool,
    settle: DebounceTimer,
    recompute: DebounceTimer,
    subscribers: Vec<(SubscriptionId, StatsCallback)>,
    next_subscription: u64,
}

impl TrackerState {
    fn phase(&self) -> TrackerPhase {
        if self.disposed {
            TrackerPhase::Disposed
        } else if self.recompute.is_pending() {
            TrackerPhase::PendingRecompute
        } else if self.settle.is_pending() {
            TrackerPhase::Settling
        } else if self.listening {
            TrackerPhase::Idle
        } else {
            TrackerPhase::Inactive
        }
    }

    fn position(&self, key: RegionKey) -> Option<usize> {
        self.items.iter().position(|item| item.key == key)
    }
}

struct Shared {
    host: Arc<dyn ViewportHost>,
    /// Held for the whole of a publish, subscriber calls included. Always
    /// taken before `state`. Reentrant so a subscriber may dispose.
    notifying: ReentrantMutex<()>,
    state: Mutex<TrackerState>,
    published: watch::Sender<AggregateStats>,
}

impl Shared {
    fn schedule_recompute(self: &Arc<Self>, state: &mut TrackerState) {
        let shared = Arc::downgrade(self);
        state.recompute.schedule(move |epoch| {
            Shared::on_recompute_elapsed(&shared, epoch);
        });
        trace!(items = state.items.len(), "visibility recompute scheduled");
    }

    fn on_recompute_elapsed(shared: &Weak<Self>, epoch: TimerEpoch) {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let _notifying = shared.notifying.lock();
        let mut state = shared.state.lock();
        if state.disposed || !state.recompute.settle(epoch) {
            return;
        }
        shared.publish(state);
    }

    fn on_settled(shared: &Weak<Self>, epoch: TimerEpoch) {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let _notifying = shared.notifying.lock();
        let mut state = shared.state.lock();
        if state.disposed || !state.settle.settle(epoch) {
            return;
        }

        let keys: Vec<RegionKey> =
            state.items.iter().map(|item| item.key).collect();
        state.observed.extend(keys);
        state.listening = true;
        // The initial computation supersedes anything queued while settling.
        state.recompute.cancel();
        debug!(
            observed = state.observed.len(),
            "visibility tracker observing regions"
        );
        shared.publish(state);
    }

    /// Recompute from current geometry and publish. Consumes the guard so
    /// subscribers run without the state lock held; the caller must hold
    /// `notifying`.
    fn publish(&self, state: MutexGuard<'_, TrackerState>) {
        let viewport = self.host.viewport();
        let stats = aggregate(
            state
                .items
                .iter()
                .filter(|item| item.region.bounds().intersects(viewport))
                .map(|item| &item.metadata),
        );
        self.published.send_replace(stats.clone());

        let subscribers: Vec<StatsCallback> = state
            .subscribers
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        drop(state);

        debug!(
            count = stats.count,
            date_range = %stats.date_range,
            "visibility stats published"
        );
        for callback in subscribers {
            // A subscriber may have disposed the tracker.
            if self.state.lock().disposed {
                break;
            }
            callback(&stats);
        }
    }
}

/// Registry of on-screen items with a debounced visible summary.
///
/// Dropping the tracker disposes it.
pub struct VisibilityTracker {
    config: TrackerConfig,
    shared: Arc<Shared>,
}

impl fmt::Debug for VisibilityTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("VisibilityTracker");
        debug.field("config", &self.config);
        match self.shared.state.try_lock() {
            Some(state) => {
                debug
                    .field("phase", &state.phase())
                    .field("items", &state.items.len())
                    .field("observed", &state.observed.len());
            }
            None => {
                debug.field("state", &"<locked>");
            }
        }
        debug.finish()
    }
}

impl VisibilityTracker {
    /// Create a tracker bound to the ambient tokio runtime.
    pub fn new(
        config: TrackerConfig,
        host: Arc<dyn ViewportHost>,
    ) -> Result<Self> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_runtime(config, host, runtime))
    }

    pub fn with_runtime(
        config: TrackerConfig,
        host: Arc<dyn ViewportHost>,
        runtime: Handle,
    ) -> Self {
        let (published, _) = watch::channel(AggregateStats::empty());
        let state = TrackerState {
            items: Vec::new(),
            observed: HashSet::new(),
            listening: false,
            disposed: false,
            settle: DebounceTimer::new(config.settle_delay, runtime.clone()),
            recompute: DebounceTimer::new(config.debounce_window, runtime),
            subscribers: Vec::new(),
            next_subscription: 0,
        };

        Self {
            config,
            shared: Arc::new(Shared {
                host,
                notifying: ReentrantMutex::new(()),
                state: Mutex::new(state),
                published,
            }),
        }
    }

    pub fn config(&self) -> TrackerConfig {
        self.config
    }

    pub fn phase(&self) -> TrackerPhase {
        self.shared.state.lock().phase()
    }

    /// Start tracking: after the settle delay, observe every registered
    /// region, attach the window listener and publish once.
    ///
    /// Activating twice is a no-op; activating after disposal fails.
    pub fn activate(&self) -> Result<()> {
        let mut state = self.shared.state.lock();
        if state.disposed {
            return Err(GalleryError::Disposed("visibility tracker"));
        }
        if state.listening || state.settle.is_pending() {
            return Ok(());
        }

        let shared = Arc::downgrade(&self.shared);
        state.settle.schedule(move |epoch| {
            Shared::on_settled(&shared, epoch);
        });
        debug!(
            settle_delay_ms = self.config.settle_delay.as_millis() as u64,
            "visibility tracker activating"
        );
        Ok(())
    }

    /// Add an item. Registering a region that is already tracked replaces
    /// its metadata and keeps its position.
    pub fn register(
        &self,
        metadata: ItemMetadata,
        region: RegionHandle,
    ) -> RegionKey {
        let key = RegionKey::of(&region);
        let mut state = self.shared.state.lock();
        if state.disposed {
            debug!("ignoring registration on disposed visibility tracker");
            return key;
        }

        match state.position(key) {
            Some(index) => state.items[index].metadata = metadata,
            None => state.items.push(TrackedItem {
                key,
                metadata,
                region,
            }),
        }

        if state.listening {
            state.observed.insert(key);
            self.shared.schedule_recompute(&mut state);
        }
        key
    }

    /// Remove the item bound to `region`. Unknown regions are ignored.
    pub fn unregister(&self, region: &RegionHandle) {
        let key = RegionKey::of(region);
        let mut state = self.shared.state.lock();
        let Some(index) = state.position(key) else {
            return;
        };
        state.items.remove(index);
        state.observed.remove(&key);

        if state.listening && !state.disposed {
            self.shared.schedule_recompute(&mut state);
        }
    }

    /// Request a recomputation at the trailing edge of the debounce window.
    pub fn compute_stats(&self) {
        let mut state = self.shared.state.lock();
        if state.disposed {
            return;
        }
        self.shared.schedule_recompute(&mut state);
    }

    /// Feed a host signal. Window signals need an attached listener and
    /// intersection signals need an observed region; others are dropped.
    pub fn notify(&self, trigger: VisibilityTrigger) {
        let mut state = self.shared.state.lock();
        if state.disposed {
            return;
        }
        let accepted = match trigger {
            VisibilityTrigger::Scroll | VisibilityTrigger::Resize => {
                state.listening
            }
            VisibilityTrigger::Intersection(key) => {
                state.observed.contains(&key)
            }
        };
        if accepted {
            self.shared.schedule_recompute(&mut state);
        } else {
            trace!(?trigger, "visibility trigger ignored");
        }
    }

    /// Latest published summary.
    pub fn stats(&self) -> AggregateStats {
        self.shared.published.borrow().clone()
    }

    /// Receiver that changes on every publish.
    pub fn watch(&self) -> watch::Receiver<AggregateStats> {
        self.shared.published.subscribe()
    }

    /// Call `callback` synchronously after each publish.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&AggregateStats) + Send + Sync + 'static,
    {
        let mut state = self.shared.state.lock();
        state.next_subscription += 1;
        let id = SubscriptionId(state.next_subscription);
        if !state.disposed {
            state.subscribers.push((id, Arc::new(callback)));
        }
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.shared.state.lock();
        let before = state.subscribers.len();
        state.subscribers.retain(|(existing, _)| *existing != id);
        state.subscribers.len() != before
    }

    pub fn registered_count(&self) -> usize {
        self.shared.state.lock().items.len()
    }

    pub fn is_observing(&self, key: RegionKey) -> bool {
        self.shared.state.lock().observed.contains(&key)
    }

    /// Stop observing, detach the listener and cancel pending timers. No
    /// publish happens afterwards. Safe to call repeatedly.
    ///
    /// Blocks until a publish already running on another thread has
    /// finished calling its subscribers.
    pub fn dispose(&self) {
        let _notifying = self.shared.notifying.lock();
        let mut state = self.shared.state.lock();
        if state.disposed {
            return;
        }
        state.disposed = true;
        state.listening = false;
        state.observed.clear();
        let cancelled = state.recompute.cancel() | state.settle.cancel();
        state.subscribers.clear();
        debug!(
            pending_cancelled = cancelled,
            "visibility tracker disposed"
        );
    }
}

impl Drop for VisibilityTracker {
    fn drop(&mut self) {
        self.dispose();
    }
}
