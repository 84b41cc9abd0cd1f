//! Transient user feedback messages (toasts).
//!
//! A [`MessageCenter`] is created once by the application and handed to the
//! code that needs to report something. Messages stack from the top of the
//! window, expire on their own timer and re-flow when one disappears.
//! Mounting and animating them is the renderer's job; this module owns the
//! list, the ids, the positions and the timers.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::debug;

use crate::error::{GalleryError, Result};
use crate::settings::MessageSettings;
use crate::timer::{DebounceTimer, TimerEpoch};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    #[default]
    Info,
    Warning,
    Error,
    /// Frosted-glass style used over photo content.
    Glass,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Glass => "glass",
        };
        f.write_str(label)
    }
}

/// What to show. A missing or zero duration uses the configured default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOptions {
    pub text: String,
    pub kind: MessageKind,
    pub duration: Option<Duration>,
}

impl MessageOptions {
    pub fn new(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            text: text.into(),
            kind,
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

impl From<&str> for MessageOptions {
    fn from(text: &str) -> Self {
        Self::new(text, MessageKind::Info)
    }
}

impl From<String> for MessageOptions {
    fn from(text: String) -> Self {
        Self::new(text, MessageKind::Info)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
pub struct MessageId(u64);

impl MessageId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Renderer-facing snapshot of one active message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub id: MessageId,
    pub text: String,
    pub kind: MessageKind,
    pub duration: Duration,
    /// Distance from the top of the window in pixels.
    pub top: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageConfig {
    pub default_duration: Duration,
    pub stack_offset: u32,
    pub stack_spacing: u32,
}

impl Default for MessageConfig {
    fn default() -> Self {
        MessageSettings::default().into()
    }
}

impl From<MessageSettings> for MessageConfig {
    fn from(settings: MessageSettings) -> Self {
        Self {
            default_duration: Duration::from_millis(
                settings.default_duration_ms.max(1),
            ),
            stack_offset: settings.stack_offset_px,
            stack_spacing: settings.stack_spacing_px,
        }
    }
}

struct ActiveMessage {
    view: MessageView,
    expiry: DebounceTimer,
}

struct CenterState {
    messages: Vec<ActiveMessage>,
    next_id: u64,
    disposed: bool,
}

struct Shared {
    config: MessageConfig,
    runtime: Handle,
    state: Mutex<CenterState>,
    published: watch::Sender<Vec<MessageView>>,
}

impl Shared {
    fn on_expired(shared: &Weak<Self>, id: MessageId, epoch: TimerEpoch) {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let mut state = shared.state.lock();
        let Some(index) = state.messages.iter().position(|m| m.view.id == id)
        else {
            return;
        };
        if !state.messages[index].expiry.settle(epoch) {
            return;
        }
        state.messages.remove(index);
        debug!(id = id.get(), "message expired");
        shared.reflow_and_publish(&mut state);
    }

    fn close(&self, id: MessageId) -> bool {
        let mut state = self.state.lock();
        let Some(index) = state.messages.iter().position(|m| m.view.id == id)
        else {
            return false;
        };
        // Dropping the entry cancels its expiry timer.
        state.messages.remove(index);
        debug!(id = id.get(), "message closed");
        self.reflow_and_publish(&mut state);
        true
    }

    fn reflow_and_publish(&self, state: &mut CenterState) {
        let MessageConfig {
            stack_offset,
            stack_spacing,
            ..
        } = self.config;
        for (index, message) in state.messages.iter_mut().enumerate() {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            message.view.top =
                stack_offset.saturating_add(index.saturating_mul(stack_spacing));
        }
        let views = state.messages.iter().map(|m| m.view.clone()).collect();
        self.published.send_replace(views);
    }
}

/// Owner of the active message stack.
pub struct MessageCenter {
    shared: Arc<Shared>,
}

impl fmt::Debug for MessageCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self.shared.published.borrow().len();
        f.debug_struct("MessageCenter")
            .field("config", &self.shared.config)
            .field("active", &active)
            .finish()
    }
}

impl MessageCenter {
    pub fn new(config: MessageConfig) -> Result<Self> {
        Ok(Self::with_runtime(config, Handle::try_current()?))
    }

    pub fn with_runtime(config: MessageConfig, runtime: Handle) -> Self {
        let (published, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Shared {
                config,
                runtime,
                state: Mutex::new(CenterState {
                    messages: Vec::new(),
                    next_id: 0,
                    disposed: false,
                }),
                published,
            }),
        }
    }

    /// Push a message onto the bottom of the stack and start its timer.
    pub fn show(
        &self,
        options: impl Into<MessageOptions>,
    ) -> Result<MessageHandle> {
        let options = options.into();
        let mut state = self.shared.state.lock();
        if state.disposed {
            return Err(GalleryError::Disposed("message center"));
        }

        state.next_id += 1;
        let id = MessageId(state.next_id);
        let duration = options
            .duration
            .filter(|d| !d.is_zero())
            .unwrap_or(self.shared.config.default_duration);

        let mut expiry = DebounceTimer::new(duration, self.shared.runtime.clone());
        let weak = Arc::downgrade(&self.shared);
        expiry.schedule(move |epoch| Shared::on_expired(&weak, id, epoch));

        debug!(
            id = id.get(),
            kind = %options.kind,
            duration_ms = duration.as_millis() as u64,
            "message shown"
        );
        state.messages.push(ActiveMessage {
            view: MessageView {
                id,
                text: options.text,
                kind: options.kind,
                duration,
                top: 0,
            },
            expiry,
        });
        self.shared.reflow_and_publish(&mut state);

        Ok(MessageHandle {
            id,
            center: Arc::downgrade(&self.shared),
        })
    }

    pub fn success(
        &self,
        text: impl Into<String>,
        duration: Option<Duration>,
    ) -> Result<MessageHandle> {
        self.show_kind(text, MessageKind::Success, duration)
    }

    pub fn info(
        &self,
        text: impl Into<String>,
        duration: Option<Duration>,
    ) -> Result<MessageHandle> {
        self.show_kind(text, MessageKind::Info, duration)
    }

    pub fn warning(
        &self,
        text: impl Into<String>,
        duration: Option<Duration>,
    ) -> Result<MessageHandle> {
        self.show_kind(text, MessageKind::Warning, duration)
    }

    pub fn error(
        &self,
        text: impl Into<String>,
        duration: Option<Duration>,
    ) -> Result<MessageHandle> {
        self.show_kind(text, MessageKind::Error, duration)
    }

    pub fn glass(
        &self,
        text: impl Into<String>,
        duration: Option<Duration>,
    ) -> Result<MessageHandle> {
        self.show_kind(text, MessageKind::Glass, duration)
    }

    fn show_kind(
        &self,
        text: impl Into<String>,
        kind: MessageKind,
        duration: Option<Duration>,
    ) -> Result<MessageHandle> {
        self.show(MessageOptions {
            text: text.into(),
            kind,
            duration,
        })
    }

    /// Remove one message. Returns `false` if it was already gone.
    pub fn close(&self, id: MessageId) -> bool {
        self.shared.close(id)
    }

    pub fn close_all(&self) {
        let mut state = self.shared.state.lock();
        if state.messages.is_empty() {
            return;
        }
        let closed = state.messages.len();
        state.messages.clear();
        debug!(closed, "all messages closed");
        self.shared.reflow_and_publish(&mut state);
    }

    /// Active messages, top to bottom.
    pub fn messages(&self) -> Vec<MessageView> {
        self.shared.published.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<Vec<MessageView>> {
        self.shared.published.subscribe()
    }

    /// Clear the stack and refuse further messages.
    pub fn dispose(&self) {
        let mut state = self.shared.state.lock();
        if state.disposed {
            return;
        }
        state.disposed = true;
        state.messages.clear();
        self.shared.reflow_and_publish(&mut state);
    }
}

impl Drop for MessageCenter {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Returned by [`MessageCenter::show`] to close the message early.
#[derive(Clone)]
pub struct MessageHandle {
    id: MessageId,
    center: Weak<Shared>,
}

impl fmt::Debug for MessageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageHandle").field("id", &self.id).finish()
    }
}

impl MessageHandle {
    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn close(&self) -> bool {
        self.center
            .upgrade()
            .is_some_and(|center| center.close(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_from_text_are_info() {
        let options = MessageOptions::from("saved");
        assert_eq!(options.kind, MessageKind::Info);
        assert_eq!(options.duration, None);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&MessageKind::Glass).expect("serialize");
        assert_eq!(json, "\"glass\"");
    }

    #[tokio::test]
    async fn huge_spacing_saturates_instead_of_overflowing() {
        let center = MessageCenter::new(MessageConfig {
            default_duration: Duration::from_secs(1),
            stack_offset: 32,
            stack_spacing: u32::MAX / 2,
        })
        .expect("runtime");
        for text in ["a", "b", "c", "d"] {
            center.info(text, None).expect("shown");
        }
        let tops: Vec<u32> = center.messages().iter().map(|m| m.top).collect();
        assert_eq!(tops, vec![32, 32 + u32::MAX / 2, u32::MAX, u32::MAX]);
    }

    #[tokio::test]
    async fn zero_duration_falls_back_to_default() {
        let center = MessageCenter::new(MessageConfig::default()).expect("runtime");
        center
            .show(MessageOptions::from("hi").with_duration(Duration::ZERO))
            .expect("shown");
        assert_eq!(center.messages()[0].duration, Duration::from_millis(3_000));
    }
}
