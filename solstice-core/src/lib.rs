//! # Solstice Core
//!
//! Runtime pieces behind the Solstice photo gallery front end that are not
//! rendering: the statistics header above the photo grid, transient feedback
//! messages and the global route loading flag.
//!
//! ## Overview
//!
//! - **Visibility statistics**: [`visibility::VisibilityTracker`] keeps a
//!   registry of rendered photo items and publishes a debounced summary
//!   (month range, places, count) of the ones on screen
//! - **Feedback**: [`feedback::MessageCenter`] owns the toast stack, ids,
//!   positions and expiry timers
//! - **Route loading**: [`loading::RouteLoadingIndicator`] implements the
//!   delayed-show / fade-out / watchdog loading flag
//! - **Timers**: [`timer::DebounceTimer`] is the single-slot cancellable timer
//!   all of the above are built on
//!
//! Every component is an explicitly constructed object; nothing here is a
//! process-wide singleton. Components capture the tokio runtime they are
//! created in and spawn their timers onto it.
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use solstice_core::visibility::{
//!     FixedViewport, RegionHandle, SharedRegion, TrackerConfig,
//!     VisibilityTracker, VisibilityTrigger,
//! };
//! use solstice_model::{ItemMetadata, Rect};
//!
//! async fn header() -> solstice_core::Result<()> {
//!     let viewport = Arc::new(FixedViewport::new(390.0, 844.0));
//!     let tracker = VisibilityTracker::new(TrackerConfig::default(), viewport)?;
//!
//!     let photo: RegionHandle =
//!         SharedRegion::handle(Rect::from_origin(0.0, 120.0, 195.0, 195.0));
//!     tracker.register(
//!         ItemMetadata::new().with_date("2024-03-01").with_address("Kyoto"),
//!         photo,
//!     );
//!     tracker.subscribe(|stats| println!("{} · {}", stats.date_range, stats.addresses));
//!     tracker.activate()?;
//!     tracker.notify(VisibilityTrigger::Scroll);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Error type shared by the runtime components
pub mod error;
/// Transient feedback messages
pub mod feedback;
/// Route loading indicator
pub mod loading;
/// Deserializable tuning knobs
pub mod settings;
/// Single-slot cancellable timer
pub mod timer;
/// Visible-range statistics
pub mod visibility;

pub use error::{GalleryError, Result};
pub use feedback::{
    MessageCenter, MessageConfig, MessageHandle, MessageId, MessageKind,
    MessageOptions, MessageView,
};
pub use loading::{LoadingConfig, LoadingState, RouteLoadingIndicator};
pub use settings::{LoadingSettings, MessageSettings, VisibilitySettings};
pub use timer::{DebounceTimer, TimerEpoch};
pub use visibility::{TrackerConfig, TrackerPhase, VisibilityTracker};
