//! Visible-range statistics for the gallery grid.
//!
//! The header above the photo grid shows the month range, the places and the
//! number of photos currently on screen. [`VisibilityTracker`] keeps the
//! registry of rendered items and republishes that summary a short, fixed
//! time after scrolling stops.

pub mod aggregate;
pub mod region;
pub mod tracker;

pub use aggregate::aggregate;
pub use region::{
    Boundable, FixedViewport, RegionHandle, RegionKey, SharedRegion,
    ViewportHost,
};
pub use tracker::{
    SubscriptionId, TrackerConfig, TrackerPhase, VisibilityTracker,
    VisibilityTrigger,
};
