//! Core data model definitions shared across Solstice crates.
#![allow(missing_docs)]

pub mod geometry;
pub mod item;
pub mod stats;

pub use geometry::{Rect, Viewport};
pub use item::{ItemMetadata, PhotoId, PhotoItem};
pub use stats::{AggregateStats, MonthSpan, YearMonth};
