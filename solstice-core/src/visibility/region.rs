//! Host-side handles the tracker queries for geometry.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use solstice_model::{Rect, Viewport};

/// Anything that can report where it currently sits on screen.
pub trait Boundable: Send + Sync {
    /// Viewport-relative bounds, read at recompute time.
    fn bounds(&self) -> Rect;
}

/// Shared handle for a rendered item. Identity is the allocation, so clones
/// of the same `Arc` refer to the same region.
pub type RegionHandle = Arc<dyn Boundable>;

/// Stable identity of a [`RegionHandle`] while it is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionKey(usize);

impl RegionKey {
    pub fn of(region: &RegionHandle) -> Self {
        RegionKey(Arc::as_ptr(region) as *const () as usize)
    }
}

/// Supplies the current window size.
pub trait ViewportHost: Send + Sync {
    fn viewport(&self) -> Viewport;
}

/// Region whose rectangle the host pushes in on layout or scroll.
#[derive(Default)]
pub struct SharedRegion {
    bounds: RwLock<Rect>,
}

impl SharedRegion {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds: RwLock::new(bounds),
        }
    }

    /// Convenience constructor returning a ready-to-register handle.
    pub fn handle(bounds: Rect) -> Arc<Self> {
        Arc::new(Self::new(bounds))
    }

    pub fn set_bounds(&self, bounds: Rect) {
        *self.bounds.write() = bounds;
    }

    /// Shift vertically, as a page scroll does to every item.
    pub fn scroll_by(&self, dy: f32) {
        let mut bounds = self.bounds.write();
        *bounds = bounds.offset_y(dy);
    }
}

impl Boundable for SharedRegion {
    fn bounds(&self) -> Rect {
        *self.bounds.read()
    }
}

impl fmt::Debug for SharedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRegion")
            .field("bounds", &*self.bounds.read())
            .finish()
    }
}

/// Window of a fixed (but resizable) size.
#[derive(Default)]
pub struct FixedViewport {
    size: RwLock<Viewport>,
}

impl FixedViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: RwLock::new(Viewport::new(width, height)),
        }
    }

    pub fn resize(&self, width: f32, height: f32) {
        *self.size.write() = Viewport::new(width, height);
    }
}

impl ViewportHost for FixedViewport {
    fn viewport(&self) -> Viewport {
        *self.size.read()
    }
}

impl fmt::Debug for FixedViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FixedViewport")
            .field(&*self.size.read())
            .finish()
    }
}
