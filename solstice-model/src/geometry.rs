/// Viewport-relative rectangle of a rendered item, in CSS pixels.
///
/// Edges follow the browser convention: `top`/`left` grow downward and to the
/// right, so a rectangle above the fold has a negative `bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a rectangle from its origin and size.
    pub fn from_origin(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Same rectangle moved by `dy` pixels vertically (scroll simulation).
    pub fn offset_y(self, dy: f32) -> Self {
        Self::new(self.left, self.top + dy, self.right, self.bottom + dy)
    }

    /// Strict overlap test against the viewport rectangle `(0, 0, w, h)`.
    ///
    /// Edge-touching rectangles share no area and are not visible.
    pub fn intersects(&self, viewport: Viewport) -> bool {
        self.top < viewport.height
            && self.bottom > 0.0
            && self.left < viewport.width
            && self.right > 0.0
    }
}

/// Size of the visible window area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
