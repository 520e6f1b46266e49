//! Layout geometry: rectangles, root margins, the viewport and
//! visibility fractions.
//!
//! All rectangles are in document coordinates (origin at the top-left of
//! the page, y grows downward). The viewport converts between document and
//! viewport coordinates.

use crate::error::{UiError, UiResult};

/// A rectangle in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (top edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns the area (zero for degenerate rectangles).
    #[must_use]
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Returns true if the point is inside the rectangle.
    ///
    /// Left and top edges are inclusive, right and bottom exclusive, so
    /// adjacent rectangles never both claim a point.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns true if the point is inside the rectangle or on any edge.
    #[must_use]
    pub fn contains_inclusive(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Returns true if two rectangles overlap with a non-zero area.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Returns the intersection of two rectangles, or None if they don't intersect.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Some(Self::new(x, y, right - x, bottom - y))
    }

    /// Returns the rectangle moved by the given offset.
    #[must_use]
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }


    /// Proportion of this rectangle's area that lies within `root`.
    ///
    /// A zero-area rectangle counts as fully visible when it sits inside or
    /// on the edge of `root`, and invisible otherwise.
    #[must_use]
    pub fn visible_fraction(&self, root: &Self) -> f32 {
        let area = self.area();
        if area <= 0.0 {
            return if root.contains_inclusive(self.x, self.y) { 1.0 } else { 0.0 };
        }
        match self.intersection(root) {
            Some(overlap) => (overlap.area() / area).clamp(0.0, 1.0),
            None => 0.0,
        }
    }
}

/// A CSS length that is either absolute or relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthOrPercent {
    /// Pixels.
    Px(f32),
    /// Percentage of the reference dimension (0-100).
    Percent(f32),
}

impl LengthOrPercent {
    /// Resolves against a reference dimension in pixels.
    #[must_use]
    pub fn resolve(self, reference: f32) -> f32 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => reference * pct / 100.0,
        }
    }

    fn parse(token: &str) -> Option<Self> {
        if let Some(px) = token.strip_suffix("px") {
            return px.parse().ok().map(Self::Px);
        }
        if let Some(pct) = token.strip_suffix('%') {
            return pct.parse().ok().map(Self::Percent);
        }
        // Bare zero is the only unitless length CSS accepts.
        token
            .parse::<f32>()
            .ok()
            .filter(|value| *value == 0.0)
            .map(|_| Self::Px(0.0))
    }

    /// Stable bit pattern used to group identical margins.
    #[must_use]
    pub fn key(self) -> (u8, u32) {
        match self {
            Self::Px(v) => (0, v.to_bits()),
            Self::Percent(v) => (1, v.to_bits()),
        }
    }
}

impl Default for LengthOrPercent {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

/// Offsets applied to the viewport box before intersection testing.
///
/// Positive values grow the box, negative values shrink it. Parsed from
/// CSS shorthand (`"0px 0px -50px 0px"`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Margin {
    /// Top offset.
    pub top: LengthOrPercent,
    /// Right offset.
    pub right: LengthOrPercent,
    /// Bottom offset.
    pub bottom: LengthOrPercent,
    /// Left offset.
    pub left: LengthOrPercent,
}

impl Margin {
    /// No offset on any side.
    pub const ZERO: Self = Self {
        top: LengthOrPercent::Px(0.0),
        right: LengthOrPercent::Px(0.0),
        bottom: LengthOrPercent::Px(0.0),
        left: LengthOrPercent::Px(0.0),
    };

    /// Creates a margin from pixel offsets.
    #[must_use]
    pub const fn px(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top: LengthOrPercent::Px(top),
            right: LengthOrPercent::Px(right),
            bottom: LengthOrPercent::Px(bottom),
            left: LengthOrPercent::Px(left),
        }
    }

    /// Parses CSS margin shorthand with one to four components.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidMargin`] for an empty string, more than four
    /// components, or a component that is not `<n>px`, `<n>%` or `0`.
    pub fn parse(text: &str) -> UiResult<Self> {
        let invalid = || UiError::InvalidMargin(text.to_string());
        let values = text
            .split_whitespace()
            .map(|token| LengthOrPercent::parse(token).ok_or_else(invalid))
            .collect::<UiResult<Vec<_>>>()?;

        match values.as_slice() {
            [all] => Ok(Self { top: *all, right: *all, bottom: *all, left: *all }),
            [vertical, horizontal] => Ok(Self {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, horizontal, bottom] => Ok(Self {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => Err(invalid()),
        }
    }

    /// Applies the margin to a root box. Horizontal percentages resolve
    /// against the box width, vertical ones against its height.
    #[must_use]
    pub fn apply(&self, root: Rect) -> Rect {
        let top = self.top.resolve(root.height);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        let right = self.right.resolve(root.width);

        Rect::new(
            root.x - left,
            root.y - top,
            (root.width + left + right).max(0.0),
            (root.height + top + bottom).max(0.0),
        )
    }

    /// Stable key for grouping observers that share a margin.
    #[must_use]
    pub fn key(&self) -> [(u8, u32); 4] {
        [self.top.key(), self.right.key(), self.bottom.key(), self.left.key()]
    }
}

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
    /// Horizontal scroll offset.
    pub scroll_x: f32,
    /// Vertical scroll offset.
    pub scroll_y: f32,
}

impl Viewport {
    /// Creates a viewport scrolled to the top.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    /// Visible region in document coordinates.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.scroll_x, self.scroll_y, self.width, self.height)
    }

    /// Root box for intersection tests after applying a margin.
    #[must_use]
    pub fn root_box(&self, margin: &Margin) -> Rect {
        margin.apply(self.rect())
    }

    /// Converts a document-space rectangle to viewport coordinates.
    #[must_use]
    pub fn to_client(&self, rect: Rect) -> Rect {
        rect.translate(-self.scroll_x, -self.scroll_y)
    }

    /// Converts a viewport point to document coordinates.
    #[must_use]
    pub fn to_document(&self, x: f32, y: f32) -> (f32, f32) {
        (x + self.scroll_x, y + self.scroll_y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Horizontal (left to right).
    Horizontal,
    /// Vertical (top to bottom).
    #[default]
    Vertical,
}

/// Stacks blocks along one axis. Used to lay out report sections.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    /// Current layout direction.
    pub direction: Direction,
    /// Gap between elements.
    pub gap: f32,
    /// Stretch children across the cross axis.
    pub stretch: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            direction: Direction::Vertical,
            gap: 0.0,
            stretch: true,
        }
    }
}

impl Layout {
    /// Creates a horizontal layout.
    #[must_use]
    pub fn horizontal() -> Self {
        Self {
            direction: Direction::Horizontal,
            ..Default::default()
        }
    }

    /// Creates a vertical layout.
    #[must_use]
    pub fn vertical() -> Self {
        Self::default()
    }

    /// Sets the gap between elements.
    #[must_use]
    pub const fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    /// Keeps each child's own cross-axis size instead of stretching.
    #[must_use]
    pub const fn without_stretch(mut self) -> Self {
        self.stretch = false;
        self
    }

    /// Lays out a list of sizes within the given bounds.
    ///
    /// Returns the rectangle for each element. Content that does not fit
    /// overflows past the bounds, as page flow does.
    #[must_use]
    pub fn arrange(&self, bounds: Rect, sizes: &[(f32, f32)]) -> Vec<Rect> {
        let mut results = Vec::with_capacity(sizes.len());

        match self.direction {
            Direction::Horizontal => {
                let mut x = bounds.x;
                for &(w, h) in sizes {
                    let height = if self.stretch { bounds.height } else { h };
                    results.push(Rect::new(x, bounds.y, w, height));
                    x += w + self.gap;
                }
            }
            Direction::Vertical => {
                let mut y = bounds.y;
                for &(w, h) in sizes {
                    let width = if self.stretch { bounds.width } else { w };
                    results.push(Rect::new(bounds.x, y, width, h));
                    y += h + self.gap;
                }
            }
        }

        results
    }
}
