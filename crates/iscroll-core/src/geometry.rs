//! Geometry probe: viewport/content measurement and scroll bounds
//!
//! The engine never touches layout directly. A host answers the queries in
//! [`GeometryProbe`]; [`Bounds::measure`] turns the answers into the
//! scrollable range. Zero-size or nonsensical measurements degrade to an
//! empty range instead of failing.

use std::ops::{Add, Sub};

/// A position or offset in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn round(self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width/height of an element box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Negative, NaN or infinite extents collapse to zero
    pub fn sanitized(self) -> Self {
        fn axis(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                0.0
            }
        }
        Self::new(axis(self.width), axis(self.height))
    }
}

/// Opaque handle for an element owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Page-space box of a descendant element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementBox {
    /// Page offset of the element's top-left corner
    pub offset: Point,
    pub size: Size,
}

/// Layout queries answered by the host environment
pub trait GeometryProbe {
    /// Resolve the scrollable viewport (wrapper) element
    fn resolve_viewport(&self) -> Option<ElementId>;

    /// Resolve the single content child of the viewport
    fn resolve_content(&self) -> Option<ElementId>;

    /// Inner (client) size of the viewport element
    fn viewport_size(&self) -> Size;

    /// Outer size of the content element
    fn content_size(&self) -> Size;

    /// Page offset of the viewport element
    fn viewport_offset(&self) -> Point;

    /// Find a descendant of the content element by selector
    fn query(&self, selector: &str) -> Option<ElementBox>;

    /// Translation the content element is rendered at right now
    ///
    /// Only meaningful while the host interpolates a transition; hosts
    /// without transitions may return `None`.
    fn rendered_position(&self) -> Option<Point>;
}

/// Viewport and content extents captured by the last refresh
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extents {
    pub viewport: Size,
    pub content: Size,
    pub viewport_offset: Point,
}

/// Scrollable range of the content inside the viewport
///
/// `max_scroll_x`/`max_scroll_y` are never positive: the content can be
/// translated anywhere in `[max_scroll, 0]` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub max_scroll_x: f64,
    pub max_scroll_y: f64,
    pub has_horizontal_scroll: bool,
    pub has_vertical_scroll: bool,
}

impl Bounds {
    /// Derive bounds from measured extents
    ///
    /// An axis participates only if it is enabled and the content overflows
    /// the viewport; otherwise it is pinned to 0.
    pub fn measure(extents: &Extents, scroll_x: bool, scroll_y: bool) -> Self {
        let viewport = extents.viewport.sanitized();
        let content = extents.content.sanitized();

        let max_x = viewport.width - content.width;
        let max_y = viewport.height - content.height;

        let has_horizontal_scroll = scroll_x && max_x < 0.0;
        let has_vertical_scroll = scroll_y && max_y < 0.0;

        Self {
            max_scroll_x: if has_horizontal_scroll { max_x } else { 0.0 },
            max_scroll_y: if has_vertical_scroll { max_y } else { 0.0 },
            has_horizontal_scroll,
            has_vertical_scroll,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x <= 0.0 && p.x >= self.max_scroll_x && p.y <= 0.0 && p.y >= self.max_scroll_y
    }

    /// Clamp a point into `[max_scroll, 0]` on both axes
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.max_scroll_x, 0.0),
            p.y.clamp(self.max_scroll_y, 0.0),
        )
    }

    /// Nearest in-bounds position, treating non-scrollable axes as 0
    pub fn settle_target(&self, p: Point) -> Point {
        let x = if !self.has_horizontal_scroll || p.x > 0.0 {
            0.0
        } else if p.x < self.max_scroll_x {
            self.max_scroll_x
        } else {
            p.x
        };
        let y = if !self.has_vertical_scroll || p.y > 0.0 {
            0.0
        } else if p.y < self.max_scroll_y {
            self.max_scroll_y
        } else {
            p.y
        };
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn extents(vw: f64, vh: f64, cw: f64, ch: f64) -> Extents {
        Extents {
            viewport: Size::new(vw, vh),
            content: Size::new(cw, ch),
            viewport_offset: Point::ZERO,
        }
    }

    #[test]
    fn test_vertical_overflow() {
        let bounds = Bounds::measure(&extents(300.0, 500.0, 300.0, 1200.0), false, true);
        assert_eq!(bounds.max_scroll_y, -700.0);
        assert!(bounds.has_vertical_scroll);
        assert_eq!(bounds.max_scroll_x, 0.0);
        assert!(!bounds.has_horizontal_scroll);
    }

    #[test]
    fn test_disabled_axis_is_pinned() {
        let bounds = Bounds::measure(&extents(300.0, 500.0, 900.0, 1200.0), false, true);
        assert_eq!(bounds.max_scroll_x, 0.0);
        assert!(!bounds.has_horizontal_scroll);
    }

    #[test]
    fn test_zero_size_degrades_to_empty_range() {
        let bounds = Bounds::measure(&extents(0.0, 0.0, 0.0, 0.0), true, true);
        assert_eq!(bounds, Bounds::default());

        let bounds = Bounds::measure(&extents(f64::NAN, -5.0, 0.0, 0.0), true, true);
        assert_eq!(bounds, Bounds::default());
    }

    #[test]
    fn test_settle_target() {
        let bounds = Bounds::measure(&extents(500.0, 500.0, 500.0, 1200.0), false, true);
        assert_eq!(bounds.settle_target(Point::new(10.0, 40.0)), Point::new(0.0, 0.0));
        assert_eq!(bounds.settle_target(Point::new(0.0, -900.0)), Point::new(0.0, -700.0));
        assert_eq!(bounds.settle_target(Point::new(0.0, -300.0)), Point::new(0.0, -300.0));
    }

    proptest! {
        #[test]
        fn prop_bounds_never_positive(
            vw in -100.0f64..2000.0,
            vh in -100.0f64..2000.0,
            cw in -100.0f64..4000.0,
            ch in -100.0f64..4000.0,
            sx: bool,
            sy: bool,
        ) {
            let bounds = Bounds::measure(&extents(vw, vh, cw, ch), sx, sy);
            prop_assert!(bounds.max_scroll_x <= 0.0);
            prop_assert!(bounds.max_scroll_y <= 0.0);
            if bounds.max_scroll_x == 0.0 {
                prop_assert!(!bounds.has_horizontal_scroll);
            }
            if bounds.max_scroll_y == 0.0 {
                prop_assert!(!bounds.has_vertical_scroll);
            }
        }
    }
}
