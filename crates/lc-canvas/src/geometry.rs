//! Canvas coordinates and rectangles.
//!
//! All coordinates are **canvas-local** and signed. Column grows to the
//! right, row grows downward, so "North" is the decreasing-row direction.
//! Nothing here is clamped to a screen: a point may sit far outside the
//! region currently shown, and a [`Viewport`] may start at negative
//! coordinates when the user has panned up or left.

use std::fmt;

use crate::error::CanvasError;

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A cell position on the canvas: (column, row).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The canvas origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`, stopping at the edge of the `i32` plane.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pt({},{})", self.x, self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// The axis a segment runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Along the column axis (constant row).
    Horizontal,
    /// Along the row axis (constant column).
    Vertical,
}

impl Orientation {
    /// The perpendicular axis.
    #[inline]
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// A rectangular region of canvas coordinates to rasterize.
///
/// Width and height are signed on purpose: callers compute them from
/// screen geometry and can end up negative (a terminal shrunk below the
/// status line, for instance). Such a viewport is not a crash. It is
/// reported by [`Viewport::checked_size`] as [`CanvasError::InvalidViewport`]
/// and rendered as an empty grid.
///
/// ```
/// use lc_canvas::geometry::{Point, Viewport};
///
/// let vp = Viewport::new(-2, 0, 10, 4);
/// assert!(vp.contains(Point::new(-2, 0)));
/// assert!(vp.contains(Point::new(7, 3)));
/// assert!(!vp.contains(Point::new(8, 3)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A viewport anchored at `origin`.
    #[inline]
    #[must_use]
    pub const fn at(origin: Point, width: i32, height: i32) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    /// Smallest viewport containing both corners (inclusive).
    ///
    /// A span wider than `i32::MAX` cells is cut to `i32::MAX`.
    #[must_use]
    pub fn spanning(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, extent(x, a.x.max(b.x)), extent(y, a.y.max(b.y)))
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Exclusive right edge. Widened to `i64`: a viewport touching
    /// `i32::MAX` ends one past it.
    #[inline]
    #[must_use]
    pub const fn right(self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge, widened like [`Viewport::right`].
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// True when the viewport covers no cells (zero or negative size).
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, p: Point) -> bool {
        p.x >= self.x
            && (p.x as i64) < self.right()
            && p.y >= self.y
            && (p.y as i64) < self.bottom()
    }

    /// The size as unsigned `(width, height)`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidViewport`] if either dimension is
    /// negative. Zero is a valid (empty) size.
    #[allow(clippy::cast_sign_loss)]
    pub fn checked_size(self) -> Result<(u32, u32), CanvasError> {
        if self.width < 0 || self.height < 0 {
            return Err(CanvasError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        // Both non-negative: the casts are lossless.
        Ok((self.width as u32, self.height as u32))
    }
}

/// Cell count of the inclusive range `lo..=hi`, capped at `i32::MAX`.
fn extent(lo: i32, hi: i32) -> i32 {
    i32::try_from(i64::from(hi) - i64::from(lo) + 1).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ── Point ─────────────────────────────────────────────────────────────

    #[test]
    fn point_offset() {
        assert_eq!(Point::new(3, 4).offset(-5, 2), Point::new(-2, 6));
    }

    #[test]
    fn point_offset_saturates() {
        let p = Point::new(i32::MAX - 1, i32::MIN + 1);
        assert_eq!(p.offset(5, -5), Point::new(i32::MAX, i32::MIN));
    }

    #[test]
    fn point_debug_and_display() {
        let p = Point::new(-1, 7);
        assert_eq!(format!("{p:?}"), "Pt(-1,7)");
        assert_eq!(p.to_string(), "-1,7");
    }

    #[test]
    fn orientation_flip() {
        assert_eq!(Orientation::Horizontal.flipped(), Orientation::Vertical);
        assert_eq!(Orientation::Vertical.flipped(), Orientation::Horizontal);
    }

    // ── Viewport ──────────────────────────────────────────────────────────

    #[test]
    fn viewport_edges_are_exclusive() {
        let vp = Viewport::new(0, 0, 10, 5);
        assert_eq!(vp.right(), 10);
        assert_eq!(vp.bottom(), 5);
        assert!(vp.contains(Point::new(9, 4)));
        assert!(!vp.contains(Point::new(10, 4)));
        assert!(!vp.contains(Point::new(9, 5)));
    }

    #[test]
    fn viewport_negative_origin() {
        let vp = Viewport::new(-5, -3, 6, 4);
        assert!(vp.contains(Point::new(-5, -3)));
        assert!(vp.contains(Point::ZERO));
        assert!(!vp.contains(Point::new(1, 0)));
    }

    #[test]
    fn viewport_empty() {
        assert!(Viewport::new(0, 0, 0, 3).is_empty());
        assert!(Viewport::new(0, 0, 3, 0).is_empty());
        assert!(Viewport::new(0, 0, -1, 3).is_empty());
        assert!(!Viewport::new(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn viewport_spanning_is_inclusive() {
        let vp = Viewport::spanning(Point::new(5, -1), Point::new(2, 3));
        assert_eq!(vp, Viewport::new(2, -1, 4, 5));
    }

    #[test]
    fn viewport_edges_past_i32_max() {
        let vp = Viewport::new(i32::MAX - 2, 0, 10, 1);
        assert_eq!(vp.right(), i64::from(i32::MAX) + 8);
        assert!(vp.contains(Point::new(i32::MAX, 0)));
        assert!(!vp.contains(Point::new(i32::MAX - 3, 0)));
    }

    #[test]
    fn viewport_spanning_whole_plane_is_capped() {
        let vp = Viewport::spanning(Point::new(i32::MIN, 0), Point::new(i32::MAX, 0));
        assert_eq!(vp, Viewport::new(i32::MIN, 0, i32::MAX, 1));
    }

    #[test]
    fn checked_size_accepts_zero() {
        assert_eq!(Viewport::new(0, 0, 0, 0).checked_size().unwrap(), (0, 0));
        assert_eq!(Viewport::new(4, 4, 3, 2).checked_size().unwrap(), (3, 2));
    }

    #[test]
    fn checked_size_rejects_negative() {
        let err = Viewport::new(0, 0, 4, -2).checked_size().unwrap_err();
        assert_eq!(
            err,
            CanvasError::InvalidViewport {
                width: 4,
                height: -2
            }
        );
    }
}
