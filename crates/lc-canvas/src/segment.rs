//! Line segments — the facts the canvas stores.
//!
//! A [`Segment`] is an axis-aligned stroke: a start cell, a signed length,
//! an orientation, and a [`LineStyle`]. It covers the **closed** range of
//! cells from `start` to `start + length` along its axis, so a segment of
//! length 6 covers 7 cells and a segment of length 0 covers exactly one.
//!
//! ```text
//!   start=(2,1) length=+4 Horizontal      start=(6,1) length=-4 Horizontal
//!
//!     col: 2 3 4 5 6                        col: 2 3 4 5 6
//!          ─────────                             ─────────
//!          ^       ^                             ^       ^
//!        LowEnd  HighEnd                       LowEnd  HighEnd
//! ```
//!
//! Both describe the same cells. "Low" and "high" refer to coordinates,
//! not to which end the user started dragging from.

use std::fmt;

use crate::geometry::{Orientation, Point};

// ---------------------------------------------------------------------------
// SegmentId
// ---------------------------------------------------------------------------

/// Stable identity of a committed segment.
///
/// Ids are handed out by the [`Canvas`](crate::store::Canvas) in increasing
/// order and are never reused, even after `remove` or `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(pub(crate) u64);

impl SegmentId {
    /// The raw numeric id.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// LineStyle
// ---------------------------------------------------------------------------

/// How a stroke is drawn.
///
/// `None` is an invisible stroke. It can be stored like any other but never
/// contributes to a rendered cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    #[default]
    Single,
    Double,
    Heavy,
    Dashed,
    None,
}

impl LineStyle {
    /// Every style, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Single,
        Self::Double,
        Self::Heavy,
        Self::Dashed,
        Self::None,
    ];

    /// The four styles that actually draw something.
    pub const VISIBLE: [Self; 4] = [Self::Single, Self::Double, Self::Heavy, Self::Dashed];

    /// Rank used when two strokes claim the same side of a cell.
    ///
    /// Heavy > Double > Single > Dashed > None. The order is fixed so the
    /// outcome never depends on which stroke was committed first.
    #[inline]
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Dashed => 1,
            Self::Single => 2,
            Self::Double => 3,
            Self::Heavy => 4,
        }
    }

    /// The higher-precedence of two styles.
    #[inline]
    #[must_use]
    pub const fn max(self, other: Self) -> Self {
        if other.precedence() > self.precedence() {
            other
        } else {
            self
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Lower-case name, as used in presets and `style=` options.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Heavy => "heavy",
            Self::Dashed => "dashed",
            Self::None => "none",
        }
    }

    /// Parse a style name. Accepts the full names and one-letter forms.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "single" | "s" | "light" => Some(Self::Single),
            "double" | "d" => Some(Self::Double),
            "heavy" | "h" | "bold" => Some(Self::Heavy),
            "dashed" | "-" => Some(Self::Dashed),
            "none" | "n" => Some(Self::None),
            _ => None,
        }
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// CellRole
// ---------------------------------------------------------------------------

/// How a segment covers one particular cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellRole {
    /// The line passes straight through.
    Interior,
    /// Minimum-coordinate end; the line continues toward +axis only.
    LowEnd,
    /// Maximum-coordinate end; the line continues toward -axis only.
    HighEnd,
    /// Zero-length segment: the cell is both ends.
    Point,
}

impl CellRole {
    /// True for every role except [`CellRole::Interior`].
    #[inline]
    #[must_use]
    pub const fn is_endpoint(self) -> bool {
        !matches!(self, Self::Interior)
    }

    /// Does the line leave this cell toward decreasing coordinates?
    #[inline]
    #[must_use]
    pub const fn extends_low(self) -> bool {
        matches!(self, Self::Interior | Self::HighEnd)
    }

    /// Does the line leave this cell toward increasing coordinates?
    #[inline]
    #[must_use]
    pub const fn extends_high(self) -> bool {
        matches!(self, Self::Interior | Self::LowEnd)
    }
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// An axis-aligned stroke.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: Point,
    pub length: i32,
    pub orientation: Orientation,
    pub style: LineStyle,
}

impl Segment {
    #[inline]
    #[must_use]
    pub const fn new(start: Point, length: i32, orientation: Orientation, style: LineStyle) -> Self {
        Self {
            start,
            length,
            orientation,
            style,
        }
    }

    /// A horizontal segment.
    #[inline]
    #[must_use]
    pub const fn horizontal(start: Point, length: i32, style: LineStyle) -> Self {
        Self::new(start, length, Orientation::Horizontal, style)
    }

    /// A vertical segment.
    #[inline]
    #[must_use]
    pub const fn vertical(start: Point, length: i32, style: LineStyle) -> Self {
        Self::new(start, length, Orientation::Vertical, style)
    }

    /// The cell at `start + length`, held to the `i32` plane.
    #[must_use]
    pub const fn end(&self) -> Point {
        match self.orientation {
            Orientation::Horizontal => self.start.offset(self.length, 0),
            Orientation::Vertical => self.start.offset(0, self.length),
        }
    }

    /// True for zero-length (single-cell) segments.
    #[inline]
    #[must_use]
    pub const fn is_point(&self) -> bool {
        self.length == 0
    }

    /// Number of cells covered: `|length| + 1`, fewer if the far end
    /// runs off the `i32` plane.
    #[inline]
    #[must_use]
    pub const fn cell_count(&self) -> u32 {
        let (lo, hi) = self.span();
        hi.abs_diff(lo) + 1
    }

    /// The coordinate that stays constant along the segment.
    #[inline]
    #[must_use]
    pub const fn fixed(&self) -> i32 {
        match self.orientation {
            Orientation::Horizontal => self.start.y,
            Orientation::Vertical => self.start.x,
        }
    }

    /// Inclusive `(low, high)` range of the varying coordinate. The far
    /// end stops at `i32::MIN` / `i32::MAX`.
    #[must_use]
    pub const fn span(&self) -> (i32, i32) {
        let a = match self.orientation {
            Orientation::Horizontal => self.start.x,
            Orientation::Vertical => self.start.y,
        };
        let b = a.saturating_add(self.length);
        if a <= b { (a, b) } else { (b, a) }
    }

    /// How this segment covers `p`, or `None` if it doesn't.
    #[must_use]
    pub const fn role_at(&self, p: Point) -> Option<CellRole> {
        let (along, across) = match self.orientation {
            Orientation::Horizontal => (p.x, p.y),
            Orientation::Vertical => (p.y, p.x),
        };
        if across != self.fixed() {
            return None;
        }
        let (lo, hi) = self.span();
        role_in_span(along, lo, hi)
    }

    /// True if `p` lies on the segment.
    #[inline]
    #[must_use]
    pub const fn contains(&self, p: Point) -> bool {
        self.role_at(p).is_some()
    }

    /// Every covered cell with its role, from low to high coordinate.
    pub fn cells(&self) -> impl Iterator<Item = (Point, CellRole)> {
        let (lo, hi) = self.span();
        let fixed = self.fixed();
        let orientation = self.orientation;
        (lo..=hi).map(move |along| {
            let p = match orientation {
                Orientation::Horizontal => Point::new(along, fixed),
                Orientation::Vertical => Point::new(fixed, along),
            };
            // `along` is inside [lo, hi] by construction.
            let role = role_in_span(along, lo, hi).unwrap_or(CellRole::Interior);
            (p, role)
        })
    }
}

/// Role of coordinate `v` within the inclusive span `[lo, hi]`.
const fn role_in_span(v: i32, lo: i32, hi: i32) -> Option<CellRole> {
    if v < lo || v > hi {
        None
    } else if lo == hi {
        Some(CellRole::Point)
    } else if v == lo {
        Some(CellRole::LowEnd)
    } else if v == hi {
        Some(CellRole::HighEnd)
    } else {
        Some(CellRole::Interior)
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = match self.orientation {
            Orientation::Horizontal => 'H',
            Orientation::Vertical => 'V',
        };
        write!(
            f,
            "Seg({axis} {:?} {:+} {})",
            self.start, self.length, self.style
        )
    }
}

/// Formats in preset syntax: `h 2,2 6 single`.
impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = match self.orientation {
            Orientation::Horizontal => 'h',
            Orientation::Vertical => 'v',
        };
        write!(f, "{axis} {} {} {}", self.start, self.length, self.style)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
