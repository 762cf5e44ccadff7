//! Rasterizer — projects the canvas into a grid of glyphs for a viewport.
//!
//! Rendering is a pure function of the committed segments and the
//! viewport. Each segment is clipped to the viewport once and its cells
//! are merged into a per-cell [`Junction`]; every junction is then resolved
//! to a glyph. The result is the same as resolving
//! [`Canvas::query_cells_at`] for every cell, without the per-cell scan.

use std::fmt;

use crate::geometry::{Orientation, Point, Viewport};
use crate::junction::Junction;
use crate::segment::Segment;
use crate::store::Canvas;

// ---------------------------------------------------------------------------
// GlyphGrid
// ---------------------------------------------------------------------------

/// A rendered viewport: row-major glyphs, `None` for empty cells.
#[derive(Clone, PartialEq, Eq)]
pub struct GlyphGrid {
    origin: Point,
    width: usize,
    height: usize,
    cells: Vec<Option<char>>,
}

impl GlyphGrid {
    /// An all-empty grid.
    #[must_use]
    pub fn blank(origin: Point, width: usize, height: usize) -> Self {
        Self {
            origin,
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Canvas coordinate of the top-left cell.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Glyph at grid-local `(col, row)`. Out of range reads as empty.
    #[must_use]
    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells[row * self.width + col]
    }

    /// Glyph at a canvas coordinate. Outside the grid reads as empty.
    #[must_use]
    pub fn at(&self, p: Point) -> Option<char> {
        let col = usize::try_from(i64::from(p.x) - i64::from(self.origin.x)).ok()?;
        let row = usize::try_from(i64::from(p.y) - i64::from(self.origin.y)).ok()?;
        self.get(col, row)
    }

    /// One row of the grid.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[Option<char>] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<char>]> {
        // chunks() rejects a zero chunk size.
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Plain-text rendering with spaces for empty cells and trailing
    /// spaces trimmed, one line per row.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height);
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let line: String = row.iter().map(|c| c.unwrap_or(' ')).collect();
            out.push_str(line.trim_end());
        }
        out
    }
}

impl fmt::Debug for GlyphGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "GlyphGrid {}x{} @ {:?}",
            self.width, self.height, self.origin
        )?;
        for row in self.rows() {
            let line: String = row.iter().map(|c| c.unwrap_or('.')).collect();
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

impl fmt::Display for GlyphGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render a list of segments into `viewport`.
///
/// A negative viewport size is logged and rendered as an empty grid.
#[must_use]
pub fn render_segments<'a>(
    segments: impl IntoIterator<Item = &'a Segment>,
    viewport: Viewport,
) -> GlyphGrid {
    let (width, height) = match viewport.checked_size() {
        Ok((w, h)) => (w as usize, h as usize),
        Err(err) => {
            tracing::warn!(%err, "render: empty grid");
            return GlyphGrid::blank(viewport.origin(), 0, 0);
        }
    };

    let mut grid = GlyphGrid::blank(viewport.origin(), width, height);
    if grid.is_empty() {
        return grid;
    }

    let mut junctions = vec![Junction::EMPTY; width * height];
    for seg in segments {
        accumulate(&mut junctions, seg, viewport, width);
    }

    for (cell, junction) in grid.cells.iter_mut().zip(&junctions) {
        *cell = junction.glyph();
    }
    grid
}

/// Merge the visible part of one segment into the per-cell junctions.
#[allow(clippy::cast_sign_loss)]
fn accumulate(junctions: &mut [Junction], seg: &Segment, vp: Viewport, width: usize) {
    if !seg.style.is_visible() {
        return;
    }
    let (fixed_lo, fixed_hi, along_lo, along_hi) = match seg.orientation {
        Orientation::Horizontal => (vp.y, vp.bottom(), vp.x, vp.right()),
        Orientation::Vertical => (vp.x, vp.right(), vp.y, vp.bottom()),
    };
    let fixed = seg.fixed();
    if fixed < fixed_lo || i64::from(fixed) >= fixed_hi {
        return;
    }
    let (lo, hi) = seg.span();
    let from = lo.max(along_lo);
    // The viewport is non-empty, so its last column/row lies in `i32`.
    let last = i32::try_from(along_hi.saturating_sub(1)).unwrap_or(i32::MAX);
    let to = hi.min(last);

    for along in from..=to {
        let p = match seg.orientation {
            Orientation::Horizontal => Point::new(along, fixed),
            Orientation::Vertical => Point::new(fixed, along),
        };
        let Some(role) = seg.role_at(p) else {
            continue;
        };
        // `p` is inside the viewport, so both offsets are non-negative.
        let col = (p.x - vp.x) as usize;
        let row = (p.y - vp.y) as usize;
        junctions[row * width + col].add(seg.orientation, seg.style, role);
    }
}

impl Canvas {
    /// Render the canvas into `viewport`.
    ///
    /// ```
    /// use lc_canvas::geometry::{Point, Viewport};
    /// use lc_canvas::segment::{LineStyle, Segment};
    /// use lc_canvas::store::Canvas;
    ///
    /// let mut canvas = Canvas::new();
    /// canvas.add(Segment::horizontal(Point::new(0, 0), 2, LineStyle::Heavy));
    /// canvas.add(Segment::vertical(Point::new(2, 0), 1, LineStyle::Heavy));
    ///
    /// let grid = canvas.render(Viewport::new(0, 0, 3, 2));
    /// assert_eq!(grid.to_text(), "━━┓\n  ┃");
    /// ```
    #[must_use]
    pub fn render(&self, viewport: Viewport) -> GlyphGrid {
        render_segments(self.iter().map(|(_, s)| s), viewport)
    }

    /// Smallest viewport showing every visible segment, or `None` if
    /// there is nothing to draw.
    #[must_use]
    pub fn bounds(&self) -> Option<Viewport> {
        let mut visible = self.iter().map(|(_, s)| s).filter(|s| s.style.is_visible());
        let first = visible.next()?;
        let (mut min, mut max) = corners(first);
        for seg in visible {
            let (a, b) = corners(seg);
            min = Point::new(min.x.min(a.x), min.y.min(a.y));
            max = Point::new(max.x.max(b.x), max.y.max(b.y));
        }
        Some(Viewport::spanning(min, max))
    }
}

fn corners(seg: &Segment) -> (Point, Point) {
    let (a, b) = (seg.start, seg.end());
    (
        Point::new(a.x.min(b.x), a.y.min(b.y)),
        Point::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
