//! The segment store — an insertion-ordered fact base of committed strokes.
//!
//! The canvas holds no rendering state at all. Every render asks it fresh
//! which strokes touch which cells; nothing is cached between frames, so a
//! mutation is visible on the very next render with no invalidation step.
//!
//! Insertion order only matters for iteration (presets load back in the
//! order they were written). Rendering priority comes from style precedence
//! in [`junction`](crate::junction), never from order.

use crate::error::CanvasError;
use crate::geometry::{Orientation, Point};
use crate::segment::{CellRole, LineStyle, Segment, SegmentId};

// ---------------------------------------------------------------------------
// Contribution
// ---------------------------------------------------------------------------

/// One stroke's presence in one cell, as reported by
/// [`Canvas::query_cells_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Contribution {
    pub id: SegmentId,
    pub orientation: Orientation,
    pub style: LineStyle,
    pub role: CellRole,
}

impl Contribution {
    /// True if the cell is an end of the stroke rather than a pass-through.
    #[inline]
    #[must_use]
    pub const fn is_endpoint(&self) -> bool {
        self.role.is_endpoint()
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// The committed strokes of one drawing session.
///
/// # Examples
///
/// ```
/// use lc_canvas::geometry::Point;
/// use lc_canvas::segment::{LineStyle, Segment};
/// use lc_canvas::store::Canvas;
///
/// let mut canvas = Canvas::new();
/// let id = canvas.add(Segment::horizontal(Point::new(0, 0), 3, LineStyle::Single));
/// assert_eq!(canvas.len(), 1);
/// assert_eq!(canvas.query_cells_at(Point::new(2, 0)).len(), 1);
///
/// canvas.remove(id).unwrap();
/// assert!(canvas.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    segments: Vec<(SegmentId, Segment)>,
    next_id: u64,
}

impl Canvas {
    /// An empty canvas.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
            next_id: 0,
        }
    }

    // ── Mutation ─────────────────────────────────────────────────────────

    /// Commit a segment. Any geometry is accepted, including zero-length
    /// and exact duplicates.
    pub fn add(&mut self, segment: Segment) -> SegmentId {
        let id = SegmentId(self.next_id);
        self.next_id += 1;
        self.segments.push((id, segment));
        tracing::debug!(%id, %segment, "segment added");
        id
    }

    /// Commit several segments in order.
    pub fn extend(&mut self, segments: impl IntoIterator<Item = Segment>) -> Vec<SegmentId> {
        segments.into_iter().map(|s| self.add(s)).collect()
    }

    /// Remove a segment by identity, returning it.
    ///
    /// # Errors
    ///
    /// [`CanvasError::UnknownSegmentId`] if `id` was never added or is
    /// already gone. The canvas is unchanged in that case.
    pub fn remove(&mut self, id: SegmentId) -> Result<Segment, CanvasError> {
        let Some(idx) = self.segments.iter().position(|&(sid, _)| sid == id) else {
            tracing::warn!(%id, "remove: unknown segment");
            return Err(CanvasError::UnknownSegmentId(id));
        };
        let (_, segment) = self.segments.remove(idx);
        tracing::debug!(%id, %segment, "segment removed");
        Ok(segment)
    }

    /// Remove every segment. Ids keep counting up afterwards.
    pub fn clear(&mut self) {
        tracing::debug!(count = self.segments.len(), "canvas cleared");
        self.segments.clear();
    }

    // ── Queries ──────────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Look up a segment by id.
    #[must_use]
    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, s)| s)
    }

    /// All segments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &Segment)> {
        self.segments.iter().map(|(id, s)| (*id, s))
    }

    /// All segments in insertion order, without ids.
    #[must_use]
    pub fn segments(&self) -> Vec<Segment> {
        self.segments.iter().map(|&(_, s)| s).collect()
    }

    /// Every stroke covering `p`, with its role there.
    ///
    /// Overlapping strokes each report their own entry, in insertion order.
    /// Strokes with [`LineStyle::None`] are reported too; it is up to the
    /// resolver to skip them.
    #[must_use]
    pub fn query_cells_at(&self, p: Point) -> Vec<Contribution> {
        self.segments
            .iter()
            .filter_map(|&(id, s)| {
                s.role_at(p).map(|role| Contribution {
                    id,
                    orientation: s.orientation,
                    style: s.style,
                    role,
                })
            })
            .collect()
    }

    /// Ids of every segment covering `p`.
    #[must_use]
    pub fn segments_at(&self, p: Point) -> Vec<SegmentId> {
        self.segments
            .iter()
            .filter(|(_, s)| s.contains(p))
            .map(|&(id, _)| id)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn h(x: i32, y: i32, len: i32, style: LineStyle) -> Segment {
        Segment::horizontal(Point::new(x, y), len, style)
    }

    fn v(x: i32, y: i32, len: i32, style: LineStyle) -> Segment {
        Segment::vertical(Point::new(x, y), len, style)
    }

    // ── Ids ───────────────────────────────────────────────────────────────

    #[test]
    fn ids_increase_and_are_never_reused() {
        let mut c = Canvas::new();
        let a = c.add(h(0, 0, 1, LineStyle::Single));
        let b = c.add(h(0, 1, 1, LineStyle::Single));
        assert!(b > a);
        c.remove(b).unwrap();
        c.clear();
        let d = c.add(h(0, 2, 1, LineStyle::Single));
        assert!(d > b);
    }

    #[test]
    fn remove_unknown_is_reported() {
        let mut c = Canvas::new();
        let id = c.add(h(0, 0, 1, LineStyle::Single));
        c.remove(id).unwrap();
        assert_eq!(c.remove(id), Err(CanvasError::UnknownSegmentId(id)));
        assert!(c.is_empty());
    }

    #[test]
    fn remove_returns_the_segment() {
        let mut c = Canvas::new();
        let s = v(3, 3, -2, LineStyle::Double);
        let id = c.add(s);
        assert_eq!(c.remove(id), Ok(s));
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut c = Canvas::new();
        let ids = c.extend([
            h(0, 0, 1, LineStyle::Single),
            h(0, 1, 1, LineStyle::Double),
            h(0, 2, 1, LineStyle::Heavy),
        ]);
        c.remove(ids[1]).unwrap();
        let order: Vec<_> = c.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![ids[0], ids[2]]);
    }

    #[test]
    fn get_by_id() {
        let mut c = Canvas::new();
        let s = h(1, 1, 4, LineStyle::Heavy);
        let id = c.add(s);
        assert_eq!(c.get(id), Some(&s));
        c.clear();
        assert_eq!(c.get(id), None);
    }

    // ── query_cells_at ────────────────────────────────────────────────────

    #[test]
    fn query_is_boundary_exact() {
        let mut c = Canvas::new();
        let s = h(2, 2, 6, LineStyle::Single);
        let id = c.add(s);

        for y in 0..5 {
            for x in -1..12 {
                let p = Point::new(x, y);
                let hits = c.query_cells_at(p);
                let inside = y == 2 && (2..=8).contains(&x);
                assert_eq!(hits.len(), usize::from(inside), "at {p:?}");
                if inside {
                    assert_eq!(hits[0].id, id);
                    assert_eq!(hits[0].orientation, Orientation::Horizontal);
                    assert_eq!(hits[0].style, LineStyle::Single);
                    assert_eq!(hits[0].is_endpoint(), x == 2 || x == 8);
                }
            }
        }
    }

    #[test]
    fn query_reports_which_end() {
        let mut c = Canvas::new();
        c.add(v(0, 5, -3, LineStyle::Single));
        assert_eq!(c.query_cells_at(Point::new(0, 2))[0].role, CellRole::LowEnd);
        assert_eq!(c.query_cells_at(Point::new(0, 3))[0].role, CellRole::Interior);
        assert_eq!(c.query_cells_at(Point::new(0, 5))[0].role, CellRole::HighEnd);
    }

    #[test]
    fn query_reports_every_overlap() {
        let mut c = Canvas::new();
        let a = c.add(h(0, 0, 4, LineStyle::Single));
        let b = c.add(h(2, 0, 4, LineStyle::Heavy));
        let d = c.add(v(3, -1, 2, LineStyle::Double));

        let hits = c.query_cells_at(Point::new(3, 0));
        let ids: Vec<_> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![a, b, d]);
        assert_eq!(c.segments_at(Point::new(3, 0)), vec![a, b, d]);
        assert_eq!(c.segments_at(Point::new(6, 0)), vec![b]);
    }

    #[test]
    fn query_includes_invisible_strokes() {
        let mut c = Canvas::new();
        c.add(h(0, 0, 2, LineStyle::None));
        let hits = c.query_cells_at(Point::new(1, 0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].style, LineStyle::None);
    }

    #[test]
    fn zero_length_segment_is_queryable() {
        let mut c = Canvas::new();
        c.add(v(-4, 9, 0, LineStyle::Heavy));
        let hits = c.query_cells_at(Point::new(-4, 9));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].role, CellRole::Point);
        assert!(c.query_cells_at(Point::new(-4, 10)).is_empty());
    }

    #[test]
    fn segments_snapshot_in_order() {
        let mut c = Canvas::new();
        let s1 = h(0, 0, 1, LineStyle::Single);
        let s2 = v(0, 0, 1, LineStyle::Dashed);
        c.add(s1);
        c.add(s2);
        assert_eq!(c.segments(), vec![s1, s2]);
    }
}
