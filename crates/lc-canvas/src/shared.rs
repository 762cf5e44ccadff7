//! A canvas shared between threads.
//!
//! [`SharedCanvas`] is a cloneable handle around one `parking_lot::Mutex`.
//! Every call takes the lock once and releases it before returning.
//! Rendering copies the segment list under the lock and rasterizes after
//! letting go, so a slow render never blocks a writer.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::error::CanvasError;
use crate::geometry::{Point, Viewport};
use crate::raster::{self, GlyphGrid};
use crate::segment::{Segment, SegmentId};
use crate::store::{Canvas, Contribution};

/// Cloneable, thread-safe handle to one [`Canvas`].
#[derive(Debug, Clone, Default)]
pub struct SharedCanvas {
    inner: Arc<Mutex<Canvas>>,
}

impl SharedCanvas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing canvas.
    #[must_use]
    pub fn from_canvas(canvas: Canvas) -> Self {
        Self {
            inner: Arc::new(Mutex::new(canvas)),
        }
    }

    pub fn add(&self, segment: Segment) -> SegmentId {
        self.inner.lock().add(segment)
    }

    /// # Errors
    ///
    /// See [`Canvas::remove`].
    pub fn remove(&self, id: SegmentId) -> Result<Segment, CanvasError> {
        self.inner.lock().remove(id)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    #[must_use]
    pub fn query_cells_at(&self, p: Point) -> Vec<Contribution> {
        self.inner.lock().query_cells_at(p)
    }

    /// Render from a snapshot of the segments taken under the lock.
    #[must_use]
    pub fn render(&self, viewport: Viewport) -> GlyphGrid {
        let snapshot = self.inner.lock().segments();
        raster::render_segments(&snapshot, viewport)
    }

    /// Run several operations under one lock acquisition.
    pub fn with<R>(&self, f: impl FnOnce(&mut Canvas) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Direct access to the locked canvas. Hold the guard briefly.
    pub fn lock(&self) -> MutexGuard<'_, Canvas> {
        self.inner.lock()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::segment::LineStyle;

    #[test]
    fn clones_share_one_canvas() {
        let a = SharedCanvas::new();
        let b = a.clone();
        let id = a.add(Segment::horizontal(Point::ZERO, 2, LineStyle::Single));
        assert_eq!(b.len(), 1);
        b.remove(id).unwrap();
        assert!(a.is_empty());
    }

    #[test]
    fn render_matches_plain_canvas() {
        let mut plain = Canvas::new();
        plain.add(Segment::horizontal(Point::new(0, 1), 4, LineStyle::Double));
        plain.add(Segment::vertical(Point::new(2, 0), 2, LineStyle::Double));
        let shared = SharedCanvas::from_canvas(plain.clone());

        let vp = Viewport::new(0, 0, 5, 3);
        assert_eq!(shared.render(vp), plain.render(vp));
        assert_eq!(shared.render(vp).at(Point::new(2, 1)), Some('╬'));
    }

    #[test]
    fn concurrent_writers() {
        let shared = SharedCanvas::new();
        let handles: Vec<_> = (0..4)
            .map(|row| {
                let canvas = shared.clone();
                thread::spawn(move || {
                    for x in 0..25 {
                        canvas.add(Segment::horizontal(Point::new(x, row), 0, LineStyle::Heavy));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(shared.len(), 100);
        let grid = shared.render(Viewport::new(0, 0, 25, 4));
        assert_eq!(grid.filled(), 100);
    }

    #[test]
    fn with_batches_under_one_lock() {
        let shared = SharedCanvas::new();
        let ids = shared.with(|c| {
            c.extend([
                Segment::vertical(Point::ZERO, 3, LineStyle::Single),
                Segment::vertical(Point::new(1, 0), 3, LineStyle::Single),
            ])
        });
        assert_eq!(ids.len(), 2);
        shared.clear();
        assert!(shared.query_cells_at(Point::ZERO).is_empty());
        assert!(shared.lock().is_empty());
    }
}
