//! Pointer interaction — turning press / drag / release into segments.
//!
//! The controller is always in exactly one [`DragState`]:
//!
//! | State    | press(P)          | drag(P)           | release(Q)              |
//! |----------|-------------------|-------------------|-------------------------|
//! | Idle     | → Dragging from P | ignored           | ignored                 |
//! | Dragging | restart from P    | move preview to P | commit, → Idle          |
//!
//! Nothing touches the [`Canvas`] until release. While dragging, the
//! would-be segment is available from [`InteractionController::preview`]
//! for hosts that want to draw it, but the rasterizer never sees it.

use std::fmt;

use crate::geometry::{Orientation, Point};
use crate::segment::{LineStyle, Segment, SegmentId};
use crate::store::Canvas;

// ---------------------------------------------------------------------------
// DragState
// ---------------------------------------------------------------------------

/// Where the controller is in a stroke.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Where the button went down.
        start: Point,
        /// Last reported pointer position.
        current: Point,
    },
}

impl fmt::Display for DragState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("IDLE"),
            Self::Dragging { .. } => f.write_str("DRAW"),
        }
    }
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

/// The segment a drag from `start` to `end` produces.
///
/// The dominant axis of the displacement wins, with ties going to
/// horizontal. The other axis is dropped: the stroke stays on `start`'s
/// row (or column) no matter how far the pointer wandered off it.
///
/// ```
/// use lc_canvas::geometry::{Orientation, Point};
/// use lc_canvas::interaction::infer_segment;
/// use lc_canvas::segment::LineStyle;
///
/// let s = infer_segment(Point::new(0, 0), Point::new(2, 7), LineStyle::Single);
/// assert_eq!(s.orientation, Orientation::Vertical);
/// assert_eq!(s.length, 7);
/// ```
///
/// A displacement longer than `i32` can hold is cut to `i32::MAX` cells
/// in the direction of the drag.
#[must_use]
pub fn infer_segment(start: Point, end: Point, style: LineStyle) -> Segment {
    let dx = i64::from(end.x) - i64::from(start.x);
    let dy = i64::from(end.y) - i64::from(start.y);
    if dx.unsigned_abs() >= dy.unsigned_abs() {
        Segment::new(start, clamp_length(dx), Orientation::Horizontal, style)
    } else {
        Segment::new(start, clamp_length(dy), Orientation::Vertical, style)
    }
}

fn clamp_length(delta: i64) -> i32 {
    i32::try_from(delta).unwrap_or(if delta < 0 { i32::MIN } else { i32::MAX })
}

// ---------------------------------------------------------------------------
// InteractionController
// ---------------------------------------------------------------------------

/// Press / drag / release state machine plus the pen style.
#[derive(Debug, Default, Clone)]
pub struct InteractionController {
    state: DragState,
    style: LineStyle,
}

impl InteractionController {
    /// Idle, drawing in [`LineStyle::Single`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DragState::Idle,
            style: LineStyle::Single,
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The style the next committed segment will get.
    #[inline]
    #[must_use]
    pub const fn style(&self) -> LineStyle {
        self.style
    }

    /// Change the pen. Applies to the drag in progress too.
    pub fn set_style(&mut self, style: LineStyle) {
        tracing::debug!(%style, "pen style");
        self.style = style;
    }

    /// Button down at `p`. A press during a drag abandons the old drag.
    pub fn press(&mut self, p: Point) {
        if let DragState::Dragging { start, .. } = self.state {
            tracing::debug!(%start, restart = %p, "press while dragging");
        }
        self.state = DragState::Dragging {
            start: p,
            current: p,
        };
    }

    /// Pointer moved to `p` with the button held. Ignored when idle.
    pub const fn drag(&mut self, p: Point) {
        if let DragState::Dragging { ref mut current, .. } = self.state {
            *current = p;
        }
    }

    /// Button up at `q`: commit the inferred segment.
    ///
    /// Returns the new id, or `None` if no drag was in progress.
    pub fn release(&mut self, q: Point, canvas: &mut Canvas) -> Option<SegmentId> {
        let DragState::Dragging { start, .. } = self.state else {
            return None;
        };
        self.state = DragState::Idle;
        Some(canvas.add(infer_segment(start, q, self.style)))
    }

    /// Drop the drag in progress without committing anything.
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            tracing::debug!("drag cancelled");
        }
        self.state = DragState::Idle;
    }

    /// The segment a release at the current pointer position would commit.
    #[must_use]
    pub fn preview(&self) -> Option<Segment> {
        match self.state {
            DragState::Dragging { start, current } => {
                Some(infer_segment(start, current, self.style))
            }
            DragState::Idle => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
