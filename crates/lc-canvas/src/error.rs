//! Typed errors for the line canvas.
//!
//! None of these are fatal to a drawing session. `InvalidViewport` and
//! `UnknownSegmentId` are reported to the caller and then treated as an
//! empty render and a no-op respectively. `AmbiguousJunction` marks a hole
//! in the glyph table and only ever surfaces through the resolver's
//! fail-fast path.

use thiserror::Error;

use crate::junction::Arms;
use crate::segment::SegmentId;

/// Everything that can go wrong inside `lc-canvas`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    /// A viewport with a negative width or height was requested.
    #[error("invalid viewport size {width}x{height}")]
    InvalidViewport {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },

    /// `remove` was called with an id that is not (or no longer) on the canvas.
    #[error("unknown segment id {0}")]
    UnknownSegmentId(SegmentId),

    /// The junction table has no glyph for a resolved arm combination.
    #[error("no junction glyph for {arms:?}")]
    AmbiguousJunction {
        /// The arms that failed to resolve.
        arms: Arms,
    },

    /// A preset description line could not be parsed.
    #[error("preset line {line}: {reason}")]
    Preset {
        /// 1-based line number in the preset text.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::LineStyle;

    #[test]
    fn messages_are_readable() {
        let e = CanvasError::InvalidViewport {
            width: -1,
            height: 3,
        };
        assert_eq!(e.to_string(), "invalid viewport size -1x3");

        let e = CanvasError::Preset {
            line: 4,
            reason: "expected `h` or `v`".into(),
        };
        assert_eq!(e.to_string(), "preset line 4: expected `h` or `v`");
    }

    #[test]
    fn ambiguous_junction_names_the_arms() {
        let arms = Arms {
            north: LineStyle::Heavy,
            ..Arms::EMPTY
        };
        let msg = CanvasError::AmbiguousJunction { arms }.to_string();
        assert!(msg.contains("Heavy"));
    }
}
