//! # lc-canvas — Line canvas core for linecanvas
//!
//! Straight strokes on an unbounded character grid, rendered with the one
//! box-drawing glyph that correctly joins everything meeting in each cell:
//!
//! - **[`geometry`]** — `Point`, `Orientation`, `Viewport`
//! - **[`segment`]** — `Segment`, `LineStyle`, `CellRole`, `SegmentId`
//! - **[`store`]** — `Canvas`, the insertion-ordered segment store
//! - **[`junction`]** — arm merging, the glyph table, style fallbacks
//! - **[`raster`]** — `Canvas::render` into a `GlyphGrid`
//! - **[`interaction`]** — press / drag / release → committed segments
//! - **[`preset`]** — the `h 2,2 6 heavy` text format
//! - **[`shared`]** — `SharedCanvas`, a mutex-guarded handle for threaded hosts
//! - **[`error`]** — `CanvasError`
//!
//! The crate does no I/O. Terminal output lives in `lc-term`.

pub mod error;
pub mod geometry;
pub mod interaction;
pub mod junction;
pub mod preset;
pub mod raster;
pub mod segment;
pub mod shared;
pub mod store;

pub use error::CanvasError;
pub use geometry::{Orientation, Point, Viewport};
pub use interaction::InteractionController;
pub use raster::GlyphGrid;
pub use segment::{LineStyle, Segment, SegmentId};
pub use shared::SharedCanvas;
pub use store::Canvas;
