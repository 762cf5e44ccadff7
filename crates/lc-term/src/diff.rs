// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Each frame is compared with the one before it and only changed cells are
// written. Unchanged rows are skipped with one slice comparison. Cursor
// moves are elided when the next changed cell is directly to the right of
// the last one written, and colors or attributes are only re-sent when
// they differ from what the terminal already has.
//
// Output accumulates in a `Vec<u8>` and reaches the terminal in a single
// write, wrapped in synchronized-output markers.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::cell::{Attr, Cell, CellColor};

// ─── RenderStats ────────────────────────────────────────────────────────────

/// What one render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub cells_rendered: usize,
    pub cells_skipped: usize,
    pub bytes_written: usize,
}

// ─── Pen ────────────────────────────────────────────────────────────────────

/// What the terminal's cursor and SGR state are believed to be.
#[derive(Debug, Clone, Copy)]
struct Pen {
    x: i32,
    y: i32,
    fg: Option<CellColor>,
    bg: Option<CellColor>,
    attrs: Attr,
}

impl Pen {
    /// State right after an SGR reset, cursor position unknown.
    const RESET: Self = Self {
        x: -1,
        y: -1,
        fg: Some(CellColor::Default),
        bg: Some(CellColor::Default),
        attrs: Attr::empty(),
    };

    fn write_cell(&mut self, out: &mut Vec<u8>, x: u16, y: u16, cell: Cell) {
        let (xi, yi) = (i32::from(x), i32::from(y));
        if yi != self.y || xi != self.x + 1 {
            ansi::cursor_to(out, x, y).ok();
        }

        if cell.is_continuation() {
            // The wide char just written already covers this column.
            if self.y == yi && self.x == xi - 1 {
                self.x = xi;
                return;
            }
            self.apply_style(out, cell);
            out.push(b' ');
        } else {
            self.apply_style(out, cell);
            let mut utf8 = [0u8; 4];
            out.extend_from_slice(cell.ch.encode_utf8(&mut utf8).as_bytes());
        }
        self.x = xi;
        self.y = yi;
    }

    fn apply_style(&mut self, out: &mut Vec<u8>, cell: Cell) {
        if cell.attrs != self.attrs {
            if !self.attrs.is_empty() {
                ansi::reset(out).ok();
                self.fg = None;
                self.bg = None;
            }
            ansi::attrs(out, cell.attrs).ok();
            self.attrs = cell.attrs;
        }
        if self.fg != Some(cell.fg) {
            ansi::fg(out, cell.fg).ok();
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            ansi::bg(out, cell.bg).ok();
            self.bg = Some(cell.bg);
        }
    }
}

// ─── DiffRenderer ───────────────────────────────────────────────────────────

/// Turns successive frames into minimal ANSI updates.
///
/// ```
/// use lc_term::buffer::FrameBuffer;
/// use lc_term::cell::Cell;
/// use lc_term::diff::DiffRenderer;
///
/// let mut renderer = DiffRenderer::new();
/// let mut frame = FrameBuffer::new(4, 1);
/// renderer.render(&frame);
///
/// frame.set(2, 0, Cell::new('│'));
/// let stats = renderer.render(&frame);
/// assert_eq!(stats.cells_rendered, 1);
/// ```
#[derive(Debug, Default)]
pub struct DiffRenderer {
    output: Vec<u8>,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `current` against the last rendered frame and queue the ANSI
    /// needed to bring the terminal up to date.
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.output.clear();
        let (width, height) = (current.width(), current.height());
        let mut stats = RenderStats::default();

        if width == 0 || height == 0 {
            self.store(current);
            return stats;
        }

        let prev = self
            .previous
            .as_ref()
            .filter(|p| p.width() == width && p.height() == height);

        let out = &mut self.output;
        ansi::begin_sync(out).ok();
        ansi::reset(out).ok();
        if prev.is_none() {
            ansi::clear_screen(out).ok();
        }

        let mut pen = Pen::RESET;
        for y in 0..height {
            let (Some(row), prev_row) = (current.row(y), prev.and_then(|p| p.row(y))) else {
                continue;
            };
            if prev_row == Some(row) {
                stats.cells_skipped += row.len();
                continue;
            }
            for (x, &cell) in (0..width).zip(row) {
                let old = prev_row.and_then(|r| r.get(usize::from(x)));
                if old == Some(&cell) {
                    stats.cells_skipped += 1;
                } else {
                    pen.write_cell(out, x, y, cell);
                    stats.cells_rendered += 1;
                }
            }
        }

        ansi::reset(out).ok();
        ansi::end_sync(out).ok();
        stats.bytes_written = out.len();

        tracing::trace!(
            rendered = stats.cells_rendered,
            bytes = stats.bytes_written,
            "frame diffed"
        );
        self.store(current);
        stats
    }

    /// Bytes produced by the last [`render`](Self::render).
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Write the queued output to stdout.
    ///
    /// # Errors
    ///
    /// Propagates the write or flush failure.
    pub fn flush(&mut self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.flush_to(&mut lock)
    }

    /// Write the queued output to `w`.
    ///
    /// # Errors
    ///
    /// Propagates the write or flush failure.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(&self.output)?;
        w.flush()?;
        self.output.clear();
        Ok(())
    }

    /// Forget the previous frame so the next render repaints everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    fn store(&mut self, current: &FrameBuffer) {
        match &mut self.previous {
            Some(prev) => prev.copy_from(current),
            None => self.previous = Some(current.clone()),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
