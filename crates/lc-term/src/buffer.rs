// SPDX-License-Identifier: MIT
//
// FrameBuffer — the cell grid an application paints each frame.
//
// Row-major `Vec<Cell>`. The diff renderer walks it left to right, row by
// row, so a row's cells sit next to each other in memory and whole-row
// comparisons are a single slice `==`.
//
// Painting is bounds-checked and clips silently: writes past the right or
// bottom edge are dropped, never wrapped. Wide characters take a start
// cell plus a continuation cell. Overwriting either half breaks the pair
// so a frame never holds a dangling continuation.

use unicode_width::UnicodeWidthChar;

use crate::cell::Cell;

// ─── FrameBuffer ────────────────────────────────────────────────────────────

/// A `width × height` grid of cells.
///
/// ```
/// use lc_term::buffer::FrameBuffer;
/// use lc_term::cell::Cell;
///
/// let mut buf = FrameBuffer::new(10, 2);
/// buf.set(3, 1, Cell::new('┼'));
/// assert_eq!(buf.get(3, 1).map(|c| c.ch), Some('┼'));
/// assert_eq!(buf.row_text(1), "   ┼");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// A buffer of blank cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; usize::from(width) * usize::from(height)],
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.in_bounds(x, y).then(|| &self.cells[self.index(x, y)])
    }

    /// All cells, row-major.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row, or `None` past the bottom.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = self.index(0, y);
        Some(&self.cells[start..start + usize::from(self.width)])
    }

    /// The characters of one row with trailing blanks trimmed.
    /// Continuation cells are skipped.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        let Some(row) = self.row(y) else {
            return String::new();
        };
        let text: String = row
            .iter()
            .filter(|c| !c.is_continuation())
            .map(|c| c.ch)
            .collect();
        text.trim_end().to_owned()
    }

    // ─── Clear & Resize ─────────────────────────────────────────────────

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Change dimensions. All content is discarded.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::BLANK);
    }

    /// Overwrite this buffer with `other`, reusing the allocation when the
    /// sizes match.
    pub fn copy_from(&mut self, other: &Self) {
        if self.width == other.width && self.height == other.height {
            self.cells.copy_from_slice(&other.cells);
        } else {
            self.clone_from(other);
        }
    }

    // ─── Painting ───────────────────────────────────────────────────────

    /// Write one cell. Returns `false` if `(x, y)` is out of bounds.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.break_wide_char_at(x, y);
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Fill a whole row with copies of `cell`.
    pub fn fill_row(&mut self, y: u16, cell: Cell) {
        if y >= self.height {
            return;
        }
        let start = self.index(0, y);
        let end = start + usize::from(self.width);
        self.cells[start..end].fill(cell);
    }

    /// Paint `text` from `(x, y)` rightward using `style`'s colors and
    /// attributes. Stops at the right edge; a wide character that would
    /// straddle it is replaced by a space.
    ///
    /// Returns the number of columns used.
    pub fn paint_text(&mut self, x: u16, y: u16, text: &str, style: Cell) -> u16 {
        if y >= self.height {
            return 0;
        }
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            let w = ch.width().unwrap_or(0);
            if w == 0 {
                continue;
            }
            if w == 2 && col + 1 >= self.width {
                self.set(col, y, Cell { ch: ' ', ..style });
                col += 1;
                break;
            }
            self.set(col, y, Cell { ch, ..style });
            if w == 2 {
                self.set(
                    col + 1,
                    y,
                    Cell::continuation(style.fg, style.bg, style.attrs),
                );
            }
            col = col.saturating_add(if w == 2 { 2 } else { 1 });
        }
        col - x
    }

    /// Break any wide character overlapping `(x, y)` before it is
    /// overwritten.
    fn break_wide_char_at(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);
        if self.cells[idx].is_continuation() && x > 0 {
            let owner = self.index(x - 1, y);
            self.cells[owner].ch = ' ';
        }
        if x + 1 < self.width {
            let next = self.index(x + 1, y);
            if self.cells[next].is_continuation() {
                self.cells[next] = Cell::BLANK;
            }
        }
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

/// Display width of a string in terminal columns.
#[must_use]
pub fn string_width(s: &str) -> usize {
    s.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

// ─── Tests ──────────────────────────────────────────────────────────────────
