// SPDX-License-Identifier: MIT
//
// Cell — one character position on screen.
//
// A cell is a codepoint plus colors and attributes. Frames are grids of
// cells; the diff renderer compares them with plain `==`, so everything
// here is small, `Copy`, and free of interior state.
//
// Wide characters take two columns. The first holds the codepoint and the
// second is a continuation cell (`ch == '\0'`) that only carries style.

use std::fmt;

// ─── Color ──────────────────────────────────────────────────────────────────

/// A terminal color, ready to emit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// The terminal's own default (SGR 39 / 49).
    #[default]
    Default,
    /// One of the 256 palette entries.
    Indexed(u8),
    /// 24-bit color.
    Rgb(u8, u8, u8),
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Indexed(i) => write!(f, "idx({i})"),
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

// ─── Attributes ─────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// SGR text attributes.
    ///
    /// ```
    /// use lc_term::cell::Attr;
    ///
    /// let a = Attr::BOLD | Attr::INVERSE;
    /// assert!(a.contains(Attr::INVERSE));
    /// assert!(!a.contains(Attr::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1.
        const BOLD      = 1 << 0;
        /// SGR 2.
        const DIM       = 1 << 1;
        /// SGR 3.
        const ITALIC    = 1 << 2;
        /// SGR 4.
        const UNDERLINE = 1 << 3;
        /// SGR 7.
        const INVERSE   = 1 << 4;
    }
}

// ─── Cell ───────────────────────────────────────────────────────────────────

/// One screen position.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The character, or `'\0'` for the second column of a wide char.
    pub ch: char,
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl Cell {
    /// A blank cell: space, default colors, no attributes.
    pub const BLANK: Self = Self::new(' ');

    /// A default-styled cell holding `ch`.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            fg: CellColor::Default,
            bg: CellColor::Default,
            attrs: Attr::empty(),
        }
    }

    /// A fully specified cell.
    #[inline]
    #[must_use]
    pub const fn styled(ch: char, fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self { ch, fg, bg, attrs }
    }

    /// Second column of a wide character.
    #[inline]
    #[must_use]
    pub const fn continuation(fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self::styled('\0', fg, bg, attrs)
    }

    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch == '\0'
    }

    /// A space with no styling at all.
    #[must_use]
    pub fn is_blank(self) -> bool {
        self == Self::BLANK
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: CellColor) -> Self {
        Self { fg, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }

    /// Same colors and attributes, ignoring the character.
    #[must_use]
    pub fn same_style(self, other: Self) -> bool {
        self.fg == other.fg && self.bg == other.bg && self.attrs == other.attrs
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_continuation() {
            return f.write_str("Cell(cont)");
        }
        write!(f, "Cell({:?}", self.ch)?;
        if self.fg != CellColor::Default {
            write!(f, " fg={:?}", self.fg)?;
        }
        if self.bg != CellColor::Default {
            write!(f, " bg={:?}", self.bg)?;
        }
        if !self.attrs.is_empty() {
            write!(f, " {:?}", self.attrs)?;
        }
        f.write_str(")")
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_default() {
        assert_eq!(Cell::default(), Cell::BLANK);
        assert!(Cell::BLANK.is_blank());
        assert!(!Cell::new('x').is_blank());
    }

    #[test]
    fn styled_space_is_not_blank() {
        assert!(!Cell::BLANK.with_attrs(Attr::INVERSE).is_blank());
    }

    #[test]
    fn continuation_detection() {
        let c = Cell::continuation(CellColor::Default, CellColor::Indexed(4), Attr::empty());
        assert!(c.is_continuation());
        assert!(!Cell::new('a').is_continuation());
    }

    #[test]
    fn builders_keep_the_char() {
        let c = Cell::new('┼')
            .with_fg(CellColor::Rgb(1, 2, 3))
            .with_attrs(Attr::BOLD);
        assert_eq!(c.ch, '┼');
        assert_eq!(c.fg, CellColor::Rgb(1, 2, 3));
        assert_eq!(c.bg, CellColor::Default);
        assert_eq!(c.attrs, Attr::BOLD);
    }

    #[test]
    fn same_style_ignores_char() {
        let a = Cell::new('a').with_attrs(Attr::DIM);
        let b = Cell::new('b').with_attrs(Attr::DIM);
        assert!(a.same_style(b));
        assert!(!a.same_style(Cell::new('a')));
    }

    #[test]
    fn debug_is_compact() {
        assert_eq!(format!("{:?}", Cell::new('x')), "Cell('x')");
        let c = Cell::new('y').with_fg(CellColor::Rgb(255, 0, 16));
        assert_eq!(format!("{c:?}"), "Cell('y' fg=#ff0010)");
        assert_eq!(
            format!("{:?}", Cell::continuation(CellColor::Default, CellColor::Default, Attr::empty())),
            "Cell(cont)"
        );
    }
}
