// SPDX-License-Identifier: MIT
//
// ANSI escape sequences.
//
// Stateless writers over `impl Write`. Deciding *when* to emit belongs to
// the diff renderer; this module only knows the bytes.
//
// Positions are 0-indexed here and converted to the terminal's 1-indexed
// CUP coordinates on the way out.

use std::io::{self, Write};

use crate::cell::{Attr, CellColor};

// ─── Cursor ─────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ─────────────────────────────────────────────────────────────────

/// Erase the whole screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// SGR 0. Clears every color and attribute.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

/// Begin synchronized output (DEC 2026). The terminal holds the frame
/// until [`end_sync`].
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// ─── Colors & Attributes ────────────────────────────────────────────────────

/// Foreground color. Palette entries below 16 use the short SGR forms.
pub fn fg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[39m"),
        CellColor::Indexed(i @ 0..=7) => write!(w, "\x1b[{}m", 30 + u16::from(i)),
        CellColor::Indexed(i @ 8..=15) => write!(w, "\x1b[{}m", 82 + u16::from(i)),
        CellColor::Indexed(i) => write!(w, "\x1b[38;5;{i}m"),
        CellColor::Rgb(r, g, b) => write!(w, "\x1b[38;2;{r};{g};{b}m"),
    }
}

/// Background color, same encoding as [`fg`].
pub fn bg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[49m"),
        CellColor::Indexed(i @ 0..=7) => write!(w, "\x1b[{}m", 40 + u16::from(i)),
        CellColor::Indexed(i @ 8..=15) => write!(w, "\x1b[{}m", 92 + u16::from(i)),
        CellColor::Indexed(i) => write!(w, "\x1b[48;5;{i}m"),
        CellColor::Rgb(r, g, b) => write!(w, "\x1b[48;2;{r};{g};{b}m"),
    }
}

/// All set attributes in one SGR sequence (`\x1b[1;7m`). No-op when empty.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    const CODES: [(Attr, &str); 5] = [
        (Attr::BOLD, "1"),
        (Attr::DIM, "2"),
        (Attr::ITALIC, "3"),
        (Attr::UNDERLINE, "4"),
        (Attr::INVERSE, "7"),
    ];

    if attr.is_empty() {
        return Ok(());
    }
    let params: Vec<&str> = CODES
        .iter()
        .filter(|(flag, _)| attr.contains(*flag))
        .map(|&(_, code)| code)
        .collect();
    write!(w, "\x1b[{}m", params.join(";"))
}

// ─── Mouse ──────────────────────────────────────────────────────────────────

/// Enable button-event tracking (press, release, drag) in SGR encoding.
pub fn enable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1000h\x1b[?1002h\x1b[?1006h")
}

pub fn disable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1006l\x1b[?1002l\x1b[?1000l")
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn out(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn cursor_is_one_based() {
        assert_eq!(out(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(out(|w| cursor_to(w, 9, 4)), "\x1b[5;10H");
    }

    #[test]
    fn cursor_to_max_does_not_overflow() {
        assert_eq!(out(|w| cursor_to(w, u16::MAX, u16::MAX)), "\x1b[65536;65536H");
    }

    #[test]
    fn fg_encodings() {
        assert_eq!(out(|w| fg(w, CellColor::Default)), "\x1b[39m");
        assert_eq!(out(|w| fg(w, CellColor::Indexed(1))), "\x1b[31m");
        assert_eq!(out(|w| fg(w, CellColor::Indexed(9))), "\x1b[91m");
        assert_eq!(out(|w| fg(w, CellColor::Indexed(200))), "\x1b[38;5;200m");
        assert_eq!(out(|w| fg(w, CellColor::Rgb(1, 2, 3))), "\x1b[38;2;1;2;3m");
    }

    #[test]
    fn bg_encodings() {
        assert_eq!(out(|w| bg(w, CellColor::Default)), "\x1b[49m");
        assert_eq!(out(|w| bg(w, CellColor::Indexed(4))), "\x1b[44m");
        assert_eq!(out(|w| bg(w, CellColor::Indexed(12))), "\x1b[104m");
        assert_eq!(out(|w| bg(w, CellColor::Indexed(16))), "\x1b[48;5;16m");
    }

    #[test]
    fn attrs_join_with_semicolons() {
        assert_eq!(out(|w| attrs(w, Attr::empty())), "");
        assert_eq!(out(|w| attrs(w, Attr::BOLD)), "\x1b[1m");
        assert_eq!(out(|w| attrs(w, Attr::BOLD | Attr::INVERSE)), "\x1b[1;7m");
    }

    #[test]
    fn mouse_enable_and_disable_mirror() {
        let on = out(|w| enable_mouse(w));
        let off = out(|w| disable_mouse(w));
        for mode in ["1000", "1002", "1006"] {
            assert!(on.contains(&format!("\x1b[?{mode}h")));
            assert!(off.contains(&format!("\x1b[?{mode}l")));
        }
    }
}
