// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key and mouse events. Only the encodings the
// terminal is asked for in `terminal.rs` are understood:
//
// - legacy CSI keys (arrows, Home/End, PageUp/PageDown, Delete) with the
//   xterm `1 + bitmask` modifier parameter
// - SS3 arrows, which some terminals send in application cursor mode
// - SGR mouse reports for press, release and button-held motion
// - Alt+key as ESC followed by a printable byte
// - UTF-8 characters
//
// Escape sequences can straddle `read()` calls, so unconsumed bytes stay
// buffered between [`Parser::advance`] calls. A lone ESC is ambiguous
// until the next byte shows up; the event loop calls [`Parser::flush`]
// after a quiet period to turn it into an Escape press.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A parsed input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[inline]
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A press of `c` with no modifiers.
    #[inline]
    #[must_use]
    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::empty())
    }

    /// Ctrl plus `c`.
    #[inline]
    #[must_use]
    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::CTRL)
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    BackTab,
    Backspace,
    Escape,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Modifier keys, in xterm bit order (`param = 1 + bits`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
    }
}

/// A mouse report, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Press(MouseButton),
    Release(MouseButton),
    /// Motion with a button held.
    Drag(MouseButton),
    /// Motion with no button held. Only sent in any-event tracking mode.
    Move,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Incremental byte-to-event parser.
///
/// ```
/// use lc_term::input::{Event, KeyCode, Parser};
///
/// let mut p = Parser::new();
/// assert!(p.advance(b"\x1b[").is_empty());
/// let events = p.advance(b"A");
/// assert!(matches!(events[0], Event::Key(k) if k.code == KeyCode::Up));
/// ```
#[derive(Debug, Default)]
pub struct Parser {
    pending: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(32),
        }
    }

    /// Feed bytes and return every complete event. Incomplete trailing
    /// sequences are kept for the next call.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.pending.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.pending.len() {
            match step(&self.pending[pos..]) {
                Step::Emit(event, used) => {
                    events.push(event);
                    pos += used;
                }
                Step::Skip(used) => pos += used,
                Step::NeedMore => break,
            }
        }
        self.pending.drain(..pos);
        events
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Give up waiting on buffered bytes. A lone ESC becomes an Escape
    /// press; other printable leftovers become characters.
    pub fn flush(&mut self) -> Vec<Event> {
        let events = self
            .pending
            .iter()
            .filter_map(|&b| match b {
                0x1B => Some(key(KeyCode::Escape, Modifiers::empty())),
                0x20..=0x7E => Some(key(KeyCode::Char(char::from(b)), Modifiers::empty())),
                _ => None,
            })
            .collect();
        self.pending.clear();
        events
    }
}

// ─── Decoding ───────────────────────────────────────────────────────────────

/// Outcome of decoding from the head of the buffer.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Emit(Event, usize),
    Skip(usize),
    NeedMore,
}

fn step(buf: &[u8]) -> Step {
    let Some(&lead) = buf.first() else {
        return Step::NeedMore;
    };
    let none = Modifiers::empty();
    match lead {
        0x1B => escape(buf),
        0x0D | 0x0A => Step::Emit(key(KeyCode::Enter, none), 1),
        0x09 => Step::Emit(key(KeyCode::Tab, none), 1),
        0x08 | 0x7F => Step::Emit(key(KeyCode::Backspace, none), 1),
        0x00 => Step::Emit(key(KeyCode::Char(' '), Modifiers::CTRL), 1),
        b @ 0x01..=0x1A => Step::Emit(key(ctrl_letter(b), Modifiers::CTRL), 1),
        b @ 0x20..=0x7E => Step::Emit(key(KeyCode::Char(char::from(b)), none), 1),
        0xC0..=0xF7 => utf8(buf),
        _ => Step::Skip(1),
    }
}

fn escape(buf: &[u8]) -> Step {
    match buf.get(1) {
        None => Step::NeedMore,
        Some(b'[') => csi(buf),
        Some(b'O') => ss3(buf),
        Some(&b @ 0x20..=0x7E) => Step::Emit(key(KeyCode::Char(char::from(b)), Modifiers::ALT), 2),
        Some(&b @ 0x01..=0x1A) => Step::Emit(key(ctrl_letter(b), Modifiers::ALT | Modifiers::CTRL), 2),
        Some(_) => Step::Emit(key(KeyCode::Escape, Modifiers::empty()), 1),
    }
}

fn csi(buf: &[u8]) -> Step {
    if buf.get(2) == Some(&b'<') {
        return sgr_mouse(buf);
    }

    // Parameter and intermediate bytes, then a final byte in 0x40..=0x7E.
    let Some(offset) = buf[2..].iter().position(|b| !(0x20..=0x3F).contains(b)) else {
        return Step::NeedMore;
    };
    let end = 2 + offset;
    let used = end + 1;
    let final_byte = buf[end];
    if !(0x40..=0x7E).contains(&final_byte) {
        return Step::Skip(used);
    }

    let params = numbers(&buf[2..end]);
    let mods = params.get(1).map_or(Modifiers::empty(), |&m| modifiers(m));

    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'Z' => KeyCode::BackTab,
        b'~' => match params.first() {
            Some(1 | 7) => KeyCode::Home,
            Some(3) => KeyCode::Delete,
            Some(4 | 8) => KeyCode::End,
            Some(5) => KeyCode::PageUp,
            Some(6) => KeyCode::PageDown,
            _ => return Step::Skip(used),
        },
        _ => return Step::Skip(used),
    };
    Step::Emit(key(code, mods), used)
}

fn ss3(buf: &[u8]) -> Step {
    let Some(&b) = buf.get(2) else {
        return Step::NeedMore;
    };
    let code = match b {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Step::Skip(3),
    };
    Step::Emit(key(code, Modifiers::empty()), 3)
}

/// `ESC [ < Cb ; Cx ; Cy (M|m)`, with `m` marking a release.
fn sgr_mouse(buf: &[u8]) -> Step {
    let body = &buf[3..];
    let Some(offset) = body
        .iter()
        .position(|b| !b.is_ascii_digit() && *b != b';')
    else {
        return Step::NeedMore;
    };
    let used = 3 + offset + 1;
    let terminator = body[offset];
    if terminator != b'M' && terminator != b'm' {
        return Step::Skip(used);
    }

    let params = numbers(&body[..offset]);
    let [cb, cx, cy] = params[..] else {
        return Step::Skip(used);
    };

    let mut mods = Modifiers::empty();
    mods.set(Modifiers::SHIFT, cb & 4 != 0);
    mods.set(Modifiers::ALT, cb & 8 != 0);
    mods.set(Modifiers::CTRL, cb & 16 != 0);

    let button = match cb & 3 {
        0 => Some(MouseButton::Left),
        1 => Some(MouseButton::Middle),
        2 => Some(MouseButton::Right),
        _ => None,
    };

    let kind = if cb & 64 != 0 {
        if cb & 1 == 0 {
            MouseEventKind::ScrollUp
        } else {
            MouseEventKind::ScrollDown
        }
    } else if cb & 32 != 0 {
        button.map_or(MouseEventKind::Move, MouseEventKind::Drag)
    } else {
        let button = button.unwrap_or(MouseButton::Left);
        if terminator == b'm' {
            MouseEventKind::Release(button)
        } else {
            MouseEventKind::Press(button)
        }
    };

    Step::Emit(
        Event::Mouse(MouseEvent {
            kind,
            x: cx.saturating_sub(1),
            y: cy.saturating_sub(1),
            modifiers: mods,
        }),
        used,
    )
}

fn utf8(buf: &[u8]) -> Step {
    let len = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    };
    if buf.len() < len {
        return Step::NeedMore;
    }
    match std::str::from_utf8(&buf[..len]).ok().and_then(|s| s.chars().next()) {
        Some(c) => Step::Emit(key(KeyCode::Char(c), Modifiers::empty()), len),
        None => Step::Skip(1),
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

const fn key(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent { code, modifiers })
}

/// `0x01` is Ctrl-A, `0x1A` is Ctrl-Z.
fn ctrl_letter(b: u8) -> KeyCode {
    KeyCode::Char(char::from(b'a' + b - 1))
}

/// xterm encodes modifiers as `1 + bits`.
#[allow(clippy::cast_possible_truncation)]
const fn modifiers(param: u16) -> Modifiers {
    Modifiers::from_bits_truncate(param.saturating_sub(1) as u8)
}

/// Semicolon-separated decimal parameters. Empty fields read as 0;
/// anything past a colon in a field is ignored.
fn numbers(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &d| {
                    acc.saturating_mul(10).saturating_add(u16::from(d - b'0'))
                })
        })
        .collect()
}

// ─── Tests ──────────────────────────────────────────────────────────────────
