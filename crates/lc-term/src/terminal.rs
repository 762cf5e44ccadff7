// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, alternate screen, mouse tracking, and
// guaranteed restore.
//
// termios and ioctl are only reachable through libc, so this module is
// one of the few allowed to use `unsafe`.
#![allow(unsafe_code)]
//
// `Terminal::enter` saves the current termios, switches to raw mode and
// the alternate screen, and turns on SGR mouse reporting. `leave` (or
// `Drop`) undoes all of it. A panic hook covers the case where neither
// runs: it writes a fixed restore sequence straight to fd 1, without the
// stdout lock the panicking frame may still hold, and puts the saved
// termios back before the default hook prints the message.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when the real size cannot be queried.
    pub const FALLBACK: Self = Self::new(80, 24);

    #[inline]
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

/// Current size of the terminal on stdout, if it is one.
#[cfg(unix)]
#[must_use]
pub fn query_size() -> Option<Size> {
    // SAFETY: `winsize` is plain data; zeroed is a valid value.
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    // SAFETY: TIOCGWINSZ writes one `winsize` through the pointer.
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
    (rc == 0 && ws.ws_col > 0 && ws.ws_row > 0).then(|| Size::new(ws.ws_col, ws.ws_row))
}

#[cfg(not(unix))]
#[must_use]
pub fn query_size() -> Option<Size> {
    None
}

/// Whether stdin is a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    // SAFETY: isatty only inspects the descriptor.
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic Restore ──────────────────────────────────────────────────────────

#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

static HOOK: Once = Once::new();

/// End sync, mouse off, SGR reset, cursor on, main screen.
#[rustfmt::skip]
const RESTORE: &[u8] = b"\
    \x1b[?2026l\
    \x1b[?1006l\x1b[?1002l\x1b[?1000l\
    \x1b[0m\
    \x1b[?25h\
    \x1b[?1049l";

fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            write_restore();
            #[cfg(unix)]
            restore_saved_termios();
            previous(info);
        }));
    });
}

fn write_restore() {
    #[cfg(unix)]
    // SAFETY: writes a static byte string to fd 1.
    unsafe {
        libc::write(libc::STDOUT_FILENO, RESTORE.as_ptr().cast(), RESTORE.len());
    }
    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        out.write_all(RESTORE).ok();
        out.flush().ok();
    }
}

#[cfg(unix)]
fn restore_saved_termios() {
    let saved = SAVED_TERMIOS.lock().ok().and_then(|guard| *guard);
    if let Some(original) = saved {
        // SAFETY: `original` came from tcgetattr on the same descriptor.
        unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &raw const original) };
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The interactive terminal. Restores itself on drop.
///
/// ```no_run
/// use lc_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // draw...
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct Terminal {
    #[cfg(unix)]
    original: Option<libc::termios>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// A handle sized to the current terminal. Does not touch terminal
    /// state until [`enter`](Self::enter).
    #[must_use]
    pub fn new() -> Self {
        Self {
            #[cfg(unix)]
            original: None,
            size: query_size().unwrap_or(Size::FALLBACK),
            active: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the size, keeping the old one if the query fails.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = query_size() {
            self.size = size;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Raw mode, alternate screen, hidden cursor, mouse on.
    /// A no-op when already active.
    ///
    /// # Errors
    ///
    /// Fails if termios cannot be changed or stdout cannot be written.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        self.raw_mode_on()?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        ansi::enable_mouse(&mut out)?;
        out.flush()?;

        self.active = true;
        tracing::debug!(cols = self.size.cols, rows = self.size.rows, "terminal entered");
        Ok(())
    }

    /// Undo [`enter`](Self::enter). A no-op when inactive.
    ///
    /// # Errors
    ///
    /// Fails if stdout cannot be written or termios cannot be restored.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            ansi::end_sync(&mut out)?;
            ansi::disable_mouse(&mut out)?;
            ansi::reset(&mut out)?;
            ansi::cursor_show(&mut out)?;
            ansi::exit_alt_screen(&mut out)?;
            out.flush()?;
        }
        self.raw_mode_off()?;
        self.active = false;
        tracing::debug!("terminal restored");
        Ok(())
    }

    #[cfg(unix)]
    fn raw_mode_on(&mut self) -> io::Result<()> {
        if !is_tty() {
            return Ok(());
        }
        // SAFETY: `termios` is plain data; tcgetattr fills it in.
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        // SAFETY: valid descriptor and pointer.
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        self.original = Some(termios);
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = Some(termios);
        }

        let mut mode = termios;
        // SAFETY: cfmakeraw only edits the struct it is given.
        unsafe { libc::cfmakeraw(&raw mut mode) };
        mode.c_cc[libc::VMIN] = 1;
        mode.c_cc[libc::VTIME] = 0;
        // SAFETY: valid descriptor and pointer.
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const mode) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(unix)]
    fn raw_mode_off(&mut self) -> io::Result<()> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };
        // SAFETY: restoring the struct saved by `raw_mode_on`.
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const original) } != 0 {
            return Err(io::Error::last_os_error());
        }
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = None;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unused_self, clippy::unnecessary_wraps)]
    fn raw_mode_on(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unused_self, clippy::unnecessary_wraps)]
    fn raw_mode_off(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(err) = self.leave() {
            tracing::warn!(%err, "terminal restore failed");
            write_restore();
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_size() {
        assert_eq!(Size::FALLBACK, Size { cols: 80, rows: 24 });
    }

    #[test]
    fn new_is_inactive_with_some_size() {
        let term = Terminal::new();
        assert!(!term.is_active());
        assert!(term.size().cols > 0 && term.size().rows > 0);
    }

    #[test]
    fn leave_while_inactive_is_noop() {
        let mut term = Terminal::new();
        assert!(term.leave().is_ok());
        assert!(!term.is_active());
    }

    #[test]
    fn restore_sequence_undoes_enter() {
        let text = String::from_utf8_lossy(RESTORE);
        for seq in ["\x1b[?1000l", "\x1b[?1002l", "\x1b[?1006l", "\x1b[?25h", "\x1b[0m"] {
            assert!(text.contains(seq), "missing {seq:?}");
        }
        assert!(text.ends_with("\x1b[?1049l"));
    }

    #[test]
    fn refresh_size_keeps_a_size() {
        let mut term = Terminal::new();
        let before = term.size();
        let after = term.refresh_size();
        if query_size().is_none() {
            assert_eq!(before, after);
        }
    }
}
