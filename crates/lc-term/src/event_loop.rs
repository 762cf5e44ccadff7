// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop.
//
// Bytes from the reader thread are parsed into events and handed to the
// application. Whenever something changed, the application paints a fresh
// frame and the diff renderer writes the difference to the terminal.
//
// The loop blocks in `recv_timeout` on the reader channel. Input wakes it
// immediately; otherwise the timeout fires once per tick, which is when a
// pending lone ESC is flushed as an Escape press and a SIGWINCH flag set
// by the signal handler is picked up.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::buffer::FrameBuffer;
use crate::diff::DiffRenderer;
use crate::input::{Event, Parser};
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ───────────────────────────────────────────────────────────────

static RESIZED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn on_sigwinch(_: libc::c_int) {
    RESIZED.store(true, Ordering::Relaxed);
}

#[cfg(unix)]
fn watch_resize() {
    // SAFETY: the handler only stores to an atomic, which is
    // async-signal-safe; `sa` is fully initialized before use.
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = on_sigwinch as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(not(unix))]
const fn watch_resize() {}

// ─── App ────────────────────────────────────────────────────────────────────

/// What the loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// An application driven by [`EventLoop`].
///
/// Per iteration the loop calls `on_event` for each parsed event, then
/// `on_resize` if the terminal changed size, then `on_tick`, then `paint`
/// if anything asked for a repaint.
pub trait App {
    /// Handle one input event.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// The frame has already been resized when this is called.
    fn on_resize(&mut self, _size: Size) {}

    /// Return `true` to request a repaint without input.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Paint into a cleared frame.
    fn paint(&mut self, frame: &mut FrameBuffer);
}

// ─── Config ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// How long to wait for input before ticking. Also the lone-ESC
    /// timeout.
    pub tick: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(16),
        }
    }
}

// ─── EventLoop ──────────────────────────────────────────────────────────────

/// Owns the terminal and runs an [`App`] until it quits.
///
/// ```no_run
/// use lc_term::buffer::FrameBuffer;
/// use lc_term::event_loop::{Action, App, EventLoop};
/// use lc_term::input::{Event, KeyCode};
///
/// struct Hello;
///
/// impl App for Hello {
///     fn on_event(&mut self, event: &Event) -> Action {
///         match event {
///             Event::Key(k) if k.code == KeyCode::Char('q') => Action::Quit,
///             _ => Action::Continue,
///         }
///     }
///
///     fn paint(&mut self, frame: &mut FrameBuffer) {
///         frame.paint_text(0, 0, "hello", Default::default());
///     }
/// }
///
/// EventLoop::new().run(&mut Hello)?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: DiffRenderer,
    frame: FrameBuffer,
    config: LoopConfig,
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    #[must_use]
    pub fn with_config(config: LoopConfig) -> Self {
        let terminal = Terminal::new();
        let size = terminal.size();
        Self {
            terminal,
            parser: Parser::new(),
            renderer: DiffRenderer::new(),
            frame: FrameBuffer::new(size.cols, size.rows),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Enter the terminal, run `app` until it quits or input closes, and
    /// restore the terminal whatever the outcome.
    ///
    /// # Errors
    ///
    /// Terminal setup, reader startup, and frame output failures.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        watch_resize();
        app.on_resize(self.terminal.size());

        let result = StdinReader::spawn().and_then(|(mut reader, rx)| {
            let outcome = self.drive(app, &rx);
            reader.stop();
            outcome
        });

        let restored = self.terminal.leave();
        tracing::info!(ok = result.is_ok(), "event loop finished");
        result.and(restored)
    }

    fn drive(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        let mut dirty = true;
        loop {
            let events = match rx.recv_timeout(self.config.tick) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) => self.parser.flush(),
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("input closed");
                    return Ok(());
                }
            };
            if dispatch(app, &events) == Action::Quit {
                return Ok(());
            }
            dirty |= !events.is_empty();

            if RESIZED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                self.resize(app, size);
                dirty = true;
            }

            dirty |= app.on_tick();

            if dirty {
                let stdout = io::stdout();
                self.present(app, &mut stdout.lock())?;
                dirty = false;
            }
        }
    }

    /// Resize the frame, force a full repaint, and tell the app.
    pub fn resize(&mut self, app: &mut impl App, size: Size) {
        tracing::debug!(cols = size.cols, rows = size.rows, "resized");
        self.frame.resize(size.cols, size.rows);
        self.renderer.force_redraw();
        app.on_resize(size);
    }

    /// Feed raw input bytes through the parser to the app.
    pub fn feed(&mut self, app: &mut impl App, bytes: &[u8]) -> Action {
        let events = self.parser.advance(bytes);
        dispatch(app, &events)
    }

    /// Paint one frame and write its diff to `out`.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn present(&mut self, app: &mut impl App, out: &mut impl Write) -> io::Result<()> {
        self.frame.clear();
        app.paint(&mut self.frame);
        self.renderer.render(&self.frame);
        self.renderer.flush_to(out)
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

fn dispatch(app: &mut impl App, events: &[Event]) -> Action {
    for event in events {
        if app.on_event(event) == Action::Quit {
            return Action::Quit;
        }
    }
    Action::Continue
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::input::{KeyCode, MouseEventKind};

    #[derive(Default)]
    struct Recorder {
        keys: Vec<KeyCode>,
        clicks: usize,
        sizes: Vec<Size>,
        paints: usize,
    }

    impl App for Recorder {
        fn on_event(&mut self, event: &Event) -> Action {
            match event {
                Event::Key(k) if k.code == KeyCode::Char('q') => return Action::Quit,
                Event::Key(k) => self.keys.push(k.code),
                Event::Mouse(m) if matches!(m.kind, MouseEventKind::Press(_)) => self.clicks += 1,
                Event::Mouse(_) => {}
            }
            Action::Continue
        }

        fn on_resize(&mut self, size: Size) {
            self.sizes.push(size);
        }

        fn paint(&mut self, frame: &mut FrameBuffer) {
            self.paints += 1;
            frame.set(0, 0, Cell::new('┼'));
        }
    }

    fn test_loop() -> EventLoop {
        let mut el = EventLoop::new();
        el.frame.resize(4, 2);
        el
    }

    #[test]
    fn default_tick() {
        assert_eq!(LoopConfig::default().tick, Duration::from_millis(16));
    }

    #[test]
    fn feed_dispatches_in_order() {
        let mut el = test_loop();
        let mut app = Recorder::default();
        let action = el.feed(&mut app, b"ab\x1b[A\x1b[<0;1;1M");
        assert_eq!(action, Action::Continue);
        assert_eq!(app.keys, vec![KeyCode::Char('a'), KeyCode::Char('b'), KeyCode::Up]);
        assert_eq!(app.clicks, 1);
    }

    #[test]
    fn quit_stops_dispatch() {
        let mut el = test_loop();
        let mut app = Recorder::default();
        assert_eq!(el.feed(&mut app, b"aqb"), Action::Quit);
        assert_eq!(app.keys, vec![KeyCode::Char('a')]);
    }

    #[test]
    fn present_paints_and_writes() {
        let mut el = test_loop();
        let mut app = Recorder::default();
        let mut out = Vec::new();
        el.present(&mut app, &mut out).unwrap();
        assert_eq!(app.paints, 1);
        assert!(String::from_utf8_lossy(&out).contains('┼'));

        // Same frame again: nothing but the sync and reset wrapper.
        let mut again = Vec::new();
        el.present(&mut app, &mut again).unwrap();
        assert!(!String::from_utf8_lossy(&again).contains('┼'));
    }

    #[test]
    fn resize_forces_full_frame() {
        let mut el = test_loop();
        let mut app = Recorder::default();
        el.present(&mut app, &mut Vec::new()).unwrap();
        el.resize(&mut app, Size::new(6, 3));
        assert_eq!(app.sizes, vec![Size::new(6, 3)]);

        let mut out = Vec::new();
        el.present(&mut app, &mut out).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("\x1b[2J"));
    }
}
