// SPDX-License-Identifier: MIT
//
// lc-term — Terminal surface for linecanvas.
//
// Everything between a rendered glyph grid and the user's terminal: a
// cell frame buffer, a differential ANSI renderer, raw-mode terminal
// control, an input parser that understands keys and SGR mouse reports,
// and the event loop that drives an application through all of it.
//
// Direct ANSI and termios only. No TUI framework sits in between, so the
// bytes written for each frame are exactly the ones the diff produced.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod reader;
pub mod terminal;
