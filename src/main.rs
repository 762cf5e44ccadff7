// SPDX-License-Identifier: MIT
//
// linecanvas — draw box-drawing lines in the terminal with the mouse.
//
// This binary wires the two crates together:
//
//   lc-term   → terminal control, input parsing, frame diffing, event loop
//   lc-canvas → segment store, junction resolution, rasterization
//
// `DrawApp` implements lc-term's `App`. Pointer events are mapped from
// screen cells to canvas points (through the pan offset) and drive an
// `InteractionController`. Every paint rasterizes the visible part of the
// canvas into the frame:
//
//   ┌──────────────────────────────┐
//   │ canvas viewport              │  ← h - 1 rows (h with `nostatus`)
//   ├──────────────────────────────┤
//   │ status line (INVERSE)        │  ← 1 row
//   └──────────────────────────────┘

mod logging;
mod options;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use lc_canvas::interaction::DragState;
use lc_canvas::raster::render_segments;
use lc_canvas::{Canvas, CanvasError, InteractionController, LineStyle, Point, Viewport, preset};

use lc_term::buffer::FrameBuffer;
use lc_term::cell::{Attr, Cell, CellColor};
use lc_term::event_loop::{Action, App, EventLoop};
use lc_term::input::{Event, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind};
use lc_term::terminal::Size;

use options::{Cli, DrawOptions};

/// Cells the view moves per arrow key (and per wheel notch, vertically).
const PAN_STEP: i32 = 1;
const SCROLL_STEP: i32 = 3;

/// Color of the stroke being dragged.
const PREVIEW_FG: CellColor = CellColor::Indexed(3);

// ─── DrawApp ────────────────────────────────────────────────────────────────

struct DrawApp {
    canvas: Canvas,
    controller: InteractionController,
    options: DrawOptions,
    /// Canvas point shown in the top-left screen cell.
    pan: Point,
    size: Size,
}

impl DrawApp {
    fn new(canvas: Canvas, options: DrawOptions) -> Self {
        let mut controller = InteractionController::new();
        controller.set_style(options.style);
        Self {
            canvas,
            controller,
            options,
            pan: Point::ZERO,
            size: Size::FALLBACK,
        }
    }

    fn to_canvas(&self, x: u16, y: u16) -> Point {
        self.pan.offset(i32::from(x), i32::from(y))
    }

    /// Rows available to the canvas.
    const fn canvas_rows(&self, height: u16) -> u16 {
        if self.options.status {
            height.saturating_sub(1)
        } else {
            height
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(Modifiers::CTRL);
        match key.code {
            KeyCode::Char('q') if !ctrl => return Action::Quit,
            KeyCode::Char('c') if ctrl => return Action::Quit,
            KeyCode::Char('c') => {
                tracing::info!(removed = self.canvas.len(), "canvas cleared");
                self.controller.cancel();
                self.canvas.clear();
            }
            KeyCode::Char(d @ '1'..='4') => {
                let idx = d as usize - '1' as usize;
                self.set_style(LineStyle::VISIBLE[idx]);
            }
            KeyCode::Escape => self.controller.cancel(),
            KeyCode::Left => self.pan = self.pan.offset(-PAN_STEP, 0),
            KeyCode::Right => self.pan = self.pan.offset(PAN_STEP, 0),
            KeyCode::Up => self.pan = self.pan.offset(0, -PAN_STEP),
            KeyCode::Down => self.pan = self.pan.offset(0, PAN_STEP),
            KeyCode::Home => self.pan = Point::ZERO,
            _ => {}
        }
        Action::Continue
    }

    fn set_style(&mut self, style: LineStyle) {
        self.options.style = style;
        self.controller.set_style(style);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        // The status row is not part of the canvas.
        if self.options.status && mouse.y >= self.canvas_rows(self.size.rows) {
            if matches!(mouse.kind, MouseEventKind::Release(_)) {
                self.controller.cancel();
            }
            return;
        }
        let p = self.to_canvas(mouse.x, mouse.y);
        match mouse.kind {
            MouseEventKind::Press(MouseButton::Left) => self.controller.press(p),
            MouseEventKind::Drag(MouseButton::Left) => self.controller.drag(p),
            MouseEventKind::Release(_) => {
                if let Some(id) = self.controller.release(p, &mut self.canvas) {
                    tracing::info!(%id, total = self.canvas.len(), "stroke committed");
                }
            }
            MouseEventKind::Press(MouseButton::Right) => self.erase_at(p),
            MouseEventKind::ScrollUp => self.pan = self.pan.offset(0, -SCROLL_STEP),
            MouseEventKind::ScrollDown => self.pan = self.pan.offset(0, SCROLL_STEP),
            _ => {}
        }
    }

    /// Remove every segment covering `p`.
    fn erase_at(&mut self, p: Point) {
        for id in self.canvas.segments_at(p) {
            if let Err(err) = self.canvas.remove(id) {
                tracing::warn!(%err, "erase");
            }
        }
    }

    fn paint_canvas(&self, frame: &mut FrameBuffer, rows: u16) {
        let viewport = Viewport::at(self.pan, i32::from(frame.width()), i32::from(rows));
        let preview = self.controller.preview().filter(|_| self.options.preview);
        let grid = render_segments(
            self.canvas.iter().map(|(_, s)| s).chain(preview.as_ref()),
            viewport,
        );

        for (y, cells) in (0..rows).zip(grid.rows()) {
            for (x, glyph) in (0..frame.width()).zip(cells) {
                let Some(ch) = *glyph else { continue };
                let mut cell = Cell::new(ch);
                if preview.as_ref().is_some_and(|s| s.contains(self.to_canvas(x, y))) {
                    cell = cell.with_fg(PREVIEW_FG);
                }
                frame.set(x, y, cell);
            }
        }
    }

    fn paint_status(&self, frame: &mut FrameBuffer, y: u16) {
        let bar = Cell::BLANK.with_attrs(Attr::INVERSE);
        frame.fill_row(y, bar);

        let state = self.controller.state();
        let drag = match state {
            DragState::Dragging { start, current } => format!(" │ {start} → {current}"),
            DragState::Idle => String::new(),
        };
        let left = format!(
            " {state} │ {} │ {} segment{} │ {}{drag}",
            self.controller.style(),
            self.canvas.len(),
            if self.canvas.len() == 1 { "" } else { "s" },
            self.pan,
        );
        let used = frame.paint_text(0, y, &left, bar);

        let help = "1-4 style  c clear  esc cancel  q quit ";
        let help_w = u16::try_from(lc_term::buffer::string_width(help)).unwrap_or(u16::MAX);
        if used.saturating_add(help_w) < frame.width() {
            frame.paint_text(frame.width() - help_w, y, help, bar.with_attrs(Attr::INVERSE | Attr::DIM));
        }
    }
}

impl App for DrawApp {
    fn on_event(&mut self, event: &Event) -> Action {
        match *event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                Action::Continue
            }
        }
    }

    fn on_resize(&mut self, size: Size) {
        self.size = size;
    }

    fn paint(&mut self, frame: &mut FrameBuffer) {
        let h = frame.height();
        let rows = self.canvas_rows(h);
        self.paint_canvas(frame, rows);
        if self.options.status && h > 0 {
            self.paint_status(frame, h - 1);
        }
    }
}

// ─── Presets ────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("{}: {source}", path.display())]
    Parse { path: PathBuf, source: CanvasError },
}

fn load_canvas(path: Option<&Path>) -> Result<Canvas, LoadError> {
    let mut canvas = Canvas::new();
    let Some(path) = path else {
        return Ok(canvas);
    };
    let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })?;
    preset::load_into(&mut canvas, &text).map_err(|source| LoadError::Parse {
        path: path.to_owned(),
        source,
    })?;
    Ok(canvas)
}

/// The whole drawing as text, cropped to its bounding box.
fn print_canvas(canvas: &Canvas) -> String {
    canvas
        .bounds()
        .map(|vp| canvas.render(vp).to_text())
        .unwrap_or_default()
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli: Cli = match options::parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("linecanvas: {e}\n\n{}", options::USAGE);
            return ExitCode::FAILURE;
        }
    };
    if cli.help {
        println!("{}", options::USAGE);
        return ExitCode::SUCCESS;
    }

    let log_guard = logging::init();

    let canvas = match load_canvas(cli.preset.as_deref()) {
        Ok(canvas) => canvas,
        Err(e) => {
            eprintln!("linecanvas: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.print {
        println!("{}", print_canvas(&canvas));
        return ExitCode::SUCCESS;
    }

    let mut app = DrawApp::new(canvas, cli.options);
    let mut event_loop = EventLoop::new();
    app.size = event_loop.size();
    if let Err(e) = event_loop.run(&mut app) {
        eprintln!("linecanvas: {e}");
        if let Some(guard) = &log_guard {
            eprintln!("linecanvas: log in {}", guard.log_dir().display());
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

// ─── Tests ──────────────────────────────────────────────────────────────────
