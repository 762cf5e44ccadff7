//! Preset diagrams — a tiny line-oriented text format for segments.
//!
//! One segment per line:
//!
//! ```text
//! # a box with a divider
//! h 0,0 10
//! h 0,4 10
//! v 0,0 4
//! v 10,0 4 double
//! v 5,0 4 heavy
//! ```
//!
//! | Field    | Meaning                                          |
//! |----------|--------------------------------------------------|
//! | `h`/`v`  | orientation                                      |
//! | `col,row`| start cell, signed                               |
//! | `length` | signed length (closed range, so `+1` cells)      |
//! | style    | optional: `single` (default), `double`, `heavy`, `dashed`, `none` |
//!
//! Blank lines and everything after `#` are ignored. Segments load in file
//! order.

use crate::error::CanvasError;
use crate::geometry::{Orientation, Point};
use crate::segment::{LineStyle, Segment, SegmentId};
use crate::store::Canvas;

/// Parse a whole preset.
///
/// # Errors
///
/// [`CanvasError::Preset`] for the first malformed line, with its 1-based
/// line number. Nothing is returned for a partially valid preset.
pub fn parse(text: &str) -> Result<Vec<Segment>, CanvasError> {
    let mut segments = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split_once('#').map_or(raw, |(code, _)| code).trim();
        if line.is_empty() {
            continue;
        }
        let segment = parse_line(line).map_err(|reason| CanvasError::Preset {
            line: idx + 1,
            reason,
        })?;
        segments.push(segment);
    }
    Ok(segments)
}

/// Parse a preset and commit every segment to `canvas`.
///
/// The canvas is untouched if the preset has an error.
///
/// # Errors
///
/// See [`parse`].
pub fn load_into(canvas: &mut Canvas, text: &str) -> Result<Vec<SegmentId>, CanvasError> {
    let segments = parse(text)?;
    tracing::info!(count = segments.len(), "preset loaded");
    Ok(canvas.extend(segments))
}

fn parse_line(line: &str) -> Result<Segment, String> {
    let mut fields = line.split_whitespace();

    let orientation = match fields.next() {
        Some("h" | "H") => Orientation::Horizontal,
        Some("v" | "V") => Orientation::Vertical,
        Some(other) => return Err(format!("expected `h` or `v`, found `{other}`")),
        None => return Err("empty line".into()),
    };

    let start = fields
        .next()
        .ok_or_else(|| "missing start `col,row`".to_string())
        .and_then(parse_point)?;

    let length = fields.next().ok_or_else(|| "missing length".to_string())?;
    let length: i32 = length
        .parse()
        .map_err(|_| format!("bad length `{length}`"))?;

    let style = match fields.next() {
        None => LineStyle::Single,
        Some(name) => LineStyle::from_name(name).ok_or_else(|| format!("unknown style `{name}`"))?,
    };

    if let Some(extra) = fields.next() {
        return Err(format!("unexpected `{extra}`"));
    }

    Ok(Segment::new(start, length, orientation, style))
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `col,row`, found `{s}`"))?;
    let x = x.trim().parse().map_err(|_| format!("bad column `{x}`"))?;
    let y = y.trim().parse().map_err(|_| format!("bad row `{y}`"))?;
    Ok(Point::new(x, y))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn line_of(err: CanvasError) -> usize {
        match err {
            CanvasError::Preset { line, .. } => line,
            other => panic!("expected preset error, got {other:?}"),
        }
    }

    #[test]
    fn parse_basic() {
        let segs = parse("h 2,2 6\nv 5,-1 4 heavy\n").unwrap();
        assert_eq!(
            segs,
            vec![
                Segment::horizontal(Point::new(2, 2), 6, LineStyle::Single),
                Segment::vertical(Point::new(5, -1), 4, LineStyle::Heavy),
            ]
        );
    }

    #[test]
    fn comments_and_blank_lines() {
        let text = "# title\n\n  h 0,0 3   # trailing\n\t\nv 0,0 -2 d\n";
        let segs = parse(text).unwrap();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1].style, LineStyle::Double);
        assert_eq!(segs[1].length, -2);
    }

    #[test]
    fn empty_preset() {
        assert_eq!(parse("").unwrap(), vec![]);
        assert_eq!(parse("# nothing\n\n").unwrap(), vec![]);
    }

    #[test]
    fn errors_carry_line_numbers() {
        assert_eq!(line_of(parse("h 0,0 1\nx 0,0 1").unwrap_err()), 2);
        assert_eq!(line_of(parse("\n\nh 0;0 1").unwrap_err()), 3);
        assert_eq!(line_of(parse("v 1,1").unwrap_err()), 1);
        assert_eq!(line_of(parse("v 1,1 two").unwrap_err()), 1);
        assert_eq!(line_of(parse("v 1,1 2 wavy").unwrap_err()), 1);
        assert_eq!(line_of(parse("v 1,1 2 single extra").unwrap_err()), 1);
    }

    #[test]
    fn error_reason_names_the_token() {
        let err = parse("h 0,0 1 wavy").unwrap_err();
        assert_eq!(err.to_string(), "preset line 1: unknown style `wavy`");
    }

    #[test]
    fn load_is_all_or_nothing() {
        let mut canvas = Canvas::new();
        assert!(load_into(&mut canvas, "h 0,0 1\nbogus").is_err());
        assert!(canvas.is_empty());

        let ids = load_into(&mut canvas, "h 0,0 1\nv 0,0 1").unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(canvas.len(), 2);
    }

    #[test]
    fn segment_display_parses_back() {
        let segs = vec![
            Segment::horizontal(Point::new(-3, 4), -2, LineStyle::Dashed),
            Segment::vertical(Point::new(0, 0), 0, LineStyle::None),
        ];
        let text: String = segs.iter().map(|s| format!("{s}\n")).collect();
        assert_eq!(parse(&text).unwrap(), segs);
    }
}
