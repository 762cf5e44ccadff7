//! Junction resolution — turning the strokes that meet in one cell into
//! exactly one box-drawing glyph.
//!
//! # Model
//!
//! Every cell has four **arms**: north, east, south, west. A stroke that
//! passes through a cell claims both arms on its axis; a stroke that ends
//! in a cell claims only the arm pointing back along the stroke. Each arm
//! carries the style of the strongest stroke claiming it:
//!
//! ```text
//!   Heavy > Double > Single > Dashed > None
//! ```
//!
//! `LineStyle::None` on an arm means "no arm". The four arms form the key
//! into [`JUNCTION_ENTRIES`], a table of every glyph we know how to draw:
//!
//! ```text
//!            north
//!              │
//!    west ─────┼───── east        [N, E, S, W] = [L, L, L, L]  →  ┼
//!              │                  [N, E, S, W] = [L, H, L, H]  →  ┿
//!            south                [N, E, S, W] = [O, D, D, O]  →  ╔
//! ```
//!
//! # Fallback
//!
//! Unicode covers every light/heavy mix, and single/double mixes only when
//! each axis is uniform. When the exact arms have no glyph, the cell is
//! drawn entirely in its strongest style. Dashed lines only have straight
//! glyphs, so any other dashed junction is drawn in Single.
//!
//! A combination that still has no glyph is a hole in the table. Debug
//! builds panic on it; release builds log at `error` and draw Single.
//!
//! # Caps
//!
//! A cell with a single arm is a segment end. It is drawn with the full
//! straight glyph of that axis (`─`, `┃`, `║`, `╎`, …) so a segment fills
//! every cell it covers. Zero-length segments have no arms at all and get
//! a dot from [`point_glyph`].

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::CanvasError;
use crate::geometry::Orientation;
use crate::segment::{CellRole, LineStyle};
use crate::store::Contribution;

// ---------------------------------------------------------------------------
// Arms
// ---------------------------------------------------------------------------

/// The four arms of one cell, each tagged with its winning style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arms {
    pub north: LineStyle,
    pub east: LineStyle,
    pub south: LineStyle,
    pub west: LineStyle,
}

impl Arms {
    /// No arms at all.
    pub const EMPTY: Self = Self {
        north: LineStyle::None,
        east: LineStyle::None,
        south: LineStyle::None,
        west: LineStyle::None,
    };

    /// Build from `[north, east, south, west]`.
    #[inline]
    #[must_use]
    pub const fn from_array([north, east, south, west]: [LineStyle; 4]) -> Self {
        Self {
            north,
            east,
            south,
            west,
        }
    }

    /// `[north, east, south, west]`.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [LineStyle; 4] {
        [self.north, self.east, self.south, self.west]
    }

    /// Arms of a single style for a 4-bit direction mask
    /// (`1` = north, `2` = east, `4` = south, `8` = west).
    #[must_use]
    pub const fn from_mask(mask: u8, style: LineStyle) -> Self {
        Self {
            north: arm_if(mask & 1 != 0, style),
            east: arm_if(mask & 2 != 0, style),
            south: arm_if(mask & 4 != 0, style),
            west: arm_if(mask & 8 != 0, style),
        }
    }

    /// The 4-bit direction mask of the present arms.
    #[must_use]
    pub const fn mask(self) -> u8 {
        let mut mask = 0;
        if self.north.is_visible() {
            mask |= 1;
        }
        if self.east.is_visible() {
            mask |= 2;
        }
        if self.south.is_visible() {
            mask |= 4;
        }
        if self.west.is_visible() {
            mask |= 8;
        }
        mask
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.mask() == 0
    }

    /// Number of present arms (0–4).
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.mask().count_ones()
    }

    /// The strongest style on any arm.
    #[must_use]
    pub const fn dominant(self) -> LineStyle {
        self.north.max(self.east).max(self.south.max(self.west))
    }

    /// Same arms, all redrawn in `style`.
    #[must_use]
    pub const fn restyled(self, style: LineStyle) -> Self {
        Self::from_mask(self.mask(), style)
    }

    /// Merge one stroke's claim on this cell.
    ///
    /// `role` says which way the stroke leaves the cell. Strokes with
    /// [`LineStyle::None`] are ignored entirely.
    pub const fn claim(&mut self, orientation: Orientation, style: LineStyle, role: CellRole) {
        if !style.is_visible() {
            return;
        }
        let (low, high) = match orientation {
            Orientation::Horizontal => (&mut self.west, &mut self.east),
            Orientation::Vertical => (&mut self.north, &mut self.south),
        };
        if role.extends_low() {
            *low = (*low).max(style);
        }
        if role.extends_high() {
            *high = (*high).max(style);
        }
    }
}

const fn arm_if(present: bool, style: LineStyle) -> LineStyle {
    if present { style } else { LineStyle::None }
}

// ---------------------------------------------------------------------------
// Junction accumulator
// ---------------------------------------------------------------------------

/// Everything known about one cell while strokes are being merged into it.
///
/// Separate from [`Arms`] because zero-length strokes claim no arm but
/// still need to be seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Junction {
    pub arms: Arms,
    /// Strongest style among zero-length strokes on this cell.
    pub point: LineStyle,
}

impl Junction {
    /// A cell nothing has touched.
    pub const EMPTY: Self = Self {
        arms: Arms::EMPTY,
        point: LineStyle::None,
    };

    /// Merge one stroke covering this cell.
    pub const fn add(&mut self, orientation: Orientation, style: LineStyle, role: CellRole) {
        if matches!(role, CellRole::Point) {
            self.point = self.point.max(style);
        } else {
            self.arms.claim(orientation, style, role);
        }
    }

    /// Collect a cell's contributions.
    pub fn collect<'a>(contributions: impl IntoIterator<Item = &'a Contribution>) -> Self {
        let mut junction = Self::EMPTY;
        for c in contributions {
            junction.add(c.orientation, c.style, c.role);
        }
        junction
    }

    /// The glyph for this cell, or `None` for an empty cell.
    ///
    /// Arms win over points: a dot dropped onto an existing line vanishes
    /// into the line.
    #[must_use]
    pub fn glyph(&self) -> Option<char> {
        if self.arms.is_empty() {
            point_glyph(self.point)
        } else {
            resolve_arms(self.arms)
        }
    }
}

/// Resolve a cell straight from its contributions.
///
/// ```
/// use lc_canvas::geometry::Point;
/// use lc_canvas::junction;
/// use lc_canvas::segment::{LineStyle, Segment};
/// use lc_canvas::store::Canvas;
///
/// let mut canvas = Canvas::new();
/// canvas.add(Segment::horizontal(Point::new(0, 1), 2, LineStyle::Single));
/// canvas.add(Segment::vertical(Point::new(1, 0), 2, LineStyle::Single));
///
/// let here = canvas.query_cells_at(Point::new(1, 1));
/// assert_eq!(junction::resolve(&here), Some('┼'));
/// ```
#[must_use]
pub fn resolve<'a>(contributions: impl IntoIterator<Item = &'a Contribution>) -> Option<char> {
    Junction::collect(contributions).glyph()
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Look up the glyph for a set of arms, applying the style fallbacks.
///
/// Returns `Ok(None)` for an armless cell.
///
/// # Errors
///
/// [`CanvasError::AmbiguousJunction`] if neither the exact arms nor any
/// fallback have an entry in the table.
pub fn lookup(arms: Arms) -> Result<Option<char>, CanvasError> {
    if arms.is_empty() {
        return Ok(None);
    }
    if let Some(&glyph) = JUNCTION_TABLE.get(&arms) {
        return Ok(Some(glyph));
    }

    let top = arms.dominant();
    if let Some(&glyph) = JUNCTION_TABLE.get(&arms.restyled(top)) {
        return Ok(Some(glyph));
    }

    if top == LineStyle::Dashed {
        if let Some(&glyph) = JUNCTION_TABLE.get(&arms.restyled(LineStyle::Single)) {
            return Ok(Some(glyph));
        }
    }

    Err(CanvasError::AmbiguousJunction { arms })
}

/// [`lookup`] with the table-hole policy applied.
fn resolve_arms(arms: Arms) -> Option<char> {
    match lookup(arms) {
        Ok(glyph) => glyph,
        Err(err) => {
            tracing::error!(%err, "junction table has no entry");
            if cfg!(debug_assertions) {
                panic!("{err}");
            }
            JUNCTION_TABLE.get(&arms.restyled(LineStyle::Single)).copied()
        }
    }
}

/// Dot glyph for a zero-length stroke of the given style.
#[must_use]
pub const fn point_glyph(style: LineStyle) -> Option<char> {
    match style {
        LineStyle::Single => Some('•'),
        LineStyle::Double => Some('◦'),
        LineStyle::Heavy => Some('●'),
        LineStyle::Dashed => Some('·'),
        LineStyle::None => None,
    }
}

// ---------------------------------------------------------------------------
// Glyph table
// ---------------------------------------------------------------------------

const O: LineStyle = LineStyle::None;
const L: LineStyle = LineStyle::Single;
const H: LineStyle = LineStyle::Heavy;
const D: LineStyle = LineStyle::Double;
const A: LineStyle = LineStyle::Dashed;

/// Every drawable arm combination as `(glyph, [north, east, south, west])`.
///
/// Several keys share a glyph (caps reuse the straight line), but no key
/// appears twice.
pub static JUNCTION_ENTRIES: &[(char, [LineStyle; 4])] = &[
    // ── Light / heavy: caps ──────────────────────────────────────────────
    ('│', [L, O, O, O]),
    ('│', [O, O, L, O]),
    ('─', [O, L, O, O]),
    ('─', [O, O, O, L]),
    ('┃', [H, O, O, O]),
    ('┃', [O, O, H, O]),
    ('━', [O, H, O, O]),
    ('━', [O, O, O, H]),
    // ── Light / heavy: straight ──────────────────────────────────────────
    ('─', [O, L, O, L]),
    ('━', [O, H, O, H]),
    ('│', [L, O, L, O]),
    ('┃', [H, O, H, O]),
    ('╼', [O, H, O, L]),
    ('╾', [O, L, O, H]),
    ('╽', [L, O, H, O]),
    ('╿', [H, O, L, O]),
    // ── Light / heavy: corners ───────────────────────────────────────────
    ('┌', [O, L, L, O]),
    ('┍', [O, H, L, O]),
    ('┎', [O, L, H, O]),
    ('┏', [O, H, H, O]),
    ('┐', [O, O, L, L]),
    ('┑', [O, O, L, H]),
    ('┒', [O, O, H, L]),
    ('┓', [O, O, H, H]),
    ('└', [L, L, O, O]),
    ('┕', [L, H, O, O]),
    ('┖', [H, L, O, O]),
    ('┗', [H, H, O, O]),
    ('┘', [L, O, O, L]),
    ('┙', [L, O, O, H]),
    ('┚', [H, O, O, L]),
    ('┛', [H, O, O, H]),
    // ── Light / heavy: tees ──────────────────────────────────────────────
    ('├', [L, L, L, O]),
    ('┝', [L, H, L, O]),
    ('┞', [H, L, L, O]),
    ('┟', [L, L, H, O]),
    ('┠', [H, L, H, O]),
    ('┡', [H, H, L, O]),
    ('┢', [L, H, H, O]),
    ('┣', [H, H, H, O]),
    ('┤', [L, O, L, L]),
    ('┥', [L, O, L, H]),
    ('┦', [H, O, L, L]),
    ('┧', [L, O, H, L]),
    ('┨', [H, O, H, L]),
    ('┩', [H, O, L, H]),
    ('┪', [L, O, H, H]),
    ('┫', [H, O, H, H]),
    ('┬', [O, L, L, L]),
    ('┭', [O, L, L, H]),
    ('┮', [O, H, L, L]),
    ('┯', [O, H, L, H]),
    ('┰', [O, L, H, L]),
    ('┱', [O, L, H, H]),
    ('┲', [O, H, H, L]),
    ('┳', [O, H, H, H]),
    ('┴', [L, L, O, L]),
    ('┵', [L, L, O, H]),
    ('┶', [L, H, O, L]),
    ('┷', [L, H, O, H]),
    ('┸', [H, L, O, L]),
    ('┹', [H, L, O, H]),
    ('┺', [H, H, O, L]),
    ('┻', [H, H, O, H]),
    // ── Light / heavy: crosses ───────────────────────────────────────────
    ('┼', [L, L, L, L]),
    ('┽', [L, L, L, H]),
    ('┾', [L, H, L, L]),
    ('┿', [L, H, L, H]),
    ('╀', [H, L, L, L]),
    ('╁', [L, L, H, L]),
    ('╂', [H, L, H, L]),
    ('╃', [H, L, L, H]),
    ('╄', [H, H, L, L]),
    ('╅', [L, L, H, H]),
    ('╆', [L, H, H, L]),
    ('╇', [H, H, L, H]),
    ('╈', [L, H, H, H]),
    ('╉', [H, L, H, H]),
    ('╊', [H, H, H, L]),
    ('╋', [H, H, H, H]),
    // ── Double: caps and straight ────────────────────────────────────────
    ('║', [D, O, O, O]),
    ('║', [O, O, D, O]),
    ('═', [O, D, O, O]),
    ('═', [O, O, O, D]),
    ('═', [O, D, O, D]),
    ('║', [D, O, D, O]),
    // ── Single / double: corners ─────────────────────────────────────────
    ('╒', [O, D, L, O]),
    ('╓', [O, L, D, O]),
    ('╔', [O, D, D, O]),
    ('╕', [O, O, L, D]),
    ('╖', [O, O, D, L]),
    ('╗', [O, O, D, D]),
    ('╘', [L, D, O, O]),
    ('╙', [D, L, O, O]),
    ('╚', [D, D, O, O]),
    ('╛', [L, O, O, D]),
    ('╜', [D, O, O, L]),
    ('╝', [D, O, O, D]),
    // ── Single / double: tees and crosses ────────────────────────────────
    ('╞', [L, D, L, O]),
    ('╟', [D, L, D, O]),
    ('╠', [D, D, D, O]),
    ('╡', [L, O, L, D]),
    ('╢', [D, O, D, L]),
    ('╣', [D, O, D, D]),
    ('╤', [O, D, L, D]),
    ('╥', [O, L, D, L]),
    ('╦', [O, D, D, D]),
    ('╧', [L, D, O, D]),
    ('╨', [D, L, O, L]),
    ('╩', [D, D, O, D]),
    ('╪', [L, D, L, D]),
    ('╫', [D, L, D, L]),
    ('╬', [D, D, D, D]),
    // ── Dashed: caps and straight only ───────────────────────────────────
    ('╎', [A, O, O, O]),
    ('╎', [O, O, A, O]),
    ('╎', [A, O, A, O]),
    ('╌', [O, A, O, O]),
    ('╌', [O, O, O, A]),
    ('╌', [O, A, O, A]),
];

/// Reverse index over [`JUNCTION_ENTRIES`], built on first use.
static JUNCTION_TABLE: LazyLock<HashMap<Arms, char>> = LazyLock::new(|| {
    JUNCTION_ENTRIES
        .iter()
        .map(|&(glyph, arms)| (Arms::from_array(arms), glyph))
        .collect()
});

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Glyphs by direction mask (bit 1 = N, 2 = E, 4 = S, 8 = W).
    const SINGLE_BY_MASK: &str = " │─└││┌├─┘─┴┐┤┬┼";
    const HEAVY_BY_MASK: &str = " ┃━┗┃┃┏┣━┛━┻┓┫┳╋";
    const DOUBLE_BY_MASK: &str = " ║═╚║║╔╠═╝═╩╗╣╦╬";
    const DASHED_BY_MASK: &str = " ╎╌└╎╎┌├╌┘╌┴┐┤┬┼";

    fn nth(table: &str, mask: u8) -> Option<char> {
        table.chars().nth(usize::from(mask)).filter(|&c| c != ' ')
    }

    fn glyph(arms: [LineStyle; 4]) -> Option<char> {
        Junction {
            arms: Arms::from_array(arms),
            point: LineStyle::None,
        }
        .glyph()
    }

    // ── Table integrity ──────────────────────────────────────────────────

    #[test]
    fn table_keys_are_unique() {
        assert_eq!(JUNCTION_TABLE.len(), JUNCTION_ENTRIES.len());
    }

    #[test]
    fn table_glyphs_are_box_drawing() {
        for &(g, arms) in JUNCTION_ENTRIES {
            assert!(
                ('\u{2500}'..='\u{257F}').contains(&g),
                "{g:?} for {arms:?} is outside the box-drawing block"
            );
        }
    }

    #[test]
    fn table_has_no_armless_key() {
        for &(g, arms) in JUNCTION_ENTRIES {
            assert!(!Arms::from_array(arms).is_empty(), "{g:?}");
        }
    }

    #[test]
    fn light_heavy_mixes_are_complete() {
        // 3 states per arm, minus the empty cell.
        let mut n = 0;
        for code in 1..81u32 {
            let mut c = code;
            let mut arms = [O; 4];
            for arm in &mut arms {
                *arm = [O, L, H][(c % 3) as usize];
                c /= 3;
            }
            assert!(
                JUNCTION_TABLE.contains_key(&Arms::from_array(arms)),
                "missing {arms:?}"
            );
            n += 1;
        }
        assert_eq!(n, 80);
    }

    // ── Pure styles ──────────────────────────────────────────────────────

    #[test]
    fn pure_single_by_mask() {
        for mask in 0..16 {
            assert_eq!(
                lookup(Arms::from_mask(mask, L)).unwrap(),
                nth(SINGLE_BY_MASK, mask),
                "mask {mask:04b}"
            );
        }
    }

    #[test]
    fn pure_heavy_by_mask() {
        for mask in 0..16 {
            assert_eq!(
                lookup(Arms::from_mask(mask, H)).unwrap(),
                nth(HEAVY_BY_MASK, mask),
                "mask {mask:04b}"
            );
        }
    }

    #[test]
    fn pure_double_by_mask() {
        for mask in 0..16 {
            assert_eq!(
                lookup(Arms::from_mask(mask, D)).unwrap(),
                nth(DOUBLE_BY_MASK, mask),
                "mask {mask:04b}"
            );
        }
    }

    #[test]
    fn dashed_junctions_fall_back_to_single() {
        for mask in 0..16 {
            assert_eq!(
                lookup(Arms::from_mask(mask, A)).unwrap(),
                nth(DASHED_BY_MASK, mask),
                "mask {mask:04b}"
            );
        }
    }

    // ── Totality ─────────────────────────────────────────────────────────

    #[test]
    fn every_arm_assignment_resolves() {
        // 5 states per arm (four styles + absent): 625 combinations, covering
        // all 16 direction sets under every style assignment.
        for code in 0..625u32 {
            let mut c = code;
            let mut arms = [O; 4];
            for arm in &mut arms {
                *arm = LineStyle::ALL[(c % 5) as usize];
                c /= 5;
            }
            let arms = Arms::from_array(arms);
            let got = lookup(arms);
            assert!(got.is_ok(), "{arms:?} has no glyph");
            assert_eq!(got.unwrap().is_some(), !arms.is_empty(), "{arms:?}");
        }
    }

    // ── Mixed styles ─────────────────────────────────────────────────────

    #[test]
    fn heavy_horizontal_over_single_vertical() {
        assert_eq!(glyph([L, H, L, H]), Some('┿'));
        assert_eq!(glyph([H, L, H, L]), Some('╂'));
    }

    #[test]
    fn heavy_stem_on_light_bar() {
        // "heavy down and light horizontal"
        assert_eq!(glyph([O, L, H, L]), Some('┰'));
    }

    #[test]
    fn light_line_meeting_heavy_line_end_to_end() {
        assert_eq!(glyph([O, H, O, L]), Some('╼'));
        assert_eq!(glyph([H, O, L, O]), Some('╿'));
    }

    #[test]
    fn single_double_mixes() {
        assert_eq!(glyph([L, D, L, D]), Some('╪'));
        assert_eq!(glyph([D, L, O, L]), Some('╨'));
        assert_eq!(glyph([O, D, L, O]), Some('╒'));
    }

    #[test]
    fn unmatched_mix_uses_strongest_pure_glyph() {
        // Double vertical ending on a heavy horizontal: no such glyph.
        assert_eq!(glyph([D, H, O, H]), Some('┻'));
        // Double/single disagreeing along one axis.
        assert_eq!(glyph([D, L, L, O]), Some('╠'));
        // Straight double meeting single end to end.
        assert_eq!(glyph([O, D, O, L]), Some('═'));
        // Dashed under a single line.
        assert_eq!(glyph([O, L, O, A]), Some('─'));
        assert_eq!(glyph([A, L, A, L]), Some('┼'));
    }

    // ── Claims ───────────────────────────────────────────────────────────

    #[test]
    fn claim_through_and_ends() {
        let mut arms = Arms::EMPTY;
        arms.claim(Orientation::Horizontal, L, CellRole::Interior);
        assert_eq!(arms.to_array(), [O, L, O, L]);

        let mut arms = Arms::EMPTY;
        arms.claim(Orientation::Horizontal, L, CellRole::LowEnd);
        assert_eq!(arms.to_array(), [O, L, O, O]);

        let mut arms = Arms::EMPTY;
        arms.claim(Orientation::Vertical, H, CellRole::HighEnd);
        assert_eq!(arms.to_array(), [H, O, O, O]);

        let mut arms = Arms::EMPTY;
        arms.claim(Orientation::Vertical, H, CellRole::Point);
        assert!(arms.is_empty());
    }

    #[test]
    fn claim_keeps_strongest_per_arm() {
        let mut a = Arms::EMPTY;
        a.claim(Orientation::Horizontal, H, CellRole::Interior);
        a.claim(Orientation::Horizontal, L, CellRole::Interior);

        let mut b = Arms::EMPTY;
        b.claim(Orientation::Horizontal, L, CellRole::Interior);
        b.claim(Orientation::Horizontal, H, CellRole::Interior);

        assert_eq!(a, b);
        assert_eq!(a.to_array(), [O, H, O, H]);
    }

    #[test]
    fn claim_ignores_invisible_strokes() {
        let mut arms = Arms::EMPTY;
        arms.claim(Orientation::Vertical, LineStyle::None, CellRole::Interior);
        assert!(arms.is_empty());
    }

    #[test]
    fn mask_round_trip() {
        for mask in 0..16 {
            assert_eq!(Arms::from_mask(mask, D).mask(), mask);
        }
        assert_eq!(Arms::from_mask(0b1111, L).count(), 4);
    }

    #[test]
    fn dominant_arm() {
        assert_eq!(Arms::from_array([A, L, O, D]).dominant(), D);
        assert_eq!(Arms::EMPTY.dominant(), O);
    }

    // ── Points ───────────────────────────────────────────────────────────

    #[test]
    fn lone_point_draws_a_dot() {
        let mut j = Junction::EMPTY;
        j.add(Orientation::Horizontal, H, CellRole::Point);
        assert_eq!(j.glyph(), Some('●'));
    }

    #[test]
    fn strongest_point_wins() {
        let mut j = Junction::EMPTY;
        j.add(Orientation::Vertical, A, CellRole::Point);
        j.add(Orientation::Horizontal, D, CellRole::Point);
        assert_eq!(j.glyph(), Some('◦'));
    }

    #[test]
    fn point_on_a_line_is_absorbed() {
        let mut j = Junction::EMPTY;
        j.add(Orientation::Horizontal, H, CellRole::Point);
        j.add(Orientation::Vertical, L, CellRole::Interior);
        assert_eq!(j.glyph(), Some('│'));
    }

    #[test]
    fn invisible_point_draws_nothing() {
        let mut j = Junction::EMPTY;
        j.add(Orientation::Horizontal, LineStyle::None, CellRole::Point);
        assert_eq!(j.glyph(), None);
        assert_eq!(Junction::EMPTY.glyph(), None);
    }
}
