//! Layouts for positioning the tiled clients of a monitor.
//!
//! Layouts are pure: given the number of tiled clients, the usable area of the monitor and
//! the monitor's master area settings they return a position for each client in list order.
//! The positions are client geometries, so the border is drawn outside of each [Rect].
use crate::pure::geometry::Rect;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::cmp::min;

#[cfg(test)]
mod quickcheck_tests;

/// The arrangement algorithms available to a [Layout]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arrange {
    /// Master clients stacked on the left, everything else stacked on the right
    Tile,
    /// Master clients in a centered column with the rest alternating between two side columns
    CenteredMaster,
}

impl Arrange {
    /// Compute positions for `n` tiled clients within `area`.
    pub fn apply(&self, n: usize, area: Rect, params: &LayoutParams) -> Arrangement {
        match self {
            Arrange::Tile => tile(n, area, params),
            Arrange::CenteredMaster => centered_master(n, area, params),
        }
    }
}

/// A display symbol paired with an arrangement. Layouts without an arrangement leave
/// every client where it is: the floating layout.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layout {
    /// The symbol shown in the bar while this layout is active
    pub symbol: String,
    /// How tiled clients are positioned, if at all
    pub arrange: Option<Arrange>,
}

impl Layout {
    /// Create a new layout
    pub fn new(symbol: impl Into<String>, arrange: Option<Arrange>) -> Self {
        Self {
            symbol: symbol.into(),
            arrange,
        }
    }
}

/// The gaps between clients and around the edge of a monitor
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gaps {
    /// Outer gap at the top and bottom of the monitor
    pub outer_h: i32,
    /// Outer gap at the left and right of the monitor
    pub outer_v: i32,
    /// Gap between vertically adjacent clients
    pub inner_h: i32,
    /// Gap between horizontally adjacent clients
    pub inner_v: i32,
}

impl Gaps {
    /// The same gap everywhere
    pub const fn uniform(px: i32) -> Self {
        Self {
            outer_h: px,
            outer_v: px,
            inner_h: px,
            inner_v: px,
        }
    }

    /// Whether any gap is non-zero
    pub fn any(&self) -> bool {
        self.outer_h != 0 || self.outer_v != 0 || self.inner_h != 0 || self.inner_v != 0
    }

    /// Add `delta` to every gap, clamping each at zero
    pub fn grown_by(&self, delta: i32) -> Self {
        Self {
            outer_h: self.outer_h.saturating_add(delta),
            outer_v: self.outer_v.saturating_add(delta),
            inner_h: self.inner_h.saturating_add(delta),
            inner_v: self.inner_v.saturating_add(delta),
        }
        .clamped()
    }

    /// Cap gaps at the size of the area they are applied to: vertical spacing by its height and
    /// horizontal spacing by its width.
    pub fn within(&self, area: Rect) -> Self {
        let (w, h) = (area.w.max(0), area.h.max(0));

        Self {
            outer_h: self.outer_h.min(h),
            outer_v: self.outer_v.min(w),
            inner_h: self.inner_h.min(h),
            inner_v: self.inner_v.min(w),
        }
    }

    /// Clamp negative gaps to zero
    pub fn clamped(&self) -> Self {
        Self {
            outer_h: self.outer_h.max(0),
            outer_v: self.outer_v.max(0),
            inner_h: self.inner_h.max(0),
            inner_v: self.inner_v.max(0),
        }
    }
}

/// The monitor settings that a layout depends on
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Number of clients in the master area
    pub nmaster: usize,
    /// Fraction of the width given to the master area
    pub mfact: f32,
    /// Gap sizes for the monitor
    pub gaps: Gaps,
    /// Whether gaps are currently enabled
    pub gaps_enabled: bool,
    /// Drop the outer gaps when there is a single client
    pub smart_gaps: bool,
    /// Configured border width
    pub border_px: i32,
}

impl LayoutParams {
    // A lone client with no gaps around it gets no border
    fn border_for(&self, n: usize) -> i32 {
        if n == 1 && !(self.gaps_enabled && self.gaps.any()) {
            0
        } else {
            self.border_px
        }
    }
}

/// The output of running a layout
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    /// The border width to apply to every positioned client
    pub border: i32,
    /// Client geometry, in the order that the clients were provided
    pub positions: Vec<Rect>,
}

/// Master clients stacked top to bottom on the left, the remaining clients stacked top to bottom
/// on the right.
pub fn tile(n: usize, area: Rect, p: &LayoutParams) -> Arrangement {
    if n == 0 {
        return Arrangement {
            border: p.border_px,
            positions: vec![],
        };
    }

    let bw = p.border_for(n);
    let ie = p.gaps_enabled as i32;
    let oe = if p.smart_gaps && n == 1 { 0 } else { ie };
    let Gaps {
        outer_h: oh,
        outer_v: ov,
        inner_h: ih,
        inner_v: iv,
    } = p.gaps;

    let mw = if n > p.nmaster {
        if p.nmaster > 0 {
            ((area.w + iv * ie) as f32 * p.mfact) as i32
        } else {
            0
        }
    } else {
        area.w - 2 * ov * oe + iv * ie
    };

    let mut positions = Vec::with_capacity(n);
    let (mut my, mut ty) = (oh * oe, oh * oe);

    for i in 0..n {
        if i < p.nmaster {
            let r = (min(n, p.nmaster) - i) as i32;
            let h = (area.h - my - oh * oe - ih * ie * (r - 1)) / r;
            positions.push(Rect::new(
                area.x + ov * oe,
                area.y + my,
                mw - 2 * bw - iv * ie,
                h - 2 * bw,
            ));
            if my + h + ih * ie < area.h {
                my += h + ih * ie;
            }
        } else {
            let r = (n - i) as i32;
            let h = (area.h - ty - oh * oe - ih * ie * (r - 1)) / r;
            positions.push(Rect::new(
                area.x + mw + ov * oe,
                area.y + ty,
                area.w - mw - 2 * bw - 2 * ov * oe,
                h - 2 * bw,
            ));
            if ty + h + ih * ie < area.h {
                ty += h + ih * ie;
            }
        }
    }

    Arrangement {
        border: bw,
        positions,
    }
}

/// Master clients in a centered column sized by the master fraction. Stack clients alternate
/// between a right and a left column, starting on the right. Gaps are not applied.
pub fn centered_master(n: usize, area: Rect, p: &LayoutParams) -> Arrangement {
    if n == 0 {
        return Arrangement {
            border: p.border_px,
            positions: vec![],
        };
    }

    let bw = p.border_for(n);
    let (mut mw, mut mx, mut tw) = (area.w, 0, area.w);

    if n > p.nmaster {
        mw = if p.nmaster > 0 {
            (area.w as f32 * p.mfact) as i32
        } else {
            0
        };
        tw = area.w - mw;

        if n - p.nmaster > 1 {
            mx = (area.w - mw) / 2;
            tw = (area.w - mw) / 2;
        }
    }

    let mut positions = Vec::with_capacity(n);
    let (mut my, mut oty, mut ety) = (0, 0, 0);

    for i in 0..n {
        if i < p.nmaster {
            let h = (area.h - my) / (min(n, p.nmaster) - i) as i32;
            positions.push(Rect::new(area.x + mx, area.y + my, mw - 2 * bw, h - 2 * bw));
            my += h;
        } else if (i - p.nmaster) % 2 == 1 {
            let h = (area.h - ety) / ((1 + n - i) / 2) as i32;
            positions.push(Rect::new(area.x, area.y + ety, tw - 2 * bw, h - 2 * bw));
            ety += h;
        } else {
            // the right hand column picks up any odd pixel left over when centering
            let h = (area.h - oty) / ((1 + n - i) / 2) as i32;
            let w = area.w - mx - mw;
            positions.push(Rect::new(area.x + mx + mw, area.y + oty, w - 2 * bw, h - 2 * bw));
            oty += h;
        }
    }

    Arrangement {
        border: bw,
        positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn params(nmaster: usize, gaps: i32) -> LayoutParams {
        LayoutParams {
            nmaster,
            mfact: 0.5,
            gaps: Gaps::uniform(gaps),
            gaps_enabled: gaps > 0,
            smart_gaps: false,
            border_px: 1,
        }
    }

    const AREA: Rect = Rect::new(0, 20, 1000, 800);

    #[test]
    fn tile_single_client_without_gaps_has_no_border() {
        let a = tile(1, AREA, &params(1, 0));

        assert_eq!(a.border, 0);
        assert_eq!(a.positions, vec![AREA]);
    }

    #[test]
    fn tile_with_gaps_insets_every_edge() {
        let a = tile(1, AREA, &params(1, 10));

        assert_eq!(a.border, 1);
        assert_eq!(a.positions, vec![Rect::new(10, 30, 978, 778)]);
    }

    #[test]
    fn tile_smart_gaps_drop_outer_gaps_for_a_single_client() {
        let mut p = params(1, 10);
        p.smart_gaps = true;
        let a = tile(1, AREA, &p);

        assert_eq!(a.positions, vec![Rect::new(0, 20, 998, 798)]);
    }

    #[test]
    fn tile_master_and_stack() {
        let a = tile(3, AREA, &params(1, 0));

        assert_eq!(
            a.positions,
            vec![
                Rect::new(0, 20, 498, 798),
                Rect::new(500, 20, 498, 398),
                Rect::new(500, 420, 498, 398),
            ]
        );
    }

    #[test]
    fn tile_without_masters_uses_the_full_width_for_the_stack() {
        let a = tile(2, AREA, &params(0, 0));

        assert!(a.positions.iter().all(|r| r.x == 0 && r.w == 998));
    }

    #[test_case(1, vec![Rect::new(0, 20, 1000, 800)]; "single client fills the area")]
    #[test_case(2, vec![Rect::new(0, 20, 498, 798), Rect::new(500, 20, 498, 798)]; "one stack client on the right")]
    #[test_case(3, vec![
        Rect::new(250, 20, 498, 798),
        Rect::new(750, 20, 248, 798),
        Rect::new(0, 20, 248, 798),
    ]; "stack alternates right then left")]
    #[test]
    fn centered_master_positions(n: usize, expected: Vec<Rect>) {
        let a = centered_master(n, AREA, &params(1, 0));

        assert_eq!(a.positions, expected);
    }

    #[test]
    fn centered_master_right_column_takes_the_odd_pixel() {
        let area = Rect::new(0, 0, 1001, 800);
        let a = centered_master(3, area, &params(1, 0));
        let right = a.positions[1];

        assert_eq!(right.x + right.w + 2, area.right());
    }

    #[test_case(Gaps::uniform(2), -5, Gaps::uniform(0); "below zero clamps")]
    #[test_case(Gaps::uniform(10), i32::MAX, Gaps::uniform(i32::MAX); "saturates")]
    #[test_case(Gaps::uniform(10), i32::MIN, Gaps::uniform(0); "saturates below zero")]
    #[test]
    fn gaps_grown_by(g: Gaps, delta: i32, expected: Gaps) {
        assert_eq!(g.grown_by(delta), expected);
    }

    #[test]
    fn gaps_within_an_area_are_capped_per_axis() {
        let g = Gaps::uniform(i32::MAX).within(Rect::new(0, 0, 800, 600));

        assert_eq!(g.outer_h, 600);
        assert_eq!(g.inner_h, 600);
        assert_eq!(g.outer_v, 800);
        assert_eq!(g.inner_v, 800);
    }

    #[test]
    fn tile_survives_huge_gaps() {
        let mut p = params(1, 1);
        p.gaps = Gaps::uniform(i32::MAX).within(AREA);

        let a = tile(4, AREA, &p);

        assert_eq!(a.positions.len(), 4);
    }
}
