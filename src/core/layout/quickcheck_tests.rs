//! Quickcheck based tests to ensure that layouts behave well for arbitrary inputs.
//!
//! Positions are checked after growing each client by its border: that is the area a client
//! actually covers on screen.
use super::*;
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

impl Arbitrary for Rect {
    fn arbitrary(g: &mut Gen) -> Self {
        // - ensuring that the dimensions of a screen being laid out aren't completely massive
        // - width and height are at least 100px
        Rect::new(
            u8::arbitrary(g) as i32,
            u8::arbitrary(g) as i32,
            (u8::arbitrary(g) as i32) + 100,
            (u8::arbitrary(g) as i32) + 100,
        )
    }
}

#[derive(Debug, Clone)]
struct Input {
    n: usize,
    params: LayoutParams,
}

impl Input {
    fn arbitrary_with_gaps(g: &mut Gen, max_gap: u8) -> Self {
        let gap = if max_gap == 0 {
            0
        } else {
            (u8::arbitrary(g) % (max_gap + 1)) as i32
        };

        Self {
            n: (usize::arbitrary(g) % 6) + 1,
            params: LayoutParams {
                nmaster: usize::arbitrary(g) % 4,
                mfact: ((u8::arbitrary(g) % 9) + 1) as f32 / 10.0,
                gaps: Gaps::uniform(gap),
                gaps_enabled: max_gap > 0,
                smart_gaps: bool::arbitrary(g),
                border_px: (u8::arbitrary(g) % 3) as i32,
            },
        }
    }
}

// Gaps disabled
#[derive(Debug, Clone)]
struct NoGaps(Input);

impl Arbitrary for NoGaps {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(Input::arbitrary_with_gaps(g, 0))
    }
}

#[derive(Debug, Clone)]
struct WithGaps(Input);

impl Arbitrary for WithGaps {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(Input::arbitrary_with_gaps(g, 4))
    }
}

fn covered(a: &Arrangement) -> Vec<Rect> {
    a.positions.iter().map(|r| r.expanded_by(a.border)).collect()
}

fn no_overlaps(rs: &[Rect]) -> bool {
    rs.iter()
        .enumerate()
        .all(|(i, a)| rs[i + 1..].iter().all(|b| !a.overlaps(b)))
}

fn exactly_tiles(area: Rect, rs: &[Rect]) -> bool {
    let total: i64 = rs.iter().map(|r| r.area()).sum();

    no_overlaps(rs) && rs.iter().all(|r| area.contains(r)) && total == area.area()
}

#[quickcheck]
fn tile_exactly_covers_the_area_without_gaps(r: Rect, input: NoGaps) -> bool {
    let Input { n, params } = input.0;
    let a = tile(n, r, &params);

    a.positions.len() == n && exactly_tiles(r, &covered(&a))
}

#[quickcheck]
fn centered_master_exactly_covers_the_area(r: Rect, input: NoGaps) -> bool {
    let Input { n, params } = input.0;
    let a = centered_master(n, r, &params);

    a.positions.len() == n && exactly_tiles(r, &covered(&a))
}

#[quickcheck]
fn tile_with_gaps_stays_inside_the_outer_gap_without_overlapping(r: Rect, input: WithGaps) -> bool {
    let Input { n, params } = input.0;
    let a = tile(n, r, &params);
    let rs = covered(&a);

    let g = if params.smart_gaps && n == 1 {
        Gaps::default()
    } else {
        params.gaps
    };
    let inner = Rect::new(
        r.x + g.outer_v,
        r.y + g.outer_h,
        r.w - 2 * g.outer_v,
        r.h - 2 * g.outer_h,
    );

    no_overlaps(&rs) && rs.iter().all(|c| inner.contains(c))
}

#[quickcheck]
fn layouts_return_nothing_for_no_clients(r: Rect, input: WithGaps) -> bool {
    let params = input.0.params;

    tile(0, r, &params).positions.is_empty()
        && centered_master(0, r, &params).positions.is_empty()
}
