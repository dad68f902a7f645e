//! Metadata around X clients and manipulating them
use crate::{
    pure::geometry::Rect,
    x::property::{WmNormalHints, WmNormalHintsFlags},
    Xid,
};
use std::cmp::{max, min};

/// The "never set" window title
pub(crate) const BROKEN: &str = "broken";

/// Size constraints requested by a client through WM_NORMAL_HINTS, with unset values as zero.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SizeHints {
    pub(crate) base_w: i32,
    pub(crate) base_h: i32,
    pub(crate) inc_w: i32,
    pub(crate) inc_h: i32,
    pub(crate) max_w: i32,
    pub(crate) max_h: i32,
    pub(crate) min_w: i32,
    pub(crate) min_h: i32,
    pub(crate) min_aspect: f32,
    pub(crate) max_aspect: f32,
}

impl SizeHints {
    /// Derive size constraints from the raw property value.
    ///
    /// A missing base size falls back to the minimum size and vice versa.
    pub fn from_normal_hints(hints: Option<&WmNormalHints>) -> Self {
        let hints = match hints {
            Some(h) => h,
            None => return Self::default(),
        };
        let has = |flag| hints.flags.contains(flag);

        let (base_w, base_h) = if has(WmNormalHintsFlags::P_BASE_SIZE) {
            hints.base
        } else if has(WmNormalHintsFlags::P_MIN_SIZE) {
            hints.min
        } else {
            (0, 0)
        };

        let (inc_w, inc_h) = if has(WmNormalHintsFlags::P_RESIZE_INC) {
            hints.inc
        } else {
            (0, 0)
        };

        let (max_w, max_h) = if has(WmNormalHintsFlags::P_MAX_SIZE) {
            hints.max
        } else {
            (0, 0)
        };

        let (min_w, min_h) = if has(WmNormalHintsFlags::P_MIN_SIZE) {
            hints.min
        } else if has(WmNormalHintsFlags::P_BASE_SIZE) {
            hints.base
        } else {
            (0, 0)
        };

        let ratio = |num: i32, den: i32| if den == 0 { 0.0 } else { num as f32 / den as f32 };
        let (min_aspect, max_aspect) = if has(WmNormalHintsFlags::P_ASPECT) {
            (
                ratio(hints.min_aspect.1, hints.min_aspect.0),
                ratio(hints.max_aspect.0, hints.max_aspect.1),
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            base_w,
            base_h,
            inc_w,
            inc_h,
            max_w,
            max_h,
            min_w,
            min_h,
            min_aspect,
            max_aspect,
        }
    }

    /// A client whose minimum and maximum sizes are equal can not be resized
    pub fn is_fixed(&self) -> bool {
        self.max_w != 0 && self.max_h != 0 && self.max_w == self.min_w && self.max_h == self.min_h
    }

    /// Snap a width and height to the aspect ratio bounds, resize increments and min/max sizes.
    ///
    /// Follows ICCCM 4.1.2.3: the base size is removed before checking the aspect ratio unless
    /// it is the same as the minimum size.
    pub fn constrain(&self, mut w: i32, mut h: i32) -> (i32, i32) {
        let base_is_min = self.base_w == self.min_w && self.base_h == self.min_h;

        if !base_is_min {
            w -= self.base_w;
            h -= self.base_h;
        }

        if self.min_aspect > 0.0 && self.max_aspect > 0.0 && w > 0 && h > 0 {
            if self.max_aspect < w as f32 / h as f32 {
                w = (h as f32 * self.max_aspect + 0.5) as i32;
            } else if self.min_aspect < h as f32 / w as f32 {
                h = (w as f32 * self.min_aspect + 0.5) as i32;
            }
        }

        if base_is_min {
            w -= self.base_w;
            h -= self.base_h;
        }

        if self.inc_w > 0 {
            w -= w % self.inc_w;
        }
        if self.inc_h > 0 {
            h -= h % self.inc_h;
        }

        w = max(w + self.base_w, self.min_w);
        h = max(h + self.base_h, self.min_h);

        if self.max_w > 0 {
            w = min(w, self.max_w);
        }
        if self.max_h > 0 {
            h = min(h, self.max_h);
        }

        (w, h)
    }
}

/// The environment a requested client geometry is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Bounds {
    /// The geometry comes from a mouse drag
    pub(crate) interactive: bool,
    /// The full size of the root window
    pub(crate) screen: Rect,
    /// The usable area of the client's monitor
    pub(crate) work: Rect,
    /// Clients are never made smaller than the bar is high
    pub(crate) bar_height: i32,
    /// Whether size hints should be honoured for this client
    pub(crate) honour_hints: bool,
}

/// Meta-data around a client window that we are handling.
///
/// Primarily state flags and information used when determining which clients
/// to show for a given monitor and how they are tiled.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub(crate) win: Xid,
    pub(crate) name: String,
    pub(crate) r: Rect,
    pub(crate) old: Rect,
    pub(crate) bw: i32,
    pub(crate) old_bw: i32,
    pub(crate) hints: SizeHints,
    pub(crate) tags: u32,
    pub(crate) mon: usize,
    pub(crate) pid: Option<u32>,
    pub(crate) is_fixed: bool,
    pub(crate) is_floating: bool,
    pub(crate) is_urgent: bool,
    pub(crate) never_focus: bool,
    pub(crate) old_state: bool,
    pub(crate) is_fullscreen: bool,
    pub(crate) is_sticky: bool,
    pub(crate) is_terminal: bool,
    pub(crate) no_swallow: bool,
    pub(crate) swallowing: Option<Box<Client>>,
}

impl Client {
    /// Track a new client window on a specific monitor
    pub(crate) fn new(win: Xid, r: Rect, old_bw: i32, mon: usize) -> Self {
        Self {
            win,
            name: String::new(),
            r,
            old: r,
            bw: old_bw,
            old_bw,
            hints: SizeHints::default(),
            tags: 0,
            mon,
            pid: None,
            is_fixed: false,
            is_floating: false,
            is_urgent: false,
            never_focus: false,
            old_state: false,
            is_fullscreen: false,
            is_sticky: false,
            is_terminal: false,
            no_swallow: false,
            swallowing: None,
        }
    }

    /// The X window ID of this client
    pub fn id(&self) -> Xid {
        self.win
    }

    /// The current title of this client
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current geometry of this client, excluding its border
    pub fn geometry(&self) -> Rect {
        self.r
    }

    /// The current border width of this client
    pub fn border(&self) -> i32 {
        self.bw
    }

    /// The tag mask of this client
    pub fn tags(&self) -> u32 {
        self.tags
    }

    /// The index of the monitor this client is on
    pub fn monitor(&self) -> usize {
        self.mon
    }

    /// Whether this client is floating
    pub fn is_floating(&self) -> bool {
        self.is_floating
    }

    /// Whether this client is fullscreen
    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    /// Whether this client is shown on every tag
    pub fn is_sticky(&self) -> bool {
        self.is_sticky
    }

    /// Whether this client has set its urgency hint
    pub fn is_urgent(&self) -> bool {
        self.is_urgent
    }

    /// The window currently hidden behind this client, if it is swallowing one
    pub fn swallowed(&self) -> Option<Xid> {
        self.swallowing.as_ref().map(|c| c.win)
    }

    /// Width including the border
    pub(crate) fn outer_width(&self) -> i32 {
        self.r.w + 2 * self.bw
    }

    /// Height including the border
    pub(crate) fn outer_height(&self) -> i32 {
        self.r.h + 2 * self.bw
    }

    /// Adjust a requested geometry so that the client stays reachable and its size hints are
    /// respected. Returns `None` if the result is identical to the current geometry.
    pub(crate) fn apply_size_hints(&self, r: Rect, bw: i32, b: &Bounds) -> Option<Rect> {
        let Rect {
            mut x,
            mut y,
            mut w,
            mut h,
        } = r;

        w = max(1, w);
        h = max(1, h);

        if b.interactive {
            if x > b.screen.w {
                x = b.screen.w - self.outer_width();
            }
            if y > b.screen.h {
                y = b.screen.h - self.outer_height();
            }
            if x + w + 2 * bw < 0 {
                x = 0;
            }
            if y + h + 2 * bw < 0 {
                y = 0;
            }
        } else {
            let work = b.work;
            if x >= work.right() {
                x = work.right() - self.outer_width();
            }
            if y >= work.bottom() {
                y = work.bottom() - self.outer_height();
            }
            if x + w + 2 * bw <= work.x {
                x = work.x;
            }
            if y + h + 2 * bw <= work.y {
                y = work.y;
            }
        }

        h = max(h, b.bar_height);
        w = max(w, b.bar_height);

        if b.honour_hints {
            (w, h) = self.hints.constrain(w, h);
        }

        let res = Rect::new(x, y, w, h);
        if res != self.r || bw != self.bw {
            Some(res)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn bounds(interactive: bool, honour_hints: bool) -> Bounds {
        Bounds {
            interactive,
            screen: Rect::new(0, 0, 1920, 1080),
            work: Rect::new(0, 20, 1920, 1060),
            bar_height: 20,
            honour_hints,
        }
    }

    fn client() -> Client {
        Client::new(Xid(1), Rect::new(100, 100, 400, 300), 1, 0)
    }

    #[test]
    fn unchanged_geometry_is_reported_as_none() {
        let c = client();

        assert_eq!(c.apply_size_hints(c.r, 1, &bounds(false, false)), None);
    }

    #[test]
    fn border_change_alone_counts_as_a_change() {
        let c = client();

        assert_eq!(c.apply_size_hints(c.r, 2, &bounds(false, false)), Some(c.r));
    }

    #[test_case(Rect::new(5000, 100, 400, 300), Rect::new(1518, 100, 400, 300); "past the right edge")]
    #[test_case(Rect::new(-900, 100, 400, 300), Rect::new(0, 100, 400, 300); "fully off the left edge")]
    #[test_case(Rect::new(100, -500, 400, 300), Rect::new(100, 20, 400, 300); "above the work area")]
    #[test_case(Rect::new(100, 100, 0, 5), Rect::new(100, 100, 20, 20); "tiny sizes grow to the bar height")]
    #[test]
    fn non_interactive_placement(req: Rect, expected: Rect) {
        let c = client();

        assert_eq!(c.apply_size_hints(req, 1, &bounds(false, false)), Some(expected));
    }

    #[test_case(Rect::new(1921, 100, 400, 300), Rect::new(1518, 100, 400, 300); "past the screen edge")]
    #[test_case(Rect::new(-403, 100, 400, 300), Rect::new(0, 100, 400, 300); "dragged off the left edge")]
    #[test_case(Rect::new(-401, 100, 400, 300), Rect::new(-401, 100, 400, 300); "border still on screen")]
    #[test]
    fn interactive_placement(req: Rect, expected: Rect) {
        let c = client();

        assert_eq!(c.apply_size_hints(req, 1, &bounds(true, false)), Some(expected));
    }

    #[test]
    fn hints_are_ignored_unless_honoured() {
        let mut c = client();
        c.hints.inc_w = 10;
        c.hints.inc_h = 10;
        let req = Rect::new(100, 100, 455, 333);

        assert_eq!(c.apply_size_hints(req, 1, &bounds(false, false)), Some(req));
        assert_eq!(
            c.apply_size_hints(req, 1, &bounds(false, true)),
            Some(Rect::new(100, 100, 450, 330))
        );
    }

    #[test_case(SizeHints { inc_w: 7, inc_h: 13, base_w: 2, base_h: 4, min_w: 2, min_h: 4, ..Default::default() }, (500, 400), (492, 394); "increments from base")]
    #[test_case(SizeHints { min_w: 600, min_h: 500, ..Default::default() }, (500, 400), (600, 500); "minimum size")]
    #[test_case(SizeHints { max_w: 300, max_h: 200, ..Default::default() }, (500, 400), (300, 200); "maximum size")]
    #[test_case(SizeHints { min_aspect: 0.5, max_aspect: 1.0, ..Default::default() }, (800, 400), (400, 400); "too wide")]
    #[test_case(SizeHints { min_aspect: 0.5, max_aspect: 2.0, ..Default::default() }, (200, 400), (200, 100); "too tall")]
    #[test]
    fn constrain(hints: SizeHints, req: (i32, i32), expected: (i32, i32)) {
        assert_eq!(hints.constrain(req.0, req.1), expected);
    }

    #[test]
    fn normal_hints_fall_back_between_base_and_min() {
        let raw = WmNormalHints {
            flags: WmNormalHintsFlags::P_MIN_SIZE | WmNormalHintsFlags::P_ASPECT,
            min: (100, 50),
            min_aspect: (4, 3),
            max_aspect: (16, 9),
            ..Default::default()
        };
        let h = SizeHints::from_normal_hints(Some(&raw));

        assert_eq!((h.base_w, h.base_h), (100, 50));
        assert_eq!((h.min_w, h.min_h), (100, 50));
        assert_eq!(h.min_aspect, 3.0 / 4.0);
        assert_eq!(h.max_aspect, 16.0 / 9.0);
    }

    #[test]
    fn fixed_size_needs_matching_min_and_max() {
        let h = SizeHints {
            min_w: 200,
            min_h: 100,
            max_w: 200,
            max_h: 100,
            ..Default::default()
        };

        assert!(h.is_fixed());
        assert!(!SizeHints::default().is_fixed());
    }
}
