//! Monitors and the per-tag settings that they carry
use crate::{
    core::{client::Client, layout::Gaps, ClientId, Config},
    pure::geometry::Rect,
};

/// Layout settings remembered for each tag of a monitor.
///
/// Index 0 is the "all tags" view and index `n` is the tag with bit `n - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pertag {
    pub(crate) curtag: usize,
    pub(crate) prevtag: usize,
    pub(crate) nmasters: Vec<usize>,
    pub(crate) mfacts: Vec<f32>,
    pub(crate) sellts: Vec<usize>,
    pub(crate) ltidxs: Vec<[usize; 2]>,
    pub(crate) showbars: Vec<bool>,
}

impl Pertag {
    fn new(n_tags: usize, nmaster: usize, mfact: f32, lt: [usize; 2], showbar: bool) -> Self {
        let n = n_tags + 1;

        Self {
            curtag: 1,
            prevtag: 1,
            nmasters: vec![nmaster; n],
            mfacts: vec![mfact; n],
            sellts: vec![0; n],
            ltidxs: vec![lt; n],
            showbars: vec![showbar; n],
        }
    }

    /// The pertag slot for a tag mask: 0 for the all tags view, otherwise one past the lowest set
    /// bit.
    pub(crate) fn slot_for(mask: u32, all: u32) -> usize {
        if mask == all || mask == u32::MAX {
            0
        } else {
            mask.trailing_zeros() as usize + 1
        }
    }
}

/// One display output along with the clients currently assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Monitor {
    pub(crate) num: usize,
    pub(crate) ltsymbol: String,
    pub(crate) mfact: f32,
    pub(crate) nmaster: usize,
    /// The full geometry of the output
    pub(crate) screen: Rect,
    /// The area available to clients once the bar is accounted for
    pub(crate) work: Rect,
    /// y coordinate of the bar, parked off screen when it is hidden
    pub(crate) by: i32,
    pub(crate) gaps: Gaps,
    pub(crate) seltags: usize,
    pub(crate) sellt: usize,
    pub(crate) tagset: [u32; 2],
    pub(crate) showbar: bool,
    pub(crate) topbar: bool,
    /// Insertion order, used for layout
    pub(crate) clients: Vec<ClientId>,
    /// Focus history, most recently focused first
    pub(crate) stack: Vec<ClientId>,
    pub(crate) sel: Option<ClientId>,
    /// Indices into the configured layouts for the two layout slots
    pub(crate) lt: [usize; 2],
    pub(crate) pertag: Pertag,
}

impl Monitor {
    pub(crate) fn new(num: usize, config: &Config) -> Self {
        let lt = [0, 1 % config.layouts.len().max(1)];
        let ltsymbol = config
            .layouts
            .first()
            .map(|l| l.symbol.clone())
            .unwrap_or_default();

        Self {
            num,
            ltsymbol,
            mfact: config.mfact,
            nmaster: config.nmaster,
            screen: Rect::default(),
            work: Rect::default(),
            by: 0,
            gaps: config.gaps,
            seltags: 0,
            sellt: 0,
            tagset: [1, 1],
            showbar: config.show_bar,
            topbar: config.top_bar,
            clients: vec![],
            stack: vec![],
            sel: None,
            lt,
            pertag: Pertag::new(
                config.tags.len(),
                config.nmaster,
                config.mfact,
                lt,
                config.show_bar,
            ),
        }
    }

    /// The index of this monitor
    pub fn num(&self) -> usize {
        self.num
    }

    /// The full geometry of this monitor
    pub fn screen(&self) -> Rect {
        self.screen
    }

    /// The area of this monitor available to clients
    pub fn work_area(&self) -> Rect {
        self.work
    }

    /// The tag mask currently being shown
    pub fn tags(&self) -> u32 {
        self.tagset[self.seltags]
    }

    /// The index of the active layout in the configured layouts
    pub fn layout(&self) -> usize {
        self.lt[self.sellt]
    }

    /// The number of clients in the master area
    pub fn nmaster(&self) -> usize {
        self.nmaster
    }

    /// The fraction of the width given to the master area
    pub fn mfact(&self) -> f32 {
        self.mfact
    }

    /// Whether the bar is shown on this monitor
    pub fn showbar(&self) -> bool {
        self.showbar
    }

    /// The current gap settings for this monitor
    pub fn gaps(&self) -> Gaps {
        self.gaps
    }

    /// The clients on this monitor in insertion order
    pub fn clients(&self) -> &[ClientId] {
        &self.clients
    }

    /// The clients on this monitor in focus order
    pub fn focus_stack(&self) -> &[ClientId] {
        &self.stack
    }

    /// The selected client on this monitor
    pub fn selected(&self) -> Option<ClientId> {
        self.sel
    }

    /// The y coordinate of the bar on this monitor
    pub fn bar_y(&self) -> i32 {
        self.by
    }

    /// Whether the client is shown under the current tag set
    pub(crate) fn shows(&self, c: &Client) -> bool {
        c.tags & self.tags() != 0 || c.is_sticky
    }

    /// Set the geometry of the output, recomputing the work area.
    pub(crate) fn set_screen(&mut self, r: Rect, bar_height: i32) {
        self.screen = r;
        self.update_bar_pos(bar_height);
    }

    /// Recompute the work area and bar position from the current bar visibility.
    pub(crate) fn update_bar_pos(&mut self, bar_height: i32) {
        self.work = self.screen;

        if self.showbar {
            self.work.h -= bar_height;
            if self.topbar {
                self.by = self.work.y;
                self.work.y += bar_height;
            } else {
                self.by = self.work.y + self.work.h;
            }
        } else {
            self.by = -bar_height;
        }
    }

    /// Copy the settings remembered for the current tag onto the monitor.
    pub(crate) fn restore_pertag(&mut self) {
        let t = self.pertag.curtag;

        self.nmaster = self.pertag.nmasters[t];
        self.mfact = self.pertag.mfacts[t];
        self.sellt = self.pertag.sellts[t];
        self.lt = self.pertag.ltidxs[t];
    }

    pub(crate) fn set_nmaster(&mut self, n: usize) {
        self.nmaster = n;
        self.pertag.nmasters[self.pertag.curtag] = n;
    }

    pub(crate) fn set_mfact(&mut self, f: f32) {
        self.mfact = f;
        self.pertag.mfacts[self.pertag.curtag] = f;
    }

    pub(crate) fn set_showbar(&mut self, show: bool) {
        self.showbar = show;
        self.pertag.showbars[self.pertag.curtag] = show;
    }

    /// Flip to the other layout slot
    pub(crate) fn toggle_layout_slot(&mut self) {
        self.sellt ^= 1;
        self.pertag.sellts[self.pertag.curtag] = self.sellt;
    }

    /// Put a layout in the active slot
    pub(crate) fn set_layout_in_slot(&mut self, layout: usize) {
        self.lt[self.sellt] = layout;
        self.pertag.ltidxs[self.pertag.curtag][self.sellt] = layout;
    }

    /// Prepend to the insertion order
    pub(crate) fn attach(&mut self, id: ClientId) {
        self.clients.insert(0, id);
    }

    pub(crate) fn attach_stack(&mut self, id: ClientId) {
        self.stack.insert(0, id);
    }

    pub(crate) fn detach(&mut self, id: ClientId) {
        self.clients.retain(|&c| c != id);
    }

    /// Remove from the focus history. Returns true if the client was selected.
    pub(crate) fn detach_stack(&mut self, id: ClientId) -> bool {
        self.stack.retain(|&c| c != id);

        self.sel == Some(id)
    }
}
