//! Tag views, per-tag layout settings and the actions that operate on the selected client
use crate::{
    core::{layout::Gaps, monitor::Pertag, State},
    x::{Atom, ClientAttr, XConn},
    Result,
};
use tracing::{debug, info, warn};

impl State {
    // Re-derive the monitor's layout settings from the pertag slot that is now current
    fn apply_pertag<X: XConn>(&mut self, x: &X) -> Result<()> {
        let m = &mut self.monitors[self.selmon];
        m.restore_pertag();

        if m.showbar != m.pertag.showbars[m.pertag.curtag] {
            self.flip_bar(x)?;
        }

        Ok(())
    }

    // Show or hide the bar of the selected monitor, recording the choice for the current tag
    fn flip_bar<X: XConn>(&mut self, x: &X) -> Result<()> {
        let bh = self.config.bar_height;
        let m = &mut self.monitors[self.selmon];
        m.set_showbar(!m.showbar);
        m.update_bar_pos(bh);

        self.draw_bar(self.selmon, x)
    }

    /// Show the given tags on the selected monitor.
    ///
    /// A mask without any valid tag bits flips back to the previous view.
    pub(crate) fn view<X: XConn>(&mut self, mask: u32, x: &X) -> Result<()> {
        let all = self.config.tag_mask();
        let m = &mut self.monitors[self.selmon];

        if mask & all == m.tags() {
            return Ok(());
        }

        m.seltags ^= 1;
        if mask & all != 0 {
            m.tagset[m.seltags] = mask & all;
            m.pertag.prevtag = m.pertag.curtag;
            m.pertag.curtag = Pertag::slot_for(mask, all);
        } else {
            std::mem::swap(&mut m.pertag.curtag, &mut m.pertag.prevtag);
        }

        debug!(tags = m.tags(), curtag = m.pertag.curtag, "switching view");
        self.apply_pertag(x)?;
        self.focus(None, x)?;
        self.arrange(Some(self.selmon), x)
    }

    /// Add or remove tags from the current view of the selected monitor.
    ///
    /// An empty result is refused. Pertag settings follow the lowest visible tag.
    pub(crate) fn toggle_view<X: XConn>(&mut self, mask: u32, x: &X) -> Result<()> {
        let all = self.config.tag_mask();
        let m = &mut self.monitors[self.selmon];
        let tags = m.tags() ^ (mask & all);

        if tags == 0 {
            return Ok(());
        }

        m.tagset[m.seltags] = tags;
        let slot = Pertag::slot_for(tags, all);
        if slot != m.pertag.curtag {
            m.pertag.prevtag = m.pertag.curtag;
            m.pertag.curtag = slot;
        }

        self.apply_pertag(x)?;
        self.focus(None, x)?;
        self.arrange(Some(self.selmon), x)
    }

    /// Replace the tags of the selected client
    pub(crate) fn tag<X: XConn>(&mut self, mask: u32, x: &X) -> Result<()> {
        let mask = mask & self.config.tag_mask();

        match self.sel() {
            Some(id) if mask != 0 => {
                self.clients[id].tags = mask;
                self.focus(None, x)?;
                self.arrange(Some(self.selmon), x)
            }
            _ => Ok(()),
        }
    }

    /// Flip tags on the selected client, refusing to leave it with none
    pub(crate) fn toggle_tag<X: XConn>(&mut self, mask: u32, x: &X) -> Result<()> {
        let id = match self.sel() {
            Some(id) => id,
            None => return Ok(()),
        };

        let tags = self.clients[id].tags ^ (mask & self.config.tag_mask());
        if tags != 0 {
            self.clients[id].tags = tags;
            self.focus(None, x)?;
            self.arrange(Some(self.selmon), x)?;
        }

        Ok(())
    }

    /// Select a layout for the active slot, or flip to the other slot when given `None`
    pub(crate) fn set_layout<X: XConn>(&mut self, layout: Option<usize>, x: &X) -> Result<()> {
        if let Some(i) = layout {
            if i >= self.config.layouts.len() {
                warn!(index = i, "unknown layout");
                return Ok(());
            }
        }

        let m = &mut self.monitors[self.selmon];
        if layout.map_or(true, |i| i != m.layout()) {
            m.toggle_layout_slot();
        }
        if let Some(i) = layout {
            m.set_layout_in_slot(i);
        }
        m.ltsymbol = self.config.layouts[m.layout()].symbol.clone();

        if m.sel.is_some() {
            self.arrange(Some(self.selmon), x)
        } else {
            self.draw_bar(self.selmon, x)
        }
    }

    /// Select the layout at an offset from the active layout slot index, wrapping around
    pub(crate) fn set_layout_ex<X: XConn>(&mut self, offset: i32, x: &X) -> Result<()> {
        let n = self.config.layouts.len() as i64;
        let i = (self.monitors[self.selmon].sellt as i64 + offset as i64).rem_euclid(n);

        self.set_layout(Some(i as usize), x)
    }

    /// Values below 1.0 adjust the master fraction, values above set it to `f - 1.0`
    pub(crate) fn set_mfact<X: XConn>(&mut self, f: f32, x: &X) -> Result<()> {
        if !self.is_arranged(self.selmon) {
            return Ok(());
        }

        let m = &mut self.monitors[self.selmon];
        let f = if f < 1.0 { f + m.mfact } else { f - 1.0 };
        if !(0.05..=0.95).contains(&f) {
            return Ok(());
        }

        m.set_mfact(f);
        self.arrange(Some(self.selmon), x)
    }

    pub(crate) fn set_nmaster<X: XConn>(&mut self, n: usize, x: &X) -> Result<()> {
        self.monitors[self.selmon].set_nmaster(n);

        self.arrange(Some(self.selmon), x)
    }

    pub(crate) fn toggle_bar<X: XConn>(&mut self, x: &X) -> Result<()> {
        self.flip_bar(x)?;

        self.arrange(Some(self.selmon), x)
    }

    pub(crate) fn toggle_floating<X: XConn>(&mut self, x: &X) -> Result<()> {
        let id = match self.sel() {
            Some(id) => id,
            None => return Ok(()),
        };

        let c = &mut self.clients[id];
        if c.is_fullscreen {
            return Ok(());
        }

        c.is_floating = !c.is_floating || c.is_fixed;
        if c.is_floating {
            let bpx = self.config.border_px;
            let mut r = c.r;
            r.w -= 2 * (bpx - c.bw);
            r.h -= 2 * (bpx - c.bw);
            self.resize(id, r, bpx, false, x)?;
        }

        self.arrange(Some(self.selmon), x)
    }

    pub(crate) fn toggle_sticky<X: XConn>(&mut self, x: &X) -> Result<()> {
        if let Some(id) = self.sel() {
            let c = &mut self.clients[id];
            c.is_sticky = !c.is_sticky;
            self.arrange(Some(self.selmon), x)?;
        }

        Ok(())
    }

    pub(crate) fn toggle_fullscreen<X: XConn>(&mut self, x: &X) -> Result<()> {
        match self.sel() {
            Some(id) => self.set_fullscreen(id, !self.clients[id].is_fullscreen, x),
            None => Ok(()),
        }
    }

    /// Send the selected client to the monitor in the given direction
    pub(crate) fn tag_mon<X: XConn>(&mut self, dir: i32, x: &X) -> Result<()> {
        match self.sel() {
            Some(id) if self.monitors.len() > 1 => self.send_mon(id, self.dir_to_mon(dir), x),
            _ => Ok(()),
        }
    }

    /// Move a client to another monitor, taking on that monitor's current tags
    pub(crate) fn send_mon<X: XConn>(
        &mut self,
        id: crate::core::ClientId,
        m: usize,
        x: &X,
    ) -> Result<()> {
        let from = self.clients[id].mon;
        if from == m {
            return Ok(());
        }

        info!(%id, from, to = m, "moving client to monitor");
        self.unfocus(id, true, x)?;
        self.monitors[from].detach(id);
        if self.monitors[from].detach_stack(id) {
            self.monitors[from].sel = None;
        }

        let c = &mut self.clients[id];
        c.mon = m;
        c.tags = self.monitors[m].tags();
        self.attach_top(id);
        self.monitors[m].attach_stack(id);

        self.focus(None, x)?;
        self.arrange(None, x)
    }

    /// Politely ask the selected client to close, killing it if it does not support
    /// WM_DELETE_WINDOW
    pub(crate) fn kill_client<X: XConn>(&mut self, x: &X) -> Result<()> {
        let win = match self.sel() {
            Some(id) => self.clients[id].win,
            None => return Ok(()),
        };

        if x.supports_protocol(win, Atom::WmDeleteWindow)? {
            x.send_protocol_message(win, Atom::WmDeleteWindow)
        } else {
            info!(%win, "client does not support WM_DELETE_WINDOW: killing");
            x.kill(win)
        }
    }

    /// Replace the gaps of the selected monitor, clamping negative values to zero
    pub(crate) fn set_gaps<X: XConn>(&mut self, gaps: Gaps, x: &X) -> Result<()> {
        let m = &mut self.monitors[self.selmon];
        m.gaps = gaps.clamped().within(m.work);

        self.arrange(Some(self.selmon), x)
    }

    pub(crate) fn toggle_gaps<X: XConn>(&mut self, x: &X) -> Result<()> {
        self.gaps_enabled = !self.gaps_enabled;

        self.arrange(Some(self.selmon), x)
    }

    /// Re-read border width, bar height, colors and gaps from the X resource database and
    /// apply them to everything currently on screen.
    pub(crate) fn reload_resources<X: XConn>(&mut self, x: &X) -> Result<()> {
        let db = match x.resource_database()? {
            Some(db) => db,
            None => {
                debug!("no resource database to reload from");
                return Ok(());
            }
        };

        let old_border = self.config.border_px;
        self.config.apply_resources(&db);
        info!(
            border_px = self.config.border_px,
            bar_height = self.config.bar_height,
            "reloaded X resources"
        );

        let bpx = self.config.border_px;
        if bpx != old_border {
            for (_, c) in self.clients.iter_mut() {
                c.bw = bpx;
                x.set_client_config(c.win, &[crate::x::ClientConfig::BorderPx(bpx)])?;
                x.send_configure_notify(c.win, c.r, bpx)?;
            }
        }

        let bh = self.config.bar_height;
        for m in self.monitors.iter_mut() {
            m.update_bar_pos(bh);
        }

        for (_, c) in self.clients.iter() {
            x.set_client_attributes(c.win, &[ClientAttr::BorderColor(self.config.normal_border)])?;
        }
        if let Some(id) = self.sel() {
            let win = self.clients[id].win;
            x.set_client_attributes(win, &[ClientAttr::BorderColor(self.config.selected_border)])?;
        }

        self.set_gaps(self.config.gaps, x)?;
        self.draw_bars(x)?;

        self.arrange(None, x)
    }
}
