//! Positioning clients: layouts, show/hide, resizing and monitor geometry
use crate::{
    core::{
        client::Bounds,
        layout::LayoutParams,
        monitor::Monitor,
        ClientId, State,
    },
    pure::geometry::Rect,
    x::{ClientConfig, XConn},
    Result, Xid,
};
use tracing::{debug, info, trace};

impl State {
    /// Show, hide and lay out the clients of one monitor or, given `None`, all of them.
    ///
    /// Only a single monitor is restacked.
    pub(crate) fn arrange<X: XConn>(&mut self, m: Option<usize>, x: &X) -> Result<()> {
        match m {
            Some(m) => {
                self.show_hide(m, x)?;
                self.arrange_mon(m, x)?;
                self.restack(m, x)
            }

            None => {
                for m in 0..self.monitors.len() {
                    self.show_hide(m, x)?;
                }
                for m in 0..self.monitors.len() {
                    self.arrange_mon(m, x)?;
                }

                Ok(())
            }
        }
    }

    fn arrange_mon<X: XConn>(&mut self, m: usize, x: &X) -> Result<()> {
        let layout = self.config.layouts[self.monitors[m].layout()].clone();
        self.monitors[m].ltsymbol = layout.symbol;

        match layout.arrange {
            Some(arrange) => {
                let tiled = self.tiled(m);
                let mon = &self.monitors[m];
                let params = LayoutParams {
                    nmaster: mon.nmaster,
                    mfact: mon.mfact,
                    gaps: mon.gaps.within(mon.work),
                    gaps_enabled: self.gaps_enabled,
                    smart_gaps: self.config.smart_gaps,
                    border_px: self.config.border_px,
                };

                let arrangement = arrange.apply(tiled.len(), mon.work, &params);
                trace!(monitor = m, n = tiled.len(), ?arrange, "applying layout");
                for (id, r) in tiled.into_iter().zip(arrangement.positions) {
                    self.resize(id, r, arrangement.border, false, x)?;
                }
            }

            // floating clients keep their geometry but get their border back if a tiled
            // layout took it away
            None => {
                let bpx = self.config.border_px;
                for id in self.visible(m) {
                    let c = &self.clients[id];
                    if c.bw == 0 {
                        let r = Rect::new(c.r.x, c.r.y, c.r.w - 2 * bpx, c.r.h - 2 * bpx);
                        self.resize(id, r, bpx, false, x)?;
                    }
                }
            }
        }

        Ok(())
    }

    // Visible clients are shown top down and hidden ones moved off screen bottom up
    fn show_hide<X: XConn>(&mut self, m: usize, x: &X) -> Result<()> {
        let stack = self.monitors[m].stack.clone();
        let arranged = self.is_arranged(m);
        let (shown, hidden): (Vec<ClientId>, Vec<ClientId>) =
            stack.iter().partition(|&&id| self.is_visible(id));

        for id in shown {
            let c = &self.clients[id];
            x.set_client_config(c.win, &[ClientConfig::Position(c.r)])?;

            if (!arranged || c.is_floating) && !c.is_fullscreen {
                let (r, bw) = (c.r, c.bw);
                self.resize(id, r, bw, false, x)?;
            }
        }

        for id in hidden.into_iter().rev() {
            let c = &self.clients[id];
            let parked = Rect::new(-2 * c.outer_width(), c.r.y, c.r.w, c.r.h);
            x.set_client_config(c.win, &[ClientConfig::Position(parked)])?;
        }

        Ok(())
    }

    /// Resize a client after checking the requested geometry against its size hints and the
    /// bounds of its monitor. Nothing is sent if the geometry would not change.
    pub(crate) fn resize<X: XConn>(
        &mut self,
        id: ClientId,
        r: Rect,
        bw: i32,
        interactive: bool,
        x: &X,
    ) -> Result<()> {
        let c = &self.clients[id];
        let bounds = Bounds {
            interactive,
            screen: self.screen,
            work: self.monitors[c.mon].work,
            bar_height: self.config.bar_height,
            honour_hints: self.config.resize_hints || c.is_floating || !self.is_arranged(c.mon),
        };

        match c.apply_size_hints(r, bw, &bounds) {
            Some(r) => self.resize_client(id, r, bw, x),
            None => Ok(()),
        }
    }

    /// Unconditionally move and resize a client, remembering its previous geometry
    pub(crate) fn resize_client<X: XConn>(
        &mut self,
        id: ClientId,
        r: Rect,
        bw: i32,
        x: &X,
    ) -> Result<()> {
        let c = &mut self.clients[id];
        c.old = c.r;
        c.r = r;
        c.bw = bw;

        x.set_client_config(c.win, &[ClientConfig::Position(r), ClientConfig::BorderPx(bw)])?;
        x.send_configure_notify(c.win, r, bw)
    }

    /// Enter or leave fullscreen, covering the whole monitor without a border while active
    pub(crate) fn set_fullscreen<X: XConn>(
        &mut self,
        id: ClientId,
        fullscreen: bool,
        x: &X,
    ) -> Result<()> {
        let c = &mut self.clients[id];

        if fullscreen && !c.is_fullscreen {
            debug!(win = %c.win, "entering fullscreen");
            x.set_fullscreen_state(c.win, true)?;
            c.is_fullscreen = true;
            c.old_state = c.is_floating;
            c.old_bw = c.bw;
            c.is_floating = true;

            let (win, screen) = (c.win, self.monitors[c.mon].screen);
            self.resize_client(id, screen, 0, x)?;
            x.set_client_config(win, &[ClientConfig::StackTop])?;
        } else if !fullscreen && c.is_fullscreen {
            debug!(win = %c.win, "leaving fullscreen");
            x.set_fullscreen_state(c.win, false)?;
            c.is_fullscreen = false;
            c.is_floating = c.old_state;
            c.r = c.old;
            c.bw = c.old_bw;

            let (r, bw, mon) = (c.r, c.bw, c.mon);
            self.resize_client(id, r, bw, x)?;
            self.arrange(Some(mon), x)?;
        }

        Ok(())
    }

    /// Insert a client into its monitor's insertion order directly after the master area of
    /// the selected monitor, so that it lands in the stack.
    pub(crate) fn attach_top(&mut self, id: ClientId) {
        let c = &self.clients[id];
        let (tags, mon) = (c.tags, c.mon);
        let nmaster = self.monitors[self.selmon].nmaster;
        let clients = &self.monitors[mon].clients;

        let mut n = 1;
        let mut below = None;
        for (i, &b) in clients.iter().enumerate() {
            below = Some(i);
            let cb = &self.clients[b];
            let counts = !cb.is_floating && cb.tags & tags != 0;
            if i + 1 == clients.len() || (counts && n == nmaster) {
                break;
            }
            if counts {
                n += 1;
            }
        }

        let clients = &mut self.monitors[mon].clients;
        match below {
            Some(i) => clients.insert(i + 1, id),
            None => clients.push(id),
        }
    }

    /// The monitor with the largest overlap with `r`, defaulting to the selected monitor
    pub(crate) fn rect_to_mon(&self, r: Rect) -> usize {
        let mut best = (self.selmon, 0);
        for (i, m) in self.monitors.iter().enumerate() {
            let a = r.intersection_area(&m.work);
            if a > best.1 {
                best = (i, a);
            }
        }

        best.0
    }

    /// The monitor a window belongs to. For the root window this is the monitor under the
    /// pointer.
    pub(crate) fn win_to_mon<X: XConn>(&self, win: Xid, x: &X) -> Result<usize> {
        if win == self.root {
            let p = x.cursor_position()?;
            return Ok(self.rect_to_mon(Rect::new(p.x, p.y, 1, 1)));
        }

        if let Some(m) = (0..self.monitors.len()).find(|&m| x.bar_window(m) == Some(win)) {
            return Ok(m);
        }

        Ok(self.client_for(win).map_or(self.selmon, |c| c.mon))
    }

    /// Bring the monitors in line with the outputs reported by the X server.
    ///
    /// Returns true if any monitor was added, moved, resized or removed.
    pub(crate) fn update_geom<X: XConn>(&mut self, x: &X) -> Result<bool> {
        let mut screens: Vec<Rect> = Vec::new();
        for r in x.screen_details()? {
            if !screens.contains(&r) {
                screens.push(r);
            }
        }
        if screens.is_empty() {
            screens.push(self.screen);
        }

        let bh = self.config.bar_height;
        let known = self.monitors.len();
        let mut dirty = false;

        while self.monitors.len() < screens.len() {
            let num = self.monitors.len();
            self.monitors.push(Monitor::new(num, &self.config));
            dirty = true;
        }

        for (i, &r) in screens.iter().enumerate() {
            let m = &mut self.monitors[i];
            if i >= known || m.screen != r {
                dirty = true;
                m.num = i;
                m.set_screen(r, bh);
            }
        }

        while self.monitors.len() > screens.len() {
            let gone = self.monitors.len() - 1;
            info!(monitor = gone, "output removed");

            let clients = std::mem::take(&mut self.monitors[gone].clients);
            for id in clients {
                self.monitors[gone].detach_stack(id);
                self.clients[id].mon = 0;
                self.attach_top(id);
                self.monitors[0].attach_stack(id);
            }

            if self.selmon == gone {
                self.selmon = 0;
            }
            self.monitors.pop();
            x.remove_bar(gone)?;
            dirty = true;
        }

        if dirty {
            debug!(n_monitors = self.monitors.len(), "monitor geometry updated");
            self.selmon = 0;
            self.selmon = self.win_to_mon(self.root, x)?;
        }

        Ok(dirty)
    }

    /// Publish the managed windows on the root window
    pub(crate) fn update_client_list<X: XConn>(&self, x: &X) -> Result<()> {
        let wins: Vec<Xid> = self
            .monitors
            .iter()
            .flat_map(|m| m.clients.iter())
            .filter_map(|&id| self.clients.get(id))
            .map(|c| c.win)
            .collect();

        x.set_client_list(&wins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{client::Client, swallow::ProcFs, Config};

    fn state_with_monitors(screens: &[Rect]) -> State {
        let config = Config::default();
        let mut s = State::new(config, Xid(1), Rect::new(0, 0, 3840, 1080), Box::new(ProcFs));
        for (i, &r) in screens.iter().enumerate() {
            let mut m = Monitor::new(i, &s.config);
            m.set_screen(r, s.config.bar_height);
            s.monitors.push(m);
        }

        s
    }

    fn add_client(s: &mut State, win: u32, floating: bool) -> ClientId {
        let mut c = Client::new(Xid(win), Rect::new(0, 0, 100, 100), 0, 0);
        c.tags = 1;
        c.is_floating = floating;
        let id = s.clients.insert(c);
        s.attach_top(id);
        s.monitors[0].attach_stack(id);

        id
    }

    fn order(s: &State) -> Vec<u32> {
        s.monitors[0].clients.iter().map(|&id| *s.clients[id].win).collect()
    }

    #[test]
    fn attach_top_puts_new_clients_after_the_master() {
        let mut s = state_with_monitors(&[Rect::new(0, 0, 1920, 1080)]);
        add_client(&mut s, 10, false);
        add_client(&mut s, 20, false);
        add_client(&mut s, 30, false);

        assert_eq!(order(&s), vec![10, 30, 20]);
    }

    #[test]
    fn attach_top_skips_floating_clients_when_counting_masters() {
        let mut s = state_with_monitors(&[Rect::new(0, 0, 1920, 1080)]);
        add_client(&mut s, 10, true);
        add_client(&mut s, 20, false);
        add_client(&mut s, 30, false);

        assert_eq!(order(&s), vec![10, 20, 30]);
    }

    #[test]
    fn attach_top_with_no_masters_appends() {
        let mut s = state_with_monitors(&[Rect::new(0, 0, 1920, 1080)]);
        s.monitors[0].nmaster = 0;
        add_client(&mut s, 10, false);
        add_client(&mut s, 20, false);
        add_client(&mut s, 30, false);

        assert_eq!(order(&s), vec![10, 20, 30]);
    }

    #[test]
    fn rect_to_mon_picks_the_largest_overlap() {
        let s = state_with_monitors(&[Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 1920, 1080)]);

        assert_eq!(s.rect_to_mon(Rect::new(1800, 100, 400, 400)), 1);
        assert_eq!(s.rect_to_mon(Rect::new(1700, 100, 400, 400)), 0);
        assert_eq!(s.rect_to_mon(Rect::new(-500, -500, 10, 10)), 0);
    }
}
