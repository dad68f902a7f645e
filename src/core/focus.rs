//! Input focus, the focus stack and stacking order
use crate::{
    core::{
        bindings::{Click, MouseState},
        ClientId, State,
    },
    pure::StackPosition,
    x::{Atom, ClientAttr, ClientConfig, XConn},
    Result,
};
use tracing::trace;

impl State {
    /// Button states to grab on client windows, including every lock modifier combination
    pub(crate) fn button_states(&self) -> Vec<MouseState> {
        self.config
            .buttons
            .iter()
            .filter(|b| b.click == Click::ClientWin)
            .flat_map(|b| {
                let state = b.state();
                state
                    .mask
                    .with_lock_variants(self.numlock)
                    .map(|mask| MouseState { mask, ..state })
            })
            .collect()
    }

    /// Give focus to a client, falling back to the first visible client in the focus stack of
    /// the selected monitor if it is missing or hidden.
    pub(crate) fn focus<X: XConn>(&mut self, c: Option<ClientId>, x: &X) -> Result<()> {
        let c = match c {
            Some(id) if self.is_visible(id) => Some(id),
            _ => self.monitors[self.selmon]
                .stack
                .iter()
                .copied()
                .find(|&id| self.is_visible(id)),
        };

        if let Some(sel) = self.sel() {
            if Some(sel) != c {
                self.unfocus(sel, false, x)?;
            }
        }

        match c {
            Some(id) => {
                let mon = self.clients[id].mon;
                if mon != self.selmon {
                    self.selmon = mon;
                }
                if self.clients[id].is_urgent {
                    self.set_urgent(id, false, x)?;
                }

                let m = &mut self.monitors[mon];
                m.detach_stack(id);
                m.attach_stack(id);

                let win = self.clients[id].win;
                trace!(%win, "focusing client");
                x.grab_buttons(win, &self.button_states(), true)?;
                x.set_client_attributes(
                    win,
                    &[ClientAttr::BorderColor(self.config.selected_border)],
                )?;
                self.set_focus(id, x)?;
            }

            None => {
                x.focus_root()?;
                x.set_active_window(None)?;
            }
        }

        self.monitors[self.selmon].sel = c;

        self.draw_bars(x)
    }

    pub(crate) fn unfocus<X: XConn>(&mut self, id: ClientId, root_focus: bool, x: &X) -> Result<()> {
        let win = self.win(id)?;

        x.grab_buttons(win, &self.button_states(), false)?;
        x.set_client_attributes(win, &[ClientAttr::BorderColor(self.config.normal_border)])?;

        if root_focus {
            x.focus_root()?;
            x.set_active_window(None)?;
        }

        Ok(())
    }

    pub(crate) fn set_focus<X: XConn>(&mut self, id: ClientId, x: &X) -> Result<()> {
        let c = &self.clients[id];

        if !c.never_focus {
            x.focus(c.win)?;
            x.set_active_window(Some(c.win))?;
        }

        if x.supports_protocol(c.win, Atom::WmTakeFocus)? {
            x.send_protocol_message(c.win, Atom::WmTakeFocus)?;
        }

        Ok(())
    }

    pub(crate) fn set_urgent<X: XConn>(&mut self, id: ClientId, urgent: bool, x: &X) -> Result<()> {
        let c = &mut self.clients[id];
        c.is_urgent = urgent;

        if let Some(hints) = x.wm_hints(c.win)? {
            x.set_wm_hints(c.win, &hints.with_urgency(urgent))?;
        }

        Ok(())
    }

    // Indices of the selected and previously focused clients within `visible`
    fn stack_indices(&self, visible: &[ClientId]) -> (Option<usize>, Option<usize>) {
        let m = &self.monitors[self.selmon];
        let sel = m.sel.and_then(|s| visible.iter().position(|&id| id == s));
        let prev = m
            .stack
            .iter()
            .filter(|&&id| Some(id) != m.sel && self.is_visible(id))
            .find_map(|&p| visible.iter().position(|&id| id == p));

        (sel, prev)
    }

    /// Move focus to another visible client of the selected monitor
    pub(crate) fn focus_stack<X: XConn>(&mut self, pos: StackPosition, x: &X) -> Result<()> {
        if self.sel().is_none() {
            return Ok(());
        }

        let visible = self.visible(self.selmon);
        let (i, prev) = self.stack_indices(&visible);
        let target = pos
            .resolve(visible.len(), i, prev)
            .and_then(|i| visible.get(i).copied());

        if let Some(id) = target {
            self.focus(Some(id), x)?;
            self.restack(self.selmon, x)?;
        }

        Ok(())
    }

    /// Move the selected client to another position among the visible clients
    pub(crate) fn push_stack<X: XConn>(&mut self, pos: StackPosition, x: &X) -> Result<()> {
        let sel = match self.sel() {
            Some(id) => id,
            None => return Ok(()),
        };

        let visible = self.visible(self.selmon);
        let (i, prev) = self.stack_indices(&visible);
        let idx = match pos.resolve(visible.len(), i, prev) {
            Some(idx) => idx,
            None => return Ok(()),
        };

        let clients = self.monitors[self.selmon].clients.clone();
        let m = &mut self.monitors[self.selmon];

        if idx == 0 {
            m.detach(sel);
            m.attach(sel);
            return self.arrange(Some(self.selmon), x);
        }

        // the idx'th visible client other than sel, or the last client if there are not enough
        let mut remaining = idx;
        let mut after = None;
        for &c in clients.iter() {
            after = Some(c);
            if c != sel && self.is_visible(c) {
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
            }
        }

        let m = &mut self.monitors[self.selmon];
        if let Some(after) = after.filter(|&c| c != sel) {
            m.detach(sel);
            let at = m
                .clients
                .iter()
                .position(|&c| c == after)
                .map_or(m.clients.len(), |p| p + 1);
            m.clients.insert(at, sel);
        }

        self.arrange(Some(self.selmon), x)
    }

    // The client directly before `id` in the insertion order of the selected monitor
    fn find_before(&self, id: ClientId) -> Option<ClientId> {
        let clients = &self.monitors[self.selmon].clients;
        let i = clients.iter().position(|&c| c == id)?;

        i.checked_sub(1).map(|p| clients[p])
    }

    // The first tiled client following `id` in the insertion order of the selected monitor
    fn next_tiled_after(&self, id: ClientId) -> Option<ClientId> {
        let clients = &self.monitors[self.selmon].clients;
        let i = clients.iter().position(|&c| c == id)?;

        clients[i + 1..]
            .iter()
            .copied()
            .find(|&c| self.is_visible(c) && !self.clients[c].is_floating)
    }

    /// Swap the selected client with the master client.
    ///
    /// Zooming the master brings back the client that it last replaced, if that client has not
    /// moved since, and otherwise promotes the next tiled client.
    pub(crate) fn zoom<X: XConn>(&mut self, x: &X) -> Result<()> {
        let sel = match self.sel() {
            Some(id) => id,
            None => return Ok(()),
        };

        if !self.is_arranged(self.selmon) || self.clients[sel].is_floating {
            return Ok(());
        }

        let cold = self.tiled(self.selmon).first().copied();
        let mut c = sel;
        let mut at = None;

        if Some(sel) == cold {
            at = self.prev_zoom.and_then(|p| self.find_before(p));
            let previous = at.and_then(|a| self.next_tiled_after(a));

            match previous {
                Some(p) if Some(p) == self.prev_zoom => c = p,
                _ => {
                    self.prev_zoom = None;
                    c = match self.next_tiled_after(sel) {
                        Some(next) => next,
                        None => return Ok(()),
                    };
                }
            }
        }

        if Some(c) != cold && at.is_none() {
            at = self.find_before(c);
        }

        let m = &mut self.monitors[self.selmon];
        m.detach(c);
        m.attach(c);

        // swap with the old master rather than pushing it down the stack
        if let (Some(cold), Some(at)) = (cold.filter(|&o| o != c), at) {
            self.prev_zoom = Some(cold);
            if at != cold {
                m.detach(cold);
                let i = m
                    .clients
                    .iter()
                    .position(|&id| id == at)
                    .map_or(m.clients.len(), |p| p + 1);
                m.clients.insert(i, cold);
            }
        }

        trace!(?c, "zoomed client to master");
        self.focus(Some(c), x)?;
        self.arrange(Some(self.clients[c].mon), x)
    }

    /// The monitor at a wrapping offset from the selected one
    pub(crate) fn dir_to_mon(&self, dir: i32) -> usize {
        let n = self.monitors.len() as i64;

        (self.selmon as i64 + dir.signum() as i64).rem_euclid(n) as usize
    }

    pub(crate) fn focus_mon<X: XConn>(&mut self, dir: i32, x: &X) -> Result<()> {
        if self.monitors.len() < 2 {
            return Ok(());
        }

        let m = self.dir_to_mon(dir);
        if m == self.selmon {
            return Ok(());
        }

        if let Some(sel) = self.sel() {
            self.unfocus(sel, false, x)?;
        }
        self.selmon = m;

        self.focus(None, x)?;
        self.warp(self.sel(), x)
    }

    /// Fix the stacking order of a monitor: the selected client on top if it floats and the
    /// tiled clients below the bar in focus order.
    pub(crate) fn restack<X: XConn>(&mut self, m: usize, x: &X) -> Result<()> {
        self.draw_bar(m, x)?;

        let sel = match self.monitors[m].sel {
            Some(id) => id,
            None => return Ok(()),
        };

        let arranged = self.is_arranged(m);
        if self.clients[sel].is_floating || !arranged {
            x.set_client_config(self.clients[sel].win, &[ClientConfig::StackTop])?;
        }

        if arranged {
            let mut below = x.bar_window(m);
            let tiled: Vec<_> = self.monitors[m]
                .stack
                .iter()
                .copied()
                .filter(|&id| self.is_visible(id) && !self.clients[id].is_floating)
                .collect();

            for id in tiled {
                let win = self.clients[id].win;
                let conf = match below {
                    Some(sibling) => ClientConfig::StackBelow(sibling),
                    None => ClientConfig::StackBottom,
                };
                x.set_client_config(win, &[conf])?;
                below = Some(win);
            }
        }

        x.discard_enter_events()?;

        if m == self.selmon && arranged && self.clients[sel].tags & self.monitors[m].tags() != 0 {
            self.warp(Some(sel), x)?;
        }

        Ok(())
    }

    /// Move the pointer to the centre of a client, or of the selected monitor when there is no
    /// client. The pointer is left alone while it is over the client or over the bar.
    pub(crate) fn warp<X: XConn>(&self, id: Option<ClientId>, x: &X) -> Result<()> {
        let c = match id.and_then(|id| self.clients.get(id)) {
            Some(c) => c,
            None => {
                let w = self.monitors[self.selmon].work;
                return x.warp_pointer(self.root, w.x + w.w / 2, w.y + w.h / 2);
            }
        };

        let p = x.cursor_position()?;
        let m = &self.monitors[c.mon];
        let bh = self.config.bar_height;

        let over_client = p.x > c.r.x - c.bw
            && p.y > c.r.y - c.bw
            && p.x < c.r.x + c.r.w + 2 * c.bw
            && p.y < c.r.y + c.r.h + 2 * c.bw;
        let over_bar = (p.y > m.by && p.y < m.by + bh) || (m.topbar && p.y == 0);

        if over_client || over_bar {
            trace!(?p, win = %c.win, "pointer already in place");
            return Ok(());
        }

        x.warp_pointer(c.win, c.r.w / 2, c.r.h / 2)
    }
}
