//! Taking windows under management, letting go of them and keeping client properties current
use crate::{
    core::{
        client::{Client, SizeHints, BROKEN},
        rules::apply_rules,
        ClientId, State,
    },
    pure::geometry::Rect,
    x::{Atom, ClientAttr, ClientConfig, MapState, WindowAttributes, WmClass, WmState, XConn},
    Result, Xid,
};
use tracing::{debug, info, trace};

impl State {
    /// Start managing a newly mapped window.
    pub(crate) fn manage<X: XConn>(&mut self, win: Xid, attrs: &WindowAttributes, x: &X) -> Result<()> {
        let mut c = Client::new(win, attrs.geometry, attrs.border_width, self.selmon);
        c.pid = x.window_pid(win)?;
        c.name = title_or_broken(x.window_title(win)?);

        let trans = x.transient_for(win)?;
        let parent = trans.and_then(|t| self.client_for(t));
        let mut term = None;

        match parent {
            Some(p) => {
                c.mon = p.mon;
                c.tags = p.tags;
            }
            None => {
                let class = class_or_broken(x.window_class(win)?);
                let rule = apply_rules(
                    &self.config.rules,
                    &class.class,
                    &class.instance,
                    &c.name,
                    self.monitors.len(),
                );
                trace!(%win, ?rule, "applied rules");

                c.is_floating = rule.floating;
                c.is_terminal = rule.terminal;
                c.no_swallow = rule.no_swallow;
                if let Some(m) = rule.monitor {
                    c.mon = m;
                }

                let mask = rule.tags & self.config.tag_mask();
                c.tags = if mask != 0 { mask } else { self.monitors[c.mon].tags() };
                term = self.term_for_pid(c.pid, c.is_terminal);
            }
        }

        // keep the client on its monitor and clear of a top bar
        let mon = &self.monitors[c.mon];
        let (ms, mw) = (mon.screen, mon.work);
        if c.r.x + c.outer_width() > ms.right() {
            c.r.x = ms.right() - c.outer_width();
        }
        if c.r.y + c.outer_height() > ms.bottom() {
            c.r.y = ms.bottom() - c.outer_height();
        }
        c.r.x = c.r.x.max(ms.x);
        let centre = c.r.x + c.r.w / 2;
        let covers_bar = mon.by == ms.y && centre >= mw.x && centre < mw.right();
        c.r.y = c.r.y.max(if covers_bar { self.config.bar_height } else { ms.y });
        c.bw = self.config.border_px;

        info!(%win, name = %c.name, tags = c.tags, monitor = c.mon, "managing new client");
        x.set_client_config(win, &[ClientConfig::BorderPx(c.bw)])?;
        x.set_client_attributes(win, &[ClientAttr::BorderColor(self.config.normal_border)])?;
        x.send_configure_notify(win, c.r, c.bw)?;

        let id = self.clients.insert(c);
        self.update_window_type(id, x)?;
        self.update_size_hints(id, x)?;
        self.update_wm_hints(id, x)?;
        x.set_client_attributes(win, &[ClientAttr::ClientEventMask])?;
        x.grab_buttons(win, &self.button_states(), false)?;

        let c = &mut self.clients[id];
        if !c.is_floating {
            c.is_floating = trans.is_some() || c.is_fixed;
            c.old_state = c.is_floating;
        }
        if c.is_floating {
            x.set_client_config(win, &[ClientConfig::StackTop])?;
        }

        let mon = c.mon;
        self.attach_top(id);
        self.monitors[mon].attach_stack(id);
        self.update_client_list(x)?;

        // some windows need to see a move before they will map properly
        let c = &self.clients[id];
        let offscreen = Rect::new(c.r.x + 2 * self.screen.w, c.r.y, c.r.w, c.r.h);
        x.set_client_config(win, &[ClientConfig::Position(offscreen)])?;
        x.set_wm_state(win, WmState::Normal)?;

        if mon == self.selmon {
            if let Some(sel) = self.sel() {
                self.unfocus(sel, false, x)?;
            }
        }
        self.monitors[mon].sel = Some(id);
        self.arrange(Some(mon), x)?;
        x.map(win)?;

        if let Some(term) = term {
            self.swallow(term, id, x)?;
        }

        self.focus(None, x)
    }

    /// Stop managing a client. Windows that still exist get their original border back and are
    /// marked as withdrawn.
    pub(crate) fn unmanage<X: XConn>(&mut self, id: ClientId, destroyed: bool, x: &X) -> Result<()> {
        if self.clients[id].swallowing.is_some() {
            return self.unswallow(id, x);
        }

        let c = &self.clients[id];
        let (win, mon, old_bw) = (c.win, c.mon, c.old_bw);
        debug!(%win, destroyed, "unmanaging client");

        self.monitors[mon].detach(id);
        if self.monitors[mon].detach_stack(id) {
            let next = self.monitors[mon]
                .stack
                .iter()
                .copied()
                .find(|&s| self.is_visible(s));
            self.monitors[mon].sel = next;
        }

        if !destroyed {
            x.set_client_config(win, &[ClientConfig::BorderPx(old_bw)])?;
            x.ungrab_buttons(win)?;
            x.set_wm_state(win, WmState::Withdrawn)?;
        }

        self.clients.remove(id);
        if self.prev_zoom == Some(id) {
            self.prev_zoom = None;
        }

        self.arrange(Some(mon), x)?;
        self.focus(None, x)?;
        self.update_client_list(x)
    }

    pub(crate) fn update_title<X: XConn>(&mut self, id: ClientId, x: &X) -> Result<()> {
        let win = self.win(id)?;
        self.clients[id].name = title_or_broken(x.window_title(win)?);

        Ok(())
    }

    pub(crate) fn update_size_hints<X: XConn>(&mut self, id: ClientId, x: &X) -> Result<()> {
        let win = self.win(id)?;
        let hints = SizeHints::from_normal_hints(x.size_hints(win)?.as_ref());
        let c = &mut self.clients[id];
        c.hints = hints;
        c.is_fixed = hints.is_fixed();

        Ok(())
    }

    /// Track urgency and input focus hints. The selected client has its urgency cleared.
    pub(crate) fn update_wm_hints<X: XConn>(&mut self, id: ClientId, x: &X) -> Result<()> {
        let win = self.win(id)?;
        let hints = match x.wm_hints(win)? {
            Some(h) => h,
            None => return Ok(()),
        };

        let is_sel = self.sel() == Some(id);
        let c = &mut self.clients[id];
        if is_sel && hints.is_urgent() {
            x.set_wm_hints(win, &hints.with_urgency(false))?;
        } else {
            c.is_urgent = hints.is_urgent();
        }
        c.never_focus = !hints.accepts_input;

        Ok(())
    }

    /// Fullscreen windows and dialogs are recognised from their EWMH state and type
    pub(crate) fn update_window_type<X: XConn>(&mut self, id: ClientId, x: &X) -> Result<()> {
        let win = self.win(id)?;
        let state = x.atom_prop(win, Atom::NetWmState)?;
        let wtype = x.atom_prop(win, Atom::NetWmWindowType)?;

        if state == Some(Atom::NetWmStateFullscreen) {
            self.set_fullscreen(id, true, x)?;
        }
        if wtype == Some(Atom::NetWindowTypeDialog) {
            self.clients[id].is_floating = true;
        }

        Ok(())
    }

    /// Manage any windows that already exist, with transients after their parents
    pub(crate) fn scan<X: XConn>(&mut self, x: &X) -> Result<()> {
        let wins = x.existing_clients()?;
        let mut transients = vec![];

        for win in wins {
            let attrs = match x.get_window_attributes(win)? {
                Some(a) if !a.override_redirect => a,
                _ => continue,
            };

            if x.transient_for(win)?.is_some() {
                transients.push((win, attrs));
            } else if self.should_adopt(win, &attrs, x)? {
                self.manage(win, &attrs, x)?;
            }
        }

        for (win, attrs) in transients {
            if self.should_adopt(win, &attrs, x)? {
                self.manage(win, &attrs, x)?;
            }
        }

        info!(n_clients = self.clients.len(), "finished scanning existing windows");

        Ok(())
    }

    fn should_adopt<X: XConn>(&self, win: Xid, attrs: &WindowAttributes, x: &X) -> Result<bool> {
        Ok(attrs.map_state == MapState::Viewable
            || x.get_wm_state(win)? == Some(WmState::Iconic))
    }

    /// Let go of every client and release everything grabbed on startup
    pub(crate) fn cleanup<X: XConn>(&mut self, x: &X) -> Result<()> {
        self.view(u32::MAX, x)?;

        for m in 0..self.monitors.len() {
            while let Some(&id) = self.monitors[m].stack.first() {
                self.unmanage(id, false, x)?;
            }
        }

        x.ungrab_keys()?;
        for m in 0..self.monitors.len() {
            x.remove_bar(m)?;
        }
        x.focus_root()?;
        x.set_active_window(None)?;

        x.cleanup()
    }

    /// Grab every bound key on the root window
    pub(crate) fn grab_keys<X: XConn>(&mut self, x: &X) -> Result<()> {
        let numlock = x.numlock_mask()?;
        let codes: Vec<_> = self
            .config
            .keys
            .iter()
            .flat_map(|k| {
                let code = k.code();
                code.mask
                    .with_lock_variants(numlock)
                    .map(|mask| crate::core::bindings::KeyCode { mask, ..code })
            })
            .collect();

        self.numlock = numlock;
        x.grab_keys(&codes)
    }
}

fn title_or_broken(title: Option<String>) -> String {
    match title {
        Some(t) if !t.is_empty() => t,
        _ => BROKEN.to_string(),
    }
}

// Rules see "broken" for any part of WM_CLASS that a window did not set
fn class_or_broken(class: Option<WmClass>) -> WmClass {
    let class = class.unwrap_or_default();
    let or_broken = |s: String| if s.is_empty() { BROKEN.to_string() } else { s };

    WmClass {
        instance: or_broken(class.instance),
        class: or_broken(class.class),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn wm_class(instance: &str, class: &str) -> WmClass {
        WmClass {
            instance: instance.to_string(),
            class: class.to_string(),
        }
    }

    #[test_case(None, wm_class("broken", "broken"); "missing property")]
    #[test_case(Some(wm_class("", "St")), wm_class("broken", "St"); "missing instance")]
    #[test_case(Some(wm_class("st", "St")), wm_class("st", "St"); "complete")]
    #[test]
    fn class_falls_back_to_broken(raw: Option<WmClass>, expected: WmClass) {
        assert_eq!(class_or_broken(raw), expected);
    }

    #[test_case(Some(String::new()), "broken"; "empty title")]
    #[test_case(None, "broken"; "missing title")]
    #[test_case(Some("vim".to_string()), "vim"; "set title")]
    #[test]
    fn title_falls_back_to_broken(raw: Option<String>, expected: &str) {
        assert_eq!(title_or_broken(raw), expected);
    }
}
