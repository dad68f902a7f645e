//! XEvent handlers for use in the main event loop
use crate::{
    core::{
        bindings::{Click, KeyCode, MouseButton, ModMask},
        signal, State,
    },
    pure::geometry::Rect,
    x::{
        event::{
            BarClick, ButtonEvent, ClientMessage, ClientMessageKind, ConfigureEvent,
            ConfigureRequest, ExposeEvent, FullscreenAction, MotionEvent, PointerChange,
            PropertyEvent, UnmapEvent,
        },
        Atom, ClientConfig, WmState, XConn, XEvent,
    },
    Result, Xid,
};
use tracing::{debug, trace};

/// Route an event to its handler
pub(crate) fn dispatch<X>(event: XEvent, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    use XEvent::*;

    match event {
        BarClick(e) => bar_click(e, state, x),
        ButtonPress(e) => button_press(e, state, x),
        ButtonRelease(_) => Ok(()),
        ClientMessage(m) => client_message(m, state, x),
        ConfigureNotify(e) => configure_notify(e, state, x),
        ConfigureRequest(e) => configure_request(e, state, x),
        Destroy(win) => destroy(win, state, x),
        Enter(p) => enter(p, state, x),
        Expose(e) => expose(e, state, x),
        FocusIn(win) => focus_in(win, state, x),
        KeyPress(code) => keypress(code, state, x),
        KeyboardMapping => state.grab_keys(x),
        MapRequest(win) => map_request(win, state, x),
        Motion(e) => motion(e, state, x),
        PropertyNotify(e) => property_notify(e, state, x),
        UnmapNotify(e) => unmap_notify(e, state, x),
    }
}

// Make the monitor that was clicked the selected one
fn select_monitor<X: XConn>(m: usize, state: &mut State, x: &X) -> Result<()> {
    if m != state.selmon {
        if let Some(sel) = state.sel() {
            state.unfocus(sel, true, x)?;
        }
        state.selmon = m;
        state.focus(None, x)?;
    }

    Ok(())
}

fn run_button_bindings<X: XConn>(
    click: Click,
    button: MouseButton,
    mask: ModMask,
    tag: Option<usize>,
    state: &mut State,
    x: &X,
) -> Result<()> {
    let numlock = state.numlock;
    let actions: Vec<_> = state
        .config
        .buttons
        .iter()
        .filter(|b| b.matches(click, button, mask, numlock))
        .map(|b| match (click, tag) {
            (Click::TagBar, Some(t)) => b.action.for_clicked_tag(t),
            _ => b.action.clone(),
        })
        .collect();

    for action in actions {
        trace!(?click, ?action, "running mouse binding");
        state.run_action(action, x)?;
    }

    Ok(())
}

pub(crate) fn bar_click<X>(e: BarClick, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    if e.monitor >= state.monitors.len() {
        return Ok(());
    }

    select_monitor(e.monitor, state, x)?;
    run_button_bindings(e.click, e.button, e.state, e.tag, state, x)
}

pub(crate) fn button_press<X>(e: ButtonEvent, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    let m = state.win_to_mon(e.id, x)?;
    select_monitor(m, state, x)?;

    let click = match state.client_id(e.id) {
        Some(id) => {
            state.focus(Some(id), x)?;
            state.restack(state.selmon, x)?;
            Click::ClientWin
        }
        None => Click::RootWin,
    };

    run_button_bindings(click, e.button, e.state, None, state, x)
}

pub(crate) fn client_message<X>(msg: ClientMessage, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    let id = match state.client_id(msg.id) {
        Some(id) => id,
        None => return Ok(()),
    };
    trace!(win = %msg.id, kind = ?msg.kind, "got client message");

    match msg.kind {
        ClientMessageKind::Fullscreen(action) => {
            let fullscreen = match action {
                FullscreenAction::Add => true,
                FullscreenAction::Toggle => !state.clients[id].is_fullscreen,
                FullscreenAction::Remove => false,
            };
            state.set_fullscreen(id, fullscreen, x)
        }

        ClientMessageKind::ActiveWindow => {
            let tags = state.clients[id].tags;
            if tags & state.config.tag_mask() == 0 {
                return Ok(());
            }

            state.selmon = state.clients[id].mon;
            state.view(1 << tags.trailing_zeros(), x)?;
            state.focus(Some(id), x)?;
            state.restack(state.selmon, x)
        }
    }
}

pub(crate) fn configure_notify<X>(e: ConfigureEvent, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    if !e.is_root {
        return Ok(());
    }

    let resized = state.screen.w != e.r.w || state.screen.h != e.r.h;
    state.screen = e.r;

    if state.update_geom(x)? || resized {
        debug!(screen = ?e.r, "root window geometry changed");
        for m in 0..state.monitors.len() {
            let screen = state.monitors[m].screen;
            let fullscreen: Vec<_> = state.monitors[m]
                .clients
                .iter()
                .copied()
                .filter(|&id| state.clients[id].is_fullscreen)
                .collect();

            for id in fullscreen {
                state.resize_client(id, screen, 0, x)?;
            }
        }

        state.draw_bars(x)?;
        state.focus(None, x)?;
        state.arrange(None, x)?;
    }

    Ok(())
}

/// Floating clients (and every client under the floating layout) get what they ask for, kept on
/// their monitor. Tiled clients are told their current geometry.
pub(crate) fn configure_request<X>(e: ConfigureRequest, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    let id = match state.client_id(e.id) {
        Some(id) => id,
        None => return x.forward_configure_request(&e),
    };

    let floating_layout = !state.is_arranged(state.selmon);
    let visible = state.is_visible(id);
    let c = &mut state.clients[id];

    if let Some(bw) = e.border {
        c.bw = bw;
    } else if c.is_floating || floating_layout {
        let m = state.monitors[c.mon].screen;
        if let Some(rx) = e.x {
            c.old.x = c.r.x;
            c.r.x = m.x + rx;
        }
        if let Some(ry) = e.y {
            c.old.y = c.r.y;
            c.r.y = m.y + ry;
        }
        if let Some(w) = e.w {
            c.old.w = c.r.w;
            c.r.w = w;
        }
        if let Some(h) = e.h {
            c.old.h = c.r.h;
            c.r.h = h;
        }

        if c.r.x + c.r.w > m.right() && c.is_floating {
            c.r.x = m.x + (m.w / 2 - c.outer_width() / 2);
        }
        if c.r.y + c.r.h > m.bottom() && c.is_floating {
            c.r.y = m.y + (m.h / 2 - c.outer_height() / 2);
        }

        let moved_only = (e.x.is_some() || e.y.is_some()) && e.w.is_none() && e.h.is_none();
        if moved_only {
            x.send_configure_notify(c.win, c.r, c.bw)?;
        }
        if visible {
            x.set_client_config(c.win, &[ClientConfig::Position(c.r)])?;
        }
    } else {
        x.send_configure_notify(c.win, c.r, c.bw)?;
    }

    Ok(())
}

pub(crate) fn destroy<X>(win: Xid, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    if let Some(id) = state.client_id(win) {
        state.unmanage(id, true, x)
    } else if let Some(owner) = state.swallowing_client(win) {
        state.drop_swallowed(owner, x)
    } else {
        Ok(())
    }
}

/// Focus follows the mouse, but crossing into a child window or a crossing caused by a grab does
/// not move focus.
pub(crate) fn enter<X>(p: PointerChange, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    if (!p.normal || p.inferior) && p.id != state.root {
        return Ok(());
    }

    let c = state.client_id(p.id);
    let m = match c {
        Some(id) => state.clients[id].mon,
        None => state.win_to_mon(p.id, x)?,
    };

    if m != state.selmon {
        if let Some(sel) = state.sel() {
            state.unfocus(sel, true, x)?;
        }
        state.selmon = m;
    } else if c.is_none() || c == state.sel() {
        return Ok(());
    }

    state.focus(c, x)
}

pub(crate) fn expose<X>(e: ExposeEvent, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    if e.count == 0 {
        let m = state.win_to_mon(e.id, x)?;
        state.draw_bar(m, x)?;
    }

    Ok(())
}

// Some clients try to grab focus for themselves: give it back to the selected client
pub(crate) fn focus_in<X>(win: Xid, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    match state.sel() {
        Some(sel) if state.clients[sel].win != win => state.set_focus(sel, x),
        _ => Ok(()),
    }
}

pub(crate) fn keypress<X>(code: KeyCode, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    let numlock = state.numlock;
    let actions: Vec<_> = state
        .config
        .keys
        .iter()
        .filter(|k| k.matches(code, numlock))
        .map(|k| k.action.clone())
        .collect();

    for action in actions {
        trace!(?code, ?action, "running user keybinding");
        state.run_action(action, x)?;
    }

    Ok(())
}

pub(crate) fn map_request<X>(win: Xid, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    trace!(%win, "handling new map request");
    let attrs = match x.get_window_attributes(win)? {
        Some(attrs) if !attrs.override_redirect => attrs,
        _ => return Ok(()),
    };

    if state.client_id(win).is_none() {
        state.manage(win, &attrs, x)?;
    }

    Ok(())
}

// Moving the pointer across monitors on the root window changes the selected monitor
pub(crate) fn motion<X>(e: MotionEvent, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    if e.id != state.root {
        return Ok(());
    }

    let m = state.rect_to_mon(Rect::new(e.abs.x, e.abs.y, 1, 1));
    if state.motion_mon.map_or(false, |prev| prev != m) {
        if let Some(sel) = state.sel() {
            state.unfocus(sel, true, x)?;
        }
        state.selmon = m;
        state.focus(None, x)?;
    }
    state.motion_mon = Some(m);

    Ok(())
}

pub(crate) fn property_notify<X>(e: PropertyEvent, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    if e.is_root && e.atom == Atom::WmName {
        return root_name_changed(state, x);
    }

    if e.deleted {
        return Ok(());
    }

    let id = match state.client_id(e.id) {
        Some(id) => id,
        None => return Ok(()),
    };

    match e.atom {
        Atom::WmTransientFor => {
            let c = &state.clients[id];
            if !c.is_floating {
                let parent = x.transient_for(c.win)?;
                if parent.and_then(|p| state.client_id(p)).is_some() {
                    let mon = c.mon;
                    state.clients[id].is_floating = true;
                    state.arrange(Some(mon), x)?;
                }
            }
        }

        Atom::WmNormalHints => state.update_size_hints(id, x)?,

        Atom::WmHints => {
            state.update_wm_hints(id, x)?;
            state.draw_bars(x)?;
        }

        _ => (),
    }

    if e.atom == Atom::WmName || e.atom == Atom::NetWmName {
        state.update_title(id, x)?;
        let mon = state.clients[id].mon;
        if state.monitors[mon].sel == Some(id) {
            state.draw_bar(mon, x)?;
        }
    }

    if e.atom == Atom::NetWmWindowType {
        state.update_window_type(id, x)?;
    }

    Ok(())
}

// The root window name is either a fake signal or the status text
fn root_name_changed<X: XConn>(state: &mut State, x: &X) -> Result<()> {
    let name = x.root_name()?;

    match name.as_deref().and_then(signal::parse) {
        Some(sig) => match signal::resolve(&state.config.signals, &sig) {
            Some(action) => state.run_action(action, x),
            None => Ok(()),
        },
        None => state.update_status(x),
    }
}

pub(crate) fn unmap_notify<X>(e: UnmapEvent, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    match state.client_id(e.id) {
        Some(_) if e.synthetic => x.set_wm_state(e.id, WmState::Withdrawn),
        Some(id) => state.unmanage(id, false, x),
        None => Ok(()),
    }
}
