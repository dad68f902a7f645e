//! The x11rb backed implementation of [XConn]
use crate::{
    core::{
        bar::BarInfo,
        bindings::{Click, KeyCode, ModMask, MouseState},
    },
    pure::geometry::{Point, Rect},
    x::{
        atom::EWMH_SUPPORTED_ATOMS, event::ConfigureRequest, Atom, ClientAttr, ClientConfig,
        CursorShape, MapState, WindowAttributes, WmClass, WmHints, WmNormalHints, WmState, XConn,
        XEvent,
    },
    x11rb::{
        atom::Atoms,
        bar::Bars,
        conversions::{convert_event, from_stack_mode},
        keyboard::{numlock_mask, KeyboardMap},
        Result as X11Result, X11rbError,
    },
    Error, Result, Xid,
};
use std::{cell::RefCell, collections::VecDeque};
use tracing::{debug, warn};
use x11rb::{
    connection::Connection,
    errors::ReplyError,
    properties,
    protocol::{
        randr::ConnectionExt as _,
        res::{ClientIdMask, ClientIdSpec, ConnectionExt as _},
        xproto::{
            self, Allow, AtomEnum, ButtonIndex, ChangeWindowAttributesAux, ClientMessageEvent,
            CloseDown, ConfigureNotifyEvent, ConfigureWindowAux, ConnectionExt as _,
            CreateWindowAux, EventMask, Grab, GrabMode, GrabStatus, InputFocus, PropMode,
            StackMode, Window, WindowClass,
        },
        ErrorKind, Event,
    },
    wrapper::ConnectionExt as _,
    CURRENT_TIME, NONE,
};

// in 32 bit units
const RESOURCE_DB_MAX_LEN: u32 = 1 << 16;

const XC_FLEUR: u16 = 52;
const XC_LEFT_PTR: u16 = 68;
const XC_SIZING: u16 = 120;

fn root_event_mask() -> EventMask {
    EventMask::SUBSTRUCTURE_REDIRECT
        | EventMask::SUBSTRUCTURE_NOTIFY
        | EventMask::BUTTON_PRESS
        | EventMask::POINTER_MOTION
        | EventMask::ENTER_WINDOW
        | EventMask::LEAVE_WINDOW
        | EventMask::STRUCTURE_NOTIFY
        | EventMask::PROPERTY_CHANGE
}

#[derive(Debug, Clone, Copy)]
struct Cursors {
    font: u32,
    normal: u32,
    moving: u32,
    resize: u32,
}

impl Cursors {
    fn new(conn: &impl Connection) -> X11Result<Self> {
        let font = conn.generate_id()?;
        conn.open_font(font, b"cursor")?;

        let glyph = |shape: u16| -> X11Result<u32> {
            let id = conn.generate_id()?;
            conn.create_glyph_cursor(
                id, font, font, shape, shape + 1, 0, 0, 0, 0xffff, 0xffff, 0xffff,
            )?;
            Ok(id)
        };

        Ok(Self {
            font,
            normal: glyph(XC_LEFT_PTR)?,
            moving: glyph(XC_FLEUR)?,
            resize: glyph(XC_SIZING)?,
        })
    }

    fn get(&self, shape: CursorShape) -> u32 {
        match shape {
            CursorShape::Normal => self.normal,
            CursorShape::Move => self.moving,
            CursorShape::Resize => self.resize,
        }
    }
}

// Requests against windows that have already been destroyed fail with BadWindow
fn ignore_bad_window<T>(res: std::result::Result<T, ReplyError>) -> X11Result<Option<T>> {
    match res {
        Ok(t) => Ok(Some(t)),
        Err(ReplyError::X11Error(e)) if e.error_kind == ErrorKind::Window => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn text_from_bytes(raw: &[u8]) -> Option<String> {
    let s = String::from_utf8_lossy(raw);
    let s = s.trim_end_matches('\0');

    (!s.is_empty()).then(|| s.to_string())
}

/// Handles communication with an X server via the x11rb crate.
#[derive(Debug)]
pub struct X11rbConnection<C: Connection> {
    conn: C,
    root: Window,
    screen_num: usize,
    check_win: Window,
    atoms: Atoms,
    cursors: Cursors,
    keyboard: RefCell<KeyboardMap>,
    bars: Bars,
    /// Events read while draining crossing events that still need handling
    pending: RefCell<VecDeque<Event>>,
}

impl<C: Connection> X11rbConnection<C> {
    /// Create a new [X11rbConnection] wrapping an existing x11rb [Connection] for the given
    /// screen.
    pub fn new_for_connection(conn: C, screen_num: usize) -> Result<Self> {
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|s| s.root)
            .ok_or(X11rbError::UnknownScreen(screen_num))?;

        let atoms = Atoms::new(&conn)?;
        let keyboard = KeyboardMap::query(&conn)?;
        let cursors = Cursors::new(&conn)?;
        let bars = Bars::new(&conn, screen_num, cursors.normal)?;

        let check_win = conn.generate_id().map_err(X11rbError::from)?;
        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            check_win,
            root,
            0,
            0,
            1,
            1,
            0,
            WindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &CreateWindowAux::new(),
        )?;

        Ok(Self {
            conn,
            root,
            screen_num,
            check_win,
            atoms,
            cursors,
            keyboard: RefCell::new(keyboard),
            bars,
            pending: RefCell::new(VecDeque::new()),
        })
    }

    /// Get a handle on the underlying connection
    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub(crate) fn root_id(&self) -> Window {
        self.root
    }

    pub(crate) fn known_atom(&self, atom: Atom) -> u32 {
        self.atoms.known(atom)
    }

    pub(crate) fn atom(&self, value: u32) -> Option<Atom> {
        self.atoms.lookup(value)
    }

    pub(crate) fn keysym(&self, code: u8) -> Option<u32> {
        self.keyboard.borrow().keysym(code)
    }

    pub(crate) fn refresh_keyboard(&self) -> Result<()> {
        let map = KeyboardMap::query(&self.conn)?;
        *self.keyboard.borrow_mut() = map;

        Ok(())
    }

    pub(crate) fn replay_pointer(&self) -> Result<()> {
        self.conn.allow_events(Allow::REPLAY_POINTER, CURRENT_TIME)?;

        Ok(())
    }

    pub(crate) fn bar_click(&self, win: Window, x: i32) -> Option<(usize, Click, Option<usize>)> {
        self.bars.click(win, x)
    }

    fn prop32(&self, id: Xid, prop: u32, ty: impl Into<u32>, len: u32) -> Result<Option<Vec<u32>>> {
        let cookie = self.conn.get_property(false, *id, prop, ty, 0, len)?;
        let vals = ignore_bad_window(cookie.reply())?
            .and_then(|r| r.value32().map(|v| v.collect::<Vec<_>>()))
            .filter(|v| !v.is_empty());

        Ok(vals)
    }

    fn text_prop(&self, id: Xid, prop: u32, ty: impl Into<u32>, len: u32) -> Result<Option<String>> {
        let cookie = self.conn.get_property(false, *id, prop, ty, 0, len)?;
        let text = ignore_bad_window(cookie.reply())?.and_then(|r| text_from_bytes(&r.value));

        Ok(text)
    }

    fn replace_prop32(&self, id: Window, prop: Atom, ty: impl Into<u32>, data: &[u32]) -> Result<()> {
        self.conn
            .change_property32(PropMode::REPLACE, id, self.known_atom(prop), ty, data)?;

        Ok(())
    }
}

impl<C: Connection> XConn for X11rbConnection<C> {
    fn root(&self) -> Xid {
        Xid(self.root)
    }

    fn root_geometry(&self) -> Result<Rect> {
        let s = &self.conn.setup().roots[self.screen_num];

        Ok(Rect::new(
            0,
            0,
            s.width_in_pixels as i32,
            s.height_in_pixels as i32,
        ))
    }

    fn screen_details(&self) -> Result<Vec<Rect>> {
        let resources = match self.conn.randr_get_screen_resources(self.root)?.reply() {
            Ok(r) => r,
            Err(error) => {
                warn!(%error, "unable to query RandR: treating the root window as one screen");
                return Ok(vec![self.root_geometry()?]);
            }
        };

        // send every crtc query before waiting on the replies
        let cookies = resources
            .crtcs
            .iter()
            .map(|&c| self.conn.randr_get_crtc_info(c, resources.config_timestamp))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let screens = cookies
            .into_iter()
            .flat_map(|cookie| cookie.reply().ok())
            .filter(|r| r.width > 0 && r.height > 0)
            .map(|r| Rect::new(r.x as i32, r.y as i32, r.width as i32, r.height as i32))
            .collect();

        Ok(screens)
    }

    fn cursor_position(&self) -> Result<Point> {
        let reply = self.conn.query_pointer(self.root)?.reply()?;

        Ok(Point::new(reply.root_x as i32, reply.root_y as i32))
    }

    fn init_wm(&self) -> Result<()> {
        let aux = ChangeWindowAttributesAux::new()
            .event_mask(root_event_mask())
            .cursor(self.cursors.normal);

        match self.conn.change_window_attributes(self.root, &aux)?.check() {
            Err(ReplyError::X11Error(e)) if e.error_kind == ErrorKind::Access => {
                return Err(Error::OtherWmRunning)
            }
            res => res?,
        }

        let utf8 = self.known_atom(Atom::UTF8String);
        self.replace_prop32(self.check_win, Atom::NetSupportingWmCheck, AtomEnum::WINDOW, &[
            self.check_win,
        ])?;
        self.conn.change_property8(
            PropMode::REPLACE,
            self.check_win,
            self.known_atom(Atom::NetWmName),
            utf8,
            b"tagwm",
        )?;
        self.replace_prop32(self.root, Atom::NetSupportingWmCheck, AtomEnum::WINDOW, &[
            self.check_win,
        ])?;

        let supported: Vec<u32> = EWMH_SUPPORTED_ATOMS
            .iter()
            .map(|&a| self.known_atom(a))
            .collect();
        self.replace_prop32(self.root, Atom::NetSupported, AtomEnum::ATOM, &supported)?;
        self.conn
            .delete_property(self.root, self.known_atom(Atom::NetClientList))?;

        debug!(root = self.root, "registered as the window manager");

        Ok(())
    }

    fn cleanup(&self) -> Result<()> {
        self.bars.free(&self.conn)?;

        let c = self.cursors;
        for cursor in [c.normal, c.moving, c.resize] {
            self.conn.free_cursor(cursor)?;
        }
        self.conn.close_font(c.font)?;
        self.conn.destroy_window(self.check_win)?;

        self.conn
            .set_input_focus(InputFocus::POINTER_ROOT, InputFocus::POINTER_ROOT, CURRENT_TIME)?;
        self.conn
            .delete_property(self.root, self.known_atom(Atom::NetActiveWindow))?;
        self.conn.flush()?;

        Ok(())
    }

    fn numlock_mask(&self) -> Result<ModMask> {
        let mask = numlock_mask(&self.conn, &self.keyboard.borrow())?;

        Ok(mask)
    }

    fn grab_keys(&self, keys: &[KeyCode]) -> Result<()> {
        self.conn.ungrab_key(Grab::ANY, self.root, xproto::ModMask::ANY)?;

        let keyboard = self.keyboard.borrow();
        for k in keys {
            for code in keyboard.keycodes(k.keysym) {
                self.conn.grab_key(
                    true,
                    self.root,
                    xproto::ModMask::from(k.mask.bits()),
                    code,
                    GrabMode::ASYNC,
                    GrabMode::ASYNC,
                )?;
            }
        }

        Ok(())
    }

    fn ungrab_keys(&self) -> Result<()> {
        self.conn.ungrab_key(Grab::ANY, self.root, xproto::ModMask::ANY)?;

        Ok(())
    }

    fn grab_buttons(&self, client: Xid, buttons: &[MouseState], focused: bool) -> Result<()> {
        let mask = EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE;
        self.conn
            .ungrab_button(ButtonIndex::ANY, *client, xproto::ModMask::ANY)?;

        if !focused {
            self.conn.grab_button(
                false,
                *client,
                mask,
                GrabMode::SYNC,
                GrabMode::SYNC,
                NONE,
                NONE,
                ButtonIndex::ANY,
                xproto::ModMask::ANY,
            )?;
        }

        for b in buttons {
            self.conn.grab_button(
                false,
                *client,
                mask,
                GrabMode::ASYNC,
                GrabMode::SYNC,
                NONE,
                NONE,
                ButtonIndex::from(u8::from(b.button)),
                xproto::ModMask::from(b.mask.bits()),
            )?;
        }

        Ok(())
    }

    fn ungrab_buttons(&self, client: Xid) -> Result<()> {
        self.conn
            .ungrab_button(ButtonIndex::ANY, *client, xproto::ModMask::ANY)?;

        Ok(())
    }

    fn grab_pointer(&self, cursor: CursorShape) -> Result<bool> {
        let mask = EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION;
        let reply = self
            .conn
            .grab_pointer(
                false,
                self.root,
                mask,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                NONE,
                self.cursors.get(cursor),
                CURRENT_TIME,
            )?
            .reply()?;

        Ok(reply.status == GrabStatus::SUCCESS)
    }

    fn ungrab_pointer(&self) -> Result<()> {
        self.conn.ungrab_pointer(CURRENT_TIME)?;

        Ok(())
    }

    fn next_event(&self) -> Result<XEvent> {
        loop {
            let queued = self.pending.borrow_mut().pop_front();
            let event = match queued {
                Some(event) => event,
                None => self.conn.wait_for_event()?,
            };

            if let Some(event) = convert_event(self, event)? {
                return Ok(event);
            }
        }
    }

    fn flush(&self) {
        if let Err(error) = self.conn.flush() {
            warn!(%error, "unable to flush X connection");
        }
    }

    fn discard_enter_events(&self) -> Result<()> {
        // round trip so that every crossing caused by earlier requests has arrived
        self.conn.get_input_focus()?.reply()?;

        while let Some(event) = self.conn.poll_for_event()? {
            if !matches!(event, Event::EnterNotify(_)) {
                self.pending.borrow_mut().push_back(event);
            }
        }

        Ok(())
    }

    fn existing_clients(&self) -> Result<Vec<Xid>> {
        let reply = self.conn.query_tree(self.root)?.reply()?;

        Ok(reply.children.into_iter().map(Xid).collect())
    }

    fn get_window_attributes(&self, id: Xid) -> Result<Option<WindowAttributes>> {
        let attrs = self.conn.get_window_attributes(*id)?;
        let geom = self.conn.get_geometry(*id)?;

        let (a, g) = match (ignore_bad_window(attrs.reply())?, ignore_bad_window(geom.reply())?) {
            (Some(a), Some(g)) => (a, g),
            _ => return Ok(None),
        };

        let map_state = match a.map_state {
            xproto::MapState::VIEWABLE => MapState::Viewable,
            xproto::MapState::UNVIEWABLE => MapState::UnViewable,
            _ => MapState::Unmapped,
        };

        Ok(Some(WindowAttributes {
            override_redirect: a.override_redirect,
            map_state,
            geometry: Rect::new(g.x as i32, g.y as i32, g.width as i32, g.height as i32),
            border_width: g.border_width as i32,
        }))
    }

    fn get_wm_state(&self, id: Xid) -> Result<Option<WmState>> {
        let state = self.known_atom(Atom::WmState);
        let vals = self.prop32(id, state, state, 2)?;

        Ok(vals.and_then(|v| match v[0] {
            0 => Some(WmState::Withdrawn),
            1 => Some(WmState::Normal),
            3 => Some(WmState::Iconic),
            _ => None,
        }))
    }

    fn set_wm_state(&self, id: Xid, state: WmState) -> Result<()> {
        let prop = self.known_atom(Atom::WmState);
        self.conn
            .change_property32(PropMode::REPLACE, *id, prop, prop, &[state.as_u32(), NONE])?;

        Ok(())
    }

    fn transient_for(&self, id: Xid) -> Result<Option<Xid>> {
        let vals = self.prop32(id, AtomEnum::WM_TRANSIENT_FOR.into(), AtomEnum::WINDOW, 1)?;

        Ok(vals.map(|v| v[0]).filter(|&w| w != NONE).map(Xid))
    }

    fn window_class(&self, id: Xid) -> Result<Option<WmClass>> {
        let class = properties::WmClass::get(&self.conn, *id)?.reply_unchecked()?;

        Ok(class.map(|c| WmClass {
            instance: String::from_utf8_lossy(c.instance()).into_owned(),
            class: String::from_utf8_lossy(c.class()).into_owned(),
        }))
    }

    fn window_title(&self, id: Xid) -> Result<Option<String>> {
        let net_name = self.known_atom(Atom::NetWmName);
        let utf8 = self.known_atom(Atom::UTF8String);

        match self.text_prop(id, net_name, utf8, 256)? {
            Some(title) => Ok(Some(title)),
            None => self.text_prop(id, AtomEnum::WM_NAME.into(), AtomEnum::ANY, 256),
        }
    }

    fn root_name(&self) -> Result<Option<String>> {
        self.text_prop(Xid(self.root), AtomEnum::WM_NAME.into(), AtomEnum::ANY, 256)
    }

    fn size_hints(&self, id: Xid) -> Result<Option<WmNormalHints>> {
        let vals = self.prop32(id, AtomEnum::WM_NORMAL_HINTS.into(), AtomEnum::WM_SIZE_HINTS, 18)?;

        // older clients set fewer fields than the current layout
        Ok(vals.and_then(|mut v| {
            v.resize(18, 0);
            WmNormalHints::try_from_bytes(&v).ok()
        }))
    }

    fn wm_hints(&self, id: Xid) -> Result<Option<WmHints>> {
        let vals = self.prop32(id, AtomEnum::WM_HINTS.into(), AtomEnum::WM_HINTS, 9)?;

        Ok(vals.and_then(|mut v| {
            v.resize(9, 0);
            WmHints::try_from_bytes(&v).ok()
        }))
    }

    fn set_wm_hints(&self, id: Xid, hints: &WmHints) -> Result<()> {
        self.conn.change_property32(
            PropMode::REPLACE,
            *id,
            AtomEnum::WM_HINTS,
            AtomEnum::WM_HINTS,
            &hints.as_bytes(),
        )?;

        Ok(())
    }

    fn atom_prop(&self, id: Xid, prop: Atom) -> Result<Option<Atom>> {
        let vals = self.prop32(id, self.known_atom(prop), AtomEnum::ATOM, 1)?;

        Ok(vals.and_then(|v| self.atom(v[0])))
    }

    fn supports_protocol(&self, id: Xid, protocol: Atom) -> Result<bool> {
        let protocols = self.known_atom(Atom::WmProtocols);
        let target = self.known_atom(protocol);
        let vals = self.prop32(id, protocols, AtomEnum::ATOM, 1024)?;

        Ok(vals.map_or(false, |v| v.contains(&target)))
    }

    fn send_protocol_message(&self, id: Xid, protocol: Atom) -> Result<()> {
        let event = ClientMessageEvent::new(
            32,
            *id,
            self.known_atom(Atom::WmProtocols),
            [self.known_atom(protocol), CURRENT_TIME, 0, 0, 0],
        );
        self.conn.send_event(false, *id, EventMask::NO_EVENT, event)?;

        Ok(())
    }

    fn window_pid(&self, id: Xid) -> Result<Option<u32>> {
        let spec = ClientIdSpec {
            client: *id,
            mask: ClientIdMask::LOCAL_CLIENT_PID,
        };

        let reply = match self.conn.res_query_client_ids(&[spec])?.reply() {
            Ok(reply) => reply,
            Err(error) => {
                debug!(%error, %id, "unable to query client pid");
                return Ok(None);
            }
        };

        Ok(reply
            .ids
            .iter()
            .find(|v| v.spec.mask == ClientIdMask::LOCAL_CLIENT_PID)
            .and_then(|v| v.value.first().copied()))
    }

    fn set_fullscreen_state(&self, id: Xid, fullscreen: bool) -> Result<()> {
        let data = if fullscreen {
            vec![self.known_atom(Atom::NetWmStateFullscreen)]
        } else {
            vec![]
        };

        self.replace_prop32(*id, Atom::NetWmState, AtomEnum::ATOM, &data)
    }

    fn set_active_window(&self, id: Option<Xid>) -> Result<()> {
        match id {
            Some(id) => self.replace_prop32(self.root, Atom::NetActiveWindow, AtomEnum::WINDOW, &[*id]),
            None => {
                self.conn
                    .delete_property(self.root, self.known_atom(Atom::NetActiveWindow))?;
                Ok(())
            }
        }
    }

    fn set_client_list(&self, clients: &[Xid]) -> Result<()> {
        let ids: Vec<u32> = clients.iter().map(|c| **c).collect();

        self.replace_prop32(self.root, Atom::NetClientList, AtomEnum::WINDOW, &ids)
    }

    fn focus(&self, id: Xid) -> Result<()> {
        self.conn
            .set_input_focus(InputFocus::POINTER_ROOT, *id, CURRENT_TIME)?;

        Ok(())
    }

    fn focus_root(&self) -> Result<()> {
        self.conn
            .set_input_focus(InputFocus::POINTER_ROOT, self.root, CURRENT_TIME)?;

        Ok(())
    }

    fn map(&self, id: Xid) -> Result<()> {
        self.conn.map_window(*id)?;

        Ok(())
    }

    fn unmap(&self, id: Xid) -> Result<()> {
        self.conn.unmap_window(*id)?;

        Ok(())
    }

    fn kill(&self, id: Xid) -> Result<()> {
        self.conn.grab_server()?;
        self.conn.set_close_down_mode(CloseDown::DESTROY_ALL)?;
        self.conn.kill_client(*id)?;
        self.conn.ungrab_server()?;

        Ok(())
    }

    fn set_client_config(&self, id: Xid, data: &[ClientConfig]) -> Result<()> {
        let aux = data.iter().fold(ConfigureWindowAux::new(), |aux, c| match *c {
            ClientConfig::BorderPx(px) => aux.border_width(px.max(0) as u32),
            ClientConfig::Position(r) => aux
                .x(r.x)
                .y(r.y)
                .width(r.w.max(1) as u32)
                .height(r.h.max(1) as u32),
            ClientConfig::StackBelow(sibling) => aux.sibling(*sibling).stack_mode(StackMode::BELOW),
            ClientConfig::StackTop => aux.stack_mode(StackMode::ABOVE),
            ClientConfig::StackBottom => aux.stack_mode(StackMode::BELOW),
        });

        self.conn.configure_window(*id, &aux)?;

        Ok(())
    }

    fn set_client_attributes(&self, id: Xid, attrs: &[ClientAttr]) -> Result<()> {
        let client_mask = EventMask::ENTER_WINDOW
            | EventMask::FOCUS_CHANGE
            | EventMask::PROPERTY_CHANGE
            | EventMask::STRUCTURE_NOTIFY;

        let aux = attrs
            .iter()
            .fold(ChangeWindowAttributesAux::new(), |aux, a| match *a {
                ClientAttr::BorderColor(c) => aux.border_pixel(c.rgb_u32()),
                ClientAttr::ClientEventMask => aux.event_mask(client_mask),
            });

        self.conn.change_window_attributes(*id, &aux)?;

        Ok(())
    }

    fn forward_configure_request(&self, req: &ConfigureRequest) -> Result<()> {
        let mut aux = ConfigureWindowAux::new();
        if let Some(x) = req.x {
            aux = aux.x(x);
        }
        if let Some(y) = req.y {
            aux = aux.y(y);
        }
        if let Some(w) = req.w {
            aux = aux.width(w.max(1) as u32);
        }
        if let Some(h) = req.h {
            aux = aux.height(h.max(1) as u32);
        }
        if let Some(bw) = req.border {
            aux = aux.border_width(bw.max(0) as u32);
        }
        if let Some(sibling) = req.sibling {
            aux = aux.sibling(*sibling);
        }
        if let Some(mode) = req.stack_mode {
            aux = aux.stack_mode(from_stack_mode(mode));
        }

        self.conn.configure_window(*req.id, &aux)?;

        Ok(())
    }

    fn send_configure_notify(&self, id: Xid, r: Rect, border: i32) -> Result<()> {
        let event = ConfigureNotifyEvent {
            response_type: xproto::CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event: *id,
            window: *id,
            above_sibling: NONE,
            x: r.x as i16,
            y: r.y as i16,
            width: r.w.max(1) as u16,
            height: r.h.max(1) as u16,
            border_width: border.max(0) as u16,
            override_redirect: false,
        };
        self.conn
            .send_event(false, *id, EventMask::STRUCTURE_NOTIFY, event)?;

        Ok(())
    }

    fn warp_pointer(&self, id: Xid, x: i32, y: i32) -> Result<()> {
        self.conn
            .warp_pointer(NONE, *id, 0, 0, 0, 0, x as i16, y as i16)?;

        Ok(())
    }

    fn bar_window(&self, monitor: usize) -> Option<Xid> {
        self.bars.window(monitor)
    }

    fn draw_bar(&self, bar: &BarInfo) -> Result<()> {
        self.bars.draw(&self.conn, bar)?;

        Ok(())
    }

    fn remove_bar(&self, monitor: usize) -> Result<()> {
        self.bars.remove(&self.conn, monitor)?;

        Ok(())
    }

    fn resource_database(&self) -> Result<Option<String>> {
        self.text_prop(
            Xid(self.root),
            AtomEnum::RESOURCE_MANAGER.into(),
            AtomEnum::STRING,
            RESOURCE_DB_MAX_LEN,
        )
    }
}
