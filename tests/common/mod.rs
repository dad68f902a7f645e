//! A recording [XConn] for driving a [WindowManager] without an X server
#![allow(dead_code)]
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};
use tagwm::{
    core::{
        bar::BarInfo,
        bindings::{KeyCode, ModMask, MouseState},
        swallow::ProcessTree,
        Config, WindowManager,
    },
    pure::geometry::{Point, Rect},
    x::{
        event::ConfigureRequest, Atom, ClientAttr, ClientConfig, CursorShape, MapState,
        WindowAttributes, WmClass, WmHints, WmNormalHints, WmState, XConn, XEvent,
    },
    Error, Result, Xid,
};

pub const ROOT: Xid = Xid(1);
pub const SCREEN: Rect = Rect {
    x: 0,
    y: 0,
    w: 1000,
    h: 600,
};

/// The requests made to the mock that tests care about
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Map(Xid),
    Unmap(Xid),
    Focus(Xid),
    FocusRoot,
    Kill(Xid),
    Protocol(Xid, Atom),
    WmState(Xid, WmState),
    Position(Xid, Rect),
    Fullscreen(Xid, bool),
    DrawBar(usize),
    Warp(Xid),
    ConfigureNotify(Xid, Rect),
    Forward(Xid),
}

/// What the mock knows about a client window
#[derive(Debug, Clone, Default)]
pub struct Window {
    pub r: Rect,
    pub class: WmClass,
    pub title: Option<String>,
    pub pid: Option<u32>,
    pub transient_for: Option<Xid>,
    pub protocols: Vec<Atom>,
    pub wm_state_atom: Option<Atom>,
    pub window_type: Option<Atom>,
    pub hints: Option<WmHints>,
    pub size_hints: Option<WmNormalHints>,
}

impl Window {
    pub fn new(class: &str) -> Self {
        Self {
            r: Rect::new(100, 100, 300, 200),
            class: WmClass {
                instance: class.to_lowercase(),
                class: class.to_string(),
            },
            title: Some(class.to_string()),
            ..Default::default()
        }
    }

    pub fn instance(mut self, instance: &str) -> Self {
        self.class.instance = instance.to_string();
        self
    }

    pub fn pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn protocol(mut self, atom: Atom) -> Self {
        self.protocols.push(atom);
        self
    }
}

#[derive(Debug)]
pub struct RecordingXConn {
    screens: Vec<Rect>,
    windows: RefCell<HashMap<Xid, Window>>,
    root_name: RefCell<Option<String>>,
    pointer: Cell<Point>,
    calls: RefCell<Vec<Call>>,
}

impl RecordingXConn {
    pub fn new(screens: Vec<Rect>) -> Self {
        Self {
            screens,
            windows: RefCell::new(HashMap::new()),
            root_name: RefCell::new(None),
            pointer: Cell::new(Point::new(0, 0)),
            calls: RefCell::new(vec![]),
        }
    }

    pub fn add_window(&self, id: u32, w: Window) {
        self.windows.borrow_mut().insert(Xid(id), w);
    }

    pub fn remove_window(&self, id: u32) {
        self.windows.borrow_mut().remove(&Xid(id));
    }

    pub fn set_root_name(&self, name: &str) {
        *self.root_name.borrow_mut() = Some(name.to_string());
    }

    pub fn set_pointer(&self, x: i32, y: i32) {
        self.pointer.set(Point::new(x, y));
    }

    pub fn pointer(&self) -> Point {
        self.pointer.get()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn with_window<T>(&self, id: Xid, f: impl FnOnce(&Window) -> T) -> Option<T> {
        self.windows.borrow().get(&id).map(f)
    }
}

impl XConn for RecordingXConn {
    fn root(&self) -> Xid {
        ROOT
    }

    fn root_geometry(&self) -> Result<Rect> {
        let w = self.screens.iter().map(|r| r.right()).max().unwrap_or(0);
        let h = self.screens.iter().map(|r| r.bottom()).max().unwrap_or(0);

        Ok(Rect::new(0, 0, w, h))
    }

    fn screen_details(&self) -> Result<Vec<Rect>> {
        Ok(self.screens.clone())
    }

    fn cursor_position(&self) -> Result<Point> {
        Ok(self.pointer.get())
    }

    fn init_wm(&self) -> Result<()> {
        Ok(())
    }

    fn cleanup(&self) -> Result<()> {
        Ok(())
    }

    fn numlock_mask(&self) -> Result<ModMask> {
        Ok(ModMask::MOD2)
    }

    fn grab_keys(&self, _: &[KeyCode]) -> Result<()> {
        Ok(())
    }

    fn ungrab_keys(&self) -> Result<()> {
        Ok(())
    }

    fn grab_buttons(&self, _: Xid, _: &[MouseState], _: bool) -> Result<()> {
        Ok(())
    }

    fn ungrab_buttons(&self, _: Xid) -> Result<()> {
        Ok(())
    }

    fn grab_pointer(&self, _: CursorShape) -> Result<bool> {
        Ok(true)
    }

    fn ungrab_pointer(&self) -> Result<()> {
        Ok(())
    }

    fn next_event(&self) -> Result<XEvent> {
        Err(Error::Custom("no more events".to_string()))
    }

    fn flush(&self) {}

    fn discard_enter_events(&self) -> Result<()> {
        Ok(())
    }

    fn existing_clients(&self) -> Result<Vec<Xid>> {
        Ok(vec![])
    }

    fn get_window_attributes(&self, id: Xid) -> Result<Option<WindowAttributes>> {
        Ok(self.with_window(id, |w| WindowAttributes {
            override_redirect: false,
            map_state: MapState::Unmapped,
            geometry: w.r,
            border_width: 0,
        }))
    }

    fn get_wm_state(&self, _: Xid) -> Result<Option<WmState>> {
        Ok(None)
    }

    fn set_wm_state(&self, id: Xid, state: WmState) -> Result<()> {
        self.record(Call::WmState(id, state));
        Ok(())
    }

    fn transient_for(&self, id: Xid) -> Result<Option<Xid>> {
        Ok(self.with_window(id, |w| w.transient_for).flatten())
    }

    fn window_class(&self, id: Xid) -> Result<Option<WmClass>> {
        Ok(self.with_window(id, |w| w.class.clone()))
    }

    fn window_title(&self, id: Xid) -> Result<Option<String>> {
        Ok(self.with_window(id, |w| w.title.clone()).flatten())
    }

    fn root_name(&self) -> Result<Option<String>> {
        Ok(self.root_name.borrow().clone())
    }

    fn size_hints(&self, id: Xid) -> Result<Option<WmNormalHints>> {
        Ok(self.with_window(id, |w| w.size_hints).flatten())
    }

    fn wm_hints(&self, id: Xid) -> Result<Option<WmHints>> {
        Ok(self.with_window(id, |w| w.hints).flatten())
    }

    fn set_wm_hints(&self, id: Xid, hints: &WmHints) -> Result<()> {
        if let Some(w) = self.windows.borrow_mut().get_mut(&id) {
            w.hints = Some(*hints);
        }

        Ok(())
    }

    fn atom_prop(&self, id: Xid, prop: Atom) -> Result<Option<Atom>> {
        Ok(self
            .with_window(id, |w| match prop {
                Atom::NetWmState => w.wm_state_atom,
                Atom::NetWmWindowType => w.window_type,
                _ => None,
            })
            .flatten())
    }

    fn supports_protocol(&self, id: Xid, protocol: Atom) -> Result<bool> {
        Ok(self
            .with_window(id, |w| w.protocols.contains(&protocol))
            .unwrap_or(false))
    }

    fn send_protocol_message(&self, id: Xid, protocol: Atom) -> Result<()> {
        self.record(Call::Protocol(id, protocol));
        Ok(())
    }

    fn window_pid(&self, id: Xid) -> Result<Option<u32>> {
        Ok(self.with_window(id, |w| w.pid).flatten())
    }

    fn set_fullscreen_state(&self, id: Xid, fullscreen: bool) -> Result<()> {
        self.record(Call::Fullscreen(id, fullscreen));
        Ok(())
    }

    fn set_active_window(&self, _: Option<Xid>) -> Result<()> {
        Ok(())
    }

    fn set_client_list(&self, _: &[Xid]) -> Result<()> {
        Ok(())
    }

    fn focus(&self, id: Xid) -> Result<()> {
        self.record(Call::Focus(id));
        Ok(())
    }

    fn focus_root(&self) -> Result<()> {
        self.record(Call::FocusRoot);
        Ok(())
    }

    fn map(&self, id: Xid) -> Result<()> {
        self.record(Call::Map(id));
        Ok(())
    }

    fn unmap(&self, id: Xid) -> Result<()> {
        self.record(Call::Unmap(id));
        Ok(())
    }

    fn kill(&self, id: Xid) -> Result<()> {
        self.record(Call::Kill(id));
        Ok(())
    }

    fn set_client_config(&self, id: Xid, data: &[ClientConfig]) -> Result<()> {
        for d in data {
            if let ClientConfig::Position(r) = d {
                if let Some(w) = self.windows.borrow_mut().get_mut(&id) {
                    w.r = *r;
                }
                self.record(Call::Position(id, *r));
            }
        }

        Ok(())
    }

    fn set_client_attributes(&self, _: Xid, _: &[ClientAttr]) -> Result<()> {
        Ok(())
    }

    fn forward_configure_request(&self, e: &ConfigureRequest) -> Result<()> {
        self.record(Call::Forward(e.id));
        Ok(())
    }

    fn send_configure_notify(&self, id: Xid, r: Rect, _: i32) -> Result<()> {
        self.record(Call::ConfigureNotify(id, r));
        Ok(())
    }

    fn warp_pointer(&self, id: Xid, x: i32, y: i32) -> Result<()> {
        let (dx, dy) = if id == ROOT {
            (0, 0)
        } else {
            self.with_window(id, |w| (w.r.x, w.r.y)).unwrap_or((0, 0))
        };
        self.pointer.set(Point::new(x + dx, y + dy));
        self.record(Call::Warp(id));

        Ok(())
    }

    fn bar_window(&self, _: usize) -> Option<Xid> {
        None
    }

    fn draw_bar(&self, bar: &BarInfo) -> Result<()> {
        self.record(Call::DrawBar(bar.monitor));
        Ok(())
    }

    fn remove_bar(&self, _: usize) -> Result<()> {
        Ok(())
    }

    fn resource_database(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// A fixed process table standing in for /proc
#[derive(Debug, Default)]
pub struct Processes(pub HashMap<u32, u32>);

impl ProcessTree for Processes {
    fn parent(&self, pid: u32) -> Option<u32> {
        self.0.get(&pid).copied()
    }
}

pub fn wm_with_screens(screens: Vec<Rect>) -> WindowManager<RecordingXConn> {
    wm_with_processes(screens, Processes::default())
}

pub fn wm_with_processes(screens: Vec<Rect>, procs: Processes) -> WindowManager<RecordingXConn> {
    let conn = RecordingXConn::new(screens);
    let mut wm = WindowManager::new_with_process_tree(Config::default(), conn, Box::new(procs))
        .expect("valid config");
    wm.setup().expect("setup to succeed");

    wm
}

/// Make a window known to the mock and ask for it to be mapped
pub fn map_window(wm: &mut WindowManager<RecordingXConn>, id: u32, w: Window) {
    wm.conn().add_window(id, w);
    wm.handle_xevent(XEvent::MapRequest(Xid(id)))
        .expect("map request to be handled");
}

/// The windows of a monitor in insertion order
pub fn window_order(wm: &WindowManager<RecordingXConn>, monitor: usize) -> Vec<u32> {
    let s = wm.state();

    s.monitors()[monitor]
        .clients()
        .iter()
        .filter_map(|&id| s.client(id))
        .map(|c| c.id().0)
        .collect()
}
