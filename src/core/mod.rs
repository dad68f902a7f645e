//! Core data structures and user facing functionality for the window manager
use crate::{
    core::{
        actions::Action,
        bindings::ModMask,
        client::Client,
        drag::Drag,
        monitor::Monitor,
        swallow::{ProcFs, ProcessTree},
    },
    pure::{geometry::Rect, Arena, Key},
    x::{XConn, XEvent},
    Error, Result, Xid,
};
use nix::sys::signal::{signal, SigHandler, Signal};
use std::{collections::VecDeque, fmt};
use tracing::{debug, error, info, span, trace, Level};

pub mod actions;
mod arrange;
pub mod bar;
pub mod bindings;
pub mod client;
pub mod config;
mod drag;
mod focus;
mod handle;
pub mod keysyms;
pub mod layout;
mod manage;
pub mod monitor;
pub mod rules;
pub mod signal;
pub mod swallow;
mod tags;

#[doc(inline)]
pub use config::Config;

/// The version of the window manager
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A stable handle to a managed [Client]
pub type ClientId = Key;

/// Mutable internal state for the window manager
pub struct State {
    pub(crate) config: Config,
    pub(crate) clients: Arena<Client>,
    pub(crate) monitors: Vec<Monitor>,
    pub(crate) selmon: usize,
    pub(crate) root: Xid,
    /// Size of the root window
    pub(crate) screen: Rect,
    pub(crate) numlock: ModMask,
    pub(crate) gaps_enabled: bool,
    pub(crate) prev_zoom: Option<ClientId>,
    pub(crate) status: String,
    pub(crate) running: bool,
    pub(crate) drag: Option<Drag>,
    /// Events put aside while a drag is in progress
    pub(crate) deferred: VecDeque<XEvent>,
    /// The monitor under the pointer when the root window last saw motion
    pub(crate) motion_mon: Option<usize>,
    pub(crate) procs: Box<dyn ProcessTree>,
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("config", &self.config)
            .field("clients", &self.clients)
            .field("monitors", &self.monitors)
            .field("selmon", &self.selmon)
            .field("root", &self.root)
            .field("screen", &self.screen)
            .field("gaps_enabled", &self.gaps_enabled)
            .field("status", &self.status)
            .field("drag", &self.drag)
            .finish()
    }
}

impl State {
    pub(crate) fn new(config: Config, root: Xid, screen: Rect, procs: Box<dyn ProcessTree>) -> Self {
        Self {
            gaps_enabled: config.gaps_enabled,
            config,
            clients: Arena::new(),
            monitors: vec![],
            selmon: 0,
            root,
            screen,
            numlock: ModMask::empty(),
            prev_zoom: None,
            status: String::new(),
            running: false,
            drag: None,
            deferred: VecDeque::new(),
            motion_mon: None,
            procs,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All monitors in order
    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    /// The index of the selected monitor
    pub fn selected_monitor(&self) -> usize {
        self.selmon
    }

    /// Look up a client by its handle
    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(id)
    }

    /// Iterate over every managed client
    pub fn clients(&self) -> impl Iterator<Item = (ClientId, &Client)> {
        self.clients.iter()
    }

    /// The handle of the client managing a given window
    pub fn client_id(&self, win: Xid) -> Option<ClientId> {
        self.clients.find_key(|c| c.win == win)
    }

    /// The client managing a given window
    pub fn client_for(&self, win: Xid) -> Option<&Client> {
        self.client_id(win).and_then(|id| self.clients.get(id))
    }

    /// The window of the selected client on the selected monitor
    pub fn focused_client(&self) -> Option<Xid> {
        self.monitors
            .get(self.selmon)
            .and_then(|m| m.sel)
            .and_then(|id| self.clients.get(id))
            .map(|c| c.win)
    }

    /// The current status text
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether gaps are currently enabled
    pub fn gaps_enabled(&self) -> bool {
        self.gaps_enabled
    }

    /// Whether a client is shown under the current tags of its monitor
    pub(crate) fn is_visible(&self, id: ClientId) -> bool {
        match self.clients.get(id) {
            Some(c) => self.monitors[c.mon].shows(c),
            None => false,
        }
    }

    /// The visible, non-floating clients of a monitor in insertion order
    pub(crate) fn tiled(&self, m: usize) -> Vec<ClientId> {
        self.monitors[m]
            .clients
            .iter()
            .copied()
            .filter(|&id| self.is_visible(id) && !self.clients[id].is_floating)
            .collect()
    }

    /// The visible clients of a monitor in insertion order
    pub(crate) fn visible(&self, m: usize) -> Vec<ClientId> {
        self.monitors[m]
            .clients
            .iter()
            .copied()
            .filter(|&id| self.is_visible(id))
            .collect()
    }

    /// Whether the active layout of a monitor arranges clients
    pub(crate) fn is_arranged(&self, m: usize) -> bool {
        self.config
            .layouts
            .get(self.monitors[m].layout())
            .map_or(false, |l| l.arrange.is_some())
    }

    pub(crate) fn sel(&self) -> Option<ClientId> {
        self.monitors[self.selmon].sel
    }

    /// Look up a client's window, failing if the handle is stale
    pub(crate) fn win(&self, id: ClientId) -> Result<Xid> {
        self.clients
            .get(id)
            .map(|c| c.win)
            .ok_or_else(|| Error::Custom(format!("stale client handle {id}")))
    }
}

/// A top level struct holding all of the state required to run as an X11 window manager.
///
/// This allows for final configuration to be carried out before entering the main event loop.
#[derive(Debug)]
pub struct WindowManager<X>
where
    X: XConn,
{
    x: X,
    state: State,
}

impl<X> WindowManager<X>
where
    X: XConn,
{
    /// Construct a new [WindowManager] with the provided config and X connection.
    ///
    /// Fails if another window manager is already running or if there are no screens.
    pub fn new(config: Config, x: X) -> Result<Self> {
        Self::new_with_process_tree(config, x, Box::new(ProcFs))
    }

    /// Construct a new [WindowManager] that resolves process ancestry for window swallowing
    /// through the given [ProcessTree].
    pub fn new_with_process_tree(
        config: Config,
        x: X,
        procs: Box<dyn ProcessTree>,
    ) -> Result<Self> {
        config.validate()?;
        x.init_wm()?;

        let root = x.root();
        let screen = x.root_geometry()?;
        let mut state = State::new(config, root, screen, procs);
        state.update_geom(&x)?;

        if state.monitors.is_empty() {
            return Err(Error::NoScreens);
        }

        Ok(Self { x, state })
    }

    /// The current window manager state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// The X connection being used by this window manager
    pub fn conn(&self) -> &X {
        &self.x
    }

    /// Grab bindings, manage existing windows and get ready to process events.
    ///
    /// [WindowManager::run] calls this before entering the event loop.
    pub fn setup(&mut self) -> Result<()> {
        let Self { x, state } = self;

        info!(n_monitors = state.monitors.len(), "setting up");
        state.running = true;
        state.draw_bars(x)?;
        state.update_status(x)?;
        state.grab_keys(x)?;
        state.focus(None, x)?;
        state.scan(x)?;
        x.flush();

        Ok(())
    }

    /// Start the window manager and run it until told to exit.
    ///
    /// Errors from individual event handlers are logged and survived. Failing to read the next
    /// event from the X server is fatal.
    pub fn run(mut self) -> Result<()> {
        // ignore SIGCHLD so that spawned programs are reaped automatically
        debug!("ignoring SIGCHLD");
        if let Err(e) = unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) } {
            return Err(Error::Custom(format!("unable to set signal handler: {e}")));
        }

        self.setup()?;

        while self.state.running {
            let event = self.x.next_event()?;
            let span = span!(target: "tagwm", Level::DEBUG, "XEvent", %event);
            let _enter = span.enter();
            trace!(details = ?event, "event details");

            if let Err(error) = self.handle_xevent(event) {
                error!(%error, "error handling XEvent");
            }
            self.x.flush();
        }

        info!("shutting down");
        self.state.cleanup(&self.x)
    }

    /// Process a single event from the X server.
    pub fn handle_xevent(&mut self, event: XEvent) -> Result<()> {
        let Self { x, state } = self;

        if state.drag.is_some() {
            return drag::handle_event(event, state, x);
        }

        handle::dispatch(event, state, x)?;

        // events put aside by a drag that has just finished
        while state.drag.is_none() {
            match state.deferred.pop_front() {
                Some(e) => handle::dispatch(e, state, x)?,
                None => break,
            }
        }

        Ok(())
    }

    /// Run an [Action] against the current state, as if it had been triggered by a binding.
    pub fn run_action(&mut self, action: Action) -> Result<()> {
        let Self { x, state } = self;

        state.run_action(action, x)
    }
}

impl State {
    /// The single point of dispatch for bindings and fake signals
    pub(crate) fn run_action<X: XConn>(&mut self, action: Action, x: &X) -> Result<()> {
        use Action::*;

        trace!(?action, "running action");
        let all = self.config.tag_mask();

        match action {
            View(mask) => self.view(mask, x),
            ViewAll => self.view(u32::MAX, x),
            ToggleView(mask) => self.toggle_view(mask, x),
            Tag(mask) => self.tag(mask, x),
            TagAll => self.tag(all, x),
            ToggleTag(mask) => self.toggle_tag(mask, x),
            ViewEx(i) => self.view(bit(i), x),
            ToggleViewEx(i) => self.toggle_view(bit(i), x),
            TagEx(i) => self.tag(bit(i), x),
            ToggleTagEx(i) => self.toggle_tag(bit(i), x),
            FocusStack(pos) => self.focus_stack(pos, x),
            PushStack(pos) => self.push_stack(pos, x),
            Zoom => self.zoom(x),
            SetMfact(f) => self.set_mfact(f, x),
            IncNmaster(n) => {
                let current = i32::try_from(self.monitors[self.selmon].nmaster).unwrap_or(i32::MAX);
                self.set_nmaster(current.saturating_add(n).max(0) as usize, x)
            }
            SetNmaster(n) => self.set_nmaster(n.max(0) as usize, x),
            SetLayout(layout) => self.set_layout(layout, x),
            SetLayoutEx(offset) => self.set_layout_ex(offset, x),
            ToggleBar => self.toggle_bar(x),
            ToggleFloating => self.toggle_floating(x),
            ToggleFullscreen => self.toggle_fullscreen(x),
            ToggleSticky => self.toggle_sticky(x),
            FocusMon(dir) => self.focus_mon(dir, x),
            TagMon(dir) => self.tag_mon(dir, x),
            KillClient => self.kill_client(x),
            Spawn(args) => crate::util::spawn(&args),
            MoveMouse => self.start_drag(drag::DragKind::Move, x),
            ResizeMouse => self.start_drag(drag::DragKind::Resize, x),
            IncGaps(n) => {
                let g = self.monitors[self.selmon].gaps.grown_by(n);
                self.set_gaps(g, x)
            }
            ToggleGaps => self.toggle_gaps(x),
            DefaultGaps => self.set_gaps(self.config.gaps, x),
            ReloadResources => self.reload_resources(x),
            Quit => {
                info!("exit requested");
                self.running = false;
                Ok(())
            }
        }
    }
}

// Tag indices past the end of the mask are dropped by the tag operations
fn bit(i: u32) -> u32 {
    1u32.checked_shl(i).unwrap_or(0)
}
