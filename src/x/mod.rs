//! Logic for interacting with the X server
use crate::{
    core::{
        bar::BarInfo,
        bindings::{KeyCode, ModMask, MouseState},
    },
    pure::geometry::{Point, Rect},
    Color, Result, Xid,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod atom;
pub mod event;
pub mod property;

pub use atom::Atom;
pub use event::XEvent;
pub use property::{MapState, WindowAttributes, WmClass, WmHints, WmNormalHints, WmState};

use event::ConfigureRequest;

/// On screen configuration options for X clients
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientConfig {
    /// The border width in pixels
    BorderPx(i32),
    /// Absolute size and position on the screen as a [Rect]
    Position(Rect),
    /// Mark this window as stacking directly below the given Xid
    StackBelow(Xid),
    /// Mark this window as stacking above all other windows
    StackTop,
    /// Mark this window as stacking below all other windows
    StackBottom,
}

/// Attributes for an X11 client window
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientAttr {
    /// Border color
    BorderColor(Color),
    /// Set the pre-defined client event mask
    ClientEventMask,
}

/// The cursor shape to show while the pointer is grabbed
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CursorShape {
    /// The standard pointer
    Normal,
    /// Shown while moving a client
    Move,
    /// Shown while resizing a client
    Resize,
}

/// A handle on a running X11 connection that we can use for issuing X requests.
///
/// XConn is the only way that the window manager talks to the display server. Requests that
/// change state on the server are fire and forget from the point of view of the caller: they
/// only return an error if the request could not be sent. Queries block until the reply is
/// available. Properties that are not set on a window are reported as `Ok(None)`.
pub trait XConn {
    /// The ID of the window manager root window.
    fn root(&self) -> Xid;
    /// The size of the root window.
    fn root_geometry(&self) -> Result<Rect>;
    /// Ask the X server for the dimensions of each currently available output.
    fn screen_details(&self) -> Result<Vec<Rect>>;
    /// Ask the X server for the current (x, y) coordinate of the mouse cursor.
    fn cursor_position(&self) -> Result<Point>;

    /// Register as the window manager for the display.
    ///
    /// Returns [Error::OtherWmRunning][crate::Error::OtherWmRunning] if substructure redirection
    /// on the root window is already held by another client.
    fn init_wm(&self) -> Result<()>;
    /// Release anything set up in [XConn::init_wm] ahead of exiting.
    fn cleanup(&self) -> Result<()>;

    /// The modifier bit currently bound to Num_Lock.
    fn numlock_mask(&self) -> Result<ModMask>;
    /// Replace all key grabs on the root window with the given key codes.
    fn grab_keys(&self, keys: &[KeyCode]) -> Result<()>;
    /// Release all key grabs on the root window.
    fn ungrab_keys(&self) -> Result<()>;
    /// Replace the button grabs on a client.
    ///
    /// Unfocused clients additionally get every button grabbed so that clicking them can
    /// transfer focus.
    fn grab_buttons(&self, client: Xid, buttons: &[MouseState], focused: bool) -> Result<()>;
    /// Release all button grabs on a client.
    fn ungrab_buttons(&self, client: Xid) -> Result<()>;
    /// Actively grab the pointer for an interactive move or resize. Returns false if the grab
    /// was refused.
    fn grab_pointer(&self, cursor: CursorShape) -> Result<bool>;
    /// Release an active pointer grab.
    fn ungrab_pointer(&self) -> Result<()>;

    /// Block and wait for the next event from the X server so it can be processed.
    fn next_event(&self) -> Result<XEvent>;
    /// Flush any pending requests to the X server.
    fn flush(&self);
    /// Sync with the X server and drop any pending pointer crossing events.
    fn discard_enter_events(&self) -> Result<()>;

    /// Ask the X server for the IDs of all top level windows.
    fn existing_clients(&self) -> Result<Vec<Xid>>;
    /// Request the [WindowAttributes] for a given window.
    fn get_window_attributes(&self, id: Xid) -> Result<Option<WindowAttributes>>;
    /// Get the current [WmState] for a given client window.
    fn get_wm_state(&self, id: Xid) -> Result<Option<WmState>>;
    /// Set the current [WmState] for a given client window.
    fn set_wm_state(&self, id: Xid, state: WmState) -> Result<()>;
    /// The window that a given window is transient for.
    fn transient_for(&self, id: Xid) -> Result<Option<Xid>>;
    /// The WM_CLASS property of a window.
    fn window_class(&self, id: Xid) -> Result<Option<WmClass>>;
    /// The title of a window: `_NET_WM_NAME` falling back to `WM_NAME`.
    fn window_title(&self, id: Xid) -> Result<Option<String>>;
    /// The `WM_NAME` of the root window.
    fn root_name(&self) -> Result<Option<String>>;
    /// The WM_NORMAL_HINTS of a window.
    fn size_hints(&self, id: Xid) -> Result<Option<WmNormalHints>>;
    /// The WM_HINTS of a window.
    fn wm_hints(&self, id: Xid) -> Result<Option<WmHints>>;
    /// Replace the WM_HINTS of a window.
    fn set_wm_hints(&self, id: Xid, hints: &WmHints) -> Result<()>;
    /// The first value of an atom valued property, if it is an atom known to the window manager.
    fn atom_prop(&self, id: Xid, prop: Atom) -> Result<Option<Atom>>;
    /// Whether a window lists the given protocol in its WM_PROTOCOLS.
    fn supports_protocol(&self, id: Xid, protocol: Atom) -> Result<bool>;
    /// Send a WM_PROTOCOLS client message to a window.
    fn send_protocol_message(&self, id: Xid, protocol: Atom) -> Result<()>;
    /// The id of the process owning a window.
    fn window_pid(&self, id: Xid) -> Result<Option<u32>>;
    /// Set or clear `_NET_WM_STATE_FULLSCREEN` on a window.
    fn set_fullscreen_state(&self, id: Xid, fullscreen: bool) -> Result<()>;
    /// Set or delete `_NET_ACTIVE_WINDOW` on the root window.
    fn set_active_window(&self, id: Option<Xid>) -> Result<()>;
    /// Replace `_NET_CLIENT_LIST` on the root window.
    fn set_client_list(&self, clients: &[Xid]) -> Result<()>;

    /// Set X input focus to be held by the given client window.
    fn focus(&self, id: Xid) -> Result<()>;
    /// Return input focus to the root window.
    fn focus_root(&self) -> Result<()>;
    /// Map the given client window to the screen with its current geometry, making it visible.
    fn map(&self, id: Xid) -> Result<()>;
    /// Unmap the given client window from the screen, hiding it.
    fn unmap(&self, id: Xid) -> Result<()>;
    /// Forcibly close the connection of the client owning the given window.
    fn kill(&self, id: Xid) -> Result<()>;
    /// Set the [ClientConfig] for a given client window.
    fn set_client_config(&self, id: Xid, data: &[ClientConfig]) -> Result<()>;
    /// Set one or more [ClientAttr] for a given client window.
    fn set_client_attributes(&self, id: Xid, attrs: &[ClientAttr]) -> Result<()>;
    /// Apply a configure request from a window that is not managed as it was requested.
    fn forward_configure_request(&self, req: &ConfigureRequest) -> Result<()>;
    /// Send a synthetic ConfigureNotify to a client describing its current geometry.
    fn send_configure_notify(&self, id: Xid, r: Rect, border: i32) -> Result<()>;
    /// Reposition the mouse cursor to the given (x, y) coordinates within the specified window.
    fn warp_pointer(&self, id: Xid, x: i32, y: i32) -> Result<()>;

    /// The window used to display the bar of the given monitor, if there is one.
    fn bar_window(&self, monitor: usize) -> Option<Xid>;
    /// Render a monitor's bar, creating or repositioning its window as needed.
    fn draw_bar(&self, bar: &BarInfo) -> Result<()>;
    /// Destroy the bar of a monitor that no longer exists.
    fn remove_bar(&self, monitor: usize) -> Result<()>;
    /// The raw X resource database string (RESOURCE_MANAGER), if any.
    fn resource_database(&self) -> Result<Option<String>>;
}
