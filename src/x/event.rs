//! Data types for working with X events
use crate::{
    core::bindings::{Click, KeyCode, ModMask, MouseButton},
    pure::geometry::{Point, Rect},
    x::Atom,
    Xid,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Wrapper around the low level X event types that correspond to request / response data when
/// communicating with the X server itself.
///
/// The variant names and data have developed with the reference xcb and x11rb implementations
/// in mind but should be applicable to any backend that can drive the window manager.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum XEvent {
    /// A mouse button was pressed over a region of a monitor's bar
    BarClick(BarClick),
    /// A mouse button was pressed
    ButtonPress(ButtonEvent),
    /// A mouse button was released
    ButtonRelease(ButtonEvent),
    /// A message has been sent to a particular client
    ClientMessage(ClientMessage),
    /// Client config has changed in some way
    ConfigureNotify(ConfigureEvent),
    /// A client is requesting to be repositioned
    ConfigureRequest(ConfigureRequest),
    /// A client window has been closed
    Destroy(Xid),
    /// The mouse pointer has entered a new window
    Enter(PointerChange),
    /// A part or all of a window has become visible
    Expose(ExposeEvent),
    /// A client application has taken input focus
    FocusIn(Xid),
    /// A grabbed key combination has been entered by the user
    KeyPress(KeyCode),
    /// The keyboard mapping has changed and key grabs need to be refreshed
    KeyboardMapping,
    /// A client window is requesting to be positioned and rendered on the screen.
    MapRequest(Xid),
    /// The mouse pointer has moved
    Motion(MotionEvent),
    /// A client property has changed in some way
    PropertyNotify(PropertyEvent),
    /// A client window has been unmapped
    UnmapNotify(UnmapEvent),
}

impl std::fmt::Display for XEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use XEvent::*;

        match self {
            BarClick(_) => write!(f, "BarClick"),
            ButtonPress(_) => write!(f, "ButtonPress"),
            ButtonRelease(_) => write!(f, "ButtonRelease"),
            ClientMessage(_) => write!(f, "ClientMessage"),
            ConfigureNotify(_) => write!(f, "ConfigureNotify"),
            ConfigureRequest(_) => write!(f, "ConfigureRequest"),
            Destroy(_) => write!(f, "Destroy"),
            Enter(_) => write!(f, "Enter"),
            Expose(_) => write!(f, "Expose"),
            FocusIn(_) => write!(f, "FocusIn"),
            KeyPress(_) => write!(f, "KeyPress"),
            KeyboardMapping => write!(f, "KeyboardMapping"),
            MapRequest(_) => write!(f, "MapRequest"),
            Motion(_) => write!(f, "Motion"),
            PropertyNotify(_) => write!(f, "PropertyNotify"),
            UnmapNotify(_) => write!(f, "UnmapNotify"),
        }
    }
}

/// A button press or release
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    /// The window the event was reported for
    pub id: Xid,
    /// The button that changed state
    pub button: MouseButton,
    /// The modifiers held at the time of the event
    pub state: ModMask,
    /// Absolute coordinate of the event
    pub abs: Point,
}

/// A button press that landed on a bar, already resolved to the region that was clicked
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarClick {
    /// The index of the monitor whose bar was clicked
    pub monitor: usize,
    /// The region of the bar that was clicked
    pub click: Click,
    /// The index of the tag label under the pointer for [Click::TagBar]
    pub tag: Option<usize>,
    /// The button that was pressed
    pub button: MouseButton,
    /// The modifiers held at the time of the event
    pub state: ModMask,
}

/// The action requested by a `_NET_WM_STATE` fullscreen client message
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FullscreenAction {
    /// _NET_WM_STATE_REMOVE
    Remove,
    /// _NET_WM_STATE_ADD
    Add,
    /// _NET_WM_STATE_TOGGLE
    Toggle,
}

impl From<u32> for FullscreenAction {
    fn from(n: u32) -> Self {
        match n {
            1 => Self::Add,
            2 => Self::Toggle,
            _ => Self::Remove,
        }
    }
}

/// The client messages that the window manager responds to
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientMessageKind {
    /// A request to change the fullscreen state of a client
    Fullscreen(FullscreenAction),
    /// A request to activate (view and focus) a client
    ActiveWindow,
}

/// A client message that needs to be parsed and handled based on its type
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientMessage {
    /// The ID of the window that sent the message
    pub id: Xid,
    /// The decoded message
    pub kind: ClientMessageKind,
}

/// A configure notification for a window
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigureEvent {
    /// The ID of the window that had a property changed
    pub id: Xid,
    /// The new window size
    pub r: Rect,
    /// Is this window the root window?
    pub is_root: bool,
}

/// Stacking requests that a window can make as part of a [ConfigureRequest]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackMode {
    /// Above its sibling or all windows
    Above,
    /// Below its sibling or all windows
    Below,
    /// Above if any sibling occludes it
    TopIf,
    /// Below if it occludes any sibling
    BottomIf,
    /// Flip between TopIf and BottomIf
    Opposite,
}

/// A request from a client to change its geometry or stacking.
///
/// Each field is only present if the client included it in the request.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigureRequest {
    /// The window making the request
    pub id: Xid,
    /// Requested x coordinate
    pub x: Option<i32>,
    /// Requested y coordinate
    pub y: Option<i32>,
    /// Requested width
    pub w: Option<i32>,
    /// Requested height
    pub h: Option<i32>,
    /// Requested border width
    pub border: Option<i32>,
    /// Requested stacking sibling
    pub sibling: Option<Xid>,
    /// Requested stacking mode
    pub stack_mode: Option<StackMode>,
}

/// A notification that a window has become visible
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExposeEvent {
    /// The ID of the window that has become exposed
    pub id: Xid,
    /// The number of following expose events for this window
    pub count: usize,
}

/// A notification that the mouse pointer has entered a window
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerChange {
    /// The ID of the window that was entered
    pub id: Xid,
    /// Absolute coordinate of the event
    pub abs: Point,
    /// Whether this crossing was part of normal pointer movement rather than a grab
    pub normal: bool,
    /// Whether the pointer moved into this window from one of its children
    pub inferior: bool,
}

/// The pointer moved
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MotionEvent {
    /// The window the motion was reported for
    pub id: Xid,
    /// Absolute coordinate of the event
    pub abs: Point,
    /// Server timestamp in milliseconds
    pub time: u32,
}

/// A property change on a known client
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyEvent {
    /// The ID of the window that had a property changed
    pub id: Xid,
    /// The property that changed
    pub atom: Atom,
    /// Whether the property was deleted rather than set
    pub deleted: bool,
    /// Is this window the root window?
    pub is_root: bool,
}

/// A window was unmapped
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnmapEvent {
    /// The window that was unmapped
    pub id: Xid,
    /// Whether the event was sent by a client rather than generated by the server
    pub synthetic: bool,
}
