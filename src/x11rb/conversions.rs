//! Conversions to tagwm types from x11rb types
use crate::{
    core::bindings::{KeyCode, ModMask, MouseButton},
    pure::geometry::{Point, Rect},
    x::{
        event::{
            BarClick, ButtonEvent, ClientMessage, ClientMessageKind, ConfigureEvent,
            ConfigureRequest, ExposeEvent, FullscreenAction, MotionEvent, PointerChange,
            PropertyEvent, StackMode, UnmapEvent,
        },
        Atom, XEvent,
    },
    x11rb::{is_benign, X11rbConnection, X11rbError},
    Result, Xid,
};
use tracing::{error, trace, warn};
use x11rb::{
    connection::Connection,
    protocol::{
        xproto::{
            self, ButtonPressEvent, ClientMessageEvent, ConfigWindow, ConfigureRequestEvent,
            KeyButMask, Mapping, NotifyDetail, NotifyMode, Property,
        },
        Event,
    },
};

const SEND_EVENT_FLAG: u8 = 0x80;

pub(crate) fn convert_event<C: Connection>(
    conn: &X11rbConnection<C>,
    event: Event,
) -> Result<Option<XEvent>> {
    let root = conn.root_id();

    match event {
        Event::ButtonPress(e) => to_button_press(conn, e),

        Event::ButtonRelease(e) => Ok(to_button(e.detail).map(|button| {
            XEvent::ButtonRelease(ButtonEvent {
                id: Xid(e.event),
                button,
                state: to_mask(e.state),
                abs: Point::new(e.root_x as i32, e.root_y as i32),
            })
        })),

        Event::ClientMessage(e) => Ok(to_client_message(conn, e)),

        Event::ConfigureNotify(e) => Ok(Some(XEvent::ConfigureNotify(ConfigureEvent {
            id: Xid(e.window),
            r: Rect::new(e.x as i32, e.y as i32, e.width as i32, e.height as i32),
            is_root: e.window == root,
        }))),

        Event::ConfigureRequest(e) => Ok(Some(XEvent::ConfigureRequest(to_configure_request(e)))),

        Event::DestroyNotify(e) => Ok(Some(XEvent::Destroy(Xid(e.window)))),

        Event::EnterNotify(e) => Ok(Some(XEvent::Enter(PointerChange {
            id: Xid(e.event),
            abs: Point::new(e.root_x as i32, e.root_y as i32),
            normal: e.mode == NotifyMode::NORMAL,
            inferior: e.detail == NotifyDetail::INFERIOR,
        }))),

        Event::Expose(e) => Ok(Some(XEvent::Expose(ExposeEvent {
            id: Xid(e.window),
            count: e.count as usize,
        }))),

        Event::FocusIn(e) => Ok(Some(XEvent::FocusIn(Xid(e.event)))),

        Event::KeyPress(e) => Ok(conn.keysym(e.detail).map(|keysym| {
            XEvent::KeyPress(KeyCode {
                mask: to_mask(e.state),
                keysym,
            })
        })),

        Event::MappingNotify(e) => {
            if e.request == Mapping::KEYBOARD {
                conn.refresh_keyboard()?;
                Ok(Some(XEvent::KeyboardMapping))
            } else {
                Ok(None)
            }
        }

        Event::MapRequest(e) => Ok(Some(XEvent::MapRequest(Xid(e.window)))),

        Event::MotionNotify(e) => Ok(Some(XEvent::Motion(MotionEvent {
            id: Xid(e.event),
            abs: Point::new(e.root_x as i32, e.root_y as i32),
            time: e.time,
        }))),

        Event::PropertyNotify(e) => Ok(conn.atom(e.atom).map(|atom| {
            XEvent::PropertyNotify(PropertyEvent {
                id: Xid(e.window),
                atom,
                deleted: e.state == Property::DELETE,
                is_root: e.window == root,
            })
        })),

        Event::UnmapNotify(e) => Ok(Some(XEvent::UnmapNotify(UnmapEvent {
            id: Xid(e.window),
            synthetic: e.response_type & SEND_EVENT_FLAG != 0,
        }))),

        Event::Error(err) if is_benign(&err) => {
            trace!(?err, "ignoring benign X11 error");
            Ok(None)
        }

        Event::Error(err) => {
            let error = X11rbError::X11Error(err);
            error!(%error, "unexpected X11 error");
            Ok(None)
        }

        // NOTE: Ignoring other event types
        _ => Ok(None),
    }
}

fn to_mask(state: KeyButMask) -> ModMask {
    ModMask::from_bits_truncate(u16::from(state))
}

fn to_button(detail: u8) -> Option<MouseButton> {
    match MouseButton::try_from(detail) {
        Ok(b) => Some(b),
        Err(_) => {
            warn!(button = detail, "dropping unknown mouse button event");
            None
        }
    }
}

fn to_button_press<C: Connection>(
    conn: &X11rbConnection<C>,
    e: ButtonPressEvent,
) -> Result<Option<XEvent>> {
    // unfocused clients grab every button synchronously: let the click through to them
    conn.replay_pointer()?;

    let button = match to_button(e.detail) {
        Some(b) => b,
        None => return Ok(None),
    };
    let state = to_mask(e.state);

    if let Some((monitor, click, tag)) = conn.bar_click(e.event, e.event_x as i32) {
        return Ok(Some(XEvent::BarClick(BarClick {
            monitor,
            click,
            tag,
            button,
            state,
        })));
    }

    Ok(Some(XEvent::ButtonPress(ButtonEvent {
        id: Xid(e.event),
        button,
        state,
        abs: Point::new(e.root_x as i32, e.root_y as i32),
    })))
}

fn to_client_message<C: Connection>(
    conn: &X11rbConnection<C>,
    e: ClientMessageEvent,
) -> Option<XEvent> {
    let data = e.data.as_data32();
    let kind = match conn.atom(e.type_)? {
        Atom::NetWmState => {
            let fullscreen = conn.known_atom(Atom::NetWmStateFullscreen);
            if data[1] != fullscreen && data[2] != fullscreen {
                return None;
            }
            ClientMessageKind::Fullscreen(FullscreenAction::from(data[0]))
        }
        Atom::NetActiveWindow => ClientMessageKind::ActiveWindow,
        _ => return None,
    };

    Some(XEvent::ClientMessage(ClientMessage {
        id: Xid(e.window),
        kind,
    }))
}

fn to_configure_request(e: ConfigureRequestEvent) -> ConfigureRequest {
    let mask = u16::from(e.value_mask);
    let has = |flag: ConfigWindow| mask & u16::from(flag) != 0;

    ConfigureRequest {
        id: Xid(e.window),
        x: has(ConfigWindow::X).then_some(e.x as i32),
        y: has(ConfigWindow::Y).then_some(e.y as i32),
        w: has(ConfigWindow::WIDTH).then_some(e.width as i32),
        h: has(ConfigWindow::HEIGHT).then_some(e.height as i32),
        border: has(ConfigWindow::BORDER_WIDTH).then_some(e.border_width as i32),
        sibling: has(ConfigWindow::SIBLING).then_some(Xid(e.sibling)),
        stack_mode: has(ConfigWindow::STACK_MODE).then(|| to_stack_mode(e.stack_mode)),
    }
}

fn to_stack_mode(mode: xproto::StackMode) -> StackMode {
    match mode {
        xproto::StackMode::BELOW => StackMode::Below,
        xproto::StackMode::TOP_IF => StackMode::TopIf,
        xproto::StackMode::BOTTOM_IF => StackMode::BottomIf,
        xproto::StackMode::OPPOSITE => StackMode::Opposite,
        _ => StackMode::Above,
    }
}

pub(crate) fn from_stack_mode(mode: StackMode) -> xproto::StackMode {
    match mode {
        StackMode::Above => xproto::StackMode::ABOVE,
        StackMode::Below => xproto::StackMode::BELOW,
        StackMode::TopIf => xproto::StackMode::TOP_IF,
        StackMode::BottomIf => xproto::StackMode::BOTTOM_IF,
        StackMode::Opposite => xproto::StackMode::OPPOSITE,
    }
}
