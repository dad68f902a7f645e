//! An [XConn][crate::x::XConn] implementation using x11rb as the X11 back end
use x11rb::{
    errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError},
    protocol::{xproto, ErrorKind},
    x11_utils::X11Error,
    rust_connection::RustConnection,
};

mod atom;
mod bar;
mod conversions;
mod keyboard;
mod xconn;

#[doc(inline)]
pub use xconn::X11rbConnection;

/// Result type for fallible methods using x11rb
pub type Result<T> = std::result::Result<T, X11rbError>;

/// Connect to the X server named by `$DISPLAY`.
pub fn connect() -> crate::Result<X11rbConnection<RustConnection>> {
    let (conn, screen_num) = RustConnection::connect(None).map_err(X11rbError::from)?;

    X11rbConnection::new_for_connection(conn, screen_num)
}

/// Enum to store the various ways that operations can fail inside of the
/// x11rb implementation of [XConn][crate::x::XConn].
#[derive(thiserror::Error, Debug)]
pub enum X11rbError {
    /// Unable to establish a connection to the X server
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// The X11 connection broke
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Could not get X11 request reply
    #[error(transparent)]
    ReplyError(#[from] ReplyError),

    /// Could not get X11 request reply or could not generate_id()
    #[error(transparent)]
    ReplyOrIdError(#[from] ReplyOrIdError),

    /// The X server reported an error for a request we sent
    #[error("X11 error: {0:?}")]
    X11Error(X11Error),

    /// The requested screen number is not present in the connection setup
    #[error("screen {0} is not available on this X server")]
    UnknownScreen(usize),
}

macro_rules! into_crate_error {
    ($($err:ty),+) => {
        $(
            impl From<$err> for crate::Error {
                fn from(e: $err) -> Self {
                    crate::Error::X11rb(X11rbError::from(e))
                }
            }
        )+
    };
}

into_crate_error!(ConnectError, ConnectionError, ReplyError, ReplyOrIdError);

/// Errors that are expected to happen in normal operation and can be safely ignored.
///
/// Windows can be destroyed at any time, leaving requests already in flight for them to fail.
pub(crate) fn is_benign(err: &X11Error) -> bool {
    use xproto::{
        CONFIGURE_WINDOW_REQUEST, COPY_AREA_REQUEST, GRAB_BUTTON_REQUEST, GRAB_KEY_REQUEST,
        IMAGE_TEXT8_REQUEST, POLY_FILL_RECTANGLE_REQUEST, POLY_RECTANGLE_REQUEST,
        SET_INPUT_FOCUS_REQUEST,
    };

    let op = err.major_opcode;
    match err.error_kind {
        ErrorKind::Window => true,
        ErrorKind::Match => op == SET_INPUT_FOCUS_REQUEST || op == CONFIGURE_WINDOW_REQUEST,
        ErrorKind::Drawable => [
            IMAGE_TEXT8_REQUEST,
            POLY_FILL_RECTANGLE_REQUEST,
            POLY_RECTANGLE_REQUEST,
            COPY_AREA_REQUEST,
        ]
        .contains(&op),
        ErrorKind::Access => op == GRAB_BUTTON_REQUEST || op == GRAB_KEY_REQUEST,
        _ => false,
    }
}
