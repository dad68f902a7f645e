//! tagwm: a dynamic tiling window manager for X11
//!
//! The crate is split into a pure decision core and the I/O needed to drive it:
//!
//! - [pure] holds the geometry primitives and the client arena, with no knowledge of X.
//! - [core] owns the window manager state: monitors, clients, tags and their per-tag
//!   settings, layouts, focus handling, window swallowing, key/button bindings and the
//!   root window "fake signal" command channel.
//! - [x] defines the [XConn][x::XConn] trait that the core uses to talk to a display
//!   server along with the event and property types that cross that boundary.
//! - [x11rb] (behind the `x11rb` feature) is the production implementation of `XConn`.
//!
//! Everything is driven from a single thread by [WindowManager::run][core::WindowManager::run].
#![warn(
    clippy::complexity,
    clippy::correctness,
    clippy::style,
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    rustdoc::all
)]
#![allow(clippy::too_many_arguments)]
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Deref};

pub mod core;
pub mod pure;
pub mod util;
pub mod x;
#[cfg(feature = "x11rb")]
pub mod x11rb;

#[doc(inline)]
pub use crate::core::{Config, WindowManager};

/// Error variants from the core tagwm library.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A hex literal provided to create a [Color] was not valid
    #[error("invalid hex color code: {0}")]
    InvalidHexColor(String),

    /// An IO error was encountered
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// There was no screen attached to the X server
    #[error("there are no screens available")]
    NoScreens,

    /// Another window manager already holds substructure redirection on the root window
    #[error("another window manager is already running")]
    OtherWmRunning,

    /// A parse error when reading a configuration value
    #[error("unable to parse '{value}' as a value for '{name}'")]
    InvalidResource {
        /// The resource name
        name: String,
        /// The raw value that could not be parsed
        value: String,
    },

    /// An attempt was made to reference a client that is not known to the window manager
    #[error("{0} is not a known client")]
    UnknownClient(Xid),

    /// A custom error message
    #[error("{0}")]
    Custom(String),

    /// An error from the x11rb backend
    #[cfg(feature = "x11rb")]
    #[error(transparent)]
    X11rb(#[from] crate::x11rb::X11rbError),
}

/// A Result where the error type is a tagwm [Error]
pub type Result<T> = std::result::Result<T, Error>;

/// An X11 ID for a given resource
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Xid(pub u32);

impl fmt::Display for Xid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for Xid {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u32> for Xid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<Xid> for u32 {
    fn from(id: Xid) -> Self {
        id.0
    }
}

/// A simple RGB color used for window borders and the bar.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    /// Create a new Color from a hex encoded u32: 0xRRGGBB
    pub const fn new_from_hex(hex: u32) -> Self {
        Self(hex & 0xffffff)
    }

    /// 0xRRGGBB representation of this Color
    pub fn rgb_u32(&self) -> u32 {
        self.0
    }

    /// Render this color as a #rrggbb hex color string
    pub fn as_rgb_hex_string(&self) -> String {
        format!("#{:06x}", self.0)
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::new_from_hex(hex)
    }
}

impl TryFrom<&str> for Color {
    type Error = Error;

    fn try_from(s: &str) -> Result<Color> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 {
            return Err(Error::InvalidHexColor(s.into()));
        }

        u32::from_str_radix(hex, 16)
            .map(Color::new_from_hex)
            .map_err(|_| Error::InvalidHexColor(s.into()))
    }
}
