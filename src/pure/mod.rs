//! Side effect free building blocks for the window manager state
pub mod arena;
pub mod geometry;
pub mod position;

#[doc(inline)]
pub use arena::{Arena, Key};
#[doc(inline)]
pub use geometry::{Point, Rect};
#[doc(inline)]
pub use position::StackPosition;
