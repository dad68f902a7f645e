//! Setting up and responding to user defined key/mouse bindings
use crate::{
    core::{actions::Action, keysyms::XKeySym},
    Error, Result,
};
use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// The X modifier mask carried by key and button events
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModMask: u16 {
        /// Shift
        const SHIFT   = 1 << 0;
        /// Caps Lock
        const LOCK    = 1 << 1;
        /// Control
        const CONTROL = 1 << 2;
        /// Mod1 (normally Alt)
        const MOD1    = 1 << 3;
        /// Mod2 (normally Num Lock)
        const MOD2    = 1 << 4;
        /// Mod3
        const MOD3    = 1 << 5;
        /// Mod4 (normally Super)
        const MOD4    = 1 << 6;
        /// Mod5
        const MOD5    = 1 << 7;
    }
}

impl ModMask {
    /// Strip the lock modifiers (caps lock and the given num lock bit) from this mask
    /// along with any button state bits, leaving only the modifiers that bindings care about.
    pub fn clean(self, numlock: ModMask) -> ModMask {
        self.difference(numlock | ModMask::LOCK)
            .intersection(
                ModMask::SHIFT
                    | ModMask::CONTROL
                    | ModMask::MOD1
                    | ModMask::MOD2
                    | ModMask::MOD3
                    | ModMask::MOD4
                    | ModMask::MOD5,
            )
    }

    /// Every combination of this mask with caps lock and num lock held, for use when grabbing.
    pub fn with_lock_variants(self, numlock: ModMask) -> [ModMask; 4] {
        [
            self,
            self | ModMask::LOCK,
            self | numlock,
            self | numlock | ModMask::LOCK,
        ]
    }
}

/// A key press and held modifiers
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct KeyCode {
    /// The held modifier mask
    pub mask: ModMask,
    /// The keysym of the key that was pressed
    pub keysym: u32,
}

/// Known mouse buttons for binding actions
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum MouseButton {
    /// 1
    Left,
    /// 2
    Middle,
    /// 3
    Right,
    /// 4
    ScrollUp,
    /// 5
    ScrollDown,
}

impl From<MouseButton> for u8 {
    fn from(b: MouseButton) -> u8 {
        match b {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::ScrollUp => 4,
            MouseButton::ScrollDown => 5,
        }
    }
}

impl TryFrom<u8> for MouseButton {
    type Error = Error;

    fn try_from(n: u8) -> Result<Self> {
        match n {
            1 => Ok(Self::Left),
            2 => Ok(Self::Middle),
            3 => Ok(Self::Right),
            4 => Ok(Self::ScrollUp),
            5 => Ok(Self::ScrollDown),
            _ => Err(Error::Custom(format!("unknown mouse button {n}"))),
        }
    }
}

/// A mouse state specification indicating the button and modifiers held
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct MouseState {
    /// The button
    pub button: MouseButton,
    /// The held modifiers
    pub mask: ModMask,
}

/// The region of the screen that a button binding applies to
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Click {
    /// A tag label in the bar
    TagBar,
    /// The layout symbol in the bar
    LtSymbol,
    /// The status text in the bar
    StatusText,
    /// The title of the selected client in the bar
    WinTitle,
    /// A managed client window
    ClientWin,
    /// The root window
    RootWin,
}

/// A key combination bound to an [Action]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBinding {
    /// Modifiers that must be held
    pub mask: ModMask,
    /// The key that triggers the binding
    pub key: XKeySym,
    /// What to run
    pub action: Action,
}

impl KeyBinding {
    /// Create a new key binding
    pub fn new(mask: ModMask, key: XKeySym, action: Action) -> Self {
        Self { mask, key, action }
    }

    /// The [KeyCode] that needs to be grabbed to receive this binding
    pub fn code(&self) -> KeyCode {
        KeyCode {
            mask: self.mask,
            keysym: self.key.as_u32(),
        }
    }

    /// Whether a key press matches this binding once lock modifiers are ignored
    pub fn matches(&self, code: KeyCode, numlock: ModMask) -> bool {
        self.key.as_u32() == code.keysym && self.mask.clean(numlock) == code.mask.clean(numlock)
    }
}

/// A mouse button bound to an [Action] within a given [Click] region
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonBinding {
    /// Where the click needs to land
    pub click: Click,
    /// Modifiers that must be held
    pub mask: ModMask,
    /// The button that triggers the binding
    pub button: MouseButton,
    /// What to run
    pub action: Action,
}

impl ButtonBinding {
    /// Create a new button binding
    pub fn new(click: Click, mask: ModMask, button: MouseButton, action: Action) -> Self {
        Self {
            click,
            mask,
            button,
            action,
        }
    }

    /// Whether a button press in the given region matches this binding once lock modifiers
    /// are ignored
    pub fn matches(&self, click: Click, button: MouseButton, mask: ModMask, numlock: ModMask) -> bool {
        self.click == click
            && self.button == button
            && self.mask.clean(numlock) == mask.clean(numlock)
    }

    /// The [MouseState] to grab on client windows for this binding
    pub fn state(&self) -> MouseState {
        MouseState {
            button: self.button,
            mask: self.mask,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test_case(ModMask::MOD4 | ModMask::LOCK, ModMask::MOD4; "caps lock")]
    #[test_case(ModMask::MOD4 | ModMask::MOD2, ModMask::MOD4; "num lock")]
    #[test_case(ModMask::MOD4 | ModMask::SHIFT, ModMask::MOD4 | ModMask::SHIFT; "shift is kept")]
    #[test_case(ModMask::from_bits_retain(0x100) | ModMask::CONTROL, ModMask::CONTROL; "button bits")]
    #[test]
    fn clean_mask(raw: ModMask, expected: ModMask) {
        assert_eq!(raw.clean(ModMask::MOD2), expected);
    }

    #[test]
    fn key_binding_matches_with_locks_held() {
        let b = KeyBinding::new(ModMask::MOD4, XKeySym::XK_j, Action::Zoom);
        let code = KeyCode {
            mask: ModMask::MOD4 | ModMask::MOD2 | ModMask::LOCK,
            keysym: XKeySym::XK_j.as_u32(),
        };

        assert!(b.matches(code, ModMask::MOD2));
    }

    #[test]
    fn key_binding_requires_exact_modifiers() {
        let b = KeyBinding::new(ModMask::MOD4, XKeySym::XK_j, Action::Zoom);
        let code = KeyCode {
            mask: ModMask::MOD4 | ModMask::SHIFT,
            keysym: XKeySym::XK_j.as_u32(),
        };

        assert!(!b.matches(code, ModMask::MOD2));
    }
}
