//! Translating between X keycodes and the keysyms used by bindings
use crate::{core::bindings::ModMask, x11rb::Result};
use x11rb::{connection::Connection, protocol::xproto::ConnectionExt};

const XK_NUM_LOCK: u32 = 0xff7f;

/// A snapshot of the server keyboard mapping
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct KeyboardMap {
    min_keycode: u8,
    per_keycode: usize,
    keysyms: Vec<u32>,
}

impl KeyboardMap {
    pub(crate) fn query(conn: &impl Connection) -> Result<Self> {
        let setup = conn.setup();
        let (min, max) = (setup.min_keycode, setup.max_keycode);
        let reply = conn
            .get_keyboard_mapping(min, max - min + 1)?
            .reply()?;

        Ok(Self {
            min_keycode: min,
            per_keycode: reply.keysyms_per_keycode as usize,
            keysyms: reply.keysyms,
        })
    }

    /// The unshifted keysym of a keycode
    pub(crate) fn keysym(&self, code: u8) -> Option<u32> {
        let i = code.checked_sub(self.min_keycode)? as usize * self.per_keycode;

        self.keysyms.get(i).copied().filter(|&k| k != 0)
    }

    /// Every keycode producing the given keysym in any column
    pub(crate) fn keycodes(&self, keysym: u32) -> Vec<u8> {
        if self.per_keycode == 0 {
            return vec![];
        }

        self.keysyms
            .chunks(self.per_keycode)
            .enumerate()
            .filter(|(_, syms)| syms.contains(&keysym))
            .filter_map(|(i, _)| u8::try_from(i + self.min_keycode as usize).ok())
            .collect()
    }
}

/// The modifier bit that Num_Lock is currently bound to
pub(crate) fn numlock_mask(conn: &impl Connection, map: &KeyboardMap) -> Result<ModMask> {
    let reply = conn.get_modifier_mapping()?.reply()?;
    let per_mod = reply.keycodes_per_modifier() as usize;

    Ok(numlock_from_modifiers(&reply.keycodes, per_mod, &map.keycodes(XK_NUM_LOCK)))
}

fn numlock_from_modifiers(keycodes: &[u8], per_mod: usize, numlock: &[u8]) -> ModMask {
    if per_mod == 0 {
        return ModMask::empty();
    }

    keycodes
        .chunks(per_mod)
        .position(|codes| codes.iter().any(|c| *c != 0 && numlock.contains(c)))
        .map(|i| ModMask::from_bits_truncate(1 << i))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> KeyboardMap {
        KeyboardMap {
            min_keycode: 8,
            per_keycode: 2,
            // 8: a A, 9: b B, 10: Num_Lock, 11: unbound
            keysyms: vec![0x61, 0x41, 0x62, 0x42, XK_NUM_LOCK, 0, 0, 0],
        }
    }

    #[test]
    fn keysym_uses_the_first_column() {
        assert_eq!(map().keysym(9), Some(0x62));
        assert_eq!(map().keysym(11), None);
        assert_eq!(map().keysym(3), None);
    }

    #[test]
    fn keycodes_search_every_column() {
        assert_eq!(map().keycodes(0x41), vec![8]);
        assert_eq!(map().keycodes(XK_NUM_LOCK), vec![10]);
        assert!(map().keycodes(0x7a).is_empty());
    }

    #[test]
    fn numlock_is_found_in_its_modifier_row() {
        // shift, lock, control, mod1, mod2 with two keycodes per modifier
        let modifiers = [50, 62, 66, 0, 37, 105, 64, 108, 10, 0, 0, 0, 0, 0, 0, 0];

        assert_eq!(numlock_from_modifiers(&modifiers, 2, &[10]), ModMask::MOD2);
        assert_eq!(numlock_from_modifiers(&modifiers, 2, &[]), ModMask::empty());
    }
}
