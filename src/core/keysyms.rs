//! The X keysyms used by the default key bindings
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// X keysym mappings for the keys the default bindings need, taken from X11/keysymdef.h
#[allow(non_camel_case_types)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(AsRefStr, EnumString, EnumIter, Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum XKeySym {
    /// XK_Tab
    #[strum(serialize = "Tab")]
    XK_Tab,
    /// XK_Return
    #[strum(serialize = "Return")]
    XK_Return,
    /// XK_Home
    #[strum(serialize = "Home")]
    XK_Home,
    /// XK_Left
    #[strum(serialize = "Left")]
    XK_Left,
    /// XK_Up
    #[strum(serialize = "Up")]
    XK_Up,
    /// XK_Right
    #[strum(serialize = "Right")]
    XK_Right,
    /// XK_Down
    #[strum(serialize = "Down")]
    XK_Down,
    /// XK_Page_Up
    #[strum(serialize = "Page_Up")]
    XK_Page_Up,
    /// XK_Page_Down
    #[strum(serialize = "Page_Down")]
    XK_Page_Down,
    /// XK_space
    #[strum(serialize = "space")]
    XK_space,
    /// XK_0
    #[strum(serialize = "0")]
    XK_0,
    /// XK_1
    #[strum(serialize = "1")]
    XK_1,
    /// XK_2
    #[strum(serialize = "2")]
    XK_2,
    /// XK_3
    #[strum(serialize = "3")]
    XK_3,
    /// XK_4
    #[strum(serialize = "4")]
    XK_4,
    /// XK_5
    #[strum(serialize = "5")]
    XK_5,
    /// XK_6
    #[strum(serialize = "6")]
    XK_6,
    /// XK_7
    #[strum(serialize = "7")]
    XK_7,
    /// XK_8
    #[strum(serialize = "8")]
    XK_8,
    /// XK_9
    #[strum(serialize = "9")]
    XK_9,
    /// XK_b
    #[strum(serialize = "b")]
    XK_b,
    /// XK_d
    #[strum(serialize = "d")]
    XK_d,
    /// XK_f
    #[strum(serialize = "f")]
    XK_f,
    /// XK_g
    #[strum(serialize = "g")]
    XK_g,
    /// XK_h
    #[strum(serialize = "h")]
    XK_h,
    /// XK_j
    #[strum(serialize = "j")]
    XK_j,
    /// XK_k
    #[strum(serialize = "k")]
    XK_k,
    /// XK_l
    #[strum(serialize = "l")]
    XK_l,
    /// XK_q
    #[strum(serialize = "q")]
    XK_q,
    /// XK_r
    #[strum(serialize = "r")]
    XK_r,
    /// XK_s
    #[strum(serialize = "s")]
    XK_s,
    /// XK_t
    #[strum(serialize = "t")]
    XK_t,
}

impl XKeySym {
    /// The raw keysym value
    pub fn as_u32(&self) -> u32 {
        match self {
            XKeySym::XK_Tab => 0xff09,
            XKeySym::XK_Return => 0xff0d,
            XKeySym::XK_Home => 0xff50,
            XKeySym::XK_Left => 0xff51,
            XKeySym::XK_Up => 0xff52,
            XKeySym::XK_Right => 0xff53,
            XKeySym::XK_Down => 0xff54,
            XKeySym::XK_Page_Up => 0xff55,
            XKeySym::XK_Page_Down => 0xff56,
            XKeySym::XK_space => 0x0020,
            XKeySym::XK_0 => 0x0030,
            XKeySym::XK_1 => 0x0031,
            XKeySym::XK_2 => 0x0032,
            XKeySym::XK_3 => 0x0033,
            XKeySym::XK_4 => 0x0034,
            XKeySym::XK_5 => 0x0035,
            XKeySym::XK_6 => 0x0036,
            XKeySym::XK_7 => 0x0037,
            XKeySym::XK_8 => 0x0038,
            XKeySym::XK_9 => 0x0039,
            XKeySym::XK_b => 0x0062,
            XKeySym::XK_d => 0x0064,
            XKeySym::XK_f => 0x0066,
            XKeySym::XK_g => 0x0067,
            XKeySym::XK_h => 0x0068,
            XKeySym::XK_j => 0x006a,
            XKeySym::XK_k => 0x006b,
            XKeySym::XK_l => 0x006c,
            XKeySym::XK_q => 0x0071,
            XKeySym::XK_r => 0x0072,
            XKeySym::XK_s => 0x0073,
            XKeySym::XK_t => 0x0074,
        }
    }

    /// The keysym for one of the digit keys 0-9
    pub fn digit(n: usize) -> Option<Self> {
        use XKeySym::*;

        [XK_0, XK_1, XK_2, XK_3, XK_4, XK_5, XK_6, XK_7, XK_8, XK_9]
            .get(n)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn names_parse_to_keysyms() {
        assert_eq!(XKeySym::from_str("Page_Up").unwrap().as_u32(), 0xff55);
        assert_eq!(XKeySym::from_str("j").unwrap().as_u32(), 'j' as u32);
    }

    #[test]
    fn digits_map_to_ascii() {
        for n in 0..10 {
            let sym = XKeySym::digit(n).unwrap();
            assert_eq!(sym.as_u32(), '0' as u32 + n as u32);
        }
        assert!(XKeySym::digit(10).is_none());
    }
}
