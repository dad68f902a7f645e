//! Positions within the ordered list of clients visible on a monitor.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Offset added to a relative movement when it is encoded as a plain integer.
const INC_OFFSET: i32 = 2000;
/// The plain integer used to request the previously selected client.
const PREVIOUS_SELECTION: i32 = 3000;

/// A target position among the visible clients of a monitor, used for moving focus
/// through the stack and for relocating the focused client within it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackPosition {
    /// A zero based index from the start of the list
    Absolute(usize),
    /// A one based index from the end of the list: `FromEnd(1)` is the last client
    FromEnd(usize),
    /// An offset from the currently focused client, wrapping at either end
    Relative(i32),
    /// The most recently focused client other than the current one
    PreviousSelection,
}

impl StackPosition {
    /// Decode the integer encoding used by external commands.
    ///
    /// `n + 2000` (for `-1000 < n < 1000`) is a relative offset, `3000` is the previous
    /// selection, negative values count back from the end and anything else is an index.
    pub fn from_wire(n: i32) -> Self {
        if n == PREVIOUS_SELECTION {
            Self::PreviousSelection
        } else if n > 1000 && n < 3000 {
            Self::Relative(n - INC_OFFSET)
        } else if n < 0 {
            Self::FromEnd(n.unsigned_abs() as usize)
        } else {
            Self::Absolute(n as usize)
        }
    }

    /// The integer encoding of this position.
    pub fn to_wire(self) -> i32 {
        match self {
            Self::PreviousSelection => PREVIOUS_SELECTION,
            Self::Relative(n) => n + INC_OFFSET,
            Self::FromEnd(n) => -(n as i32),
            Self::Absolute(n) => n as i32,
        }
    }

    /// Resolve this position to an index into a list of `n_visible` clients.
    ///
    /// `selected` and `previous` are the indices of the focused and previously focused
    /// clients within that list. Returns `None` when the position can not be resolved.
    /// Absolute indices are returned as is, even when they are past the end of the list.
    pub fn resolve(
        &self,
        n_visible: usize,
        selected: Option<usize>,
        previous: Option<usize>,
    ) -> Option<usize> {
        if n_visible == 0 {
            return None;
        }

        match *self {
            Self::PreviousSelection => previous,
            Self::Relative(offset) => {
                let i = selected? as i64 + offset as i64;
                Some(i.rem_euclid(n_visible as i64) as usize)
            }
            Self::FromEnd(k) => Some(n_visible.saturating_sub(k)),
            Self::Absolute(i) => Some(i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test_case(2001, StackPosition::Relative(1); "increment")]
    #[test_case(1999, StackPosition::Relative(-1); "decrement")]
    #[test_case(3000, StackPosition::PreviousSelection; "previous selection")]
    #[test_case(-1, StackPosition::FromEnd(1); "last")]
    #[test_case(0, StackPosition::Absolute(0); "first")]
    #[test_case(4, StackPosition::Absolute(4); "index")]
    #[test]
    fn from_wire(n: i32, expected: StackPosition) {
        assert_eq!(StackPosition::from_wire(n), expected);
        assert_eq!(expected.to_wire(), n);
    }

    #[test_case(StackPosition::Relative(1), Some(4), Some(0); "increment wraps forward")]
    #[test_case(StackPosition::Relative(-1), Some(0), Some(4); "decrement wraps backward")]
    #[test_case(StackPosition::Relative(7), Some(1), Some(3); "large offsets wrap")]
    #[test_case(StackPosition::Relative(1), None, None; "relative needs a selection")]
    #[test_case(StackPosition::FromEnd(1), Some(0), Some(4); "last client")]
    #[test_case(StackPosition::FromEnd(9), Some(0), Some(0); "from end saturates")]
    #[test_case(StackPosition::Absolute(9), Some(0), Some(9); "absolute past the end")]
    #[test_case(StackPosition::PreviousSelection, Some(0), Some(2); "previous selection")]
    #[test]
    fn resolve(pos: StackPosition, selected: Option<usize>, expected: Option<usize>) {
        assert_eq!(pos.resolve(5, selected, Some(2)), expected);
    }

    #[test]
    fn resolve_with_no_clients_is_none() {
        assert_eq!(StackPosition::Absolute(0).resolve(0, None, None), None);
    }
}
