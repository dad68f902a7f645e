//! Parsing of "fake signals": commands written to the root window name by external programs.
//!
//! The wire format is `fsignal:<name>[ <type> <value>]` where type is one of `i`, `ui` or `f`.
//! Only the first 255 bytes of the root window name are considered.
use crate::core::actions::{Action, Arg, SignalAction};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// The prefix that marks a root window name as a fake signal rather than status text
pub const SIGNAL_PREFIX: &str = "fsignal:";

/// The maximum number of bytes of the root window name that are read
pub const MAX_SIGNAL_LEN: usize = 255;

/// A named entry in the signal table
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    /// The name used on the wire
    pub name: String,
    /// The action it triggers
    pub action: SignalAction,
}

impl Signal {
    /// Create a new signal table entry
    pub fn new(name: impl Into<String>, action: SignalAction) -> Self {
        Self {
            name: name.into(),
            action,
        }
    }
}

/// The result of parsing a root window name that carries the fake signal prefix
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum FakeSignal {
    /// A well formed signal and its decoded argument
    Call {
        /// The signal name
        name: String,
        /// The decoded argument
        arg: Arg,
    },
    /// The text after the prefix could not be parsed
    Malformed(String),
}

/// Truncate `s` to at most `max` bytes without splitting a character
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }

    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }

    &s[..end]
}

fn parse_int(s: &str) -> Option<i32> {
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let n = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };

    i32::try_from(if neg { -n } else { n }).ok()
}

fn parse_arg(kind: &str, value: &str) -> Option<Arg> {
    match kind {
        "i" => parse_int(value).map(Arg::Int),
        "ui" => value.parse().ok().map(Arg::UInt),
        "f" => value.parse().ok().map(Arg::Float),
        _ => None,
    }
}

/// Parse a root window name as a fake signal.
///
/// Returns `None` if the text does not start with [SIGNAL_PREFIX], in which case it should be
/// treated as status text.
pub fn parse(text: &str) -> Option<FakeSignal> {
    let text = truncate(text, MAX_SIGNAL_LEN);
    let body = text.strip_prefix(SIGNAL_PREFIX)?;
    let tokens: Vec<&str> = body.split_whitespace().collect();

    let parsed = match tokens.as_slice() {
        [name] => Some((*name, Arg::None)),
        [name, kind, value] => parse_arg(kind, value).map(|arg| (*name, arg)),
        _ => None,
    };

    Some(match parsed {
        Some((name, arg)) => FakeSignal::Call {
            name: name.to_string(),
            arg,
        },
        None => FakeSignal::Malformed(body.to_string()),
    })
}

/// Resolve a parsed fake signal against a signal table.
///
/// Malformed signals and unknown names resolve to nothing.
pub fn resolve(signals: &[Signal], sig: &FakeSignal) -> Option<Action> {
    match sig {
        FakeSignal::Call { name, arg } => {
            let found = signals.iter().find(|s| &s.name == name);
            match found {
                Some(s) => {
                    trace!(%name, ?arg, "resolved fake signal");
                    Some(s.action.with_arg(*arg))
                }
                None => {
                    warn!(%name, "unknown fake signal");
                    None
                }
            }
        }

        FakeSignal::Malformed(raw) => {
            warn!(%raw, "dropping malformed fake signal");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn call(name: &str, arg: Arg) -> Option<FakeSignal> {
        Some(FakeSignal::Call {
            name: name.to_string(),
            arg,
        })
    }

    #[test_case("fsignal:togglebar", call("togglebar", Arg::None); "no argument")]
    #[test_case("fsignal:setmfact f 0.10", call("setmfact", Arg::Float(0.10)); "float")]
    #[test_case("fsignal:view ui 4", call("view", Arg::UInt(4)); "unsigned")]
    #[test_case("fsignal:focusstack i -1", call("focusstack", Arg::Int(-1)); "negative int")]
    #[test_case("fsignal:focusstack i 0x7d1", call("focusstack", Arg::Int(2001)); "hex int")]
    #[test_case("fsignal:bogus x y z", Some(FakeSignal::Malformed("bogus x y z".into())); "too many tokens")]
    #[test_case("fsignal:view s 4", Some(FakeSignal::Malformed("view s 4".into())); "unknown type tag")]
    #[test_case("fsignal:view ui", Some(FakeSignal::Malformed("view ui".into())); "type without value")]
    #[test_case("fsignal:view ui four", Some(FakeSignal::Malformed("view ui four".into())); "bad value")]
    #[test_case("fsignal:", Some(FakeSignal::Malformed("".into())); "empty")]
    #[test_case("12:30 | 50%", None; "status text")]
    #[test_case("fsigna", None; "prefix is too short")]
    #[test]
    fn parse_signal(raw: &str, expected: Option<FakeSignal>) {
        assert_eq!(parse(raw), expected);
    }

    #[test]
    fn only_the_first_255_bytes_are_read() {
        let raw = format!("fsignal:view ui {}", "1".repeat(300));
        let parsed = parse(&raw);

        // the value is cut short and no longer fits in a u32
        assert!(matches!(parsed, Some(FakeSignal::Malformed(s)) if s.len() == 255 - 8));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let s = "é".repeat(200);

        assert_eq!(truncate(&s, 255).len(), 254);
    }

    #[test]
    fn resolve_known_and_unknown_names() {
        let signals = vec![
            Signal::new("togglebar", SignalAction::ToggleBar),
            Signal::new("setmfact", SignalAction::SetMfact),
        ];

        let known = parse("fsignal:setmfact f 0.10").unwrap();
        let unknown = parse("fsignal:nope").unwrap();
        let malformed = parse("fsignal:bogus x y z").unwrap();

        assert_eq!(resolve(&signals, &known), Some(Action::SetMfact(0.10)));
        assert_eq!(resolve(&signals, &unknown), None);
        assert_eq!(resolve(&signals, &malformed), None);
    }
}
