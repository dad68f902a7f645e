//! The closed set of operations that bindings and fake signals can trigger.
//!
//! Every [Action] is dispatched through [WindowManager::run_action][crate::core::WindowManager]
//! with a single match: there are no function pointers in the binding tables.
use crate::pure::StackPosition;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A typed argument decoded from a fake signal
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Arg {
    /// No argument was provided
    #[default]
    None,
    /// `i <value>`
    Int(i32),
    /// `ui <value>`
    UInt(u32),
    /// `f <value>`
    Float(f32),
}

impl Arg {
    /// This argument as a signed integer. Missing arguments are zero.
    pub fn as_i32(&self) -> i32 {
        match *self {
            Arg::None => 0,
            Arg::Int(i) => i,
            Arg::UInt(u) => u as i32,
            Arg::Float(f) => f as i32,
        }
    }

    /// This argument as an unsigned integer. Missing arguments are zero.
    pub fn as_u32(&self) -> u32 {
        match *self {
            Arg::None => 0,
            Arg::Int(i) => i as u32,
            Arg::UInt(u) => u,
            Arg::Float(f) => f as u32,
        }
    }

    /// This argument as a float. Missing arguments are zero.
    pub fn as_f32(&self) -> f32 {
        match *self {
            Arg::None => 0.0,
            Arg::Int(i) => i as f32,
            Arg::UInt(u) => u as f32,
            Arg::Float(f) => f,
        }
    }
}

/// Something the window manager can be asked to do.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Show the tags in the given mask on the selected monitor. A mask with no valid tag bits
    /// switches back to the previous view.
    View(u32),
    /// Show every tag
    ViewAll,
    /// Toggle the visibility of the tags in the given mask
    ToggleView(u32),
    /// Set the tags of the selected client
    Tag(u32),
    /// Put the selected client on every tag
    TagAll,
    /// Toggle the tags in the given mask on the selected client
    ToggleTag(u32),
    /// [Action::View] by tag index
    ViewEx(u32),
    /// [Action::ToggleView] by tag index
    ToggleViewEx(u32),
    /// [Action::Tag] by tag index
    TagEx(u32),
    /// [Action::ToggleTag] by tag index
    ToggleTagEx(u32),
    /// Move focus through the visible clients
    FocusStack(StackPosition),
    /// Move the selected client within the visible clients
    PushStack(StackPosition),
    /// Swap the selected client with the master client
    Zoom,
    /// Adjust the master area fraction: relative below 1.0, absolute (minus 1.0) above
    SetMfact(f32),
    /// Change the number of master clients by the given amount
    IncNmaster(i32),
    /// Set the number of master clients
    SetNmaster(i32),
    /// Select a layout by index, or toggle to the previous layout with `None`
    SetLayout(Option<usize>),
    /// Select the layout at an offset from the current one
    SetLayoutEx(i32),
    /// Show or hide the bar of the selected monitor
    ToggleBar,
    /// Toggle the floating state of the selected client
    ToggleFloating,
    /// Toggle the fullscreen state of the selected client
    ToggleFullscreen,
    /// Toggle whether the selected client is visible on every tag
    ToggleSticky,
    /// Focus the monitor at the given offset from the selected one
    FocusMon(i32),
    /// Send the selected client to the monitor at the given offset
    TagMon(i32),
    /// Close the selected client
    KillClient,
    /// Run an external program
    Spawn(Vec<String>),
    /// Interactively move the selected client with the mouse
    MoveMouse,
    /// Interactively resize the selected client with the mouse
    ResizeMouse,
    /// Grow (or shrink, if negative) every gap of the selected monitor
    IncGaps(i32),
    /// Enable or disable gaps everywhere
    ToggleGaps,
    /// Reset the gaps of the selected monitor to their configured values
    DefaultGaps,
    /// Re-read cosmetic settings from the X resource database
    ReloadResources,
    /// Exit the window manager
    Quit,
}

impl Action {
    /// Convenience constructor for [Action::Spawn] from a list of program arguments
    pub fn spawn(args: &[&str]) -> Self {
        Self::Spawn(args.iter().map(|s| s.to_string()).collect())
    }

    /// Bar tag bindings with a zero mask act on the tag that was clicked.
    pub(crate) fn for_clicked_tag(&self, tag: usize) -> Self {
        let mask = 1 << tag;

        match *self {
            Action::View(0) => Action::View(mask),
            Action::ToggleView(0) => Action::ToggleView(mask),
            Action::Tag(0) => Action::Tag(mask),
            Action::ToggleTag(0) => Action::ToggleTag(mask),
            _ => self.clone(),
        }
    }
}

/// The actions that can be triggered through a fake signal, each taking one [Arg].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalAction {
    /// [Action::FocusStack]
    FocusStack,
    /// [Action::SetMfact]
    SetMfact,
    /// [Action::ToggleBar]
    ToggleBar,
    /// [Action::IncNmaster]
    IncNmaster,
    /// [Action::ToggleFloating]
    ToggleFloating,
    /// [Action::FocusMon]
    FocusMon,
    /// [Action::TagMon]
    TagMon,
    /// [Action::Zoom]
    Zoom,
    /// [Action::View]
    View,
    /// [Action::ViewAll]
    ViewAll,
    /// [Action::ViewEx]
    ViewEx,
    /// [Action::ToggleView]
    ToggleView,
    /// [Action::ToggleViewEx]
    ToggleViewEx,
    /// [Action::IncGaps]
    IncGaps,
    /// [Action::ToggleGaps]
    ToggleGaps,
    /// [Action::DefaultGaps]
    DefaultGaps,
    /// [Action::Tag]
    Tag,
    /// [Action::TagAll]
    TagAll,
    /// [Action::TagEx]
    TagEx,
    /// [Action::ToggleTag]
    ToggleTag,
    /// [Action::ToggleTagEx]
    ToggleTagEx,
    /// [Action::KillClient]
    KillClient,
    /// [Action::SetLayout]
    SetLayout,
    /// [Action::SetLayoutEx]
    SetLayoutEx,
    /// [Action::ReloadResources]
    ReloadResources,
}

impl SignalAction {
    /// Build the concrete [Action] for a decoded argument.
    pub fn with_arg(self, arg: Arg) -> Action {
        use SignalAction::*;

        match self {
            FocusStack => Action::FocusStack(StackPosition::from_wire(arg.as_i32())),
            SetMfact => Action::SetMfact(arg.as_f32()),
            ToggleBar => Action::ToggleBar,
            IncNmaster => Action::IncNmaster(arg.as_i32()),
            ToggleFloating => Action::ToggleFloating,
            FocusMon => Action::FocusMon(arg.as_i32()),
            TagMon => Action::TagMon(arg.as_i32()),
            Zoom => Action::Zoom,
            View => Action::View(arg.as_u32()),
            ViewAll => Action::ViewAll,
            ViewEx => Action::ViewEx(arg.as_u32()),
            ToggleView => Action::ToggleView(arg.as_u32()),
            ToggleViewEx => Action::ToggleViewEx(arg.as_u32()),
            IncGaps => Action::IncGaps(arg.as_i32()),
            ToggleGaps => Action::ToggleGaps,
            DefaultGaps => Action::DefaultGaps,
            Tag => Action::Tag(arg.as_u32()),
            TagAll => Action::TagAll,
            TagEx => Action::TagEx(arg.as_u32()),
            ToggleTag => Action::ToggleTag(arg.as_u32()),
            ToggleTagEx => Action::ToggleTagEx(arg.as_u32()),
            KillClient => Action::KillClient,
            // A missing argument toggles between the two layout slots
            SetLayout => match arg {
                Arg::None => Action::SetLayout(None),
                arg => Action::SetLayout(Some(arg.as_u32() as usize)),
            },
            SetLayoutEx => Action::SetLayoutEx(arg.as_i32()),
            ReloadResources => Action::ReloadResources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test_case(Action::View(0), Action::View(1 << 3); "view")]
    #[test_case(Action::ToggleTag(0), Action::ToggleTag(1 << 3); "toggle tag")]
    #[test_case(Action::View(4), Action::View(4); "explicit mask is kept")]
    #[test_case(Action::Zoom, Action::Zoom; "unrelated action")]
    #[test]
    fn for_clicked_tag(action: Action, expected: Action) {
        assert_eq!(action.for_clicked_tag(3), expected);
    }

    #[test_case(SignalAction::FocusStack, Arg::Int(2001), Action::FocusStack(StackPosition::Relative(1)); "focusstack inc")]
    #[test_case(SignalAction::SetMfact, Arg::Float(0.1), Action::SetMfact(0.1); "setmfact")]
    #[test_case(SignalAction::View, Arg::UInt(4), Action::View(4); "view")]
    #[test_case(SignalAction::View, Arg::None, Action::View(0); "missing arg is zero")]
    #[test_case(SignalAction::SetLayout, Arg::None, Action::SetLayout(None); "setlayout toggles")]
    #[test_case(SignalAction::SetLayout, Arg::UInt(1), Action::SetLayout(Some(1)); "setlayout index")]
    #[test]
    fn signal_with_arg(sig: SignalAction, arg: Arg, expected: Action) {
        assert_eq!(sig.with_arg(arg), expected);
    }
}
