//! What each monitor's bar should show.
//!
//! The core decides the content and state of the bar. Turning that into pixels is left to the
//! [XConn][crate::x::XConn] implementation.
use crate::{
    core::{State, VERSION},
    pure::geometry::Rect,
    x::XConn,
    Color, Result,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The colors used when rendering a bar
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarColors {
    /// Background of unselected regions
    pub normal_bg: Color,
    /// Text of unselected regions
    pub normal_fg: Color,
    /// Background of selected tags and the focused title
    pub selected_bg: Color,
    /// Text of selected tags and the focused title
    pub selected_fg: Color,
}

/// The state of a single tag label
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLabel {
    /// The name of the tag
    pub name: String,
    /// The tag is part of the monitor's current view
    pub selected: bool,
    /// At least one client on the monitor has this tag
    pub occupied: bool,
    /// The focused client of the selected monitor has this tag
    pub focused: bool,
    /// A client with this tag has its urgency hint set
    pub urgent: bool,
}

/// The title section of the bar
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarTitle {
    /// The title of the selected client
    pub text: String,
    /// The selected client is floating
    pub floating: bool,
    /// The selected client has a fixed size
    pub fixed: bool,
}

/// Everything needed to render the bar of one monitor
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarInfo {
    /// The index of the monitor this bar belongs to
    pub monitor: usize,
    /// Where the bar window should be placed
    pub r: Rect,
    /// Whether the bar is currently shown
    pub visible: bool,
    /// This is the bar of the selected monitor
    pub is_selected: bool,
    /// One label per configured tag
    pub tags: Vec<TagLabel>,
    /// The symbol of the active layout
    pub layout_symbol: String,
    /// The selected client of the monitor, if any
    pub title: Option<BarTitle>,
    /// Status text, only present on the selected monitor
    pub status: Option<String>,
    /// Colors to render with
    pub colors: BarColors,
}

/// Strip control characters from a root window name to get the text to show as the status.
///
/// An unset name shows the version of the window manager instead.
pub fn status_text(raw: Option<&str>) -> String {
    match raw {
        Some(s) => s.chars().filter(|&c| c >= ' ').collect(),
        None => format!("tagwm-{VERSION}"),
    }
}

impl State {
    /// Compute what the bar of a given monitor should be showing
    pub fn bar_info(&self, m: usize) -> BarInfo {
        let mon = &self.monitors[m];
        let is_selected = m == self.selmon;
        let sel = mon.sel.and_then(|id| self.clients.get(id));

        let (mut occupied, mut urgent) = (0, 0);
        for c in mon.clients.iter().filter_map(|&id| self.clients.get(id)) {
            occupied |= c.tags;
            if c.is_urgent {
                urgent |= c.tags;
            }
        }

        let focused = if is_selected {
            sel.map(|c| c.tags).unwrap_or(0)
        } else {
            0
        };

        let tags = self
            .config
            .tags
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let bit = 1 << i;
                TagLabel {
                    name: name.clone(),
                    selected: mon.tags() & bit != 0,
                    occupied: occupied & bit != 0,
                    focused: focused & bit != 0,
                    urgent: urgent & bit != 0,
                }
            })
            .collect();

        BarInfo {
            monitor: m,
            r: Rect::new(mon.work.x, mon.by, mon.work.w, self.config.bar_height),
            visible: mon.showbar,
            is_selected,
            tags,
            layout_symbol: mon.ltsymbol.clone(),
            title: sel.map(|c| BarTitle {
                text: c.name.clone(),
                floating: c.is_floating,
                fixed: c.is_fixed,
            }),
            status: is_selected.then(|| self.status.clone()),
            colors: BarColors {
                normal_bg: self.config.normal_bg,
                normal_fg: self.config.normal_fg,
                selected_bg: self.config.selected_bg,
                selected_fg: self.config.selected_fg,
            },
        }
    }

    pub(crate) fn draw_bar<X: XConn>(&self, m: usize, x: &X) -> Result<()> {
        x.draw_bar(&self.bar_info(m))
    }

    pub(crate) fn draw_bars<X: XConn>(&self, x: &X) -> Result<()> {
        for m in 0..self.monitors.len() {
            self.draw_bar(m, x)?;
        }

        Ok(())
    }

    /// Re-read the status text from the root window name
    pub(crate) fn update_status<X: XConn>(&mut self, x: &X) -> Result<()> {
        let raw = x.root_name()?;
        self.status = status_text(raw.as_deref());

        self.draw_bar(self.selmon, x)
    }
}
