//! User facing configuration of the [WindowManager][crate::core::WindowManager].
use crate::{
    core::{
        actions::{Action, SignalAction},
        bindings::{ButtonBinding, Click, KeyBinding, ModMask, MouseButton},
        keysyms::XKeySym,
        layout::{Arrange, Gaps, Layout},
        rules::Rule,
        signal::Signal,
    },
    pure::StackPosition,
    Color, Error, Result,
};
use tracing::{debug, warn};

/// The modifier used by the stock bindings
pub const MODKEY: ModMask = ModMask::MOD4;

/// The prefix for X resources read by the window manager
pub const RESOURCE_PREFIX: &str = "tagwm";

/// The main user facing configuration details.
///
/// The [Default] implementation is the stock configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Names of the tags shown in the bar. At most 31 tags are supported.
    pub tags: Vec<String>,
    /// Rules applied to new clients
    pub rules: Vec<Rule>,
    /// Available layouts. The first two start in each monitor's layout slots.
    pub layouts: Vec<Layout>,
    /// Key bindings
    pub keys: Vec<KeyBinding>,
    /// Mouse button bindings
    pub buttons: Vec<ButtonBinding>,
    /// Named actions that can be triggered through the root window name
    pub signals: Vec<Signal>,
    /// Distance in pixels within which dragged clients snap to monitor edges
    pub snap: i32,
    /// Drop the outer gaps when a monitor has a single tiled client
    pub smart_gaps: bool,
    /// Show the bar by default
    pub show_bar: bool,
    /// Show the bar at the top of the monitor rather than the bottom
    pub top_bar: bool,
    /// Height of the bar in pixels
    pub bar_height: i32,
    /// Border width of clients in pixels
    pub border_px: i32,
    /// Default gaps for every monitor
    pub gaps: Gaps,
    /// Whether gaps are enabled on startup
    pub gaps_enabled: bool,
    /// Default master area fraction
    pub mfact: f32,
    /// Default number of master clients
    pub nmaster: usize,
    /// Respect size hints for tiled clients as well as floating ones
    pub resize_hints: bool,
    /// Bar background
    pub normal_bg: Color,
    /// Bar text
    pub normal_fg: Color,
    /// Border of unfocused clients
    pub normal_border: Color,
    /// Background of selected tags and the focused title
    pub selected_bg: Color,
    /// Text of selected tags and the focused title
    pub selected_fg: Color,
    /// Border of the focused client
    pub selected_border: Color,
}

fn tag_keys(key: XKeySym, tag: usize) -> Vec<KeyBinding> {
    let mask = 1 << tag;

    vec![
        KeyBinding::new(MODKEY, key, Action::View(mask)),
        KeyBinding::new(MODKEY | ModMask::CONTROL, key, Action::ToggleView(mask)),
        KeyBinding::new(MODKEY | ModMask::SHIFT, key, Action::Tag(mask)),
        KeyBinding::new(
            MODKEY | ModMask::CONTROL | ModMask::SHIFT,
            key,
            Action::ToggleTag(mask),
        ),
    ]
}

fn default_keys() -> Vec<KeyBinding> {
    use XKeySym::*;

    let shift = MODKEY | ModMask::SHIFT;
    let inc = |n| StackPosition::Relative(n);

    let mut keys = vec![
        KeyBinding::new(MODKEY, XK_b, Action::ToggleBar),
        KeyBinding::new(MODKEY, XK_g, Action::ToggleGaps),
        KeyBinding::new(MODKEY, XK_Page_Up, Action::IncNmaster(1)),
        KeyBinding::new(MODKEY, XK_Page_Down, Action::IncNmaster(-1)),
        KeyBinding::new(MODKEY, XK_Home, Action::SetNmaster(1)),
        KeyBinding::new(MODKEY, XK_s, Action::ToggleSticky),
        KeyBinding::new(MODKEY, XK_h, Action::SetMfact(-0.05)),
        KeyBinding::new(MODKEY, XK_l, Action::SetMfact(0.05)),
        KeyBinding::new(MODKEY, XK_Tab, Action::View(0)),
        KeyBinding::new(MODKEY, XK_t, Action::SetLayoutEx(1)),
        KeyBinding::new(MODKEY, XK_space, Action::Zoom),
        KeyBinding::new(shift, XK_space, Action::ToggleFloating),
        KeyBinding::new(MODKEY, XK_f, Action::ToggleFullscreen),
        KeyBinding::new(MODKEY, XK_0, Action::ViewAll),
        KeyBinding::new(shift, XK_0, Action::TagAll),
        KeyBinding::new(MODKEY, XK_Left, Action::FocusMon(-1)),
        KeyBinding::new(MODKEY, XK_Right, Action::FocusMon(1)),
        KeyBinding::new(MODKEY, XK_Up, Action::FocusMon(1)),
        KeyBinding::new(MODKEY, XK_Down, Action::FocusMon(-1)),
        KeyBinding::new(shift, XK_Left, Action::TagMon(-1)),
        KeyBinding::new(shift, XK_Right, Action::TagMon(1)),
        KeyBinding::new(shift, XK_Up, Action::TagMon(1)),
        KeyBinding::new(shift, XK_Down, Action::TagMon(-1)),
        KeyBinding::new(MODKEY, XK_q, Action::KillClient),
        KeyBinding::new(shift, XK_q, Action::Quit),
        KeyBinding::new(shift, XK_r, Action::ReloadResources),
        KeyBinding::new(MODKEY, XK_d, Action::spawn(&["dmenu_run"])),
        KeyBinding::new(MODKEY, XK_Return, Action::spawn(&["st"])),
        KeyBinding::new(MODKEY, XK_j, Action::FocusStack(inc(1))),
        KeyBinding::new(MODKEY, XK_k, Action::FocusStack(inc(-1))),
        KeyBinding::new(shift, XK_j, Action::PushStack(inc(1))),
        KeyBinding::new(shift, XK_k, Action::PushStack(inc(-1))),
    ];

    for tag in 0..9 {
        if let Some(key) = XKeySym::digit(tag + 1) {
            keys.extend(tag_keys(key, tag));
        }
    }

    keys
}

fn default_buttons() -> Vec<ButtonBinding> {
    use Click::*;
    use MouseButton::*;

    let none = ModMask::empty();

    vec![
        ButtonBinding::new(LtSymbol, none, Left, Action::SetLayout(None)),
        ButtonBinding::new(LtSymbol, none, Right, Action::SetLayout(Some(2))),
        ButtonBinding::new(WinTitle, none, Middle, Action::Zoom),
        ButtonBinding::new(ClientWin, MODKEY, Left, Action::MoveMouse),
        ButtonBinding::new(ClientWin, MODKEY, Middle, Action::ToggleFloating),
        ButtonBinding::new(ClientWin, MODKEY, Right, Action::ResizeMouse),
        ButtonBinding::new(TagBar, none, Left, Action::View(0)),
        ButtonBinding::new(TagBar, none, Right, Action::ToggleView(0)),
        ButtonBinding::new(TagBar, MODKEY, Left, Action::Tag(0)),
        ButtonBinding::new(TagBar, MODKEY, Right, Action::ToggleTag(0)),
    ]
}

fn default_signals() -> Vec<Signal> {
    use SignalAction::*;

    [
        ("focusstack", FocusStack),
        ("setmfact", SetMfact),
        ("togglebar", ToggleBar),
        ("incnmaster", IncNmaster),
        ("togglefloating", ToggleFloating),
        ("focusmon", FocusMon),
        ("tagmon", TagMon),
        ("zoom", Zoom),
        ("view", View),
        ("viewall", ViewAll),
        ("viewex", ViewEx),
        ("toggleview", ToggleView),
        ("toggleviewex", ToggleViewEx),
        ("incgaps", IncGaps),
        ("togglegaps", ToggleGaps),
        ("defaultgaps", DefaultGaps),
        ("tag", Tag),
        ("tagall", TagAll),
        ("tagex", TagEx),
        ("toggletag", ToggleTag),
        ("toggletagex", ToggleTagEx),
        ("killclient", KillClient),
        ("setlayout", SetLayout),
        ("setlayoutex", SetLayoutEx),
        ("xresources", ReloadResources),
    ]
    .into_iter()
    .map(|(name, action)| Signal::new(name, action))
    .collect()
}

fn default_rules() -> Vec<Rule> {
    vec![
        Rule::instance("ferdi").tags(1 << 3).monitor(1),
        Rule::class("firefox").tags(1 << 1).no_swallow(),
        Rule::class("Gimp").tags(1 << 8),
        Rule::class("St").terminal(),
        Rule::class("spotify").tags(1 << 4).monitor(1),
        Rule::class("tidal").tags(1 << 4).monitor(1),
        Rule::title("Event Tester").floating().no_swallow(),
        Rule::title("Picture-in-Picture").floating().no_swallow(),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tags: (1..=9).map(|n| n.to_string()).collect(),
            rules: default_rules(),
            layouts: vec![
                Layout::new("[]=", Some(Arrange::Tile)),
                Layout::new("|M|", Some(Arrange::CenteredMaster)),
                Layout::new("><>", None),
            ],
            keys: default_keys(),
            buttons: default_buttons(),
            signals: default_signals(),
            snap: 32,
            smart_gaps: false,
            show_bar: true,
            top_bar: true,
            bar_height: 20,
            border_px: 1,
            gaps: Gaps::uniform(10),
            gaps_enabled: true,
            mfact: 0.55,
            nmaster: 1,
            resize_hints: false,
            normal_bg: Color::new_from_hex(0x222222),
            normal_fg: Color::new_from_hex(0xbbbbbb),
            normal_border: Color::new_from_hex(0x444444),
            selected_bg: Color::new_from_hex(0x005577),
            selected_fg: Color::new_from_hex(0xeeeeee),
            selected_border: Color::new_from_hex(0x005577),
        }
    }
}

impl Config {
    /// A mask with a bit set for every configured tag
    pub fn tag_mask(&self) -> u32 {
        match self.tags.len() {
            n if n >= 32 => u32::MAX,
            n => (1 << n) - 1,
        }
    }

    /// Check the invariants that the window manager relies on
    pub fn validate(&self) -> Result<()> {
        if self.tags.is_empty() || self.tags.len() > 31 {
            return Err(Error::Custom(format!(
                "between 1 and 31 tags are supported, got {}",
                self.tags.len()
            )));
        }

        if self.layouts.is_empty() {
            return Err(Error::Custom("at least one layout is required".to_string()));
        }

        Ok(())
    }

    /// Update cosmetic settings from the contents of an X resource database.
    ///
    /// Lines of the form `tagwm.<name>: <value>` are read. Unknown names are ignored and values
    /// that fail to parse are logged and skipped.
    pub fn apply_resources(&mut self, db: &str) {
        for (name, value) in resource_lines(db) {
            if let Err(error) = self.apply_resource(name, value) {
                warn!(%error, "skipping X resource");
            }
        }
    }

    fn apply_resource(&mut self, name: &str, value: &str) -> Result<()> {
        let int = || -> Result<i32> {
            value
                .parse::<u32>()
                .ok()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| Error::InvalidResource {
                    name: name.to_string(),
                    value: value.to_string(),
                })
        };
        let color = || Color::try_from(value);

        debug!(%name, %value, "applying X resource");
        match name {
            "borderSize" => self.border_px = int()?,
            "barHeight" => self.bar_height = int()?,
            "borderColor" => self.normal_border = color()?,
            "selectedBorderColor" => self.selected_border = color()?,
            "background" => self.normal_bg = color()?,
            "foreground" => self.normal_fg = color()?,
            "selectedBackground" => self.selected_bg = color()?,
            "selectedForeground" => self.selected_fg = color()?,
            "gapsInner" => {
                let px = int()?;
                self.gaps.inner_h = px;
                self.gaps.inner_v = px;
            }
            "gapsOuter" => {
                let px = int()?;
                self.gaps.outer_h = px;
                self.gaps.outer_v = px;
            }
            _ => (),
        }

        Ok(())
    }
}

/// The `(name, value)` pairs in a resource database string that belong to the window manager
fn resource_lines(db: &str) -> impl Iterator<Item = (&str, &str)> {
    db.lines().filter_map(|line| {
        let line = line.trim();
        if line.starts_with('!') {
            return None;
        }

        let (key, value) = line.split_once(':')?;
        let name = key.trim().strip_prefix(RESOURCE_PREFIX)?.strip_prefix('.')?;

        Some((name, value.trim()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_config_is_valid() {
        let c = Config::default();

        assert!(c.validate().is_ok());
        assert_eq!(c.tag_mask(), 0x1ff);
    }

    #[test]
    fn every_tag_has_four_key_bindings() {
        let keys = Config::default().keys;

        for tag in 0..9 {
            let n = keys
                .iter()
                .filter(|k| {
                    matches!(
                        k.action,
                        Action::View(m) | Action::ToggleView(m) | Action::Tag(m) | Action::ToggleTag(m)
                        if m == 1 << tag
                    )
                })
                .count();
            assert_eq!(n, 4, "tag {tag}");
        }
    }

    #[test]
    fn too_many_tags_is_an_error() {
        let c = Config {
            tags: (0..32).map(|n| n.to_string()).collect(),
            ..Default::default()
        };

        assert!(c.validate().is_err());
    }

    #[test]
    fn resources_are_applied() {
        let db = "\
! comment
*.background: #000000
tagwm.borderSize:\t3
tagwm.barHeight: 24
tagwm.selectedBorderColor: #ff0000
tagwm.gapsInner: 4
tagwm.gapsOuter: 6
otherwm.borderSize: 9
";
        let mut c = Config::default();
        c.apply_resources(db);

        assert_eq!(c.border_px, 3);
        assert_eq!(c.bar_height, 24);
        assert_eq!(c.selected_border, Color::new_from_hex(0xff0000));
        assert_eq!(c.normal_bg, Color::new_from_hex(0x222222));
        assert_eq!(
            c.gaps,
            Gaps {
                outer_h: 6,
                outer_v: 6,
                inner_h: 4,
                inner_v: 4
            }
        );
    }

    #[test]
    fn invalid_resources_leave_the_config_unchanged() {
        let mut c = Config::default();
        c.apply_resources("tagwm.borderSize: -2\ntagwm.borderColor: red\n");

        assert_eq!(c, Config::default());
    }
}
