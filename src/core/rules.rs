//! Matching new clients against the configured rule table
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A static rule applied to newly managed clients.
///
/// Each of `class`, `instance` and `title` matches if it is unset or is a substring of the
/// corresponding client property.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Substring of the WM_CLASS class
    pub class: Option<String>,
    /// Substring of the WM_CLASS instance
    pub instance: Option<String>,
    /// Substring of the window title
    pub title: Option<String>,
    /// Tags to add to the client
    pub tags: u32,
    /// Start the client floating
    pub floating: bool,
    /// The client is a terminal that may swallow its children
    pub terminal: bool,
    /// Never swallow this client
    pub no_swallow: bool,
    /// The monitor to place the client on, -1 for the selected monitor
    pub monitor: i32,
}

impl Rule {
    /// A rule matching on the WM_CLASS class
    pub fn class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            monitor: -1,
            ..Default::default()
        }
    }

    /// A rule matching on the WM_CLASS instance
    pub fn instance(instance: impl Into<String>) -> Self {
        Self {
            instance: Some(instance.into()),
            monitor: -1,
            ..Default::default()
        }
    }

    /// A rule matching on the window title
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            monitor: -1,
            ..Default::default()
        }
    }

    /// Set the tags for matching clients
    pub fn tags(mut self, tags: u32) -> Self {
        self.tags = tags;
        self
    }

    /// Mark matching clients as floating
    pub fn floating(mut self) -> Self {
        self.floating = true;
        self
    }

    /// Mark matching clients as terminals
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    /// Prevent matching clients from being swallowed
    pub fn no_swallow(mut self) -> Self {
        self.no_swallow = true;
        self
    }

    /// Send matching clients to a specific monitor
    pub fn monitor(mut self, monitor: i32) -> Self {
        self.monitor = monitor;
        self
    }

    fn matches(&self, class: &str, instance: &str, title: &str) -> bool {
        let check = |pat: &Option<String>, s: &str| pat.as_ref().map_or(true, |p| s.contains(p));

        check(&self.title, title) && check(&self.class, class) && check(&self.instance, instance)
    }
}

/// The combined outcome of every rule that matched a client
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    /// The union of the tags of every matching rule
    pub tags: u32,
    /// Set by the last matching rule
    pub floating: bool,
    /// Set by the last matching rule
    pub terminal: bool,
    /// Set by the last matching rule
    pub no_swallow: bool,
    /// The monitor of the last matching rule that names an existing monitor
    pub monitor: Option<usize>,
}

/// Run every rule against a client's class, instance and title.
///
/// Flags come from the last matching rule while tags accumulate across all of them. Only
/// monitors below `n_monitors` are considered.
pub fn apply_rules(
    rules: &[Rule],
    class: &str,
    instance: &str,
    title: &str,
    n_monitors: usize,
) -> RuleMatch {
    let mut res = RuleMatch::default();

    for r in rules.iter().filter(|r| r.matches(class, instance, title)) {
        res.terminal = r.terminal;
        res.no_swallow = r.no_swallow;
        res.floating = r.floating;
        res.tags |= r.tags;

        if r.monitor >= 0 && (r.monitor as usize) < n_monitors {
            res.monitor = Some(r.monitor as usize);
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use simple_test_case::test_case;

    #[test_case("Gimp", "gimp", "GNU Image Manipulation Program", 1 << 8, None; "gimp")]
    #[test_case("Spotify", "spotify", "Spotify", 0, None; "class match is case sensitive")]
    #[test_case("Ferdi", "ferdi", "Ferdi", 1 << 3, Some(1); "instance rule with monitor")]
    #[test_case("Alacritty", "alacritty", "zsh", 0, None; "no match")]
    #[test]
    fn stock_rules(class: &str, instance: &str, title: &str, tags: u32, monitor: Option<usize>) {
        let rules = Config::default().rules;
        let res = apply_rules(&rules, class, instance, title, 2);

        assert_eq!(res.tags, tags);
        assert_eq!(res.monitor, monitor);
    }

    #[test]
    fn tags_accumulate_and_flags_come_from_the_last_match() {
        let rules = vec![
            Rule::class("foo").tags(1).terminal(),
            Rule::title("bar").tags(4).floating(),
        ];
        let res = apply_rules(&rules, "foo", "foo", "bar", 1);

        assert_eq!(res.tags, 5);
        assert!(res.floating);
        assert!(!res.terminal);
    }

    #[test]
    fn missing_monitors_are_ignored() {
        let rules = vec![Rule::class("spotify").monitor(1)];

        assert_eq!(apply_rules(&rules, "spotify", "", "", 1).monitor, None);
        assert_eq!(apply_rules(&rules, "spotify", "", "", 2).monitor, Some(1));
    }

    #[test]
    fn picture_in_picture_floats_and_is_never_swallowed() {
        let rules = Config::default().rules;
        let res = apply_rules(&rules, "firefox", "Toolkit", "Picture-in-Picture", 1);

        assert!(res.floating);
        assert!(res.no_swallow);
        assert_eq!(res.tags, 1 << 1);
    }
}
