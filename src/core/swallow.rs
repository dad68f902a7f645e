//! Window swallowing: hiding a terminal behind the graphical program that it launched.
//!
//! When a new window belongs to a process descended from a terminal client, the terminal's
//! [Client] takes over the new window and keeps the original terminal window aside. Once the
//! new window goes away the terminal window is put back exactly as it was.
use crate::{
    core::{client::Client, ClientId, State},
    x::{ClientConfig, WmState, XConn},
    Result, Xid,
};
use std::{fmt, fs};
use tracing::{debug, info};

/// Guard against cycles in a misbehaving process table
const MAX_ANCESTRY_DEPTH: usize = 1024;

/// A source of parent process ids.
pub trait ProcessTree: fmt::Debug {
    /// The parent of the given process, if it is known
    fn parent(&self, pid: u32) -> Option<u32>;

    /// Whether `pid` is `ancestor` or one of its descendants
    fn is_descendant(&self, ancestor: u32, pid: u32) -> bool {
        let mut p = pid;
        for _ in 0..MAX_ANCESTRY_DEPTH {
            if p == ancestor {
                return true;
            }
            match self.parent(p) {
                Some(parent) if parent != 0 && parent != p => p = parent,
                _ => return false,
            }
        }

        false
    }
}

/// Process ancestry read from `/proc/<pid>/stat`
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcFs;

impl ProcessTree for ProcFs {
    fn parent(&self, pid: u32) -> Option<u32> {
        let stat = fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;

        parse_ppid(&stat)
    }
}

// The command name is wrapped in parens and may itself contain spaces or parens, so fields
// are counted from the last ')'
fn parse_ppid(stat: &str) -> Option<u32> {
    let rest = &stat[stat.rfind(')')? + 1..];

    rest.split_whitespace().nth(1)?.parse().ok()
}

impl State {
    /// A terminal client that is not already swallowing anything and owns an ancestor of the
    /// process behind `pid`.
    pub(crate) fn term_for_pid(&self, pid: Option<u32>, is_terminal: bool) -> Option<ClientId> {
        let pid = pid.filter(|&p| p != 0 && !is_terminal)?;

        self.monitors
            .iter()
            .flat_map(|m| m.clients.iter().copied())
            .find(|&id| {
                let c = &self.clients[id];
                c.is_terminal
                    && c.swallowing.is_none()
                    && c.pid.map_or(false, |tpid| self.procs.is_descendant(tpid, pid))
            })
    }

    /// The client currently hiding the given window behind itself
    pub(crate) fn swallowing_client(&self, win: Xid) -> Option<ClientId> {
        self.clients
            .find_key(|c| c.swallowing.as_ref().map_or(false, |s| s.win == win))
    }

    /// Have the terminal `term` take over the window of the newly managed `child`
    pub(crate) fn swallow<X: XConn>(&mut self, term: ClientId, child: ClientId, x: &X) -> Result<()> {
        let c = &self.clients[child];
        if c.no_swallow || c.is_terminal {
            return Ok(());
        }

        let mon = self.clients[child].mon;
        self.monitors[mon].detach(child);
        if self.monitors[mon].detach_stack(child) {
            self.monitors[mon].sel = None;
        }

        let mut c = match self.clients.remove(child) {
            Some(c) => c,
            None => return Ok(()),
        };
        x.set_wm_state(c.win, WmState::Withdrawn)?;

        let t = &mut self.clients[term];
        info!(terminal = %t.win, child = %c.win, "swallowing terminal");
        x.unmap(t.win)?;

        std::mem::swap(&mut t.win, &mut c.win);
        c.mon = t.mon;
        let (win, r, bw, tmon) = (t.win, t.r, t.bw, t.mon);
        t.swallowing = Some(Box::new(c));

        self.update_title(term, x)?;
        x.set_client_config(win, &[ClientConfig::Position(r)])?;
        self.arrange(Some(tmon), x)?;
        x.send_configure_notify(win, self.clients[term].r, bw)?;

        self.update_client_list(x)
    }

    /// Put the terminal window hidden behind `id` back in place of the window that replaced it
    pub(crate) fn unswallow<X: XConn>(&mut self, id: ClientId, x: &X) -> Result<()> {
        let c = &mut self.clients[id];
        let swallowed = match c.swallowing.take() {
            Some(s) => s,
            None => return Ok(()),
        };

        debug!(child = %c.win, terminal = %swallowed.win, "restoring swallowed terminal");
        c.win = swallowed.win;

        self.set_fullscreen(id, false, x)?;
        self.update_title(id, x)?;

        let mon = self.clients[id].mon;
        self.arrange(Some(mon), x)?;

        let c = &self.clients[id];
        x.map(c.win)?;
        x.set_client_config(c.win, &[ClientConfig::Position(c.r)])?;
        x.set_wm_state(c.win, WmState::Normal)?;

        self.focus(None, x)?;
        self.arrange(Some(mon), x)
    }

    /// Forget a hidden terminal window that was destroyed while swallowed
    pub(crate) fn drop_swallowed<X: XConn>(&mut self, owner: ClientId, x: &X) -> Result<()> {
        let c = &mut self.clients[owner];
        let dropped: Option<Box<Client>> = c.swallowing.take();
        let mon = c.mon;

        if let Some(d) = dropped {
            debug!(terminal = %d.win, "swallowed terminal went away");
        }

        self.arrange(Some(mon), x)?;
        self.focus(None, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;
    use std::collections::HashMap;

    #[derive(Debug)]
    struct Table(HashMap<u32, u32>);

    impl ProcessTree for Table {
        fn parent(&self, pid: u32) -> Option<u32> {
            self.0.get(&pid).copied()
        }
    }

    fn table() -> Table {
        // 1 -> 100 (terminal) -> 200 (shell) -> 300 (program)
        Table(HashMap::from([(100, 1), (200, 100), (300, 200), (400, 1), (1, 0)]))
    }

    #[test_case(100, 300, true; "grandchild")]
    #[test_case(100, 100, true; "same process")]
    #[test_case(100, 400, false; "sibling")]
    #[test_case(300, 100, false; "ancestor is not a descendant")]
    #[test_case(100, 999, false; "unknown process")]
    #[test]
    fn is_descendant(ancestor: u32, pid: u32, expected: bool) {
        assert_eq!(table().is_descendant(ancestor, pid), expected);
    }

    #[test]
    fn cycles_terminate() {
        let t = Table(HashMap::from([(10, 20), (20, 10)]));

        assert!(!t.is_descendant(5, 10));
    }

    #[test_case("1234 (st) S 1000 1234 1234 0", Some(1000); "simple")]
    #[test_case("42 (my (weird) prog) R 7 42", Some(7); "parens in the name")]
    #[test_case("42 (a b) S", None; "truncated")]
    #[test_case("garbage", None; "not a stat line")]
    #[test]
    fn ppid_from_stat(stat: &str, expected: Option<u32>) {
        assert_eq!(parse_ppid(stat), expected);
    }
}
