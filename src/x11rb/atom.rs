use crate::{x::Atom, x11rb::Result};
use std::collections::HashMap;
use strum::IntoEnumIterator;
use x11rb::{connection::Connection, protocol::xproto::ConnectionExt};

/// The server side values of every [Atom], interned once on startup
#[derive(Debug)]
pub(crate) struct Atoms {
    atoms: HashMap<Atom, u32>,
}

impl Atoms {
    pub(crate) fn new(conn: &impl Connection) -> Result<Self> {
        // send all of the requests before waiting on any replies
        let requests = Atom::iter()
            .map(|atom| Ok((atom, conn.intern_atom(false, atom.as_ref().as_bytes())?)))
            .collect::<Result<Vec<_>>>()?;

        let atoms = requests
            .into_iter()
            .map(|(atom, cookie)| Ok((atom, cookie.reply()?.atom)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self { atoms })
    }

    pub(crate) fn known(&self, atom: Atom) -> u32 {
        // every variant is interned in new
        self.atoms.get(&atom).copied().unwrap_or(x11rb::NONE)
    }

    pub(crate) fn lookup(&self, value: u32) -> Option<Atom> {
        self.atoms
            .iter()
            .find(|(_, &v)| v == value)
            .map(|(&atom, _)| atom)
    }
}
