//! Utility functions for use in other parts of tagwm
use crate::Result;
use nix::unistd::setsid;
use std::{
    os::unix::process::CommandExt,
    process::{Command, Stdio},
};
use tracing::{info, warn};

/// Run an external command in its own session, detached from the window manager.
///
/// The first element of `args` is the program to run. stdin, stdout and stderr are redirected
/// to /dev/null.
pub fn spawn(args: &[String]) -> Result<()> {
    let (prog, rest) = match args.split_first() {
        Some(split) => split,
        None => {
            warn!("attempt to spawn an empty command");
            return Ok(());
        }
    };

    info!(?args, "spawning subprocess");
    let mut cmd = Command::new(prog);
    cmd.args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    // SAFETY: setsid is async-signal-safe and nothing else runs between fork and exec
    unsafe {
        cmd.pre_exec(|| {
            setsid().map_err(std::io::Error::from)?;
            Ok(())
        });
    }

    cmd.spawn()?;

    Ok(())
}
