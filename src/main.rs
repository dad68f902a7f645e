//! tagwm: a dynamic tiling window manager for X11
//!
//! Configuration lives in the defaults of [Config] and can be adjusted at runtime through the X
//! resource database (`tagwm.borderSize`, `tagwm.selectedBackground`, ...).
use std::{env, process};
use tagwm::{
    core::VERSION,
    x::XConn,
    x11rb::connect,
    Config, Result, WindowManager,
};
use tracing_subscriber::{self, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    match args.as_slice() {
        [] => (),
        [flag] if flag == "-v" => {
            eprintln!("tagwm-{VERSION}");
            process::exit(1);
        }
        _ => {
            eprintln!("usage: tagwm [-v]");
            process::exit(1);
        }
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .finish()
        .init();

    let conn = connect()?;
    let mut config = Config::default();
    if let Some(db) = conn.resource_database()? {
        config.apply_resources(&db);
    }

    let wm = WindowManager::new(config, conn)?;

    wm.run()
}
