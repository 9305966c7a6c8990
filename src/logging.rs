//! Log setup. The terminal belongs to the game, so logs go to a file.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `FLAPPY_LOG=debug`.
pub const LOG_ENV: &str = "FLAPPY_LOG";
pub const LOG_FILE: &str = "flappy-power.log";

/// Install a global subscriber writing plain text to `dir/flappy-power.log`.
/// Returns the log path.
pub fn init(dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE);
    let file = File::create(&path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(io::Error::other)?;
    Ok(path)
}
