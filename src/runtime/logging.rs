use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use cadence::config::LoggingSettings;

/// Install the file logger.
///
/// The terminal belongs to the TUI, so records go to `logging.file` or the
/// default state path. Logging stays off when neither can be opened.
pub fn init(settings: &LoggingSettings) {
    let Some(path) = settings.file.clone().or_else(default_log_path) else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("cadence: cannot open log file {}: {e}", path.display());
            return;
        }
    };

    let filter = EnvFilter::try_from_env("CADENCE_LOG")
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("cadence=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// `$XDG_STATE_HOME/cadence/cadence.log`, or `~/.local/state/cadence/cadence.log`.
fn default_log_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };
    state_home.map(|d| d.join("cadence").join("cadence.log"))
}
