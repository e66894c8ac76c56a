use std::path::Path;

use cadence::config::{self, Settings};

/// Load settings from `explicit` or the default location.
///
/// Config is optional; a broken file never prevents the player from starting.
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(config::resolve_config_path);

    match Settings::load_from(path.as_deref()) {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("cadence: invalid config, using defaults: {msg}");
                Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            eprintln!("cadence: failed to load config, using defaults: {e}");
            Settings::default()
        }
    }
}
