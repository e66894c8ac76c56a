//! Playlist supply: track descriptors, playlists and the two ways of
//! building one (directory scan and TOML manifest).

mod manifest;
mod model;
mod playlist;
mod scan;

pub use manifest::{Manifest, load_manifest};
pub use model::Track;
pub use playlist::Playlist;
pub use scan::scan;
