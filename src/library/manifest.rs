//! TOML playlist manifests.
//!
//! ```toml
//! initial = 1
//!
//! [[track]]
//! id = "intro"
//! title = "Intro"
//! src = "audio/intro.mp3"
//! duration = 180
//! artwork = "art/intro.jpg"
//! ```
//!
//! `id` defaults to the 1-based position and relative `src` paths resolve
//! against the manifest's directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::PlaylistError;

use super::model::Track;
use super::playlist::Playlist;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    initial: Option<usize>,
    #[serde(default, rename = "track")]
    tracks: Vec<ManifestTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestTrack {
    id: Option<String>,
    title: String,
    src: PathBuf,
    /// Nominal duration in seconds.
    #[serde(default)]
    duration: f64,
    artwork: Option<String>,
}

/// A playlist read from a manifest, plus the index it asks to start on.
#[derive(Debug)]
pub struct Manifest {
    pub playlist: Playlist,
    pub initial: Option<usize>,
}

/// Read and parse the manifest at `path`.
pub fn load_manifest(path: &Path) -> Result<Manifest, PlaylistError> {
    let text = fs::read_to_string(path).map_err(|source| PlaylistError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    parse_manifest(&text, base).map_err(|e| match e {
        PlaylistError::Manifest { reason, .. } => PlaylistError::Manifest {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })
}

pub(super) fn parse_manifest(text: &str, base: &Path) -> Result<Manifest, PlaylistError> {
    let invalid = |reason: String| PlaylistError::Manifest {
        path: base.to_path_buf(),
        reason,
    };

    let file: ManifestFile = toml::from_str(text).map_err(|e| invalid(e.to_string()))?;

    let mut tracks = Vec::with_capacity(file.tracks.len());
    for (i, t) in file.tracks.into_iter().enumerate() {
        let duration = Duration::try_from_secs_f64(t.duration).map_err(|e| {
            invalid(format!(
                "track {} has an invalid duration {}: {e}",
                i + 1,
                t.duration
            ))
        })?;

        let src = if t.src.is_absolute() {
            t.src
        } else {
            base.join(t.src)
        };
        let id = t.id.unwrap_or_else(|| (i + 1).to_string());

        let mut track = Track::new(id, t.title, src, duration);
        if let Some(art) = t.artwork {
            track = track.with_artwork(art);
        }
        tracks.push(track);
    }

    let playlist = Playlist::new(tracks)?;
    if let Some(i) = file.initial {
        if i >= playlist.len() {
            return Err(invalid(format!(
                "initial index {i} is out of range for {} tracks",
                playlist.len()
            )));
        }
    }

    Ok(Manifest {
        playlist,
        initial: file.initial,
    })
}
