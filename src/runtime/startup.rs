use std::path::Path;

use anyhow::{Context, bail};
use tracing::warn;

use cadence::config::LibrarySettings;
use cadence::library::{Playlist, load_manifest, scan};

/// A playlist plus the index its source asked to start from, if any.
#[derive(Debug)]
pub struct Supply {
    pub playlist: Playlist,
    pub initial: Option<usize>,
}

/// Build the playlist from a `.toml` manifest or by scanning a directory.
pub fn load_playlist(source: &Path, library: &LibrarySettings) -> anyhow::Result<Supply> {
    let is_manifest = source
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    if is_manifest {
        let manifest = load_manifest(source)?;
        return Ok(Supply {
            playlist: manifest.playlist,
            initial: manifest.initial,
        });
    }

    if !source.is_dir() {
        bail!(
            "{} is neither a directory nor a .toml manifest",
            source.display()
        );
    }
    let tracks = scan(source, library);
    let playlist = Playlist::new(tracks)
        .with_context(|| format!("no playable files found in {}", source.display()))?;
    Ok(Supply {
        playlist,
        initial: None,
    })
}

/// Pick the first track: `--track`, then the manifest, then the config default.
pub fn initial_index(cli: Option<usize>, manifest: Option<usize>, config: usize) -> usize {
    cli.or(manifest).unwrap_or(config)
}

/// Clamp `index` into the playlist, logging when it had to move.
pub fn clamp_index(index: usize, len: usize) -> usize {
    if index < len {
        index
    } else {
        warn!(index, len, "initial track out of range, starting from the first");
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_index_prefers_cli_then_manifest_then_config() {
        assert_eq!(initial_index(Some(3), Some(1), 2), 3);
        assert_eq!(initial_index(None, Some(1), 2), 1);
        assert_eq!(initial_index(None, None, 2), 2);
    }

    #[test]
    fn clamp_index_falls_back_to_first_track() {
        assert_eq!(clamp_index(1, 3), 1);
        assert_eq!(clamp_index(3, 3), 0);
    }

    #[test]
    fn load_playlist_reads_manifests() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("set.toml");
        std::fs::write(
            &path,
            r#"
initial = 1

[[track]]
title = "One"
src = "one.mp3"
duration = 10

[[track]]
title = "Two"
src = "two.mp3"
duration = 20
"#,
        )
        .unwrap();

        let supply = load_playlist(&path, &LibrarySettings::default()).unwrap();
        assert_eq!(supply.playlist.len(), 2);
        assert_eq!(supply.initial, Some(1));
    }

    #[test]
    fn load_playlist_rejects_empty_directories_and_plain_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_playlist(dir.path(), &LibrarySettings::default()).unwrap_err();
        assert!(err.to_string().contains("no playable files"), "{err}");

        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hi").unwrap();
        assert!(load_playlist(&file, &LibrarySettings::default()).is_err());
    }
}
