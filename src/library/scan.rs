use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::{LibrarySettings, TitleField};

use super::model::Track;

const ARTWORK_NAMES: [&str; 4] = ["cover.jpg", "cover.png", "folder.jpg", "folder.png"];

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// First conventional cover image sitting next to `path`, if any.
fn find_artwork(path: &Path) -> Option<String> {
    let dir = path.parent()?;
    ARTWORK_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
        .map(|p| p.display().to_string())
}

/// Track id for `path`: its location relative to the scanned root.
fn track_id(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Tag values read from one file, trimmed and with empty values dropped.
#[derive(Debug, Default)]
pub(super) struct TagInfo {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Duration,
}

fn non_empty(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TagInfo {
    fn read(path: &Path) -> Self {
        match lofty::read_from_path(path) {
            Ok(tagged) => {
                let duration = tagged.properties().duration();
                match tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    Some(tag) => Self {
                        title: non_empty(tag.title()),
                        artist: non_empty(tag.artist()),
                        album: non_empty(tag.album()),
                        duration,
                    },
                    None => Self {
                        duration,
                        ..Self::default()
                    },
                }
            }
            Err(e) => {
                debug!(path = %path.display(), "no readable tags: {e}");
                Self::default()
            }
        }
    }

    /// Display title: the configured fields joined by `sep`, else the tag
    /// title, else the file stem.
    pub(super) fn display_title(&self, path: &Path, fields: &[TitleField], sep: &str) -> String {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let parts: Vec<&str> = fields
            .iter()
            .filter_map(|f| match f {
                TitleField::Title => self.title.as_deref(),
                TitleField::Artist => self.artist.as_deref(),
                TitleField::Album => self.album.as_deref(),
                TitleField::Filename => stem,
            })
            .collect();

        if !parts.is_empty() {
            return parts.join(sep);
        }
        self.title
            .clone()
            .or_else(|| stem.map(str::to_string))
            .unwrap_or_else(|| "UNKNOWN".to_string())
    }
}

/// Scan `dir` for audio files and return them as tracks sorted by title.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file()
            || (!settings.include_hidden && is_hidden(path))
            || !is_audio_file(path, settings)
        {
            continue;
        }

        let tags = TagInfo::read(path);
        let title = tags.display_title(path, &settings.title_fields, &settings.title_separator);

        let mut track = Track::new(track_id(dir, path), title, path, tags.duration);
        if let Some(art) = find_artwork(path) {
            track = track.with_artwork(art);
        }
        tracks.push(track);
    }

    tracks.sort_by_key(|t| t.title().to_lowercase());
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn track_id_is_relative_to_root() {
        let root = Path::new("/music");
        assert_eq!(track_id(root, Path::new("/music/a/b.mp3")), "a/b.mp3");
        assert_eq!(track_id(root, Path::new("/music/c.mp3")), "c.mp3");
    }

    #[test]
    fn scan_filters_non_audio_and_sorts_by_title_case_insensitive() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let settings = LibrarySettings {
            title_fields: vec![TitleField::Title],
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].title(), "A");
        assert_eq!(tracks[0].id(), "A.ogg");
        assert_eq!(tracks[0].nominal_duration(), Duration::ZERO);
        assert_eq!(tracks[1].title(), "b");
        assert_eq!(tracks[1].id(), "b.MP3");
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            title_fields: vec![TitleField::Filename],
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings);

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title(), "visible");
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            title_fields: vec![TitleField::Filename],
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title(), "root");
    }

    #[test]
    fn scan_picks_up_sibling_cover_art() {
        let dir = tempdir().unwrap();
        let album = dir.path().join("album");
        fs::create_dir_all(&album).unwrap();
        fs::write(album.join("song.flac"), b"not real").unwrap();
        fs::write(album.join("folder.png"), b"png").unwrap();
        fs::write(dir.path().join("loose.flac"), b"not real").unwrap();

        let tracks = scan(dir.path(), &LibrarySettings::default());
        let song = tracks.iter().find(|t| t.id() == "album/song.flac").unwrap();
        let loose = tracks.iter().find(|t| t.id() == "loose.flac").unwrap();

        assert_eq!(
            song.artwork(),
            Some(album.join("folder.png").display().to_string().as_str())
        );
        assert_eq!(loose.artwork(), None);
    }
}
