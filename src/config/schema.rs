use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadence/config.toml` or `~/.config/cadence/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENCE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Volume the first engine instance starts with (0.0 - 1.0).
    pub initial_volume: f32,
    /// How often the position is sampled while playing (milliseconds).
    pub sample_interval_ms: u64,
    /// Whether next/previous/end-of-track keep playing on the new track.
    pub resume_on_advance: ResumeSetting,
    /// What happens when a track finishes on its own.
    pub loop_mode: LoopModeSetting,
    /// Track index to load at startup when neither the CLI nor a manifest picks one.
    pub initial_track: usize,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.8,
            sample_interval_ms: 100,
            resume_on_advance: ResumeSetting::KeepPlaying,
            loop_mode: LoopModeSetting::LoopAll,
            initial_track: 0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResumeSetting {
    #[serde(alias = "off")]
    Never,
    #[serde(alias = "keep_playing", alias = "keep")]
    KeepPlaying,
    #[serde(alias = "on")]
    Always,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoopModeSetting {
    #[serde(alias = "no_loop", alias = "noloop")]
    NoLoop,
    #[serde(alias = "loop_all", alias = "loopall", alias = "loop-around")]
    LoopAll,
    #[serde(alias = "loop_one", alias = "loopone", alias = "repeat-one")]
    LoopOne,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which time fields to show on the progress bar, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub time_fields: Vec<TimeField>,

    /// Separator used to join `time_fields`.
    pub time_separator: String,

    /// Upper bound on how long the event loop waits for input before redrawing.
    pub redraw_interval_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ now playing ~ ".to_string(),
            time_fields: vec![TimeField::Elapsed, TimeField::Total],
            time_separator: " / ".to_string(),
            redraw_interval_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change per `+` / `-` press.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitleField {
    Title,
    Artist,
    Album,
    Filename,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,

    /// Which tag fields make up a scanned track's title.
    ///
    /// Example: ["artist", "title"] -> "Artist - Title"
    pub title_fields: Vec<TitleField>,
    /// Separator used to join `title_fields`.
    pub title_separator: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            title_fields: vec![TitleField::Artist, TitleField::Title],
            title_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file. Defaults to `$XDG_STATE_HOME/cadence/cadence.log`.
    pub file: Option<PathBuf>,
    /// `tracing` filter directive used when `CADENCE_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: None,
            filter: "cadence=info".to_string(),
        }
    }
}
