use std::time::Duration;

use crate::config::{LoopModeSetting, PlayerSettings, ResumeSetting};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// No track has been loaded.
    #[default]
    Idle,
    /// An engine instance exists but has not reported its source ready.
    Loading,
    Ready,
    Playing,
    Paused,
    Stopped,
    /// The active track failed to load. Left by loading another track.
    Error { track_id: String, reason: String },
}

impl PlayerState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Loading => "Loading",
            Self::Ready => "Ready",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Stopped => "Stopped",
            Self::Error { .. } => "Error",
        }
    }
}

/// What happens when a track plays through to its end.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Stop on the last track instead of wrapping.
    NoLoop,
    /// Advance to the next track, wrapping to the first.
    #[default]
    LoopAll,
    /// Play the current track again.
    LoopOne,
}

/// Whether playback continues on a newly selected track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ResumePolicy {
    /// New tracks always start paused in `Ready`.
    Never,
    /// Resume only if the previous track was playing (or about to).
    #[default]
    KeepPlaying,
    /// Always start playing the new track once it is loaded.
    Always,
}

impl ResumePolicy {
    pub fn should_resume(self, was_playing: bool) -> bool {
        match self {
            Self::Never => false,
            Self::KeepPlaying => was_playing,
            Self::Always => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptions {
    pub initial_volume: f32,
    pub sample_interval: Duration,
    pub resume: ResumePolicy,
    pub loop_mode: LoopMode,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self::from(&PlayerSettings::default())
    }
}

impl From<&PlayerSettings> for PlayerOptions {
    fn from(s: &PlayerSettings) -> Self {
        Self {
            initial_volume: s.initial_volume,
            sample_interval: Duration::from_millis(s.sample_interval_ms.max(1)),
            resume: match s.resume_on_advance {
                ResumeSetting::Never => ResumePolicy::Never,
                ResumeSetting::KeepPlaying => ResumePolicy::KeepPlaying,
                ResumeSetting::Always => ResumePolicy::Always,
            },
            loop_mode: match s.loop_mode {
                LoopModeSetting::NoLoop => LoopMode::NoLoop,
                LoopModeSetting::LoopAll => LoopMode::LoopAll,
                LoopModeSetting::LoopOne => LoopMode::LoopOne,
            },
        }
    }
}

/// Read-only view of the session handed to the display layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub state: PlayerState,
    pub index: usize,
    pub track_count: usize,
    pub track_id: String,
    pub title: String,
    pub artwork: Option<String>,
    pub playing: bool,
    pub position: Duration,
    pub duration: Duration,
    pub volume: f32,
    /// Bumped on every observable change.
    pub revision: u64,
}
