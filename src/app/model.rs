//! Application model types: `App` and `Intent`.

use tracing::warn;

use crate::engine::AudioBackend;
use crate::error::PlayerError;
use crate::player::{LoopMode, PlayerState, TrackPlayer};

/// A user request, independent of the key that produced it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Intent {
    TogglePlay,
    Stop,
    Next,
    Previous,
    /// Scrub by this many seconds (negative rewinds).
    SeekBy(f64),
    /// Change the volume by this amount.
    VolumeBy(f32),
    CycleLoopMode,
    ToggleDetails,
    Quit,
}

/// UI-side state that does not belong to the playback session.
#[derive(Debug, Default)]
pub struct App {
    /// Last error or status message shown in the now-playing panel.
    pub notice: Option<String>,
    pub show_details: bool,
    quit: bool,
    error_shown: bool,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Forward `intent` to `player`, recording any failure as the notice.
    pub fn apply<B: AudioBackend>(&mut self, intent: Intent, player: &mut TrackPlayer<B>) {
        match intent {
            Intent::TogglePlay => player.toggle_play(),
            Intent::Stop => player.stop(),
            Intent::Next => {
                let result = player.next();
                self.settle(result);
            }
            Intent::Previous => {
                let result = player.previous();
                self.settle(result);
            }
            Intent::SeekBy(delta) => player.seek_by(delta),
            Intent::VolumeBy(delta) => player.set_volume(player.volume() + delta),
            Intent::CycleLoopMode => {
                let mode = cycle_loop_mode(player.loop_mode());
                player.set_loop_mode(mode);
                self.notice = Some(format!("loop mode: {}", loop_mode_label(mode)));
                self.error_shown = false;
            }
            Intent::ToggleDetails => self.show_details = !self.show_details,
            Intent::Quit => self.quit = true,
        }
    }

    /// Record the outcome of a player operation. Errors become the notice.
    pub fn settle(&mut self, result: Result<(), PlayerError>) {
        if let Err(e) = result {
            self.report(&e);
        }
    }

    pub fn report(&mut self, err: &PlayerError) {
        warn!(error = %err, "player operation failed");
        self.notice = Some(err.to_string());
        self.error_shown = true;
    }

    /// Drop an error notice once the session has left the error state.
    pub fn sync_notice(&mut self, state: &PlayerState) {
        if self.error_shown && !matches!(state, PlayerState::Error { .. }) {
            self.notice = None;
            self.error_shown = false;
        }
    }
}

/// Cycle `NoLoop -> LoopAll -> LoopOne -> NoLoop`.
pub fn cycle_loop_mode(mode: LoopMode) -> LoopMode {
    match mode {
        LoopMode::NoLoop => LoopMode::LoopAll,
        LoopMode::LoopAll => LoopMode::LoopOne,
        LoopMode::LoopOne => LoopMode::NoLoop,
    }
}

pub fn loop_mode_label(mode: LoopMode) -> &'static str {
    match mode {
        LoopMode::NoLoop => "no-loop",
        LoopMode::LoopAll => "loop-all",
        LoopMode::LoopOne => "loop-one",
    }
}
