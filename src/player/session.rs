use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::engine::{AudioBackend, EngineEvent, EngineEvents, EngineInstance, EngineMessage, Generation};
use crate::error::PlayerError;
use crate::library::{Playlist, Track};

use super::sampler::Sampler;
use super::types::{LoopMode, PlayerOptions, PlayerSnapshot, PlayerState};

struct LiveEngine<I> {
    generation: Generation,
    instance: I,
}

/// Playback state machine over a fixed playlist.
///
/// At most one engine instance is alive at a time; it is stopped and unloaded
/// before the next one is opened, on load failure, on `shutdown` and on drop.
/// The sampler only exists while the state is `Playing`.
pub struct TrackPlayer<B: AudioBackend> {
    backend: B,
    playlist: Playlist,
    options: PlayerOptions,

    index: usize,
    state: PlayerState,
    position: Duration,
    duration: Duration,
    volume: f32,

    generation: Generation,
    engine: Option<LiveEngine<B::Instance>>,
    sampler: Option<Sampler>,
    play_on_ready: bool,

    tx: Sender<EngineMessage>,
    rx: Receiver<EngineMessage>,
    revision: u64,
}

impl<B: AudioBackend> TrackPlayer<B> {
    /// Create an idle player. Nothing is opened until `load` is called.
    pub fn new(backend: B, playlist: Playlist, options: PlayerOptions) -> Self {
        let (tx, rx) = mpsc::channel();
        let duration = playlist.tracks()[0].nominal_duration();
        let volume = if options.initial_volume.is_nan() {
            1.0
        } else {
            options.initial_volume.clamp(0.0, 1.0)
        };

        Self {
            backend,
            playlist,
            options,
            index: 0,
            state: PlayerState::Idle,
            position: Duration::ZERO,
            duration,
            volume,
            generation: Generation::default(),
            engine: None,
            sampler: None,
            play_on_ready: false,
            tx,
            rx,
            revision: 0,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_track(&self) -> &Track {
        &self.playlist.tracks()[self.index]
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    /// Effective duration: engine-reported once loaded, the nominal hint before.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    pub fn is_sampling(&self) -> bool {
        self.sampler.is_some()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.options.loop_mode
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        if self.options.loop_mode != mode {
            self.options.loop_mode = mode;
            self.touch();
        }
    }

    /// Bind the session to the track at `index`.
    ///
    /// Tears down the current instance first, then opens a new one with the
    /// session volume. The state is `Loading` until the engine reports the
    /// source ready.
    pub fn load(&mut self, index: usize) -> Result<(), PlayerError> {
        if self.playlist.get(index).is_none() {
            return Err(PlayerError::TrackOutOfRange {
                index,
                len: self.playlist.len(),
            });
        }

        self.teardown();

        self.index = index;
        self.position = Duration::ZERO;
        self.generation = self.generation.next();
        let events = EngineEvents::new(self.generation, self.tx.clone());

        let track = &self.playlist.tracks()[index];
        self.duration = track.nominal_duration();
        let track_id = track.id().to_string();
        info!(track = %track_id, index, generation = ?self.generation, "loading track");

        match self.backend.open(track, self.volume, events) {
            Ok(instance) => {
                self.engine = Some(LiveEngine {
                    generation: self.generation,
                    instance,
                });
                self.set_state(PlayerState::Loading);
                Ok(())
            }
            Err(e) => Err(self.fail(track_id, e.to_string())),
        }
    }

    /// Pause when playing, play otherwise.
    ///
    /// While loading this flips whether playback starts once the track is
    /// ready. Without an active track it does nothing.
    pub fn toggle_play(&mut self) {
        match self.state {
            PlayerState::Playing => self.pause(),
            PlayerState::Loading => {
                self.play_on_ready = !self.play_on_ready;
                debug!(play_on_ready = self.play_on_ready, "play request queued until ready");
                self.touch();
            }
            _ => self.play(),
        }
    }

    pub fn play(&mut self) {
        match self.state {
            PlayerState::Ready | PlayerState::Paused | PlayerState::Stopped => self.begin_playing(),
            PlayerState::Loading => {
                if !self.play_on_ready {
                    self.play_on_ready = true;
                    self.touch();
                }
            }
            PlayerState::Playing => {}
            PlayerState::Idle | PlayerState::Error { .. } => {
                debug!("play ignored: no active track");
            }
        }
    }

    pub fn pause(&mut self) {
        match self.state {
            PlayerState::Playing => {
                if let Some(live) = self.engine.as_mut() {
                    live.instance.pause();
                    self.position = live.instance.position().min(self.duration);
                }
                self.set_state(PlayerState::Paused);
            }
            PlayerState::Loading if self.play_on_ready => {
                self.play_on_ready = false;
                self.touch();
            }
            _ => {}
        }
    }

    /// Halt playback and rewind to the start of the current track.
    pub fn stop(&mut self) {
        if !matches!(
            self.state,
            PlayerState::Ready | PlayerState::Playing | PlayerState::Paused
        ) {
            debug!(state = self.state.label(), "stop ignored");
            return;
        }
        if let Some(live) = self.engine.as_mut() {
            live.instance.stop();
        }
        self.position = Duration::ZERO;
        self.set_state(PlayerState::Stopped);
    }

    /// Jump to `seconds` into the track, clamped to the effective duration.
    ///
    /// The displayed position changes immediately, in any state with a live
    /// engine. NaN targets are ignored.
    pub fn seek(&mut self, seconds: f64) {
        if seconds.is_nan() {
            debug!("seek ignored: NaN target");
            return;
        }
        let Some(live) = self.engine.as_mut() else {
            debug!("seek ignored: no active track");
            return;
        };

        let target = Duration::from_secs_f64(seconds.clamp(0.0, self.duration.as_secs_f64()));
        live.instance.seek(target);
        self.position = target;
        self.touch();
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, delta_seconds: f64) {
        self.seek(self.position.as_secs_f64() + delta_seconds);
    }

    /// Set the session volume, clamped to `0.0..=1.0`.
    ///
    /// The value outlives the engine instance and is handed to every
    /// instance opened afterwards.
    pub fn set_volume(&mut self, level: f32) {
        if level.is_nan() {
            debug!("volume ignored: NaN level");
            return;
        }
        let level = level.clamp(0.0, 1.0);
        self.volume = level;
        if let Some(live) = self.engine.as_mut() {
            live.instance.set_volume(level);
        }
        self.touch();
    }

    pub fn next(&mut self) -> Result<(), PlayerError> {
        let index = self.playlist.next_index(self.index);
        self.advance(index)
    }

    pub fn previous(&mut self) -> Result<(), PlayerError> {
        let index = self.playlist.previous_index(self.index);
        self.advance(index)
    }

    /// Deliver every pending engine event.
    ///
    /// Returns the last load failure seen, after all events were applied.
    pub fn pump(&mut self) -> Result<(), PlayerError> {
        let mut result = Ok(());
        while let Ok(msg) = self.rx.try_recv() {
            if let Err(e) = self.handle_message(msg) {
                result = Err(e);
            }
        }
        result
    }

    /// Apply one engine event. Events from a superseded instance are dropped.
    pub fn handle_message(&mut self, msg: EngineMessage) -> Result<(), PlayerError> {
        let live = self.engine.as_ref().map(|l| l.generation);
        if live != Some(msg.generation) {
            trace!(generation = ?msg.generation, event = ?msg.event, "dropping stale engine event");
            return Ok(());
        }

        match msg.event {
            EngineEvent::Loaded { duration } => {
                if self.state != PlayerState::Loading {
                    debug!(state = self.state.label(), "ignoring repeated load notice");
                    return Ok(());
                }
                if let Some(d) = duration {
                    self.duration = d;
                    self.position = self.position.min(d);
                }
                self.set_state(PlayerState::Ready);
                if std::mem::take(&mut self.play_on_ready) {
                    self.begin_playing();
                }
            }
            EngineEvent::LoadFailed { reason } => {
                let track_id = self.current_track().id().to_string();
                return Err(self.fail(track_id, reason));
            }
            EngineEvent::Played => {
                if self.state != PlayerState::Playing {
                    debug!(state = self.state.label(), "engine resumed on its own, pausing it");
                    if let Some(live) = self.engine.as_mut() {
                        live.instance.pause();
                    }
                }
            }
            EngineEvent::Paused => {
                if self.state == PlayerState::Playing {
                    if let Some(live) = self.engine.as_ref() {
                        self.position = live.instance.position().min(self.duration);
                    }
                    self.set_state(PlayerState::Paused);
                }
            }
            EngineEvent::Stopped => {
                if matches!(
                    self.state,
                    PlayerState::Ready | PlayerState::Playing | PlayerState::Paused
                ) {
                    self.position = Duration::ZERO;
                    self.set_state(PlayerState::Stopped);
                }
            }
            EngineEvent::Ended => return self.on_track_end(),
        }
        Ok(())
    }

    /// Sample the engine position if the sampler is due at `now`.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(sampler) = self.sampler.as_mut() else {
            return false;
        };
        if !sampler.poll(now) {
            return false;
        }
        debug_assert_eq!(self.state, PlayerState::Playing);

        if let Some(live) = self.engine.as_ref() {
            let pos = live.instance.position().min(self.duration);
            if pos != self.position {
                self.position = pos;
                self.touch();
            }
        }
        true
    }

    /// When the host loop should next call `tick`, if sampling at all.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.sampler.as_ref().map(Sampler::deadline)
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let track = self.current_track();
        PlayerSnapshot {
            state: self.state.clone(),
            index: self.index,
            track_count: self.playlist.len(),
            track_id: track.id().to_string(),
            title: track.title().to_string(),
            artwork: track.artwork().map(str::to_string),
            playing: self.is_playing(),
            position: self.position,
            duration: self.duration,
            volume: self.volume,
            revision: self.revision,
        }
    }

    /// Release the engine and cancel the sampler, returning to `Idle`.
    pub fn shutdown(&mut self) {
        self.teardown();
        self.position = Duration::ZERO;
        self.set_state(PlayerState::Idle);
    }

    fn advance(&mut self, index: usize) -> Result<(), PlayerError> {
        let was_playing = self.state == PlayerState::Playing
            || (self.state == PlayerState::Loading && self.play_on_ready);
        let resume = self.options.resume.should_resume(was_playing);

        self.load(index)?;
        self.play_on_ready = resume;
        Ok(())
    }

    fn on_track_end(&mut self) -> Result<(), PlayerError> {
        // The end notice can be queued behind a pause or stop issued before the
        // pump, so any state with a live engine advances off the finished source.
        if !matches!(
            self.state,
            PlayerState::Ready | PlayerState::Playing | PlayerState::Paused | PlayerState::Stopped
        ) {
            debug!(state = self.state.label(), "ignoring end of track");
            return Ok(());
        }
        let was_playing = self.state == PlayerState::Playing;
        info!(track = self.current_track().id(), was_playing, "track finished");

        match self.options.loop_mode {
            LoopMode::LoopAll => self.next(),
            LoopMode::NoLoop if self.playlist.is_last(self.index) => {
                // The finished instance has nothing left to play; rest on a fresh one.
                self.load(self.index)
            }
            LoopMode::NoLoop => self.next(),
            LoopMode::LoopOne => {
                self.load(self.index)?;
                self.play_on_ready = was_playing;
                Ok(())
            }
        }
    }

    fn begin_playing(&mut self) {
        let Some(live) = self.engine.as_mut() else {
            return;
        };
        live.instance.play();
        self.sampler = Some(Sampler::start(Instant::now(), self.options.sample_interval));
        self.set_state(PlayerState::Playing);
    }

    fn fail(&mut self, track_id: String, reason: String) -> PlayerError {
        warn!(track = %track_id, %reason, "track failed to load");
        self.teardown();
        self.set_state(PlayerState::Error {
            track_id: track_id.clone(),
            reason: reason.clone(),
        });
        PlayerError::LoadFailure { track_id, reason }
    }

    fn teardown(&mut self) {
        self.sampler = None;
        self.play_on_ready = false;
        if let Some(mut live) = self.engine.take() {
            live.instance.stop();
            live.instance.unload();
            trace!(generation = ?live.generation, "engine instance released");
        }
    }

    fn set_state(&mut self, state: PlayerState) {
        if state != PlayerState::Playing {
            self.sampler = None;
        }
        if self.state != state {
            debug!(from = self.state.label(), to = state.label(), "state change");
            self.state = state;
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl<B: AudioBackend> Drop for TrackPlayer<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
