//! A recording in-memory backend for exercising `TrackPlayer` without audio.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use crate::engine::{AudioBackend, EngineEvent, EngineEvents, EngineInstance};
use crate::error::EngineError;
use crate::library::{Playlist, Track};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open(String),
    Play,
    Pause,
    Stop,
    Seek(Duration),
    Volume(f32),
    Unload(String),
}

#[derive(Default)]
pub struct Journal {
    pub calls: Vec<Call>,
    pub live: usize,
    pub max_live: usize,
    pub position: Duration,
    pub open_volumes: Vec<f32>,
    pub events: Vec<EngineEvents>,
    /// Durations reported in `Loaded`, by track id.
    pub durations: HashMap<String, Duration>,
    pub fail_open: HashSet<String>,
    pub fail_async: HashSet<String>,
    /// When set, instances never report `Loaded` on their own.
    pub defer_load: bool,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    journal: Rc<RefCell<Journal>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn journal(&self) -> std::cell::RefMut<'_, Journal> {
        self.journal.borrow_mut()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.borrow().calls.clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Open(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn live(&self) -> usize {
        self.journal.borrow().live
    }

    /// Event sender of the `n`th opened instance.
    pub fn events(&self, n: usize) -> EngineEvents {
        self.journal.borrow().events[n].clone()
    }

    pub fn latest_events(&self) -> EngineEvents {
        self.journal
            .borrow()
            .events
            .last()
            .cloned()
            .expect("no instance opened yet")
    }

    pub fn set_position(&self, position: Duration) {
        self.journal.borrow_mut().position = position;
    }
}

impl AudioBackend for FakeBackend {
    type Instance = FakeInstance;

    fn open(
        &mut self,
        track: &Track,
        volume: f32,
        events: EngineEvents,
    ) -> Result<FakeInstance, EngineError> {
        let mut j = self.journal.borrow_mut();
        let id = track.id().to_string();
        j.calls.push(Call::Open(id.clone()));

        if j.fail_open.contains(&id) {
            return Err(EngineError::Decode {
                path: track.source().to_path_buf(),
                reason: "corrupt stream".to_string(),
            });
        }

        j.live += 1;
        j.max_live = j.max_live.max(j.live);
        j.position = Duration::ZERO;
        j.open_volumes.push(volume);
        j.events.push(events.clone());

        if j.fail_async.contains(&id) {
            events.emit(EngineEvent::LoadFailed {
                reason: "source unreachable".to_string(),
            });
        } else if !j.defer_load {
            events.emit(EngineEvent::Loaded {
                duration: j.durations.get(&id).copied(),
            });
        }

        Ok(FakeInstance {
            journal: self.journal.clone(),
            track_id: id,
            playing: false,
            released: false,
        })
    }
}

pub struct FakeInstance {
    journal: Rc<RefCell<Journal>>,
    track_id: String,
    playing: bool,
    released: bool,
}

impl FakeInstance {
    fn record(&self, call: Call) {
        self.journal.borrow_mut().calls.push(call);
    }
}

impl EngineInstance for FakeInstance {
    fn play(&mut self) {
        self.playing = true;
        self.record(Call::Play);
    }

    fn pause(&mut self) {
        self.playing = false;
        self.record(Call::Pause);
    }

    fn stop(&mut self) {
        self.playing = false;
        self.journal.borrow_mut().position = Duration::ZERO;
        self.record(Call::Stop);
    }

    fn seek(&mut self, position: Duration) {
        self.journal.borrow_mut().position = position;
        self.record(Call::Seek(position));
    }

    fn set_volume(&mut self, level: f32) {
        self.record(Call::Volume(level));
    }

    fn position(&self) -> Duration {
        self.journal.borrow().position
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn unload(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.playing = false;
        let mut j = self.journal.borrow_mut();
        j.live -= 1;
        j.calls.push(Call::Unload(self.track_id.clone()));
    }
}

impl Drop for FakeInstance {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            self.journal.borrow_mut().live -= 1;
        }
    }
}

/// Playlist of `(id, nominal seconds)` pairs.
pub fn playlist(specs: &[(&str, u64)]) -> Playlist {
    let tracks = specs
        .iter()
        .map(|(id, secs)| {
            Track::new(
                *id,
                id.to_uppercase(),
                format!("/music/{id}.mp3"),
                Duration::from_secs(*secs),
            )
        })
        .collect();
    Playlist::new(tracks).expect("test playlist is valid")
}
