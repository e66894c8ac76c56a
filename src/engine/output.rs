//! `rodio`-backed engine instances.
//!
//! One output stream is opened for the lifetime of the backend; each
//! instance is a paused `Sink` on its mixer fed by the decoded file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::library::Track;

use super::backend::{AudioBackend, EngineInstance};
use super::events::{EngineEvent, EngineEvents};
use super::notify::NotifyOnEnd;

pub struct RodioBackend {
    stream: OutputStream,
}

impl RodioBackend {
    /// Open the system's default output device.
    pub fn open_default() -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Output(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped, which would land on top of the TUI.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl AudioBackend for RodioBackend {
    type Instance = RodioInstance;

    fn open(
        &mut self,
        track: &Track,
        volume: f32,
        events: EngineEvents,
    ) -> Result<RodioInstance, EngineError> {
        let path = track.source();
        let file = File::open(path).map_err(|source| EngineError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let duration = decoder.total_duration().or_else(|| probe_duration(path));

        let end_events = events.clone();
        let source = NotifyOnEnd::new(decoder, move || end_events.emit(EngineEvent::Ended));

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        sink.set_volume(volume);
        sink.append(source);

        debug!(
            track = track.id(),
            generation = ?events.generation(),
            ?duration,
            "engine instance ready"
        );
        events.emit(EngineEvent::Loaded { duration });

        Ok(RodioInstance { sink: Some(sink) })
    }
}

/// Container-level duration for files whose decoder cannot tell up front (e.g. VBR mp3).
fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}

pub struct RodioInstance {
    sink: Option<Sink>,
}

impl EngineInstance for RodioInstance {
    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn stop(&mut self) {
        // `Sink::stop` would drop the queued source; pause and rewind instead.
        if let Some(sink) = &self.sink {
            sink.pause();
            if let Err(e) = sink.try_seek(Duration::ZERO) {
                warn!(error = ?e, "rewind failed");
            }
        }
    }

    fn seek(&mut self, position: Duration) {
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.try_seek(position) {
                warn!(error = ?e, ?position, "seek failed");
            }
        }
    }

    fn set_volume(&mut self, level: f32) {
        if let Some(sink) = &self.sink {
            sink.set_volume(level);
        }
    }

    fn position(&self) -> Duration {
        self.sink.as_ref().map_or(Duration::ZERO, Sink::get_pos)
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }

    fn unload(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

impl Drop for RodioInstance {
    fn drop(&mut self) {
        self.unload();
    }
}
