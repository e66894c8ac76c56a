use std::time::Duration;

use crate::error::EngineError;
use crate::library::Track;

use super::events::EngineEvents;

/// Something that can build engine instances bound to a single track.
pub trait AudioBackend {
    type Instance: EngineInstance;

    /// Construct an instance for `track` and start loading it.
    ///
    /// The instance starts paused at `volume`. Once the source is ready the
    /// instance reports `EngineEvent::Loaded` (or `LoadFailed`) through
    /// `events`; failures detected up front are returned directly instead.
    fn open(
        &mut self,
        track: &Track,
        volume: f32,
        events: EngineEvents,
    ) -> Result<Self::Instance, EngineError>;
}

/// A live decode/output object bound to one track.
///
/// Commands take effect synchronously and are not echoed back as events.
/// `Played`, `Paused` and `Stopped` events are reserved for state changes the
/// engine makes on its own.
pub trait EngineInstance {
    fn play(&mut self);
    fn pause(&mut self);
    /// Halt playback and rewind to the start, keeping the source loaded.
    fn stop(&mut self);
    fn seek(&mut self, position: Duration);
    fn set_volume(&mut self, level: f32);
    fn position(&self) -> Duration;
    fn is_playing(&self) -> bool;
    /// Release the decoded source and output; the instance is unusable afterwards.
    fn unload(&mut self);
}
