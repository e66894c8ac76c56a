use std::sync::mpsc::Sender;
use std::time::Duration;

/// Identifies one engine instance within a player session.
///
/// Every `load` bumps the generation, so messages from an instance that has
/// since been torn down can be recognised and dropped.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Lifecycle callbacks an engine instance reports.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The source is ready; `duration` is the authoritative length when known.
    Loaded { duration: Option<Duration> },
    LoadFailed { reason: String },
    Played,
    Paused,
    Stopped,
    /// The track played through to its end.
    Ended,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineMessage {
    pub generation: Generation,
    pub event: EngineEvent,
}

/// Sending half handed to an engine instance, stamped with its generation.
#[derive(Debug, Clone)]
pub struct EngineEvents {
    generation: Generation,
    tx: Sender<EngineMessage>,
}

impl EngineEvents {
    pub fn new(generation: Generation, tx: Sender<EngineMessage>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Deliver `event` to the player. Silently dropped once the player is gone.
    pub fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(EngineMessage {
            generation: self.generation,
            event,
        });
    }
}
