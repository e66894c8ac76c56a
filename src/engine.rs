//! The audio engine contract and its `rodio` implementation.
//!
//! The player only talks to engines through `AudioBackend` and
//! `EngineInstance`; lifecycle callbacks come back as `EngineEvent` messages
//! sent through `EngineEvents`.

mod backend;
mod events;
mod notify;
mod output;

pub use backend::{AudioBackend, EngineInstance};
pub use events::{EngineEvent, EngineEvents, EngineMessage, Generation};
pub use notify::NotifyOnEnd;
pub use output::{RodioBackend, RodioInstance};
