//! The playback state machine.
//!
//! `TrackPlayer` owns a playlist, the single live engine instance and the
//! position sampler, and turns user intents and engine events into state
//! transitions. Everything happens on the caller's thread: the host loop
//! calls `pump` to deliver engine events and `tick` to drive the sampler.

mod sampler;
mod session;
mod types;

pub use sampler::Sampler;
pub use session::TrackPlayer;
pub use types::{LoopMode, PlayerOptions, PlayerSnapshot, PlayerState, ResumePolicy};

#[cfg(test)]
pub(crate) mod testing;
