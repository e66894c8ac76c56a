//! Application module: turns key presses into player intents.
//!
//! `App` holds the UI-only state (details popup, last notice, quit flag) and
//! forwards intents to the `TrackPlayer` it is given.

mod keymap;
mod model;

pub use keymap::intent_for_key;
pub use model::*;
