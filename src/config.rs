//! Configuration loader and schema types.
//!
//! This module exposes the settings schema that drives the player, the
//! terminal front end and playlist scanning, plus helpers to load it.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;
