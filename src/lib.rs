//! cadence: a terminal playlist player.
//!
//! The library holds the playback state machine (`player`), the audio engine
//! contract and its rodio implementation (`engine`), playlist supply
//! (`library`), configuration, and the TUI model and renderer used by the
//! `cadence` binary.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod library;
pub mod player;
pub mod ui;
