//! Error types shared across the player, engine and library modules.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by `TrackPlayer` operations.
///
/// Out-of-range seek targets and volumes are clamped and operations without an
/// active track are no-ops, so neither shows up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// The engine could not open or decode the track's source.
    #[error("failed to load track {track_id}: {reason}")]
    LoadFailure { track_id: String, reason: String },

    /// A track index outside the playlist was requested.
    #[error("track index {index} is out of range for a playlist of {len}")]
    TrackOutOfRange { index: usize, len: usize },
}

/// Errors reported by an audio backend while opening an engine instance.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("no audio output: {0}")]
    Output(String),
}

/// Errors building a playlist.
#[derive(Error, Debug)]
pub enum PlaylistError {
    #[error("playlist is empty")]
    Empty,

    #[error("duplicate track id {0:?}")]
    DuplicateId(String),

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid playlist manifest {}: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },
}
