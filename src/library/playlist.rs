use std::collections::HashSet;

use crate::error::PlaylistError;

use super::model::Track;

/// A non-empty, ordered list of tracks with unique ids.
///
/// The order is fixed once built and defines next/previous, both of which
/// wrap around.
#[derive(Debug, Clone)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Result<Self, PlaylistError> {
        if tracks.is_empty() {
            return Err(PlaylistError::Empty);
        }

        let mut seen = HashSet::with_capacity(tracks.len());
        for t in &tracks {
            if !seen.insert(t.id()) {
                return Err(PlaylistError::DuplicateId(t.id().to_string()));
            }
        }

        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.tracks.len()
    }

    /// Index after `index`, wrapping from the last track to the first.
    pub fn next_index(&self, index: usize) -> usize {
        if index + 1 >= self.tracks.len() {
            0
        } else {
            index + 1
        }
    }

    /// Index before `index`, wrapping from the first track to the last.
    pub fn previous_index(&self, index: usize) -> usize {
        if index == 0 || index >= self.tracks.len() {
            self.tracks.len() - 1
        } else {
            index - 1
        }
    }
}
