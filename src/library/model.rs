use std::path::{Path, PathBuf};
use std::time::Duration;

/// An immutable track descriptor.
///
/// `nominal_duration` is only a hint; the player replaces it with the
/// engine-reported duration once the track is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    id: String,
    title: String,
    source: PathBuf,
    nominal_duration: Duration,
    artwork: Option<String>,
}

impl Track {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        source: impl Into<PathBuf>,
        nominal_duration: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            source: source.into(),
            nominal_duration,
            artwork: None,
        }
    }

    pub fn with_artwork(mut self, artwork: impl Into<String>) -> Self {
        self.artwork = Some(artwork.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn nominal_duration(&self) -> Duration {
        self.nominal_duration
    }

    pub fn artwork(&self) -> Option<&str> {
        self.artwork.as_deref()
    }
}
