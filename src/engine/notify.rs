use std::time::Duration;

use rodio::source::SeekError;
use rodio::{ChannelCount, Sample, SampleRate, Source};

/// Wraps a `Source` and runs a callback the first time it runs dry.
///
/// This is how a rodio-backed instance learns that a track finished without
/// polling the sink.
pub struct NotifyOnEnd<S> {
    source: S,
    on_end: Option<Box<dyn FnOnce() + Send>>,
}

impl<S> NotifyOnEnd<S> {
    pub fn new(source: S, on_end: impl FnOnce() + Send + 'static) -> Self {
        Self {
            source,
            on_end: Some(Box::new(on_end)),
        }
    }
}

impl<S> Iterator for NotifyOnEnd<S>
where
    S: Source,
{
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.source.next();
        if sample.is_none() {
            if let Some(on_end) = self.on_end.take() {
                on_end();
            }
        }
        sample
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

impl<S> Source for NotifyOnEnd<S>
where
    S: Source,
{
    fn current_span_len(&self) -> Option<usize> {
        self.source.current_span_len()
    }

    fn channels(&self) -> ChannelCount {
        self.source.channels()
    }

    fn sample_rate(&self) -> SampleRate {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.source.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        self.source.try_seek(pos)
    }
}
