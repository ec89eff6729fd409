// Cry playback over the default output device
use std::io::Cursor;

use anyhow::{Context, Result};
use bytes::Bytes;
use rodio::{Decoder, OutputStream, Sink};
use tracing::debug;

/// A downloaded cry: the source URL plus its raw audio payload.
///
/// The payload is kept in memory so an explicit play needs no further
/// network traffic.
#[derive(Debug, Clone)]
pub struct CueSource {
    url: String,
    bytes: Bytes,
}

impl CueSource {
    pub fn new(url: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            url: url.into(),
            bytes,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// The session's single audio handle.
///
/// At most one source is bound at any time. Rebinding stops any in-progress
/// playback before the new source replaces the old one, so audio from a
/// stale lookup can never keep playing after a newer one succeeds. Playback
/// starts only from an explicit [`play`](CuePlayer::play) call.
///
/// The output device is opened inside `play`, not at construction, so the
/// player can be created and rebound on machines without audio hardware.
pub struct CuePlayer {
    pipeline: Option<(OutputStream, Sink)>,
    current: Option<CueSource>,
}

impl CuePlayer {
    pub fn new() -> Self {
        Self {
            pipeline: None,
            current: None,
        }
    }

    /// Stops playback, resets position and replaces the bound source.
    ///
    /// Passing `None` leaves the handle with no playable source. Dropping
    /// the old sink discards its position, so the next play decodes the
    /// bound payload from the start.
    pub fn rebind(&mut self, source: Option<CueSource>) {
        self.stop();
        match &source {
            Some(cue) => debug!(url = cue.url(), "cry rebound"),
            None => debug!("cry unbound"),
        }
        self.current = source;
    }

    /// Starts playing the bound cry from the beginning.
    ///
    /// No-op when nothing is bound. A cry already playing is stopped first
    /// rather than layered.
    pub fn play(&mut self) -> Result<()> {
        let cue = match self.current.clone() {
            Some(cue) => cue,
            None => return Ok(()),
        };
        self.stop();

        let (stream, handle) =
            OutputStream::try_default().context("Failed to open audio output device")?;
        let source = Decoder::new(Cursor::new(cue.bytes))
            .with_context(|| format!("Failed to decode cry audio from {}", cue.url))?;
        let sink = Sink::try_new(&handle).context("Failed to create audio sink")?;

        sink.append(source);
        sink.play();
        self.pipeline = Some((stream, sink));

        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some((_stream, sink)) = self.pipeline.take() {
            sink.stop();
        }
    }

    pub fn has_cue(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current.as_ref().map(|cue| cue.url())
    }

    pub fn is_playing(&self) -> bool {
        self.pipeline
            .as_ref()
            .map(|(_, sink)| !sink.is_paused() && !sink.empty())
            .unwrap_or(false)
    }
}

impl Default for CuePlayer {
    fn default() -> Self {
        Self::new()
    }
}
