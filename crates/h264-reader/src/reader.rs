use std::io::{self, Read};
use std::iter::FusedIterator;

use bytes::BytesMut;
use tracing::warn;

use crate::config::ReaderConfig;
use crate::error::Result;
use crate::nal::{NalSequencer, NalUnit};
use crate::scanner::StartCodeScanner;
use crate::state::ReaderState;

/// Pulls [`NalUnit`]s out of an H.264 Annex B byte stream.
///
/// The reader owns its source and reads from it only while [`next_nal`](Self::next_nal) is
/// running. SEI units are dropped without being reported.
///
/// Once the stream ends or fails, every further call returns the same result without reading
/// from the source again.
pub struct H264Reader<R> {
    inner: R,
    buf: Box<[u8]>,
    pos: usize,
    filled: usize,
    scanner: StartCodeScanner,
    sequencer: NalSequencer,
    state: ReaderState,
}

impl<R: Read> H264Reader<R> {
    /// Creates a reader with the default [`ReaderConfig`]. Nothing is read until the first call
    /// to [`next_nal`](Self::next_nal).
    pub fn new(inner: R) -> Self {
        Self::build(inner, &ReaderConfig::default())
    }

    /// Creates a reader with the given configuration, rejecting unusable settings.
    pub fn with_config(inner: R, config: ReaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(inner, &config))
    }

    fn build(inner: R, config: &ReaderConfig) -> Self {
        Self {
            inner,
            buf: vec![0; config.read_buffer_size].into_boxed_slice(),
            pos: 0,
            filled: 0,
            scanner: StartCodeScanner::new(config.max_nal_size),
            sequencer: NalSequencer::default(),
            state: ReaderState::BeforeFirstUnit,
        }
    }

    /// Returns the next NAL unit, or `Ok(None)` once the stream is exhausted.
    ///
    /// # Errors
    ///
    /// - [`NotAStream`](crate::H264ReaderError::NotAStream) if the input does not open with a
    ///   start code.
    /// - [`Io`](crate::H264ReaderError::Io) if the source fails.
    /// - [`NalTooLarge`](crate::H264ReaderError::NalTooLarge) if a unit exceeds the configured
    ///   limit.
    pub fn next_nal(&mut self) -> Result<Option<NalUnit>> {
        if let Some(result) = self.state.replay() {
            return result;
        }

        loop {
            let slice = match self.next_slice() {
                Ok(Some(slice)) => slice,
                Ok(None) => {
                    self.state.on_end(self.sequencer.delivered());
                    return Ok(None);
                }
                Err(err) => {
                    self.state.on_error(&err, self.sequencer.delivered());
                    return Err(err);
                }
            };

            if let Some(unit) = self.sequencer.admit(slice) {
                self.state.on_unit();
                return Ok(Some(unit));
            }
        }
    }

    fn next_slice(&mut self) -> Result<Option<BytesMut>> {
        loop {
            if self.pos < self.filled {
                let (consumed, slice) = self.scanner.scan(&self.buf[self.pos..self.filled])?;
                self.pos += consumed;
                if slice.is_some() {
                    return Ok(slice);
                }
            }

            match self.inner.read(&mut self.buf[..]) {
                Ok(0) => return self.scanner.finish(),
                Ok(n) => {
                    self.pos = 0;
                    self.filled = n;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(error = %e, "byte source read failed");
                    return Err(e.into());
                }
            }
        }
    }
}

impl<R> H264Reader<R> {
    /// Number of units delivered so far, which is also the `sequence_index` the next unit gets.
    pub fn sequence_index(&self) -> u64 {
        self.sequencer.delivered()
    }

    /// Whether the reader has reached end of stream or failed.
    pub fn is_terminated(&self) -> bool {
        self.state.is_terminal()
    }

    /// Borrows the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Returns the underlying source. Bytes already read but not yet scanned are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Iterator for H264Reader<R> {
    type Item = Result<NalUnit>;

    /// Yields units until the stream ends. A terminal error is yielded once, then `None`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_terminated() {
            return None;
        }
        self.next_nal().transpose()
    }
}

impl<R: Read> FusedIterator for H264Reader<R> {}
