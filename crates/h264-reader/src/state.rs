use std::io;

use tracing::{debug, warn};

use crate::NalUnit;
use crate::error::{H264ReaderError, Result};

/// Lifecycle of a reader. `Exhausted` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReaderState {
    BeforeFirstUnit,
    Streaming,
    Exhausted,
    Failed(Failure),
}

/// A copyable record of the error that ended a stream, so it can be reported again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Failure {
    NotAStream,
    Source(io::ErrorKind),
    NalTooLarge { size: usize, limit: usize },
}

impl Failure {
    fn to_error(self) -> H264ReaderError {
        match self {
            Failure::NotAStream => H264ReaderError::NotAStream,
            Failure::Source(kind) => {
                H264ReaderError::Io(io::Error::new(kind, "byte source already failed"))
            }
            Failure::NalTooLarge { size, limit } => H264ReaderError::NalTooLarge { size, limit },
        }
    }
}

impl From<&H264ReaderError> for Failure {
    fn from(err: &H264ReaderError) -> Self {
        match err {
            H264ReaderError::NotAStream => Failure::NotAStream,
            H264ReaderError::Io(e) => Failure::Source(e.kind()),
            H264ReaderError::NalTooLarge { size, limit } => Failure::NalTooLarge {
                size: *size,
                limit: *limit,
            },
            // Configuration is checked before a reader exists, so this only records bad input.
            H264ReaderError::InvalidConfig(_) => Failure::Source(io::ErrorKind::InvalidInput),
        }
    }
}

impl ReaderState {
    pub(crate) fn is_terminal(&self) -> bool {
        matches!(self, ReaderState::Exhausted | ReaderState::Failed(_))
    }

    /// The answer a terminal state gives to every further request, without touching the source.
    pub(crate) fn replay(&self) -> Option<Result<Option<NalUnit>>> {
        match self {
            ReaderState::Exhausted => Some(Ok(None)),
            ReaderState::Failed(failure) => Some(Err(failure.to_error())),
            ReaderState::BeforeFirstUnit | ReaderState::Streaming => None,
        }
    }

    pub(crate) fn on_unit(&mut self) {
        *self = ReaderState::Streaming;
    }

    pub(crate) fn on_end(&mut self, delivered: u64) {
        debug!(delivered, "end of stream");
        *self = ReaderState::Exhausted;
    }

    pub(crate) fn on_error(&mut self, err: &H264ReaderError, delivered: u64) {
        match err {
            H264ReaderError::NotAStream => {
                debug!("input does not begin with an Annex B start code")
            }
            _ => warn!(error = %err, delivered, "stopping NAL unit stream"),
        }
        *self = ReaderState::Failed(Failure::from(err));
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_failed_state_replays_same_error() {
        let mut state = ReaderState::BeforeFirstUnit;
        assert!(state.replay().is_none());

        let err = H264ReaderError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        state.on_error(&err, 3);
        assert!(state.is_terminal());

        for _ in 0..2 {
            match state.replay() {
                Some(Err(H264ReaderError::Io(e))) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
                other => panic!("unexpected replay: {other:?}"),
            }
        }
    }

    #[test]
    fn test_failure_keeps_limit_fields() {
        let mut state = ReaderState::Streaming;
        state.on_error(&H264ReaderError::NalTooLarge { size: 9, limit: 8 }, 1);

        assert_eq!(
            state,
            ReaderState::Failed(Failure::NalTooLarge { size: 9, limit: 8 })
        );
        assert!(matches!(
            state.replay(),
            Some(Err(H264ReaderError::NalTooLarge { size: 9, limit: 8 }))
        ));
    }

    #[test]
    fn test_config_error_is_recorded_as_invalid_input() {
        let mut state = ReaderState::BeforeFirstUnit;
        state.on_error(&H264ReaderError::InvalidConfig("read_buffer_size must be non-zero"), 0);

        match state.replay() {
            Some(Err(H264ReaderError::Io(e))) => assert_eq!(e.kind(), io::ErrorKind::InvalidInput),
            other => panic!("unexpected replay: {other:?}"),
        }
    }

    #[test]
    fn test_exhausted_replays_end_of_stream() {
        let mut state = ReaderState::Streaming;
        state.on_end(5);

        assert!(matches!(state.replay(), Some(Ok(None))));
        assert!(matches!(state.replay(), Some(Ok(None))));
    }
}
