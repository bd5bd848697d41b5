use std::{
    pin::Pin,
    task::{Context, Poll},
};

use bytes::{Buf, BytesMut};
use futures::{Stream, StreamExt};
use tokio::io::AsyncRead;
use tokio_util::codec::{Decoder, FramedRead};

use crate::config::ReaderConfig;
use crate::error::{H264ReaderError, Result};
use crate::nal::{NalSequencer, NalUnit};
use crate::scanner::StartCodeScanner;
use crate::state::ReaderState;

/// An Annex B decoder that implements Tokio's [`Decoder`] trait.
///
/// Applies the same start code rules, SEI filtering and numbering as
/// [`H264Reader`](crate::H264Reader).
#[derive(Debug)]
pub struct H264Decoder {
    scanner: StartCodeScanner,
    sequencer: NalSequencer,
    state: ReaderState,
}

impl H264Decoder {
    /// Creates a decoder with the default configuration.
    pub fn new() -> Self {
        Self::build(&ReaderConfig::default())
    }

    /// Creates a decoder with the given configuration.
    ///
    /// Only `max_nal_size` applies here; the read size is chosen by whoever fills the buffer.
    pub fn with_config(config: &ReaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &ReaderConfig) -> Self {
        Self {
            scanner: StartCodeScanner::new(config.max_nal_size),
            sequencer: NalSequencer::default(),
            state: ReaderState::BeforeFirstUnit,
        }
    }

    fn fail(&mut self, err: H264ReaderError) -> H264ReaderError {
        self.state.on_error(&err, self.sequencer.delivered());
        err
    }
}

impl Default for H264Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for H264Decoder {
    type Item = NalUnit;
    type Error = H264ReaderError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if let Some(result) = self.state.replay() {
            return result;
        }

        while !src.is_empty() {
            let (consumed, slice) = match self.scanner.scan(&src[..]) {
                Ok(scanned) => scanned,
                Err(err) => return Err(self.fail(err)),
            };
            src.advance(consumed);

            let Some(slice) = slice else {
                // Everything buffered has been taken in; wait for more.
                break;
            };
            if let Some(unit) = self.sequencer.admit(slice) {
                self.state.on_unit();
                return Ok(Some(unit));
            }
        }

        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if let Some(unit) = self.decode(src)? {
            return Ok(Some(unit));
        }
        if self.state.is_terminal() {
            return Ok(None);
        }

        let last = match self.scanner.finish() {
            Ok(last) => last,
            Err(err) => return Err(self.fail(err)),
        };
        let unit = last.and_then(|slice| self.sequencer.admit(slice));
        // The final unit (if any) is returned now; the next call reports the end.
        self.state.on_end(self.sequencer.delivered());
        Ok(unit)
    }
}

/// A [`Stream`] of [`NalUnit`]s read from an [`AsyncRead`] source.
pub struct H264ReaderStream<R> {
    framed: FramedRead<R, H264Decoder>,
}

impl<R: AsyncRead + Unpin> H264ReaderStream<R> {
    /// Creates a stream with the default configuration.
    pub fn new(reader: R) -> Self {
        let config = ReaderConfig::default();
        Self {
            framed: FramedRead::with_capacity(reader, H264Decoder::new(), config.read_buffer_size),
        }
    }

    /// Creates a stream with the given configuration.
    pub fn with_config(reader: R, config: ReaderConfig) -> Result<Self> {
        let decoder = H264Decoder::with_config(&config)?;
        Ok(Self {
            framed: FramedRead::with_capacity(reader, decoder, config.read_buffer_size),
        })
    }

    /// Number of units delivered so far.
    pub fn sequence_index(&self) -> u64 {
        self.framed.decoder().sequencer.delivered()
    }

    /// Returns the underlying source.
    pub fn into_inner(self) -> R {
        self.framed.into_inner()
    }
}

impl<R: AsyncRead + Unpin> Stream for H264ReaderStream<R> {
    type Item = Result<NalUnit>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.framed.poll_next_unpin(cx)
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io::Cursor;

    use futures::TryStreamExt;

    use super::*;
    use crate::{H264Reader, NALUnitType};

    const SAMPLE: &[u8] = &[
        0x00, 0x00, 0x00, 0x01, 0x67, 0x64, 0x00, 0x1F, // SPS
        0x00, 0x00, 0x00, 0x01, 0x68, 0xEE, 0x3C, 0x80, // PPS
        0x00, 0x00, 0x01, 0x06, 0x05, 0xFF, // SEI
        0x00, 0x00, 0x01, 0x65, 0x88, 0x84, 0x00, 0x00, 0x03, 0x01, // IDR
        0x00, 0x00, 0x00, 0x01, 0x41, 0x9A, // non-IDR
    ];

    #[test]
    fn test_decode_waits_for_terminating_start_code() {
        let mut decoder = H264Decoder::new();
        let mut buf = BytesMut::from(&[0x00u8, 0x00, 0x01, 0x67, 0x42, 0x00][..]);

        assert!(decoder.decode(&mut buf).unwrap().is_none());
        assert!(buf.is_empty());

        buf.extend_from_slice(&[0x00, 0x01, 0x68, 0xCE]);
        let sps = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(sps.payload.as_ref(), &[0x67, 0x42]);
        assert_eq!(buf.as_ref(), &[0x68, 0xCE]);

        assert!(decoder.decode(&mut buf).unwrap().is_none());
        let pps = decoder.decode_eof(&mut buf).unwrap().unwrap();
        assert_eq!(pps.payload.as_ref(), &[0x68, 0xCE]);
        assert_eq!(pps.sequence_index, 1);

        assert!(decoder.decode_eof(&mut buf).unwrap().is_none());
        assert!(decoder.decode_eof(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_decode_rejects_non_stream() {
        let mut decoder = H264Decoder::new();
        let mut buf = BytesMut::from(&[0x00u8, 0x00, 0x02][..]);

        assert!(matches!(
            decoder.decode(&mut buf),
            Err(H264ReaderError::NotAStream)
        ));
        assert!(matches!(
            decoder.decode_eof(&mut buf),
            Err(H264ReaderError::NotAStream)
        ));
    }

    #[test]
    fn test_decode_eof_with_incomplete_prefix() {
        let mut decoder = H264Decoder::new();
        let mut buf = BytesMut::from(&[0x00u8, 0x00][..]);

        assert!(decoder.decode(&mut buf).unwrap().is_none());
        assert!(matches!(
            decoder.decode_eof(&mut buf),
            Err(H264ReaderError::NotAStream)
        ));
    }

    #[tokio::test]
    async fn test_stream_matches_blocking_reader() {
        let expected: Vec<NalUnit> = H264Reader::new(SAMPLE).collect::<Result<_>>().unwrap();

        let stream = H264ReaderStream::new(Cursor::new(SAMPLE));
        let units: Vec<NalUnit> = stream.try_collect().await.unwrap();

        assert_eq!(units, expected);
        assert_eq!(
            units.iter().map(|nal| nal.nal_unit_type()).collect::<Vec<_>>(),
            vec![
                NALUnitType::SPS,
                NALUnitType::PPS,
                NALUnitType::IDRSliceLayerWithoutPartitioning,
                NALUnitType::NonIDRSliceLayerWithoutPartitioning,
            ]
        );
    }

    #[tokio::test]
    async fn test_stream_with_tiny_reads() {
        let config = ReaderConfig::builder().read_buffer_size(1).build();
        let mut stream = H264ReaderStream::with_config(Cursor::new(SAMPLE), config).unwrap();

        let mut indices = Vec::new();
        while let Some(nal) = stream.next().await {
            indices.push(nal.unwrap().sequence_index);
        }

        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(stream.sequence_index(), 4);
    }

    #[tokio::test]
    async fn test_stream_ends_after_error() {
        let mut stream = H264ReaderStream::new(Cursor::new(vec![0x00, 0x00, 0x00, 0x02]));

        assert!(matches!(
            stream.next().await,
            Some(Err(H264ReaderError::NotAStream))
        ));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_source() {
        let stream = H264ReaderStream::new(Cursor::new(Vec::new()));
        let units: Vec<NalUnit> = stream.try_collect().await.unwrap();

        assert!(units.is_empty());
    }
}
