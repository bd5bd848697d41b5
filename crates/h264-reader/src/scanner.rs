use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

use crate::error::{H264ReaderError, Result};

/// Splits an Annex B byte stream on start codes.
///
/// Zero bytes are held back as a count until the next non-zero byte decides whether they were
/// payload or part of a delimiter. A `0x01` after two or more zeros is a start code, and every
/// zero in that run belongs to the delimiter (`zero_byte`, `leading_zero_8bits` and
/// `trailing_zero_8bits` in Annex B), so the 3- and 4-byte forms are recognized by the same rule.
/// Any other byte flushes the held zeros into the current unit.
///
/// Memory use is the unit being accumulated plus a counter; input is never buffered beyond that.
#[derive(Debug)]
pub(crate) struct StartCodeScanner {
    zero_run: usize,
    prefix_found: bool,
    unit: BytesMut,
    max_nal_size: Option<usize>,
    offset: u64,
}

impl StartCodeScanner {
    pub(crate) fn new(max_nal_size: Option<usize>) -> Self {
        Self {
            zero_run: 0,
            prefix_found: false,
            unit: BytesMut::new(),
            max_nal_size,
            offset: 0,
        }
    }

    /// Consumes `input` until a unit is terminated by the next start code or the input runs out.
    ///
    /// Returns the number of bytes consumed and the completed slice, if any. The slice excludes
    /// both delimiters and may be empty when two start codes are adjacent. Bytes after the
    /// terminating start code are left for the next call.
    pub(crate) fn scan(&mut self, input: &[u8]) -> Result<(usize, Option<BytesMut>)> {
        let mut pos = 0;

        while pos < input.len() {
            if self.prefix_found && self.zero_run == 0 {
                // Nothing pending: everything up to the next zero is payload.
                let run = memchr::memchr(0x00, &input[pos..]).unwrap_or(input.len() - pos);
                if run > 0 {
                    self.unit.extend_from_slice(&input[pos..pos + run]);
                    pos += run;
                    self.check_size()?;
                    continue;
                }
            }

            let byte = input[pos];
            pos += 1;

            match byte {
                0x00 => self.zero_run += 1,
                0x01 if self.zero_run >= 2 => {
                    // Offset of the first byte after the start code.
                    let unit_offset = self.offset + pos as u64;
                    self.zero_run = 0;

                    if !self.prefix_found {
                        self.prefix_found = true;
                        debug!(offset = unit_offset, "located first start code");
                        continue;
                    }

                    self.offset += pos as u64;
                    trace!(
                        next_unit_offset = unit_offset,
                        size = self.unit.len(),
                        "start code terminates unit"
                    );
                    return Ok((pos, Some(self.unit.split())));
                }
                _ if !self.prefix_found => {
                    self.offset += pos as u64;
                    return Err(H264ReaderError::NotAStream);
                }
                _ => {
                    self.flush_zeros();
                    self.unit.put_u8(byte);
                    self.check_size()?;
                }
            }
        }

        self.offset += pos as u64;
        Ok((pos, None))
    }

    /// Signals end of input and returns the final slice, if one is pending.
    ///
    /// Trailing zeros are discarded. Input that ended while the first start code was still
    /// incomplete is not a stream; empty input is simply exhausted.
    pub(crate) fn finish(&mut self) -> Result<Option<BytesMut>> {
        if !self.prefix_found {
            if self.zero_run == 0 {
                return Ok(None);
            }
            return Err(H264ReaderError::NotAStream);
        }

        self.zero_run = 0;
        if self.unit.is_empty() {
            return Ok(None);
        }

        trace!(size = self.unit.len(), "end of input terminates unit");
        Ok(Some(self.unit.split()))
    }

    fn flush_zeros(&mut self) {
        if self.zero_run > 0 {
            self.unit.put_bytes(0x00, self.zero_run);
            self.zero_run = 0;
        }
    }

    // Pending zeros are not counted: they may still turn out to be a delimiter.
    fn check_size(&self) -> Result<()> {
        match self.max_nal_size {
            Some(limit) if self.unit.len() > limit => Err(H264ReaderError::NalTooLarge {
                size: self.unit.len(),
                limit,
            }),
            _ => Ok(()),
        }
    }
}
