use std::io;

use thiserror::Error;

/// Errors that can occur while reading NAL units from an Annex B byte stream.
#[derive(Error, Debug)]
pub enum H264ReaderError {
    /// The input does not begin with a `00 00 01` or `00 00 00 01` start code.
    #[error("data is not an H.264 Annex B stream: no leading start code")]
    NotAStream,

    /// The byte source failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A unit grew past the configured `max_nal_size`.
    #[error("NAL unit too large: {size} bytes exceeds limit of {limit}")]
    NalTooLarge {
        /// Bytes accumulated when the limit was hit.
        size: usize,
        /// The configured limit.
        limit: usize,
    },

    /// The reader configuration cannot be used.
    #[error("invalid reader configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Result type for reader operations.
pub type Result<T> = std::result::Result<T, H264ReaderError>;
