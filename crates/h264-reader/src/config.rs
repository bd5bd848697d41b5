use std::fmt::Display;

use crate::error::{H264ReaderError, Result};

/// Default size of the buffer handed to each `read` call on the byte source.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4 * 1024; // 4 KB

/// Tuning options for [`H264Reader`](crate::H264Reader) and [`H264Decoder`](crate::H264Decoder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Number of bytes requested from the source per read
    pub read_buffer_size: usize,

    /// Largest NAL unit accepted in bytes (None = unlimited)
    pub max_nal_size: Option<usize>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            max_nal_size: None,
        }
    }
}

impl Display for ReaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let max_nal_display = match self.max_nal_size {
            Some(limit) => format!("{} bytes", limit),
            None => "unlimited".to_string(),
        };

        write!(
            f,
            "ReaderConfig {{ read_buffer_size: {} bytes, max_nal_size: {} }}",
            self.read_buffer_size, max_nal_display
        )
    }
}

impl ReaderConfig {
    /// Starts a [`ReaderConfigBuilder`] from the defaults.
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::default()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.read_buffer_size == 0 {
            return Err(H264ReaderError::InvalidConfig(
                "read_buffer_size must be greater than zero",
            ));
        }
        if self.max_nal_size == Some(0) {
            return Err(H264ReaderError::InvalidConfig(
                "max_nal_size must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Fluent builder for [`ReaderConfig`].
#[derive(Debug, Clone, Default)]
pub struct ReaderConfigBuilder {
    config: ReaderConfig,
}

impl ReaderConfigBuilder {
    /// Sets the number of bytes requested from the source per read.
    pub fn read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.config.read_buffer_size = read_buffer_size;
        self
    }

    /// Rejects NAL units larger than `max_nal_size` bytes.
    pub fn max_nal_size(mut self, max_nal_size: usize) -> Self {
        self.config.max_nal_size = Some(max_nal_size);
        self
    }

    /// Finishes the builder. Validation happens when a reader is constructed.
    pub fn build(self) -> ReaderConfig {
        self.config
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = ReaderConfig::builder()
            .read_buffer_size(512)
            .max_nal_size(1 << 20)
            .build();

        assert_eq!(config.read_buffer_size, 512);
        assert_eq!(config.max_nal_size, Some(1 << 20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_sizes_are_rejected() {
        let config = ReaderConfig::builder().read_buffer_size(0).build();
        assert!(matches!(
            config.validate(),
            Err(H264ReaderError::InvalidConfig(_))
        ));

        let config = ReaderConfig::builder().max_nal_size(0).build();
        assert!(matches!(
            config.validate(),
            Err(H264ReaderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ReaderConfig::default().to_string(),
            "ReaderConfig { read_buffer_size: 4096 bytes, max_nal_size: unlimited }"
        );
    }
}
