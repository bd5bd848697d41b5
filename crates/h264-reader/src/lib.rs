//! A pure Rust reader that splits an H.264 Annex B byte stream into NAL units.
//!
//! This crate is designed to provide a simple and safe interface to walk the NAL units of a raw
//! `.h264` elementary stream, the start code delimited format written by encoders and carried in
//! MPEG-TS payloads.
//!
//! ## What it does
//!
//! - Finds `00 00 01` and `00 00 00 01` start codes in a stream that arrives in arbitrary chunks,
//!   without buffering more than the unit currently being read.
//! - Decodes the NAL header byte (`forbidden_zero_bit`, `nal_ref_idc`, `nal_unit_type`).
//! - Drops SEI units and numbers the remaining units in delivery order.
//!
//! It does not parse payloads (slice headers, parameter sets) and does not remove emulation
//! prevention bytes.
//!
//! ## Examples
//!
//! ### Blocking
//!
//! ```rust
//! use h264_reader::{H264Reader, NALUnitType};
//!
//! // SPS, PPS, SEI and an IDR slice
//! let data: &[u8] = &[
//!     0x00, 0x00, 0x00, 0x01, 0x67, 0x64, 0x00, 0x1F,
//!     0x00, 0x00, 0x00, 0x01, 0x68, 0xEE, 0x3C, 0x80,
//!     0x00, 0x00, 0x01, 0x06, 0x05, 0xFF,
//!     0x00, 0x00, 0x01, 0x65, 0x88, 0x84,
//! ];
//!
//! let mut reader = H264Reader::new(data);
//! let mut types = Vec::new();
//! while let Some(nal) = reader.next_nal()? {
//!     types.push(nal.nal_unit_type());
//! }
//!
//! assert_eq!(
//!     types,
//!     [
//!         NALUnitType::SPS,
//!         NALUnitType::PPS,
//!         NALUnitType::IDRSliceLayerWithoutPartitioning,
//!     ]
//! );
//! # Ok::<(), h264_reader::H264ReaderError>(())
//! ```
//!
//! ### Async
//!
//! [`H264ReaderStream`] wraps any [`tokio::io::AsyncRead`] and yields the same units as a
//! [`futures::Stream`]. [`H264Decoder`] can also be used directly with
//! [`tokio_util::codec::FramedRead`].
//!
//! ## License
//!
//! This project is licensed under the [MIT](./LICENSE.MIT) or [Apache-2.0](./LICENSE.Apache-2.0) license.
//! You can choose between one of them if you use this work.
//!
//! `SPDX-License-Identifier: MIT OR Apache-2.0`
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]

mod codec;
mod config;
mod enums;
mod error;
mod header;
mod nal;
mod reader;
mod scanner;
mod state;

pub use enums::*;

pub use self::codec::{H264Decoder, H264ReaderStream};
pub use self::config::{DEFAULT_READ_BUFFER_SIZE, ReaderConfig, ReaderConfigBuilder};
pub use self::error::{H264ReaderError, Result};
pub use self::header::NalHeader;
pub use self::nal::NalUnit;
pub use self::reader::H264Reader;
