use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::{NALUnitType, NalHeader};

/// A single NAL unit cut out of an Annex B byte stream.
///
/// The unit owns its bytes; they are never written to again by the reader that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NalUnit {
    /// The decoded header byte.
    pub header: NalHeader,

    /// Every byte between the start code that introduced this unit and the next start code,
    /// header byte first. Emulation prevention bytes are left in place.
    pub payload: Bytes,

    /// Position of this unit among the units delivered by its reader, starting at 0.
    ///
    /// Filtered units (SEI) do not take an index, so consecutive units always differ by one.
    /// This is a delivery counter, not a picture order count.
    pub sequence_index: u64,
}

impl NalUnit {
    /// Bit 7 of the header byte.
    pub fn forbidden_zero_bit(&self) -> bool {
        self.header.forbidden_zero_bit
    }

    /// Bits 6-5 of the header byte.
    pub fn nal_ref_idc(&self) -> u8 {
        self.header.nal_ref_idc
    }

    /// Bits 4-0 of the header byte.
    pub fn nal_unit_type(&self) -> NALUnitType {
        self.header.nal_unit_type
    }

    /// The bytes after the header byte. Zero copy.
    ///
    /// Returns an empty buffer if `payload` is empty.
    pub fn body(&self) -> Bytes {
        if self.payload.is_empty() {
            return Bytes::new();
        }
        self.payload.slice(1..)
    }

    /// Length of the unit including its header byte.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether `payload` is empty. Never true for units produced by a reader, which always
    /// carry their header byte.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Turns raw slices into [`NalUnit`]s, dropping the ones the caller never sees and numbering
/// the rest.
#[derive(Debug, Default)]
pub(crate) struct NalSequencer {
    next_index: u64,
}

impl NalSequencer {
    /// Number of units handed out so far.
    pub(crate) fn delivered(&self) -> u64 {
        self.next_index
    }

    /// Returns `None` for slices that must not be surfaced: empty slices (two adjacent start
    /// codes) and SEI units.
    pub(crate) fn admit(&mut self, slice: BytesMut) -> Option<NalUnit> {
        let Some(&first) = slice.first() else {
            trace!("skipping empty slice between adjacent start codes");
            return None;
        };

        let header = NalHeader::parse(first);
        if header.nal_unit_type == NALUnitType::SEI {
            trace!(size = slice.len(), "skipping SEI unit");
            return None;
        }

        let unit = NalUnit {
            header,
            payload: slice.freeze(),
            sequence_index: self.next_index,
        };
        self.next_index += 1;

        trace!(
            sequence_index = unit.sequence_index,
            nal_unit_type = ?unit.header.nal_unit_type,
            size = unit.payload.len(),
            "delivering NAL unit"
        );
        Some(unit)
    }
}
