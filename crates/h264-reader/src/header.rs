use crate::NALUnitType;

/// The one-byte header that opens every NAL unit.
///
/// ```text
/// +---------------+
/// |0|1|2|3|4|5|6|7|
/// +-+-+-+-+-+-+-+-+
/// |F|NRI|  Type   |
/// +---------------+
/// ```
///
/// All 256 byte values are valid headers, so parsing cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NalHeader {
    /// `forbidden_zero_bit` shall be equal to 0 in a conformant stream.
    ///
    /// It is reported as found and never rejected.
    pub forbidden_zero_bit: bool,

    /// `nal_ref_idc` not equal to 0 specifies that the unit contains a parameter set or a slice
    /// of a reference picture. Higher values signal higher importance.
    ///
    /// `nal_ref_idc` shall be equal to 0 for all NAL units having `nal_unit_type` equal to 6, 9, 10, 11, or 12.
    pub nal_ref_idc: u8,

    /// `nal_unit_type` specifies the type of RBSP data structure contained in the NAL unit.
    pub nal_unit_type: NALUnitType,
}

impl NalHeader {
    /// Decodes a NAL header byte.
    pub fn parse(byte: u8) -> Self {
        Self {
            forbidden_zero_bit: byte >> 7 == 1,
            nal_ref_idc: (byte >> 5) & 0b11,
            nal_unit_type: NALUnitType::from(byte & 0x1F),
        }
    }

    /// Encodes the header back into a single byte.
    ///
    /// `nal_ref_idc` is truncated to 2 bits.
    pub fn build(&self) -> u8 {
        ((self.forbidden_zero_bit as u8) << 7)
            | ((self.nal_ref_idc & 0b11) << 5)
            | (u8::from(self.nal_unit_type) & 0x1F)
    }
}

impl From<u8> for NalHeader {
    fn from(byte: u8) -> Self {
        Self::parse(byte)
    }
}
