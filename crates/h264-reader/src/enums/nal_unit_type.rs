use std::fmt;

/// NAL (Network Abstraction Layer) unit types as defined by ISO/IEC 14496-10:2022 (Table 7-1).
///
/// The type occupies the low 5 bits of the NAL header byte, so every value in `0..=31`
/// maps onto a variant and conversion from a raw byte never fails.
///
/// ## Decoder Behavior:
/// - Decoders using **Annex A** ignore unit types **14, 15, and 20**.
/// - **Types 0 and 24-31** are application-specific and carried as [`NALUnitType::Unspecified`].
/// - **Types 17, 18, 22 and 23** are reserved and carried as [`NALUnitType::Reserved`].
///
/// ## IDR (Instantaneous Decoder Refresh) Pictures:
/// - If `nal_unit_type` is **5**, the picture **must not contain** types **1-4**.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum NALUnitType {
    /// Unspecified, application-defined use (0 and 24-31)
    Unspecified(u8),

    /// Regular video slice (non-IDR picture)
    NonIDRSliceLayerWithoutPartitioning,

    /// Coded slice data partition A
    SliceDataPartitionALayer,

    /// Coded slice data partition B
    SliceDataPartitionBLayer,

    /// Coded slice data partition C
    SliceDataPartitionCLayer,

    /// IDR picture (used to refresh the video stream)
    IDRSliceLayerWithoutPartitioning,

    /// Extra metadata (Supplemental Enhancement Information)
    SEI,

    /// Sequence Parameter Set (SPS) – contains video configuration details
    SPS,

    /// Picture Parameter Set (PPS) – contains picture-specific settings
    PPS,

    /// Marks the start of a new access unit (frame boundary)
    AccessUnitDelimiter,

    /// End of video sequence
    EndOfSeq,

    /// End of video stream
    EndOfStream,

    /// Extra filler data (can be ignored)
    FillerData,

    /// Extension to SPS (used for advanced encoding features)
    SPSExtension,

    /// Prefix NAL unit (ignored by Annex A decoders)
    PrefixNalUnit,

    /// Subset of SPS (ignored by Annex A decoders)
    SubsetSPS,

    /// Depth parameter set (used for 3D video)
    DepthParameterSet,

    /// Reserved, should be ignored (17, 18, 22, 23)
    Reserved(u8),

    /// Auxiliary coded slice (may be ignored by some decoders)
    AuxCodedPictureSliceLayerWithoutPartitioning,

    /// Additional slice data for extended coding (ignored by Annex A decoders)
    SliceLayerExtension,

    /// Slice extension for depth/3D-AVC video (ignored by some decoders)
    SliceLayerExtension2,
}

impl NALUnitType {
    /// Returns the raw 5-bit `nal_unit_type` value.
    pub const fn value(self) -> u8 {
        match self {
            NALUnitType::Unspecified(v) | NALUnitType::Reserved(v) => v,
            NALUnitType::NonIDRSliceLayerWithoutPartitioning => 1,
            NALUnitType::SliceDataPartitionALayer => 2,
            NALUnitType::SliceDataPartitionBLayer => 3,
            NALUnitType::SliceDataPartitionCLayer => 4,
            NALUnitType::IDRSliceLayerWithoutPartitioning => 5,
            NALUnitType::SEI => 6,
            NALUnitType::SPS => 7,
            NALUnitType::PPS => 8,
            NALUnitType::AccessUnitDelimiter => 9,
            NALUnitType::EndOfSeq => 10,
            NALUnitType::EndOfStream => 11,
            NALUnitType::FillerData => 12,
            NALUnitType::SPSExtension => 13,
            NALUnitType::PrefixNalUnit => 14,
            NALUnitType::SubsetSPS => 15,
            NALUnitType::DepthParameterSet => 16,
            NALUnitType::AuxCodedPictureSliceLayerWithoutPartitioning => 19,
            NALUnitType::SliceLayerExtension => 20,
            NALUnitType::SliceLayerExtension2 => 21,
        }
    }

    /// Whether this unit carries coded slice data (types 1-5).
    pub const fn is_vcl(self) -> bool {
        matches!(self.value(), 1..=5)
    }

    /// Whether this unit is a slice of an IDR picture.
    pub const fn is_idr(self) -> bool {
        matches!(self, NALUnitType::IDRSliceLayerWithoutPartitioning)
    }

    /// Whether this unit is a sequence or picture parameter set (or one of their extensions).
    pub const fn is_parameter_set(self) -> bool {
        matches!(
            self,
            NALUnitType::SPS | NALUnitType::PPS | NALUnitType::SPSExtension | NALUnitType::SubsetSPS
        )
    }
}

impl From<u8> for NALUnitType {
    /// Converts the low 5 bits of `value` to a `NALUnitType`. Higher bits are ignored.
    fn from(value: u8) -> Self {
        match value & 0x1F {
            1 => NALUnitType::NonIDRSliceLayerWithoutPartitioning,
            2 => NALUnitType::SliceDataPartitionALayer,
            3 => NALUnitType::SliceDataPartitionBLayer,
            4 => NALUnitType::SliceDataPartitionCLayer,
            5 => NALUnitType::IDRSliceLayerWithoutPartitioning,
            6 => NALUnitType::SEI,
            7 => NALUnitType::SPS,
            8 => NALUnitType::PPS,
            9 => NALUnitType::AccessUnitDelimiter,
            10 => NALUnitType::EndOfSeq,
            11 => NALUnitType::EndOfStream,
            12 => NALUnitType::FillerData,
            13 => NALUnitType::SPSExtension,
            14 => NALUnitType::PrefixNalUnit,
            15 => NALUnitType::SubsetSPS,
            16 => NALUnitType::DepthParameterSet,
            19 => NALUnitType::AuxCodedPictureSliceLayerWithoutPartitioning,
            20 => NALUnitType::SliceLayerExtension,
            21 => NALUnitType::SliceLayerExtension2,
            v @ (17 | 18 | 22 | 23) => NALUnitType::Reserved(v),
            v => NALUnitType::Unspecified(v), // 0 and 24-31
        }
    }
}

impl From<NALUnitType> for u8 {
    fn from(value: NALUnitType) -> Self {
        value.value()
    }
}

// Include the enum name so snapshots read `NALUnitType::SPS` rather than `SPS`
impl fmt::Debug for NALUnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NALUnitType::Unspecified(v) => return write!(f, "NALUnitType::Unspecified({v})"),
            NALUnitType::Reserved(v) => return write!(f, "NALUnitType::Reserved({v})"),
            NALUnitType::NonIDRSliceLayerWithoutPartitioning => "NonIDRSliceLayerWithoutPartitioning",
            NALUnitType::SliceDataPartitionALayer => "SliceDataPartitionALayer",
            NALUnitType::SliceDataPartitionBLayer => "SliceDataPartitionBLayer",
            NALUnitType::SliceDataPartitionCLayer => "SliceDataPartitionCLayer",
            NALUnitType::IDRSliceLayerWithoutPartitioning => "IDRSliceLayerWithoutPartitioning",
            NALUnitType::SEI => "SEI",
            NALUnitType::SPS => "SPS",
            NALUnitType::PPS => "PPS",
            NALUnitType::AccessUnitDelimiter => "AccessUnitDelimiter",
            NALUnitType::EndOfSeq => "EndOfSeq",
            NALUnitType::EndOfStream => "EndOfStream",
            NALUnitType::FillerData => "FillerData",
            NALUnitType::SPSExtension => "SPSExtension",
            NALUnitType::PrefixNalUnit => "PrefixNalUnit",
            NALUnitType::SubsetSPS => "SubsetSPS",
            NALUnitType::DepthParameterSet => "DepthParameterSet",
            NALUnitType::AuxCodedPictureSliceLayerWithoutPartitioning => {
                "AuxCodedPictureSliceLayerWithoutPartitioning"
            }
            NALUnitType::SliceLayerExtension => "SliceLayerExtension",
            NALUnitType::SliceLayerExtension2 => "SliceLayerExtension2",
        };
        write!(f, "NALUnitType::{name}")
    }
}
