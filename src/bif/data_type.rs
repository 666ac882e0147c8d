//! The closed set of channel element types.

use std::fmt;

/// Declared element type of a channel.
///
/// This is a closed set: every channel in a file carries one of these tags,
/// and every consumer dispatches over the whole set exactly once (the
/// [`TileData`](super::TileData) sum type mirrors it variant for variant).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u32)]
pub enum DataType {
    /// Undefined data type
    None = 0,
    /// f32
    Float = 1,
    /// 2-vector of f32
    FloatV2 = 2,
    /// 3-vector of f32
    FloatV3 = 3,
    /// i32
    Int32 = 4,
    /// i64
    Int64 = 5,
    /// u32
    UInt32 = 6,
    /// u64
    UInt64 = 7,
    /// 2-vector of i32
    Int32V2 = 8,
    /// 3-vector of i32
    Int32V3 = 9,
    /// 4-vector of f32
    FloatV4 = 10,
    /// 4x4 matrix of f32
    FloatMat44 = 11,
    /// i8
    Int8 = 12,
    /// i16
    Int16 = 13,
    /// u8
    UInt8 = 14,
    /// u16
    UInt16 = 15,
    /// bool
    Bool = 16,
    /// string
    StringClass = 17,
    /// nested dictionary
    DictionaryClass = 18,
    /// 2-vector of u64
    UInt64V2 = 19,
    /// 3-vector of u64
    UInt64V3 = 20,
    /// 4-vector of u64
    UInt64V4 = 21,
    /// array of strings
    StringArrayClass = 22,
}

impl DataType {
    /// Wire tag for this type.
    #[inline]
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// Decode a wire tag.
    pub const fn from_tag(tag: u32) -> Option<Self> {
        Some(match tag {
            0 => Self::None,
            1 => Self::Float,
            2 => Self::FloatV2,
            3 => Self::FloatV3,
            4 => Self::Int32,
            5 => Self::Int64,
            6 => Self::UInt32,
            7 => Self::UInt64,
            8 => Self::Int32V2,
            9 => Self::Int32V3,
            10 => Self::FloatV4,
            11 => Self::FloatMat44,
            12 => Self::Int8,
            13 => Self::Int16,
            14 => Self::UInt8,
            15 => Self::UInt16,
            16 => Self::Bool,
            17 => Self::StringClass,
            18 => Self::DictionaryClass,
            19 => Self::UInt64V2,
            20 => Self::UInt64V3,
            21 => Self::UInt64V4,
            22 => Self::StringArrayClass,
            _ => return None,
        })
    }

    /// Bytes per element on disk, or `None` for class types and [`Self::None`].
    pub const fn element_bytes(self) -> Option<usize> {
        Some(match self {
            Self::Float => 4,
            Self::FloatV2 => 8,
            Self::FloatV3 => 12,
            Self::FloatV4 => 16,
            Self::Int8 | Self::UInt8 | Self::Bool => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 => 4,
            Self::Int64 | Self::UInt64 => 8,
            Self::Int32V2 => 8,
            Self::Int32V3 => 12,
            Self::UInt64V2 => 16,
            Self::UInt64V3 => 24,
            Self::UInt64V4 => 32,
            Self::FloatMat44 => 64,
            Self::None | Self::StringClass | Self::DictionaryClass | Self::StringArrayClass => {
                return None
            }
        })
    }

    /// True for fixed-size numeric/bool types.
    #[inline]
    pub const fn is_pod(self) -> bool {
        self.element_bytes().is_some()
    }

    /// Human-readable type name, as printed by the inspection tools.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Float => "Float",
            Self::FloatV2 => "FloatV2",
            Self::FloatV3 => "FloatV3",
            Self::FloatV4 => "FloatV4",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Int32V2 => "Int32V2",
            Self::Int32V3 => "Int32V3",
            Self::FloatMat44 => "FloatMat44",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::Bool => "Bool",
            Self::StringClass => "StringClass",
            Self::DictionaryClass => "DictionaryClass",
            Self::UInt64V2 => "UInt64V2",
            Self::UInt64V3 => "UInt64V3",
            Self::UInt64V4 => "UInt64V4",
            Self::StringArrayClass => "StringArrayClass",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
