//! Tile addressing and per-tile payload.

use crate::util::{IVec2, IVec3, Mat4, U64Vec2, U64Vec3, U64Vec4, Vec2, Vec3, Vec4};

use super::DataType;

/// Address of one leaf of a layout: a (tile, depth) pair.
///
/// This is the only way to address channel payload.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TreeIndex {
    pub tile: usize,
    pub depth: usize,
}

impl TreeIndex {
    #[inline]
    pub const fn new(tile: usize, depth: usize) -> Self {
        Self { tile, depth }
    }
}

/// Per-depth tile geometry.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TileDimInfo {
    /// Voxels per tile side at this depth.
    pub tile_size: u32,
    /// World-space width of one tile.
    pub tile_width: f32,
    /// World-space width covered by the whole depth level.
    pub depth_width: f32,
    /// World-space width of one voxel.
    pub voxel_width: f32,
}

impl Default for TileDimInfo {
    fn default() -> Self {
        Self {
            tile_size: 1,
            tile_width: 1.0,
            depth_width: 1.0,
            voxel_width: 1.0,
        }
    }
}

/// One tile's payload for one channel.
///
/// Sum type mirroring [`DataType`] variant for variant, so that a consumer
/// dispatches over the closed set exactly once and the compiler flags any
/// unhandled variant.
#[derive(Clone, PartialEq, Debug)]
pub enum TileData {
    /// Undefined data type, carries no payload.
    None,
    Float(Vec<f32>),
    FloatV2(Vec<Vec2>),
    FloatV3(Vec<Vec3>),
    FloatV4(Vec<Vec4>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Int32V2(Vec<IVec2>),
    Int32V3(Vec<IVec3>),
    FloatMat44(Vec<Mat4>),
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    Bool(Vec<bool>),
    String(Vec<String>),
    Dictionary(Vec<serde_json::Value>),
    UInt64V2(Vec<U64Vec2>),
    UInt64V3(Vec<U64Vec3>),
    UInt64V4(Vec<U64Vec4>),
    StringArray(Vec<Vec<String>>),
}

impl TileData {
    /// Empty payload of the given declared type.
    pub fn empty(data_type: DataType) -> Self {
        match data_type {
            DataType::None => Self::None,
            DataType::Float => Self::Float(Vec::new()),
            DataType::FloatV2 => Self::FloatV2(Vec::new()),
            DataType::FloatV3 => Self::FloatV3(Vec::new()),
            DataType::FloatV4 => Self::FloatV4(Vec::new()),
            DataType::Int32 => Self::Int32(Vec::new()),
            DataType::Int64 => Self::Int64(Vec::new()),
            DataType::UInt32 => Self::UInt32(Vec::new()),
            DataType::UInt64 => Self::UInt64(Vec::new()),
            DataType::Int32V2 => Self::Int32V2(Vec::new()),
            DataType::Int32V3 => Self::Int32V3(Vec::new()),
            DataType::FloatMat44 => Self::FloatMat44(Vec::new()),
            DataType::Int8 => Self::Int8(Vec::new()),
            DataType::Int16 => Self::Int16(Vec::new()),
            DataType::UInt8 => Self::UInt8(Vec::new()),
            DataType::UInt16 => Self::UInt16(Vec::new()),
            DataType::Bool => Self::Bool(Vec::new()),
            DataType::StringClass => Self::String(Vec::new()),
            DataType::DictionaryClass => Self::Dictionary(Vec::new()),
            DataType::UInt64V2 => Self::UInt64V2(Vec::new()),
            DataType::UInt64V3 => Self::UInt64V3(Vec::new()),
            DataType::UInt64V4 => Self::UInt64V4(Vec::new()),
            DataType::StringArrayClass => Self::StringArray(Vec::new()),
        }
    }

    /// Declared type this payload corresponds to.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::None => DataType::None,
            Self::Float(_) => DataType::Float,
            Self::FloatV2(_) => DataType::FloatV2,
            Self::FloatV3(_) => DataType::FloatV3,
            Self::FloatV4(_) => DataType::FloatV4,
            Self::Int32(_) => DataType::Int32,
            Self::Int64(_) => DataType::Int64,
            Self::UInt32(_) => DataType::UInt32,
            Self::UInt64(_) => DataType::UInt64,
            Self::Int32V2(_) => DataType::Int32V2,
            Self::Int32V3(_) => DataType::Int32V3,
            Self::FloatMat44(_) => DataType::FloatMat44,
            Self::Int8(_) => DataType::Int8,
            Self::Int16(_) => DataType::Int16,
            Self::UInt8(_) => DataType::UInt8,
            Self::UInt16(_) => DataType::UInt16,
            Self::Bool(_) => DataType::Bool,
            Self::String(_) => DataType::StringClass,
            Self::Dictionary(_) => DataType::DictionaryClass,
            Self::UInt64V2(_) => DataType::UInt64V2,
            Self::UInt64V3(_) => DataType::UInt64V3,
            Self::UInt64V4(_) => DataType::UInt64V4,
            Self::StringArray(_) => DataType::StringArrayClass,
        }
    }

    /// Number of elements in this tile.
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Float(v) => v.len(),
            Self::FloatV2(v) => v.len(),
            Self::FloatV3(v) => v.len(),
            Self::FloatV4(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::UInt64(v) => v.len(),
            Self::Int32V2(v) => v.len(),
            Self::Int32V3(v) => v.len(),
            Self::FloatMat44(v) => v.len(),
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::String(v) => v.len(),
            Self::Dictionary(v) => v.len(),
            Self::UInt64V2(v) => v.len(),
            Self::UInt64V3(v) => v.len(),
            Self::UInt64V4(v) => v.len(),
            Self::StringArray(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Typed view for `Float` payload.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Typed view for `FloatV3` payload.
    pub fn as_vec3(&self) -> Option<&[Vec3]> {
        match self {
            Self::FloatV3(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_matches_type() {
        for tag in 0..=22u32 {
            let dt = DataType::from_tag(tag).unwrap();
            let tile = TileData::empty(dt);
            assert_eq!(tile.data_type(), dt);
            assert!(tile.is_empty());
        }
    }

    #[test]
    fn test_typed_views() {
        let tile = TileData::FloatV3(vec![Vec3::ONE]);
        assert_eq!(tile.len(), 1);
        assert!(tile.as_vec3().is_some());
        assert!(tile.as_f32().is_none());
    }
}
