//! On-disk format constants for point-cache archives.
//!
//! An archive is written once, front to back. All integers are little-endian
//! and strings are a `u32` byte length followed by UTF-8 bytes.
//!
//! ```text
//! magic            [u8; 8] = "BIFCACHE"
//! version          u16
//! metadata         str (JSON: application, contact, writer)
//! sampling_count   u32
//! sampling_count x { kind u8, time_per_cycle f64, start_time f64 }
//! top_name         str
//! schema_count     u32
//! schema_count x {
//!     name           str
//!     ts_index       u32
//!     bounds         6 x f32 (min, max)
//!     point_count    u64
//!     property_count u32
//!     property_count x { name str, pod u8, scope u8, count u64, raw values }
//! }
//! ```

use std::fmt;

/// Magic bytes at the start of every archive.
pub const CACHE_MAGIC: &[u8; 8] = b"BIFCACHE";

/// Current archive format version.
pub const CACHE_VERSION: u16 = 1;

/// Time sampling kind tags.
pub const TS_IDENTITY: u8 = 0;
pub const TS_UNIFORM: u8 = 1;

/// Array property element kind tags.
pub const POD_FLOAT: u8 = 0;
pub const POD_FLOAT_V3: u8 = 1;
pub const POD_UINT64: u8 = 2;

/// Cardinality scope of an array property.
///
/// Auxiliary per-point properties are tagged [`GeometryScope::Varying`] to
/// indicate a per-point cardinality that may change between samples.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum GeometryScope {
    Constant = 0,
    Uniform = 1,
    Varying = 2,
    Vertex = 3,
    FaceVarying = 4,
}

impl GeometryScope {
    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub const fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0 => Self::Constant,
            1 => Self::Uniform,
            2 => Self::Varying,
            3 => Self::Vertex,
            4 => Self::FaceVarying,
            _ => return None,
        })
    }
}

impl fmt::Display for GeometryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Constant => "constant",
            Self::Uniform => "uniform",
            Self::Varying => "varying",
            Self::Vertex => "vertex",
            Self::FaceVarying => "facevarying",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_tags() {
        for tag in 0..5u8 {
            assert_eq!(GeometryScope::from_tag(tag).unwrap().tag(), tag);
        }
        assert!(GeometryScope::from_tag(5).is_none());
    }
}
