//! Point-cache archive reader.
//!
//! Recovers what the writer committed, primarily for verification tools and
//! the round-trip tests: floating-point arrays come back bit-for-bit.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::bif::io::Cursor;
use crate::util::{BBox3f, Error, Result, Vec3};

use super::format::{
    GeometryScope, CACHE_MAGIC, CACHE_VERSION, POD_FLOAT, POD_FLOAT_V3, POD_UINT64, TS_IDENTITY,
    TS_UNIFORM,
};
use super::sample::{ArrayData, ArrayProperty};
use super::time_sampling::TimeSampling;

/// One schema as stored in an archive.
#[derive(Clone, Debug)]
pub struct SchemaData {
    pub name: String,
    pub time_sampling_index: u32,
    pub bounds: BBox3f,
    pub point_count: u64,
    pub properties: Vec<ArrayProperty>,
}

impl SchemaData {
    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&ArrayProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The mandatory position array.
    pub fn positions(&self) -> Option<&[Vec3]> {
        self.property("P").and_then(|p| p.data.as_vec3())
    }

    /// The mandatory identifier array.
    pub fn ids(&self) -> Option<&[u64]> {
        self.property("id").and_then(|p| p.data.as_u64())
    }
}

/// A fully parsed archive.
#[derive(Clone, Debug)]
pub struct CacheFile {
    pub path: PathBuf,
    pub metadata: serde_json::Value,
    pub time_samplings: Vec<TimeSampling>,
    pub top_name: String,
    pub schemas: Vec<SchemaData>,
}

impl CacheFile {
    /// Open and parse an archive.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let mut cur = Cursor::new(&data);
        let magic = cur.read_bytes(CACHE_MAGIC.len())?;
        if magic != CACHE_MAGIC {
            return Err(Error::InvalidMagic);
        }
        let version = cur.read_u16()?;
        if version > CACHE_VERSION {
            return Err(Error::UnsupportedVersion(version as u32));
        }
        let metadata: serde_json::Value = serde_json::from_str(&cur.read_string()?)?;

        let ts_count = cur.read_u32()? as usize;
        let mut time_samplings = Vec::with_capacity(ts_count.min(64));
        for _ in 0..ts_count {
            let kind = cur.read_u8()?;
            let time_per_cycle = cur.read_f64()?;
            let start_time = cur.read_f64()?;
            time_samplings.push(match kind {
                TS_IDENTITY => TimeSampling::IDENTITY,
                TS_UNIFORM => TimeSampling::uniform(time_per_cycle, start_time),
                t => return Err(Error::invalid(format!("unknown time sampling kind {t}"))),
            });
        }

        let top_name = cur.read_string()?;

        let schema_count = cur.read_u32()? as usize;
        let mut schemas = Vec::with_capacity(schema_count.min(64));
        for _ in 0..schema_count {
            schemas.push(read_schema(&mut cur)?);
        }

        Ok(Self {
            path: path.to_path_buf(),
            metadata,
            time_samplings,
            top_name,
            schemas,
        })
    }

    /// Look up a schema by name.
    pub fn schema(&self, name: &str) -> Option<&SchemaData> {
        self.schemas.iter().find(|s| s.name == name)
    }
}

fn read_schema(cur: &mut Cursor<'_>) -> Result<SchemaData> {
    let name = cur.read_string()?;
    let time_sampling_index = cur.read_u32()?;

    let mut b = [0.0f32; 6];
    for x in b.iter_mut() {
        *x = cur.read_f32()?;
    }
    let bounds = BBox3f::new(Vec3::new(b[0], b[1], b[2]), Vec3::new(b[3], b[4], b[5]));

    let point_count = cur.read_u64()?;
    let property_count = cur.read_u32()? as usize;
    let mut properties = Vec::with_capacity(property_count.min(64));
    for _ in 0..property_count {
        properties.push(read_property(cur)?);
    }

    Ok(SchemaData {
        name,
        time_sampling_index,
        bounds,
        point_count,
        properties,
    })
}

fn read_property(cur: &mut Cursor<'_>) -> Result<ArrayProperty> {
    let name = cur.read_string()?;
    let pod = cur.read_u8()?;
    let scope_tag = cur.read_u8()?;
    let scope = GeometryScope::from_tag(scope_tag)
        .ok_or_else(|| Error::invalid(format!("unknown geometry scope tag {scope_tag}")))?;
    let count = cur.read_count(4)?;

    let data = match pod {
        POD_FLOAT => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(cur.read_f32()?);
            }
            ArrayData::Float(v)
        }
        POD_FLOAT_V3 => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                let x = cur.read_f32()?;
                let y = cur.read_f32()?;
                let z = cur.read_f32()?;
                v.push(Vec3::new(x, y, z));
            }
            ArrayData::FloatV3(v)
        }
        POD_UINT64 => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(cur.read_u64()?);
            }
            ArrayData::UInt64(v)
        }
        t => return Err(Error::invalid(format!("unknown property pod tag {t}"))),
    };

    Ok(ArrayProperty { name, scope, data })
}
