//! Point-cache archive writer.
//!
//! Writing is append-only and single-shot: the archive accepts one top-level
//! node, a table of time samplings, and one committed sample per schema, then
//! freezes. There is no rewrite or append path for a committed schema.

use std::path::Path;

use serde_json::json;
use tracing::debug;

use crate::util::{Error, Result};

use super::format::{
    CACHE_MAGIC, CACHE_VERSION, POD_FLOAT, POD_FLOAT_V3, POD_UINT64, TS_IDENTITY, TS_UNIFORM,
};
use super::sample::{ArrayData, PointsSchema};
use super::stream::OStream;
use super::time_sampling::{TimeSampling, TimeSamplingType};

/// Output archive for flattened point data.
pub struct CacheArchive {
    stream: OStream,
    name: String,
    metadata: String,
    time_samplings: Vec<TimeSampling>,
    top_name: Option<String>,
    schemas: Vec<PointsSchema>,
    frozen: bool,
}

impl CacheArchive {
    /// Create a new archive for writing.
    ///
    /// The destination file is created eagerly so that an unwritable path
    /// fails the run before any traversal work happens. `application` and
    /// `contact` are free-text provenance strings stored in the archive
    /// metadata.
    pub fn create(path: impl AsRef<Path>, application: &str, contact: &str) -> Result<Self> {
        let name = path.as_ref().to_string_lossy().to_string();
        let stream = OStream::create(&path)?;

        let metadata = json!({
            "application": application,
            "contact": contact,
            "writer": concat!("bifcache-", env!("CARGO_PKG_VERSION")),
        })
        .to_string();

        Ok(Self {
            stream,
            name,
            metadata,
            // Index 0 is always identity, matching reader expectations.
            time_samplings: vec![TimeSampling::IDENTITY],
            top_name: None,
            schemas: Vec::new(),
            frozen: false,
        })
    }

    /// Archive name/path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a time sampling and return its index for reuse by every
    /// schema written in this run.
    pub fn add_time_sampling(&mut self, ts: TimeSampling) -> u32 {
        if let Some(idx) = self.time_samplings.iter().position(|t| *t == ts) {
            return idx as u32;
        }
        self.time_samplings.push(ts);
        (self.time_samplings.len() - 1) as u32
    }

    /// Create the top-level scene node. Allowed exactly once per archive.
    pub fn create_xform(&mut self, name: &str) -> Result<()> {
        if self.frozen {
            return Err(Error::Frozen);
        }
        if self.top_name.is_some() {
            return Err(Error::WriteFailed(format!(
                "top-level node already created in \"{}\"",
                self.name
            )));
        }
        self.top_name = Some(name.to_string());
        Ok(())
    }

    /// Commit one schema with its single sample.
    ///
    /// The sample must be internally consistent (the flatten engine
    /// guarantees this before handing it over).
    pub fn commit_points(&mut self, schema: PointsSchema) -> Result<()> {
        if self.frozen {
            return Err(Error::Frozen);
        }
        if !schema.sample.is_consistent() {
            return Err(Error::WriteFailed(format!(
                "schema \"{}\": sample arrays disagree on point count",
                schema.name
            )));
        }
        if schema.time_sampling_index as usize >= self.time_samplings.len() {
            return Err(Error::WriteFailed(format!(
                "schema \"{}\": unknown time sampling index {}",
                schema.name, schema.time_sampling_index
            )));
        }
        debug!(
            schema = %schema.name,
            points = schema.sample.positions.len(),
            "committing points schema"
        );
        self.schemas.push(schema);
        Ok(())
    }

    /// Write everything out and freeze the archive.
    pub fn finish(mut self) -> Result<()> {
        self.frozen = true;

        let s = &mut self.stream;
        s.write_bytes(CACHE_MAGIC)?;
        s.write_u16(CACHE_VERSION)?;
        s.write_string(&self.metadata)?;

        s.write_u32(self.time_samplings.len() as u32)?;
        for ts in &self.time_samplings {
            match ts.sampling_type {
                TimeSamplingType::Identity => {
                    s.write_u8(TS_IDENTITY)?;
                    s.write_f64(0.0)?;
                    s.write_f64(0.0)?;
                }
                TimeSamplingType::Uniform {
                    time_per_cycle,
                    start_time,
                } => {
                    s.write_u8(TS_UNIFORM)?;
                    s.write_f64(time_per_cycle)?;
                    s.write_f64(start_time)?;
                }
            }
        }

        s.write_string(self.top_name.as_deref().unwrap_or(""))?;

        s.write_u32(self.schemas.len() as u32)?;
        for schema in &self.schemas {
            write_schema(s, schema)?;
        }

        s.flush()?;
        debug!(archive = %self.name, bytes = s.pos(), "archive finished");
        Ok(())
    }
}

fn write_schema(s: &mut OStream, schema: &PointsSchema) -> Result<()> {
    use super::format::GeometryScope;

    let sample = &schema.sample;

    s.write_string(&schema.name)?;
    s.write_u32(schema.time_sampling_index)?;
    for x in sample.bounds.min.to_array().into_iter().chain(sample.bounds.max.to_array()) {
        s.write_f32(x)?;
    }
    s.write_u64(sample.positions.len() as u64)?;

    // Mandatory schema pair first, auxiliaries after, in commit order.
    s.write_u32(2 + sample.aux.len() as u32)?;

    write_vec3_property(s, "P", GeometryScope::Vertex, &sample.positions)?;
    write_u64_property(s, "id", GeometryScope::Vertex, &sample.ids)?;
    for prop in &sample.aux {
        match &prop.data {
            ArrayData::Float(v) => write_f32_property(s, &prop.name, prop.scope, v)?,
            ArrayData::FloatV3(v) => write_vec3_property(s, &prop.name, prop.scope, v)?,
            ArrayData::UInt64(v) => write_u64_property(s, &prop.name, prop.scope, v)?,
        }
    }
    Ok(())
}

fn write_f32_property(
    s: &mut OStream,
    name: &str,
    scope: super::format::GeometryScope,
    values: &[f32],
) -> Result<()> {
    s.write_string(name)?;
    s.write_u8(POD_FLOAT)?;
    s.write_u8(scope.tag())?;
    s.write_u64(values.len() as u64)?;
    for &x in values {
        s.write_f32(x)?;
    }
    Ok(())
}

fn write_vec3_property(
    s: &mut OStream,
    name: &str,
    scope: super::format::GeometryScope,
    values: &[crate::util::Vec3],
) -> Result<()> {
    s.write_string(name)?;
    s.write_u8(POD_FLOAT_V3)?;
    s.write_u8(scope.tag())?;
    s.write_u64(values.len() as u64)?;
    for p in values {
        for x in p.to_array() {
            s.write_f32(x)?;
        }
    }
    Ok(())
}

fn write_u64_property(
    s: &mut OStream,
    name: &str,
    scope: super::format::GeometryScope,
    values: &[u64],
) -> Result<()> {
    s.write_string(name)?;
    s.write_u8(POD_UINT64)?;
    s.write_u8(scope.tag())?;
    s.write_u64(values.len() as u64)?;
    for &x in values {
        s.write_u64(x)?;
    }
    Ok(())
}
