//! Destination point-cache archive: time-sampled schemas of flat arrays.
//!
//! An archive holds one top-level node, a table of time samplings shared by
//! every schema, and per-component point schemas each committed exactly once.

pub mod format;
pub mod reader;

mod sample;
mod stream;
mod time_sampling;
mod writer;

pub use format::GeometryScope;
pub use reader::{CacheFile, SchemaData};
pub use sample::{ArrayData, ArrayProperty, PointsSample, PointsSchema};
pub use time_sampling::{TimeSampling, TimeSamplingType};
pub use writer::CacheArchive;
