//! # bifcache
//!
//! Toolkit for depth-tiled sparse simulation caches (`.bif`) and their
//! conversion into flat, time-sampled point-cache archives.
//!
//! A source file holds one or more structural components (point clouds,
//! voxel fields), each a sparse tree of variably-populated tiles of typed
//! channel data. The converters walk that tree in a fixed order, flatten the
//! per-tile payload into contiguous arrays with freshly assigned point
//! identifiers, and serialize the result as a point-cache archive with a
//! shared time sampling.
//!
//! ## Modules
//!
//! - [`util`] - Error handling, math types (glam re-exports, bounding box)
//! - [`bif`] - Source dataset: format, header inspection, loading, writing
//! - [`convert`] - Traversal, channel lookup, flattening, conversion driver
//! - [`cache`] - Destination archive: time sampling, schema writer/reader
//! - [`geo`] - Geometry-detail output path (points + attributes)
//! - [`render`] - Renderer-procedural argument block
//!
//! ## Example
//!
//! ```ignore
//! use bifcache::convert::{convert_file, ConvertOptions};
//!
//! let summary = convert_file(&ConvertOptions::new("sim.bif", "sim.bifcache"))?;
//! println!("{} components written", summary.written_count());
//! ```

pub mod bif;
pub mod cache;
pub mod convert;
pub mod geo;
pub mod render;
pub mod util;

// Re-export commonly used types
pub use util::{BBox3f, Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bif::{read_header, Component, ComponentType, DataType, FileIo, Layout, State, TileData, TreeIndex};
    pub use crate::cache::{CacheArchive, CacheFile, PointsSample, PointsSchema, TimeSampling};
    pub use crate::convert::{convert_file, ChannelNames, ConvertOptions, TileWalk};
    pub use crate::util::{BBox3f, Error, Result};
}
