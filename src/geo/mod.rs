//! Geometry-detail output path: point components flattened into an
//! append-only vertex/attribute container instead of a cache archive.

mod detail;
mod import;

pub use detail::{AttribData, Detail};
pub use import::{import_points, VELOCITY_ATTRIB};
