//! Utility types and functions shared across the crate.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam, [`BBox3f`]

mod error;
mod math;

pub use error::*;
pub use math::*;
