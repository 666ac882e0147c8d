//! Source dataset support: the depth-tiled sparse `.bif` cache format.
//!
//! A file holds one or more structural components (point clouds, voxel
//! fields). Each component owns a [`Layout`] describing the sparse tree
//! shape and a set of typed [`Channel`]s populated per tile. Payload is
//! addressed exclusively through [`TreeIndex`] coordinates.

pub mod format;
pub mod writer;

pub(crate) mod io;

mod data_type;
mod header;
mod reader;
mod state;
mod tile;

pub use data_type::DataType;
pub use header::{ChannelInfo, ComponentClass, FileInfo};
pub use reader::{read_header, FileIo};
pub use state::{Channel, Component, ComponentType, DepthInfo, Layout, State};
pub use tile::{TileData, TileDimInfo, TreeIndex};
