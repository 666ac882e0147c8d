//! On-disk format constants for `.bif` files.
//!
//! A file is a header followed by a body. All integers are little-endian and
//! strings are a `u32` byte length followed by UTF-8 bytes.
//!
//! Header (self-contained, never references the body):
//! ```text
//! magic            [u8; 4] = "BIFR"
//! version          u32
//! frame            i32
//! object_name      str
//! layout_name      str
//! component_name   str
//! component_type   u8
//! channel_count    u32
//! channel_count x {
//!     name          str
//!     data_type     u32
//!     max_depth     u32
//!     tile_count    u64
//!     element_count u64
//! }
//! ```
//!
//! Body:
//! ```text
//! component_count  u32
//! component_count x {
//!     name          str
//!     type          u8
//!     depth_count   u32
//!     depth_count x { tile_count u64, tile_size u32,
//!                     tile_width f32, depth_width f32, voxel_width f32 }
//!     channel_count u32
//!     channel_count x {
//!         name      str
//!         data_type u32
//!         for each (depth, tile) in layout order:
//!             count u64, then count elements encoded per data type
//!     }
//! }
//! ```

/// Magic bytes at the start of every `.bif` file.
pub const BIF_MAGIC: &[u8; 4] = b"BIFR";

/// Current file format version.
pub const CURRENT_VERSION: u32 = 2;

/// Minimum byte length of a parseable header (magic + version + frame).
pub const MIN_HEADER_SIZE: usize = 12;
