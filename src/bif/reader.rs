//! `.bif` file reader: header-only inspection and full state loading.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::debug;

use crate::util::{Error, Result};

use super::header::{parse_file_info, FileInfo};
use super::io::Cursor;
use super::state::{Channel, Component, ComponentType, DepthInfo, Layout, State};
use super::tile::{TileData, TileDimInfo};
use super::DataType;

enum FileData {
    /// Memory-mapped file (preferred).
    Mmap(Mmap),
    /// Buffered fallback when mapping fails.
    Buffer(Vec<u8>),
}

impl FileData {
    fn bytes(&self) -> &[u8] {
        match self {
            Self::Mmap(m) => m,
            Self::Buffer(b) => b,
        }
    }
}

/// An opened source dataset.
///
/// Opening parses the header only; [`FileIo::load`] materializes the tree.
/// The handle is never mutated and is discarded after conversion.
pub struct FileIo {
    path: PathBuf,
    data: FileData,
    info: FileInfo,
    body_offset: usize,
}

impl FileIo {
    /// Open a file and parse its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        // Safety: the file is opened read-only and unmapped before drop.
        let data = match unsafe { Mmap::map(&file) } {
            Ok(mmap) => FileData::Mmap(mmap),
            Err(e) => {
                debug!(error = %e, "mmap failed, falling back to buffered read");
                let mut buf = Vec::new();
                let mut file = file;
                file.read_to_end(&mut buf)?;
                FileData::Buffer(buf)
            }
        };

        if data.bytes().len() < super::format::MIN_HEADER_SIZE {
            return Err(Error::invalid(format!(
                "file \"{}\" is too small to hold a header",
                path.display()
            )));
        }

        let mut cur = Cursor::new(data.bytes());
        let info = parse_file_info(&mut cur)?;
        let body_offset = cur.pos();

        Ok(Self {
            path: path.to_path_buf(),
            data,
            info,
            body_offset,
        })
    }

    /// Header metadata, available without loading any tile payload.
    #[inline]
    pub fn info(&self) -> &FileInfo {
        &self.info
    }

    /// Path this dataset was opened from.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte length of the header. Everything past this offset is tile
    /// payload, untouched until [`FileIo::load`].
    #[inline]
    pub fn header_size(&self) -> usize {
        self.body_offset
    }

    /// Load the entire file content into a [`State`].
    pub fn load(&self) -> Result<State> {
        let mut cur = Cursor::new(&self.data.bytes()[self.body_offset..]);

        let component_count = cur.read_u32()? as usize;
        let mut components = Vec::with_capacity(component_count.min(64));
        for _ in 0..component_count {
            components.push(read_component(&mut cur)?);
        }
        debug!(
            path = %self.path.display(),
            components = components.len(),
            "loaded state"
        );
        Ok(State::new(components))
    }
}

/// Read header metadata only: version, frame, names and the channel
/// directory. No tile payload is materialized.
pub fn read_header(path: impl AsRef<Path>) -> Result<FileInfo> {
    Ok(FileIo::open(path)?.info().clone())
}

fn read_component(cur: &mut Cursor<'_>) -> Result<Component> {
    let name = cur.read_string()?;
    let component_type = ComponentType::from_tag(cur.read_u8()?);

    let depth_count = cur.read_u32()? as usize;
    let mut depths = Vec::with_capacity(depth_count.min(64));
    for _ in 0..depth_count {
        let tile_count = cur.read_count(1)?;
        depths.push(DepthInfo {
            tile_count,
            dim: TileDimInfo {
                tile_size: cur.read_u32()?,
                tile_width: cur.read_f32()?,
                depth_width: cur.read_f32()?,
                voxel_width: cur.read_f32()?,
            },
        });
    }
    let layout = Layout::new(depths);

    let channel_count = cur.read_u32()? as usize;
    let mut component = Component::new(name, component_type, layout);
    for _ in 0..channel_count {
        let channel = read_channel(cur, component.layout())?;
        component.add_channel(channel)?;
    }
    Ok(component)
}

fn read_channel(cur: &mut Cursor<'_>, layout: &Layout) -> Result<Channel> {
    let name = cur.read_string()?;
    let tag = cur.read_u32()?;
    let data_type = DataType::from_tag(tag)
        .ok_or_else(|| Error::invalid(format!("unknown data type tag {tag} for channel \"{name}\"")))?;

    let mut tiles = Vec::with_capacity(layout.depth_count());
    for depth in 0..layout.depth_count() {
        let mut depth_tiles = Vec::with_capacity(layout.tile_count(depth));
        for _ in 0..layout.tile_count(depth) {
            depth_tiles.push(read_tile_data(cur, data_type)?);
        }
        tiles.push(depth_tiles);
    }
    Ok(Channel::with_tiles(name, data_type, tiles))
}

/// Decode one tile's payload. The single dispatch point over the closed
/// [`DataType`] set on the read side.
fn read_tile_data(cur: &mut Cursor<'_>, data_type: DataType) -> Result<TileData> {
    let count = cur.read_count(data_type.element_bytes().unwrap_or(1))?;

    macro_rules! pod_tiles {
        ($variant:ident, $read:ident) => {{
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(cur.$read()?);
            }
            TileData::$variant(v)
        }};
        ($variant:ident, $ctor:expr, $read:ident x $n:literal) => {{
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                let mut parts = [Default::default(); $n];
                for p in parts.iter_mut() {
                    *p = cur.$read()?;
                }
                v.push($ctor(parts));
            }
            TileData::$variant(v)
        }};
    }

    Ok(match data_type {
        DataType::None => {
            // No payload follows a None channel's count.
            TileData::None
        }
        DataType::Float => pod_tiles!(Float, read_f32),
        DataType::FloatV2 => pod_tiles!(FloatV2, glam::Vec2::from_array, read_f32 x 2),
        DataType::FloatV3 => pod_tiles!(FloatV3, glam::Vec3::from_array, read_f32 x 3),
        DataType::FloatV4 => pod_tiles!(FloatV4, glam::Vec4::from_array, read_f32 x 4),
        DataType::Int32 => pod_tiles!(Int32, read_i32),
        DataType::Int64 => pod_tiles!(Int64, read_i64),
        DataType::UInt32 => pod_tiles!(UInt32, read_u32),
        DataType::UInt64 => pod_tiles!(UInt64, read_u64),
        DataType::Int32V2 => pod_tiles!(Int32V2, glam::IVec2::from_array, read_i32 x 2),
        DataType::Int32V3 => pod_tiles!(Int32V3, glam::IVec3::from_array, read_i32 x 3),
        DataType::FloatMat44 => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                let mut cols = [0.0f32; 16];
                for c in cols.iter_mut() {
                    *c = cur.read_f32()?;
                }
                v.push(glam::Mat4::from_cols_array(&cols));
            }
            TileData::FloatMat44(v)
        }
        DataType::Int8 => pod_tiles!(Int8, read_i8),
        DataType::Int16 => pod_tiles!(Int16, read_i16),
        DataType::UInt8 => {
            let bytes = cur.read_bytes(count)?;
            TileData::UInt8(bytes.to_vec())
        }
        DataType::UInt16 => pod_tiles!(UInt16, read_u16),
        DataType::Bool => {
            let bytes = cur.read_bytes(count)?;
            TileData::Bool(bytes.iter().map(|&b| b != 0).collect())
        }
        DataType::StringClass => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(cur.read_string()?);
            }
            TileData::String(v)
        }
        DataType::DictionaryClass => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                let json = cur.read_string()?;
                v.push(serde_json::from_str(&json)?);
            }
            TileData::Dictionary(v)
        }
        DataType::UInt64V2 => pod_tiles!(UInt64V2, glam::U64Vec2::from_array, read_u64 x 2),
        DataType::UInt64V3 => pod_tiles!(UInt64V3, glam::U64Vec3::from_array, read_u64 x 3),
        DataType::UInt64V4 => pod_tiles!(UInt64V4, glam::U64Vec4::from_array, read_u64 x 4),
        DataType::StringArrayClass => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                let len = cur.read_u32()? as usize;
                let mut arr = Vec::with_capacity(len.min(1024));
                for _ in 0..len {
                    arr.push(cur.read_string()?);
                }
                v.push(arr);
            }
            TileData::StringArray(v)
        }
    })
}
