//! `.bif` file writer.
//!
//! Serializes a [`State`] plus header metadata back to the on-disk layout in
//! [`format`](super::format). Used by the test fixtures and by tools that
//! need to re-emit a loaded state.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::util::Result;

use super::format::{BIF_MAGIC, CURRENT_VERSION};
use super::header::FileInfo;
use super::state::{Channel, Component, State};
use super::tile::TileData;

/// Write header metadata and a state to `path`.
pub fn write_file(path: impl AsRef<Path>, info: &FileInfo, state: &State) -> Result<()> {
    for component in state.components() {
        for channel in component.channels() {
            channel.check_shape(component.layout())?;
        }
    }

    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    write_header(&mut w, info)?;
    write_body(&mut w, state)?;
    w.flush()?;
    Ok(())
}

fn write_string<W: Write>(w: &mut W, s: &str) -> Result<()> {
    w.write_u32::<LittleEndian>(s.len() as u32)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

fn write_header<W: Write>(w: &mut W, info: &FileInfo) -> Result<()> {
    w.write_all(BIF_MAGIC)?;
    w.write_u32::<LittleEndian>(CURRENT_VERSION)?;
    w.write_i32::<LittleEndian>(info.frame)?;
    write_string(w, &info.object_name)?;
    write_string(w, &info.layout_name)?;
    write_string(w, &info.component_name)?;
    w.write_u8(info.component_type.tag())?;

    w.write_u32::<LittleEndian>(info.channels.len() as u32)?;
    for ch in &info.channels {
        write_string(w, &ch.name)?;
        w.write_u32::<LittleEndian>(ch.data_type.tag())?;
        w.write_u32::<LittleEndian>(ch.max_depth)?;
        w.write_u64::<LittleEndian>(ch.tile_count)?;
        w.write_u64::<LittleEndian>(ch.element_count)?;
    }
    Ok(())
}

fn write_body<W: Write>(w: &mut W, state: &State) -> Result<()> {
    w.write_u32::<LittleEndian>(state.components().len() as u32)?;
    for component in state.components() {
        write_component(w, component)?;
    }
    Ok(())
}

fn write_component<W: Write>(w: &mut W, component: &Component) -> Result<()> {
    write_string(w, component.name())?;
    w.write_u8(component.component_type().tag())?;

    let layout = component.layout();
    w.write_u32::<LittleEndian>(layout.depth_count() as u32)?;
    for depth in 0..layout.depth_count() {
        let dim = layout.tile_dim_info(depth);
        w.write_u64::<LittleEndian>(layout.tile_count(depth) as u64)?;
        w.write_u32::<LittleEndian>(dim.tile_size)?;
        w.write_f32::<LittleEndian>(dim.tile_width)?;
        w.write_f32::<LittleEndian>(dim.depth_width)?;
        w.write_f32::<LittleEndian>(dim.voxel_width)?;
    }

    w.write_u32::<LittleEndian>(component.channels().len() as u32)?;
    for channel in component.channels() {
        write_channel(w, channel)?;
    }
    Ok(())
}

fn write_channel<W: Write>(w: &mut W, channel: &Channel) -> Result<()> {
    write_string(w, channel.name())?;
    w.write_u32::<LittleEndian>(channel.data_type().tag())?;
    for depth_tiles in channel.tiles() {
        for tile in depth_tiles {
            write_tile_data(w, tile)?;
        }
    }
    Ok(())
}

/// Encode one tile's payload. The single dispatch point over the closed
/// [`TileData`] set on the write side.
fn write_tile_data<W: Write>(w: &mut W, tile: &TileData) -> Result<()> {
    w.write_u64::<LittleEndian>(tile.len() as u64)?;
    match tile {
        TileData::None => {}
        TileData::Float(v) => {
            for &x in v {
                w.write_f32::<LittleEndian>(x)?;
            }
        }
        TileData::FloatV2(v) => {
            for p in v {
                for x in p.to_array() {
                    w.write_f32::<LittleEndian>(x)?;
                }
            }
        }
        TileData::FloatV3(v) => {
            for p in v {
                for x in p.to_array() {
                    w.write_f32::<LittleEndian>(x)?;
                }
            }
        }
        TileData::FloatV4(v) => {
            for p in v {
                for x in p.to_array() {
                    w.write_f32::<LittleEndian>(x)?;
                }
            }
        }
        TileData::Int32(v) => {
            for &x in v {
                w.write_i32::<LittleEndian>(x)?;
            }
        }
        TileData::Int64(v) => {
            for &x in v {
                w.write_i64::<LittleEndian>(x)?;
            }
        }
        TileData::UInt32(v) => {
            for &x in v {
                w.write_u32::<LittleEndian>(x)?;
            }
        }
        TileData::UInt64(v) => {
            for &x in v {
                w.write_u64::<LittleEndian>(x)?;
            }
        }
        TileData::Int32V2(v) => {
            for p in v {
                for x in p.to_array() {
                    w.write_i32::<LittleEndian>(x)?;
                }
            }
        }
        TileData::Int32V3(v) => {
            for p in v {
                for x in p.to_array() {
                    w.write_i32::<LittleEndian>(x)?;
                }
            }
        }
        TileData::FloatMat44(v) => {
            for m in v {
                for x in m.to_cols_array() {
                    w.write_f32::<LittleEndian>(x)?;
                }
            }
        }
        TileData::Int8(v) => {
            for &x in v {
                w.write_i8(x)?;
            }
        }
        TileData::Int16(v) => {
            for &x in v {
                w.write_i16::<LittleEndian>(x)?;
            }
        }
        TileData::UInt8(v) => w.write_all(v)?,
        TileData::UInt16(v) => {
            for &x in v {
                w.write_u16::<LittleEndian>(x)?;
            }
        }
        TileData::Bool(v) => {
            for &x in v {
                w.write_u8(x as u8)?;
            }
        }
        TileData::String(v) => {
            for s in v {
                write_string(w, s)?;
            }
        }
        TileData::Dictionary(v) => {
            for d in v {
                write_string(w, &serde_json::to_string(d)?)?;
            }
        }
        TileData::UInt64V2(v) => {
            for p in v {
                for x in p.to_array() {
                    w.write_u64::<LittleEndian>(x)?;
                }
            }
        }
        TileData::UInt64V3(v) => {
            for p in v {
                for x in p.to_array() {
                    w.write_u64::<LittleEndian>(x)?;
                }
            }
        }
        TileData::UInt64V4(v) => {
            for p in v {
                for x in p.to_array() {
                    w.write_u64::<LittleEndian>(x)?;
                }
            }
        }
        TileData::StringArray(v) => {
            for arr in v {
                w.write_u32::<LittleEndian>(arr.len() as u32)?;
                for s in arr {
                    write_string(w, s)?;
                }
            }
        }
    }
    Ok(())
}
