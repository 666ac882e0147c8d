//! bifvoxelinfo - Walk the voxel components of a `.bif` file and print what
//! each channel stores per tile.

use std::env;
use std::process::ExitCode;

use bifcache::bif::{Component, FileIo, TileData, TreeIndex};
use bifcache::convert::TileWalk;

fn print_help() {
    println!("bifvoxelinfo - dump voxel component tile data of a .bif file");
    println!();
    println!("USAGE:");
    println!("    bifvoxelinfo <file>");
}

/// One-line summary of a tile's payload, dispatched over the full closed set
/// of channel types.
fn describe_tile(tile: &TileData) -> String {
    fn minmax(values: &[f32]) -> String {
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        format!("min {min} max {max}")
    }

    let type_name = tile.data_type().name();
    let count = tile.len();
    match tile {
        TileData::None => format!("{type_name}"),
        TileData::Float(v) if !v.is_empty() => format!("{type_name} count {count} ({})", minmax(v)),
        TileData::Float(_)
        | TileData::FloatV2(_)
        | TileData::FloatV3(_)
        | TileData::FloatV4(_)
        | TileData::Int32(_)
        | TileData::Int64(_)
        | TileData::UInt32(_)
        | TileData::UInt64(_)
        | TileData::Int32V2(_)
        | TileData::Int32V3(_)
        | TileData::FloatMat44(_)
        | TileData::Int8(_)
        | TileData::Int16(_)
        | TileData::UInt8(_)
        | TileData::UInt16(_)
        | TileData::Bool(_)
        | TileData::UInt64V2(_)
        | TileData::UInt64V3(_)
        | TileData::UInt64V4(_) => format!("{type_name} count {count}"),
        TileData::String(v) => format!("{type_name} count {count} ({} bytes)", v.iter().map(String::len).sum::<usize>()),
        TileData::StringArray(v) => format!("{type_name} count {count} ({} strings)", v.iter().map(Vec::len).sum::<usize>()),
        TileData::Dictionary(_) => format!("{type_name} count {count}"),
    }
}

fn process_voxel_component(component: &Component) {
    println!("component \"{}\" voxel channels: {}", component.name(), component.channels().len());

    let layout = component.layout();
    for channel in component.channels() {
        println!(
            "  channel \"{}\" type {} total elements {}",
            channel.name(),
            channel.data_type(),
            channel.total_element_count()
        );
        for depth in 0..layout.depth_count() {
            let dim = layout.tile_dim_info(depth);
            println!(
                "    depth {depth}: tileSize = {}, tileWidth = {}, depthWidth = {}, voxelWidth = {}",
                dim.tile_size, dim.tile_width, dim.depth_width, dim.voxel_width
            );
        }
        for tindex in TileWalk::new(layout) {
            let tile = channel.tile_data(tindex);
            if tile.is_empty() {
                continue;
            }
            let TreeIndex { tile: t, depth: d } = tindex;
            println!("    tile[{t}][{d}]: {}", describe_tile(tile));
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let input = match args.as_slice() {
        [file] if file != "--help" && file != "-h" => file.clone(),
        _ => {
            print_help();
            return ExitCode::FAILURE;
        }
    };

    let state = match FileIo::open(&input).and_then(|f| f.load()) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    for component in state.components() {
        println!(
            "component \"{}\" of type {}",
            component.name(),
            component.component_type().name()
        );
        if component.component_type() == bifcache::bif::ComponentType::Voxel {
            process_voxel_component(component);
        }
    }
    ExitCode::SUCCESS
}
