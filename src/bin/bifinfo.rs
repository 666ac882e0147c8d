//! bifinfo - Inspect a `.bif` file's header and optionally its bounds.

use std::env;
use std::process::ExitCode;

use bifcache::bif::{read_header, ComponentType, FileIo};
use bifcache::convert::{component_bounds, BoundsMode, ChannelNames};

fn print_help() {
    println!("bifinfo - print header metadata of a .bif file");
    println!();
    println!("USAGE:");
    println!("    bifinfo [OPTIONS] <file>");
    println!();
    println!("OPTIONS:");
    println!("    --bbox <0|1|2>   Analyze the entire file to obtain the overall bounding box");
    println!("                     [0:None, 1:PointsOnly, 2:PointsWithVelocity]");
    println!("    --fps <float>    Frames per second to scale velocity when determining the");
    println!("                     velocity-attenuated bounding box. Defaults to 24.0");
    println!("    --help           Produce help message");
}

struct Args {
    input: String,
    bbox: BoundsMode,
    fps: f32,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut input = None;
    let mut bbox = BoundsMode::None;
    let mut fps = 24.0f32;

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--bbox" => {
                let v = it.next().ok_or("missing value for --bbox")?;
                let tag: u32 = v.parse().map_err(|_| format!("invalid bbox mode \"{v}\""))?;
                bbox = BoundsMode::from_tag(tag).ok_or_else(|| format!("invalid bbox mode {tag}"))?;
            }
            "--fps" => {
                let v = it.next().ok_or("missing value for --fps")?;
                fps = v.parse().map_err(|_| format!("invalid fps value \"{v}\""))?;
            }
            "--help" | "-h" => return Err(String::new()),
            other if other.starts_with('-') => return Err(format!("unknown option \"{other}\"")),
            file => {
                if input.replace(file.to_string()).is_some() {
                    return Err("expected exactly one input file".into());
                }
            }
        }
    }

    Ok(Args {
        input: input.ok_or("missing input file")?,
        bbox,
        fps,
    })
}

fn run(args: &Args) -> bifcache::Result<bool> {
    let info = read_header(&args.input)?;

    println!("Version        : {}", info.version);
    println!("Frame          : {}", info.frame);
    println!("Channel count  : {}", info.channel_count());
    println!("Component name : {}", info.component_name);
    println!("Component type : {}", info.component_type.name());
    println!("Component class: {:?}", info.component_class());
    println!("Object name    : {}", info.object_name);
    println!("Layout name    : {}", info.layout_name);

    for channel in &info.channels {
        println!();
        println!("        Channel name  : {}", channel.name);
        println!("        Data type     : {}", channel.data_type);
        println!("        Max depth     : {}", channel.max_depth);
        println!("        Tile count    : {}", channel.tile_count);
        println!("        Element count : {}", channel.element_count);
    }

    if args.bbox == BoundsMode::None {
        return Ok(true);
    }

    // Bound analysis needs the entire file's content.
    let state = FileIo::open(&args.input)?.load()?;
    if !state.valid() {
        return Err(bifcache::Error::InvalidState(args.input.clone().into()));
    }

    let names = ChannelNames::default();
    let mut analyzed = false;
    for component in state.components() {
        if component.component_type() != ComponentType::Point {
            continue;
        }
        match component_bounds(component, &names, args.bbox, args.fps) {
            Ok(bounds) => {
                println!();
                println!("Component      : {}", component.name());
                println!("Bounds mode    : {}", args.bbox);
                println!("Bounds         : {bounds}");
                analyzed = true;
            }
            Err(e) if e.is_component_local() => {
                eprintln!("{}: {e}", component.name());
            }
            Err(e) => return Err(e),
        }
    }
    Ok(analyzed || args.bbox == BoundsMode::None)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("error: {msg}");
                eprintln!();
            }
            print_help();
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
