//! bif2cache - Convert a `.bif` simulation cache into a point-cache archive.

use std::env;
use std::process::ExitCode;

use bifcache::convert::{convert_file, ComponentOutcome, ConvertOptions};

fn print_help() {
    println!("bif2cache - convert a .bif simulation cache to a point-cache archive");
    println!();
    println!("USAGE:");
    println!("    bif2cache --bif <file> --cache <file> [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --bif <file>         Source .bif file. [Required]");
    println!("    --cache <file>       Destination archive file. [Required]");
    println!("    --fps <float>        Frames per second for the time sampling. Defaults to 24.0");
    println!("    --position <name>    Position channel name. Defaults to 'position'");
    println!("    --velocity <name>    Velocity channel name. Defaults to 'velocity'");
    println!("    --density <name>     Density channel name. Defaults to 'density'");
    println!("    --vorticity <name>   Vorticity channel name. Defaults to 'vorticity'");
    println!("    --droplet <name>     Droplet channel name. Defaults to 'droplet'");
    println!("    --help               Produce help message");
}

fn parse_args(args: &[String]) -> Result<ConvertOptions, String> {
    let mut source = None;
    let mut destination = None;
    let mut opts = ConvertOptions::new("", "");

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| {
            it.next()
                .cloned()
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match arg.as_str() {
            "--bif" => source = Some(value("--bif")?),
            "--cache" => destination = Some(value("--cache")?),
            "--fps" => {
                let v = value("--fps")?;
                opts.fps = v.parse().map_err(|_| format!("invalid fps value \"{v}\""))?;
            }
            "--position" => opts.names.position = value("--position")?,
            "--velocity" => opts.names.velocity = value("--velocity")?,
            "--density" => opts.names.density = value("--density")?,
            "--vorticity" => opts.names.vorticity = value("--vorticity")?,
            "--droplet" => opts.names.droplet = value("--droplet")?,
            "--help" | "-h" => return Err(String::new()),
            other => return Err(format!("unknown option \"{other}\"")),
        }
    }

    let source = source.ok_or("missing required --bif argument")?;
    let destination = destination.ok_or("missing required --cache argument")?;
    opts.source = source.into();
    opts.destination = destination.into();
    Ok(opts)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(opts) => opts,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("error: {msg}");
                eprintln!();
            }
            print_help();
            return ExitCode::FAILURE;
        }
    };

    let summary = match convert_file(&opts) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    for outcome in &summary.outcomes {
        match outcome {
            ComponentOutcome::Written { name, point_count } => {
                println!("{name}: {point_count} points written");
            }
            ComponentOutcome::Skipped { name, reason } => {
                println!("{name}: skipped ({reason})");
            }
            ComponentOutcome::Rejected { name, error } => {
                eprintln!("{name}: rejected ({error})");
            }
        }
    }

    if !summary.anything_written() {
        eprintln!("error: no components written to \"{}\"", opts.destination.display());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
