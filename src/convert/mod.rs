//! The conversion pipeline: tiled traversal, channel lookup, flattening, and
//! the file-to-file driver.

mod channels;
mod flatten;
mod walker;

pub use channels::{find_channel, require_channel};
pub use flatten::{
    component_bounds, flatten_points, velocity_expanded_bounds, AuxBuffer, BoundsMode,
    ChannelNames, FlatPoints, DENSITIES_PROPERTY, VELOCITIES_PROPERTY,
};
pub use walker::TileWalk;

use std::path::PathBuf;

use tracing::{info, warn};

use crate::bif::{ComponentType, FileIo};
use crate::cache::{
    ArrayProperty, CacheArchive, GeometryScope, PointsSample, PointsSchema, TimeSampling,
};
use crate::util::{Error, Result};

/// Name of the top-level node created in every output archive.
pub const TOP_NODE_NAME: &str = "bif2cache";

/// Options for one source-file to destination-archive conversion.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub names: ChannelNames,
    pub fps: f64,
    pub application: String,
    pub contact: String,
}

impl ConvertOptions {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            names: ChannelNames::default(),
            fps: 24.0,
            application: "bifcache".into(),
            contact: String::new(),
        }
    }
}

/// What happened to one structural component.
#[derive(Debug)]
pub enum ComponentOutcome {
    /// Flattened and committed to the archive.
    Written { name: String, point_count: usize },
    /// No usable data of the requested kind; not an error.
    Skipped { name: String, reason: String },
    /// Component-level data error; the run continued with the rest.
    Rejected { name: String, error: Error },
}

/// Per-run conversion report.
#[derive(Debug, Default)]
pub struct Summary {
    pub outcomes: Vec<ComponentOutcome>,
}

impl Summary {
    /// Number of components committed to the archive.
    pub fn written_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ComponentOutcome::Written { .. }))
            .count()
    }

    /// True when the run produced at least one schema.
    pub fn anything_written(&self) -> bool {
        self.written_count() > 0
    }
}

/// Convert one source file into one destination archive.
///
/// Component-level data errors are reported in the [`Summary`] and do not
/// abort the run; open/load and archive-creation failures do.
pub fn convert_file(opts: &ConvertOptions) -> Result<Summary> {
    let fileio = FileIo::open(&opts.source)?;
    let fileinfo = fileio.info();
    info!(
        source = %opts.source.display(),
        version = fileinfo.version,
        frame = fileinfo.frame,
        component = %fileinfo.component_name,
        class = ?fileinfo.component_class(),
        channels = fileinfo.channel_count(),
        "opened source dataset"
    );

    // The entire file content is needed before any output is produced.
    let state = fileio.load()?;
    if !state.valid() {
        return Err(Error::InvalidState(opts.source.clone()));
    }

    let mut archive = CacheArchive::create(&opts.destination, &opts.application, &opts.contact)?;
    let tsidx = archive.add_time_sampling(TimeSampling::from_fps(opts.fps));
    archive.create_xform(TOP_NODE_NAME)?;

    let mut summary = Summary::default();
    for component in state.components() {
        let name = component.name().to_string();
        if component.component_type() != ComponentType::Point {
            summary.outcomes.push(ComponentOutcome::Skipped {
                name,
                reason: format!("component type {} not converted", component.component_type().name()),
            });
            continue;
        }

        match flatten_points(component, &opts.names) {
            Ok(flat) => {
                let point_count = flat.len();
                let mut sample = PointsSample::new(flat.positions, flat.ids, flat.bounds);
                sample.aux = flat
                    .aux
                    .into_iter()
                    .map(|a| ArrayProperty::new(a.name, GeometryScope::Varying, a.data))
                    .collect();
                archive.commit_points(PointsSchema::new(&name, tsidx, sample))?;
                summary.outcomes.push(ComponentOutcome::Written { name, point_count });
            }
            Err(e) if matches!(e, Error::ChannelNotFound(_) | Error::ChannelTypeMismatch { .. }) => {
                warn!(component = %name, reason = %e, "skipping component");
                summary.outcomes.push(ComponentOutcome::Skipped {
                    name,
                    reason: e.to_string(),
                });
            }
            Err(e) if e.is_component_local() => {
                warn!(component = %name, error = %e, "rejecting component");
                summary.outcomes.push(ComponentOutcome::Rejected { name, error: e });
            }
            Err(e) => return Err(e),
        }
    }

    archive.finish()?;
    info!(
        destination = %opts.destination.display(),
        written = summary.written_count(),
        components = summary.outcomes.len(),
        "conversion finished"
    );
    Ok(summary)
}
