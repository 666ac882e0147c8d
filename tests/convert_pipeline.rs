//! End-to-end conversion tests: synthetic .bif files through the full
//! flatten-and-write pipeline.

use bifcache::bif::{
    self, Channel, Component, ComponentType, DataType, FileInfo, Layout, State, TileData, TreeIndex,
};
use bifcache::cache::{CacheFile, GeometryScope, TimeSampling, TimeSamplingType};
use bifcache::convert::{convert_file, ComponentOutcome, ConvertOptions};
use bifcache::util::Vec3;

fn write_state(dir: &tempfile::TempDir, name: &str, state: &State) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let info = FileInfo::from_state("bifrostLiquid1", "mainLayout", 1, state);
    bif::writer::write_file(&path, &info, state).unwrap();
    path
}

/// Point component with the given per-tile position payload; velocity and
/// density channels shaped to match.
fn point_component(name: &str, layout: Layout, tiles: &[(usize, usize, Vec<Vec3>)]) -> Component {
    let mut comp = Component::new(name, ComponentType::Point, layout.clone());
    let mut position = Channel::new("position", DataType::FloatV3, &layout);
    let mut velocity = Channel::new("velocity", DataType::FloatV3, &layout);
    let mut density = Channel::new("density", DataType::Float, &layout);

    for (tile, depth, positions) in tiles {
        let tindex = TreeIndex::new(*tile, *depth);
        let count = positions.len();
        position.set_tile_data(tindex, TileData::FloatV3(positions.clone()));
        velocity.set_tile_data(tindex, TileData::FloatV3(vec![Vec3::new(0.0, 1.0, 0.0); count]));
        density.set_tile_data(tindex, TileData::Float(vec![0.25; count]));
    }

    comp.add_channel(position).unwrap();
    comp.add_channel(velocity).unwrap();
    comp.add_channel(density).unwrap();
    comp
}

#[test]
fn converts_sparse_point_component() {
    let dir = tempfile::tempdir().unwrap();

    // Two depths; depth 0 has one tile with 3 points, depth 1 has one tile
    // with no payload at all.
    let layout = Layout::with_tile_counts(&[1, 1]);
    let comp = point_component(
        "liquidParticles",
        layout,
        &[(
            0,
            0,
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
        )],
    );
    let source = write_state(&dir, "scene.bif", &State::new(vec![comp]));

    let destination = dir.path().join("scene.bifcache");
    let opts = ConvertOptions::new(&source, &destination);
    let summary = convert_file(&opts).unwrap();
    assert_eq!(summary.written_count(), 1);

    let archive = CacheFile::open(&destination).unwrap();
    assert_eq!(archive.top_name, "bif2cache");
    assert_eq!(archive.schemas.len(), 1);

    let schema = archive.schema("liquidParticles").unwrap();
    assert_eq!(schema.point_count, 3);
    assert_eq!(
        schema.positions().unwrap(),
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    );
    assert_eq!(schema.ids().unwrap(), &[0, 1, 2]);
    assert_eq!(schema.bounds.min, Vec3::new(0.0, 0.0, 0.0));
    assert_eq!(schema.bounds.max, Vec3::new(1.0, 1.0, 0.0));

    // One shared uniform time axis at the default frame rate.
    let ts = archive.time_samplings[schema.time_sampling_index as usize];
    assert_eq!(
        ts,
        TimeSampling::uniform(1.0 / 24.0, 0.0),
    );
    assert!(matches!(ts.sampling_type, TimeSamplingType::Uniform { .. }));

    // Auxiliary arrays are tagged varying and cover every point.
    let velocities = schema.property(".velocities").unwrap();
    assert_eq!(velocities.scope, GeometryScope::Varying);
    assert_eq!(velocities.data.len(), 3);
    let densities = schema.property("densities").unwrap();
    assert_eq!(densities.scope, GeometryScope::Varying);
    assert_eq!(densities.data.as_f32().unwrap(), &[0.25; 3]);
}

#[test]
fn rejects_component_on_tile_count_mismatch() {
    let dir = tempfile::tempdir().unwrap();

    // Position reports 5 elements in its one populated tile, velocity 4.
    let layout = Layout::with_tile_counts(&[1]);
    let mut comp = Component::new("liquidParticles", ComponentType::Point, layout.clone());
    let mut position = Channel::new("position", DataType::FloatV3, &layout);
    position.set_tile_data(TreeIndex::new(0, 0), TileData::FloatV3(vec![Vec3::ONE; 5]));
    let mut velocity = Channel::new("velocity", DataType::FloatV3, &layout);
    velocity.set_tile_data(TreeIndex::new(0, 0), TileData::FloatV3(vec![Vec3::ONE; 4]));
    let mut density = Channel::new("density", DataType::Float, &layout);
    density.set_tile_data(TreeIndex::new(0, 0), TileData::Float(vec![1.0; 5]));
    comp.add_channel(position).unwrap();
    comp.add_channel(velocity).unwrap();
    comp.add_channel(density).unwrap();

    let source = write_state(&dir, "bad.bif", &State::new(vec![comp]));
    let destination = dir.path().join("bad.bifcache");

    let summary = convert_file(&ConvertOptions::new(&source, &destination)).unwrap();
    assert!(!summary.anything_written());

    match &summary.outcomes[0] {
        ComponentOutcome::Rejected { error, .. } => {
            let msg = error.to_string();
            assert!(msg.contains("position[5]"), "diagnostic must name both counts: {msg}");
            assert!(msg.contains("velocity[4]"), "diagnostic must name both counts: {msg}");
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    // The archive exists but holds no schema for the rejected component.
    let archive = CacheFile::open(&destination).unwrap();
    assert!(archive.schemas.is_empty());
}

#[test]
fn rejection_keeps_other_components() {
    let dir = tempfile::tempdir().unwrap();

    let good_layout = Layout::with_tile_counts(&[1]);
    let good = point_component(
        "liquidParticles",
        good_layout,
        &[(0, 0, vec![Vec3::ZERO, Vec3::ONE])],
    );

    let bad_layout = Layout::with_tile_counts(&[1]);
    let mut bad = Component::new("foamParticles", ComponentType::Point, bad_layout.clone());
    let mut position = Channel::new("position", DataType::FloatV3, &bad_layout);
    position.set_tile_data(TreeIndex::new(0, 0), TileData::FloatV3(vec![Vec3::ZERO; 2]));
    let mut velocity = Channel::new("velocity", DataType::FloatV3, &bad_layout);
    velocity.set_tile_data(TreeIndex::new(0, 0), TileData::FloatV3(vec![Vec3::ZERO; 1]));
    bad.add_channel(position).unwrap();
    bad.add_channel(velocity).unwrap();
    bad.add_channel(Channel::new("density", DataType::Float, &bad_layout)).unwrap();

    let source = write_state(&dir, "mixed.bif", &State::new(vec![bad, good]));
    let destination = dir.path().join("mixed.bifcache");

    let summary = convert_file(&ConvertOptions::new(&source, &destination)).unwrap();
    assert_eq!(summary.written_count(), 1);
    assert!(matches!(summary.outcomes[0], ComponentOutcome::Rejected { .. }));

    let archive = CacheFile::open(&destination).unwrap();
    assert!(archive.schema("liquidParticles").is_some());
    assert!(archive.schema("foamParticles").is_none());
}

#[test]
fn skips_non_point_and_incomplete_components() {
    let dir = tempfile::tempdir().unwrap();

    let voxel_layout = Layout::with_tile_counts(&[1]);
    let mut voxel = Component::new("voxelField", ComponentType::Voxel, voxel_layout.clone());
    voxel.add_channel(Channel::new("distance", DataType::Float, &voxel_layout)).unwrap();

    // Point component missing the density channel entirely.
    let sparse_layout = Layout::with_tile_counts(&[1]);
    let mut incomplete = Component::new("mistParticles", ComponentType::Point, sparse_layout.clone());
    incomplete
        .add_channel(Channel::new("position", DataType::FloatV3, &sparse_layout))
        .unwrap();
    incomplete
        .add_channel(Channel::new("velocity", DataType::FloatV3, &sparse_layout))
        .unwrap();

    let good = point_component(
        "liquidParticles",
        Layout::with_tile_counts(&[1]),
        &[(0, 0, vec![Vec3::ONE])],
    );

    let source = write_state(&dir, "zoo.bif", &State::new(vec![voxel, incomplete, good]));
    let destination = dir.path().join("zoo.bifcache");

    let summary = convert_file(&ConvertOptions::new(&source, &destination)).unwrap();
    assert_eq!(summary.written_count(), 1);
    assert_eq!(summary.outcomes.len(), 3);
    assert!(matches!(summary.outcomes[0], ComponentOutcome::Skipped { .. }));
    assert!(matches!(summary.outcomes[1], ComponentOutcome::Skipped { .. }));
    assert!(matches!(summary.outcomes[2], ComponentOutcome::Written { .. }));
}

#[test]
fn channel_name_overrides() {
    let dir = tempfile::tempdir().unwrap();

    let layout = Layout::with_tile_counts(&[1]);
    let mut comp = Component::new("liquidParticles", ComponentType::Point, layout.clone());
    for (name, dt) in [
        ("P", DataType::FloatV3),
        ("vel", DataType::FloatV3),
        ("rho", DataType::Float),
    ] {
        let mut ch = Channel::new(name, dt, &layout);
        ch.set_tile_data(
            TreeIndex::new(0, 0),
            match dt {
                DataType::FloatV3 => TileData::FloatV3(vec![Vec3::ONE; 2]),
                _ => TileData::Float(vec![0.5; 2]),
            },
        );
        comp.add_channel(ch).unwrap();
    }

    let source = write_state(&dir, "renamed.bif", &State::new(vec![comp]));
    let destination = dir.path().join("renamed.bifcache");

    let mut opts = ConvertOptions::new(&source, &destination);
    opts.names.position = "P".into();
    opts.names.velocity = "vel".into();
    opts.names.density = "rho".into();

    let summary = convert_file(&opts).unwrap();
    assert_eq!(summary.written_count(), 1);
}
