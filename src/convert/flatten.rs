//! Flatten/accumulate engine: sparse per-tile channels to flat global arrays.

use smallvec::SmallVec;
use tracing::debug;

use crate::bif::{Channel, Component, DataType, TileData};
use crate::cache::ArrayData;
use crate::util::{BBox3f, Error, Result, Vec3};

use super::channels::{find_channel, require_channel};
use super::walker::TileWalk;

/// Channel-name overrides for the roles the point schema needs.
#[derive(Clone, Debug)]
pub struct ChannelNames {
    pub position: String,
    pub velocity: String,
    pub density: String,
    pub vorticity: String,
    pub droplet: String,
}

impl Default for ChannelNames {
    fn default() -> Self {
        Self {
            position: "position".into(),
            velocity: "velocity".into(),
            density: "density".into(),
            vorticity: "vorticity".into(),
            droplet: "droplet".into(),
        }
    }
}

/// One flattened auxiliary buffer, named by its archive property.
#[derive(Clone, Debug)]
pub struct AuxBuffer {
    pub name: String,
    pub data: ArrayData,
}

/// The engine's output: flat buffers, the running bound, and the next free
/// identifier. Returned as a value so traversal has no ambient state.
#[derive(Clone, Debug)]
pub struct FlatPoints {
    pub positions: Vec<Vec3>,
    pub ids: Vec<u64>,
    pub aux: Vec<AuxBuffer>,
    pub bounds: BBox3f,
    pub next_id: u64,
}

impl FlatPoints {
    /// Number of flattened points.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Look up an auxiliary buffer by property name.
    pub fn aux(&self, name: &str) -> Option<&ArrayData> {
        self.aux.iter().find(|a| a.name == name).map(|a| &a.data)
    }

    /// The flattened velocity buffer.
    pub fn velocities(&self) -> Option<&[Vec3]> {
        self.aux(VELOCITIES_PROPERTY).and_then(ArrayData::as_vec3)
    }
}

/// Archive property name for the flattened velocity buffer.
pub const VELOCITIES_PROPERTY: &str = ".velocities";
/// Archive property name for the flattened density buffer.
pub const DENSITIES_PROPERTY: &str = "densities";

struct AuxAccum<'a> {
    channel: &'a Channel,
    property: String,
    data: ArrayData,
}

/// Flatten one point component.
///
/// Position, velocity and density channels are mandatory; a missing or
/// wrong-typed one yields [`Error::ChannelNotFound`] /
/// [`Error::ChannelTypeMismatch`], which callers treat as "skip this
/// component". Vorticity and droplet channels are picked up when present.
///
/// Tiles where the position channel is empty are sparse holes and are
/// skipped without touching any other channel. All channels read at one
/// coordinate must agree on the element count; a disagreement rejects the
/// whole component with [`Error::CountMismatch`].
///
/// Identifiers are assigned 0,1,2,... in traversal order. They are never
/// taken from any identifier stored in the source data.
pub fn flatten_points(component: &Component, names: &ChannelNames) -> Result<FlatPoints> {
    let position = require_channel(component, &names.position, DataType::FloatV3)?;
    let velocity = require_channel(component, &names.velocity, DataType::FloatV3)?;
    let density = require_channel(component, &names.density, DataType::Float)?;

    let mut aux: SmallVec<[AuxAccum<'_>; 4]> = SmallVec::new();
    aux.push(AuxAccum {
        channel: velocity,
        property: VELOCITIES_PROPERTY.into(),
        data: ArrayData::FloatV3(Vec::new()),
    });
    aux.push(AuxAccum {
        channel: density,
        property: DENSITIES_PROPERTY.into(),
        data: ArrayData::Float(Vec::new()),
    });
    // Optional scalar auxiliaries ride along when present.
    for name in [&names.vorticity, &names.droplet] {
        if let Some(channel) = find_channel(component, name, DataType::Float) {
            aux.push(AuxAccum {
                channel,
                property: channel.name().to_string(),
                data: ArrayData::Float(Vec::new()),
            });
        }
    }

    let mut positions = Vec::new();
    let mut ids = Vec::new();
    let mut bounds = BBox3f::EMPTY;
    let mut next_id: u64 = 0;

    for tindex in TileWalk::new(component.layout()) {
        let count = position.element_count(tindex);
        if count == 0 {
            // Sparse hole: nothing there.
            continue;
        }

        for accum in &aux {
            let other = accum.channel.element_count(tindex);
            if other != count {
                return Err(Error::CountMismatch {
                    tile: tindex.tile,
                    depth: tindex.depth,
                    name_a: position.name().to_string(),
                    count_a: count,
                    name_b: accum.channel.name().to_string(),
                    count_b: other,
                });
            }
        }

        let tile_positions = position
            .tile_data(tindex)
            .as_vec3()
            .ok_or_else(|| Error::invalid("position payload does not match its declared type"))?;
        for &p in tile_positions {
            positions.push(p);
            bounds.expand_by_point(p);
            ids.push(next_id);
            next_id += 1;
        }

        for accum in &mut aux {
            append_tile(&mut accum.data, accum.channel.tile_data(tindex))?;
        }
    }

    debug!(
        component = component.name(),
        points = positions.len(),
        aux = aux.len(),
        "flattened point component"
    );

    Ok(FlatPoints {
        positions,
        ids,
        aux: aux
            .into_iter()
            .map(|a| AuxBuffer {
                name: a.property,
                data: a.data,
            })
            .collect(),
        bounds,
        next_id,
    })
}

fn append_tile(dst: &mut ArrayData, src: &TileData) -> Result<()> {
    match (dst, src) {
        (ArrayData::Float(dst), TileData::Float(src)) => dst.extend_from_slice(src),
        (ArrayData::FloatV3(dst), TileData::FloatV3(src)) => dst.extend_from_slice(src),
        _ => return Err(Error::invalid("channel payload does not match its declared type")),
    }
    Ok(())
}

/// Mode selecting how much work the bound computation does.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum BoundsMode {
    #[default]
    None,
    PointsOnly,
    PointsWithVelocity,
}

impl BoundsMode {
    pub fn from_tag(tag: u32) -> Option<Self> {
        Some(match tag {
            0 => Self::None,
            1 => Self::PointsOnly,
            2 => Self::PointsWithVelocity,
            _ => return None,
        })
    }
}

impl std::fmt::Display for BoundsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "None",
            Self::PointsOnly => "Points only",
            Self::PointsWithVelocity => "Points with velocity",
        };
        f.write_str(name)
    }
}

/// Velocity-attenuated bound: the point bound additionally extended, per
/// point, by where the point would land after one frame at its velocity.
///
/// Kept outside the flatten fold on purpose; the engine's own bound is
/// always points-only.
pub fn velocity_expanded_bounds(points: &FlatPoints, fps: f32) -> BBox3f {
    let mut bounds = points.bounds;
    if let Some(velocities) = points.velocities() {
        for (p, v) in points.positions.iter().zip(velocities) {
            bounds.expand_by_point(*p + *v / fps);
        }
    }
    bounds
}

/// Analyze one point component's bound without flattening anything else.
///
/// Only the channels the mode needs are required: position always, velocity
/// only for [`BoundsMode::PointsWithVelocity`]. [`BoundsMode::None`] returns
/// the empty bound.
pub fn component_bounds(
    component: &Component,
    names: &ChannelNames,
    mode: BoundsMode,
    fps: f32,
) -> Result<BBox3f> {
    if mode == BoundsMode::None {
        return Ok(BBox3f::EMPTY);
    }
    let position = require_channel(component, &names.position, DataType::FloatV3)?;
    let velocity = match mode {
        BoundsMode::PointsWithVelocity => {
            Some(require_channel(component, &names.velocity, DataType::FloatV3)?)
        }
        _ => None,
    };

    let mut bounds = BBox3f::EMPTY;
    for tindex in TileWalk::new(component.layout()) {
        let count = position.element_count(tindex);
        if count == 0 {
            continue;
        }
        let tile_positions = position
            .tile_data(tindex)
            .as_vec3()
            .ok_or_else(|| Error::invalid("position payload does not match its declared type"))?;

        match velocity {
            None => {
                for &p in tile_positions {
                    bounds.expand_by_point(p);
                }
            }
            Some(velocity) => {
                let other = velocity.element_count(tindex);
                if other != count {
                    return Err(Error::CountMismatch {
                        tile: tindex.tile,
                        depth: tindex.depth,
                        name_a: position.name().to_string(),
                        count_a: count,
                        name_b: velocity.name().to_string(),
                        count_b: other,
                    });
                }
                let tile_velocities = velocity.tile_data(tindex).as_vec3().ok_or_else(|| {
                    Error::invalid("velocity payload does not match its declared type")
                })?;
                for (&p, &v) in tile_positions.iter().zip(tile_velocities) {
                    bounds.expand_by_point(p);
                    bounds.expand_by_point(p + v / fps);
                }
            }
        }
    }
    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bif::{Channel, ComponentType, Layout, TreeIndex};

    fn point_component(position_counts: &[(usize, usize, usize)]) -> Component {
        // (depth, tile, count) triples; velocity/density shaped to match.
        let max_depth = position_counts.iter().map(|&(d, _, _)| d + 1).max().unwrap_or(1);
        let tiles_per_depth = 2;
        let layout = Layout::with_tile_counts(&vec![tiles_per_depth; max_depth]);

        let mut comp = Component::new("liquid", ComponentType::Point, layout.clone());
        let mut position = Channel::new("position", DataType::FloatV3, &layout);
        let mut velocity = Channel::new("velocity", DataType::FloatV3, &layout);
        let mut density = Channel::new("density", DataType::Float, &layout);

        for &(depth, tile, count) in position_counts {
            let tindex = TreeIndex::new(tile, depth);
            position.set_tile_data(
                tindex,
                TileData::FloatV3((0..count).map(|i| Vec3::splat(i as f32)).collect()),
            );
            velocity.set_tile_data(
                tindex,
                TileData::FloatV3(vec![Vec3::new(1.0, 0.0, 0.0); count]),
            );
            density.set_tile_data(tindex, TileData::Float(vec![0.5; count]));
        }

        comp.add_channel(position).unwrap();
        comp.add_channel(velocity).unwrap();
        comp.add_channel(density).unwrap();
        comp
    }

    #[test]
    fn test_flatten_assigns_monotonic_ids() {
        let comp = point_component(&[(0, 0, 2), (0, 1, 3), (1, 0, 1)]);
        let flat = flatten_points(&comp, &ChannelNames::default()).unwrap();

        assert_eq!(flat.len(), 6);
        assert_eq!(flat.ids, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(flat.next_id, 6);
        assert_eq!(flat.velocities().unwrap().len(), 6);
        assert_eq!(flat.aux(DENSITIES_PROPERTY).unwrap().len(), 6);
    }

    #[test]
    fn test_flatten_preserves_sparsity() {
        // Only one populated tile; the other three are holes.
        let comp = point_component(&[(1, 1, 4)]);
        let flat = flatten_points(&comp, &ChannelNames::default()).unwrap();
        assert_eq!(flat.len(), 4);
        assert_eq!(flat.ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_flatten_empty_component() {
        let comp = point_component(&[]);
        let flat = flatten_points(&comp, &ChannelNames::default()).unwrap();
        assert!(flat.is_empty());
        assert_eq!(flat.next_id, 0);
        assert!(flat.bounds.is_empty());
    }

    #[test]
    fn test_missing_mandatory_channel_is_not_found() {
        let layout = Layout::with_tile_counts(&[1]);
        let mut comp = Component::new("liquid", ComponentType::Point, layout.clone());
        comp.add_channel(Channel::new("position", DataType::FloatV3, &layout)).unwrap();

        let err = flatten_points(&comp, &ChannelNames::default()).unwrap_err();
        assert!(matches!(err, Error::ChannelNotFound(ref name) if name == "velocity"));
    }

    #[test]
    fn test_count_mismatch_rejects_component() {
        let mut comp = point_component(&[(0, 0, 5)]);
        // Truncate the velocity payload in the populated tile.
        let layout = comp.layout().clone();
        let mut velocity = Channel::new("velocity", DataType::FloatV3, &layout);
        velocity.set_tile_data(TreeIndex::new(0, 0), TileData::FloatV3(vec![Vec3::ZERO; 4]));
        comp = {
            let mut rebuilt = Component::new("liquid", ComponentType::Point, layout.clone());
            for ch in comp.channels() {
                if ch.name() == "velocity" {
                    rebuilt.add_channel(velocity.clone()).unwrap();
                } else {
                    rebuilt.add_channel(ch.clone()).unwrap();
                }
            }
            rebuilt
        };

        let err = flatten_points(&comp, &ChannelNames::default()).unwrap_err();
        match err {
            Error::CountMismatch {
                count_a, count_b, ..
            } => {
                assert_eq!(count_a, 5);
                assert_eq!(count_b, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_optional_vorticity_rides_along() {
        let mut comp = point_component(&[(0, 0, 3)]);
        let layout = comp.layout().clone();
        let mut vorticity = Channel::new("vorticity", DataType::Float, &layout);
        vorticity.set_tile_data(TreeIndex::new(0, 0), TileData::Float(vec![1.0, 2.0, 3.0]));
        comp.add_channel(vorticity).unwrap();

        let flat = flatten_points(&comp, &ChannelNames::default()).unwrap();
        assert_eq!(flat.aux("vorticity").unwrap().as_f32().unwrap(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_component_bounds_modes() {
        let comp = point_component(&[(0, 0, 2)]);
        let names = ChannelNames::default();

        assert!(component_bounds(&comp, &names, BoundsMode::None, 24.0).unwrap().is_empty());

        let points_only = component_bounds(&comp, &names, BoundsMode::PointsOnly, 24.0).unwrap();
        assert_eq!(points_only.max, Vec3::ONE);

        // Fixture velocity is +x at 1 unit/s, so the attenuated bound grows
        // by 1/fps along x only.
        let with_velocity =
            component_bounds(&comp, &names, BoundsMode::PointsWithVelocity, 24.0).unwrap();
        assert!((with_velocity.max.x - (1.0 + 1.0 / 24.0)).abs() < 1e-6);
        assert_eq!(with_velocity.max.y, 1.0);
    }

    #[test]
    fn test_velocity_expanded_bounds() {
        let comp = point_component(&[(0, 0, 1)]);
        let flat = flatten_points(&comp, &ChannelNames::default()).unwrap();
        // Single point at origin moving +x at 1 unit/s, 24 fps.
        let bounds = velocity_expanded_bounds(&flat, 24.0);
        assert_eq!(bounds.min, Vec3::ZERO);
        assert!((bounds.max.x - 1.0 / 24.0).abs() < 1e-6);
        // The engine's own bound stays points-only.
        assert_eq!(flat.bounds.max, Vec3::ZERO);
    }
}
