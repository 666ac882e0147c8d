//! Point-component import into a geometry detail.

use tracing::debug;

use crate::bif::{Component, DataType};
use crate::convert::{require_channel, ChannelNames, TileWalk};
use crate::util::{Error, Result};

use super::detail::{AttribData, Detail};

/// Name of the per-point velocity attribute written into the detail.
pub const VELOCITY_ATTRIB: &str = "v";

/// Flatten one point component into a detail: positions as points, velocity
/// as a per-point attribute.
///
/// Same traversal contract as the archive path: empty position tiles are
/// sparse holes, and any per-tile count disagreement between position and
/// velocity rejects the component.
pub fn import_points(
    detail: &mut Detail,
    component: &Component,
    names: &ChannelNames,
) -> Result<usize> {
    let position = require_channel(component, &names.position, DataType::FloatV3)?;
    let velocity = require_channel(component, &names.velocity, DataType::FloatV3)?;

    let mut velocities = Vec::new();
    let mut added = 0usize;

    for tindex in TileWalk::new(component.layout()) {
        let count = position.element_count(tindex);
        if count == 0 {
            // nothing there
            continue;
        }
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

        let tile_positions = position
            .tile_data(tindex)
            .as_vec3()
            .ok_or_else(|| Error::invalid("position payload does not match its declared type"))?;
        let tile_velocities = velocity
            .tile_data(tindex)
            .as_vec3()
            .ok_or_else(|| Error::invalid("velocity payload does not match its declared type"))?;

        for &p in tile_positions {
            detail.add_point(p);
            added += 1;
        }
        velocities.extend_from_slice(tile_velocities);
    }

    detail.add_point_attrib(VELOCITY_ATTRIB, AttribData::FloatV3(velocities))?;
    debug!(component = component.name(), points = added, "imported point component");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bif::{Channel, ComponentType, Layout, TileData, TreeIndex};
    use crate::util::Vec3;

    #[test]
    fn test_import_points() {
        let layout = Layout::with_tile_counts(&[2]);
        let mut comp = Component::new("liquid", ComponentType::Point, layout.clone());

        let mut position = Channel::new("position", DataType::FloatV3, &layout);
        position.set_tile_data(TreeIndex::new(1, 0), TileData::FloatV3(vec![Vec3::ONE; 3]));
        let mut velocity = Channel::new("velocity", DataType::FloatV3, &layout);
        velocity.set_tile_data(TreeIndex::new(1, 0), TileData::FloatV3(vec![Vec3::X; 3]));
        comp.add_channel(position).unwrap();
        comp.add_channel(velocity).unwrap();

        let mut detail = Detail::new();
        let added = import_points(&mut detail, &comp, &ChannelNames::default()).unwrap();
        assert_eq!(added, 3);
        assert_eq!(detail.point_count(), 3);
        assert_eq!(
            detail.point_attrib(VELOCITY_ATTRIB).unwrap().as_vec3().unwrap(),
            &[Vec3::X; 3]
        );
    }

    #[test]
    fn test_import_rejects_mismatch() {
        let layout = Layout::with_tile_counts(&[1]);
        let mut comp = Component::new("liquid", ComponentType::Point, layout.clone());

        let mut position = Channel::new("position", DataType::FloatV3, &layout);
        position.set_tile_data(TreeIndex::new(0, 0), TileData::FloatV3(vec![Vec3::ZERO; 2]));
        let mut velocity = Channel::new("velocity", DataType::FloatV3, &layout);
        velocity.set_tile_data(TreeIndex::new(0, 0), TileData::FloatV3(vec![Vec3::ZERO; 1]));
        comp.add_channel(position).unwrap();
        comp.add_channel(velocity).unwrap();

        let mut detail = Detail::new();
        let err = import_points(&mut detail, &comp, &ChannelNames::default()).unwrap_err();
        assert!(matches!(err, Error::CountMismatch { .. }));
    }
}
