//! In-memory representation of a loaded file: components, layouts, channels.

use crate::util::{Error, Result};

use super::{DataType, TileData, TileDimInfo, TreeIndex};

/// Type tag of a structural component.
///
/// Unrecognized tags are carried as [`ComponentType::Other`] and skipped by
/// the converters, never treated as errors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ComponentType {
    Point,
    Voxel,
    Other(u8),
}

impl ComponentType {
    pub const fn tag(self) -> u8 {
        match self {
            Self::Point => 1,
            Self::Voxel => 2,
            Self::Other(t) => t,
        }
    }

    pub const fn from_tag(tag: u8) -> Self {
        match tag {
            1 => Self::Point,
            2 => Self::Voxel,
            t => Self::Other(t),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::Voxel => "Voxel",
            Self::Other(_) => "Other",
        }
    }
}

/// Shape of the sparse tree for one component: a depth count and, per depth,
/// a tile count plus tile geometry. Read-only after load; shared by every
/// channel of the component.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    depths: Vec<DepthInfo>,
}

#[derive(Clone, Copy, Debug)]
pub struct DepthInfo {
    pub tile_count: usize,
    pub dim: TileDimInfo,
}

impl Layout {
    pub fn new(depths: Vec<DepthInfo>) -> Self {
        Self { depths }
    }

    /// Layout with the given tile counts and default tile geometry.
    pub fn with_tile_counts(tile_counts: &[usize]) -> Self {
        Self {
            depths: tile_counts
                .iter()
                .map(|&tile_count| DepthInfo {
                    tile_count,
                    dim: TileDimInfo::default(),
                })
                .collect(),
        }
    }

    #[inline]
    pub fn depth_count(&self) -> usize {
        self.depths.len()
    }

    /// Number of tiles at the given depth. Zero for depths out of range.
    #[inline]
    pub fn tile_count(&self, depth: usize) -> usize {
        self.depths.get(depth).map_or(0, |d| d.tile_count)
    }

    /// Tile geometry at the given depth.
    pub fn tile_dim_info(&self, depth: usize) -> TileDimInfo {
        self.depths.get(depth).map_or_else(TileDimInfo::default, |d| d.dim)
    }

    /// Total number of tiles across all depths.
    pub fn total_tile_count(&self) -> usize {
        self.depths.iter().map(|d| d.tile_count).sum()
    }

    /// True if `tindex` addresses a leaf that exists in this layout.
    pub fn contains(&self, tindex: TreeIndex) -> bool {
        tindex.tile < self.tile_count(tindex.depth)
    }
}

/// A named, typed data stream attached to a component, populated sparsely
/// across tiles.
#[derive(Clone, Debug)]
pub struct Channel {
    name: String,
    data_type: DataType,
    /// Payload indexed `[depth][tile]`, shape identical to the layout.
    tiles: Vec<Vec<TileData>>,
}

impl Channel {
    /// Create a channel whose tiles are all empty, shaped after `layout`.
    pub fn new(name: impl Into<String>, data_type: DataType, layout: &Layout) -> Self {
        let tiles = (0..layout.depth_count())
            .map(|d| (0..layout.tile_count(d)).map(|_| TileData::empty(data_type)).collect())
            .collect();
        Self { name: name.into(), data_type, tiles }
    }

    /// Create a channel from pre-built per-tile payload.
    pub fn with_tiles(
        name: impl Into<String>,
        data_type: DataType,
        tiles: Vec<Vec<TileData>>,
    ) -> Self {
        Self { name: name.into(), data_type, tiles }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Payload at one tile coordinate.
    ///
    /// Coordinates outside the layout yield a shared empty payload, mirroring
    /// "tile exists" and "tile has payload" being independent facts.
    pub fn tile_data(&self, tindex: TreeIndex) -> &TileData {
        static EMPTY: TileData = TileData::None;
        self.tiles
            .get(tindex.depth)
            .and_then(|d| d.get(tindex.tile))
            .unwrap_or(&EMPTY)
    }

    /// Element count at one tile coordinate.
    #[inline]
    pub fn element_count(&self, tindex: TreeIndex) -> usize {
        self.tile_data(tindex).len()
    }

    /// Total element count across all tiles.
    pub fn total_element_count(&self) -> usize {
        self.tiles.iter().flatten().map(TileData::len).sum()
    }

    /// Replace the payload of one tile. Panics if the coordinate is outside
    /// the channel's shape; used when building fixture states.
    pub fn set_tile_data(&mut self, tindex: TreeIndex, data: TileData) {
        self.tiles[tindex.depth][tindex.tile] = data;
    }

    /// Check the channel's shape against a layout.
    pub(crate) fn check_shape(&self, layout: &Layout) -> Result<()> {
        let ok = self.tiles.len() == layout.depth_count()
            && self
                .tiles
                .iter()
                .enumerate()
                .all(|(d, tiles)| tiles.len() == layout.tile_count(d));
        if ok {
            Ok(())
        } else {
            Err(Error::invalid(format!(
                "channel \"{}\" does not match its component layout",
                self.name
            )))
        }
    }

    pub(crate) fn tiles(&self) -> &[Vec<TileData>] {
        &self.tiles
    }
}

/// One named, typed substructure of a loaded state.
#[derive(Clone, Debug)]
pub struct Component {
    name: String,
    component_type: ComponentType,
    layout: Layout,
    channels: Vec<Channel>,
}

impl Component {
    pub fn new(name: impl Into<String>, component_type: ComponentType, layout: Layout) -> Self {
        Self {
            name: name.into(),
            component_type,
            layout,
            channels: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[inline]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Attach a channel, validating its shape against the layout.
    pub fn add_channel(&mut self, channel: Channel) -> Result<()> {
        channel.check_shape(&self.layout)?;
        self.channels.push(channel);
        Ok(())
    }
}

/// The realized in-memory tree of one loaded file.
///
/// Owned exclusively by the dataset that produced it; never mutated by the
/// conversion pipeline.
#[derive(Clone, Debug, Default)]
pub struct State {
    components: Vec<Component>,
}

impl State {
    pub fn new(components: Vec<Component>) -> Self {
        Self { components }
    }

    #[inline]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Validity flag of the loaded state.
    pub fn valid(&self) -> bool {
        !self.components.is_empty()
    }
}
