//! File header metadata: format version, frame, channel directory.
//!
//! The header is self-contained; parsing it never touches tile payload, so
//! inspection tools stay cheap even on large caches.

use crate::util::Result;

use super::format::{BIF_MAGIC, CURRENT_VERSION};
use super::io::Cursor;
use super::state::{Component, State};
use super::{ComponentType, DataType};
use crate::util::Error;

/// Directory entry for one declared channel.
#[derive(Clone, Debug)]
pub struct ChannelInfo {
    pub name: String,
    pub data_type: DataType,
    pub max_depth: u32,
    pub tile_count: u64,
    pub element_count: u64,
}

/// Informational classification of the primary component, derived from its
/// free-text name. A hint only; nothing in the pipeline branches on it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ComponentClass {
    Liquid,
    Foam,
}

/// Header metadata of a `.bif` file.
#[derive(Clone, Debug)]
pub struct FileInfo {
    pub version: u32,
    pub frame: i32,
    pub object_name: String,
    pub layout_name: String,
    pub component_name: String,
    pub component_type: ComponentType,
    pub channels: Vec<ChannelInfo>,
}

impl FileInfo {
    /// Number of declared channels.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Foam-vs-liquid hint from the component name.
    pub fn component_class(&self) -> ComponentClass {
        if self.component_name.contains("Foam") {
            ComponentClass::Foam
        } else {
            ComponentClass::Liquid
        }
    }

    /// Build header metadata for a state, deriving the channel directory from
    /// the state's first component.
    pub fn from_state(
        object_name: impl Into<String>,
        layout_name: impl Into<String>,
        frame: i32,
        state: &State,
    ) -> Self {
        let primary: Option<&Component> = state.components().first();
        let channels = primary
            .map(|comp| {
                comp.channels()
                    .iter()
                    .map(|ch| ChannelInfo {
                        name: ch.name().to_string(),
                        data_type: ch.data_type(),
                        max_depth: comp.layout().depth_count() as u32,
                        tile_count: comp.layout().total_tile_count() as u64,
                        element_count: ch.total_element_count() as u64,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            version: CURRENT_VERSION,
            frame,
            object_name: object_name.into(),
            layout_name: layout_name.into(),
            component_name: primary.map(|c| c.name().to_string()).unwrap_or_default(),
            component_type: primary.map(|c| c.component_type()).unwrap_or(ComponentType::Other(0)),
            channels,
        }
    }
}

/// Parse the header from the start of a file. Leaves the cursor at the first
/// body byte.
pub(crate) fn parse_file_info(cur: &mut Cursor<'_>) -> Result<FileInfo> {
    let magic = cur.read_bytes(BIF_MAGIC.len())?;
    if magic != BIF_MAGIC {
        return Err(Error::InvalidMagic);
    }
    let version = cur.read_u32()?;
    if version > CURRENT_VERSION {
        return Err(Error::UnsupportedVersion(version));
    }
    let frame = cur.read_i32()?;
    let object_name = cur.read_string()?;
    let layout_name = cur.read_string()?;
    let component_name = cur.read_string()?;
    let component_type = ComponentType::from_tag(cur.read_u8()?);

    let channel_count = cur.read_u32()? as usize;
    let mut channels = Vec::with_capacity(channel_count.min(1024));
    for _ in 0..channel_count {
        let name = cur.read_string()?;
        let tag = cur.read_u32()?;
        let data_type = DataType::from_tag(tag)
            .ok_or_else(|| Error::invalid(format!("unknown data type tag {tag} for channel \"{name}\"")))?;
        channels.push(ChannelInfo {
            name,
            data_type,
            max_depth: cur.read_u32()?,
            tile_count: cur.read_u64()?,
            element_count: cur.read_u64()?,
        });
    }

    Ok(FileInfo {
        version,
        frame,
        object_name,
        layout_name,
        component_name,
        component_type,
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info_named(name: &str) -> FileInfo {
        FileInfo {
            version: CURRENT_VERSION,
            frame: 1,
            object_name: "bifrostLiquid1".into(),
            layout_name: "layout".into(),
            component_name: name.into(),
            component_type: ComponentType::Point,
            channels: Vec::new(),
        }
    }

    #[test]
    fn test_component_class_hint() {
        assert_eq!(info_named("bifrostFoamProperties").component_class(), ComponentClass::Foam);
        assert_eq!(info_named("liquidParticles").component_class(), ComponentClass::Liquid);
    }
}
