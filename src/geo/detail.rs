//! Append-only geometry detail container.
//!
//! Stand-in for a mesh toolkit's detail object: the conversion pipeline only
//! ever appends points and attaches per-point attributes.

use crate::util::{Error, Result, Vec3};

/// Per-point attribute payload.
#[derive(Clone, PartialEq, Debug)]
pub enum AttribData {
    Float(Vec<f32>),
    FloatV3(Vec<Vec3>),
}

impl AttribData {
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::FloatV3(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_vec3(&self) -> Option<&[Vec3]> {
        match self {
            Self::FloatV3(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
struct PointAttrib {
    name: String,
    data: AttribData,
}

/// Append-only point/primitive container.
#[derive(Clone, Debug, Default)]
pub struct Detail {
    positions: Vec<Vec3>,
    attribs: Vec<PointAttrib>,
}

impl Detail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one point, returning its point number.
    pub fn add_point(&mut self, p: Vec3) -> usize {
        self.positions.push(p);
        self.positions.len() - 1
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Attach a per-point attribute. The payload must cover every point.
    pub fn add_point_attrib(&mut self, name: impl Into<String>, data: AttribData) -> Result<()> {
        let name = name.into();
        if data.len() != self.point_count() {
            return Err(Error::WriteFailed(format!(
                "attribute \"{}\" covers {} points, detail has {}",
                name,
                data.len(),
                self.point_count()
            )));
        }
        if self.attribs.iter().any(|a| a.name == name) {
            return Err(Error::WriteFailed(format!("attribute \"{name}\" already exists")));
        }
        self.attribs.push(PointAttrib { name, data });
        Ok(())
    }

    /// Look up a per-point attribute by name.
    pub fn point_attrib(&self, name: &str) -> Option<&AttribData> {
        self.attribs.iter().find(|a| a.name == name).map(|a| &a.data)
    }
}
