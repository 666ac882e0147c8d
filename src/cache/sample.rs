//! Sample payload types for point schemas.

use crate::util::{BBox3f, Vec3};

use super::format::GeometryScope;

/// Flat array payload of one property.
#[derive(Clone, PartialEq, Debug)]
pub enum ArrayData {
    Float(Vec<f32>),
    FloatV3(Vec<Vec3>),
    UInt64(Vec<u64>),
}

impl ArrayData {
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::FloatV3(v) => v.len(),
            Self::UInt64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<&[Vec3]> {
        match self {
            Self::FloatV3(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<&[u64]> {
        match self {
            Self::UInt64(v) => Some(v),
            _ => None,
        }
    }
}

/// One independently named, independently time-sampled array property.
#[derive(Clone, PartialEq, Debug)]
pub struct ArrayProperty {
    pub name: String,
    pub scope: GeometryScope,
    pub data: ArrayData,
}

impl ArrayProperty {
    pub fn new(name: impl Into<String>, scope: GeometryScope, data: ArrayData) -> Self {
        Self {
            name: name.into(),
            scope,
            data,
        }
    }
}

/// One committed point sample: the mandatory position/identifier pair plus
/// auxiliary per-point array properties.
#[derive(Clone, Debug)]
pub struct PointsSample {
    pub positions: Vec<Vec3>,
    pub ids: Vec<u64>,
    pub aux: Vec<ArrayProperty>,
    pub bounds: BBox3f,
}

impl PointsSample {
    pub fn new(positions: Vec<Vec3>, ids: Vec<u64>, bounds: BBox3f) -> Self {
        Self {
            positions,
            ids,
            aux: Vec::new(),
            bounds,
        }
    }

    /// Check the sample's internal consistency: the identifier array pairs
    /// 1:1 with positions and every auxiliary array reaches the same length.
    pub fn is_consistent(&self) -> bool {
        let n = self.positions.len();
        self.ids.len() == n && self.aux.iter().all(|p| p.data.len() == n)
    }
}

/// A schema object named after its component, holding exactly one sample.
#[derive(Clone, Debug)]
pub struct PointsSchema {
    pub name: String,
    pub time_sampling_index: u32,
    pub sample: PointsSample,
}

impl PointsSchema {
    pub fn new(name: impl Into<String>, time_sampling_index: u32, sample: PointsSample) -> Self {
        Self {
            name: name.into(),
            time_sampling_index,
            sample,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_consistency() {
        let mut sample = PointsSample::new(vec![Vec3::ZERO, Vec3::ONE], vec![0, 1], BBox3f::EMPTY);
        assert!(sample.is_consistent());

        sample.aux.push(ArrayProperty::new(
            "densities",
            GeometryScope::Varying,
            ArrayData::Float(vec![0.5]),
        ));
        assert!(!sample.is_consistent());
    }
}
