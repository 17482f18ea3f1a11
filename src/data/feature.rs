//! Geographic features: geometry, bounding extents, and attribute rows

use super::Value;
use serde::{Deserialize, Serialize};

/// Layer-internal feature identifier
///
/// Externally supplied asset ids are mapped to internal ids by adding the
/// owning database's configured offset exactly once.
pub type FeatureId = i64;

/// Axis-aligned bounding rectangle in layer coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    /// Extent covering a single point
    pub fn from_point(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Grow this extent to also cover `other`
    pub fn expand(&mut self, other: &Extent) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }
}

/// Feature geometry
///
/// Only the shapes the asset inventories use: point assets (buildings,
/// wells), line assets (pipelines, roads), and polygon footprints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// No geometry (attribute-only record)
    None,
    Point {
        x: f64,
        y: f64,
    },
    LineString(Vec<[f64; 2]>),
    Polygon(Vec<[f64; 2]>),
}

impl Geometry {
    /// Bounding box of this geometry, if it has one
    pub fn extent(&self) -> Option<Extent> {
        match self {
            Geometry::None => None,
            Geometry::Point { x, y } => Some(Extent::from_point(*x, *y)),
            Geometry::LineString(pts) | Geometry::Polygon(pts) => {
                let mut iter = pts.iter();
                let first = iter.next()?;
                let mut ext = Extent::from_point(first[0], first[1]);
                for p in iter {
                    ext.expand(&Extent::from_point(p[0], p[1]));
                }
                Some(ext)
            }
        }
    }
}

/// One geographic record: geometry plus attributes
///
/// Attributes are positionally aligned with the owning layer's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
    pub attributes: Vec<Value>,
}

impl Feature {
    /// Create a feature with empty attributes
    pub fn new(id: FeatureId, geometry: Geometry) -> Self {
        Self {
            id,
            geometry,
            attributes: Vec::new(),
        }
    }

    /// Builder-style attribute assignment
    pub fn with_attributes(mut self, attributes: Vec<Value>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Get the attribute at a field position
    pub fn attribute(&self, index: usize) -> Option<&Value> {
        self.attributes.get(index)
    }

    /// Set the attribute at a field position; false if out of range
    pub fn set_attribute(&mut self, index: usize, value: Value) -> bool {
        match self.attributes.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}
