//! Data model: attribute values, field definitions, and geographic features

pub mod feature;
pub mod field;
pub mod value;

pub use feature::{Extent, Feature, FeatureId, Geometry};
pub use field::Field;
pub use value::{DataType, Value};
