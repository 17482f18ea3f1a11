//! Attribute field definitions

use super::DataType;
use serde::{Deserialize, Serialize};

/// Descriptor for one attribute column of a feature layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, unique within a layer
    pub name: String,
    /// Data type
    pub data_type: DataType,
}

impl Field {
    /// Create a new field definition
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}
