//! componentdb - Selected-asset feature database
//!
//! Keeps the set of assets a user marks for regional hazard analysis in
//! sync with a working copy of their feature data. Each component type
//! (buildings, pipelines, ...) pairs a main layer holding the full
//! inventory with a selected-assets layer that batch imports rebuild as
//! analysis results arrive.

pub mod data;
pub mod db;
pub mod layer;
pub mod output;

// Re-export main types
pub use data::{DataType, Extent, Feature, FeatureId, Field, Geometry, Value};
pub use db::{ComponentDatabase, DatabaseManager};
pub use layer::{layer_handle, FeatureLayer, LayerHandle, MemoryLayer};
pub use output::{CapturingHandler, LogHandler, StatusHandler};

/// Component database error type
#[derive(Debug, thiserror::Error)]
pub enum ComponentDbError {
    #[error("feature {0} not found in the main layer")]
    FeatureNotFound(FeatureId),

    #[error("{context}: expected {expected} features, found {found}")]
    CountMismatch {
        expected: usize,
        found: usize,
        context: String,
    },

    #[error("field '{0}' not found in the selected assets layer")]
    FieldNotFound(String),

    #[error("no {0} layer has been set")]
    LayerNotSet(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("layer sync failed: {0}")]
    Sync(String),
}

pub type Result<T> = std::result::Result<T, ComponentDbError>;
