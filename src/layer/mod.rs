//! Feature layer contract and in-memory implementation
//!
//! A [`FeatureLayer`] is the storage engine seam: the component database
//! treats the full asset dataset and the selected-assets working table as
//! opaque layers behind this trait. Engine-level mutations report success
//! as `bool`, matching the external GIS provider contract; the database
//! layer converts failures into typed errors.

pub mod memory;

use crate::data::{Extent, Feature, FeatureId, Field, Value};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

pub use memory::MemoryLayer;

/// Shared handle to a feature layer
///
/// The host application keeps its own handles to the layers it renders, so
/// layers are reference-counted and lock-guarded even though all mutations
/// run on the single UI-driven control flow.
pub type LayerHandle = Arc<RwLock<dyn FeatureLayer>>;

/// Wrap a concrete layer into a shared handle
pub fn layer_handle<L: FeatureLayer + 'static>(layer: L) -> LayerHandle {
    Arc::new(RwLock::new(layer))
}

/// Storage contract for one feature dataset
pub trait FeatureLayer: Send + Sync {
    /// Layer display name
    fn name(&self) -> &str;

    /// Number of features currently stored
    fn feature_count(&self) -> usize;

    /// Attribute schema, in ordinal order
    fn fields(&self) -> &[Field];

    /// Ordinal position of a named field
    fn field_index(&self, name: &str) -> Option<usize>;

    /// Fetch a single feature by internal id
    fn get_feature(&self, fid: FeatureId) -> Option<Feature>;

    /// Batched fetch returning matches in ascending-id order
    ///
    /// Ids absent from the layer are skipped, so the result can be shorter
    /// than the request; callers that require a full match compare counts.
    fn get_features_ordered(&self, fids: &BTreeSet<FeatureId>) -> Vec<Feature>;

    /// All features in ascending-id order
    fn all_features(&self) -> Vec<Feature>;

    /// Insert one feature, keeping its id; false on duplicate id or an
    /// attribute row that does not match the schema width
    fn add_feature(&mut self, feature: Feature) -> bool;

    /// Bulk insert; false leaves the layer unchanged
    fn add_features(&mut self, features: Vec<Feature>) -> bool;

    /// Delete the given ids; false if any id was not present
    fn delete_features(&mut self, fids: &[FeatureId]) -> bool;

    /// Remove every feature, keeping the schema
    fn truncate(&mut self) -> bool;

    /// Append new fields to the schema; existing rows are padded with nulls
    fn add_attributes(&mut self, fields: Vec<Field>) -> bool;

    /// Open an edit session
    fn start_editing(&mut self);

    /// Close the edit session and refresh extent metadata
    fn commit_changes(&mut self);

    /// Change one attribute of one feature
    fn change_attribute_value(&mut self, fid: FeatureId, field_index: usize, value: Value)
        -> bool;

    /// Recompute the cached extent from current geometries
    fn update_extents(&mut self);

    /// Cached bounding extent; stale until `update_extents` runs
    fn extent(&self) -> Option<Extent>;
}
