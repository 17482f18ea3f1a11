//! In-memory feature layer
//!
//! Backs both the full asset dataset and the selected-assets working table
//! in tests and in deployments that load inventories straight from imported
//! files. Rows live in a `BTreeMap` keyed by feature id, which gives the
//! ascending-id iteration the batch operations depend on for free.

use super::FeatureLayer;
use crate::data::{Extent, Feature, FeatureId, Field, Value};
use ahash::AHashMap;
use std::collections::{BTreeMap, BTreeSet};

/// Heap-resident feature layer
pub struct MemoryLayer {
    name: String,
    fields: Vec<Field>,
    field_index: AHashMap<String, usize>,
    rows: BTreeMap<FeatureId, Feature>,
    extent: Option<Extent>,
    editing: bool,
}

impl MemoryLayer {
    /// Create an empty layer with the given schema
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        let mut layer = Self {
            name: name.into(),
            fields,
            field_index: AHashMap::new(),
            rows: BTreeMap::new(),
            extent: None,
            editing: false,
        };
        layer.rebuild_field_index();
        layer
    }

    fn rebuild_field_index(&mut self) {
        self.field_index = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
    }

    fn row_matches_schema(&self, feature: &Feature) -> bool {
        feature.attributes.len() == self.fields.len()
    }
}

impl FeatureLayer for MemoryLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_count(&self) -> usize {
        self.rows.len()
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        self.field_index.get(name).copied()
    }

    fn get_feature(&self, fid: FeatureId) -> Option<Feature> {
        self.rows.get(&fid).cloned()
    }

    fn get_features_ordered(&self, fids: &BTreeSet<FeatureId>) -> Vec<Feature> {
        // Both sides iterate ascending, so the output is ordered by id.
        fids.iter()
            .filter_map(|fid| self.rows.get(fid).cloned())
            .collect()
    }

    fn all_features(&self) -> Vec<Feature> {
        self.rows.values().cloned().collect()
    }

    fn add_feature(&mut self, feature: Feature) -> bool {
        if self.rows.contains_key(&feature.id) || !self.row_matches_schema(&feature) {
            return false;
        }
        self.rows.insert(feature.id, feature);
        true
    }

    fn add_features(&mut self, features: Vec<Feature>) -> bool {
        // Validate the whole batch before touching the rows.
        let mut seen = BTreeSet::new();
        for feature in &features {
            if self.rows.contains_key(&feature.id)
                || !seen.insert(feature.id)
                || !self.row_matches_schema(feature)
            {
                return false;
            }
        }
        for feature in features {
            self.rows.insert(feature.id, feature);
        }
        true
    }

    fn delete_features(&mut self, fids: &[FeatureId]) -> bool {
        let mut all_present = true;
        for fid in fids {
            if self.rows.remove(fid).is_none() {
                all_present = false;
            }
        }
        all_present
    }

    fn truncate(&mut self) -> bool {
        self.rows.clear();
        true
    }

    fn add_attributes(&mut self, fields: Vec<Field>) -> bool {
        for field in &fields {
            if self.field_index.contains_key(&field.name) {
                return false;
            }
        }
        let added = fields.len();
        self.fields.extend(fields);
        self.rebuild_field_index();
        for row in self.rows.values_mut() {
            row.attributes
                .extend(std::iter::repeat(Value::Null).take(added));
        }
        true
    }

    fn start_editing(&mut self) {
        self.editing = true;
    }

    fn commit_changes(&mut self) {
        self.editing = false;
        self.update_extents();
    }

    fn change_attribute_value(
        &mut self,
        fid: FeatureId,
        field_index: usize,
        value: Value,
    ) -> bool {
        if field_index >= self.fields.len() {
            return false;
        }
        match self.rows.get_mut(&fid) {
            Some(row) => row.set_attribute(field_index, value),
            None => false,
        }
    }

    fn update_extents(&mut self) {
        let mut extent: Option<Extent> = None;
        for row in self.rows.values() {
            if let Some(row_ext) = row.geometry.extent() {
                match extent.as_mut() {
                    Some(ext) => ext.expand(&row_ext),
                    None => extent = Some(row_ext),
                }
            }
        }
        self.extent = extent;
    }

    fn extent(&self) -> Option<Extent> {
        self.extent
    }
}
