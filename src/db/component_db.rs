//! Component database: selection bookkeeping and working-table sync
//!
//! Each asset class (buildings, pipelines, ...) gets one
//! [`ComponentDatabase`] pairing two layers: the main layer holding the
//! full inventory and the selected-assets layer holding working copies of
//! the features marked for analysis. The database keeps the selection set
//! and the working table consistent across single adds, full-replace
//! selection, removals, and the batch rebuilds that imported analysis
//! results trigger.
//!
//! Invariant: after any successful operation, the selection set and the
//! working table hold the same ids.

use crate::data::{DataType, Feature, FeatureId, Field, Value};
use crate::layer::{FeatureLayer, LayerHandle};
use crate::output::StatusHandler;
use crate::{ComponentDbError, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Field type for an imported value; untyped nulls are stored as strings
fn column_type_for(value: &Value) -> DataType {
    match value.data_type() {
        DataType::Null => DataType::String,
        dt => dt,
    }
}

/// Feature database for one component type
pub struct ComponentDatabase {
    component_type: String,
    /// Added to externally supplied ids to obtain layer-internal ids
    offset: i64,
    main_layer: Option<LayerHandle>,
    selected_layer: Option<LayerHandle>,
    /// Internal ids of the selected features, ascending
    selected_ids: BTreeSet<FeatureId>,
    handler: Arc<dyn StatusHandler>,
}

impl ComponentDatabase {
    /// Create an empty database for a component type
    pub fn new(component_type: impl Into<String>, handler: Arc<dyn StatusHandler>) -> Self {
        Self {
            component_type: component_type.into(),
            offset: 0,
            main_layer: None,
            selected_layer: None,
            selected_ids: BTreeSet::new(),
            handler,
        }
    }

    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: i64) {
        self.offset = offset;
    }

    pub fn main_layer(&self) -> Option<LayerHandle> {
        self.main_layer.clone()
    }

    pub fn set_main_layer(&mut self, layer: LayerHandle) {
        self.main_layer = Some(layer);
    }

    pub fn selected_layer(&self) -> Option<LayerHandle> {
        self.selected_layer.clone()
    }

    pub fn set_selected_layer(&mut self, layer: LayerHandle) {
        self.selected_layer = Some(layer);
    }

    /// Internal ids currently selected, in ascending order
    pub fn selected_ids(&self) -> &BTreeSet<FeatureId> {
        &self.selected_ids
    }

    pub fn selected_count(&self) -> usize {
        self.selected_ids.len()
    }

    /// True when no main layer is attached or it holds no features
    pub fn is_empty(&self) -> bool {
        match &self.main_layer {
            Some(layer) => layer.read().feature_count() == 0,
            None => true,
        }
    }

    /// Drop both layers and reset selection bookkeeping and offset
    pub fn clear(&mut self) {
        self.main_layer = None;
        self.selected_layer = None;
        self.selected_ids.clear();
        self.offset = 0;
    }

    fn main_handle(&self) -> Result<LayerHandle> {
        self.main_layer
            .clone()
            .ok_or(ComponentDbError::LayerNotSet("main"))
    }

    fn selected_handle(&self) -> Result<LayerHandle> {
        self.selected_layer
            .clone()
            .ok_or(ComponentDbError::LayerNotSet("selected assets"))
    }

    /// Fetch a feature from the main layer by external id
    pub fn get_feature(&self, id: FeatureId) -> Option<Feature> {
        let layer = self.main_layer.as_ref()?;
        layer.read().get_feature(id + self.offset)
    }

    /// Open an edit session on the selected-assets layer
    pub fn start_editing(&self) -> Result<()> {
        let selected = self.selected_handle()?;
        selected.write().start_editing();
        Ok(())
    }

    /// Commit the edit session and refresh the extent
    pub fn commit_changes(&self) -> Result<()> {
        let selected = self.selected_handle()?;
        selected.write().commit_changes();
        Ok(())
    }

    /// Add one feature to the selection
    ///
    /// A feature that is already selected is a no-op success.
    pub fn select_feature(&mut self, id: FeatureId) -> Result<()> {
        let fid = id + self.offset;
        if self.selected_ids.contains(&fid) {
            return Ok(());
        }

        let main = self.main_handle()?;
        let selected = self.selected_handle()?;

        let feature = match main.read().get_feature(fid) {
            Some(feature) => feature,
            None => {
                self.handler
                    .error("Error getting the feature from the database");
                return Err(ComponentDbError::FeatureNotFound(id));
            }
        };

        let mut layer = selected.write();
        // A re-attached layer can carry rows the bookkeeping no longer
        // tracks; drop them so the selection stays the only content.
        if self.selected_ids.is_empty() && layer.feature_count() > 0 && !layer.truncate() {
            return Err(ComponentDbError::Sync(
                "failed to clear stale rows from the selected assets layer".into(),
            ));
        }
        if !layer.add_feature(feature) {
            self.handler
                .error("Error adding the feature to the selected assets layer");
            return Err(ComponentDbError::Sync(
                "the selected assets layer rejected the feature insert".into(),
            ));
        }
        layer.update_extents();
        drop(layer);

        self.selected_ids.insert(fid);
        Ok(())
    }

    /// Replace the selection with the given external ids
    ///
    /// Any existing selection is cleared first. Every id must resolve in
    /// the main layer; a shortfall fails the whole operation.
    pub fn select_features(&mut self, ids: &BTreeSet<FeatureId>) -> Result<()> {
        let main = self.main_handle()?;
        let selected = self.selected_handle()?;

        // Full-replace semantics: the working table is emptied even when
        // the bookkeeping set is already clear, since a freshly attached
        // layer may still hold rows.
        self.selected_ids.clear();
        {
            let mut layer = selected.write();
            if layer.feature_count() > 0 && !layer.truncate() {
                return Err(ComponentDbError::Sync(
                    "failed to clear the selected assets layer".into(),
                ));
            }
        }

        let fids: BTreeSet<FeatureId> = ids.iter().map(|id| id + self.offset).collect();
        let features = main.read().get_features_ordered(&fids);
        if features.len() != ids.len() {
            return Err(ComponentDbError::CountMismatch {
                expected: ids.len(),
                found: features.len(),
                context: format!("selecting {} assets from the main layer", self.component_type),
            });
        }

        let mut layer = selected.write();
        if !layer.add_features(features) {
            return Err(ComponentDbError::Sync(
                "failed to insert the selected features into the selected assets layer".into(),
            ));
        }
        layer.update_extents();
        drop(layer);

        self.selected_ids = fids;
        self.handler.status(&format!(
            "Selected {} {} assets for analysis",
            self.selected_ids.len(),
            self.component_type
        ));
        Ok(())
    }

    /// Remove the given internal ids from the selection
    ///
    /// Shrinks both the working table and the selection set so the two
    /// stay consistent. Ids that were never selected are ignored by the
    /// bookkeeping but reported as a failure by the layer delete.
    pub fn deselect_features(&mut self, fids: &[FeatureId]) -> Result<()> {
        let selected = self.selected_handle()?;
        let deleted = selected.write().delete_features(fids);
        for fid in fids {
            self.selected_ids.remove(fid);
        }
        if !deleted {
            return Err(ComponentDbError::Sync(
                "failed to delete one or more features from the selected assets layer".into(),
            ));
        }
        Ok(())
    }

    /// Empty the working table and the selection set, keeping the layers
    pub fn clear_selection(&mut self) -> Result<()> {
        let selected = self.selected_handle()?;
        if !selected.write().truncate() {
            return Err(ComponentDbError::Sync(
                "failed to clear the selected assets layer".into(),
            ));
        }
        self.selected_ids.clear();
        Ok(())
    }

    fn check_batch_size(&self, provided: usize, selected: &LayerHandle) -> Result<()> {
        let num_selected = self.selected_ids.len();
        if provided != num_selected {
            return Err(ComponentDbError::CountMismatch {
                expected: num_selected,
                found: provided,
                context: format!(
                    "the number of imported rows must equal the number of selected {} assets",
                    self.component_type
                ),
            });
        }
        let row_count = selected.read().feature_count();
        if num_selected != row_count {
            return Err(ComponentDbError::CountMismatch {
                expected: num_selected,
                found: row_count,
                context: format!(
                    "the selected {} assets layer is out of sync with the selection bookkeeping",
                    self.component_type
                ),
            });
        }
        Ok(())
    }

    /// Append new result columns to every selected feature
    ///
    /// `values` holds one row per selected feature, ordered by ascending
    /// internal id, each row one value per entry in `field_names`. The
    /// working table is rebuilt from the main layer with the extended
    /// schema; the rebuild is staged in full before any destructive step.
    pub fn add_attributes_batch(
        &mut self,
        field_names: &[String],
        values: &[Vec<Value>],
    ) -> Result<()> {
        let main = self.main_handle()?;
        let selected = self.selected_handle()?;
        self.check_batch_size(values.len(), &selected)?;

        if values.is_empty() {
            return Err(ComponentDbError::InvalidArgument(
                "no attribute values were provided".into(),
            ));
        }

        let width = field_names.len();
        let first = &values[0];
        if first.len() != width {
            return Err(ComponentDbError::InvalidArgument(
                "the number of values per row must match the number of new fields".into(),
            ));
        }

        // New field types are inferred from the first imported row.
        let new_fields: Vec<Field> = field_names
            .iter()
            .zip(first.iter())
            .map(|(name, value)| Field::new(name.clone(), column_type_for(value)))
            .collect();

        let base_width = selected.read().fields().len();
        let features = main.read().get_features_ordered(&self.selected_ids);
        if features.len() != values.len() {
            return Err(ComponentDbError::CountMismatch {
                expected: values.len(),
                found: features.len(),
                context: "fetching the selected features for the attribute import".into(),
            });
        }

        let mut staged = Vec::with_capacity(features.len());
        for (mut feature, row) in features.into_iter().zip(values) {
            if row.len() != width {
                return Err(ComponentDbError::InvalidArgument(format!(
                    "expected {} values for feature {}, got {}",
                    width,
                    feature.id,
                    row.len()
                )));
            }
            feature.attributes.resize(base_width, Value::Null);
            feature.attributes.extend(row.iter().cloned());
            staged.push(feature);
        }

        let mut layer = selected.write();
        Self::apply_rebuild(&*self.handler, &mut *layer, staged, Some(new_fields))
    }

    /// Overwrite one named column across every selected feature
    ///
    /// Same ordering and count contract as [`add_attributes_batch`]; the
    /// field must already exist in the working-table schema.
    ///
    /// [`add_attributes_batch`]: ComponentDatabase::add_attributes_batch
    pub fn update_attribute_batch(&mut self, field_name: &str, values: &[Value]) -> Result<()> {
        let main = self.main_handle()?;
        let selected = self.selected_handle()?;
        self.check_batch_size(values.len(), &selected)?;

        let field_idx = selected
            .read()
            .field_index(field_name)
            .ok_or_else(|| ComponentDbError::FieldNotFound(field_name.to_string()))?;
        let width = selected.read().fields().len();

        let features = main.read().get_features_ordered(&self.selected_ids);
        if features.len() != values.len() {
            return Err(ComponentDbError::CountMismatch {
                expected: values.len(),
                found: features.len(),
                context: format!(
                    "fetching the selected features to update the field '{}'",
                    field_name
                ),
            });
        }

        let mut staged = Vec::with_capacity(features.len());
        for (mut feature, value) in features.into_iter().zip(values.iter().cloned()) {
            // The working table can be wider than the main layer when
            // result columns were appended earlier; align before writing.
            feature.attributes.resize(width, Value::Null);
            feature.attributes[field_idx] = value;
            staged.push(feature);
        }

        let mut layer = selected.write();
        Self::apply_rebuild(&*self.handler, &mut *layer, staged, None)
    }

    /// Truncate-and-reinsert rebuild of the working table
    ///
    /// The previous rows are snapshotted first; a failed schema extension
    /// or insert restores them instead of leaving the table empty.
    fn apply_rebuild(
        handler: &dyn StatusHandler,
        layer: &mut dyn FeatureLayer,
        staged: Vec<Feature>,
        new_fields: Option<Vec<Field>>,
    ) -> Result<()> {
        let snapshot = layer.all_features();

        if !layer.truncate() {
            return Err(ComponentDbError::Sync(format!(
                "failed to clear the {} layer before the rebuild",
                layer.name()
            )));
        }

        if let Some(fields) = new_fields {
            if !layer.add_attributes(fields) {
                Self::restore_snapshot(handler, layer, snapshot);
                return Err(ComponentDbError::Sync(format!(
                    "failed to extend the schema of the {} layer",
                    layer.name()
                )));
            }
        }

        if !layer.add_features(staged) {
            Self::restore_snapshot(handler, layer, snapshot);
            return Err(ComponentDbError::Sync(format!(
                "failed to insert the rebuilt features into the {} layer",
                layer.name()
            )));
        }

        layer.update_extents();
        Ok(())
    }

    fn restore_snapshot(
        handler: &dyn StatusHandler,
        layer: &mut dyn FeatureLayer,
        snapshot: Vec<Feature>,
    ) {
        let width = layer.fields().len();
        let _ = layer.truncate();
        let rows: Vec<Feature> = snapshot
            .into_iter()
            .map(|mut feature| {
                feature.attributes.resize(width, Value::Null);
                feature
            })
            .collect();
        if layer.add_features(rows) {
            layer.update_extents();
        } else {
            handler.error(&format!(
                "Failed to restore the {} layer after an aborted batch update",
                layer.name()
            ));
        }
    }

    /// Change one attribute of one feature
    ///
    /// Writes to the main layer inside an edit session and mirrors the
    /// change into the working table when the feature is selected. Returns
    /// false without reporting when the id or field does not resolve; a
    /// main-layer update with no selected counterpart still counts as
    /// success.
    pub fn update_attribute(&mut self, id: FeatureId, attribute: &str, value: Value) -> bool {
        let (Some(main), Some(selected)) = (self.main_layer.clone(), self.selected_layer.clone())
        else {
            return false;
        };

        let fid = id + self.offset;
        // Shared columns occupy the same ordinal in both layers.
        let Some(field_idx) = selected.read().field_index(attribute) else {
            return false;
        };

        let mut main_layer = main.write();
        main_layer.start_editing();
        let changed = main_layer.change_attribute_value(fid, field_idx, value.clone());
        main_layer.commit_changes();
        drop(main_layer);

        if !changed {
            return false;
        }

        if self.selected_ids.contains(&fid) {
            return selected.write().change_attribute_value(fid, field_idx, value);
        }
        true
    }

    /// Read one attribute of one feature, falling back to a default
    ///
    /// Total: any miss (no layer, unknown id, unknown field, stored null)
    /// yields the default.
    pub fn get_attribute_value(&self, id: FeatureId, attribute: &str, default: Value) -> Value {
        let Some(main) = self.main_layer.as_ref() else {
            return default;
        };
        let layer = main.read();
        let Some(field_idx) = layer.field_index(attribute) else {
            return default;
        };
        match layer.get_feature(id + self.offset) {
            Some(feature) => match feature.attribute(field_idx) {
                Some(value) if !value.is_null() => value.clone(),
                _ => default,
            },
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Geometry;
    use crate::layer::{layer_handle, MemoryLayer};
    use crate::output::CapturingHandler;

    fn asset_fields() -> Vec<Field> {
        vec![
            Field::new("name", DataType::String),
            Field::new("cost", DataType::Float64),
        ]
    }

    fn populated_db(ids: &[FeatureId]) -> (ComponentDatabase, Arc<CapturingHandler>) {
        let handler = Arc::new(CapturingHandler::new());
        let mut db = ComponentDatabase::new("buildings", handler.clone());

        let mut main = MemoryLayer::new("buildings", asset_fields());
        for &id in ids {
            let feature = Feature::new(id, Geometry::Point {
                x: id as f64,
                y: 0.0,
            })
            .with_attributes(vec![
                Value::String(format!("asset-{}", id)),
                Value::Float64(0.0),
            ]);
            assert!(main.add_feature(feature));
        }
        db.set_main_layer(layer_handle(main));
        db.set_selected_layer(layer_handle(MemoryLayer::new(
            "selected buildings",
            asset_fields(),
        )));
        (db, handler)
    }

    fn selected_row_count(db: &ComponentDatabase) -> usize {
        db.selected_layer().unwrap().read().feature_count()
    }

    #[test]
    fn test_select_feature_idempotent() {
        let (mut db, _) = populated_db(&[1, 2, 3]);
        db.select_feature(2).unwrap();
        db.select_feature(2).unwrap();
        assert_eq!(db.selected_count(), 1);
        assert_eq!(selected_row_count(&db), 1);
    }

    #[test]
    fn test_select_feature_missing_id() {
        let (mut db, handler) = populated_db(&[1]);
        let err = db.select_feature(9).unwrap_err();
        assert!(matches!(err, ComponentDbError::FeatureNotFound(9)));
        assert_eq!(db.selected_count(), 0);
        assert_eq!(handler.error_messages().len(), 1);
    }

    #[test]
    fn test_select_features_replaces() {
        let (mut db, _) = populated_db(&[1, 2, 3, 4, 5]);
        db.select_features(&[1, 2].into_iter().collect()).unwrap();
        db.select_features(&[3, 4, 5].into_iter().collect()).unwrap();
        assert_eq!(db.selected_count(), 3);
        assert_eq!(selected_row_count(&db), 3);
        assert!(db.selected_ids().contains(&3));
        assert!(!db.selected_ids().contains(&1));
    }

    #[test]
    fn test_select_features_count_mismatch() {
        let (mut db, _) = populated_db(&[1, 2]);
        let err = db
            .select_features(&[1, 2, 7].into_iter().collect())
            .unwrap_err();
        assert!(matches!(
            err,
            ComponentDbError::CountMismatch {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    fn stale_layer() -> MemoryLayer {
        let mut layer = MemoryLayer::new("selected buildings", asset_fields());
        let leftover = Feature::new(7, Geometry::Point { x: 7.0, y: 0.0 })
            .with_attributes(vec![Value::from("stale"), Value::Float64(0.0)]);
        assert!(layer.add_feature(leftover));
        layer
    }

    #[test]
    fn test_select_features_clears_stale_layer_rows() {
        let (mut db, _) = populated_db(&[1, 2, 3]);
        db.set_selected_layer(layer_handle(stale_layer()));

        db.select_features(&[1, 2].into_iter().collect()).unwrap();
        assert_eq!(db.selected_count(), 2);
        assert_eq!(selected_row_count(&db), 2);
        assert!(db
            .selected_layer()
            .unwrap()
            .read()
            .get_feature(7)
            .is_none());
    }

    #[test]
    fn test_select_feature_clears_stale_layer_rows() {
        let (mut db, _) = populated_db(&[1, 2, 3]);
        db.set_selected_layer(layer_handle(stale_layer()));

        db.select_feature(1).unwrap();
        assert_eq!(db.selected_count(), 1);
        assert_eq!(selected_row_count(&db), 1);
        let selected = db.selected_layer().unwrap();
        assert!(selected.read().get_feature(7).is_none());

        // Once the selection is populated, single adds stay additive
        db.select_feature(2).unwrap();
        assert_eq!(selected_row_count(&db), 2);
    }

    #[test]
    fn test_batch_detects_layer_desync() {
        let (mut db, _) = populated_db(&[1, 2]);
        db.select_features(&[1, 2].into_iter().collect()).unwrap();

        // Swapping in an empty layer leaves the bookkeeping ahead of the rows
        db.set_selected_layer(layer_handle(MemoryLayer::new(
            "selected buildings",
            asset_fields(),
        )));
        let err = db
            .update_attribute_batch("cost", &[Value::Float64(1.0), Value::Float64(2.0)])
            .unwrap_err();
        match &err {
            ComponentDbError::CountMismatch {
                expected,
                found,
                context,
            } => {
                assert_eq!((*expected, *found), (2, 0));
                assert!(context.contains("out of sync"));
            }
            other => panic!("expected a count mismatch, got {other}"),
        }
    }

    #[test]
    fn test_offset_applied_once() {
        let (mut db, _) = populated_db(&[101, 102]);
        db.set_offset(100);
        db.select_features(&[1, 2].into_iter().collect()).unwrap();
        assert!(db.selected_ids().contains(&101));
        assert_eq!(
            db.get_attribute_value(1, "name", Value::Null),
            Value::from("asset-101")
        );
    }

    #[test]
    fn test_deselect_shrinks_both_sides() {
        let (mut db, _) = populated_db(&[1, 2, 3]);
        db.select_features(&[1, 2, 3].into_iter().collect()).unwrap();
        db.deselect_features(&[2]).unwrap();
        assert_eq!(db.selected_count(), 2);
        assert_eq!(selected_row_count(&db), 2);
        assert!(!db.selected_ids().contains(&2));
    }

    #[test]
    fn test_clear_selection_keeps_layers() {
        let (mut db, _) = populated_db(&[1, 2, 3]);
        assert!(!db.is_empty());
        db.select_features(&[1, 2].into_iter().collect()).unwrap();
        db.clear_selection().unwrap();
        assert_eq!(db.selected_count(), 0);
        assert_eq!(selected_row_count(&db), 0);
        assert!(db.main_layer().is_some());

        // Selection works again after the reset
        db.select_feature(3).unwrap();
        assert_eq!(db.selected_count(), 1);
    }

    #[test]
    fn test_edit_session_passthrough() {
        let (db, _) = populated_db(&[1]);
        db.start_editing().unwrap();
        db.commit_changes().unwrap();

        let detached = ComponentDatabase::new("empty", Arc::new(CapturingHandler::new()));
        assert!(detached.start_editing().is_err());
    }

    #[test]
    fn test_clear_resets_everything() {
        let (mut db, _) = populated_db(&[1, 2]);
        db.set_offset(5);
        db.clear();
        assert!(db.is_empty());
        assert_eq!(db.selected_count(), 0);
        assert_eq!(db.offset(), 0);
        assert!(db.main_layer().is_none());
    }

    #[test]
    fn test_add_attributes_batch() {
        let (mut db, _) = populated_db(&[1, 2, 3]);
        db.select_features(&[1, 3].into_iter().collect()).unwrap();

        db.add_attributes_batch(
            &["damage_state".into(), "repair_cost".into()],
            &[
                vec![Value::Int64(2), Value::Float64(1500.0)],
                vec![Value::Int64(0), Value::Float64(0.0)],
            ],
        )
        .unwrap();

        assert_eq!(db.selected_count(), 2);
        assert_eq!(selected_row_count(&db), 2);

        let selected = db.selected_layer().unwrap();
        let layer = selected.read();
        assert_eq!(layer.field_index("damage_state"), Some(2));
        // Rows pair with values in ascending-id order
        let row = layer.get_feature(1).unwrap();
        assert_eq!(row.attribute(2), Some(&Value::Int64(2)));
        let row = layer.get_feature(3).unwrap();
        assert_eq!(row.attribute(3), Some(&Value::Float64(0.0)));
    }

    #[test]
    fn test_add_attributes_batch_count_mismatch() {
        let (mut db, _) = populated_db(&[1, 2, 3]);
        db.select_features(&[1, 2].into_iter().collect()).unwrap();

        let err = db
            .add_attributes_batch(&["z".into()], &[vec![Value::Float64(1.0)]])
            .unwrap_err();
        assert!(matches!(err, ComponentDbError::CountMismatch { .. }));
        // Working table untouched
        assert_eq!(selected_row_count(&db), 2);
        let selected = db.selected_layer().unwrap();
        assert!(selected.read().field_index("z").is_none());
    }

    #[test]
    fn test_add_attributes_batch_ragged_rows() {
        let (mut db, _) = populated_db(&[1, 2]);
        db.select_features(&[1, 2].into_iter().collect()).unwrap();
        let err = db
            .add_attributes_batch(
                &["z".into()],
                &[vec![Value::Int64(1)], vec![Value::Int64(2), Value::Int64(3)]],
            )
            .unwrap_err();
        assert!(matches!(err, ComponentDbError::InvalidArgument(_)));
        assert_eq!(selected_row_count(&db), 2);
    }

    #[test]
    fn test_update_attribute_batch() {
        let (mut db, _) = populated_db(&[1, 2, 3, 4, 5]);
        db.select_features(&[2, 4].into_iter().collect()).unwrap();

        db.update_attribute_batch("cost", &[Value::Float64(10.0), Value::Float64(20.0)])
            .unwrap();

        let selected = db.selected_layer().unwrap();
        let layer = selected.read();
        assert_eq!(
            layer.get_feature(2).unwrap().attribute(1),
            Some(&Value::Float64(10.0))
        );
        assert_eq!(
            layer.get_feature(4).unwrap().attribute(1),
            Some(&Value::Float64(20.0))
        );
    }

    #[test]
    fn test_update_attribute_batch_unknown_field() {
        let (mut db, _) = populated_db(&[1, 2]);
        db.select_features(&[1, 2].into_iter().collect()).unwrap();
        let err = db
            .update_attribute_batch("nope", &[Value::Null, Value::Null])
            .unwrap_err();
        assert!(matches!(err, ComponentDbError::FieldNotFound(name) if name == "nope"));
    }

    #[test]
    fn test_update_attribute_mirrors_selection() {
        let (mut db, _) = populated_db(&[1, 2, 3]);
        db.select_features(&[2].into_iter().collect()).unwrap();

        assert!(db.update_attribute(2, "cost", Value::Float64(99.0)));
        assert_eq!(
            db.get_attribute_value(2, "cost", Value::Null),
            Value::Float64(99.0)
        );
        let selected = db.selected_layer().unwrap();
        assert_eq!(
            selected.read().get_feature(2).unwrap().attribute(1),
            Some(&Value::Float64(99.0))
        );

        // Not selected: main-layer update alone still succeeds
        assert!(db.update_attribute(3, "cost", Value::Float64(7.0)));
        assert!(selected.read().get_feature(3).is_none());

        // Unknown field or id fail silently
        assert!(!db.update_attribute(2, "nope", Value::Null));
        assert!(!db.update_attribute(42, "cost", Value::Null));
    }

    #[test]
    fn test_get_attribute_value_total() {
        let (db, _) = populated_db(&[1]);
        assert_eq!(
            db.get_attribute_value(1, "name", Value::Null),
            Value::from("asset-1")
        );
        assert_eq!(
            db.get_attribute_value(77, "name", Value::from("fallback")),
            Value::from("fallback")
        );
        assert_eq!(
            db.get_attribute_value(1, "missing", Value::Int64(-1)),
            Value::Int64(-1)
        );

        let empty = ComponentDatabase::new("empty", Arc::new(CapturingHandler::new()));
        assert_eq!(
            empty.get_attribute_value(1, "name", Value::Bool(false)),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_layer_not_set_errors() {
        let handler = Arc::new(CapturingHandler::new());
        let mut db = ComponentDatabase::new("roads", handler);
        let err = db.select_feature(1).unwrap_err();
        assert!(matches!(err, ComponentDbError::LayerNotSet(_)));
        let err = db.select_features(&BTreeSet::new()).unwrap_err();
        assert!(matches!(err, ComponentDbError::LayerNotSet(_)));
    }
}
