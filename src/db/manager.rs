//! Registry of component databases, one per asset class

use super::ComponentDatabase;
use crate::output::StatusHandler;
use ahash::AHashMap;
use std::sync::Arc;

/// Owns the per-component-type databases for a loaded workflow
///
/// The manager hands every database the same status handler, so all
/// selection and import messages land in one output stream.
pub struct DatabaseManager {
    databases: AHashMap<String, ComponentDatabase>,
    handler: Arc<dyn StatusHandler>,
}

impl DatabaseManager {
    pub fn new(handler: Arc<dyn StatusHandler>) -> Self {
        Self {
            databases: AHashMap::new(),
            handler,
        }
    }

    /// Get the database for a component type, creating it on first use
    pub fn get_or_create(&mut self, component_type: &str) -> &mut ComponentDatabase {
        self.databases
            .entry(component_type.to_string())
            .or_insert_with(|| {
                ComponentDatabase::new(component_type, self.handler.clone())
            })
    }

    pub fn get(&self, component_type: &str) -> Option<&ComponentDatabase> {
        self.databases.get(component_type)
    }

    pub fn get_mut(&mut self, component_type: &str) -> Option<&mut ComponentDatabase> {
        self.databases.get_mut(component_type)
    }

    /// Drop the database for one component type
    pub fn remove(&mut self, component_type: &str) -> Option<ComponentDatabase> {
        self.databases.remove(component_type)
    }

    /// Registered component types, in no particular order
    pub fn component_types(&self) -> impl Iterator<Item = &str> {
        self.databases.keys().map(String::as_str)
    }

    /// Reset every database, as when a new workflow input is loaded
    pub fn clear_all(&mut self) {
        for db in self.databases.values_mut() {
            db.clear();
        }
    }
}
