//! Component databases and their registry

pub mod component_db;
pub mod manager;

pub use component_db::ComponentDatabase;
pub use manager::DatabaseManager;
