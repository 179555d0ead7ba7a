/// State management module
///
/// This module handles persisted survey state:
/// - Shared data structures (data.rs)
/// - Table layout and schema version (schema.rs)
/// - The SQLite record store (store.rs)

pub mod data;
pub mod schema;
pub mod store;
