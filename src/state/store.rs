use log::{debug, info, warn};
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};

use super::data::{NewSurveyRecord, SurveyRecord};
use super::schema::{self, SCHEMA_VERSION};
use crate::error::StoreError;

/// The RecordStore manages the SQLite survey database.
/// It owns the single `entries` table and the insert/fetch operations on it.
pub struct RecordStore {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl RecordStore {
    /// Open or create the store at `db_path` with the current schema version.
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        Self::open_with_version(db_path, SCHEMA_VERSION)
    }

    /// Open or create the store, bringing it to `version`.
    ///
    /// A fresh file gets the schema created. A file recorded at any other
    /// version goes through [`RecordStore::migrate`], which wipes it.
    /// `version` must be at least 1.
    pub fn open_with_version(db_path: &Path, version: i32) -> Result<Self, StoreError> {
        check_version(version)?;

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        info!("📁 Database opened at: {}", db_path.display());

        let store = RecordStore {
            conn,
            db_path: Some(db_path.to_path_buf()),
        };
        store.prepare(version)?;

        Ok(store)
    }

    /// Open a throwaway in-memory store with the current schema version.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = RecordStore {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        store.prepare(SCHEMA_VERSION)?;

        Ok(store)
    }

    /// Default database location:
    /// - Linux: ~/.local/share/site-survey/survey.db
    /// - macOS: ~/Library/Application Support/site-survey/survey.db
    /// - Windows: %APPDATA%\site-survey\survey.db
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(StoreError::NoDataDir)?;

        path.push("site-survey");
        path.push("survey.db");
        Ok(path)
    }

    fn prepare(&self, version: i32) -> Result<(), StoreError> {
        let current = self.schema_version()?;

        if current == 0 {
            self.initialize()?;
            self.set_schema_version(version)?;
        } else if current != version {
            self.migrate(current, version)?;
        } else {
            self.initialize()?;
        }

        Ok(())
    }

    /// Create the entries table if it does not exist yet.
    /// Safe to call every time the store is opened.
    pub fn initialize(&self) -> Result<(), StoreError> {
        self.conn.execute(schema::CREATE_ENTRIES_TABLE, [])?;
        debug!("✅ Schema for '{}' initialized", schema::TABLE_ENTRIES);
        Ok(())
    }

    /// Move the schema from `old_version` to `new_version`.
    ///
    /// Any version change drops the entries table and recreates it empty.
    /// Nothing is carried over.
    pub fn migrate(&self, old_version: i32, new_version: i32) -> Result<(), StoreError> {
        check_version(new_version)?;
        if old_version == new_version {
            return Ok(());
        }

        let dropped = self.recreate()?;
        self.set_schema_version(new_version)?;

        warn!(
            "🔄 Schema migrated v{} -> v{}: dropped {} entries",
            old_version, new_version, dropped
        );
        Ok(())
    }

    /// Wipe every entry and recreate the empty table, keeping the version.
    pub fn reset(&self) -> Result<i64, StoreError> {
        let dropped = self.recreate()?;
        warn!("🗑️  Store reset: dropped {} entries", dropped);
        Ok(dropped)
    }

    // Drop and recreate the entries table; returns how many rows were lost.
    fn recreate(&self) -> Result<i64, StoreError> {
        let dropped = if self.table_exists()? { self.count()? } else { 0 };

        self.conn.execute(schema::DROP_ENTRIES_TABLE, [])?;
        self.conn.execute(schema::CREATE_ENTRIES_TABLE, [])?;
        Ok(dropped)
    }

    /// Version recorded in `PRAGMA user_version` (0 for a fresh database)
    pub fn schema_version(&self) -> Result<i32, StoreError> {
        let version = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(version)
    }

    fn set_schema_version(&self, version: i32) -> Result<(), StoreError> {
        self.conn.pragma_update(None, "user_version", version)?;
        Ok(())
    }

    fn table_exists(&self) -> Result<bool, StoreError> {
        let found: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [schema::TABLE_ENTRIES],
            |row| row.get(0),
        )?;
        Ok(found > 0)
    }

    /// Get the path to the database file (`None` when in memory)
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Get a count of stored entries
    pub fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert a new entry. Returns the store-assigned id.
    ///
    /// Field contents are not checked here; callers validate first.
    pub fn insert(&self, record: &NewSurveyRecord) -> Result<i64, StoreError> {
        self.conn.execute(
            schema::INSERT_ENTRY,
            params![
                record.site_name,
                record.date,
                record.coordinates,
                record.description,
                record.terrain_type,
                record.observations,
                record.condition,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!("💾 Saved entry {} ({})", id, record.site_name);
        Ok(id)
    }

    /// Get all entries in insertion order (ascending id)
    pub fn fetch_all(&self) -> Result<Vec<SurveyRecord>, StoreError> {
        if !self.table_exists()? {
            return Err(StoreError::NotInitialized);
        }

        let mut stmt = self.conn.prepare(schema::SELECT_ALL_ENTRIES)?;
        let records = stmt
            .query_map([], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        debug!("📋 Fetched {} entries", records.len());
        Ok(records)
    }
}

fn check_version(version: i32) -> Result<(), StoreError> {
    if version < 1 {
        return Err(StoreError::InvalidVersion(version));
    }
    Ok(())
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<SurveyRecord> {
    Ok(SurveyRecord {
        id: row.get(schema::ROW_ID_ALIAS)?,
        site_name: text_column(row, schema::COLUMN_SITE_NAME)?,
        date: text_column(row, schema::COLUMN_DATE)?,
        coordinates: text_column(row, schema::COLUMN_COORDINATES)?,
        description: text_column(row, schema::COLUMN_DESCRIPTION)?,
        terrain_type: text_column(row, schema::COLUMN_TERRAIN_TYPE)?,
        observations: text_column(row, schema::COLUMN_OBSERVATIONS)?,
        condition: row.get(schema::COLUMN_CONDITION)?,
    })
}

// Columns are nullable in the schema; NULL reads back as empty text.
fn text_column(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

// Implement Debug for better error messages
impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}
