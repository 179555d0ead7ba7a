//! Database schema definitions for the survey store
//!
//! Table and column names plus the DDL used by the record store.
//! The schema version is tracked in `PRAGMA user_version`.

/// Current schema version. Any change here wipes existing records on open.
pub const SCHEMA_VERSION: i32 = 1;

/// Table holding survey entries
pub const TABLE_ENTRIES: &str = "entries";

pub const COLUMN_SITE_NAME: &str = "site_name";
pub const COLUMN_DATE: &str = "date";
pub const COLUMN_COORDINATES: &str = "coordinates";
pub const COLUMN_DESCRIPTION: &str = "description";
pub const COLUMN_TERRAIN_TYPE: &str = "terrain_type";
pub const COLUMN_OBSERVATIONS: &str = "observations";
pub const COLUMN_CONDITION: &str = "condition";

/// Row identity alias expected by list displays
pub const ROW_ID_ALIAS: &str = "_id";

/// Entries table; AUTOINCREMENT keeps ids from ever being reused
pub const CREATE_ENTRIES_TABLE: &str = "
CREATE TABLE IF NOT EXISTS entries (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    site_name       TEXT,
    date            TEXT,
    coordinates     TEXT,
    description     TEXT,
    terrain_type    TEXT,
    observations    TEXT,
    condition       TEXT
)";

pub const DROP_ENTRIES_TABLE: &str = "DROP TABLE IF EXISTS entries";

pub const INSERT_ENTRY: &str = "
INSERT INTO entries (site_name, date, coordinates, description, terrain_type, observations, condition)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

pub const SELECT_ALL_ENTRIES: &str = "
SELECT id AS _id, site_name, date, coordinates, description, terrain_type, observations, condition
FROM entries
ORDER BY id ASC";
