/// Error types shared across the crate
///
/// Each error is terminal at the boundary where it happens: the CLI turns
/// it into one user-visible message and never retries on its own.

use crate::controller::entry::FormField;

/// Failures of the record store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The entries table is missing; the store was never initialized
    #[error("record store is not initialized")]
    NotInitialized,

    #[error("could not determine a data directory for the database")]
    NoDataDir,

    /// Schema versions start at 1; 0 marks a database that was never set up
    #[error("invalid schema version {0}: versions start at 1")]
    InvalidVersion(i32),
}

/// Why a submitted entry was not saved
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// A required field is empty; the store was not touched
    #[error("{field}: {message}")]
    Validation {
        field: FormField,
        message: &'static str,
    },

    /// The store rejected the write
    #[error("could not save the entry: {0}")]
    Persistence(#[from] StoreError),
}

/// Why the saved entries could not be listed
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    /// Loading from the store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The store was read but the display could not write the listing
    #[error("could not display entries: {0}")]
    Display(#[source] std::io::Error),
}

/// Invalid configuration values
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}
