use log::info;

use crate::display::RecordDisplay;
use crate::error::{ListError, StoreError};
use crate::state::data::SurveyRecord;
use crate::state::schema;
use crate::state::store::RecordStore;

/// Columns handed to list displays, in display order
pub const DISPLAY_COLUMNS: [&str; 7] = [
    schema::COLUMN_SITE_NAME,
    schema::COLUMN_DATE,
    schema::COLUMN_COORDINATES,
    schema::COLUMN_DESCRIPTION,
    schema::COLUMN_TERRAIN_TYPE,
    schema::COLUMN_OBSERVATIONS,
    schema::COLUMN_CONDITION,
];

/// Result of loading the saved entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Nothing saved yet
    Empty,
    /// Entries in ascending id order
    Records(Vec<SurveyRecord>),
}

/// Loads saved entries and hands them to a display
pub struct ListController<'a> {
    store: &'a RecordStore,
}

impl<'a> ListController<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    pub fn load_all(&self) -> Result<Listing, StoreError> {
        let records = self.store.fetch_all()?;
        if records.is_empty() {
            info!("📭 No entries found");
            return Ok(Listing::Empty);
        }

        Ok(Listing::Records(records))
    }

    pub fn present<D: RecordDisplay>(&self, display: &mut D) -> Result<(), ListError> {
        let shown = match self.load_all()? {
            Listing::Empty => display.show_empty(),
            Listing::Records(records) => display.show(&records),
        };
        shown.map_err(ListError::Display)
    }
}
