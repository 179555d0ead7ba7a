/// Shared data structures for the survey state
///
/// These structs represent the data model that flows between
/// the database layer and the controllers.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Terrain categories offered for selection, in display order
pub const TERRAIN_TYPES: [&str; 8] = [
    "Plain",
    "Forest",
    "Mountain",
    "Rocky",
    "Sandy",
    "Wetland",
    "Agricultural",
    "Urban",
];

/// State of the surveyed site
///
/// Exactly one value applies to a saved record. `Unspecified` is used
/// when none of the three selectable conditions was checked.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Condition {
    GoodCondition,
    Damaged,
    Average,
    #[default]
    Unspecified,
}

impl Condition {
    /// Text stored in the `condition` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::GoodCondition => "GoodCondition",
            Condition::Damaged => "Damaged",
            Condition::Average => "Average",
            Condition::Unspecified => "Unspecified",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when condition text is not one of the known names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown condition: {0:?}")]
pub struct UnknownCondition(pub String);

impl FromStr for Condition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GoodCondition" => Ok(Condition::GoodCondition),
            "Damaged" => Ok(Condition::Damaged),
            "Average" => Ok(Condition::Average),
            "Unspecified" => Ok(Condition::Unspecified),
            other => Err(UnknownCondition(other.to_string())),
        }
    }
}

impl ToSql for Condition {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Condition {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: UnknownCondition| FromSqlError::Other(Box::new(e)))
    }
}

/// A record ready to be inserted (no id yet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSurveyRecord {
    pub site_name: String,
    pub date: String,
    /// "Latitude: <lat>\nLongitude: <lon>", or empty when capture was skipped
    pub coordinates: String,
    pub description: String,
    pub terrain_type: String,
    pub observations: String,
    pub condition: Condition,
}

/// Represents a single saved survey record
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SurveyRecord {
    /// Store-assigned ID, exposed as `_id` to display collaborators
    #[serde(rename = "_id")]
    pub id: i64,
    pub site_name: String,
    /// Free-form date text as entered
    pub date: String,
    pub coordinates: String,
    pub description: String,
    pub terrain_type: String,
    pub observations: String,
    pub condition: Condition,
}

impl SurveyRecord {
    /// Attach a store-assigned id to a new record
    pub fn from_new(id: i64, record: NewSurveyRecord) -> Self {
        Self {
            id,
            site_name: record.site_name,
            date: record.date,
            coordinates: record.coordinates,
            description: record.description,
            terrain_type: record.terrain_type,
            observations: record.observations,
            condition: record.condition,
        }
    }
}
