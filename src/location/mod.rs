//! Best-effort device location
//!
//! A provider answers a "last known position" request at some later point
//! through a oneshot channel. The answer may be a fix, a failure, or it may
//! never come at all; callers must not block waiting for it.

use std::fmt;
use std::str::FromStr;

use log::debug;
use tokio::sync::oneshot;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Text stored in a record's `coordinates` field
    pub fn to_coordinates(&self) -> String {
        format!(
            "Latitude: {}\nLongitude: {}",
            format_degrees(self.latitude),
            format_degrees(self.longitude)
        )
    }
}

// Shortest round-trip decimal, never in exponent form, always with a
// fractional part ("5.0", "-6.83", "0.00001").
fn format_degrees(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        text + ".0"
    }
}

/// Error parsing a `lat,lon` pair
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParsePositionError {
    #[error("expected \"<latitude>,<longitude>\"")]
    Format,
    #[error("not a number: {0:?}")]
    Number(String),
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(String),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(String),
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s.split_once(',').ok_or(ParsePositionError::Format)?;
        let (lat, lon) = (lat.trim(), lon.trim());

        let latitude: f64 = lat
            .parse()
            .map_err(|_| ParsePositionError::Number(lat.to_string()))?;
        let longitude: f64 = lon
            .parse()
            .map_err(|_| ParsePositionError::Number(lon.to_string()))?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ParsePositionError::Latitude(lat.to_string()));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ParsePositionError::Longitude(lon.to_string()));
        }

        Ok(Position::new(latitude, longitude))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}",
            format_degrees(self.latitude),
            format_degrees(self.longitude)
        )
    }
}

/// Failure notification from a location provider
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// The provider has no fix to offer
    #[error("location unavailable")]
    Unavailable,
    #[error("location request failed: {0}")]
    Failed(String),
}

/// Outcome of the upstream permission check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    #[default]
    Granted,
    Denied,
}

/// Receiving end of a position request
pub type PendingPosition = oneshot::Receiver<Result<Position, LocationError>>;

/// Supplies the last known position on demand
///
/// Implementations return immediately and answer through the channel
/// whenever they can. Dropping the sender without answering is allowed.
pub trait LocationProvider {
    fn last_known_position(&self) -> PendingPosition;
}

/// Provider that answers at once with a fixed position, or with
/// [`LocationError::Unavailable`] when none is configured
#[derive(Debug, Clone, Default)]
pub struct StaticLocationProvider {
    position: Option<Position>,
}

impl StaticLocationProvider {
    pub fn new(position: Option<Position>) -> Self {
        Self { position }
    }
}

impl LocationProvider for StaticLocationProvider {
    fn last_known_position(&self) -> PendingPosition {
        let (tx, rx) = oneshot::channel();
        let answer = self.position.ok_or(LocationError::Unavailable);
        debug!("📍 Static provider answering {:?}", answer);
        // The receiver may already be gone; nobody is waiting then.
        let _ = tx.send(answer);
        rx
    }
}
