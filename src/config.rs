use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::location::{Permission, Position};

/// Settings loaded from environment variables (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Database file; `None` means the platform data directory.
    pub db_path: Option<PathBuf>,
    /// Position served by the static location provider.
    pub location: Option<Position>,
    /// Whether location access is granted (default: granted).
    pub location_permission: Permission,
    /// How long the CLI waits for a fix (default: 5000 ms).
    pub location_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                |
    /// |------------------------------|------------------------|
    /// | `SURVEY_DB_PATH`             | platform data dir      |
    /// | `SURVEY_LOCATION`            | unset (no fix)         |
    /// | `SURVEY_LOCATION_PERMISSION` | `granted`              |
    /// | `SURVEY_LOCATION_TIMEOUT_MS` | `5000`                 |
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("SURVEY_DB_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let location = match lookup("SURVEY_LOCATION").filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(raw.parse::<Position>().map_err(|e| ConfigError::Invalid {
                name: "SURVEY_LOCATION",
                reason: e.to_string(),
            })?),
            None => None,
        };

        let location_permission = match lookup("SURVEY_LOCATION_PERMISSION")
            .as_deref()
            .map(str::trim)
        {
            None | Some("") => Permission::Granted,
            Some(raw) if raw.eq_ignore_ascii_case("granted") => Permission::Granted,
            Some(raw) if raw.eq_ignore_ascii_case("denied") => Permission::Denied,
            Some(raw) => {
                return Err(ConfigError::Invalid {
                    name: "SURVEY_LOCATION_PERMISSION",
                    reason: format!("expected \"granted\" or \"denied\", got {:?}", raw),
                })
            }
        };

        let timeout_ms: u64 = lookup("SURVEY_LOCATION_TIMEOUT_MS")
            .unwrap_or_else(|| "5000".into())
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                name: "SURVEY_LOCATION_TIMEOUT_MS",
                reason: e.to_string(),
            })?;

        Ok(Self {
            db_path,
            location,
            location_permission,
            location_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
