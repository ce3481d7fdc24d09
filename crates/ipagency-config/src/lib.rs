//! # ipagency-config
//!
//! Layered settings for the configuration import tooling, loaded with figment.
//!
//! Sources (in priority order, highest wins):
//! 1. Environment variables (`IPAGENCY_*` prefix, `__` as separator)
//! 2. `ipagency.toml` in the working directory
//! 3. Built-in defaults
//!
//! `IPAGENCY_DATABASE_PATH` maps to `database_path`,
//! `IPAGENCY_TABLES__USERS__TIMESTAMPS` maps to `tables.users.timestamps`.
//!
//! ```no_run
//! use ipagency_config::Settings;
//!
//! let settings = Settings::load_with_dotenv().expect("settings");
//! println!("importing from {}", settings.source_dir.display());
//! ```

mod error;

pub use error::ConfigError;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Project-local settings file name
pub const SETTINGS_FILE: &str = "ipagency.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "IPAGENCY_";

/// How a table's `created_at`/`updated_at` columns are stamped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampMode {
    Now,
    Fixed,
}

impl std::str::FromStr for TimestampMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "now" => Ok(TimestampMode::Now),
            "fixed" => Ok(TimestampMode::Fixed),
            other => Err(ConfigError::InvalidValue {
                field: "timestamps".to_string(),
                reason: format!("expected 'now' or 'fixed', got '{}'", other),
            }),
        }
    }
}

/// Per-table overrides (`[tables.<name>]`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TableOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<TimestampMode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Directory holding one spreadsheet per table
    pub source_dir: PathBuf,
    /// Actor stamped into `created_by`/`updated_by` when a row has none
    pub default_actor_id: i64,
    /// Literal used by the `fixed` timestamp mode
    pub fixed_timestamp: String,
    /// Logging profile name (`development`, `production`, `test`)
    pub log_profile: String,
    #[serde(default)]
    pub tables: BTreeMap<String, TableOverride>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("ipagency.db"),
            source_dir: PathBuf::from("database/config"),
            default_actor_id: 1,
            fixed_timestamp: "2020-01-01 00:00:00".to_string(),
            log_profile: "development".to_string(),
            tables: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, `ipagency.toml` and the environment.
    ///
    /// Does NOT read `.env`; use [`Settings::load_with_dotenv`] for that.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load `.env` from the working directory, then [`Settings::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // A missing .env is fine.
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        Self::figment_with_file(SETTINGS_FILE)
    }

    /// Same chain with an explicit settings file
    pub fn figment_with_file(path: impl AsRef<Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let path = path.as_ref();
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Timestamp override configured for `table`, if any
    pub fn table_timestamps(&self, table: &str) -> Option<TimestampMode> {
        self.tables.get(table).and_then(|t| t.timestamps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.source_dir, PathBuf::from("database/config"));
        assert_eq!(settings.default_actor_id, 1);
        assert_eq!(settings.fixed_timestamp, "2020-01-01 00:00:00");
        assert!(settings.tables.is_empty());
    }

    #[test]
    fn timestamp_mode_parses() {
        assert_eq!("now".parse::<TimestampMode>().unwrap(), TimestampMode::Now);
        assert_eq!("FIXED".parse::<TimestampMode>().unwrap(), TimestampMode::Fixed);
        assert!("later".parse::<TimestampMode>().is_err());
    }

    #[test]
    fn table_override_lookup() {
        let mut settings = Settings::default();
        settings.tables.insert(
            "users".to_string(),
            TableOverride {
                timestamps: Some(TimestampMode::Now),
            },
        );
        assert_eq!(settings.table_timestamps("users"), Some(TimestampMode::Now));
        assert_eq!(settings.table_timestamps("roles"), None);
    }
}
