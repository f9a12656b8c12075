//! Store configuration.
//!
//! Resolution order: explicit value (e.g. a CLI flag), then the
//! `CARSHOP_DATABASE` environment variable, then the per-user data directory.

use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};

/// Environment variable naming the database file (`:memory:` for in-memory).
pub const ENV_DATABASE: &str = "CARSHOP_DATABASE";

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "carshop.db";

const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// Private in-memory database, gone when the store is dropped.
    InMemory,
    File(PathBuf),
}

impl DatabaseLocation {
    /// Parse a user-supplied location (`:memory:` or a path).
    pub fn parse(value: &str) -> StoreResult<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(StoreError::Config("database location cannot be empty".to_string()));
        }
        if value == IN_MEMORY {
            return Ok(DatabaseLocation::InMemory);
        }
        Ok(DatabaseLocation::File(PathBuf::from(value)))
    }
}

impl core::fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DatabaseLocation::InMemory => f.write_str(IN_MEMORY),
            DatabaseLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database: DatabaseLocation,
    /// Create the database file (and its directory) when absent.
    pub create_if_missing: bool,
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseLocation::InMemory,
            create_if_missing: true,
        }
    }

    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            database: DatabaseLocation::File(path.as_ref().to_path_buf()),
            create_if_missing: true,
        }
    }

    /// Configuration from the process environment, falling back to the
    /// per-user data directory.
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let database = match lookup(ENV_DATABASE) {
            Some(value) => DatabaseLocation::parse(&value)?,
            None => DatabaseLocation::File(default_database_path()?),
        };

        Ok(Self {
            database,
            create_if_missing: true,
        })
    }

    /// Override the database location (e.g. from a command-line flag).
    pub fn with_database(mut self, value: &str) -> StoreResult<Self> {
        self.database = DatabaseLocation::parse(value)?;
        Ok(self)
    }
}

/// `{data_dir}/carshop/carshop.db`.
pub fn default_database_path() -> StoreResult<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or_else(|| {
            StoreError::Config(
                "failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share"
                    .to_string(),
            )
        })?;

    let mut path = base;
    path.push("carshop");
    path.push(DATABASE_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_value_selects_database() {
        let config = StoreConfig::from_lookup(|key| {
            (key == ENV_DATABASE).then(|| "/tmp/inventory.db".to_string())
        })
        .unwrap();
        assert_eq!(
            config.database,
            DatabaseLocation::File(PathBuf::from("/tmp/inventory.db"))
        );
    }

    #[test]
    fn memory_marker_selects_in_memory() {
        let config = StoreConfig::from_lookup(|_| Some(":memory:".to_string())).unwrap();
        assert_eq!(config.database, DatabaseLocation::InMemory);
    }

    #[test]
    fn blank_value_is_a_config_error() {
        let err = StoreConfig::from_lookup(|_| Some("  ".to_string())).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn explicit_override_wins() {
        let config = StoreConfig::in_memory().with_database("cars.db").unwrap();
        assert_eq!(config.database, DatabaseLocation::File(PathBuf::from("cars.db")));
        assert_eq!(config.database.to_string(), "cars.db");
    }

    #[test]
    fn default_path_ends_with_database_file() {
        if let Ok(path) = default_database_path() {
            assert!(path.ends_with("carshop/carshop.db"));
        }
    }
}
