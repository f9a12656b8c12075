use thiserror::Error;

use carshop_core::DomainError;

use crate::route::Route;

pub type StoreResult<T> = Result<T, StoreError>;

/// Inventory store operation error.
///
/// Wraps domain failures (validation, missing records, stock) next to the
/// infrastructure ones (routing, schema, SQLite).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("unknown route: {0}")]
    UnknownRoute(String),

    #[error("{operation} is not supported for {route}")]
    UnsupportedRoute {
        operation: &'static str,
        route: Route,
    },

    #[error("unsupported schema version {found} (expected {expected})")]
    SchemaVersion { found: i64, expected: i64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            StoreError::Domain(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.domain().is_some_and(DomainError::is_not_found)
    }

    /// Field named by an `InvalidArgument` failure.
    pub fn invalid_field(&self) -> Option<&'static str> {
        self.domain().and_then(DomainError::field)
    }
}
