//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a car record.
///
/// Assigned by the store on insert (SQLite rowid) and never reused or changed
/// afterwards. Opaque to callers beyond ordering and display.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(i64);

impl CarId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for CarId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for CarId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<CarId> for i64 {
    fn from(value: CarId) -> Self {
        value.0
    }
}

impl FromStr for CarId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|e| DomainError::invalid_id(format!("CarId: {e}")))?;
        if value < 0 {
            return Err(DomainError::invalid_id("CarId: must not be negative"));
        }
        Ok(Self(value))
    }
}
