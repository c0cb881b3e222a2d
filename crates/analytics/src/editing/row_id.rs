//! Row identity for edit sessions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::constants::TEMP_ID_PREFIX;
use crate::errors::{Error, ValidationError};

/// Identity of a row in an edit session.
///
/// Only `Persisted` ids are ever handed to the backing store. `Temporary` ids
/// belong to drafts created in the session; their textual form is
/// `temp-<uuid>` so they survive a round trip through string-keyed grids.
/// Store ids must not start with the temporary prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowId {
    Temporary(Uuid),
    Persisted(String),
}

impl RowId {
    /// Generates a fresh temporary id.
    pub fn temporary() -> Self {
        RowId::Temporary(Uuid::new_v4())
    }

    pub fn persisted(id: impl Into<String>) -> Self {
        RowId::Persisted(id.into())
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, RowId::Temporary(_))
    }

    /// Returns the store id, or `None` for a draft.
    pub fn as_persisted(&self) -> Option<&str> {
        match self {
            RowId::Persisted(id) => Some(id),
            RowId::Temporary(_) => None,
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Temporary(token) => write!(f, "{}{}", TEMP_ID_PREFIX, token),
            RowId::Persisted(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for RowId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()).into());
        }
        match s.strip_prefix(TEMP_ID_PREFIX) {
            Some(token) => Ok(RowId::Temporary(Uuid::parse_str(token)?)),
            None => Ok(RowId::Persisted(s.to_string())),
        }
    }
}

impl From<&str> for RowId {
    /// Wraps a known store id. Use `parse` for ids coming back from a grid.
    fn from(id: &str) -> Self {
        RowId::Persisted(id.to_string())
    }
}

impl Serialize for RowId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RowId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
