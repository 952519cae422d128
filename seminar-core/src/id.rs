//! Record identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a stored record.
///
/// The backend issues integers; records created while offline get a UUID.
/// Two ids are equal when their canonical string forms are equal, so `7`
/// and `"7"` refer to the same record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Fresh client-side id for a record saved only to the local mirror.
    pub fn generate() -> Self {
        RecordId::Text(Uuid::new_v4().to_string())
    }

    pub fn is_local(&self) -> bool {
        matches!(self, RecordId::Text(s) if Uuid::parse_str(s).is_ok())
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RecordId::Number(a), RecordId::Number(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl Eq for RecordId {}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RecordId::from(s))
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(s.to_string()),
        }
    }
}
