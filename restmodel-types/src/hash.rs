//! Synthetic entity identity.
//!
//! An entity without a server-assigned primary key is still reconciled in
//! collections through its hash, generated once when the entity is built.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier name reported for entities that fall back to their hash.
pub const HASH_KEY: &str = "$hash";

/// Locally generated identity of an entity that has no primary key yet.
/// Uses UUID v4: it only has to be unique, not ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityHash(Uuid);

impl EntityHash {
    /// Generates a fresh random hash.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a hash from its string form.
    pub fn parse(s: &str) -> crate::Result<Self> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// The hash as a JSON string value, the form used in identity criteria.
    pub fn to_value(&self) -> Value {
        Value::String(self.0.to_string())
    }
}

impl Default for EntityHash {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityHash {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
