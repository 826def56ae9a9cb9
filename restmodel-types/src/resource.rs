//! Per-entity-type resource configuration.

use crate::case::to_kebab_case;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Primary key field used when a descriptor does not name one.
pub const DEFAULT_ID_KEY: &str = "id";

/// Describes how one entity type maps onto the REST backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Resource path segment without the leading slash (e.g. `posts`).
    pub resource: String,
    /// Attribute holding the server-assigned primary key.
    #[serde(default = "default_id_key")]
    pub id_key: String,
    /// Attributes kept on the entity but never serialized.
    /// Keys starting with `$` are always internal.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub internal_keys: BTreeSet<String>,
}

fn default_id_key() -> String {
    DEFAULT_ID_KEY.to_string()
}

impl ResourceDescriptor {
    /// Creates a descriptor for an explicitly named resource.
    pub fn new(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self {
            resource: resource.trim_start_matches('/').to_string(),
            id_key: default_id_key(),
            internal_keys: BTreeSet::new(),
        }
    }

    /// Derives the resource from a type name: kebab-cased and naively
    /// pluralized, so `BlogPost` becomes `blog-posts`.
    pub fn from_type_name(type_name: &str) -> Self {
        Self::new(format!("{}s", to_kebab_case(type_name)))
    }

    /// Parses a descriptor from its JSON configuration form.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Overrides the primary key attribute.
    #[must_use]
    pub fn with_id_key(mut self, id_key: impl Into<String>) -> Self {
        self.id_key = id_key.into();
        self
    }

    /// Declares an attribute as internal (stored but not serialized).
    #[must_use]
    pub fn with_internal_key(mut self, key: impl Into<String>) -> Self {
        self.internal_keys.insert(key.into());
        self
    }

    /// The resource URL path, e.g. `/posts`.
    pub fn path(&self) -> String {
        format!("/{}", self.resource)
    }

    /// Whether `key` is excluded from serialization.
    pub fn is_internal(&self, key: &str) -> bool {
        key.starts_with('$') || self.internal_keys.contains(key)
    }
}
