//! Core type definitions for restmodel.
//!
//! This crate holds the stateless pieces every other restmodel crate leans on:
//! - Casing helpers and recursive wire/local key transforms
//! - Synthetic entity identity ([`EntityHash`])
//! - Resource descriptors (resource path, primary key, internal keys)
//! - Criteria matching and JavaScript-style truthiness for JSON values
//!
//! Nothing here performs I/O or holds shared state.

mod case;
mod criteria;
mod hash;
mod resource;
mod transform;

pub use case::{to_camel_case, to_kebab_case, to_snake_case};
pub use criteria::{is_truthy, object_meets_criteria};
pub use hash::{EntityHash, HASH_KEY};
pub use resource::{DEFAULT_ID_KEY, ResourceDescriptor};
pub use transform::{UNTRANSFORMED_KEY, to_local_case, to_wire_case, untransformed};

/// A plain JSON object: the shape of every payload crossing the transport.
pub type Dao = serde_json::Map<String, serde_json::Value>;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid entity hash: {0}")]
    InvalidHash(#[from] uuid::Error),
}
