//! Entities and collections for restmodel.
//!
//! An [`Entity`] is the in-memory state of one REST resource instance:
//! freeform [`Attribute`]s, a primary key or synthetic hash for identity,
//! snapshot/reset, validation state, and `store` / `update` / `destroy` /
//! `find` actions that each coalesce concurrent calls into one request.
//!
//! A [`Collection`] keeps entities ordered and reconciles them by identity.

mod attribute;
mod collection;
mod entity;
mod error;

pub use attribute::Attribute;
pub use collection::{Collection, Criterion};
pub use entity::{Entity, FindTarget, MergeSource};
pub use error::{ModelError, ModelResult};

pub use restmodel_api::{ApiContract, ApiError, ValidationError};
pub use restmodel_types::{Dao, EntityHash, HASH_KEY, ResourceDescriptor};
