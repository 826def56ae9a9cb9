//! Transport layer for restmodel.
//!
//! - [`ApiContract`]: the transport seam every entity and query talks to
//! - [`HttpApi`]: reqwest implementation with wire/local key casing
//! - [`ApiError`]: classified failures (validation, unauthorized, not found,
//!   other responses, network, unclassified)
//! - [`ValidationError`] / [`PropertyCollectionError`]: per-field messages
//!   parsed from a 422 response
//! - [`mock::MockApi`]: scripted in-memory transport for tests

mod contract;
mod error;
mod http;
pub mod mock;
mod validation;

pub use contract::{ApiContract, HttpMethod, RequestConfig};
pub use error::{ApiError, ApiResult};
pub use http::{ApiConfig, HttpApi};
pub use validation::{PropertyCollectionError, PropertyError, ValidationError};
