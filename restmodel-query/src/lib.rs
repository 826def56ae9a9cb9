//! Query builder for restmodel.
//!
//! A [`Query`] composes a resource URL (from an explicit path or a
//! [`ResourceDescriptor`](restmodel_types::ResourceDescriptor)), optional
//! path expansion, default criteria and pagination, and hands the result to
//! an [`ApiContract`](restmodel_api::ApiContract).

mod pagination;
mod query;

pub use pagination::{DEFAULT_PAGINATE_PER_PAGE, Pagination};
pub use query::Query;
