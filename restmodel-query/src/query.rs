use crate::pagination::{DEFAULT_PAGINATE_PER_PAGE, Pagination};
use restmodel_api::{ApiContract, ApiResult, RequestConfig};
use restmodel_types::{Dao, ResourceDescriptor};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Builds one request against a resource.
///
/// Builder methods consume and return the query; request methods borrow
/// it, so a configured query can be issued more than once.
#[derive(Clone)]
pub struct Query {
    api: Arc<dyn ApiContract>,
    resource: String,
    criteria: Dao,
    payload: Value,
    pagination: Option<Pagination>,
    config: Option<RequestConfig>,
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("resource", &self.resource)
            .field("criteria", &self.criteria)
            .field("payload", &self.payload)
            .field("pagination", &self.pagination)
            .finish_non_exhaustive()
    }
}

impl Query {
    /// Creates a query with no resource, criteria or payload.
    pub fn new(api: Arc<dyn ApiContract>) -> Self {
        Self {
            api,
            resource: String::new(),
            criteria: Dao::new(),
            payload: Value::Object(Dao::new()),
            pagination: None,
            config: None,
        }
    }

    /// Targets an explicit path, used verbatim (e.g. `/resource`).
    #[must_use]
    pub fn to(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    /// Targets the path of an entity type.
    #[must_use]
    pub fn to_resource(self, descriptor: &ResourceDescriptor) -> Self {
        self.to(descriptor.path())
    }

    /// Appends a path segment to the current resource.
    #[must_use]
    pub fn expand_url(mut self, segment: impl fmt::Display) -> Self {
        let segment = segment.to_string();
        self.resource = self.make_url(Some(&segment));
        self
    }

    /// Default criteria sent by [`get`](Self::get) and
    /// [`paginate`](Self::paginate).
    #[must_use]
    pub fn set_criteria(mut self, criteria: Dao) -> Self {
        self.criteria = criteria;
        self
    }

    #[must_use]
    pub fn set_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Default body sent by `post`, `put` and `delete`.
    #[must_use]
    pub fn set_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Per-call transport options for every request of this query.
    #[must_use]
    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// The current resource path.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn criteria(&self) -> &Dao {
        &self.criteria
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// The resource path, with `partial` appended when it is non-empty.
    pub fn make_url(&self, partial: Option<&str>) -> String {
        match partial.filter(|p| !p.is_empty()) {
            Some(partial) => format!("{}/{}", self.resource, partial),
            None => self.resource.clone(),
        }
    }

    /// GET. Without an explicit payload, criteria merged with pagination
    /// are sent.
    pub async fn get(&self, payload: Option<Value>, url: Option<&str>) -> ApiResult<Value> {
        let payload = payload.unwrap_or_else(|| {
            let mut merged = self.criteria.clone();
            if let Some(pagination) = &self.pagination {
                merged.extend(pagination.to_dao());
            }
            Value::Object(merged)
        });
        let url = self.url_or_resource(url);
        self.api.get(&url, Some(&payload), self.config.as_ref()).await
    }

    /// GET, reduced to its first element when the response is an array.
    /// An empty array or a null body yields `None`.
    pub async fn first(&self) -> ApiResult<Option<Value>> {
        let result = self.get(None, None).await?;
        Ok(match result {
            Value::Array(items) => items.into_iter().next(),
            Value::Null => None,
            other => Some(other),
        })
    }

    /// GET one page; criteria are merged with `page` / `perPage`.
    pub async fn paginate(&self, page: u32, per_page: u32) -> ApiResult<Value> {
        debug!(resource = %self.resource, page, per_page, "paginating");
        let mut payload = self.criteria.clone();
        payload.extend(Pagination::new(page, per_page).to_dao());
        self.get(Some(Value::Object(payload)), None).await
    }

    /// The first page at the default page size.
    pub async fn first_page(&self) -> ApiResult<Value> {
        self.paginate(1, DEFAULT_PAGINATE_PER_PAGE).await
    }

    pub async fn post(&self, payload: Option<Value>, url: Option<&str>) -> ApiResult<Value> {
        let payload = payload.unwrap_or_else(|| self.payload.clone());
        let url = self.url_or_resource(url);
        self.api.post(&url, Some(&payload), self.config.as_ref()).await
    }

    pub async fn put(&self, payload: Option<Value>, url: Option<&str>) -> ApiResult<Value> {
        let payload = payload.unwrap_or_else(|| self.payload.clone());
        let url = self.url_or_resource(url);
        self.api.put(&url, Some(&payload), self.config.as_ref()).await
    }

    pub async fn delete(&self, payload: Option<Value>, url: Option<&str>) -> ApiResult<Value> {
        let payload = payload.unwrap_or_else(|| self.payload.clone());
        let url = self.url_or_resource(url);
        self.api.delete(&url, Some(&payload), self.config.as_ref()).await
    }

    fn url_or_resource(&self, url: Option<&str>) -> String {
        url.map_or_else(|| self.make_url(None), str::to_string)
    }
}
