//! The entity: an in-memory view of one REST resource instance.

use crate::attribute::Attribute;
use crate::collection::Collection;
use crate::error::{ModelError, ModelResult};
use parking_lot::RwLock;
use restmodel_api::{ApiContract, ApiError, ApiResult, ValidationError};
use restmodel_executor::{Flight, SingleFlight};
use restmodel_query::Query;
use restmodel_types::{Dao, EntityHash, HASH_KEY, ResourceDescriptor, is_truthy, object_meets_criteria};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// What [`Entity::find`] looks up.
#[derive(Debug, Clone, PartialEq)]
pub enum FindTarget {
    /// `GET /<resource>/<id>`.
    Id(Value),
    /// `GET /<resource>` with the criteria as query parameters; the first
    /// element of the response is taken.
    Criteria(Dao),
}

impl From<Value> for FindTarget {
    fn from(id: Value) -> Self {
        FindTarget::Id(id)
    }
}

impl From<i64> for FindTarget {
    fn from(id: i64) -> Self {
        FindTarget::Id(Value::from(id))
    }
}

impl From<u64> for FindTarget {
    fn from(id: u64) -> Self {
        FindTarget::Id(Value::from(id))
    }
}

impl From<&str> for FindTarget {
    fn from(id: &str) -> Self {
        FindTarget::Id(Value::String(id.to_string()))
    }
}

impl From<String> for FindTarget {
    fn from(id: String) -> Self {
        FindTarget::Id(Value::String(id))
    }
}

impl From<Dao> for FindTarget {
    fn from(criteria: Dao) -> Self {
        FindTarget::Criteria(criteria)
    }
}

/// Data accepted by [`Entity::merge`].
#[derive(Debug, Clone, Copy)]
pub enum MergeSource<'a> {
    /// Another entity: its plain representation and its hash are imported.
    Entity(&'a Entity),
    /// Plain data, deep-copied on the way in.
    Data(&'a Dao),
}

impl<'a> From<&'a Entity> for MergeSource<'a> {
    fn from(entity: &'a Entity) -> Self {
        MergeSource::Entity(entity)
    }
}

impl<'a> From<&'a Dao> for MergeSource<'a> {
    fn from(data: &'a Dao) -> Self {
        MergeSource::Data(data)
    }
}

type ActionFlight = SingleFlight<ModelResult<Value>>;

struct EntityState {
    attributes: BTreeMap<String, Attribute>,
    hash: EntityHash,
    errors: ValidationError,
    snapshot: Option<Dao>,
}

struct EntityInner {
    descriptor: ResourceDescriptor,
    api: Arc<dyn ApiContract>,
    state: RwLock<EntityState>,
    storing: ActionFlight,
    updating: ActionFlight,
    destroying: ActionFlight,
    finding: ActionFlight,
}

/// An in-memory copy of one remote resource.
///
/// Attributes are freeform. The entity is identified by the attribute
/// named by its descriptor's `id_key`; until that is set, a hash generated
/// at construction stands in for it.
///
/// Every method takes `&self`. Network actions (`store`, `update`,
/// `destroy`, `find`) each run through their own single-flight guard:
/// concurrent calls to the same action share one request and its result.
/// `update` and `destroy` first wait for a pending `store` or `find`.
///
/// `Clone` is deep: the copy has the same attributes and identity but its
/// own state and guards.
pub struct Entity {
    inner: Arc<EntityInner>,
}

impl Entity {
    /// Creates an empty entity of the given resource type.
    pub fn new(api: Arc<dyn ApiContract>, descriptor: ResourceDescriptor) -> Self {
        Self {
            inner: Arc::new(EntityInner {
                descriptor,
                api,
                state: RwLock::new(EntityState {
                    attributes: BTreeMap::new(),
                    hash: EntityHash::new(),
                    errors: ValidationError::new(),
                    snapshot: None,
                }),
                storing: SingleFlight::new("store"),
                updating: SingleFlight::new("update"),
                destroying: SingleFlight::new("destroy"),
                finding: SingleFlight::new("find"),
            }),
        }
    }

    /// Creates an entity and maps `data` into it.
    pub fn from_dao(api: Arc<dyn ApiContract>, descriptor: ResourceDescriptor, data: &Dao) -> Self {
        let entity = Self::new(api, descriptor);
        entity.map(data);
        entity
    }

    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.inner.descriptor
    }

    /// The transport this entity talks to.
    pub fn api(&self) -> Arc<dyn ApiContract> {
        Arc::clone(&self.inner.api)
    }

    /// The synthetic identity of this entity.
    pub fn hash(&self) -> EntityHash {
        self.inner.state.read().hash
    }

    /// A second handle on the same entity, for actions that outlive the
    /// caller's borrow.
    fn share(&self) -> Entity {
        Entity {
            inner: Arc::clone(&self.inner),
        }
    }

    // ── Attributes ──────────────────────────────────────────────────

    /// Assigns every key of `data`, taking ownership of the values.
    pub fn fill(&self, data: Dao) -> &Self {
        let mut state = self.inner.state.write();
        for (key, value) in data {
            state.attributes.insert(key, Attribute::Value(value));
        }
        self
    }

    /// Assigns typed attributes.
    pub fn fill_attributes<I>(&self, attributes: I) -> &Self
    where
        I: IntoIterator<Item = (String, Attribute)>,
    {
        self.inner.state.write().attributes.extend(attributes);
        self
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Attribute>) -> &Self {
        self.inner
            .state
            .write()
            .attributes
            .insert(key.into(), value.into());
        self
    }

    /// A copy of the attribute stored under `key`.
    pub fn get(&self, key: &str) -> Option<Attribute> {
        self.inner.state.read().attributes.get(key).cloned()
    }

    /// The plain value of the attribute stored under `key`.
    pub fn value(&self, key: &str) -> Option<Value> {
        self.inner
            .state
            .read()
            .attributes
            .get(key)
            .map(Attribute::to_value)
    }

    pub fn remove_attribute(&self, key: &str) -> Option<Attribute> {
        self.inner.state.write().attributes.remove(key)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.inner.state.read().attributes.contains_key(key)
    }

    /// Deep-copies `data` into the entity.
    pub fn map(&self, data: &Dao) -> &Self {
        self.fill(data.clone())
    }

    /// Maps `data` when it is a JSON object; anything else is ignored and
    /// yields `None`.
    pub fn map_or_null(&self, data: &Value) -> Option<&Self> {
        let object = data.as_object()?;
        Some(self.map(object))
    }

    /// Imports another entity or plain data.
    ///
    /// From an entity, its plain representation and its hash are taken, so
    /// both entities reconcile as the same item afterwards.
    pub fn merge<'a>(&self, source: impl Into<MergeSource<'a>>) -> &Self {
        match source.into() {
            MergeSource::Entity(other) => {
                let (data, hash) = (other.to_object(), other.hash());
                self.fill(data);
                self.inner.state.write().hash = hash;
            }
            MergeSource::Data(data) => {
                self.map(data);
            }
        }
        self
    }

    // ── Identity ────────────────────────────────────────────────────

    /// The primary key, or `None` while it is absent or falsy
    /// (`null`, `false`, `0`, `""`).
    pub fn get_id(&self) -> Option<Value> {
        self.value(&self.inner.descriptor.id_key)
            .filter(is_truthy)
    }

    /// Whether the entity has a primary key, i.e. exists remotely.
    pub fn is_existing(&self) -> bool {
        self.get_id().is_some()
    }

    /// The primary key if present, else the hash.
    pub fn get_identifier(&self) -> Value {
        self.get_id().unwrap_or_else(|| self.hash().to_value())
    }

    /// The name of the field [`get_identifier`](Self::get_identifier) read.
    pub fn get_identifier_name(&self) -> String {
        if self.is_existing() {
            self.inner.descriptor.id_key.clone()
        } else {
            HASH_KEY.to_string()
        }
    }

    /// A criterion that matches this entity: `{identifier name: identifier}`,
    /// or `{key_override: value}` when a key is given.
    pub fn identity_criteria(&self, key_override: Option<&str>) -> Dao {
        let mut criteria = Dao::new();
        match key_override {
            Some(key) => {
                let value = self.lookup(key).unwrap_or(Value::Null);
                criteria.insert(key.to_string(), value);
            }
            None => {
                criteria.insert(self.get_identifier_name(), self.get_identifier());
            }
        }
        criteria
    }

    /// Whether every criteria key equals this entity's value for it.
    /// `$hash` refers to the synthetic identity.
    pub fn meets_criteria(&self, criteria: &Dao) -> bool {
        let view: Dao = criteria
            .keys()
            .filter_map(|key| self.lookup(key).map(|value| (key.clone(), value)))
            .collect();
        object_meets_criteria(&view, criteria)
    }

    fn lookup(&self, key: &str) -> Option<Value> {
        if key == HASH_KEY {
            Some(self.hash().to_value())
        } else {
            self.value(key)
        }
    }

    // ── Serialization ───────────────────────────────────────────────

    /// Deep plain copy of every non-internal attribute.
    pub fn to_object(&self) -> Dao {
        let state = self.inner.state.read();
        state
            .attributes
            .iter()
            .filter(|(key, _)| !self.inner.descriptor.is_internal(key))
            .map(|(key, attribute)| (key.clone(), attribute.to_value()))
            .collect()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_object())
    }

    /// Body sent by `store` and `update`.
    pub fn to_request(&self) -> Dao {
        self.to_object()
    }

    // ── Snapshot ────────────────────────────────────────────────────

    /// Saves a copy of the current plain representation.
    pub fn snapshot(&self) -> &Self {
        let saved = self.to_object();
        self.inner.state.write().snapshot = Some(saved);
        self
    }

    /// Maps the last snapshot back in. Does nothing without a snapshot.
    pub fn reset(&self) -> &Self {
        let saved = self.inner.state.read().snapshot.clone();
        if let Some(saved) = saved {
            self.fill(saved);
        }
        self
    }

    pub fn has_snapshot(&self) -> bool {
        self.inner.state.read().snapshot.is_some()
    }

    // ── Cloning ─────────────────────────────────────────────────────

    /// A deep copy bound to another transport.
    pub fn clone_with(&self, api: Arc<dyn ApiContract>) -> Entity {
        let copy = Entity::new(api, self.inner.descriptor.clone());
        let (attributes, hash) = {
            let state = self.inner.state.read();
            (state.attributes.clone(), state.hash)
        };
        {
            let mut target = copy.inner.state.write();
            target.attributes = attributes;
            target.hash = hash;
        }
        copy
    }

    // ── Validation state ────────────────────────────────────────────

    /// A copy of the validation state left by the last failed action.
    pub fn validation(&self) -> ValidationError {
        self.inner.state.read().errors.clone()
    }

    pub fn errors_for(&self, field: &str) -> Vec<String> {
        self.inner
            .state
            .read()
            .errors
            .get_error(field)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    /// The first message for `field`, or an empty string.
    pub fn error_for(&self, field: &str) -> String {
        self.errors_for(field).into_iter().next().unwrap_or_default()
    }

    pub fn has_error(&self, field: &str) -> bool {
        !self.errors_for(field).is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.inner.state.read().errors.has_errors()
    }

    /// Records a message locally, without a request.
    pub fn add_error(&self, field: &str, message: impl Into<String>) {
        self.inner.state.write().errors.add_error(field, message);
    }

    pub fn clear_error_for(&self, field: &str) {
        self.inner.state.write().errors.errors.clear_for(field);
    }

    pub fn clear_errors(&self) {
        self.inner.state.write().errors.clear();
    }

    // ── Action state ────────────────────────────────────────────────

    pub fn is_storing(&self) -> bool {
        self.inner.storing.is_running()
    }

    pub fn is_updating(&self) -> bool {
        self.inner.updating.is_running()
    }

    pub fn is_destroying(&self) -> bool {
        self.inner.destroying.is_running()
    }

    pub fn is_finding(&self) -> bool {
        self.inner.finding.is_running()
    }

    pub fn is_saving(&self) -> bool {
        self.is_updating() || self.is_storing()
    }

    // ── Remote actions ──────────────────────────────────────────────

    /// A query targeting this entity's resource.
    pub fn new_query(&self) -> Query {
        Query::new(self.api()).to_resource(&self.inner.descriptor)
    }

    /// A query targeting `/<resource>/<id>`, or the bare resource while
    /// the entity has no id.
    fn member_query(&self) -> Query {
        let query = self.new_query();
        match self.get_id() {
            Some(id) => query.expand_url(id_segment(&id)),
            None => query,
        }
    }

    /// `update` for an existing entity, `store` otherwise.
    pub async fn save(&self) -> ModelResult<Value> {
        if self.is_existing() {
            self.update().await
        } else {
            self.store().await
        }
    }

    /// POSTs the entity and merges the response into it.
    pub async fn store(&self) -> ModelResult<Value> {
        let entity = self.share();
        let flight = self.inner.storing.run(move || {
            let payload = Value::Object(entity.to_request());
            let query = entity.new_query();
            debug!(resource = %query.resource(), "storing entity");
            async move {
                let result = query.post(Some(payload), None).await;
                entity.settle(result, true)
            }
        });
        flight.await?
    }

    /// PUTs the entity and merges the response into it.
    pub async fn update(&self) -> ModelResult<Value> {
        self.wait_for_pending_reads().await;
        let entity = self.share();
        let flight = self.inner.updating.run(move || {
            let payload = Value::Object(entity.to_request());
            let query = entity.member_query();
            debug!(resource = %query.resource(), "updating entity");
            async move {
                let result = query.put(Some(payload), None).await;
                entity.settle(result, true)
            }
        });
        flight.await?
    }

    /// DELETEs the entity. The response is returned but not merged.
    pub async fn destroy(&self) -> ModelResult<Value> {
        self.wait_for_pending_reads().await;
        let entity = self.share();
        let flight = self.inner.destroying.run(move || {
            let query = entity.member_query();
            debug!(resource = %query.resource(), "destroying entity");
            async move {
                let result = query.delete(None, None).await;
                entity.settle(result, false)
            }
        });
        flight.await?
    }

    /// Loads the entity by id or by criteria and merges the result in.
    ///
    /// A criteria lookup that matches nothing fails with
    /// [`ApiError::NotFound`].
    pub async fn find(&self, target: impl Into<FindTarget>) -> ModelResult<Value> {
        let target = target.into();
        let entity = self.share();
        let flight = self.inner.finding.run(move || {
            let query = entity.new_query();
            debug!(resource = %query.resource(), lookup = ?target, "finding entity");
            async move {
                let result = match target {
                    FindTarget::Id(id) => query.expand_url(id_segment(&id)).get(None, None).await,
                    FindTarget::Criteria(criteria) => query
                        .set_criteria(criteria)
                        .first()
                        .await
                        .and_then(|found| found.ok_or(ApiError::NotFound { data: None })),
                };
                entity.settle(result, true)
            }
        });
        flight.await?
    }

    /// Every entity of this resource type.
    pub async fn fetch_all(&self) -> ModelResult<Collection> {
        let response = self.new_query().get(None, None).await?;
        Ok(self.collect(response))
    }

    /// One page of entities of this resource type.
    pub async fn paginate(&self, page: u32, per_page: u32) -> ModelResult<Collection> {
        let response = self.new_query().paginate(page, per_page).await?;
        Ok(self.collect(response))
    }

    /// The first page of entities at the default page size.
    pub async fn first_page(&self) -> ModelResult<Collection> {
        let response = self.new_query().first_page().await?;
        Ok(self.collect(response))
    }

    /// Builds a collection from a list response, or from the `data` array
    /// of a paginated envelope.
    fn collect(&self, response: Value) -> Collection {
        let items = match response {
            Value::Array(items) => items,
            Value::Object(mut envelope) => match envelope.remove("data") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        items
            .iter()
            .filter_map(|item| {
                let entity = Entity::new(self.api(), self.inner.descriptor.clone());
                entity.map_or_null(item)?;
                Some(entity)
            })
            .collect()
    }

    async fn wait_for_pending_reads(&self) {
        for pending in [self.inner.storing.in_flight(), self.inner.finding.in_flight()]
            .into_iter()
            .flatten()
        {
            await_settled(pending).await;
        }
    }

    /// Applies the outcome of a request: merges a successful response,
    /// records a validation failure.
    fn settle(&self, result: ApiResult<Value>, merge: bool) -> ModelResult<Value> {
        match result {
            Ok(response) => {
                if merge {
                    self.map_or_null(&response);
                }
                self.inner.state.write().errors.clear();
                Ok(response)
            }
            Err(err) => {
                if let Some(validation) = err.as_validation() {
                    self.inner.state.write().errors = validation.clone();
                }
                Err(ModelError::from(err))
            }
        }
    }
}

/// Waits for a flight owned by someone else; its caller sees the outcome.
async fn await_settled(flight: Flight<ModelResult<Value>>) {
    // Only ordering matters here; the flight's own caller handles the result.
    let _outcome = flight.await;
}

fn id_segment(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Clone for Entity {
    fn clone(&self) -> Self {
        self.clone_with(self.api())
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("Entity")
            .field("resource", &self.inner.descriptor.resource)
            .field("hash", &state.hash)
            .field("attributes", &state.attributes)
            .finish_non_exhaustive()
    }
}

/// Pretty-printed JSON of [`Entity::to_object`].
impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string_pretty(&self.to_value()).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
