//! Ordered, identity-aware entity lists.

use crate::entity::Entity;
use restmodel_types::Dao;
use serde_json::Value;

/// Something an entity can be matched against.
///
/// Implemented for criteria objects (every key must be equal on the
/// entity, `$hash` reaching the synthetic identity), for predicates and
/// for entities, which match by their identity criterion.
pub trait Criterion {
    fn matches(&self, entity: &Entity) -> bool;
}

impl Criterion for Dao {
    fn matches(&self, entity: &Entity) -> bool {
        entity.meets_criteria(self)
    }
}

impl Criterion for &Dao {
    fn matches(&self, entity: &Entity) -> bool {
        entity.meets_criteria(self)
    }
}

impl Criterion for &Entity {
    fn matches(&self, entity: &Entity) -> bool {
        entity.meets_criteria(&self.identity_criteria(None))
    }
}

impl<F> Criterion for F
where
    F: Fn(&Entity) -> bool,
{
    fn matches(&self, entity: &Entity) -> bool {
        self(entity)
    }
}

/// An ordered list of entities reconciled by identity.
///
/// Identity is the primary key when an entity has one and its hash
/// otherwise; [`add_or_merge`](Self::add_or_merge) never lets two entries
/// share one.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    items: Vec<Entity>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.items.iter()
    }

    /// The first entity matching `criterion`.
    pub fn find(&self, criterion: impl Criterion) -> Option<&Entity> {
        self.items.iter().find(|entity| criterion.matches(entity))
    }

    pub fn find_mut(&mut self, criterion: impl Criterion) -> Option<&mut Entity> {
        self.items.iter_mut().find(|entity| criterion.matches(entity))
    }

    pub fn position(&self, criterion: impl Criterion) -> Option<usize> {
        self.items.iter().position(|entity| criterion.matches(entity))
    }

    /// Removes and returns the first entity matching `criterion`.
    pub fn remove(&mut self, criterion: impl Criterion) -> Option<Entity> {
        let index = self.position(criterion)?;
        Some(self.items.remove(index))
    }

    /// Removes the entry with the same identity as `entity`, read from
    /// `key_override` when given.
    pub fn remove_entity(&mut self, entity: &Entity, key_override: Option<&str>) -> Option<Entity> {
        self.remove(entity.identity_criteria(key_override))
    }

    /// Inserts at `index`, clamped to the end.
    pub fn add(&mut self, entity: Entity, index: usize) {
        let index = index.min(self.items.len());
        self.items.insert(index, entity);
    }

    pub fn push(&mut self, entity: Entity) {
        self.items.push(entity);
    }

    pub fn prepend(&mut self, entity: Entity) {
        self.items.insert(0, entity);
    }

    /// Replaces the entry with the same identity in place, or inserts at
    /// `insert_index` when there is none. Returns the entity's position.
    pub fn add_or_merge(&mut self, entity: Entity, insert_index: usize) -> usize {
        let criteria = entity.identity_criteria(None);
        match self.position(&criteria) {
            Some(index) => {
                self.items[index] = entity;
                index
            }
            None => {
                let index = insert_index.min(self.items.len());
                self.items.insert(index, entity);
                index
            }
        }
    }

    pub fn add_or_merge_at_head(&mut self, entity: Entity) -> usize {
        self.add_or_merge(entity, 0)
    }

    /// Replaces the membership.
    pub fn fill(&mut self, entities: impl IntoIterator<Item = Entity>) {
        self.items = entities.into_iter().collect();
    }

    /// Plain representation of every entity.
    pub fn to_array(&self) -> Vec<Value> {
        self.items.iter().map(Entity::to_value).collect()
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.to_array())
    }

    pub fn map<T>(&self, f: impl FnMut(&Entity) -> T) -> Vec<T> {
        self.items.iter().map(f).collect()
    }

    /// A new collection with deep copies of the matching entities.
    pub fn filter(&self, criterion: impl Criterion) -> Collection {
        self.items
            .iter()
            .filter(|entity| criterion.matches(entity))
            .cloned()
            .collect()
    }

    /// Keeps only the entities matching `criterion`.
    pub fn retain(&mut self, criterion: impl Criterion) {
        self.items.retain(|entity| criterion.matches(entity));
    }

    /// Applies `f` to every entity in place.
    pub fn transform(&mut self, f: impl FnMut(&mut Entity)) {
        self.items.iter_mut().for_each(f);
    }

    /// Primary keys of the entities that have one.
    pub fn ids(&self) -> Vec<Value> {
        self.items.iter().filter_map(Entity::get_id).collect()
    }
}

impl From<Vec<Entity>> for Collection {
    fn from(items: Vec<Entity>) -> Self {
        Self { items }
    }
}

impl FromIterator<Entity> for Collection {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Collection {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
