use crate::collection::Collection;
use crate::entity::Entity;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// One attribute value held by an [`Entity`].
///
/// Cloning is deep: nested entities and collections are copied through
/// their own `Clone`, so the copy shares no state with the original.
#[derive(Debug, Clone)]
pub enum Attribute {
    /// Plain JSON data.
    Value(Value),
    /// A timestamp, serialized as an RFC 3339 string with milliseconds.
    Date(DateTime<Utc>),
    /// A related entity.
    Entity(Box<Entity>),
    /// A related collection.
    Collection(Collection),
    /// A list mixing entities, collections and plain values.
    List(Vec<Attribute>),
}

impl Attribute {
    /// The plain representation: entities become objects, collections
    /// arrays, dates strings.
    pub fn to_value(&self) -> Value {
        match self {
            Attribute::Value(value) => value.clone(),
            Attribute::Date(date) => {
                Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Attribute::Entity(entity) => entity.to_value(),
            Attribute::Collection(collection) => collection.to_value(),
            Attribute::List(items) => Value::Array(items.iter().map(Attribute::to_value).collect()),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Attribute::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Attribute::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Attribute::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Attribute::Collection(collection) => Some(collection),
            _ => None,
        }
    }
}

impl From<Value> for Attribute {
    fn from(value: Value) -> Self {
        Attribute::Value(value)
    }
}

impl From<DateTime<Utc>> for Attribute {
    fn from(date: DateTime<Utc>) -> Self {
        Attribute::Date(date)
    }
}

impl From<Entity> for Attribute {
    fn from(entity: Entity) -> Self {
        Attribute::Entity(Box::new(entity))
    }
}

impl From<Collection> for Attribute {
    fn from(collection: Collection) -> Self {
        Attribute::Collection(collection)
    }
}

impl From<Vec<Attribute>> for Attribute {
    fn from(items: Vec<Attribute>) -> Self {
        Attribute::List(items)
    }
}

impl From<&str> for Attribute {
    fn from(text: &str) -> Self {
        Attribute::Value(Value::String(text.to_string()))
    }
}

impl From<String> for Attribute {
    fn from(text: String) -> Self {
        Attribute::Value(Value::String(text))
    }
}

impl From<i64> for Attribute {
    fn from(number: i64) -> Self {
        Attribute::Value(Value::from(number))
    }
}

impl From<bool> for Attribute {
    fn from(flag: bool) -> Self {
        Attribute::Value(Value::Bool(flag))
    }
}
