//! Per-field validation messages from a 422 response.
//!
//! Backends answer a rejected write with
//! `{"message": "...", "code": "...", "errors": {"field_name": ["..."]}}`.
//! A field's messages may also arrive as a single string.

use restmodel_types::to_camel_case;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// HTTP status used by backends for validation failures.
pub const VALIDATION_STATUS: u16 = 422;

/// Messages attached to one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyError {
    /// Field name in local casing.
    pub key: String,
    pub messages: Vec<String>,
}

/// Field name → messages aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyCollectionError {
    errors: Vec<PropertyError>,
}

impl PropertyCollectionError {
    /// Creates an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the aggregate from the `errors` object of a response body.
    /// Keys are converted to local casing; non-object input yields an empty
    /// aggregate.
    pub fn from_errors_value(errors: &Value) -> Self {
        let Some(map) = errors.as_object() else {
            return Self::new();
        };
        let errors = map
            .iter()
            .map(|(key, value)| PropertyError {
                key: to_camel_case(key),
                messages: normalize_messages(value),
            })
            .collect();
        Self { errors }
    }

    /// Messages for `field`, matched directly or through its `_id` form
    /// (`relation` also finds `relation_id`).
    pub fn get_for(&self, field: &str) -> Option<&[String]> {
        self.find(field).map(|error| error.messages.as_slice())
    }

    /// Empties the messages of the field [`get_for`](Self::get_for) would
    /// return. When both `relation` and `relation_id` are present, only
    /// `relation` is cleared.
    pub fn clear_for(&mut self, field: &str) {
        if let Some(index) = self.position(field) {
            self.errors[index].messages.clear();
        }
    }

    /// Drops every field.
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Appends a message to `key`, creating the field if needed.
    pub fn add_error(&mut self, key: &str, message: impl Into<String>) {
        let key = to_camel_case(key);
        match self.errors.iter_mut().find(|error| error.key == key) {
            Some(error) => error.messages.push(message.into()),
            None => self.errors.push(PropertyError {
                key,
                messages: vec![message.into()],
            }),
        }
    }

    /// Whether any field still carries a message.
    pub fn has_error(&self) -> bool {
        self.errors.iter().any(|error| !error.messages.is_empty())
    }

    /// All fields, including cleared ones.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyError> {
        self.errors.iter()
    }

    fn find(&self, field: &str) -> Option<&PropertyError> {
        self.position(field).map(|index| &self.errors[index])
    }

    fn position(&self, field: &str) -> Option<usize> {
        let (direct, suffixed) = lookup_keys(field);
        self.errors
            .iter()
            .position(|error| error.key == direct)
            .or_else(|| self.errors.iter().position(|error| error.key == suffixed))
    }
}

fn lookup_keys(field: &str) -> (String, String) {
    (to_camel_case(field), to_camel_case(&format!("{field}_id")))
}

fn normalize_messages(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(message_text).collect(),
        Value::Null => Vec::new(),
        other => vec![message_text(other)],
    }
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A rejected write: overall message, optional code and per-field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub message: String,
    pub code: Option<String>,
    pub errors: PropertyCollectionError,
}

impl ValidationError {
    /// Creates an empty validation state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a 422 response body.
    pub fn from_response_body(body: &Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let code = body.get("code").and_then(|code| match code {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        let errors = body
            .get("errors")
            .map(PropertyCollectionError::from_errors_value)
            .unwrap_or_default();
        Self {
            message,
            code,
            errors,
        }
    }

    /// Whether `status` is the validation status.
    pub fn is_validation_status(status: u16) -> bool {
        status == VALIDATION_STATUS
    }

    /// Resets message, code and every field.
    pub fn clear(&mut self) {
        self.message.clear();
        self.code = None;
        self.errors.clear();
    }

    pub fn add_error(&mut self, key: &str, message: impl Into<String>) {
        self.errors.add_error(key, message);
    }

    pub fn has_errors(&self) -> bool {
        self.errors.has_error()
    }

    pub fn get_error(&self, field: &str) -> Option<&[String]> {
        self.errors.get_for(field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
