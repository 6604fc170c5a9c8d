use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The field holding an event's tags.
pub const TAGS_FIELD: &str = "tags";

/// A reference to a possibly nested event field.
///
/// Either a plain top-level name (`span`) or a bracketed path
/// (`[@metadata][span]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldRef {
    raw: String,
    path: Vec<String>,
}

impl FieldRef {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let path = match raw
            .strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
        {
            Some(inner) => inner.split("][").map(str::to_owned).collect(),
            None => vec![raw.clone()],
        };
        Self { raw, path }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The field names from the outermost object inwards. Never empty.
    pub fn path(&self) -> &[String] {
        &self.path
    }
}

impl From<String> for FieldRef {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl From<&str> for FieldRef {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<FieldRef> for String {
    fn from(field: FieldRef) -> Self {
        field.raw
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A pipeline event: a JSON object with a conventional `tags` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event {
    fields: Map<String, Value>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    pub fn get(&self, field: &FieldRef) -> Option<&Value> {
        let (first, rest) = field.path().split_first()?;
        let mut current = self.fields.get(first)?;
        for name in rest {
            current = current.as_object()?.get(name)?;
        }
        Some(current)
    }

    /// Set a field, creating intermediate objects as needed. Intermediate
    /// values that are not objects are replaced.
    pub fn set(&mut self, field: &FieldRef, value: Value) {
        let Some((last, parents)) = field.path().split_last() else {
            return;
        };

        let mut map = &mut self.fields;
        for name in parents {
            let slot = map
                .entry(name.as_str())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Value::Object(next) = slot else {
                return;
            };
            map = next;
        }
        map.insert(last.clone(), value);
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        let tags: &[Value] = match self.fields.get(TAGS_FIELD) {
            Some(Value::Array(tags)) => tags.as_slice(),
            _ => &[],
        };
        tags.iter().filter_map(Value::as_str)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().any(|t| t == tag)
    }

    /// Append a tag unless it is already present. A scalar `tags` value is
    /// turned into a one-element array first.
    pub fn tag(&mut self, tag: &str) {
        let tags = self
            .fields
            .entry(TAGS_FIELD)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !tags.is_array() {
            let previous = tags.take();
            *tags = Value::Array(if previous.is_null() {
                Vec::new()
            } else {
                vec![previous]
            });
        }
        if let Value::Array(list) = tags {
            if !list.iter().any(|t| t.as_str() == Some(tag)) {
                list.push(Value::String(tag.to_owned()));
            }
        }
    }

    /// Remove every occurrence of a tag.
    pub fn remove_tag(&mut self, tag: &str) {
        if let Some(Value::Array(list)) = self.fields.get_mut(TAGS_FIELD) {
            list.retain(|t| t.as_str() != Some(tag));
        }
    }
}

impl From<Map<String, Value>> for Event {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
