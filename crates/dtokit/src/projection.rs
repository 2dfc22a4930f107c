//! # Projection & Serialization
//!
//! `only`/`except` return clones with an extended selector list; selectors
//! accumulate across calls and are never edited in place. `to_array` applies
//! the selectors and flattens the graph: nested DTOs, views and collections
//! become plain mappings and lists, so the output holds no typed objects.
//!
//! When `only` keys are present they win and `except` keys are ignored.

use serde::ser::{Serialize, Serializer};

use crate::arr;
use crate::dto::Dto;
use crate::value::{serialize_map, Map, Value};

impl Dto {
    /// Every field value, in declaration order, ignoring selectors.
    pub fn all(&self) -> Map {
        self.values.clone()
    }

    /// Clone restricted to `keys` on projection, in addition to any keys
    /// already selected.
    pub fn only<I, S>(&self, keys: I) -> Dto
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dto = self.clone();
        dto.only_keys.extend(keys.into_iter().map(Into::into));
        dto
    }

    /// Clone that drops `keys` on projection, in addition to any keys
    /// already excluded.
    pub fn except<I, S>(&self, keys: I) -> Dto
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dto = self.clone();
        dto.except_keys.extend(keys.into_iter().map(Into::into));
        dto
    }

    pub fn only_keys(&self) -> &[String] {
        &self.only_keys
    }

    pub fn except_keys(&self) -> &[String] {
        &self.except_keys
    }

    /// Selected fields as plain values.
    pub fn to_array(&self) -> Map {
        let selected = if self.only_keys.is_empty() {
            arr::except(&self.values, &self.except_keys)
        } else {
            arr::only(&self.values, &self.only_keys)
        };
        normalize_map(&selected)
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Plain values always serialize; non-finite floats become null.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Deserialize the projected fields into a plain Rust type.
    pub fn deserialize_into<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

impl Serialize for Dto {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_map(&self.to_array(), serializer)
    }
}

/// Replace typed objects in `value` by their plain projection, recursively.
pub(crate) fn normalize(value: &Value) -> Value {
    match value {
        Value::Dto(dto) => Value::Map(dto.to_array()),
        Value::Immutable(view) => Value::Map(view.to_array()),
        Value::Collection(collection) => Value::List(collection.to_array()),
        Value::List(items) => Value::List(items.iter().map(normalize).collect()),
        Value::Map(map) => Value::Map(normalize_map(map)),
        scalar => scalar.clone(),
    }
}

fn normalize_map(map: &Map) -> Map {
    map.iter().map(|(k, v)| (k.clone(), normalize(v))).collect()
}
