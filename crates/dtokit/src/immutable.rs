//! # Immutable View
//!
//! [`ImmutableDto`] owns a [`Dto`] and exposes no path to mutate it. On
//! construction it rewrites the wrapped graph once, depth-first: every
//! nested `Dto` (in fields, lists, mappings and collections) is replaced by
//! its own `ImmutableDto`. Reads and projections forward to the wrapped
//! instance; `only`/`except` therefore return a plain, unwrapped clone.

use serde::ser::{Serialize, Serializer};

use crate::class::DtoClass;
use crate::dto::{Dto, Fields};
use crate::error::DtoError;
use crate::value::{Map, Value};

/// Read-only view over a DTO graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ImmutableDto {
    inner: Dto,
}

impl ImmutableDto {
    pub fn new(mut dto: Dto) -> Self {
        dto.values.values_mut().for_each(seal);
        Self { inner: dto }
    }

    pub(crate) fn inner(&self) -> &Dto {
        &self.inner
    }

    pub fn class(&self) -> DtoClass {
        self.inner.class()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.inner.get(name)
    }

    pub fn fields(&self) -> &Map {
        self.inner.fields()
    }

    pub fn all(&self) -> Map {
        self.inner.all()
    }

    pub fn only<I, S>(&self, keys: I) -> Dto
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.only(keys)
    }

    pub fn except<I, S>(&self, keys: I) -> Dto
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.except(keys)
    }

    pub fn to_array(&self) -> Map {
        self.inner.to_array()
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.inner.to_json()
    }

    pub fn deserialize_into<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        self.inner.deserialize_into()
    }
}

impl Fields for ImmutableDto {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }

    fn set_field(&mut self, name: &str, _value: Value) -> Result<(), DtoError> {
        tracing::debug!(class = self.class().name(), field = name, "write rejected on immutable DTO");
        Err(DtoError::immutable(name))
    }
}

impl Serialize for ImmutableDto {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

fn seal(value: &mut Value) {
    match value {
        Value::Dto(_) => {
            if let Value::Dto(dto) = std::mem::take(value) {
                *value = Value::from(ImmutableDto::new(*dto));
            }
        }
        Value::List(items) => items.iter_mut().for_each(seal),
        Value::Map(map) => map.values_mut().for_each(seal),
        Value::Collection(collection) => collection.items_mut().for_each(seal),
        _ => {}
    }
}
