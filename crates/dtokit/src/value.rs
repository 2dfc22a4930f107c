//! # Value Model
//!
//! [`Value`] is the discriminated value stored in every DTO field. Raw input
//! arrives as `List`/`Map` values (the untyped "array" shape); construction
//! turns them into `Dto` and `Collection` values where the schema asks for
//! it. [`Map`] keeps insertion order so projections and diagnostics follow
//! the order keys were declared or supplied in.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::collection::DtoCollection;
use crate::dto::Dto;
use crate::immutable::ImmutableDto;

/// Insertion-ordered string-keyed mapping of values.
pub type Map = IndexMap<String, Value>;

/// A single field value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Raw ordered sequence.
    List(Vec<Value>),
    /// Raw mapping.
    Map(Map),
    /// A constructed DTO.
    Dto(Box<Dto>),
    /// A typed collection of DTOs.
    Collection(DtoCollection),
    /// A read-only view over a DTO.
    Immutable(Box<ImmutableDto>),
}

impl Value {
    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for the untyped shapes (`List`, `Map`) that casting may convert.
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Kind name used in type diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) | Self::Map(_) => "array",
            Self::Dto(_) | Self::Collection(_) | Self::Immutable(_) => "object",
        }
    }

    /// Literal rendering used in type diagnostics. Arrays render as `array`,
    /// typed objects as their class name.
    pub fn render(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => s.clone(),
            Self::List(_) | Self::Map(_) => "array".to_string(),
            Self::Dto(dto) => dto.class().name().to_string(),
            Self::Collection(collection) => collection.class().name().to_string(),
            Self::Immutable(view) => view.class().name().to_string(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The DTO held by this value, whether mutable or wrapped in a view.
    pub fn as_dto(&self) -> Option<&Dto> {
        match self {
            Self::Dto(dto) => Some(dto),
            Self::Immutable(view) => Some(view.inner()),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&DtoCollection> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn as_immutable(&self) -> Option<&ImmutableDto> {
        match self {
            Self::Immutable(view) => Some(view),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Map(map)
    }
}

impl From<Dto> for Value {
    fn from(dto: Dto) -> Self {
        Self::Dto(Box::new(dto))
    }
}

impl From<DtoCollection> for Value {
    fn from(collection: DtoCollection) -> Self {
        Self::Collection(collection)
    }
}

impl From<ImmutableDto> for Value {
    fn from(view: ImmutableDto) -> Self {
        Self::Immutable(Box::new(view))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

/// Converts decoded JSON into raw values. Integers that fit in `i64` stay
/// integers; every other number becomes a float.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::Null, Self::Float),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Self::Map(map_from_json(map)),
        }
    }
}

/// Converts a decoded JSON object into a raw mapping, keeping key order.
pub fn map_from_json(map: serde_json::Map<String, serde_json::Value>) -> Map {
    map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
}

/// Typed variants serialize through their projection, so the output never
/// contains anything but plain maps, sequences and scalars.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => serialize_map(map, serializer),
            Self::Dto(dto) => dto.serialize(serializer),
            Self::Collection(collection) => collection.serialize(serializer),
            Self::Immutable(view) => view.serialize(serializer),
        }
    }
}

pub(crate) fn serialize_map<S: Serializer>(map: &Map, serializer: S) -> Result<S::Ok, S::Error> {
    let mut out = serializer.serialize_map(Some(map.len()))?;
    for (k, v) in map {
        out.serialize_entry(k, v)?;
    }
    out.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_integers() {
        assert_eq!(Value::from(json!(5)), Value::Int(5));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
        assert_eq!(Value::from(json!(u64::MAX)), Value::Float(u64::MAX as f64));
    }

    #[test]
    fn test_from_json_object_preserves_order() {
        let value = Value::from(json!({"z": 1, "a": 2, "m": 3}));
        let keys: Vec<&str> = value.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_kind_and_render() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::Null.render(), "null");
        assert_eq!(Value::Int(7).render(), "7");
        assert_eq!(Value::from("x").kind(), "string");
        assert_eq!(Value::List(vec![]).render(), "array");
        assert_eq!(Value::Map(Map::new()).kind(), "array");
    }

    #[test]
    fn test_is_raw() {
        assert!(Value::List(vec![]).is_raw());
        assert!(Value::Map(Map::new()).is_raw());
        assert!(!Value::from("x").is_raw());
        assert!(!Value::Null.is_raw());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::from("a"));
    }

    #[test]
    fn test_serialize_plain_values() {
        let value = Value::from(json!({"a": [1, "two", null], "b": {"c": true}}));
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"a": [1, "two", null], "b": {"c": true}})
        );
    }
}
