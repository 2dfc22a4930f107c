//! Ordered, typed collection of DTOs.

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::caster::cast_elements;
use crate::class::{CollectionClass, DtoCollectionType};
use crate::error::DtoError;
use crate::value::Value;

/// Items of a [`DtoCollectionType`]. Items are normally `Value::Dto`; raw
/// elements that were not mappings are kept as supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct DtoCollection {
    class: CollectionClass,
    items: Vec<Value>,
}

impl DtoCollection {
    pub fn new(class: CollectionClass, items: Vec<Value>) -> Self {
        Self { class, items }
    }

    /// Cast a raw list into a collection of `C`, constructing each mapping
    /// element as `C`'s element class.
    pub fn from_raw<C: DtoCollectionType>(items: Vec<Value>) -> Result<Self, DtoError> {
        let class = CollectionClass::of::<C>();
        let element = class
            .element_type()
            .ok_or_else(|| DtoError::untyped_collection(class.name()))?;
        Ok(Self::new(class, cast_elements(element, items)?))
    }

    pub fn class(&self) -> CollectionClass {
        self.class
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub(crate) fn items_mut(&mut self) -> std::slice::IterMut<'_, Value> {
        self.items.iter_mut()
    }

    /// Each item projected to plain values.
    pub fn to_array(&self) -> Vec<Value> {
        self.items.iter().map(crate::projection::normalize).collect()
    }
}

impl<'a> IntoIterator for &'a DtoCollection {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for DtoCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}
