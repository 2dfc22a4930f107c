//! # Value Casting
//!
//! Converts raw `List`/`Map` values into the typed values a field asks for.
//! Only raw candidates reach a caster; scalars and already-typed values go
//! straight to type-checking.

use crate::class::DtoClass;
use crate::collection::DtoCollection;
use crate::descriptor::{FieldDescriptor, TypeTag};
use crate::dto::ConstructionPipeline;
use crate::error::DtoError;
use crate::value::Value;

/// Casting strategy for raw field values.
pub trait Cast: Send + Sync {
    /// Convert `value` for `field`, or return it unchanged if nothing applies.
    fn cast(&self, value: Value, field: &FieldDescriptor) -> Result<Value, DtoError>;
}

/// Default caster.
///
/// Walks the field's allowed types in order and uses the first one whose
/// shape fits the raw value:
///
/// - `Dto(class)` with a mapping: construct `class` from it.
/// - `Collection(class)` with a list: construct each mapping element as the
///   collection's element class. Fails with `UntypedCollection` when the
///   collection declares no element class.
/// - `ArrayOf(Dto(class))` with a list: construct each mapping element,
///   keeping the result a list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCaster;

impl Cast for ValueCaster {
    fn cast(&self, mut value: Value, field: &FieldDescriptor) -> Result<Value, DtoError> {
        for ty in field.allowed_types() {
            match (ty, value) {
                (TypeTag::Dto(class), Value::Map(map)) => {
                    tracing::trace!(field = field.name(), class = class.name(), "casting nested DTO");
                    return ConstructionPipeline::new(*class).construct(map).map(Value::from);
                }
                (TypeTag::Collection(class), raw @ (Value::List(_) | Value::Map(_))) => {
                    let element = class
                        .element_type()
                        .ok_or_else(|| DtoError::untyped_collection(class.name()))?;
                    match raw {
                        Value::List(items) => {
                            tracing::trace!(field = field.name(), class = class.name(), "casting collection");
                            let items = cast_elements(element, items)?;
                            return Ok(Value::from(DtoCollection::new(*class, items)));
                        }
                        mapping => value = mapping,
                    }
                }
                (TypeTag::ArrayOf(inner), Value::List(items)) => {
                    if let TypeTag::Dto(class) = inner.as_ref() {
                        return cast_elements(*class, items).map(Value::List);
                    }
                    value = Value::List(items);
                }
                (_, unchanged) => {
                    value = unchanged;
                }
            }
        }
        Ok(value)
    }
}

/// Construct every mapping in `items` as `class`; other elements pass through.
pub(crate) fn cast_elements(class: DtoClass, items: Vec<Value>) -> Result<Vec<Value>, DtoError> {
    let pipeline = ConstructionPipeline::new(class);
    items
        .into_iter()
        .map(|item| match item {
            Value::Map(map) => pipeline.construct(map).map(Value::from),
            other => Ok(other),
        })
        .collect()
}
