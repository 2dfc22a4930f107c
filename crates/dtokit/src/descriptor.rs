//! # Field Descriptors
//!
//! A [`FieldDescriptor`] is the frozen, validated form of a
//! [`FieldDeclaration`]: the allowed type set, nullability, default and the
//! element type used when casting collections. Descriptors are computed once
//! per class by the schema cache and never change afterwards.

use std::fmt;

use crate::class::{CollectionClass, DataTransferObject, DtoClass, DtoCollectionType, FieldDeclaration};
use crate::value::Value;

/// One acceptable type for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Bool,
    Int,
    Float,
    String,
    /// Any raw list or mapping.
    Array,
    /// Anything except `null`.
    Mixed,
    /// A list whose elements all match the inner type.
    ArrayOf(Box<TypeTag>),
    /// A DTO of the given class.
    Dto(DtoClass),
    /// A typed collection of the given class.
    Collection(CollectionClass),
}

impl TypeTag {
    pub fn dto<T: DataTransferObject>() -> Self {
        Self::Dto(DtoClass::of::<T>())
    }

    pub fn collection<C: DtoCollectionType>() -> Self {
        Self::Collection(CollectionClass::of::<C>())
    }

    pub fn array_of(inner: TypeTag) -> Self {
        Self::ArrayOf(Box::new(inner))
    }

    /// Whether `value` is an instance of this type. `null` never matches;
    /// nullability is the descriptor's concern.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => false,
            (Self::Mixed, _) => true,
            (Self::Bool, Value::Bool(_)) => true,
            (Self::Int, Value::Int(_)) => true,
            (Self::Float, Value::Float(_)) => true,
            (Self::String, Value::String(_)) => true,
            (Self::Array, Value::List(_) | Value::Map(_)) => true,
            (Self::ArrayOf(inner), Value::List(items)) => items.iter().all(|item| inner.matches(item)),
            (Self::Dto(class), Value::Dto(dto)) => dto.class() == *class,
            (Self::Dto(class), Value::Immutable(view)) => view.class() == *class,
            (Self::Collection(class), Value::Collection(collection)) => collection.class() == *class,
            _ => false,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::String => f.write_str("string"),
            Self::Array => f.write_str("array"),
            Self::Mixed => f.write_str("mixed"),
            Self::ArrayOf(inner) => write!(f, "{inner}[]"),
            Self::Dto(class) => f.write_str(class.name()),
            Self::Collection(class) => f.write_str(class.name()),
        }
    }
}

/// Immutable metadata for one declared field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    allowed_types: Vec<TypeTag>,
    is_nullable: bool,
    default: Option<Value>,
    element_type: Option<TypeTag>,
}

impl FieldDescriptor {
    pub(crate) fn from_declaration(declaration: FieldDeclaration) -> Self {
        let element_type = declaration.types.iter().find_map(|ty| match ty {
            TypeTag::Collection(class) => class.element_type().map(TypeTag::Dto),
            TypeTag::ArrayOf(inner) => Some((**inner).clone()),
            _ => None,
        });
        Self {
            name: declaration.name,
            allowed_types: declaration.types,
            is_nullable: declaration.nullable,
            default: declaration.default,
            element_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn allowed_types(&self) -> &[TypeTag] {
        &self.allowed_types
    }

    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }

    pub fn has_default_value(&self) -> bool {
        self.default.is_some()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Element type of the first collection or typed-array type, if any.
    pub fn element_type(&self) -> Option<&TypeTag> {
        self.element_type.as_ref()
    }

    pub fn is_valid_type(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.is_nullable;
        }
        self.allowed_types.iter().any(|ty| ty.matches(value))
    }

    /// Rendered type list for diagnostics, with `null` last when nullable.
    pub fn expected_types(&self) -> Vec<String> {
        let mut expected: Vec<String> = self.allowed_types.iter().map(ToString::to_string).collect();
        if self.is_nullable {
            expected.push("null".to_string());
        }
        expected
    }
}
