//! # Error Types: DTO Construction Failures
//!
//! Every failure the engine can produce is a [`DtoError`] variant. All
//! variants are terminal: the operation that produced one has not built (or
//! changed) anything.
//!
//! ## Aggregation
//!
//! Presence failures abort construction at the first missing field. Type
//! mismatches are collected across the whole schema and reported together as
//! one [`DtoError::InvalidTypes`], so a single call surfaces every wrong
//! field. Unknown input keys are only checked once typing succeeded.
//!
//! The rendered messages are part of the public contract: callers match on
//! them in logs and API responses, so the singular/plural wording of
//! [`InvalidTypes`] must stay stable.

use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// Top-level error type for DTO construction, casting and immutable access.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DtoError {
    /// A required, non-nullable field without a default was not supplied.
    #[error("Non-nullable property `{class}::{field}` has not been initialized.")]
    Uninitialized {
        /// Declaring class name.
        class: String,
        /// Missing field name.
        field: String,
    },

    /// One or more supplied values did not match their field's types.
    #[error("{0}")]
    InvalidTypes(InvalidTypes),

    /// The input carried keys that are not fields of the class.
    #[error("Public properties `{}` not found on {class}", .properties.join("`, `"))]
    UnknownProperties {
        /// Offending keys, in input order.
        properties: Vec<String>,
        /// Declaring class name.
        class: String,
    },

    /// A write was attempted through an immutable view.
    #[error("Cannot change the value of property {property} on an immutable data transfer object")]
    Immutable {
        /// The field that was written to.
        property: String,
    },

    /// A collection field was cast but its collection type declares no element class.
    #[error("Collection class `{class}` has no defined array type.")]
    UntypedCollection {
        /// Collection class name.
        class: String,
    },
}

impl DtoError {
    pub(crate) fn uninitialized(class: &str, field: &str) -> Self {
        Self::Uninitialized {
            class: class.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn unknown_properties(properties: Vec<String>, class: &str) -> Self {
        Self::UnknownProperties {
            properties,
            class: class.to_string(),
        }
    }

    pub(crate) fn immutable(property: &str) -> Self {
        Self::Immutable {
            property: property.to_string(),
        }
    }

    pub(crate) fn untyped_collection(class: &str) -> Self {
        Self::UntypedCollection {
            class: class.to_string(),
        }
    }
}

/// A single field whose value did not match any allowed type.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidType {
    /// Declaring class name.
    pub class: String,
    /// Field name.
    pub field: String,
    /// Rendered allowed types, `null` last for nullable fields.
    pub expected: Vec<String>,
    /// Literal rendering of the rejected value.
    pub value: String,
    /// Kind of the rejected value (`integer`, `string`, `object`, ...).
    pub kind: &'static str,
}

impl InvalidType {
    pub(crate) fn new(class: &str, field: &str, expected: Vec<String>, value: &Value) -> Self {
        Self {
            class: class.to_string(),
            field: field.to_string(),
            expected,
            value: value.render(),
            kind: value.kind(),
        }
    }
}

impl fmt::Display for InvalidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected `{}::{}` to be of type `{}`, ",
            self.class,
            self.field,
            self.expected.join(", ")
        )?;
        if self.value == self.kind {
            write!(f, "instead got value `{}`.", self.value)
        } else {
            write!(f, "instead got value `{}`, which is {}.", self.value, self.kind)
        }
    }
}

/// All type mismatches found during one construction call.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidTypes {
    entries: Vec<InvalidType>,
}

impl InvalidTypes {
    pub(crate) fn new(entries: Vec<InvalidType>) -> Self {
        Self { entries }
    }

    /// Returns the number of mismatched fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no mismatches were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a slice of all mismatches, in schema order.
    pub fn entries(&self) -> &[InvalidType] {
        &self.entries
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<InvalidType> {
        self.entries
    }
}

impl fmt::Display for InvalidTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [single] = self.entries.as_slice() {
            return write!(f, "Invalid type: {single}.");
        }
        writeln!(f, "The following invalid types were encountered:")?;
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(field: &str, value: Value) -> InvalidType {
        InvalidType::new("User", field, vec!["int".to_string()], &value)
    }

    #[test]
    fn test_uninitialized_display() {
        let err = DtoError::uninitialized("User", "id");
        assert_eq!(
            err.to_string(),
            "Non-nullable property `User::id` has not been initialized."
        );
    }

    #[test]
    fn test_unknown_properties_display() {
        let err = DtoError::unknown_properties(vec!["a".into(), "b".into()], "User");
        assert_eq!(err.to_string(), "Public properties `a`, `b` not found on User");
    }

    #[test]
    fn test_immutable_display() {
        let err = DtoError::immutable("name");
        assert_eq!(
            err.to_string(),
            "Cannot change the value of property name on an immutable data transfer object"
        );
    }

    #[test]
    fn test_untyped_collection_display() {
        let err = DtoError::untyped_collection("Tags");
        assert_eq!(
            err.to_string(),
            "Collection class `Tags` has no defined array type."
        );
    }

    #[test]
    fn test_invalid_type_scalar_mentions_kind() {
        let e = entry("id", Value::from("abc"));
        assert_eq!(
            e.to_string(),
            "expected `User::id` to be of type `int`, instead got value `abc`, which is string."
        );
    }

    #[test]
    fn test_invalid_type_same_rendering_and_kind() {
        let e = entry("id", Value::Null);
        assert_eq!(
            e.to_string(),
            "expected `User::id` to be of type `int`, instead got value `null`."
        );
    }

    #[test]
    fn test_invalid_types_singular_phrasing() {
        let err = DtoError::InvalidTypes(InvalidTypes::new(vec![entry("id", Value::Bool(true))]));
        assert_eq!(
            err.to_string(),
            "Invalid type: expected `User::id` to be of type `int`, instead got value `true`, which is boolean.."
        );
    }

    #[test]
    fn test_invalid_types_plural_phrasing() {
        let types = InvalidTypes::new(vec![
            entry("id", Value::from("x")),
            entry("age", Value::Float(1.5)),
        ]);
        assert_eq!(types.len(), 2);
        let msg = types.to_string();
        assert!(msg.starts_with("The following invalid types were encountered:\n"));
        assert!(msg.contains("`User::id`"));
        assert!(msg.contains("`User::age`"));
        assert!(msg.ends_with(".\n"));
        assert_eq!(msg.lines().count(), 3);
    }
}
