//! # DTO Instances & Construction
//!
//! [`ConstructionPipeline`] turns a raw [`Map`] into a validated [`Dto`].
//! For each field, in declaration order:
//!
//! 1. A field is *supplied* when its key is present with a non-null value.
//!    Unsupplied, no default and not nullable fails immediately with
//!    [`DtoError::Uninitialized`].
//! 2. The candidate is the supplied value, else the default, else `null`.
//! 3. Raw candidates (lists, mappings) go through the class's [`Cast`].
//! 4. The result is type-checked. Mismatches are recorded and the scan
//!    continues, so one call reports every wrong field.
//! 5. Accepted values are committed and their key consumed from the input.
//!
//! Recorded mismatches fail with [`DtoError::InvalidTypes`]. Only when
//! typing succeeded are leftover input keys rejected with
//! [`DtoError::UnknownProperties`], unless unknown keys are ignored.
//!
//! [`Cast`]: crate::caster::Cast

use std::sync::Arc;

use crate::cache::{Schema, SchemaCache};
use crate::class::{DataTransferObject, DtoClass};
use crate::error::{DtoError, InvalidType, InvalidTypes};
use crate::value::{map_from_json, Map, Value};

/// Builds validated [`Dto`]s of one class.
#[derive(Debug, Clone)]
pub struct ConstructionPipeline {
    schema: Arc<Schema>,
    ignore_missing: bool,
}

impl ConstructionPipeline {
    /// Pipeline for `class` using the class's own unknown-key policy.
    pub fn new(class: DtoClass) -> Self {
        let schema = SchemaCache::resolve(class);
        let ignore_missing = schema.ignore_missing();
        Self {
            schema,
            ignore_missing,
        }
    }

    /// Override whether unknown input keys are dropped instead of rejected.
    /// Applies to the top-level object only; nested classes keep their own policy.
    pub fn ignore_missing(mut self, ignore: bool) -> Self {
        self.ignore_missing = ignore;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validate `raw` and build an instance.
    pub fn construct(&self, mut raw: Map) -> Result<Dto, DtoError> {
        let class = self.schema.class();
        let caster = class.caster();
        let mut values = Map::with_capacity(self.schema.len());
        let mut invalid = Vec::new();

        for field in self.schema.fields() {
            let supplied = raw.shift_remove(field.name()).filter(|v| !v.is_null());

            if supplied.is_none() && !field.has_default_value() && !field.is_nullable() {
                tracing::debug!(
                    class = class.name(),
                    field = field.name(),
                    "rejected DTO input: missing required field"
                );
                return Err(DtoError::uninitialized(class.name(), field.name()));
            }

            let candidate = supplied
                .or_else(|| field.default_value().cloned())
                .unwrap_or_default();

            let value = if candidate.is_raw() {
                caster.cast(candidate, field)?
            } else {
                candidate
            };

            if !field.is_valid_type(&value) {
                invalid.push(InvalidType::new(
                    class.name(),
                    field.name(),
                    field.expected_types(),
                    &value,
                ));
                continue;
            }

            values.insert(field.name().to_string(), value);
        }

        if !invalid.is_empty() {
            tracing::debug!(
                class = class.name(),
                errors = invalid.len(),
                "rejected DTO input: invalid types"
            );
            return Err(DtoError::InvalidTypes(InvalidTypes::new(invalid)));
        }

        if !self.ignore_missing && !raw.is_empty() {
            let properties: Vec<String> = raw.into_keys().collect();
            tracing::debug!(
                class = class.name(),
                unknown = properties.len(),
                "rejected DTO input: unknown properties"
            );
            return Err(DtoError::unknown_properties(properties, class.name()));
        }

        Ok(Dto {
            schema: Arc::clone(&self.schema),
            values,
            ignore_missing: self.ignore_missing,
            except_keys: Vec::new(),
            only_keys: Vec::new(),
        })
    }
}

/// A validated instance of a DTO class.
///
/// Values are stored in declaration order. `only`/`except` selectors are
/// never changed in place; see [`Dto::only`] and [`Dto::except`].
#[derive(Debug, Clone)]
pub struct Dto {
    schema: Arc<Schema>,
    pub(crate) values: Map,
    ignore_missing: bool,
    pub(crate) except_keys: Vec<String>,
    pub(crate) only_keys: Vec<String>,
}

impl Dto {
    /// Construct an instance of `T` from a raw mapping.
    pub fn construct<T: DataTransferObject>(raw: Map) -> Result<Self, DtoError> {
        ConstructionPipeline::new(T::class()).construct(raw)
    }

    /// Construct an instance of `class` from a raw mapping.
    pub fn construct_class(class: DtoClass, raw: Map) -> Result<Self, DtoError> {
        ConstructionPipeline::new(class).construct(raw)
    }

    /// Construct an instance of `T` from a decoded JSON object.
    pub fn from_json<T: DataTransferObject>(
        raw: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, DtoError> {
        Self::construct::<T>(map_from_json(raw))
    }

    pub fn class(&self) -> DtoClass {
        self.schema.class()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether unknown keys were ignored when this instance was built.
    pub fn ignores_missing(&self) -> bool {
        self.ignore_missing
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Field values in declaration order.
    pub fn fields(&self) -> &Map {
        &self.values
    }

    /// Replace a field's value. The value is cast and type-checked against the
    /// field's descriptor; the previous value is returned.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Value, DtoError> {
        let class = self.schema.class();
        let Some(field) = self.schema.field(name) else {
            return Err(DtoError::unknown_properties(vec![name.to_string()], class.name()));
        };
        let value = value.into();
        let value = if value.is_raw() {
            class.caster().cast(value, field)?
        } else {
            value
        };
        if !field.is_valid_type(&value) {
            let entry = InvalidType::new(class.name(), name, field.expected_types(), &value);
            return Err(DtoError::InvalidTypes(InvalidTypes::new(vec![entry])));
        }
        Ok(self.values.insert(name.to_string(), value).unwrap_or_default())
    }
}

impl PartialEq for Dto {
    fn eq(&self, other: &Self) -> bool {
        self.class() == other.class()
            && self.values == other.values
            && self.except_keys == other.except_keys
            && self.only_keys == other.only_keys
    }
}

/// Read/write access to fields by name.
///
/// Implemented by both [`Dto`] and [`ImmutableDto`](crate::ImmutableDto), so
/// code that handles either can attempt writes and get a uniform error.
pub trait Fields {
    fn field(&self, name: &str) -> Option<&Value>;

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), DtoError>;
}

impl Fields for Dto {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), DtoError> {
        self.set(name, value).map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{raw, Lenient, Order, User};
    use serde_json::json;

    #[test]
    fn test_scenario_nullable_field_defaults_to_null() {
        let dto = User::construct(raw(json!({"id": 5}))).unwrap();
        assert_eq!(dto.get("id"), Some(&Value::Int(5)));
        assert_eq!(dto.get("name"), Some(&Value::Null));
        assert_eq!(dto.get("active"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_scenario_missing_required_field() {
        let err = User::construct(Map::new()).unwrap_err();
        assert_eq!(
            err,
            DtoError::Uninitialized {
                class: "User".into(),
                field: "id".into()
            }
        );
    }

    #[test]
    fn test_scenario_unknown_property() {
        let err = User::construct(raw(json!({"id": 5, "name": "x", "extra": 1}))).unwrap_err();
        assert_eq!(
            err,
            DtoError::UnknownProperties {
                properties: vec!["extra".into()],
                class: "User".into()
            }
        );
    }

    #[test]
    fn test_explicit_null_counts_as_absent() {
        let err = User::construct(raw(json!({"id": null}))).unwrap_err();
        assert!(matches!(err, DtoError::Uninitialized { .. }));

        let dto = User::construct(raw(json!({"id": 1, "active": null}))).unwrap();
        assert_eq!(dto.get("active"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_type_errors_are_aggregated() {
        let err = User::construct(raw(json!({"id": "five", "name": 3}))).unwrap_err();
        let DtoError::InvalidTypes(types) = err else {
            panic!("expected InvalidTypes");
        };
        assert_eq!(types.len(), 2);
        assert_eq!(types.entries()[0].field, "id");
        assert_eq!(types.entries()[1].field, "name");
        assert_eq!(types.entries()[1].expected, ["string", "null"]);
    }

    #[test]
    fn test_type_errors_reported_before_unknown_keys() {
        let err = User::construct(raw(json!({"id": "five", "bogus": 1}))).unwrap_err();
        assert!(matches!(err, DtoError::InvalidTypes(ref t) if t.len() == 1));
    }

    #[test]
    fn test_missing_field_aborts_despite_earlier_type_errors() {
        struct Pair;

        impl DataTransferObject for Pair {
            const NAME: &'static str = "Pair";

            fn declare(fields: &mut crate::Declaration) {
                fields.field("label", crate::TypeTag::String);
                fields.field("count", crate::TypeTag::Int);
            }
        }

        let err = Pair::construct(raw(json!({"label": 1}))).unwrap_err();
        assert!(matches!(err, DtoError::Uninitialized { ref field, .. } if field == "count"));
    }

    #[test]
    fn test_default_is_type_checked() {
        let dto = Order::construct(raw(json!({"id": 1}))).unwrap();
        assert_eq!(dto.get("lines"), Some(&Value::List(vec![])));
        assert_eq!(dto.get("tags"), Some(&Value::Null));
    }

    #[test]
    fn test_unknown_keys_listed_in_input_order() {
        let err = User::construct(raw(json!({"zeta": 1, "id": 1, "alpha": 2}))).unwrap_err();
        assert_eq!(err.to_string(), "Public properties `zeta`, `alpha` not found on User");
    }

    #[test]
    fn test_pipeline_override_ignores_unknown_keys() {
        let input = raw(json!({"id": 5, "bogus": true}));
        assert!(User::construct(input.clone()).is_err());
        let dto = ConstructionPipeline::new(User::class())
            .ignore_missing(true)
            .construct(input)
            .unwrap();
        assert!(dto.get("bogus").is_none());
        assert!(dto.ignores_missing());
    }

    #[test]
    fn test_class_level_ignore_missing() {
        let dto = Lenient::construct(raw(json!({"code": "a", "bogus": 1}))).unwrap();
        assert_eq!(dto.fields().len(), 1);
    }

    #[test]
    fn test_nested_dto_is_constructed() {
        let dto = User::construct(raw(json!({
            "id": 1,
            "address": {"street": "Main St", "zip": "12345"}
        })))
        .unwrap();
        let address = dto.get("address").and_then(Value::as_dto).unwrap();
        assert_eq!(address.get("zip"), Some(&Value::from("12345")));
    }

    #[test]
    fn test_array_of_builds_each_element() {
        let dtos = User::array_of(vec![raw(json!({"id": 1})), raw(json!({"id": 2}))]).unwrap();
        assert_eq!(dtos.len(), 2);
        assert_eq!(dtos[1].get("id"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_from_json_object() {
        let serde_json::Value::Object(object) = json!({"id": 9}) else {
            unreachable!()
        };
        let dto = Dto::from_json::<User>(object).unwrap();
        assert_eq!(dto.class(), User::class());
    }

    #[test]
    fn test_set_validates_value() {
        let mut dto = User::construct(raw(json!({"id": 1}))).unwrap();
        assert_eq!(dto.set("name", "Ada").unwrap(), Value::Null);
        assert_eq!(dto.get("name"), Some(&Value::from("Ada")));

        let err = dto.set("id", "nope").unwrap_err();
        assert!(err.to_string().starts_with("Invalid type: expected `User::id`"));

        let err = dto.set_field("bogus", Value::Int(1)).unwrap_err();
        assert!(matches!(err, DtoError::UnknownProperties { .. }));
    }

    #[test]
    fn test_set_casts_raw_mapping() {
        let mut dto = User::construct(raw(json!({"id": 1}))).unwrap();
        dto.set("address", Value::from(json!({"street": "Elm"}))).unwrap();
        assert!(dto.get("address").and_then(Value::as_dto).is_some());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::fixtures::{raw, User};
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        /// Well-typed input constructs and projects back to the same values.
        #[test]
        fn valid_input_round_trips(
            id in any::<i64>(),
            name in proptest::option::of("[a-zA-Z ]{0,20}"),
            active in any::<bool>(),
        ) {
            let dto = User::construct(raw(json!({"id": id, "name": name, "active": active}))).unwrap();
            prop_assert_eq!(
                dto.to_json(),
                json!({"id": id, "name": name, "address": null, "active": active})
            );
        }

        /// Leftover keys are reported in input order once typing succeeded.
        #[test]
        fn extra_keys_are_rejected(extras in prop::collection::btree_set("x[a-z]{1,8}", 1..4)) {
            let mut input = raw(json!({"id": 1}));
            for key in &extras {
                input.insert(key.clone(), Value::Int(0));
            }
            let err = User::construct(input).unwrap_err();
            prop_assert_eq!(
                err,
                DtoError::UnknownProperties {
                    properties: extras.into_iter().collect(),
                    class: "User".to_string(),
                }
            );
        }

        /// A string id always fails typing regardless of its content.
        #[test]
        fn string_id_is_a_type_error(id in "[0-9a-z]{0,10}") {
            let err = User::construct(raw(json!({"id": id}))).unwrap_err();
            prop_assert!(matches!(err, DtoError::InvalidTypes(ref types) if types.len() == 1));
        }
    }
}
