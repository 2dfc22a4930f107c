//! Classes shared by the unit tests.

use crate::class::{DataTransferObject, Declaration, DtoClass, DtoCollectionType};
use crate::descriptor::TypeTag;
use crate::value::{Map, Value};

/// Raw mapping from a `json!` object literal.
pub fn raw(json: serde_json::Value) -> Map {
    match Value::from(json) {
        Value::Map(map) => map,
        other => panic!("fixture is not an object: {other:?}"),
    }
}

pub struct Address;

impl DataTransferObject for Address {
    const NAME: &'static str = "Address";

    fn declare(fields: &mut Declaration) {
        fields.field("street", TypeTag::String);
        fields.field("zip", TypeTag::String).nullable();
    }
}

pub struct User;

impl DataTransferObject for User {
    const NAME: &'static str = "User";

    fn declare(fields: &mut Declaration) {
        fields.field("id", TypeTag::Int);
        fields.field("name", TypeTag::String).nullable();
        fields.field("address", TypeTag::dto::<Address>()).nullable();
        fields.field("active", TypeTag::Bool).default_value(true);
    }
}

pub struct Tag;

impl DataTransferObject for Tag {
    const NAME: &'static str = "Tag";

    fn declare(fields: &mut Declaration) {
        fields.field("label", TypeTag::String);
    }
}

pub struct Tags;

impl DtoCollectionType for Tags {
    const NAME: &'static str = "Tags";

    fn element_type() -> Option<DtoClass> {
        Some(Tag::class())
    }
}

pub struct LooseTags;

impl DtoCollectionType for LooseTags {
    const NAME: &'static str = "LooseTags";

    fn element_type() -> Option<DtoClass> {
        None
    }
}

pub struct Order;

impl DataTransferObject for Order {
    const NAME: &'static str = "Order";

    fn declare(fields: &mut Declaration) {
        fields.field("id", TypeTag::Int);
        fields.field("tags", TypeTag::collection::<Tags>()).nullable();
        fields
            .field("lines", TypeTag::array_of(TypeTag::dto::<Tag>()))
            .default_value(Value::List(Vec::new()));
    }
}

pub struct Untagged;

impl DataTransferObject for Untagged {
    const NAME: &'static str = "Untagged";

    fn declare(fields: &mut Declaration) {
        fields.field("tags", TypeTag::collection::<LooseTags>()).nullable();
    }
}

pub struct Lenient;

impl DataTransferObject for Lenient {
    const NAME: &'static str = "Lenient";

    fn declare(fields: &mut Declaration) {
        fields.field("code", TypeTag::String);
    }

    fn ignore_missing() -> bool {
        true
    }
}
