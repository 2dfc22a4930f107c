//! # dtokit: Runtime DTO Validation & Casting
//!
//! Builds validated data-transfer objects from untyped input mappings.
//! A class declares its fields once; construction enforces presence,
//! nullability and type rules, rejects unknown keys, and casts nested
//! mappings into nested DTOs and typed collections.
//!
//! ## Flow
//!
//! raw [`Map`] → [`ConstructionPipeline`] (consults [`SchemaCache`] and the
//! class's [`Cast`]) → [`Dto`] → optionally [`ImmutableDto`] → optionally
//! [`Dto::only`] / [`Dto::except`] / [`Dto::to_array`].
//!
//! ```
//! use dtokit::{decode, DataTransferObject, Declaration, DtoError, TypeTag, Value};
//!
//! struct User;
//!
//! impl DataTransferObject for User {
//!     const NAME: &'static str = "User";
//!
//!     fn declare(fields: &mut Declaration) {
//!         fields.field("id", TypeTag::Int);
//!         fields.field("name", TypeTag::String).nullable();
//!     }
//! }
//!
//! let user = User::construct(decode::json_mapping(r#"{"id": 5}"#).unwrap()).unwrap();
//! assert_eq!(user.get("name"), Some(&Value::Null));
//!
//! let err = User::construct(decode::json_mapping(r#"{"id": 5, "extra": 1}"#).unwrap());
//! assert!(matches!(err, Err(DtoError::UnknownProperties { .. })));
//! ```
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Errors are returned, never logged and swallowed. `tracing` events are
//!   emitted at `debug`/`trace` level; installing a subscriber is up to the
//!   application.

pub mod arr;
pub mod cache;
pub mod caster;
pub mod class;
pub mod collection;
pub mod decode;
pub mod descriptor;
pub mod dto;
pub mod error;
pub mod immutable;
pub mod projection;
pub mod value;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export primary types for ergonomic imports.
pub use cache::{Schema, SchemaCache};
pub use caster::{Cast, ValueCaster};
pub use class::{
    CollectionClass, DataTransferObject, Declaration, DtoClass, DtoCollectionType,
    FieldDeclaration,
};
pub use collection::DtoCollection;
pub use decode::DecodeError;
pub use descriptor::{FieldDescriptor, TypeTag};
pub use dto::{ConstructionPipeline, Dto, Fields};
pub use error::{DtoError, InvalidType, InvalidTypes};
pub use immutable::ImmutableDto;
pub use value::{Map, Value};
