//! # Class Declarations
//!
//! A DTO class is a Rust type implementing [`DataTransferObject`]. The type
//! itself carries no data; it names the class and declares its fields once
//! through [`DataTransferObject::declare`]. [`DtoClass`] is the copyable
//! handle the engine passes around in place of the type parameter, so nested
//! field types can point at other classes at runtime.
//!
//! ```
//! use dtokit::{DataTransferObject, Declaration, TypeTag};
//!
//! struct Address;
//!
//! impl DataTransferObject for Address {
//!     const NAME: &'static str = "Address";
//!
//!     fn declare(fields: &mut Declaration) {
//!         fields.field("street", TypeTag::String);
//!         fields.field("zip", TypeTag::String).nullable();
//!     }
//! }
//!
//! struct User;
//!
//! impl DataTransferObject for User {
//!     const NAME: &'static str = "User";
//!
//!     fn declare(fields: &mut Declaration) {
//!         fields.field("id", TypeTag::Int);
//!         fields.field("address", TypeTag::dto::<Address>()).nullable();
//!         fields.field("active", TypeTag::Bool).default_value(true);
//!     }
//! }
//! ```

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::caster::{Cast, ValueCaster};
use crate::descriptor::TypeTag;
use crate::dto::{ConstructionPipeline, Dto};
use crate::error::DtoError;
use crate::immutable::ImmutableDto;
use crate::value::{Map, Value};

/// A declared DTO class.
pub trait DataTransferObject: 'static {
    /// Class name used in diagnostics.
    const NAME: &'static str;

    /// Declare the class's fields, in order.
    fn declare(fields: &mut Declaration);

    /// Accept and drop input keys that are not declared fields.
    fn ignore_missing() -> bool {
        false
    }

    /// Caster applied to raw values of this class's fields.
    fn value_caster() -> &'static dyn Cast {
        &ValueCaster
    }

    /// Handle for this class.
    fn class() -> DtoClass
    where
        Self: Sized,
    {
        DtoClass::of::<Self>()
    }

    /// Build and validate an instance from a raw mapping.
    fn construct(raw: Map) -> Result<Dto, DtoError>
    where
        Self: Sized,
    {
        ConstructionPipeline::new(Self::class()).construct(raw)
    }

    /// Build an instance and wrap it in an [`ImmutableDto`].
    fn immutable(raw: Map) -> Result<ImmutableDto, DtoError>
    where
        Self: Sized,
    {
        Self::construct(raw).map(ImmutableDto::new)
    }

    /// Build one instance per raw mapping. The first failure aborts.
    fn array_of<I>(raws: I) -> Result<Vec<Dto>, DtoError>
    where
        Self: Sized,
        I: IntoIterator<Item = Map>,
    {
        let pipeline = ConstructionPipeline::new(Self::class());
        raws.into_iter().map(|raw| pipeline.construct(raw)).collect()
    }
}

/// A declared collection class whose items are DTOs of one element class.
pub trait DtoCollectionType: 'static {
    /// Class name used in diagnostics.
    const NAME: &'static str;

    /// The element class, or `None` when the collection is untyped.
    fn element_type() -> Option<DtoClass>;
}

/// Runtime handle for a [`DataTransferObject`] implementation.
///
/// Equality and hashing follow the implementing type's `TypeId`.
#[derive(Clone, Copy)]
pub struct DtoClass {
    type_id: TypeId,
    name: &'static str,
    declare: fn(&mut Declaration),
    ignore_missing: fn() -> bool,
    caster: fn() -> &'static dyn Cast,
}

impl DtoClass {
    pub fn of<T: DataTransferObject>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::NAME,
            declare: T::declare,
            ignore_missing: T::ignore_missing,
            caster: T::value_caster,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn ignore_missing(&self) -> bool {
        (self.ignore_missing)()
    }

    pub fn caster(&self) -> &'static dyn Cast {
        (self.caster)()
    }

    /// Run the class's field declaration.
    pub fn declaration(&self) -> Declaration {
        let mut declaration = Declaration::default();
        (self.declare)(&mut declaration);
        declaration
    }
}

impl PartialEq for DtoClass {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for DtoClass {}

impl Hash for DtoClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for DtoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DtoClass").field(&self.name).finish()
    }
}

/// Runtime handle for a [`DtoCollectionType`] implementation.
#[derive(Clone, Copy)]
pub struct CollectionClass {
    type_id: TypeId,
    name: &'static str,
    element: fn() -> Option<DtoClass>,
}

impl CollectionClass {
    pub fn of<C: DtoCollectionType>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            name: C::NAME,
            element: C::element_type,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn element_type(&self) -> Option<DtoClass> {
        (self.element)()
    }
}

impl PartialEq for CollectionClass {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for CollectionClass {}

impl fmt::Debug for CollectionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CollectionClass").field(&self.name).finish()
    }
}

/// The ordered field list a class declares.
#[derive(Debug, Clone, Default)]
pub struct Declaration {
    fields: Vec<FieldDeclaration>,
}

impl Declaration {
    /// Declare a field with its first allowed type. Declaring a name again
    /// replaces the earlier declaration in place.
    pub fn field(&mut self, name: impl Into<String>, ty: TypeTag) -> &mut FieldDeclaration {
        let field = FieldDeclaration::new(name.into(), ty);
        let index = match self.fields.iter().position(|f| f.name == field.name) {
            Some(index) => {
                self.fields[index] = field;
                index
            }
            None => {
                self.fields.push(field);
                self.fields.len() - 1
            }
        };
        &mut self.fields[index]
    }

    pub fn fields(&self) -> &[FieldDeclaration] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn into_fields(self) -> Vec<FieldDeclaration> {
        self.fields
    }
}

/// One declared field: its types, nullability and default.
#[derive(Debug, Clone)]
pub struct FieldDeclaration {
    pub(crate) name: String,
    pub(crate) types: Vec<TypeTag>,
    pub(crate) nullable: bool,
    pub(crate) default: Option<Value>,
}

impl FieldDeclaration {
    fn new(name: String, ty: TypeTag) -> Self {
        Self {
            name,
            types: vec![ty],
            nullable: false,
            default: None,
        }
    }

    /// Allow an additional type (union).
    pub fn or(&mut self, ty: TypeTag) -> &mut Self {
        if !self.types.contains(&ty) {
            self.types.push(ty);
        }
        self
    }

    /// Accept `null`.
    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    /// Fallback used when the input does not supply the field.
    pub fn default_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
