//! # Schema Cache
//!
//! Process-wide memo of each class's [`Schema`], keyed by the class's
//! `TypeId`. A class is introspected the first time it is constructed and
//! the entry is never invalidated.
//!
//! ## Concurrency
//!
//! Introspection runs outside the lock. Two threads racing on the same
//! class may both compute a schema; the first insert wins and the other copy
//! is dropped. Schemas are a pure function of the declaration, so either copy
//! is equivalent.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::class::DtoClass;
use crate::descriptor::FieldDescriptor;

static CACHE: OnceLock<RwLock<HashMap<TypeId, Arc<Schema>>>> = OnceLock::new();

fn cache() -> &'static RwLock<HashMap<TypeId, Arc<Schema>>> {
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// The ordered field descriptors of one class.
#[derive(Debug)]
pub struct Schema {
    class: DtoClass,
    fields: IndexMap<String, FieldDescriptor>,
    ignore_missing: bool,
}

impl Schema {
    /// Introspect `class` without consulting the cache.
    pub fn introspect(class: DtoClass) -> Self {
        let fields = class
            .declaration()
            .into_fields()
            .into_iter()
            .map(|declaration| {
                let descriptor = FieldDescriptor::from_declaration(declaration);
                (descriptor.name().to_string(), descriptor)
            })
            .collect();
        Self {
            class,
            fields,
            ignore_missing: class.ignore_missing(),
        }
    }

    pub fn class(&self) -> DtoClass {
        self.class
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Descriptors in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn ignore_missing(&self) -> bool {
        self.ignore_missing
    }
}

/// Accessor for the process-wide schema memo.
pub struct SchemaCache;

impl SchemaCache {
    /// Return the cached schema for `class`, introspecting it on first use.
    pub fn resolve(class: DtoClass) -> Arc<Schema> {
        if let Some(schema) = cache().read().get(&class.type_id()) {
            return Arc::clone(schema);
        }

        let schema = Arc::new(Schema::introspect(class));
        tracing::debug!(
            class = class.name(),
            fields = schema.len(),
            "introspected DTO schema"
        );

        let mut entries = cache().write();
        Arc::clone(entries.entry(class.type_id()).or_insert(schema))
    }

    /// Whether `class` has been introspected in this process.
    pub fn contains(class: DtoClass) -> bool {
        cache().read().contains_key(&class.type_id())
    }
}
