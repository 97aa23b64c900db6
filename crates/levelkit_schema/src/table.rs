//! Declarative schema tables.
//!
//! A [`SchemaTable`] lists the fields every entity may carry (the common
//! group) plus the fields specific to each entity type. It is plain data; the
//! [`Registry`](crate::Registry) compiles it once into lookup tables.

use levelkit_foundation::{EntityType, FieldKey, FieldType};

/// Schema definition for a single field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    /// Field key.
    pub key: FieldKey,
    /// Declared type.
    pub ty: FieldType,
    /// Human-readable name, used in diagnostics.
    pub name: &'static str,
}

impl FieldDef {
    /// Creates a field definition.
    #[must_use]
    pub const fn new(key: u32, name: &'static str, ty: FieldType) -> Self {
        Self {
            key: FieldKey::new(key),
            ty,
            name,
        }
    }
}

/// Field definitions for one or more entity types sharing a layout.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeSchema {
    /// Schema name (e.g. `move`, `collectible`).
    pub name: &'static str,
    /// Entity types using this layout.
    pub types: Vec<EntityType>,
    /// Type-specific fields, including inherited groups.
    pub fields: Vec<FieldDef>,
}

impl TypeSchema {
    /// Creates an empty schema for the given entity types.
    #[must_use]
    pub fn new(name: &'static str, types: impl IntoIterator<Item = EntityType>) -> Self {
        Self {
            name,
            types: types.into_iter().collect(),
            fields: Vec::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Inherits a shared group of fields (e.g. the trigger base fields).
    ///
    /// Fields already declared by this schema take precedence.
    #[must_use]
    pub fn extend(mut self, group: &[FieldDef]) -> Self {
        for def in group {
            if self.field(def.key).is_none() {
                self.fields.push(def.clone());
            }
        }
        self
    }

    /// Returns the field definition by key.
    #[must_use]
    pub fn field(&self, key: FieldKey) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// The full schema: common fields plus per-type layouts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaTable {
    /// Fields legal on every entity type.
    pub common: Vec<FieldDef>,
    /// Type-specific layouts.
    pub types: Vec<TypeSchema>,
}

impl SchemaTable {
    /// Creates a table with the given common fields.
    #[must_use]
    pub fn new(common: Vec<FieldDef>) -> Self {
        Self {
            common,
            types: Vec::new(),
        }
    }

    /// Adds a type layout.
    #[must_use]
    pub fn with_type(mut self, schema: TypeSchema) -> Self {
        self.types.push(schema);
        self
    }

    /// Returns the layout covering an entity type.
    #[must_use]
    pub fn layout(&self, entity_type: EntityType) -> Option<&TypeSchema> {
        self.types.iter().find(|t| t.types.contains(&entity_type))
    }
}
