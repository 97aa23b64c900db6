//! Validated level entities.
//!
//! An [`Entity`] owns its type, its field map, and the validator that guards
//! every write. The type is read from `a1` once at construction and never
//! changes afterwards.

use std::fmt;
use std::sync::Arc;

use levelkit_foundation::{
    EntityType, Error, ErrorKind, FieldKey, Fields, LkSet, Result, Value,
};
use levelkit_schema::builtin::props;
use levelkit_schema::{BuiltinDefaults, DefaultsProvider, Validator};

/// One placed object or trigger.
#[derive(Clone)]
pub struct Entity {
    ty: EntityType,
    fields: Fields,
    validator: Validator,
}

impl Entity {
    /// Returns the entity type.
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        self.ty
    }

    /// Returns the field map.
    #[must_use]
    pub const fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Consumes the entity, returning its field map.
    #[must_use]
    pub fn into_fields(self) -> Fields {
        self.fields
    }

    /// Returns the validator guarding this entity.
    #[must_use]
    pub const fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Returns a field's value, if set.
    #[must_use]
    pub fn get(&self, key: FieldKey) -> Option<&Value> {
        self.fields.get(&key)
    }

    /// Returns a field's value, rejecting keys illegal for this type.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotAllowed` if the key is not in this type's schema and
    /// the allowed-key check is enabled.
    pub fn field(&self, key: FieldKey) -> Result<Option<&Value>> {
        if self.validator.settings().check_allowed_keys
            && !self.validator.registry().allowed(self.ty, key)
        {
            return Err(Error::field_not_allowed(self.ty, key));
        }
        Ok(self.fields.get(&key))
    }

    /// Returns true if the field is set.
    #[must_use]
    pub fn contains_key(&self, key: FieldKey) -> bool {
        self.fields.contains_key(&key)
    }

    /// Returns the number of fields set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &Value)> {
        self.fields.iter()
    }

    /// Validates and writes a field.
    ///
    /// Composite values written in their dot-delimited form are stored typed.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotAllowed` or `InvalidFieldValue`; the entity is left
    /// unchanged.
    pub fn set(&mut self, key: FieldKey, value: impl Into<Value>) -> Result<()> {
        let value = self
            .validator
            .normalize(self.ty, key, value.into(), Some(&self.fields))?;
        self.fields = self.fields.insert(key, value);
        Ok(())
    }

    /// Validates every write first, then applies them all.
    ///
    /// # Errors
    ///
    /// Returns the first rejection; nothing is applied in that case.
    pub fn update<I, V>(&mut self, writes: I) -> Result<()>
    where
        I: IntoIterator<Item = (FieldKey, V)>,
        V: Into<Value>,
    {
        let mut staged = Vec::new();
        for (key, value) in writes {
            let value = self
                .validator
                .normalize(self.ty, key, value.into(), Some(&self.fields))?;
            staged.push((key, value));
        }
        for (key, value) in staged {
            self.fields = self.fields.insert(key, value);
        }
        Ok(())
    }

    /// Removes a field, returning its old value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFieldValue` when asked to remove the identity field.
    pub fn remove(&mut self, key: FieldKey) -> Result<Option<Value>> {
        if key.is_identity() {
            return Err(Error::invalid_value(
                self.ty,
                key,
                Value::Int(i64::from(self.ty.get())),
                "identity field cannot be removed",
                Some(self.fields.clone()),
            ));
        }
        let old = self.fields.get(&key).cloned();
        self.fields = self.fields.remove(&key);
        Ok(old)
    }

    /// Returns the entity's group memberships.
    #[must_use]
    pub fn groups(&self) -> LkSet<i64> {
        self.fields
            .get(&props::GROUPS)
            .and_then(Value::as_groups)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns true if the entity belongs to `group`.
    #[must_use]
    pub fn in_group(&self, group: i64) -> bool {
        self.fields
            .get(&props::GROUPS)
            .and_then(Value::as_groups)
            .is_some_and(|groups| groups.contains(&group))
    }

    /// Adds the entity to a group.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFieldValue` if the group is outside the id domain.
    pub fn add_group(&mut self, group: i64) -> Result<()> {
        let groups = self.groups().insert(group);
        self.set(props::GROUPS, Value::Groups(groups))
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.fields == other.fields
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("type", &self.ty)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Constructs entities with defaults applied and identity fixed.
#[derive(Clone)]
pub struct EntityBuilder {
    validator: Validator,
    defaults: Arc<dyn DefaultsProvider>,
}

impl EntityBuilder {
    /// Creates a builder.
    #[must_use]
    pub fn new(validator: Validator, defaults: Arc<dyn DefaultsProvider>) -> Self {
        Self {
            validator,
            defaults,
        }
    }

    /// Creates a builder over the built-in table and defaults.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Validator::builtin(), Arc::new(BuiltinDefaults))
    }

    /// Returns the validator handed to every constructed entity.
    #[must_use]
    pub const fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Constructs a fresh entity of `ty` with its defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a default value fails validation.
    pub fn construct(&self, ty: EntityType) -> Result<Entity> {
        let mut entity = Entity {
            ty,
            fields: Fields::new().insert(FieldKey::ID, Value::Int(i64::from(ty.get()))),
            validator: self.validator.clone(),
        };
        entity.update(self.defaults.defaults(ty))?;
        Ok(entity)
    }

    /// Builds an entity from an existing field map, validating every field.
    ///
    /// # Errors
    ///
    /// Returns `MissingIdentity` if `a1` is absent or not an integer,
    /// `InvalidEntityType` if it is not positive, or the first rejected field.
    pub fn from_fields(&self, fields: Fields) -> Result<Entity> {
        let ty = identity(&fields)?;
        let fields = self.validator.normalize_fields(ty, &fields)?;
        Ok(self.wrap(ty, fields))
    }

    /// Builds an entity from a trusted field map; only the identity is read.
    ///
    /// Used by loaders whose source is already known to be valid.
    ///
    /// # Errors
    ///
    /// Returns `MissingIdentity` or `InvalidEntityType`.
    pub fn from_fields_unchecked(&self, fields: Fields) -> Result<Entity> {
        let ty = identity(&fields)?;
        Ok(self.wrap(ty, fields))
    }

    fn wrap(&self, ty: EntityType, fields: Fields) -> Entity {
        Entity {
            ty,
            fields,
            validator: self.validator.clone(),
        }
    }
}

impl Default for EntityBuilder {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for EntityBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityBuilder")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

fn identity(fields: &Fields) -> Result<EntityType> {
    match fields.get(&FieldKey::ID) {
        Some(Value::Int(raw)) => EntityType::new(*raw),
        _ => Err(Error::new(ErrorKind::MissingIdentity)),
    }
}
