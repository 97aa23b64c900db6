//! Field-write validation.
//!
//! [`Validator::validate`] runs, in order:
//! 1. the allowed-key check,
//! 2. the identity check (`a1` must equal the entity type),
//! 3. the value check: predicate, reference range, or composite rule.
//!
//! Validation is pure. It never mutates the owning entity.

use std::sync::Arc;

use levelkit_foundation::{
    EntityType, Error, ErrorKind, FieldKey, Fields, LkMap, LkSet, Result, Value, MAX_ID, MIN_ID,
};
use tracing::debug;

use crate::codec;
use crate::ranges::RangeTable;
use crate::registry::{CompositeRule, FieldSpec, Registry};

/// Smallest event id.
pub const MIN_EVENT: i64 = 0;
/// Largest event id.
pub const MAX_EVENT: i64 = 80;

/// Toggles and tables controlling validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationSettings {
    /// Reject keys not in the entity type's schema.
    pub check_allowed_keys: bool,
    /// Run predicates, range rules, and composite rules.
    pub check_values: bool,
    /// Domains for reference fields.
    pub ranges: RangeTable,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            check_allowed_keys: true,
            check_values: true,
            ranges: RangeTable::default(),
        }
    }
}

impl ValidationSettings {
    /// Enables or disables the allowed-key check.
    #[must_use]
    pub fn with_allowed_keys(mut self, enabled: bool) -> Self {
        self.check_allowed_keys = enabled;
        self
    }

    /// Enables or disables value checks.
    #[must_use]
    pub fn with_values(mut self, enabled: bool) -> Self {
        self.check_values = enabled;
        self
    }

    /// Replaces the range table.
    #[must_use]
    pub fn with_ranges(mut self, ranges: RangeTable) -> Self {
        self.ranges = ranges;
        self
    }
}

/// Validates field writes against a [`Registry`].
///
/// Cloning is cheap; clones share the registry and settings.
#[derive(Clone, Debug)]
pub struct Validator {
    registry: Arc<Registry>,
    settings: Arc<ValidationSettings>,
}

impl Validator {
    /// Creates a validator.
    #[must_use]
    pub fn new(registry: Arc<Registry>, settings: ValidationSettings) -> Self {
        Self {
            registry,
            settings: Arc::new(settings),
        }
    }

    /// Creates a validator over the built-in table with default settings.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Arc::new(Registry::builtin()), ValidationSettings::default())
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &ValidationSettings {
        &self.settings
    }

    /// Validates a single field write.
    ///
    /// `owner` is the entity being written to, if any; it is attached to
    /// rejections.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotAllowed` or `InvalidFieldValue`.
    pub fn validate(
        &self,
        ty: EntityType,
        key: FieldKey,
        value: &Value,
        owner: Option<&Fields>,
    ) -> Result<()> {
        self.check(ty, key, value, owner).map(|_| ())
    }

    /// Validates a write and returns the value in its stored form.
    ///
    /// Composite values written as dot-delimited strings are parsed into
    /// their typed form.
    ///
    /// # Errors
    ///
    /// Same as [`Validator::validate`].
    pub fn normalize(
        &self,
        ty: EntityType,
        key: FieldKey,
        value: Value,
        owner: Option<&Fields>,
    ) -> Result<Value> {
        let parsed = self.check(ty, key, &value, owner)?;
        Ok(parsed.unwrap_or(value))
    }

    /// Validates every field of a map.
    ///
    /// # Errors
    ///
    /// Returns `MissingIdentity` if `a1` is absent, otherwise the first
    /// rejected field.
    pub fn validate_fields(&self, ty: EntityType, fields: &Fields) -> Result<()> {
        if !fields.contains_key(&FieldKey::ID) {
            return Err(Error::new(ErrorKind::MissingIdentity));
        }
        for (key, value) in fields.iter() {
            self.validate(ty, *key, value, Some(fields))?;
        }
        Ok(())
    }

    /// Validates every field of a map and returns it in stored form.
    ///
    /// # Errors
    ///
    /// Same as [`Validator::validate_fields`].
    pub fn normalize_fields(&self, ty: EntityType, fields: &Fields) -> Result<Fields> {
        if !fields.contains_key(&FieldKey::ID) {
            return Err(Error::new(ErrorKind::MissingIdentity));
        }
        let mut out = fields.clone();
        for (key, value) in fields.iter() {
            if let Some(parsed) = self.check(ty, *key, value, Some(fields))? {
                out = out.insert(*key, parsed);
            }
        }
        Ok(out)
    }

    fn check(
        &self,
        ty: EntityType,
        key: FieldKey,
        value: &Value,
        owner: Option<&Fields>,
    ) -> Result<Option<Value>> {
        let spec = self.registry.spec(ty, key);
        if self.settings.check_allowed_keys && spec.is_none() {
            return Err(Error::field_not_allowed(ty, key));
        }

        let reject = |reason: String| {
            Error::invalid_value(ty, key, value.clone(), reason, owner.cloned())
        };

        if key.is_identity() && value.as_int() != Some(i64::from(ty.get())) {
            return Err(reject(format!("identity must be the entity type {ty}")));
        }

        if !self.settings.check_values {
            return Ok(None);
        }
        let Some(spec) = spec else {
            return Ok(None);
        };

        if let Some(rule) = spec.composite {
            return check_composite(ty, key, rule, value).map_err(reject);
        }

        if let Some(predicate) = &spec.predicate {
            if !predicate.test(value) {
                return Err(reject(format!(
                    "expected {}, got {}",
                    spec.declared,
                    value.kind()
                )));
            }
        }

        self.check_reference(ty, key, spec, value).map_err(reject)?;
        Ok(None)
    }

    fn check_reference(
        &self,
        ty: EntityType,
        key: FieldKey,
        spec: &FieldSpec,
        value: &Value,
    ) -> std::result::Result<(), String> {
        let (Some(namespace), Some(id)) = (spec.reference, value.as_int()) else {
            return Ok(());
        };
        let domain = self.settings.ranges.domain(ty, key);
        if domain.contains(id) {
            Ok(())
        } else {
            Err(format!("{namespace} id {id} outside {domain}"))
        }
    }
}

type Verdict = std::result::Result<Option<Value>, String>;

fn check_composite(ty: EntityType, key: FieldKey, rule: CompositeRule, value: &Value) -> Verdict {
    match rule {
        CompositeRule::Groups => check_groups(value),
        CompositeRule::Remap => check_remap(value),
        CompositeRule::Events => check_events(value),
        CompositeRule::Unchecked => {
            debug!(
                target: "levelkit::coverage",
                entity_type = %ty,
                key = %key,
                kind = %value.kind(),
                "composite field accepted without validation"
            );
            Ok(match value {
                Value::Str(s) => codec::parse_int_list(s).ok().map(Value::Sequence),
                _ => None,
            })
        }
    }
}

fn in_domain(id: i64) -> bool {
    (MIN_ID..=MAX_ID).contains(&id)
}

fn check_groups(value: &Value) -> Verdict {
    let (groups, parsed) = match value {
        Value::Groups(groups) => (groups.clone(), None),
        Value::Str(s) => {
            let groups = codec::parse_group_set(s).map_err(|e| e.to_string())?;
            (groups.clone(), Some(Value::Groups(groups)))
        }
        other => return Err(format!("expected group set, got {}", other.kind())),
    };
    if let Some(bad) = groups.iter().find(|g| !in_domain(**g)) {
        return Err(format!("group {bad} outside {MIN_ID}..={MAX_ID}"));
    }
    Ok(parsed)
}

fn check_remap(value: &Value) -> Verdict {
    let (remap, parsed): (LkMap<i64, i64>, _) = match value {
        Value::Remap(remap) => (remap.clone(), None),
        Value::Str(s) => {
            let remap = codec::parse_remap(s).map_err(|e| e.to_string())?;
            (remap.clone(), Some(Value::Remap(remap)))
        }
        other => return Err(format!("expected remap table, got {}", other.kind())),
    };
    for (source, target) in remap.iter() {
        if !in_domain(*source) || !in_domain(*target) {
            return Err(format!(
                "remap {source} -> {target} outside {MIN_ID}..={MAX_ID}"
            ));
        }
        if source == target {
            return Err(format!("redundant remap {source} -> {target}"));
        }
    }
    Ok(parsed)
}

fn check_events(value: &Value) -> Verdict {
    let (events, parsed): (LkSet<i64>, _) = match value {
        Value::Events(events) => (events.clone(), None),
        Value::Str(s) => {
            let events: LkSet<i64> = codec::parse_int_list(s)
                .map_err(|e| e.to_string())?
                .iter()
                .copied()
                .collect();
            (events.clone(), Some(Value::Events(events)))
        }
        other => return Err(format!("expected event set, got {}", other.kind())),
    };
    if let Some(bad) = events.iter().find(|e| !(MIN_EVENT..=MAX_EVENT).contains(*e)) {
        return Err(format!("event {bad} outside {MIN_EVENT}..={MAX_EVENT}"));
    }
    Ok(parsed)
}
