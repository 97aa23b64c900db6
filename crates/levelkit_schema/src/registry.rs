//! Compiled schema registry.
//!
//! The registry is built once from a [`SchemaTable`]. Each declared field
//! type is compiled into a [`FieldSpec`]: scalar types become a
//! [`Predicate`], composite types a [`CompositeRule`]. Lookups are keyed only
//! on `(entity type, field key)`, so results never depend on entity content.

use std::collections::HashMap;

use levelkit_foundation::{
    EntityType, Error, FieldKey, FieldType, Namespace, Value, ValueKind,
};
use tracing::{debug, warn};

use crate::builtin;
use crate::table::{FieldDef, SchemaTable};

/// A compiled scalar value check.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// Always true.
    Any,
    /// Exact kind match.
    Kind(ValueKind),
    /// Int or Float.
    Number,
    /// Membership in a literal set.
    OneOf(Vec<Value>),
    /// True if any component predicate is.
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    /// Tests a value.
    #[must_use]
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Kind(kind) => value.kind() == *kind,
            Self::Number => matches!(value, Value::Int(_) | Value::Float(_)),
            Self::OneOf(values) => values.contains(value),
            Self::AnyOf(preds) => preds.iter().any(|p| p.test(value)),
        }
    }

    fn compile(ty: &FieldType) -> Result<Self, String> {
        match ty {
            FieldType::Bool => Ok(Self::Kind(ValueKind::Bool)),
            FieldType::Int | FieldType::Ref(_) => Ok(Self::Kind(ValueKind::Int)),
            FieldType::Float => Ok(Self::Number),
            FieldType::Str => Ok(Self::Kind(ValueKind::Str)),
            FieldType::Any => Ok(Self::Any),
            FieldType::Literal(values) => {
                if values.is_empty() {
                    return Err("empty literal set".to_string());
                }
                if let Some(v) = values.iter().find(|v| v.kind().is_composite()) {
                    return Err(format!("composite literal {v:?}"));
                }
                Ok(Self::OneOf(values.clone()))
            }
            FieldType::Union(types) => {
                if types.is_empty() {
                    return Err("empty union".to_string());
                }
                types
                    .iter()
                    .map(|t| {
                        if t.is_composite() {
                            Err(format!("composite type {t} inside union"))
                        } else {
                            Self::compile(t)
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Self::AnyOf)
            }
            FieldType::GroupSet
            | FieldType::RemapTable
            | FieldType::EventSet
            | FieldType::Sequence => Err(format!("composite type {ty} has no scalar predicate")),
        }
    }
}

/// Structural check applied to a composite field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompositeRule {
    /// Group-membership set: elements in `1..=9999`, no duplicates.
    Groups,
    /// Remap table: ids in `1..=9999`, no self-maps, no repeated sources.
    Remap,
    /// Event set: elements in `0..=80`.
    Events,
    /// Accepted without structural checks; writes emit a diagnostic.
    Unchecked,
}

impl CompositeRule {
    const fn for_type(ty: &FieldType) -> Option<Self> {
        match ty {
            FieldType::GroupSet => Some(Self::Groups),
            FieldType::RemapTable => Some(Self::Remap),
            FieldType::EventSet => Some(Self::Events),
            FieldType::Sequence => Some(Self::Unchecked),
            _ => None,
        }
    }
}

/// How thoroughly writes to a field are checked.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Coverage {
    /// Values are checked by a predicate or a composite rule.
    Checked,
    /// Composite field with no structural validator.
    Unchecked,
    /// The declared type failed to compile; any value is accepted.
    Unconstrained,
}

/// A compiled field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    /// Human-readable name.
    pub name: &'static str,
    /// Declared type, as written in the table.
    pub declared: FieldType,
    /// Scalar predicate, absent for composites and failed compiles.
    pub predicate: Option<Predicate>,
    /// Composite rule, present for composite fields.
    pub composite: Option<CompositeRule>,
    /// Namespace for reference fields.
    pub reference: Option<Namespace>,
}

impl FieldSpec {
    /// Returns the coverage category of this field.
    #[must_use]
    pub fn coverage(&self) -> Coverage {
        match (self.composite, &self.predicate) {
            (Some(CompositeRule::Unchecked), _) => Coverage::Unchecked,
            (Some(_), _) | (None, Some(_)) => Coverage::Checked,
            (None, None) => Coverage::Unconstrained,
        }
    }
}

type SpecMap = HashMap<FieldKey, FieldSpec>;

/// The compiled schema.
#[derive(Debug)]
pub struct Registry {
    common: SpecMap,
    types: HashMap<EntityType, SpecMap>,
    layouts: HashMap<EntityType, &'static str>,
    id_fields: HashMap<EntityType, Vec<(FieldKey, Namespace)>>,
    common_id_fields: Vec<(FieldKey, Namespace)>,
    config_errors: Vec<Error>,
}

impl Registry {
    /// Compiles a schema table.
    ///
    /// Fields whose declared type cannot be compiled are reported once and
    /// kept as allowed keys without a predicate.
    #[must_use]
    pub fn build(table: &SchemaTable) -> Self {
        let mut config_errors = Vec::new();

        let common = compile_fields(None, &table.common, &mut config_errors);
        let common_id_fields = id_fields_of(&common);

        let mut types = HashMap::new();
        let mut layouts = HashMap::new();
        let mut id_fields = HashMap::new();
        for layout in &table.types {
            let Some(first) = layout.types.first() else {
                continue;
            };
            let specs = compile_fields(Some(*first), &layout.fields, &mut config_errors);
            for ty in &layout.types {
                let mut ids = common_id_fields.clone();
                for entry in id_fields_of(&specs) {
                    if !ids.iter().any(|(key, _)| *key == entry.0) {
                        ids.push(entry);
                    }
                }
                id_fields.insert(*ty, ids);
                layouts.insert(*ty, layout.name);
                types.insert(*ty, specs.clone());
            }
        }

        debug!(
            common = common.len(),
            types = types.len(),
            errors = config_errors.len(),
            "schema registry built"
        );

        Self {
            common,
            types,
            layouts,
            id_fields,
            common_id_fields,
            config_errors,
        }
    }

    /// Compiles the built-in table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::build(&builtin::table())
    }

    /// Returns true if the type has a type-specific layout.
    #[must_use]
    pub fn is_known(&self, ty: EntityType) -> bool {
        self.types.contains_key(&ty)
    }

    /// Returns the layout name for a type.
    #[must_use]
    pub fn layout_name(&self, ty: EntityType) -> Option<&'static str> {
        self.layouts.get(&ty).copied()
    }

    /// Returns true if `key` is legal on `ty` (common or type-specific).
    #[must_use]
    pub fn allowed(&self, ty: EntityType, key: FieldKey) -> bool {
        self.spec(ty, key).is_some()
    }

    /// Looks up the compiled field, type-specific first, then common.
    #[must_use]
    pub fn spec(&self, ty: EntityType, key: FieldKey) -> Option<&FieldSpec> {
        self.types
            .get(&ty)
            .and_then(|specs| specs.get(&key))
            .or_else(|| self.common.get(&key))
    }

    /// Returns every key legal on `ty`, ascending.
    #[must_use]
    pub fn keys(&self, ty: EntityType) -> Vec<FieldKey> {
        let mut keys: Vec<FieldKey> = self.common.keys().copied().collect();
        if let Some(specs) = self.types.get(&ty) {
            keys.extend(specs.keys().filter(|k| !self.common.contains_key(k)));
        }
        keys.sort();
        keys
    }

    /// Returns the id-bearing fields of `ty`: reference fields plus group
    /// sets and remap tables (in the group namespace).
    #[must_use]
    pub fn id_fields(&self, ty: EntityType) -> &[(FieldKey, Namespace)] {
        self.id_fields
            .get(&ty)
            .map_or(&self.common_id_fields, Vec::as_slice)
    }

    /// Returns the coverage of a field, or `None` if it is not allowed.
    #[must_use]
    pub fn coverage(&self, ty: EntityType, key: FieldKey) -> Option<Coverage> {
        self.spec(ty, key).map(FieldSpec::coverage)
    }

    /// Errors collected while compiling the table.
    #[must_use]
    pub fn config_errors(&self) -> &[Error] {
        &self.config_errors
    }
}

fn compile_fields(
    owner: Option<EntityType>,
    defs: &[FieldDef],
    errors: &mut Vec<Error>,
) -> SpecMap {
    let mut specs = SpecMap::with_capacity(defs.len());
    for def in defs {
        let composite = CompositeRule::for_type(&def.ty);
        let predicate = if composite.is_some() {
            None
        } else {
            match Predicate::compile(&def.ty) {
                Ok(pred) => Some(pred),
                Err(reason) => {
                    warn!(
                        key = %def.key,
                        name = def.name,
                        declared = %def.ty,
                        %reason,
                        "field type does not compile; accepting any value"
                    );
                    errors.push(Error::schema_config(
                        owner,
                        def.key,
                        def.ty.to_string(),
                        reason,
                    ));
                    None
                }
            }
        };
        specs.insert(
            def.key,
            FieldSpec {
                name: def.name,
                declared: def.ty.clone(),
                predicate,
                composite,
                reference: def.ty.namespace(),
            },
        );
    }
    specs
}

fn id_fields_of(specs: &SpecMap) -> Vec<(FieldKey, Namespace)> {
    let mut ids: Vec<(FieldKey, Namespace)> = specs
        .iter()
        .filter_map(|(key, spec)| match (spec.reference, spec.composite) {
            (Some(ns), _) => Some((*key, ns)),
            (None, Some(CompositeRule::Groups | CompositeRule::Remap)) => {
                Some((*key, Namespace::Group))
            }
            _ => None,
        })
        .collect();
    ids.sort();
    ids
}
