//! Default field values applied at entity construction.

use levelkit_foundation::{EntityType, FieldKey, Value};

use crate::builtin::{ids, props};

/// Supplies default field values per entity type.
pub trait DefaultsProvider: Send + Sync {
    /// Returns the fields a freshly constructed entity of `ty` starts with.
    ///
    /// The identity field is set by the builder and should not be included.
    fn defaults(&self, ty: EntityType) -> Vec<(FieldKey, Value)>;
}

/// Defaults for the built-in table.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinDefaults;

impl DefaultsProvider for BuiltinDefaults {
    fn defaults(&self, ty: EntityType) -> Vec<(FieldKey, Value)> {
        let mut fields = vec![(props::X, Value::Float(0.0)), (props::Y, Value::Float(0.0))];

        match ty {
            ids::MOVE => fields.extend([
                (props::DURATION, Value::Float(0.5)),
                (props::MOVE_X, Value::Int(0)),
                (props::MOVE_Y, Value::Int(0)),
                (props::EASING, Value::Int(0)),
            ]),
            ids::ALPHA => fields.extend([
                (props::DURATION, Value::Float(0.5)),
                (props::OPACITY, Value::Float(1.0)),
            ]),
            ids::ROTATE => fields.extend([
                (props::DURATION, Value::Float(0.5)),
                (props::DEGREES, Value::Float(0.0)),
            ]),
            ids::COLOR => fields.extend([
                (props::DURATION, Value::Float(0.5)),
                (props::RED, Value::Int(255)),
                (props::GREEN, Value::Int(255)),
                (props::BLUE, Value::Int(255)),
                (props::OPACITY, Value::Float(1.0)),
            ]),
            ids::SPAWN => fields.push((props::SPAWN_DELAY, Value::Float(0.0))),
            ids::TOGGLE | ids::COUNT | ids::COLLISION => {
                fields.push((props::ACTIVATE_GROUP, Value::Bool(false)));
            }
            ids::PICKUP => fields.push((props::COUNT, Value::Int(1))),
            ids::TEXT => fields.push((props::TEXT, Value::from(""))),
            _ => {}
        }

        fields
    }
}

/// Provides no defaults beyond the identity field.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDefaults;

impl DefaultsProvider for NoDefaults {
    fn defaults(&self, _ty: EntityType) -> Vec<(FieldKey, Value)> {
        Vec::new()
    }
}
