//! Translation between wire objects and typed entities.
//!
//! On the wire an object is a flat list of `key,value` pairs whose values
//! are all text: `1,901,2,50,57,3.4;`. Keys are small integers; values are
//! decoded according to the field's declared type in the schema table.

use std::fmt;
use std::sync::Arc;

use levelkit_foundation::{
    EntityType, Error, ErrorContext, ErrorKind, FieldKey, FieldType, Fields, Result, Value,
};
use levelkit_schema::codec;
use levelkit_schema::Registry;
use levelkit_storage::{Entity, EntityBuilder};

/// A wire object: `(key, text)` pairs in file order.
pub type RawObject = Vec<(u32, String)>;

/// Converts field keys between wire numbers and internal keys.
pub trait KeyTranscoder: Send + Sync {
    /// Returns the wire number for a key.
    fn to_wire(&self, key: FieldKey) -> u32;

    /// Returns the key for a wire number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFieldKey` if the number names no key.
    fn from_wire(&self, raw: u32) -> Result<FieldKey>;
}

/// The identity mapping between `aN` tokens and wire number `N`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenTranscoder;

impl KeyTranscoder for TokenTranscoder {
    fn to_wire(&self, key: FieldKey) -> u32 {
        key.raw()
    }

    fn from_wire(&self, raw: u32) -> Result<FieldKey> {
        if raw == 0 {
            return Err(Error::new(ErrorKind::InvalidFieldKey(raw.to_string())));
        }
        Ok(FieldKey::new(raw))
    }
}

// =============================================================================
// Object strings
// =============================================================================

/// Parses one object string such as `1,1,2,50,3,45;`.
///
/// The trailing `;` is optional.
///
/// # Errors
///
/// Returns `MalformedComposite` for an odd number of parts or a
/// non-numeric key.
pub fn parse_object_string(input: &str) -> Result<RawObject> {
    let body = input.trim();
    let body = body.strip_suffix(';').unwrap_or(body);
    if body.is_empty() {
        return Ok(RawObject::new());
    }
    let parts: Vec<&str> = body.split(',').collect();
    if parts.len() % 2 != 0 {
        return Err(Error::malformed(input, "object string has a key without a value"));
    }
    parts
        .chunks_exact(2)
        .map(|pair| {
            let key = pair[0].trim().parse::<u32>().map_err(|_| {
                Error::malformed(input, format!("{:?} is not a field number", pair[0]))
            })?;
            Ok((key, pair[1].to_string()))
        })
        .collect()
}

/// Formats an object as `k,v,k,v;`.
#[must_use]
pub fn format_object_string(object: &RawObject) -> String {
    let mut out = object
        .iter()
        .map(|(key, value)| format!("{key},{value}"))
        .collect::<Vec<_>>()
        .join(",");
    out.push(';');
    out
}

/// Parses a level body: object strings separated by `;`, blank space ignored.
///
/// # Errors
///
/// Returns the first malformed object, with its position as context.
pub fn parse_level_string(input: &str) -> Result<Vec<RawObject>> {
    input
        .split(';')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .enumerate()
        .map(|(index, chunk)| {
            parse_object_string(chunk)
                .map_err(|e| e.with_context(ErrorContext::new().with_index(index)))
        })
        .collect()
}

/// Formats a level body with one object per line.
#[must_use]
pub fn format_level_string(objects: &[RawObject]) -> String {
    let mut out = String::new();
    for object in objects {
        out.push_str(&format_object_string(object));
        out.push('\n');
    }
    out
}

// =============================================================================
// Values
// =============================================================================

/// Decodes wire text according to a declared field type.
///
/// # Errors
///
/// Returns `MalformedComposite` if the text does not fit the type.
pub fn decode_value(declared: Option<&FieldType>, text: &str) -> Result<Value> {
    let Some(declared) = declared else {
        return Ok(guess(text));
    };
    match declared {
        FieldType::Bool => match text {
            "1" => Ok(Value::Bool(true)),
            "0" | "" => Ok(Value::Bool(false)),
            _ => Err(Error::malformed(text, "expected 1 or 0")),
        },
        FieldType::Int | FieldType::Ref(_) => text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| Error::malformed(text, "expected an integer")),
        FieldType::Float => text
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| Error::malformed(text, "expected a number")),
        FieldType::Str => Ok(Value::from(text)),
        FieldType::GroupSet => codec::parse_group_set(text).map(Value::Groups),
        FieldType::RemapTable => codec::parse_remap(text).map(Value::Remap),
        FieldType::EventSet => {
            codec::parse_int_list(text).map(|ids| Value::events(ids.iter().copied()))
        }
        FieldType::Sequence => codec::parse_int_list(text).map(Value::Sequence),
        FieldType::Any | FieldType::Literal(_) | FieldType::Union(_) => Ok(guess(text)),
    }
}

fn guess(text: &str) -> Value {
    if let Ok(n) = text.parse::<i64>() {
        Value::Int(n)
    } else if let Ok(n) = text.parse::<f64>() {
        Value::Float(n)
    } else {
        Value::from(text)
    }
}

/// Encodes a value as wire text.
///
/// Sets are written in ascending order, remaps in ascending source order.
#[must_use]
pub fn encode_value(value: &Value) -> String {
    match value {
        Value::Bool(b) => String::from(if *b { "1" } else { "0" }),
        Value::Groups(groups) => codec::format_group_set(groups),
        Value::Remap(remap) => codec::format_remap(remap),
        Value::Events(events) => codec::format_int_list(events.iter()),
        Value::Sequence(items) => codec::format_int_list(items.iter()),
        Value::Int(_) | Value::Float(_) | Value::Str(_) => value.to_string(),
    }
}

// =============================================================================
// ObjectCodec
// =============================================================================

/// Converts between [`RawObject`]s and [`Entity`]s.
#[derive(Clone)]
pub struct ObjectCodec {
    builder: EntityBuilder,
    keys: Arc<dyn KeyTranscoder>,
}

impl ObjectCodec {
    /// Creates a codec that builds entities with `builder`.
    #[must_use]
    pub fn new(builder: EntityBuilder, keys: Arc<dyn KeyTranscoder>) -> Self {
        Self { builder, keys }
    }

    /// Creates a codec over the built-in table with token keys.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(EntityBuilder::builtin(), Arc::new(TokenTranscoder))
    }

    /// Returns the entity builder.
    #[must_use]
    pub const fn builder(&self) -> &EntityBuilder {
        &self.builder
    }

    fn registry(&self) -> &Registry {
        self.builder.validator().registry()
    }

    /// Decodes a wire object into a typed field map.
    ///
    /// # Errors
    ///
    /// Returns `MissingIdentity` if key 1 is absent, or the first key or
    /// value that cannot be decoded.
    pub fn decode_fields(&self, raw: &RawObject) -> Result<Fields> {
        let wire_id = self.keys.to_wire(FieldKey::ID);
        let ty = raw
            .iter()
            .find(|(key, _)| *key == wire_id)
            .ok_or_else(|| Error::new(ErrorKind::MissingIdentity))
            .and_then(|(_, text)| {
                text.parse::<i64>()
                    .map_err(|_| Error::new(ErrorKind::MissingIdentity))
            })
            .and_then(EntityType::new)?;

        let registry = self.registry();
        let mut fields = Fields::new();
        for (wire, text) in raw {
            let key = self.keys.from_wire(*wire)?;
            let declared = registry.spec(ty, key).map(|spec| &spec.declared);
            let value = decode_value(declared, text).map_err(|e| {
                e.with_context(ErrorContext::new().with_frame(format!("decoding {key} of {ty}")))
            })?;
            fields = fields.insert(key, value);
        }
        Ok(fields)
    }

    /// Decodes and validates a wire object.
    ///
    /// # Errors
    ///
    /// Returns a decode error or the first rejected field.
    pub fn decode(&self, raw: &RawObject) -> Result<Entity> {
        self.builder.from_fields(self.decode_fields(raw)?)
    }

    /// Decodes a wire object from a trusted source without validation.
    ///
    /// # Errors
    ///
    /// Returns a decode error.
    pub fn decode_trusted(&self, raw: &RawObject) -> Result<Entity> {
        self.builder.from_fields_unchecked(self.decode_fields(raw)?)
    }

    /// Encodes an entity in ascending key order, identity first.
    #[must_use]
    pub fn encode(&self, entity: &Entity) -> RawObject {
        entity
            .iter()
            .map(|(key, value)| (self.keys.to_wire(*key), encode_value(value)))
            .collect()
    }

    /// Parses and validates an object string such as `1,1,2,50,3,45;`.
    ///
    /// # Errors
    ///
    /// Returns a parse, decode, or validation error.
    pub fn from_object_string(&self, input: &str) -> Result<Entity> {
        self.decode(&parse_object_string(input)?)
    }

    /// Formats an entity as an object string.
    #[must_use]
    pub fn to_object_string(&self, entity: &Entity) -> String {
        format_object_string(&self.encode(entity))
    }
}

impl Default for ObjectCodec {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for ObjectCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectCodec")
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

/// Parses an object string with the built-in codec.
///
/// # Errors
///
/// Returns a parse, decode, or validation error.
pub fn from_object_string(input: &str) -> Result<Entity> {
    ObjectCodec::builtin().from_object_string(input)
}
