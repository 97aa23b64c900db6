//! Identifiers: entity types, field keys, and resource id namespaces.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// The numeric type of a placed level object (block, trigger, text, ...).
///
/// Always positive. Stored on every entity under [`FieldKey::ID`] and fixed
/// for the entity's lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityType(u32);

impl EntityType {
    /// Creates an entity type from a compile-time constant.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if `raw` is zero.
    #[must_use]
    pub const fn of(raw: u32) -> Self {
        assert!(raw > 0, "entity types are positive");
        Self(raw)
    }

    /// Creates an entity type from an arbitrary integer.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a positive `u32`.
    pub fn new(raw: i64) -> Result<Self> {
        match u32::try_from(raw) {
            Ok(n) if n > 0 => Ok(Self(n)),
            _ => Err(Error::new(ErrorKind::InvalidEntityType(raw))),
        }
    }

    /// Returns the raw numeric type.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A property slot on an entity.
///
/// The internal token form is `a<N>` (e.g. `a57`); the wire form is the bare
/// integer `N`. Conversion between the two lives in the runtime transcoder.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldKey(u32);

impl FieldKey {
    /// The identity field holding the entity type.
    pub const ID: Self = Self(1);

    /// Creates a field key from its wire number.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the wire number of this key.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns true if this is the identity field.
    #[must_use]
    pub const fn is_identity(self) -> bool {
        self.0 == Self::ID.0
    }
}

impl fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

impl FromStr for FieldKey {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        token
            .strip_prefix('a')
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u32>().ok())
            .map(Self)
            .ok_or_else(|| Error::new(ErrorKind::InvalidFieldKey(token.to_string())))
    }
}

/// An independent pool of resource ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Namespace {
    /// Group ids linking triggers to the objects they act on.
    Group,
    /// Item (counter/timer) ids.
    Item,
    /// Palette colour channel ids.
    Color,
    /// Collision block ids.
    Collision,
    /// Control ids used to address individual triggers.
    Control,
}

impl Namespace {
    /// Every namespace, in a fixed order.
    pub const ALL: [Self; 5] = [
        Self::Group,
        Self::Item,
        Self::Color,
        Self::Collision,
        Self::Control,
    ];

    /// Position of this namespace in [`Namespace::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Group => 0,
            Self::Item => 1,
            Self::Color => 2,
            Self::Collision => 3,
            Self::Control => 4,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Group => "group",
            Self::Item => "item",
            Self::Color => "color",
            Self::Collision => "collision",
            Self::Control => "control",
        };
        f.write_str(name)
    }
}
