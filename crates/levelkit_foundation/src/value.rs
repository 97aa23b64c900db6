//! Field values stored on level entities.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collections::{LkMap, LkSet, LkVec};
use crate::keys::FieldKey;
use crate::types::ValueKind;

/// The flat field map of one entity, ordered by key.
///
/// Cloning is O(1), which makes snapshots for error reports cheap.
pub type Fields = LkMap<FieldKey, Value>;

/// A single field value.
///
/// `Bool` and `Int` are distinct kinds; nothing coerces between them.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Text value.
    Str(Arc<str>),
    /// Group-membership set.
    Groups(LkSet<i64>),
    /// Remap table, source id → target id.
    Remap(LkMap<i64, i64>),
    /// Event id set.
    Events(LkSet<i64>),
    /// Ordered integer sequence.
    Sequence(LkVec<i64>),
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::Groups(_) => ValueKind::Groups,
            Self::Remap(_) => ValueKind::Remap,
            Self::Events(_) => ValueKind::Events,
            Self::Sequence(_) => ValueKind::Sequence,
        }
    }

    /// Creates a group-membership set.
    #[must_use]
    pub fn groups(ids: impl IntoIterator<Item = i64>) -> Self {
        Self::Groups(ids.into_iter().collect())
    }

    /// Creates a remap table.
    #[must_use]
    pub fn remap(pairs: impl IntoIterator<Item = (i64, i64)>) -> Self {
        Self::Remap(pairs.into_iter().collect())
    }

    /// Creates an event set.
    #[must_use]
    pub fn events(ids: impl IntoIterator<Item = i64>) -> Self {
        Self::Events(ids.into_iter().collect())
    }

    /// Creates an integer sequence.
    #[must_use]
    pub fn sequence(items: impl IntoIterator<Item = i64>) -> Self {
        Self::Sequence(items.into_iter().collect())
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a number as f64 (converts int to float).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a group set.
    #[must_use]
    pub const fn as_groups(&self) -> Option<&LkSet<i64>> {
        match self {
            Self::Groups(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a remap table.
    #[must_use]
    pub const fn as_remap(&self) -> Option<&LkMap<i64, i64>> {
        match self {
            Self::Remap(m) => Some(m),
            _ => None,
        }
    }

    /// Attempts to extract an event set.
    #[must_use]
    pub const fn as_events(&self) -> Option<&LkSet<i64>> {
        match self {
            Self::Events(s) => Some(s),
            _ => None,
        }
    }
}

// Floats compare by bit pattern so Value can be Eq and used in literal sets.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Groups(a), Self::Groups(b)) | (Self::Events(a), Self::Events(b)) => a == b,
            (Self::Remap(a), Self::Remap(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Bool(b) => b.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(n) => n.to_bits().hash(state),
            Self::Str(s) => s.hash(state),
            Self::Groups(s) | Self::Events(s) => s.hash(state),
            Self::Remap(m) => m.hash(state),
            Self::Sequence(v) => v.hash(state),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Groups(s) => write!(f, "groups{s:?}"),
            Self::Remap(m) => write!(f, "remap{m:?}"),
            Self::Events(s) => write!(f, "events{s:?}"),
            Self::Sequence(v) => write!(f, "sequence{v:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn dotted<'a>(
            f: &mut fmt::Formatter<'_>,
            items: impl Iterator<Item = &'a i64>,
        ) -> fmt::Result {
            for (i, item) in items.enumerate() {
                if i > 0 {
                    f.write_str(".")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Groups(s) | Self::Events(s) => dotted(f, s.iter()),
            Self::Sequence(v) => dotted(f, v.iter()),
            Self::Remap(m) => {
                for (i, (source, target)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{source}.{target}")?;
                }
                Ok(())
            }
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}
