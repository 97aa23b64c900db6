//! Type descriptors for schema validation.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::keys::Namespace;
use crate::value::Value;

/// The runtime kind of a [`Value`].
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueKind {
    /// Boolean.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit float.
    Float,
    /// Free text.
    Str,
    /// Group-membership set.
    Groups,
    /// Ordered source → target remap table.
    Remap,
    /// Event id set.
    Events,
    /// Ordered integer sequence.
    Sequence,
}

impl ValueKind {
    /// Returns true for the set/map/sequence kinds.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(
            self,
            Self::Groups | Self::Remap | Self::Events | Self::Sequence
        )
    }
}

impl fmt::Debug for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Groups => "groups",
            Self::Remap => "remap",
            Self::Events => "events",
            Self::Sequence => "sequence",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Declared type of a field in the schema table.
///
/// Scalar descriptors compile into value predicates; composite descriptors
/// are routed to structural validators instead.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldType {
    /// Boolean.
    Bool,
    /// Integer.
    Int,
    /// Float (integers are accepted too).
    Float,
    /// Free text.
    Str,
    /// Accepts any value.
    Any,
    /// One of a fixed set of literal values.
    Literal(Vec<Value>),
    /// Any of the component types.
    Union(Vec<FieldType>),
    /// Integer reference into a resource id namespace.
    Ref(Namespace),
    /// Group-membership set.
    GroupSet,
    /// Source → target remap table.
    RemapTable,
    /// Event id set.
    EventSet,
    /// Ordered integer sequence.
    Sequence,
}

impl FieldType {
    /// Creates a union type.
    #[must_use]
    pub fn union(types: impl IntoIterator<Item = FieldType>) -> Self {
        Self::Union(types.into_iter().collect())
    }

    /// Creates a literal type accepting the given integers.
    #[must_use]
    pub fn int_literals(values: impl IntoIterator<Item = i64>) -> Self {
        Self::Literal(values.into_iter().map(Value::Int).collect())
    }

    /// Returns true if values of this type are sets, maps, or sequences.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::GroupSet | Self::RemapTable | Self::EventSet | Self::Sequence
        )
    }

    /// Returns the referenced namespace for `Ref` types.
    #[must_use]
    pub const fn namespace(&self) -> Option<Namespace> {
        match self {
            Self::Ref(ns) => Some(*ns),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Str => write!(f, "str"),
            Self::Any => write!(f, "any"),
            Self::Literal(values) => {
                write!(f, "literal<")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, ">")
            }
            Self::Union(types) => {
                write!(f, "union<")?;
                for (i, t) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{t:?}")?;
                }
                write!(f, ">")
            }
            Self::Ref(ns) => write!(f, "ref<{ns}>"),
            Self::GroupSet => write!(f, "group-set"),
            Self::RemapTable => write!(f, "remap-table"),
            Self::EventSet => write!(f, "event-set"),
            Self::Sequence => write!(f, "sequence"),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
