//! Numeric domains for reference-style fields.
//!
//! Every `Ref` field must hold an integer inside its domain. The default
//! domain is `1..=9999`; a [`RangeTable`] can override it per
//! `(entity type, field)` pair.

use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;

use levelkit_foundation::{EntityType, FieldKey, MAX_ID, MIN_ID};

use crate::builtin::{ids, props};

/// A union of inclusive integer spans.
#[derive(Clone, PartialEq, Eq)]
pub struct IdDomain {
    spans: Vec<RangeInclusive<i64>>,
}

impl IdDomain {
    /// Creates a domain from one or more inclusive spans.
    #[must_use]
    pub fn new(spans: impl IntoIterator<Item = RangeInclusive<i64>>) -> Self {
        Self {
            spans: spans.into_iter().collect(),
        }
    }

    /// The standard `1..=9999` id domain.
    #[must_use]
    pub fn standard() -> Self {
        Self::new([MIN_ID..=MAX_ID])
    }

    /// Returns true if `id` falls inside any span.
    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.spans.iter().any(|span| span.contains(&id))
    }

    /// Returns the spans.
    #[must_use]
    pub fn spans(&self) -> &[RangeInclusive<i64>] {
        &self.spans
    }
}

impl Default for IdDomain {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for IdDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{}..={}", span.start(), span.end())?;
        }
        Ok(())
    }
}

impl fmt::Display for IdDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Per-(type, field) domain overrides for reference fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeTable {
    fallback: IdDomain,
    overrides: HashMap<(EntityType, FieldKey), IdDomain>,
}

impl RangeTable {
    /// Creates a table with only the standard domain and no overrides.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            fallback: IdDomain::standard(),
            overrides: HashMap::new(),
        }
    }

    /// Adds or replaces an override.
    #[must_use]
    pub fn with_override(mut self, ty: EntityType, key: FieldKey, domain: IdDomain) -> Self {
        self.overrides.insert((ty, key), domain);
        self
    }

    /// Returns the domain for a reference field.
    #[must_use]
    pub fn domain(&self, ty: EntityType, key: FieldKey) -> &IdDomain {
        self.overrides.get(&(ty, key)).unwrap_or(&self.fallback)
    }
}

impl Default for RangeTable {
    /// Standard domain, plus the colour trigger's target channel, which
    /// skips the reserved special channels 1000..=1014.
    fn default() -> Self {
        Self::standard().with_override(
            ids::COLOR,
            props::TARGET_COLOR,
            IdDomain::new([1..=999, 1015..=MAX_ID]),
        )
    }
}
