//! Error types for levelkit.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::keys::{EntityType, FieldKey, Namespace};
use crate::value::{Fields, Value};

/// Result type alias for levelkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for levelkit operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a schema configuration error for a field whose declared type
    /// cannot be compiled.
    #[must_use]
    pub fn schema_config(
        entity_type: Option<EntityType>,
        key: FieldKey,
        declared: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::SchemaConfig {
            entity_type,
            key,
            declared: declared.into(),
            reason: reason.into(),
        })
    }

    /// Creates a field-not-allowed error.
    #[must_use]
    pub fn field_not_allowed(entity_type: EntityType, key: FieldKey) -> Self {
        Self::new(ErrorKind::FieldNotAllowed { entity_type, key })
    }

    /// Creates an invalid field value error.
    #[must_use]
    pub fn invalid_value(
        entity_type: EntityType,
        key: FieldKey,
        value: Value,
        reason: impl Into<String>,
        owner: Option<Fields>,
    ) -> Self {
        Self::new(ErrorKind::InvalidFieldValue {
            entity_type,
            key,
            value,
            reason: reason.into(),
            owner,
        })
    }

    /// Creates an allocator exhaustion error.
    #[must_use]
    pub fn exhausted(namespace: Namespace) -> Self {
        Self::new(ErrorKind::AllocatorExhausted(namespace))
    }

    /// Creates a mode violation error for an edit refused by a live list.
    #[must_use]
    pub fn mode_violation(operation: &'static str) -> Self {
        Self::new(ErrorKind::ModeViolation {
            operation,
            reason: "direct edits unsupported while live-connected",
        })
    }

    /// Creates a mode violation error for an operation that needs a bound
    /// level source.
    #[must_use]
    pub fn unbound(operation: &'static str) -> Self {
        Self::new(ErrorKind::ModeViolation {
            operation,
            reason: "no level source is bound",
        })
    }

    /// Creates a malformed composite error for a bad dot-delimited string.
    #[must_use]
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedComposite {
            input: input.into(),
            reason: reason.into(),
        })
    }

    /// Returns true if this error rejects a field write.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::FieldNotAllowed { .. } | ErrorKind::InvalidFieldValue { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A declared field type could not be compiled into a predicate.
    #[error("schema config: {key} declared as {declared}: {reason}")]
    SchemaConfig {
        /// The entity type declaring the field (`None` for common fields).
        entity_type: Option<EntityType>,
        /// The offending field.
        key: FieldKey,
        /// The declared type, rendered.
        declared: String,
        /// Why it failed to compile.
        reason: String,
    },

    /// Write targets a field that is illegal for the entity's type.
    #[error("field {key} not allowed for type {entity_type}")]
    FieldNotAllowed {
        /// The entity's type.
        entity_type: EntityType,
        /// The rejected field.
        key: FieldKey,
    },

    /// Value failed a type, range, or composite-structure check.
    #[error("invalid value {value:?} for {key} on type {entity_type}: {reason}")]
    InvalidFieldValue {
        /// The entity's type.
        entity_type: EntityType,
        /// The field being written.
        key: FieldKey,
        /// The rejected value.
        value: Value,
        /// Description of the failed rule.
        reason: String,
        /// Snapshot of the owning entity's fields, when known.
        owner: Option<Fields>,
    },

    /// No free ids remain in a namespace.
    #[error("{0} ids exhausted")]
    AllocatorExhausted(Namespace),

    /// An id outside the namespace domain was reserved.
    #[error("{namespace} id {id} outside 1..=9999")]
    IdOutOfRange {
        /// The namespace.
        namespace: Namespace,
        /// The offending id.
        id: i64,
    },

    /// Operation not allowed in the current connectivity mode.
    #[error("{operation}: {reason}")]
    ModeViolation {
        /// The rejected operation.
        operation: &'static str,
        /// Why the mode refuses it.
        reason: &'static str,
    },

    /// A dot-delimited composite string could not be parsed.
    #[error("malformed composite {input:?}: {reason}")]
    MalformedComposite {
        /// The input string.
        input: String,
        /// Description of the problem.
        reason: String,
    },

    /// A raw object has no identity field.
    #[error("missing identity field a1")]
    MissingIdentity,

    /// An entity type was zero, negative, or too large.
    #[error("invalid entity type: {0}")]
    InvalidEntityType(i64),

    /// A field key token was not of the form `a<N>`.
    #[error("invalid field key: {0:?}")]
    InvalidFieldKey(String),

    /// Index out of bounds.
    #[error("index out of bounds: {index} (length {length})")]
    IndexOutOfBounds {
        /// The index that was accessed.
        index: usize,
        /// The actual length of the collection.
        length: usize,
    },

    /// No entity matched exactly.
    #[error("entity not found")]
    EntityNotFound,

    /// Export-time checks failed; every failure is listed.
    #[error("export rejected with {} failure(s)", .0.len())]
    ExportRejected(Vec<Error>),

    /// Level source or sink I/O failure.
    #[error("io: {0}")]
    Io(std::io::Error),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Level source (file path or live endpoint).
    pub source: Option<String>,
    /// Position of the entity in its list.
    pub index: Option<usize>,
    /// Operation frames, outermost last.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the entity index.
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Adds a frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
        }
        if let Some(index) = self.index {
            write!(f, " (entity #{index})")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
