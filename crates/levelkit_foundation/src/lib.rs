//! Core values, keys, field types, and errors for levelkit.
//!
//! This crate provides:
//! - [`Value`] - Scalar and composite field values
//! - [`EntityType`], [`FieldKey`], [`Namespace`] - Identifiers
//! - [`FieldType`] - Declarative field type descriptors for the schema table
//! - [`Error`] - Rich error types with context
//! - Persistent collections ([`LkVec`], [`LkSet`], [`LkMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod keys;
pub mod types;
pub mod value;

pub use collections::{LkMap, LkSet, LkVec};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use keys::{EntityType, FieldKey, Namespace};
pub use types::{FieldType, ValueKind};
pub use value::{Fields, Value};

/// Smallest id in every resource namespace.
pub const MIN_ID: i64 = 1;

/// Largest id in every resource namespace.
pub const MAX_ID: i64 = 9999;
