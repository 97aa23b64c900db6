//! Schema table, compiled registry, and field validation for levelkit.
//!
//! This crate provides:
//! - [`SchemaTable`] - Declarative per-type field definitions
//! - [`Registry`] - The table compiled into predicates and composite rules
//! - [`Validator`] - Checks a single field write against the registry
//! - [`RangeTable`] - Id domains for reference fields
//! - [`codec`] - Dot-delimited composite forms
//! - [`builtin`] - The built-in table, key constants, and type constants
//! - [`DefaultsProvider`] - Default fields for freshly constructed entities

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builtin;
pub mod codec;
pub mod defaults;
pub mod ranges;
pub mod registry;
pub mod table;
pub mod validate;

pub use defaults::{BuiltinDefaults, DefaultsProvider, NoDefaults};
pub use ranges::{IdDomain, RangeTable};
pub use registry::{CompositeRule, Coverage, FieldSpec, Predicate, Registry};
pub use table::{FieldDef, SchemaTable, TypeSchema};
pub use validate::{ValidationSettings, Validator};
