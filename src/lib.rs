//! Levelkit - Validated builder layer for 2D game levels
//!
//! This crate re-exports all layers of the levelkit system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: levelkit_runtime    - Sessions, wire transcoding, sources/sinks
//! Layer 2: levelkit_storage    - Entities, entity list, id allocator
//! Layer 1: levelkit_schema     - Schema table, registry, validator
//! Layer 0: levelkit_foundation - Core types (Value, keys, Error)
//! ```

pub use levelkit_foundation as foundation;
pub use levelkit_runtime as runtime;
pub use levelkit_schema as schema;
pub use levelkit_storage as storage;
