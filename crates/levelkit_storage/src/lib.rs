//! Entities, the mutation-tracked entity list, and id allocation for levelkit.
//!
//! This crate provides:
//! - [`Entity`] - A validated field map with a fixed entity type
//! - [`EntityBuilder`] - Constructs entities with defaults applied
//! - [`EntityList`] - The level's entity sequence, with provenance and modes
//! - [`IdAllocator`] - Free ids per namespace, from a one-time scan

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod allocator;
pub mod entity;
pub mod list;

pub use allocator::IdAllocator;
pub use entity::{Entity, EntityBuilder};
pub use list::{EntityList, Handle, Matcher, Mode, PartialMatch, Pattern};
