//! Level sessions, wire transcoding, and level sources for levelkit.
//!
//! This crate provides:
//! - [`Session`] - One level being edited: list, allocator, and binding
//! - [`ObjectCodec`] - Wire objects to typed entities and back
//! - [`LevelSource`], [`LevelSink`], [`LiveChannel`] - Where levels live
//! - [`SessionConfig`] - Tag group, validation, and export checks

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod session;
pub mod source;
pub mod transcode;

pub use config::{DEFAULT_TAG_GROUP, ExportChecks, SessionConfig};
pub use session::Session;
pub use source::{LevelSink, LevelSource, LiveChannel, MemoryLive, ObjectStringFile};
pub use transcode::{
    KeyTranscoder, ObjectCodec, RawObject, TokenTranscoder, from_object_string,
};
