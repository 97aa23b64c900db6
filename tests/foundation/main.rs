//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, keys, Error, and persistent collections.

mod collections;
