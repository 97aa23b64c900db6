//! Integration tests for Layer 3: Runtime
//!
//! Tests for wire transcoding, level files, live channels, and sessions.

mod roundtrip;
mod transcode;
