//! Shared test utilities for phototag integration tests.
//!
//! - `TestHarness` builds an isolated photo tree in a temp directory
//! - `ScriptedService` stands in for the vision service

pub mod harness;
pub mod mock;

pub use harness::TestHarness;
