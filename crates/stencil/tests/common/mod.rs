//! Shared helpers for stencil integration tests.
//!
//! - builders for page records and detected elements
//! - a small nested catalog fixture, in memory or on disk

pub mod builders;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;
