//! Sanctions Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types and utilities for the sanctions workspace:
//!
//! - **Error Handling**: the workspace-wide error and result types
//! - **Logging**: tracing subscriber setup with console/file output
//! - **JSON**: recursive pruning of empty values before serialization
//! - **Slugs**: identifier-safe strings derived from free text

pub mod error;
pub mod json;
pub mod logging;
pub mod slug;

// Re-export commonly used types
pub use error::{Result, SanctionsError};
pub use json::clean_value;
pub use slug::slugify;
