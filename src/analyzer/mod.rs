//! Change Analysis
//!
//! Decides which changed files are Azure integration artifacts and shapes them
//! for documentation:
//! - Glob pattern matching
//! - Service-type classification
//! - Diff normalization

pub mod classify;
pub mod diff;
pub mod patterns;

pub use classify::{ServiceType, classify};
pub use diff::extract;
pub use patterns::{DEFAULT_PATTERNS, PatternMatcher, default_patterns};
