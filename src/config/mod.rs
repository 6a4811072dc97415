//! Configuration Management
//!
//! Single validated configuration bound once per run, resolved from:
//! 1. Built-in defaults
//! 2. Project config (.github/azdoc.toml)
//! 3. GitHub Actions inputs (INPUT_*)
//! 4. Environment variables (AZDOC_*)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
