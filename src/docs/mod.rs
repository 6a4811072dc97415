//! Documentation Output
//!
//! - `writer`: per-PR, centralized and audit files in the workspace
//! - `audit`: scheduled inventory report rendering

pub mod audit;
pub mod writer;

pub use audit::{AuditGroups, group_by_service, render_audit_report};
pub use writer::DocumentationWriter;
