//! Scheduled Audit Report
//!
//! Static inventory of every Azure integration file in the repository, grouped by
//! service type. Rendering is pure; no generation call is involved.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::analyzer::{ServiceType, classify};

/// Service type → matched repository paths, both in sorted order
pub type AuditGroups = BTreeMap<ServiceType, Vec<String>>;

const RECOMMENDATIONS: &[&str] = &[
    "Review Logic App workflows for unused connectors and stale API connections",
    "Confirm API Management policies enforce authentication and rate limiting",
    "Check Service Bus and Event Hub namespaces for dead-letter monitoring and alerts",
    "Prefer managed identities over connection strings in Function bindings",
    "Keep Bicep and Terraform definitions as the source of truth for deployed resources",
    "Document ownership and on-call contacts for each integration",
];

/// Group paths by the same classifier used for prompts
pub fn group_by_service<I, S>(paths: I) -> AuditGroups
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut groups = AuditGroups::new();
    for path in paths {
        let path = path.into();
        groups.entry(classify(&path)).or_default().push(path);
    }
    for files in groups.values_mut() {
        files.sort();
        files.dedup();
    }
    groups
}

pub fn render_audit_report(groups: &AuditGroups, generated_at: DateTime<Utc>) -> String {
    let total: usize = groups.values().map(Vec::len).sum();
    let mut out = String::new();

    out.push_str("# Azure Integration Audit\n\n");
    out.push_str(&format!(
        "_Generated: {}_\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    out.push_str("## Summary\n\n");
    if total == 0 {
        out.push_str("No Azure integration files found.\n\n");
    } else {
        out.push_str(&format!("Total integration files: {}\n\n", total));
        out.push_str("| Service Type | Files |\n|---|---|\n");
        for (service, files) in groups {
            out.push_str(&format!("| {} | {} |\n", service.label(), files.len()));
        }
        out.push('\n');

        out.push_str("## Inventory\n\n");
        for (service, files) in groups {
            out.push_str(&format!("### {}\n\n", service.label()));
            for file in files {
                out.push_str(&format!("- `{}`\n", file));
            }
            out.push('\n');
        }
    }

    out.push_str("## Recommendations\n\n");
    for item in RECOMMENDATIONS {
        out.push_str(&format!("- {}\n", item));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 6, 0, 0).unwrap()
    }

    #[test]
    fn test_grouping_uses_classifier() {
        let groups = group_by_service([
            "infra/main.bicep",
            "apim/policies/global.xml",
            "infra/network.bicep",
            "logicapps/order/workflow.json",
        ]);
        assert_eq!(groups[&ServiceType::Bicep].len(), 2);
        assert_eq!(groups[&ServiceType::ApiManagement], vec!["apim/policies/global.xml"]);
        assert_eq!(groups[&ServiceType::LogicApp].len(), 1);
    }

    #[test]
    fn test_report_counts_and_inventory() {
        let groups = group_by_service(["b.tf", "a.tf", "infra/main.bicep"]);
        let report = render_audit_report(&groups, at());

        assert!(report.starts_with("# Azure Integration Audit"));
        assert!(report.contains("_Generated: 2026-03-01 06:00:00 UTC_"));
        assert!(report.contains("Total integration files: 3"));
        assert!(report.contains("| Terraform Infrastructure | 2 |"));
        assert!(report.contains("| Bicep Infrastructure | 1 |"));
        let a = report.find("- `a.tf`").unwrap();
        let b = report.find("- `b.tf`").unwrap();
        assert!(a < b);
        assert!(report.contains("## Recommendations"));
    }

    #[test]
    fn test_empty_report() {
        let report = render_audit_report(&AuditGroups::new(), at());
        assert!(report.contains("No Azure integration files found."));
        assert!(!report.contains("## Inventory"));
        assert!(report.contains("## Recommendations"));
    }

    #[test]
    fn test_report_is_deterministic() {
        let groups = group_by_service(["x/function.json", "y/servicebus-queue.json"]);
        assert_eq!(render_audit_report(&groups, at()), render_audit_report(&groups, at()));
    }
}
