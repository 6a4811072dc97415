//! Prompt Builder System
//!
//! Deterministic prompt construction for documentation generation. The same
//! diffs, metadata and flags always render byte-identical prompts: no maps with
//! unstable iteration order, no clock reads.
//!
//! ## Structure
//!
//! - System prompt: fixed role and guidelines, then flag-gated guideline lines in
//!   the order security → cost → diagram
//! - User prompt: event header, numbered section outline, one block per file

use crate::analyzer::classify;
use crate::config::FeatureFlags;
use crate::constants::prompt::{MAX_DIFF_CHARS, SHORT_SHA_LEN};
use crate::types::{EventMetadata, FileDiff, truncate_chars, truncate_with_marker};

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Role definition with expertise area
    Role { expertise: String, task: String },
    /// Bullet list with optional header
    Bullets {
        header: Option<String>,
        items: Vec<String>,
    },
    /// Ordered `**key**: value` lines
    Context(Vec<(String, String)>),
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Fenced code block with language
    Code { language: String, content: String },
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role definition section
    pub fn role(mut self, expertise: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            expertise: expertise.to_string(),
            task: task.to_string(),
        });
        self
    }

    /// Add a bullet list
    pub fn bullets(mut self, header: Option<&str>, items: Vec<String>) -> Self {
        self.sections.push(PromptSection::Bullets {
            header: header.map(String::from),
            items,
        });
        self
    }

    /// Add a context item, appending to the open context block if one is last
    pub fn context_item(mut self, key: &str, value: &str) -> Self {
        if let Some(PromptSection::Context(items)) = self.sections.last_mut() {
            items.push((key.to_string(), value.to_string()));
        } else {
            self.sections.push(PromptSection::Context(vec![(
                key.to_string(),
                value.to_string(),
            )]));
        }
        self
    }

    /// Add text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    /// Add code block
    pub fn code(mut self, language: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Code {
            language: language.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { expertise, task } => {
                    prompt.push_str("<ROLE>\n");
                    prompt.push_str(&format!(
                        "You are an expert {} specializing in {}.\n",
                        expertise, task
                    ));
                    prompt.push_str("</ROLE>\n\n");
                }
                PromptSection::Bullets { header, items } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("# {}\n\n", h));
                    }
                    for item in items {
                        prompt.push_str(&format!("- {}\n", item));
                    }
                    prompt.push('\n');
                }
                PromptSection::Context(items) => {
                    for (key, value) in items {
                        prompt.push_str(&format!("**{}**: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("# {}\n\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Code { language, content } => {
                    prompt.push_str(&format!("```{}\n", language));
                    prompt.push_str(&content);
                    prompt.push_str("\n```\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

// =============================================================================
// Documentation Prompts
// =============================================================================

const BASE_GUIDELINES: &[&str] = &[
    "Explain what changed and how it affects message flow between integrated systems",
    "Reference the changed files by path and use precise Azure terminology",
    "Write for the developers and operators who maintain these integrations",
    "Respond with Markdown only and do not wrap the whole answer in a code fence",
];

const SECURITY_GUIDELINE: &str =
    "Call out security implications: authentication, network exposure, secrets and managed identities";
const COST_GUIDELINE: &str =
    "Estimate the cost impact: pricing tiers, throughput units, executions and message volume";
const DIAGRAM_GUIDELINE: &str =
    "Include a Mermaid diagram showing the affected components and the data flow between them";

/// Outline entry gated by an optional feature flag
struct OutlineEntry {
    title: &'static str,
    description: &'static str,
    gate: Option<fn(&FeatureFlags) -> bool>,
}

fn security_enabled(flags: &FeatureFlags) -> bool {
    flags.security_notes
}

fn cost_enabled(flags: &FeatureFlags) -> bool {
    flags.cost_impact
}

fn diagram_enabled(flags: &FeatureFlags) -> bool {
    flags.architecture_diagram
}

const OUTLINE: &[OutlineEntry] = &[
    OutlineEntry {
        title: "Summary",
        description: "Two or three sentences on the purpose and scope of the change",
        gate: None,
    },
    OutlineEntry {
        title: "Changed Components",
        description: "Each Azure resource touched, grouped by service type",
        gate: None,
    },
    OutlineEntry {
        title: "Architecture Diagram",
        description: "Mermaid diagram of the affected integration flow",
        gate: Some(diagram_enabled),
    },
    OutlineEntry {
        title: "Integration Flow",
        description: "How messages and requests move through the changed components",
        gate: None,
    },
    OutlineEntry {
        title: "Configuration Changes",
        description: "Settings, bindings, policies and parameters that changed",
        gate: None,
    },
    OutlineEntry {
        title: "Security Considerations",
        description: "Authentication, authorization, network and secret handling impact",
        gate: Some(security_enabled),
    },
    OutlineEntry {
        title: "Cost Impact",
        description: "Expected change in Azure consumption and pricing tier implications",
        gate: Some(cost_enabled),
    },
    OutlineEntry {
        title: "Deployment Notes",
        description: "Ordering, prerequisites and rollback considerations",
        gate: None,
    },
    OutlineEntry {
        title: "Testing Recommendations",
        description: "How to verify the change in a non-production environment",
        gate: None,
    },
];

/// System prompt: fixed role plus flag-gated guidelines (security → cost → diagram)
pub fn build_system_prompt(features: &FeatureFlags) -> String {
    let mut guidelines: Vec<String> = BASE_GUIDELINES.iter().map(|g| g.to_string()).collect();
    if features.security_notes {
        guidelines.push(SECURITY_GUIDELINE.to_string());
    }
    if features.cost_impact {
        guidelines.push(COST_GUIDELINE.to_string());
    }
    if features.architecture_diagram {
        guidelines.push(DIAGRAM_GUIDELINE.to_string());
    }

    PromptBuilder::new()
        .role(
            "Azure integration architect and technical writer",
            "documenting Logic Apps, API Management, Service Bus, Event Hubs, Azure Functions and infrastructure as code",
        )
        .text("Your task is to turn code changes to Azure integration artifacts into clear, accurate Markdown documentation.")
        .bullets(Some("Guidelines"), guidelines)
        .build()
}

/// User prompt: event header, section outline, then one block per changed file
pub fn build_user_prompt(
    diffs: &[FileDiff],
    metadata: &EventMetadata,
    features: &FeatureFlags,
) -> String {
    let mut builder = event_header(PromptBuilder::new(), metadata);

    let outline = OUTLINE
        .iter()
        .filter(|entry| entry.gate.is_none_or(|gate| gate(features)))
        .enumerate()
        .map(|(i, entry)| format!("{}. **{}**: {}", i + 1, entry.title, entry.description))
        .collect::<Vec<_>>()
        .join("\n");
    builder = builder.section("Required Documentation Sections", &outline);

    builder = builder.section(
        "Changed Files",
        &format!("{} Azure integration file(s) changed.", diffs.len()),
    );
    for (i, diff) in diffs.iter().enumerate() {
        builder = file_block(builder, i + 1, diff);
    }

    builder.build()
}

fn event_header(builder: PromptBuilder, metadata: &EventMetadata) -> PromptBuilder {
    match metadata {
        EventMetadata::PullRequest {
            title,
            number,
            body,
            author,
        } => {
            let description = body
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .unwrap_or("_No description provided._");
            builder
                .section("Pull Request", "Document the Azure integration changes in this pull request.")
                .context_item("Title", title)
                .context_item("Number", &format!("#{}", number))
                .context_item("Author", &format!("@{}", author))
                .section("Description", description)
        }
        EventMetadata::Push { branch, commits } => {
            let title = commits.last().map(|c| c.title()).unwrap_or("(no commits)");
            let recent = if commits.is_empty() {
                "_No commits in this push._".to_string()
            } else {
                commits
                    .iter()
                    .rev()
                    .map(|c| {
                        format!(
                            "- `{}` {} ({})",
                            truncate_chars(&c.id, SHORT_SHA_LEN),
                            c.title(),
                            c.author_name
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            builder
                .section("Push", "Document the Azure integration changes pushed to this branch.")
                .context_item("Branch", branch)
                .context_item("Title", title)
                .section("Recent Commits", &recent)
        }
    }
}

fn file_block(builder: PromptBuilder, index: usize, diff: &FileDiff) -> PromptBuilder {
    let body = truncate_with_marker(&diff.diff, MAX_DIFF_CHARS, "\n... (diff truncated)");
    builder
        .text(&format!("## File {}: `{}`", index, diff.filename))
        .context_item("Status", &diff.status.to_string())
        .context_item(
            "Changes",
            &format!("+{} / -{}", diff.additions, diff.deletions),
        )
        .context_item("Service Type", classify(&diff.filename).label())
        .code("diff", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CommitSummary, FileStatus};
    use proptest::prelude::*;

    fn all_flags() -> FeatureFlags {
        FeatureFlags {
            security_notes: true,
            cost_impact: true,
            architecture_diagram: true,
        }
    }

    fn no_flags() -> FeatureFlags {
        FeatureFlags {
            security_notes: false,
            cost_impact: false,
            architecture_diagram: false,
        }
    }

    fn pr_metadata() -> EventMetadata {
        EventMetadata::PullRequest {
            title: "Add order topic".into(),
            number: 42,
            body: Some("Adds a Service Bus topic".into()),
            author: "octocat".into(),
        }
    }

    fn diff(name: &str, body: &str) -> FileDiff {
        FileDiff {
            filename: name.into(),
            status: FileStatus::Modified,
            diff: body.into(),
            additions: 3,
            deletions: 1,
        }
    }

    #[test]
    fn test_builder_basic() {
        let prompt = PromptBuilder::new()
            .role("writer", "docs")
            .context_item("A", "1")
            .context_item("B", "2")
            .code("diff", "+x")
            .build();
        assert!(prompt.contains("<ROLE>"));
        assert!(prompt.find("**A**: 1").unwrap() < prompt.find("**B**: 2").unwrap());
        assert!(prompt.ends_with("```"));
    }

    #[test]
    fn test_system_prompt_flag_order() {
        let prompt = build_system_prompt(&all_flags());
        let security = prompt.find(SECURITY_GUIDELINE).unwrap();
        let cost = prompt.find(COST_GUIDELINE).unwrap();
        let diagram = prompt.find(DIAGRAM_GUIDELINE).unwrap();
        assert!(security < cost && cost < diagram);
    }

    #[test]
    fn test_system_prompt_flags_are_additive() {
        let bare = build_system_prompt(&no_flags());
        let full = build_system_prompt(&all_flags());
        assert!(!bare.contains(SECURITY_GUIDELINE));
        for line in bare.lines() {
            assert!(full.contains(line));
        }
    }

    #[test]
    fn test_outline_numbering_follows_flags() {
        let prompt = build_user_prompt(&[], &pr_metadata(), &no_flags());
        assert!(prompt.contains("3. **Integration Flow**"));
        assert!(!prompt.contains("Architecture Diagram"));
        assert!(!prompt.contains("Cost Impact"));

        let prompt = build_user_prompt(&[], &pr_metadata(), &all_flags());
        assert!(prompt.contains("3. **Architecture Diagram**"));
        assert!(prompt.contains("6. **Security Considerations**"));
        assert!(prompt.contains("7. **Cost Impact**"));
        assert!(prompt.contains("9. **Testing Recommendations**"));
    }

    #[test]
    fn test_pr_header() {
        let prompt = build_user_prompt(&[], &pr_metadata(), &no_flags());
        assert!(prompt.contains("**Title**: Add order topic"));
        assert!(prompt.contains("**Number**: #42"));
        assert!(prompt.contains("**Author**: @octocat"));
        assert!(prompt.contains("Adds a Service Bus topic"));
    }

    #[test]
    fn test_push_header_short_ids() {
        let metadata = EventMetadata::Push {
            branch: "main".into(),
            commits: vec![
                CommitSummary {
                    id: "1111111aaaaaaa".into(),
                    message: "First".into(),
                    author_name: "a".into(),
                },
                CommitSummary {
                    id: "2222222bbbbbbb".into(),
                    message: "Second\n\nbody".into(),
                    author_name: "b".into(),
                },
            ],
        };
        let prompt = build_user_prompt(&[], &metadata, &no_flags());
        assert!(prompt.contains("**Branch**: main"));
        assert!(prompt.contains("**Title**: Second"));
        assert!(prompt.contains("- `2222222` Second (b)"));
        assert!(prompt.contains("- `1111111` First (a)"));
        assert!(!prompt.contains("2222222b"));
    }

    #[test]
    fn test_file_block_and_truncation() {
        let long = "+".repeat(MAX_DIFF_CHARS + 500);
        let prompt = build_user_prompt(
            &[diff("infra/apim-policy.xml", &long)],
            &pr_metadata(),
            &no_flags(),
        );
        assert!(prompt.contains("## File 1: `infra/apim-policy.xml`"));
        assert!(prompt.contains("**Service Type**: API Management"));
        assert!(prompt.contains("**Changes**: +3 / -1"));
        assert!(prompt.contains("(diff truncated)"));
        assert!(!prompt.contains(&"+".repeat(MAX_DIFF_CHARS + 1)));
    }

    proptest! {
        #[test]
        fn prop_prompts_are_deterministic(
            names in prop::collection::vec("[a-z]{1,6}/[a-z]{1,6}\\.(json|tf|xml)", 0..5),
            body in "[ -~]{0,64}",
            security in any::<bool>(),
            cost in any::<bool>(),
            diagram in any::<bool>(),
        ) {
            let flags = FeatureFlags {
                security_notes: security,
                cost_impact: cost,
                architecture_diagram: diagram,
            };
            let diffs: Vec<_> = names.iter().map(|n| diff(n, &body)).collect();
            let metadata = pr_metadata();
            prop_assert_eq!(
                build_user_prompt(&diffs, &metadata, &flags),
                build_user_prompt(&diffs, &metadata, &flags)
            );
            prop_assert_eq!(build_system_prompt(&flags), build_system_prompt(&flags));
        }
    }
}
