//! azdoc - Azure Integration Documentation for GitHub Workflows
//!
//! Watches pull requests, pushes and scheduled runs for changes to Azure
//! integration artifacts (Logic Apps, API Management policies, Service Bus,
//! Event Hubs, Functions, Bicep and Terraform) and keeps Markdown documentation
//! for them up to date in the repository.
//!
//! ## Pipeline
//!
//! 1. Select changed files with glob patterns
//! 2. Normalize their diffs and classify each by Azure service
//! 3. Ask an OpenAI / Azure OpenAI chat model for documentation
//! 4. Write per-PR and/or centralized Markdown files
//! 5. Commit them back through the git data API and comment on the PR
//!
//! ## Quick Start
//!
//! ```ignore
//! use azdoc::{ChatClient, ConfigLoader, GitHubClient, Pipeline, RunContext};
//!
//! let config = ConfigLoader::load(Path::new(".github/azdoc.toml"))?;
//! let context = RunContext::from_env()?;
//! let event = context.load_event().await?;
//! let scm = GitHubClient::new(config.github_token.clone(), context.repository.clone(), None)?;
//! let chat = ChatClient::new(&config.llm)?;
//! let pipeline = Pipeline::new(config, Arc::new(scm), Arc::new(chat), &context.workspace)?;
//! let outputs = pipeline.run(&event).await?;
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: pattern matching, service classification, diff extraction
//! - [`ai`]: prompt construction and the chat-completion client
//! - [`docs`]: documentation and audit file writing
//! - [`github`]: REST client, commit publishing, PR comments
//! - [`pipeline`]: event parsing and routing
//! - [`config`]: layered action configuration

pub mod ai;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod docs;
pub mod github;
pub mod pipeline;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, DocMode, FeatureFlags, ProviderKind};

// Error Types
pub use types::error::{AzdocError, GenerationError, GenerationErrorKind, Result};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{ActionOutputs, Event, Pipeline, RunContext};

pub use ai::{ChatClient, ChatCompletion, DocumentationGenerator};
pub use docs::DocumentationWriter;
pub use github::{CommitPublisher, GitHubClient, SourceControl};
