//! AI Integration Layer
//!
//! Prompt construction and the chat-completion client used to turn Azure
//! integration diffs into markdown documentation.

pub mod generator;
pub mod prompt;
pub mod provider;

pub use generator::DocumentationGenerator;
pub use prompt::{PromptBuilder, PromptSection, build_system_prompt, build_user_prompt};
pub use provider::{ChatClient, ChatCompletion, SharedChat};
