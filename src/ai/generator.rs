//! Documentation Generator
//!
//! Turns a set of file diffs plus event context into one markdown document via
//! a single chat completion. No retries; failures surface with their kind.

use std::time::Instant;
use tracing::info;

use super::prompt::{build_system_prompt, build_user_prompt};
use super::provider::SharedChat;
use crate::config::FeatureFlags;
use crate::types::{EventMetadata, FileDiff, GeneratedDocumentation, Result};

pub struct DocumentationGenerator {
    chat: SharedChat,
    features: FeatureFlags,
}

impl DocumentationGenerator {
    pub fn new(chat: SharedChat, features: FeatureFlags) -> Self {
        Self { chat, features }
    }

    pub async fn generate(
        &self,
        diffs: &[FileDiff],
        metadata: &EventMetadata,
    ) -> Result<GeneratedDocumentation> {
        let system = build_system_prompt(&self.features);
        let user = build_user_prompt(diffs, metadata, &self.features);

        let start = Instant::now();
        let content = self.chat.complete(&system, &user).await?;

        info!(
            files = diffs.len(),
            chars = content.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Generated documentation with {} ({})",
            self.chat.name(),
            self.chat.model()
        );

        Ok(GeneratedDocumentation::new(content))
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::ai::provider::ChatCompletion;
    use crate::types::GenerationError;

    /// Scripted chat provider recording every prompt pair
    pub struct MockChat {
        response: std::result::Result<String, GenerationError>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl MockChat {
        pub fn ok(content: &str) -> Self {
            Self::with(Ok(content.to_string()))
        }

        pub fn failing(error: GenerationError) -> Self {
            Self::with(Err(error))
        }

        fn with(response: std::result::Result<String, GenerationError>) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_user_prompt(&self) -> Option<String> {
            self.prompts.lock().unwrap().last().map(|(_, u)| u.clone())
        }

        pub fn last_system_prompt(&self) -> Option<String> {
            self.prompts.lock().unwrap().last().map(|(s, _)| s.clone())
        }
    }

    #[async_trait]
    impl ChatCompletion for MockChat {
        async fn complete(
            &self,
            system: &str,
            user: &str,
        ) -> std::result::Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            self.response.clone()
        }

        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-model"
        }
    }
}
