//! Run Command
//!
//! Entry point for a workflow step: load configuration, read the triggering
//! event, run the pipeline and report outputs.
//!
//! Usage:
//!   azdoc run [--config .github/azdoc.toml]

use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use crate::ai::ChatClient;
use crate::cli::ui::{Output, write_outputs};
use crate::config::{Config, ConfigLoader};
use crate::github::GitHubClient;
use crate::pipeline::{ActionOutputs, Pipeline, RunContext};
use crate::types::Result;

pub async fn run(config_path: &Path) -> Result<()> {
    let output = Output::new();

    // Configuration problems abort regardless of fail-on-error
    let config = match ConfigLoader::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            output.annotate_error(&e.to_string());
            return Err(e);
        }
    };
    let fail_on_error = config.fail_on_error;

    let context = RunContext::from_env();
    let output_file = context.as_ref().ok().and_then(|c| c.output_file.clone());

    let result = match context {
        Ok(context) => execute(config, context).await,
        Err(e) => Err(e),
    };

    let outputs = match result {
        Ok(outputs) => {
            if outputs.docs_updated {
                output.success(&format!(
                    "Documentation updated: {}",
                    outputs.documentation_paths.join(", ")
                ));
            } else {
                output.info(&outputs.changes_summary);
            }
            outputs
        }
        Err(e) if fail_on_error => {
            error!("Documentation run failed: {}", e);
            output.annotate_error(&e.to_string());
            report(output_file.as_deref(), &ActionOutputs::none(e.to_string()))?;
            return Err(e);
        }
        Err(e) => {
            output.annotate_warning(&format!("Documentation generation failed: {}", e));
            ActionOutputs::none(format!("Failed: {}", e))
        }
    };

    report(output_file.as_deref(), &outputs)
}

async fn execute(config: Config, context: RunContext) -> Result<ActionOutputs> {
    let event = context.load_event().await?;
    info!(
        "Repository {} event '{}' ({})",
        context.repository,
        context.event_name,
        event.kind()
    );

    let scm = GitHubClient::new(
        config.github_token.clone(),
        context.repository.clone(),
        context.api_url.clone(),
    )?;
    let chat = ChatClient::new(&config.llm)?;

    let pipeline = Pipeline::new(config, Arc::new(scm), Arc::new(chat), &context.workspace)?;
    pipeline.run(&event).await
}

/// Log outputs and append them to `GITHUB_OUTPUT` when the runner provides it
fn report(output_file: Option<&Path>, outputs: &ActionOutputs) -> Result<()> {
    for (name, value) in outputs.to_pairs() {
        info!("output {}={}", name, value);
    }
    if let Some(path) = output_file {
        write_outputs(path, outputs)?;
    }
    Ok(())
}
