use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "azdoc")]
#[command(
    version,
    about = "Generate documentation for Azure integration changes in pull requests and pushes"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(long, short, default_value = azdoc::constants::paths::CONFIG_FILE)]
    config: PathBuf,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle the triggering workflow event (default)
    Run,

    /// Show whether paths match the configured patterns and their service type
    Classify {
        #[arg(required = true, help = "Repository-relative paths")]
        paths: Vec<String>,
        #[arg(long, help = "Comma-separated glob patterns (overrides configuration)")]
        patterns: Option<String>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show effective configuration (merged from all sources, secrets redacted)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration sources
    Path,
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mazdoc encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let rt = Runtime::new()?;
            rt.block_on(azdoc::cli::commands::run::run(&cli.config))?;
        }
        Commands::Classify { paths, patterns } => {
            azdoc::cli::commands::classify::run(&cli.config, &paths, patterns.as_deref())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                azdoc::cli::commands::config::show(&cli.config, &format)?;
            }
            ConfigAction::Path => {
                azdoc::cli::commands::config::path(&cli.config)?;
            }
        },
    }

    Ok(())
}
