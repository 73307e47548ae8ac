use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qanda::config::ConfigError;
use qanda::logging::{self, LogTarget};
use qanda::{AskClient, Config, Outcome, QueryController, SkipReason};
use thiserror::Error;

const ENV_HELP: &str = "\
Environment:
  QANDA_API_URL       Base URL of the answering service (default http://127.0.0.1:8000)
  VITE_API_URL        Fallback base URL when QANDA_API_URL is unset
  QANDA_TIMEOUT_SECS  Request timeout in seconds; requests wait indefinitely when unset
  RUST_LOG            Log filter, e.g. debug (the TUI logs to a file)";

/// qanda - ask questions to a remote answering service
#[derive(Parser)]
#[command(name = "qanda")]
#[command(about = "Ask questions to a remote answering service")]
#[command(version)]
#[command(after_help = ENV_HELP)]
struct Cli {
    /// Base URL of the answering service (overrides QANDA_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Launch interactive terminal UI (default)
    Tui,
    /// Ask a single question and print the answer
    Ask(AskCommand),
    /// Check that the answering service is up
    Health,
}

/// Ask a single question
#[derive(Parser)]
struct AskCommand {
    /// The question to ask
    #[arg(value_name = "QUESTION")]
    question: String,

    /// Extra context for the service to ground its answer in
    #[arg(short, long, value_name = "TEXT")]
    context: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Failures of the `ask` command.
#[derive(Debug, Error)]
enum AskFailure {
    #[error("Question cannot be empty")]
    EmptyQuestion,

    /// The service or transport failed; carries the message shown to the user
    #[error("{0}")]
    Service(String),

    #[error("Submission skipped: {0:?}")]
    Skipped(SkipReason),
}

/// Determines if an error is a user error (vs a service or internal error).
///
/// Classification is by error type, so a server message that happens to read
/// like a usage error still exits as a service failure.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<ConfigError>().is_some()
        || matches!(
            error.downcast_ref::<AskFailure>(),
            Some(AskFailure::EmptyQuestion)
        )
}

async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Tui);
    init_logging(&command);

    let config = Config::from_env(cli.base_url.as_deref())?;
    let client = AskClient::from_config(config).context("Failed to create HTTP client")?;

    match command {
        Commands::Tui => {
            let url = client.base_url().to_string();
            qanda::tui::run(Arc::new(client), &url).await
        }
        Commands::Ask(cmd) => handle_ask(&cmd, &client).await,
        Commands::Health => handle_health(&client).await,
    }
}

/// Installs the logger; the TUI logs to a file since it owns the terminal.
fn init_logging(command: &Commands) {
    let target = match command {
        Commands::Tui => match logging::default_log_path() {
            Ok(path) => LogTarget::File(path),
            Err(e) => {
                eprintln!("Warning: logging disabled: {e:#}");
                return;
            }
        },
        Commands::Ask(_) | Commands::Health => LogTarget::Stderr,
    };

    if let Err(e) = logging::init(&target) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
}

/// Handles the ask command by running one submission through the controller.
async fn handle_ask(cmd: &AskCommand, client: &AskClient) -> Result<()> {
    let mut controller = match &cmd.context {
        Some(context) => QueryController::with_context(context.clone()),
        None => QueryController::new(),
    };
    controller.set_question(cmd.question.clone());

    match controller.submit(client).await {
        Outcome::Answered => {
            println!("{}", controller.state().answer().unwrap_or_default());
            Ok(())
        }
        Outcome::Failed => Err(AskFailure::Service(
            controller.state().error().unwrap_or_default().to_string(),
        )
        .into()),
        Outcome::Skipped(SkipReason::EmptyQuestion) => Err(AskFailure::EmptyQuestion.into()),
        Outcome::Skipped(reason) => Err(AskFailure::Skipped(reason).into()),
    }
}

/// Handles the health command.
async fn handle_health(client: &AskClient) -> Result<()> {
    let health = client
        .health()
        .await
        .with_context(|| format!("Failed to reach {}", client.base_url()))?;

    let service = health.service.as_deref().unwrap_or("answering service");
    println!("{service} at {}: {}", client.base_url(), health.status);

    if !health.is_healthy() {
        anyhow::bail!("Service reported status '{}'", health.status);
    }
    Ok(())
}
