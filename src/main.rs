//! impactwatch CLI - sentiment analysis with persistent chat history.

use clap::{Parser, Subcommand};
use impactwatch::{cli, config};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Version string computed by the build script.
///
/// - Release builds (on a git tag): "0.1.0"
/// - Development builds: "0.1.0-dev (abc1234)"
const VERSION: &str = env!("IMPACTWATCH_BUILD_VERSION");

#[derive(Parser)]
#[command(name = "impactwatch")]
#[command(author, version = VERSION, about = "Sentiment analysis with persistent chat history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a piece of text and print the result card.
    Analyze {
        /// Text to analyze.
        text: String,

        /// Append to an existing session instead of starting a new one.
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Start an interactive chat.
    Chat {
        /// Resume an existing session.
        #[arg(short, long)]
        session: Option<String>,
    },

    /// List saved sessions.
    List {
        /// Maximum number of sessions to show.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show a session's full transcript.
    Show {
        /// Session ID.
        session_id: String,
    },

    /// Delete a session.
    Delete {
        /// Session ID.
        session_id: String,
    },

    /// Re-run the prompt behind an earlier result.
    Regenerate {
        /// Session ID.
        session_id: String,

        /// Message number of the result (defaults to the latest).
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Print a result summary to stdout (pipe it to a clipboard tool).
    Copy {
        /// Session ID.
        session_id: String,

        /// Message number of the result (defaults to the latest).
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Remove sessions that have not been updated recently.
    Clean {
        /// Duration (e.g., "7d", "30d", "24h"). Defaults to the configured retention.
        #[arg(long)]
        before: Option<String>,

        /// Remove all sessions.
        #[arg(long)]
        all: bool,
    },

    /// Check that the analysis service is reachable.
    Status,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("IMPACTWATCH_LOG")
                .unwrap_or_else(|_| EnvFilter::new("impactwatch=warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn dispatch(command: Commands) -> impactwatch::Result<()> {
    let config = config::load_config()?;

    match command {
        Commands::Analyze { text, session } => {
            cli::analyze::run(&config, &text, session.as_deref()).await
        }
        Commands::Chat { session } => cli::chat::run(&config, session.as_deref()).await,
        Commands::List { limit } => cli::list::run(&config, limit),
        Commands::Show { session_id } => cli::show::run(&config, &session_id),
        Commands::Delete { session_id } => cli::delete::run(&config, &session_id),
        Commands::Regenerate { session_id, index } => {
            cli::regenerate::run(&config, &session_id, index).await
        }
        Commands::Copy { session_id, index } => cli::copy::run(&config, &session_id, index),
        Commands::Clean { before, all } => cli::clean::run(&config, before.as_deref(), all),
        Commands::Status => cli::status::run(&config).await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match dispatch(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("impactwatch: error: {e}");
            ExitCode::FAILURE
        }
    }
}
