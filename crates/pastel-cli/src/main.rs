use clap::{Parser, Subcommand};
use pastel_core::storage::LoggingConfig;
use pastel_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pastel", version, about = "Pastel planner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Focus timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Expense ledger and budget
    Ledger {
        #[command(subcommand)]
        action: commands::ledger::LedgerAction,
    },
    /// Day planner
    Board {
        #[command(subcommand)]
        action: commands::board::BoardAction,
    },
    /// Notes
    Notes {
        #[command(subcommand)]
        action: commands::notes::NotesAction,
    },
    /// Today's pomodoros, tasks and spending
    Overview,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Install the stderr subscriber. The fallback level comes from an existing
/// `config.toml`; nothing is written here.
fn init_tracing() {
    let config = Config::read_existing();
    let fallback = match &config {
        Ok(Some(cfg)) => cfg.logging.level.clone(),
        _ => LoggingConfig::default().level,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = config {
        tracing::warn!(error = %e, "using default log level");
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action).await,
        Commands::Ledger { action } => commands::ledger::run(action),
        Commands::Board { action } => commands::board::run(action),
        Commands::Notes { action } => commands::notes::run(action),
        Commands::Overview => commands::overview(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
