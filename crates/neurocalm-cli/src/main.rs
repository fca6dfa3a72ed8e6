use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "neurocalm-cli", version, about = "NeuroCalm CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current simulated health reading
    Reading {
        #[command(subcommand)]
        action: commands::reading::ReadingAction,
    },
    /// Run a timed health session
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Wearable device registry
    Device {
        #[command(subcommand)]
        action: commands::device::DeviceAction,
    },
    /// Chart feeds for vitals and EEG
    Chart {
        #[command(subcommand)]
        action: commands::chart::ChartAction,
    },
    /// AI summaries, reminders and assistant chat
    Ai {
        #[command(subcommand)]
        action: commands::ai::AiAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Account profile
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
}

/// Log to stderr so stdout stays machine-readable.
fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("NEUROCALM_LOG")
                .unwrap_or_else(|_| "warn,neurocalm_core=info,neurocalm_cli=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Reading { action } => commands::reading::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Device { action } => commands::device::run(action),
        Commands::Chart { action } => commands::chart::run(action),
        Commands::Ai { action } => commands::ai::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Profile { action } => commands::profile::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
