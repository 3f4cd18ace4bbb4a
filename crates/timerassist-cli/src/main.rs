use clap::{Parser, Subcommand};
use timerassist_core::Config;

mod commands;
mod notifier;

#[derive(Parser)]
#[command(name = "timerassist", version, about = "Natural-language timer assistant")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session: type commands, watch timers count down
    Run {
        /// No beeps or notifications when a timer finishes
        #[arg(long)]
        quiet: bool,
    },
    /// Show how a sentence would be interpreted, without running it
    Parse {
        /// The sentence, e.g. "set a 5 minute timer for tea"
        #[arg(required = true)]
        text: Vec<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Regimen management
    Regimen {
        #[command(subcommand)]
        action: commands::regimen::RegimenAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr. `TIMERASSIST_LOG` wins over the configured filter.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("TIMERASSIST_LOG").unwrap_or_else(|_| {
        // Read-only: a missing config file must not be created here.
        let config = Config::path()
            .and_then(|path| Config::load_from(&path))
            .unwrap_or_default();
        tracing_subscriber::EnvFilter::new(config.log_filter)
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Run { quiet } => commands::run::run(quiet),
        Commands::Parse { text, json } => commands::parse::run(&text, json),
        Commands::Regimen { action } => commands::regimen::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
