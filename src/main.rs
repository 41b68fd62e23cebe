//! finstab: short-term financial stability scoring
//!
//! Usage:
//!   finstab serve --port 8000        Start the HTTP API
//!   finstab analyze input.json       Score a household from a JSON file
//!   finstab simulate request.json    Score a what-if change (`-` reads stdin)

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use finstab::config::AppConfig;
use finstab::core::{self, FinancialInput, SimulationRequest};

#[derive(Parser, Debug)]
#[command(
    name = "finstab",
    about = "Short-term financial stability score, risk zone and advice"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(short, long, default_value_t = 8000)]
        port: u16,
        #[arg(long, help = "Seconds to wait for narration before using rule-based advice")]
        narrator_timeout_secs: Option<u64>,
    },
    /// Analyse a FinancialInput JSON document
    Analyze {
        #[arg(help = "Path to a JSON file, or - for stdin")]
        input: PathBuf,
    },
    /// Analyse a SimulationRequest JSON document
    Simulate {
        #[arg(help = "Path to a JSON file, or - for stdin")]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Serve {
            host,
            port,
            narrator_timeout_secs,
        } => {
            let mut config = AppConfig::from_env();
            if let Some(secs) = narrator_timeout_secs {
                config.narrator_timeout = Duration::from_secs(secs);
            }
            finstab::api::run_http_server(&host, port, config)
                .await
                .map_err(|e| format!("server error: {e}"))
        }
        Command::Analyze { input } => {
            let input: FinancialInput = read_json(&input)?;
            let result = core::analyze(&input).map_err(|e| e.to_string())?;
            print_json(&result)
        }
        Command::Simulate { input } => {
            let request: SimulationRequest = read_json(&input)?;
            let result =
                core::simulate(&request.current_data, &request.changes).map_err(|e| e.to_string())?;
            print_json(&result)
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?
    };
    serde_json::from_str(&raw).map_err(|e| format!("invalid JSON input: {e}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
