// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Sinpe CLI - SINPE Móvil transfers over SMS from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Send a transfer through the selected provider
//! sinpe send --to "Juan: 88889999" --amount 5000 --motive "pago alquiler"
//!
//! # Feed replies from a modem bridge on stdin
//! modem-bridge | sinpe send --to juan --amount 5000 --motive alquiler --inbox -
//!
//! # Dry run with a canned provider reply
//! sinpe send --to "Juan: 88889999" --amount 5000 --motive prueba \
//!     --simulate-reply "Ha pasado 5,000.00 colones a 88889999 de Juan Perez, comprobante 123456"
//!
//! # Manage providers
//! sinpe providers
//! sinpe providers select BN
//!
//! # Inspect a reply
//! sinpe parse "Ha pasado ... comprobante 123456"
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use sinpe_core::CoreError;
use sinpe_store::{LogLevel, SettingsStore, StoreError};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, contacts, history, normalize, parse, providers, send};

// ============================================================================
// CLI Definition
// ============================================================================

/// Sinpe CLI - SINPE Móvil transfers over SMS.
#[derive(Parser)]
#[command(name = "sinpe")]
#[command(about = "SINPE Móvil transfers over SMS")]
#[command(long_about = r#"
Sinpe sends SINPE Móvil transfer commands to your bank by SMS and waits
for the bank's reply, turning it into a receipt.

Built-in providers:
  • Promerica (6223-2450)
  • BAC (1222)
  • BCR (2276)
  • BN (2627)

Examples:
  sinpe send --to "Juan: 88889999" --amount 5000 --motive "pago"
  sinpe providers select BN
  sinpe contacts search juan
  sinpe history --limit 10
  sinpe parse "Ha pasado ... comprobante 123456"
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Send a transfer and wait for the provider reply.
    #[command(visible_alias = "s")]
    Send(send::SendArgs),

    /// Manage providers.
    #[command(visible_alias = "p")]
    Providers(providers::ProvidersArgs),

    /// Manage contacts.
    #[command(visible_alias = "c")]
    Contacts(contacts::ContactsArgs),

    /// Show the SMS history.
    History(history::HistoryArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),

    /// Classify a provider reply and extract its receipt.
    Parse(parse::ParseArgs),

    /// Normalize phone numbers.
    Normalize(normalize::NormalizeArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Provider not found.
    ProviderMissing = 2,
    /// The provider did not confirm the transfer.
    TransferFailed = 3,
    /// No reply before the deadline.
    Timeout = 4,
}

impl ExitCode {
    /// Exit code for an error returned by a command.
    fn for_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<StoreError>() {
            Some(StoreError::ProviderNotFound(_) | StoreError::Core(CoreError::ProviderNotFound(_))) => {
                Self::ProviderMissing
            }
            _ => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("sinpe=debug")
    } else {
        EnvFilter::new(format!("sinpe={level}"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = SettingsStore::load_default().await;
    setup_logging(cli.verbose, cli.quiet, settings.get().await.log_level);

    let result = match &cli.command {
        Commands::Send(args) => send::run(args, &cli, &settings).await,
        Commands::Providers(args) => providers::run(args, &cli).await.map(|()| ExitCode::Success),
        Commands::Contacts(args) => contacts::run(args, &cli).await.map(|()| ExitCode::Success),
        Commands::History(args) => history::run(args, &cli).await.map(|()| ExitCode::Success),
        Commands::Config(args) => config::run(args, &cli, &settings).await.map(|()| ExitCode::Success),
        Commands::Parse(args) => parse::run(args, &cli).await.map(|()| ExitCode::Success),
        Commands::Normalize(args) => normalize::run(args, &cli).map(|()| ExitCode::Success),
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            ExitCode::for_error(&e)
        }
    };

    std::process::exit(code as i32);
}
