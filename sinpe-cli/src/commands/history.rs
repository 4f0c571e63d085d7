//! History command - show past SMS attempts.

use anyhow::Result;
use clap::Args;
use sinpe_store::HistoryStore;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the history command.
#[derive(Args)]
pub struct HistoryArgs {
    /// Show at most this many entries.
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Delete the history instead of showing it.
    #[arg(long)]
    pub clear: bool,
}

/// Runs the history command.
pub async fn run(args: &HistoryArgs, cli: &Cli) -> Result<()> {
    let store = HistoryStore::load_default().await;

    if args.clear {
        store.clear().await?;
        println!("History cleared");
        return Ok(());
    }

    let entries = store.list(args.limit).await;
    match cli.format {
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No transfers yet");
                return Ok(());
            }
            let formatter = TextFormatter::new(!cli.no_color);
            for entry in &entries {
                println!("{}", formatter.format_history_line(entry));
            }
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&entries)?);
        }
    }
    Ok(())
}
