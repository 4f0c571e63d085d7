//! Providers command - manage the provider directory.

use anyhow::Result;
use clap::{Args, Subcommand};
use sinpe_store::ProviderStore;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the providers command.
#[derive(Args)]
pub struct ProvidersArgs {
    #[command(subcommand)]
    pub action: Option<ProvidersAction>,
}

/// Providers subcommands.
#[derive(Subcommand)]
pub enum ProvidersAction {
    /// List providers (default).
    List,

    /// Add a provider.
    Add {
        /// Display name.
        label: String,
        /// SMS number the provider listens on.
        number: String,
    },

    /// Delete a provider by id.
    Delete {
        /// Provider id.
        id: String,
    },

    /// Select the provider used for transfers.
    Select {
        /// Provider id, name, or number.
        provider: String,
    },

    /// Restore the built-in providers.
    Reset,
}

/// Runs the providers command.
pub async fn run(args: &ProvidersArgs, cli: &Cli) -> Result<()> {
    let store = ProviderStore::load_default().await?;

    match args.action.as_ref().unwrap_or(&ProvidersAction::List) {
        ProvidersAction::List => list(&store, cli).await,
        ProvidersAction::Add { label, number } => {
            let provider = store.add(label, number).await?;
            println!("Added: {} (id {})", provider, provider.id);
            Ok(())
        }
        ProvidersAction::Delete { id } => {
            let removed = store.delete(id).await?;
            println!("Deleted: {removed}");
            Ok(())
        }
        ProvidersAction::Select { provider } => {
            let selected = store.select(provider).await?;
            println!("Selected: {selected}");
            Ok(())
        }
        ProvidersAction::Reset => {
            store.reset().await?;
            info!("Providers reset");
            println!("Providers reset to defaults");
            Ok(())
        }
    }
}

async fn list(store: &ProviderStore, cli: &Cli) -> Result<()> {
    let providers = store.list().await;
    let selected = store.selected_provider().await.map(|p| p.id);

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_providers_header());
            println!("{}", "─".repeat(50));
            for provider in &providers {
                let is_selected = selected.as_deref() == Some(provider.id.as_str());
                println!("{}", formatter.format_provider_line(provider, is_selected));
            }
            println!();
            println!("Total: {} providers", providers.len());
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_providers(&providers, selected.as_deref())?);
        }
    }

    Ok(())
}
