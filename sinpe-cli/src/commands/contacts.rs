//! Contacts command - list, search, and save contacts.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use sinpe_core::{Contact, ContactDirectory};
use sinpe_store::{ContactStore, DeviceEntry, load_json};
use std::path::PathBuf;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the contacts command.
#[derive(Args)]
pub struct ContactsArgs {
    #[command(subcommand)]
    pub action: Option<ContactsAction>,
}

/// Contacts subcommands.
#[derive(Subcommand)]
pub enum ContactsAction {
    /// List all contacts (default).
    List,

    /// Search by name or number.
    Search {
        /// Text to look for.
        query: String,
    },

    /// Save a local contact, written as "Name: 88889999".
    Add {
        /// Contact entry.
        entry: String,
    },

    /// Replace device contacts with a JSON export of the address book.
    ///
    /// The file holds an array of `{"name": ..., "numbers": [...]}`.
    Import {
        /// Path to the export.
        file: PathBuf,
    },
}

/// Runs the contacts command.
pub async fn run(args: &ContactsArgs, cli: &Cli) -> Result<()> {
    let store = ContactStore::load_default().await;

    match args.action.as_ref().unwrap_or(&ContactsAction::List) {
        ContactsAction::List => print_contacts(&store.list().await, cli),
        ContactsAction::Search { query } => print_contacts(&store.search(query).await, cli),
        ContactsAction::Add { entry } => {
            let contact = store.add_from_text(entry).await?;
            println!("Saved: {contact}");
            Ok(())
        }
        ContactsAction::Import { file } => {
            let entries: Vec<DeviceEntry> = load_json(file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let count = store.import_device(entries).await?;
            println!("Imported {count} contacts");
            Ok(())
        }
    }
}

fn print_contacts(contacts: &[Contact], cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            if contacts.is_empty() {
                println!("No contacts");
                return Ok(());
            }
            let formatter = TextFormatter::new(!cli.no_color);
            for contact in contacts {
                println!("{}", formatter.format_contact_line(contact));
            }
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&contacts)?);
        }
    }
    Ok(())
}
