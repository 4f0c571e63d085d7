//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use sinpe_store::{
    Settings, SettingsStore, default_config_dir, default_contacts_path, default_data_dir,
    default_history_path, default_providers_path, default_settings_path,
};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show file paths.
    Path,

    /// Change one setting.
    Set {
        /// Setting name (e.g. reply_timeout_secs, transport).
        key: String,
        /// New value.
        value: String,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli, store: &SettingsStore) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli, store).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Set { key, value } => {
            store.set(key, value).await?;
            info!(key = %key, value = %value, "Setting updated");
            println!("{key} = {value}");
            Ok(())
        }
        ConfigAction::Reset => {
            store.reset().await;
            store.save().await?;
            info!(path = %store.path().display(), "Settings reset");
            println!("Configuration reset to defaults");
            Ok(())
        }
    }
}

async fn show_config(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            println!("Sinpe Configuration");
            println!("{}", "─".repeat(40));
            println!();
            for line in settings_lines(&settings) {
                println!("{line}");
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn settings_lines(settings: &Settings) -> Vec<String> {
    vec![
        format!("reply_timeout_secs: {}", settings.reply_timeout_secs),
        format!("min_motive_len:     {}", settings.min_motive_len),
        format!("sms_command:        {}", settings.sms_command),
        format!("transport:          {}", settings.transport),
        format!("history_enabled:    {}", settings.history_enabled),
        format!("log_level:          {}", settings.log_level),
    ]
}

fn show_paths(cli: &Cli) -> Result<()> {
    let paths = [
        ("config_dir", default_config_dir()),
        ("data_dir", default_data_dir()),
        ("settings_file", default_settings_path()),
        ("providers_file", default_providers_path()),
        ("contacts_file", default_contacts_path()),
        ("history_file", default_history_path()),
    ];

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            for (name, path) in &paths {
                println!("{:<15} {}", format!("{name}:"), path.display());
            }
        }
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = paths
                .iter()
                .map(|(name, path)| ((*name).to_string(), path.display().to_string().into()))
                .collect();
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&map)?);
        }
    }

    Ok(())
}
