//! Normalize command - show how numbers are canonicalized and matched.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use sinpe_core::{local_part, normalize, numbers_match};

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the normalize command.
#[derive(Args)]
pub struct NormalizeArgs {
    /// Numbers to normalize.
    #[arg(required = true)]
    pub numbers: Vec<String>,

    /// Also report whether each number would match replies from this sender.
    #[arg(long)]
    pub against: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct NormalizeOutput {
    raw: String,
    normalized: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    local: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches: Option<bool>,
}

fn describe(raw: &str, against: Option<&str>) -> NormalizeOutput {
    let normalized = normalize(raw);
    NormalizeOutput {
        raw: raw.to_string(),
        normalized: normalized.to_string(),
        local: local_part(raw),
        matches: against.map(|sender| numbers_match(Some(sender), Some(&normalized))),
    }
}

/// Runs the normalize command.
pub fn run(args: &NormalizeArgs, cli: &Cli) -> Result<()> {
    let outputs: Vec<NormalizeOutput> = args
        .numbers
        .iter()
        .map(|raw| describe(raw, args.against.as_deref()))
        .collect();

    match cli.format {
        OutputFormat::Text => {
            for output in &outputs {
                let mut line = format!("{:<20} {}", output.raw, output.normalized);
                if let Some(local) = &output.local {
                    line.push_str(&format!("  (local {local})"));
                }
                if let Some(matches) = output.matches {
                    line.push_str(if matches { "  match" } else { "  no match" });
                }
                println!("{line}");
            }
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&outputs)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let out = describe("2276-1234", Some("50622761234"));
        assert_eq!(out.normalized, "+50622761234");
        assert_eq!(out.local.as_deref(), Some("22761234"));
        assert_eq!(out.matches, Some(true));

        let short = describe("2627", None);
        assert_eq!(short.normalized, "2627");
        assert_eq!(short.local, None);
        assert_eq!(short.matches, None);
    }
}
