//! Parse command - classify a provider reply offline.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use sinpe_core::Receipt;
use sinpe_providers::{ReplyClass, classify_reply, extract};
use tokio::io::AsyncReadExt;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Reply text. Read from stdin when omitted.
    pub reply: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseOutput<'a> {
    confirmed: bool,
    structured: bool,
    receipt: &'a Receipt,
}

/// Runs the parse command.
pub async fn run(args: &ParseArgs, cli: &Cli) -> Result<()> {
    let reply = match &args.reply {
        Some(reply) => reply.clone(),
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let class = classify_reply(&reply);
    let receipt = match &class {
        ReplyClass::Structured(receipt) => receipt.clone(),
        _ => extract(&reply),
    };

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_reply_class(&class, &receipt));
        }
        OutputFormat::Json => {
            let output = ParseOutput {
                confirmed: class.is_confirmed(),
                structured: matches!(class, ReplyClass::Structured(_)),
                receipt: &receipt,
            };
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}
