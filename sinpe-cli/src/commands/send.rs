//! Send command - submit a transfer and wait for the reply.

use anyhow::{Context, Result, bail};
use clap::Args;
use sinpe_core::{
    Contact, ContactDirectory, FailureKind, Provider, ProviderDirectory, TransferState, local_part,
};
use sinpe_store::{
    ContactStore, HistoryStore, ProviderStore, SettingsStore, StoreError, TransferConfig,
    TransferMachine, parse_new_contact,
};
use sinpe_transport::{
    CommandTransport, InboundHub, LineFeed, LoopbackTransport, ScriptedReply, SmsTransport,
    TransactionCorrelator, TransportContext, TransportError, TransportKind,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::output::{JsonFormatter, TextFormatter, TransferOutput};
use crate::{Cli, ExitCode, OutputFormat};

/// Delay before a simulated reply is delivered.
const SIMULATED_REPLY_DELAY: Duration = Duration::from_millis(500);

/// Arguments for the send command.
#[derive(Args)]
pub struct SendArgs {
    /// Destination: "Name: 88889999", a local number, or a saved contact.
    #[arg(long, short = 't')]
    pub to: String,

    /// Amount in colones (e.g. 5000 or "₡ 5,000").
    #[arg(long, short = 'a')]
    pub amount: String,

    /// Transfer motive.
    #[arg(long, short = 'm')]
    pub motive: String,

    /// Provider id, name, or number. Defaults to the selected provider.
    #[arg(long, short = 'p')]
    pub provider: Option<String>,

    /// Seconds to wait for the reply.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Answer with this text instead of waiting for a real reply.
    #[arg(long, value_name = "REPLY", conflicts_with = "inbox")]
    pub simulate_reply: Option<String>,

    /// Read inbound SMS lines ("sender<TAB>body") from a file, or "-" for stdin.
    #[arg(long, value_name = "PATH")]
    pub inbox: Option<String>,
}

// ============================================================================
// Provider Pinning
// ============================================================================

/// Directory that always answers with one provider.
struct PinnedProvider(Provider);

impl ProviderDirectory for PinnedProvider {
    async fn providers(&self) -> Vec<Provider> {
        vec![self.0.clone()]
    }

    async fn selected(&self) -> Option<Provider> {
        Some(self.0.clone())
    }
}

async fn resolve_provider(query: Option<&str>) -> Result<Provider> {
    let store = ProviderStore::load_default().await?;
    let provider = match query {
        Some(query) => store.find(query).await,
        None => store.selected_provider().await,
    };
    let provider = provider
        .ok_or_else(|| StoreError::ProviderNotFound(query.unwrap_or("selected").to_string()))?;
    Ok(provider)
}

async fn resolve_counterpart(to: &str) -> Result<Contact> {
    if let Some(contact) = parse_new_contact(to) {
        return Ok(contact);
    }
    if let Some(number) = local_part(to) {
        return Ok(Contact::local(number.clone(), number));
    }

    let store = ContactStore::load_default().await;
    let mut found = store.search(to).await;
    match found.len() {
        0 => bail!("No contact matches {to:?}"),
        1 => Ok(found.remove(0)),
        n => {
            let names: Vec<String> = found.iter().map(ToString::to_string).collect();
            bail!("{n} contacts match {to:?}: {}", names.join(", "))
        }
    }
}

// ============================================================================
// Transport
// ============================================================================

fn build_transport(
    args: &SendArgs,
    settings: &sinpe_store::Settings,
    provider: &Provider,
    hub: &Arc<InboundHub>,
) -> Result<Arc<dyn SmsTransport>> {
    if let Some(reply) = &args.simulate_reply {
        info!("Simulating provider reply");
        let loopback = LoopbackTransport::with_hub(Arc::clone(hub));
        loopback.script_reply(
            ScriptedReply::new(reply.clone(), SIMULATED_REPLY_DELAY).from(provider.value.clone()),
        );
        return Ok(Arc::new(loopback));
    }

    match settings.transport {
        TransportKind::Command => {
            let transport = CommandTransport::new(&settings.sms_command)
                .context("invalid sms_command setting")?;
            debug!(program = %transport.template().program(), "Using command transport");
            Ok(Arc::new(transport))
        }
        TransportKind::Loopback => Ok(Arc::new(LoopbackTransport::with_hub(Arc::clone(hub)))),
    }
}

/// Opened source of inbound SMS lines.
enum Inbox {
    Stdin,
    File(tokio::fs::File),
}

async fn open_inbox(path: &str) -> Result<Inbox> {
    if path == "-" {
        return Ok(Inbox::Stdin);
    }
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("opening inbox {path}"))?;
    Ok(Inbox::File(file))
}

/// Feeds `reader` into `hub` once the transfer awaits its reply.
///
/// The hub keeps no backlog, so lines read before the listener exists would
/// be lost. Returns 0 without reading if the transfer ends first.
fn spawn_inbox<R>(
    reader: R,
    hub: &Arc<InboundHub>,
    mut states: watch::Receiver<TransferState>,
) -> JoinHandle<Result<usize, TransportError>>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let feed = LineFeed::new(Arc::clone(hub));
    tokio::spawn(async move {
        let awaiting = states
            .wait_for(|state| *state == TransferState::AwaitingResponse || state.is_finished())
            .await
            .map(|state| *state == TransferState::AwaitingResponse)
            .unwrap_or(false);
        if !awaiting {
            debug!("Transfer ended before the inbox was read");
            return Ok(0);
        }
        feed.run(reader).await
    })
}

// ============================================================================
// Command
// ============================================================================

/// Runs the send command.
pub async fn run(args: &SendArgs, cli: &Cli, settings: &SettingsStore) -> Result<ExitCode> {
    let settings = settings.get().await;
    let provider = resolve_provider(args.provider.as_deref()).await?;
    let counterpart = resolve_counterpart(&args.to).await?;

    let hub = Arc::new(InboundHub::default());
    let transport = build_transport(args, &settings, &provider, &hub)?;
    let ctx = TransportContext::builder()
        .transport(transport)
        .inbound(Arc::clone(&hub))
        .settings(settings.transport_settings())
        .build();
    let correlator = Arc::new(TransactionCorrelator::from_context(&ctx));

    let mut config = TransferConfig::from(&settings);
    if let Some(secs) = args.timeout {
        config.reply_timeout = Duration::from_secs(secs);
    }

    let mut machine = TransferMachine::new(correlator, Arc::new(PinnedProvider(provider.clone())), config);
    if settings.history_enabled {
        machine = machine.with_history(HistoryStore::load_default().await);
    }
    let machine = Arc::new(machine);

    machine.select_counterpart(counterpart);
    machine.set_amount(&args.amount);
    machine.set_motive(&args.motive);
    let outbound = machine.preview()?;

    let feed = match &args.inbox {
        Some(path) => Some(match open_inbox(path).await? {
            Inbox::Stdin => spawn_inbox(BufReader::new(tokio::io::stdin()), &hub, machine.subscribe()),
            Inbox::File(file) => spawn_inbox(BufReader::new(file), &hub, machine.subscribe()),
        }),
        None => None,
    };
    let progress = spawn_progress(&machine, cli);
    let interrupt = {
        let machine = Arc::clone(&machine);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                machine.cancel();
            }
        })
    };

    info!(provider = %provider, outbound = %outbound, "Sending transfer");
    let state = machine.submit().await;

    interrupt.abort();
    if let Some(progress) = progress {
        progress.abort();
    }
    if let Some(feed) = feed {
        feed.abort();
    }
    let state = state?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_state(&state));
        }
        OutputFormat::Json => {
            let output = TransferOutput::new(&state, &provider, outbound);
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(exit_code(&state))
}

fn spawn_progress(
    machine: &Arc<TransferMachine<PinnedProvider>>,
    cli: &Cli,
) -> Option<JoinHandle<()>> {
    if cli.quiet || cli.format == OutputFormat::Json {
        return None;
    }
    let formatter = TextFormatter::new(!cli.no_color);
    let mut rx = machine.subscribe();
    Some(tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            if state.is_busy() {
                eprintln!("{}", formatter.format_state(&state));
            }
        }
    }))
}

fn exit_code(state: &TransferState) -> ExitCode {
    match state {
        TransferState::Succeeded(_) => ExitCode::Success,
        TransferState::Failed(failure) if failure.kind == FailureKind::TimedOut => ExitCode::Timeout,
        TransferState::Failed(_) => ExitCode::TransferFailed,
        _ => ExitCode::Error,
    }
}
