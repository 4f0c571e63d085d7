//! Text output formatting with colors.

use chrono::{Local, NaiveDateTime};
use sinpe_core::{Contact, ContactKind, OutcomeKind, Provider, Receipt, TransferState, TransferSuccess};
use sinpe_providers::ReplyClass;
use sinpe_store::HistoryEntry;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Placeholder for receipt fields that were not recovered.
const MISSING: &str = "-";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ------------------------------------------------------------------------
    // Providers
    // ------------------------------------------------------------------------

    /// Header for the provider list.
    pub fn format_providers_header(&self) -> String {
        self.bold(&format!("  {:<15} {:<15} {:<15}", "ID", "Provider", "Number"))
    }

    /// One provider row; the selected provider is marked.
    pub fn format_provider_line(&self, provider: &Provider, selected: bool) -> String {
        let marker = if selected { self.green("●") } else { " ".to_string() };
        let label = format!("{:<15}", provider.label);
        let label = if selected { self.bold(&label) } else { label };
        format!(
            "{marker} {:<15} {label} {}",
            self.dim(&provider.id),
            provider.value
        )
    }

    // ------------------------------------------------------------------------
    // Contacts
    // ------------------------------------------------------------------------

    /// One contact row.
    pub fn format_contact_line(&self, contact: &Contact) -> String {
        let origin = match contact.kind {
            ContactKind::Device => self.dim("device"),
            ContactKind::Local => self.cyan("local "),
        };
        format!("{origin}  {:<25} {}", contact.name, contact.number)
    }

    // ------------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------------

    /// One history row.
    pub fn format_history_line(&self, entry: &HistoryEntry) -> String {
        let when = entry
            .timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        let outcome = format!("{:<22}", entry.outcome.as_str());
        let outcome = match entry.outcome {
            OutcomeKind::Delivered => self.green(&outcome),
            OutcomeKind::Cancelled => self.dim(&outcome),
            OutcomeKind::TimedOut => self.yellow(&outcome),
            _ => self.red(&outcome),
        };
        format!(
            "{}  {outcome} {:<10} {}",
            self.dim(&when),
            entry.provider_label,
            entry.outbound_text
        )
    }

    // ------------------------------------------------------------------------
    // Transfers
    // ------------------------------------------------------------------------

    /// Final transfer state, with the receipt when there is one.
    pub fn format_state(&self, state: &TransferState) -> String {
        match state {
            TransferState::Succeeded(TransferSuccess::Receipt(receipt)) => {
                format!("{}\n{}", self.green("✓ Transfer confirmed"), self.format_receipt(receipt))
            }
            TransferState::Succeeded(TransferSuccess::Plain(reply)) => {
                format!("{}\n  {}", self.green("✓ Transfer confirmed"), reply.trim())
            }
            TransferState::Failed(failure) => format!("{} {}", self.red("✗"), failure.reason),
            TransferState::Idle => self.dim("Transfer cancelled"),
            TransferState::Sending => "Sending…".to_string(),
            TransferState::AwaitingResponse => "Waiting for the provider reply…".to_string(),
        }
    }

    /// Receipt fields, one per line.
    pub fn format_receipt(&self, receipt: &Receipt) -> String {
        let rows = [
            ("Reference", receipt.reference_id.clone()),
            ("Payee", receipt.payee_name.clone()),
            ("Amount", receipt.amount_text.clone()),
            ("Phone", receipt.destination_phone.clone()),
            ("Motive", receipt.motive.clone()),
            ("Date", receipt.timestamp.as_ref().map(format_timestamp)),
        ];
        rows.into_iter()
            .map(|(label, value)| {
                let value = value.unwrap_or_else(|| self.dim(MISSING));
                format!("  {:<10} {value}", self.dim(label))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Classification of a reply for the `parse` command.
    pub fn format_reply_class(&self, class: &ReplyClass, receipt: &Receipt) -> String {
        let verdict = match class {
            ReplyClass::Structured(_) => self.green("confirmed (structured receipt)"),
            ReplyClass::Plain => self.yellow("confirmed (plain reply)"),
            ReplyClass::Rejected => self.red("not a confirmation"),
        };
        format!("{} {verdict}\n{}", self.bold("Reply:"), self.format_receipt(receipt))
    }

    /// Formats an error message.
    pub fn format_error(&self, context: &str, error: &str) -> String {
        format!("{} {}: {}", self.red("✗"), self.bold(context), error)
    }

    // ------------------------------------------------------------------------
    // Colors
    // ------------------------------------------------------------------------

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%d/%m/%Y %H:%M").to_string()
}
