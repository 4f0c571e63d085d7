//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;
use sinpe_core::{Provider, Receipt, TransferState, TransferSuccess};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for one provider.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOutput<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub value: &'a str,
    pub selected: bool,
}

/// JSON output for a finished transfer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOutput {
    pub state: &'static str,
    pub provider: String,
    pub outbound: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransferOutput {
    /// Builds the output for a final state.
    pub fn new(state: &TransferState, provider: &Provider, outbound: String) -> Self {
        let (receipt, reply, error) = match state {
            TransferState::Succeeded(TransferSuccess::Receipt(receipt)) => {
                (Some(receipt.clone()), None, None)
            }
            TransferState::Succeeded(TransferSuccess::Plain(reply)) => {
                (None, Some(reply.clone()), None)
            }
            TransferState::Failed(failure) => (None, None, Some(failure.reason.clone())),
            _ => (None, None, None),
        };
        Self {
            state: state.as_str(),
            provider: provider.label.clone(),
            outbound,
            receipt,
            reply,
            error,
        }
    }
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats the provider list, marking the selected one.
    pub fn format_providers(&self, providers: &[Provider], selected: Option<&str>) -> Result<String> {
        let outputs: Vec<ProviderOutput<'_>> = providers
            .iter()
            .map(|p| ProviderOutput {
                id: &p.id,
                label: &p.label,
                value: &p.value,
                selected: selected == Some(p.id.as_str()),
            })
            .collect();
        self.format(&outputs)
    }
}
