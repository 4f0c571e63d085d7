//! Line-oriented inbound source.
//!
//! Hosts without a native SMS receiver bridge one in by writing one message
//! per line to a pipe, file or stdin:
//!
//! ```text
//! 2627<TAB>Ha pasado 5,000.00 colones a 88889999 de Juan Perez, comprobante 123456
//! 2627|Saldo insuficiente
//! ```

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use super::inbox::{InboundHub, InboundSms};
use crate::error::TransportError;

/// Parses one feed line into a message.
///
/// The sender is everything before the first tab, or before the first `|`
/// when the line has no tab. Blank lines and lines without a separator or
/// body are rejected. An empty sender yields an anonymous message.
pub fn parse_line(line: &str) -> Option<InboundSms> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    let (sender, body) = line.split_once('\t').or_else(|| line.split_once('|'))?;
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let sender = sender.trim();
    Some(if sender.is_empty() {
        InboundSms::anonymous(body)
    } else {
        InboundSms::new(sender, body)
    })
}

/// Pumps lines from a reader into an [`InboundHub`].
#[derive(Debug, Clone)]
pub struct LineFeed {
    hub: Arc<InboundHub>,
}

impl LineFeed {
    /// Creates a feed delivering to `hub`.
    pub fn new(hub: Arc<InboundHub>) -> Self {
        Self { hub }
    }

    /// Reads until EOF, delivering every well-formed line.
    ///
    /// Returns the number of messages delivered to the hub.
    #[instrument(skip_all)]
    pub async fn run<R>(&self, reader: R) -> Result<usize, TransportError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut count = 0;
        while let Some(line) = lines.next_line().await? {
            match parse_line(&line) {
                Some(sms) => {
                    self.hub.deliver(sms);
                    count += 1;
                }
                None if line.trim().is_empty() => {}
                None => warn!(line = %line, "Skipping malformed inbound line"),
            }
        }
        debug!(count, "Inbound feed reached EOF");
        Ok(count)
    }

    /// Runs the feed on a background task.
    pub fn spawn<R>(self, reader: R) -> JoinHandle<Result<usize, TransportError>>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        tokio::spawn(async move { self.run(reader).await })
    }
}
