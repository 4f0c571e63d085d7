//! SMS transport backed by an external command.
//!
//! The command is a template such as `termux-sms-send -n {to} {body}`. The
//! template is split on whitespace; `{to}` and `{body}` are substituted per
//! argument, so a multi-word body stays a single argument.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::error::{ProcessError, TransportError};
use crate::transport::SmsTransport;

/// Default command template (Termux:API on Android).
pub const DEFAULT_COMMAND: &str = "termux-sms-send -n {to} {body}";

/// Default time allowed for the command to hand off the message.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const TO_PLACEHOLDER: &str = "{to}";
const BODY_PLACEHOLDER: &str = "{body}";

// ============================================================================
// Command Template
// ============================================================================

/// A parsed command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    program: String,
    args: Vec<String>,
}

impl CommandTemplate {
    /// Parses a template string.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::InvalidTemplate`] when the template is empty
    /// or does not reference `{body}`.
    pub fn parse(template: &str) -> Result<Self, ProcessError> {
        let mut parts = template.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| ProcessError::InvalidTemplate("empty command".to_string()))?;
        let args: Vec<String> = parts.collect();

        if !args.iter().any(|arg| arg.contains(BODY_PLACEHOLDER)) {
            return Err(ProcessError::InvalidTemplate(format!(
                "{template:?} does not reference {BODY_PLACEHOLDER}"
            )));
        }

        Ok(Self { program, args })
    }

    /// Program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Renders the argument list for one message.
    pub fn render(&self, to: &str, body: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(TO_PLACEHOLDER, to).replace(BODY_PLACEHOLDER, body))
            .collect()
    }
}

// ============================================================================
// Command Transport
// ============================================================================

/// Sends SMS by running an external command.
#[derive(Debug, Clone)]
pub struct CommandTransport {
    template: CommandTemplate,
    timeout: Duration,
}

impl CommandTransport {
    /// Creates a transport from a template string.
    ///
    /// # Errors
    ///
    /// Propagates template parse errors.
    pub fn new(template: &str) -> Result<Self, ProcessError> {
        Ok(Self {
            template: CommandTemplate::parse(template)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Sets the command timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The parsed template.
    pub fn template(&self) -> &CommandTemplate {
        &self.template
    }

    /// Finds the program on `PATH`.
    pub fn which(&self) -> Option<PathBuf> {
        which::which(self.template.program()).ok()
    }

    async fn run(&self, to: &str, body: &str) -> Result<(), ProcessError> {
        let program = self.template.program();
        let path = self.which().ok_or_else(|| {
            warn!(program, "SMS command not found");
            ProcessError::NotFound(program.to_string())
        })?;
        let args = self.template.render(to, body);

        let start = Instant::now();
        let mut command = Command::new(&path);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(program, timeout = ?self.timeout, "SMS command timed out");
                return Err(ProcessError::Timeout(self.timeout));
            }
        };

        let exit_code = output.status.code().unwrap_or(-1);
        debug!(exit_code, duration = ?start.elapsed(), "SMS command completed");

        if output.status.success() {
            Ok(())
        } else {
            Err(ProcessError::NonZeroExit {
                code: exit_code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl SmsTransport for CommandTransport {
    fn name(&self) -> &str {
        self.template.program()
    }

    async fn is_available(&self) -> bool {
        self.which().is_some()
    }

    #[instrument(skip(self, body), fields(program = %self.template.program()))]
    async fn send_text(&self, to: &str, body: &str) -> Result<(), TransportError> {
        self.run(to, body).await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_template() {
        let template = CommandTemplate::parse(DEFAULT_COMMAND).unwrap();
        assert_eq!(template.program(), "termux-sms-send");
        assert_eq!(
            template.render("2627", "PASE 5000 88889999 pago alquiler"),
            vec!["-n", "2627", "PASE 5000 88889999 pago alquiler"]
        );
    }

    #[test]
    fn test_parse_rejects_bad_templates() {
        assert!(matches!(
            CommandTemplate::parse("   "),
            Err(ProcessError::InvalidTemplate(_))
        ));
        assert!(matches!(
            CommandTemplate::parse("sms-send {to}"),
            Err(ProcessError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_placeholders_inside_args() {
        let template = CommandTemplate::parse("gammu sendsms TEXT {to} -text={body}").unwrap();
        assert_eq!(
            template.render("1222", "hola mundo"),
            vec!["sendsms", "TEXT", "1222", "-text=hola mundo"]
        );
    }

    #[tokio::test]
    async fn test_missing_program_unavailable() {
        let transport = CommandTransport::new("definitely_not_an_sms_tool_12345 {to} {body}").unwrap();
        assert!(!transport.is_available().await);

        let result = transport.send_text("2627", "hola").await;
        assert!(matches!(
            result,
            Err(TransportError::Process(ProcessError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_runs_command() {
        let transport = CommandTransport::new("echo {to} {body}").unwrap();
        assert!(transport.is_available().await);
        assert!(transport.send_text("2627", "PASE 1 88889999 x").await.is_ok());
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let transport = CommandTransport::new("false {body}").unwrap();
        let result = transport.send_text("2627", "x").await;
        assert!(matches!(
            result,
            Err(TransportError::Process(ProcessError::NonZeroExit { .. }))
        ));
    }
}
