//! User preferences store.
//!
//! Manages user settings with persistence and change notification.

use serde::{Deserialize, Serialize};
use sinpe_transport::{DEFAULT_COMMAND, TransportKind, TransportSettings};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

/// Default reply timeout, in seconds.
pub const DEFAULT_REPLY_TIMEOUT_SECS: u64 = 120;

/// Default minimum motive length.
pub const DEFAULT_MIN_MOTIVE_LEN: usize = 1;

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds to wait for a provider reply.
    pub reply_timeout_secs: u64,

    /// Minimum motive length, after trimming.
    pub min_motive_len: usize,

    /// External SMS command template (`{to}` and `{body}` placeholders).
    pub sms_command: String,

    /// Which transport sends messages.
    pub transport: TransportKind,

    /// Record every attempt in the SMS history.
    pub history_enabled: bool,

    /// Log level used when no filter is given on the command line.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reply_timeout_secs: DEFAULT_REPLY_TIMEOUT_SECS,
            min_motive_len: DEFAULT_MIN_MOTIVE_LEN,
            sms_command: DEFAULT_COMMAND.to_string(),
            transport: TransportKind::default(),
            history_enabled: true,
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Setting names accepted by [`set`](Self::set).
    pub const KEYS: &'static [&'static str] = &[
        "reply_timeout_secs",
        "min_motive_len",
        "sms_command",
        "transport",
        "history_enabled",
        "log_level",
    ];

    /// Reply timeout as a duration.
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_secs(self.reply_timeout_secs)
    }

    /// Timing settings for the transport layer.
    pub fn transport_settings(&self) -> TransportSettings {
        TransportSettings::default().with_reply_timeout(self.reply_timeout())
    }

    /// Sets one value by name, parsing it from text.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for unknown keys or unparsable values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let invalid = |reason: &str| StoreError::Config(format!("{key}: {reason}"));
        let value = value.trim();
        match key {
            "reply_timeout_secs" => {
                let secs: u64 = value.parse().map_err(|_| invalid("expected seconds"))?;
                if secs == 0 {
                    return Err(invalid("must be greater than zero"));
                }
                self.reply_timeout_secs = secs;
            }
            "min_motive_len" => {
                self.min_motive_len = value.parse().map_err(|_| invalid("expected a number"))?;
            }
            "sms_command" => {
                if !value.contains("{body}") {
                    return Err(invalid("command must contain {body}"));
                }
                self.sms_command = value.to_string();
            }
            "transport" => {
                self.transport = value.parse().map_err(|_| invalid("expected command or loopback"))?;
            }
            "history_enabled" => {
                self.history_enabled = value.parse().map_err(|_| invalid("expected true or false"))?;
            }
            "log_level" => {
                self.log_level = value.parse()?;
            }
            _ => {
                return Err(StoreError::Config(format!(
                    "unknown setting {key:?} (expected one of: {})",
                    Self::KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(StoreError::Config(format!("unknown log level {other:?}"))),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store with change notifications.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl SettingsStore {
    /// Creates a store with default settings.
    pub fn new(path: PathBuf) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads settings from the default path.
    pub async fn load_default() -> Self {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing or corrupt file yields defaults.
    pub async fn load(path: PathBuf) -> Self {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        let store = Self::new(path);
        *store.settings.write().await = settings;
        store
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings and notifies subscribers.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.notify_change().await;
    }

    /// Sets one value by name and notifies subscribers.
    ///
    /// # Errors
    ///
    /// See [`Settings::set`]. Settings are unchanged on error.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        {
            let mut settings = self.settings.write().await;
            let mut updated = settings.clone();
            updated.set(key, value)?;
            *settings = updated;
        }
        self.notify_change().await;
        Ok(())
    }

    /// Restores defaults.
    pub async fn reset(&self) {
        self.update(|s| *s = Settings::default()).await;
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.reply_timeout(), Duration::from_secs(120));
        assert_eq!(settings.min_motive_len, 1);
        assert_eq!(settings.transport, TransportKind::Command);
        assert!(settings.history_enabled);
        assert_eq!(
            settings.transport_settings().reply_timeout,
            Duration::from_secs(120)
        );
    }

    #[test]
    fn test_set_values() {
        let mut settings = Settings::default();
        settings.set("reply_timeout_secs", "45").unwrap();
        settings.set("transport", "loopback").unwrap();
        settings.set("history_enabled", "false").unwrap();
        settings.set("log_level", "DEBUG").unwrap();
        settings.set("sms_command", "gammu sendsms TEXT {to} -text {body}").unwrap();

        assert_eq!(settings.reply_timeout_secs, 45);
        assert_eq!(settings.transport, TransportKind::Loopback);
        assert!(!settings.history_enabled);
        assert_eq!(settings.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut settings = Settings::default();
        assert!(settings.set("reply_timeout_secs", "0").is_err());
        assert!(settings.set("reply_timeout_secs", "soon").is_err());
        assert!(settings.set("sms_command", "sms-send {to}").is_err());
        assert!(settings.set("transport", "fax").is_err());
        assert!(settings.set("color", "blue").is_err());
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_store_set_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        let mut rx = store.subscribe();

        store.set("min_motive_len", "3").await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 1);
        assert_eq!(store.get().await.min_motive_len, 3);
    }

    #[tokio::test]
    async fn test_store_set_error_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        assert!(store.set("transport", "fax").await.is_err());
        assert_eq!(store.get().await, Settings::default());
    }

    #[tokio::test]
    async fn test_reset() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        store.update(|s| s.min_motive_len = 9).await;
        store.reset().await;
        assert_eq!(store.get().await, Settings::default());
    }
}
