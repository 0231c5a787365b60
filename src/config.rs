//! Command-line parsing and validation.

use anyhow::{ensure, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::session::SessionOptions;

pub const DEFAULT_DIAL_CODE: &str = "*99#";
pub const DEFAULT_SNAPSHOT_ATTEMPTS: u32 = 20;
pub const DEFAULT_SNAPSHOT_RETRY_MS: u64 = 50;

/// CLI options for the ussdchat backend. Validated values keep the session
/// automaton's bounded waits sane.
#[derive(Debug, Parser, Clone)]
#[command(about = "Chat-driven USSD session backend", author, version)]
pub struct AppConfig {
    /// Menu script played by the built-in scripted host (YAML)
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Service code dialled when a session starts
    #[arg(long = "dial-code", env = "USSDCHAT_DIAL_CODE", default_value = DEFAULT_DIAL_CODE)]
    pub dial_code: String,

    /// Snapshot lookup attempts before a missing dialog fails the start
    #[arg(long = "snapshot-attempts", default_value_t = DEFAULT_SNAPSHOT_ATTEMPTS)]
    pub snapshot_attempts: u32,

    /// Delay between snapshot lookup attempts (milliseconds)
    #[arg(long = "snapshot-retry-ms", default_value_t = DEFAULT_SNAPSHOT_RETRY_MS)]
    pub snapshot_retry_ms: u64,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "USSDCHAT_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "USSDCHAT_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging dialog/transcript content (debug log only)
    #[arg(long = "log-content", env = "USSDCHAT_LOG_CONTENT", default_value_t = false)]
    pub log_content: bool,

    /// Mirror structured events to a JSON trace log
    #[arg(long = "trace", default_value_t = false)]
    pub trace: bool,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.dial_code.is_empty(), "dial code must not be empty");
        ensure!(
            self.dial_code
                .chars()
                .all(|c| c.is_ascii_digit() || c == '*' || c == '#'),
            "dial code may only contain digits, '*' and '#'"
        );
        ensure!(
            self.snapshot_attempts >= 1,
            "snapshot attempts must be at least 1"
        );
        Ok(())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            dial_code: self.dial_code.clone(),
            snapshot_attempts: self.snapshot_attempts,
            snapshot_retry: Duration::from_millis(self.snapshot_retry_ms),
        }
    }
}
