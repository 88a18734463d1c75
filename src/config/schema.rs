/// Settings schema and defaults for the panel itself.
///
/// Defines the TOML-serializable settings structure with the sections
/// `[service]`, `[polling]`, `[logging]` and `[display]`.
///
/// These are the panel's own settings. The bot's operating configuration
/// lives on the Bot Control Service and is edited through the config view.
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Level;

// ---------------------------------------------------------------------------
// Top-level settings
// ---------------------------------------------------------------------------

/// Top-level panel settings.
///
/// Maps directly to `~/.botpanel/config.toml` and `.botpanel.toml`. All
/// sections and fields are optional: missing values fall back to built-in
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    pub service: ServiceSettings,
    pub polling: PollingSettings,
    pub logging: LoggingSettings,
    pub display: DisplaySettings,
}

// ---------------------------------------------------------------------------
// [service]
// ---------------------------------------------------------------------------

/// Where the Bot Control Service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Base URL; the `/api/...` paths are appended to it.
    pub base_url: String,
    /// Per-request timeout (milliseconds).
    pub timeout_ms: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 5000,
        }
    }
}

impl ServiceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// ---------------------------------------------------------------------------
// [polling]
// ---------------------------------------------------------------------------

/// Poll cadence for the status and log timers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    pub status_interval_ms: u64,
    pub logs_interval_ms: u64,
    /// Pause after a start/stop command before re-checking status.
    pub settle_delay_ms: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            status_interval_ms: 3000,
            logs_interval_ms: 2000,
            settle_delay_ms: 1000,
        }
    }
}

impl PollingSettings {
    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms.max(1))
    }

    pub fn logs_interval(&self) -> Duration {
        Duration::from_millis(self.logs_interval_ms.max(1))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Diagnostics log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Whether diagnostics are written at all.
    pub enabled: bool,
    /// Path to the JSONL diagnostics file. `~` is expanded to the home directory.
    pub path: String,
    /// Minimum level written: `debug`, `info`, `warn`, `error`.
    pub level: Level,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.botpanel/diagnostics.jsonl".to_string(),
            level: Level::Info,
        }
    }
}

// ---------------------------------------------------------------------------
// [display]
// ---------------------------------------------------------------------------

/// Terminal rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub color: bool,
    /// Number of log entries shown in the logs view.
    pub log_view_lines: usize,
    /// Show the password field as `********`.
    pub mask_password: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            color: true,
            log_view_lines: 40,
            mask_password: true,
        }
    }
}

impl PanelSettings {
    /// Annotated default settings file written by `botpanel settings init`.
    pub fn default_toml() -> String {
        r#"# botpanel settings
# Location: ~/.botpanel/config.toml (global) or .botpanel.toml (project)
# Environment overrides: BOTPANEL_URL, BOTPANEL_TIMEOUT_MS,
# BOTPANEL_STATUS_INTERVAL_MS, BOTPANEL_LOGS_INTERVAL_MS,
# BOTPANEL_SETTLE_DELAY_MS, BOTPANEL_LOG_LEVEL, BOTPANEL_LOGGING, NO_COLOR

[service]
base_url = "http://localhost:8000"    # Bot Control Service origin
timeout_ms = 5000                     # Per-request timeout

[polling]
status_interval_ms = 3000
logs_interval_ms = 2000
settle_delay_ms = 1000                # Wait after start/stop before re-checking

[logging]
enabled = true
path = "~/.botpanel/diagnostics.jsonl"
level = "info"                        # debug | info | warn | error

[display]
color = true
log_view_lines = 40
mask_password = true
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
