//! Operator-facing feedback: blocking alerts and the silent diagnostics log.
//!
//! Diagnostics are appended to a JSONL file (default
//! `~/.botpanel/diagnostics.jsonl`), one record per line. All file I/O is
//! best-effort. A failing write never reaches the pollers.

use std::cell::RefCell;
use std::fmt;
use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::schema::LoggingSettings;

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Severity of a diagnostic record. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    #[default]
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl FromStr for Level {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => anyhow::bail!("unknown log level: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Diagnostic log (JSONL)
// ---------------------------------------------------------------------------

/// A single diagnostic record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    pub timestamp: String,
    pub level: Level,
    /// Routine that produced the record: `status`, `logs`, `config`, `control`, `router`.
    pub source: String,
    pub message: String,
}

/// Append-only JSONL diagnostics sink.
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    path: Option<PathBuf>,
    min_level: Level,
}

impl DiagnosticLog {
    /// Build from the `[logging]` settings section.
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        let path = if settings.enabled {
            expand_home(&settings.path)
        } else {
            None
        };
        Self {
            path,
            min_level: settings.level,
        }
    }

    /// Log to an explicit file.
    pub fn at(path: impl Into<PathBuf>, min_level: Level) -> Self {
        Self {
            path: Some(path.into()),
            min_level,
        }
    }

    /// A sink that drops everything.
    pub fn disabled() -> Self {
        Self {
            path: None,
            min_level: Level::Error,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record a diagnostic. Records below the configured level are dropped.
    pub fn record(&self, level: Level, source: &str, message: &str) {
        if level < self.min_level {
            return;
        }
        let entry = DiagnosticEntry {
            timestamp: Utc::now().to_rfc3339(),
            level,
            source: source.to_string(),
            message: message.to_string(),
        };
        let _ = self.append(&entry);
    }

    /// Read the last `limit` records. Malformed lines are skipped.
    pub fn read_recent(&self, limit: usize) -> Vec<DiagnosticEntry> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        let entries: Vec<DiagnosticEntry> = BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect();

        let skip = entries.len().saturating_sub(limit);
        entries.into_iter().skip(skip).collect()
    }

    fn append(&self, entry: &DiagnosticEntry) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{json}")?;

        Ok(())
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None if path == "~" => dirs::home_dir(),
        None => Some(PathBuf::from(path)),
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Operator feedback channel used by the panel routines.
///
/// `alert` is the blocking, user-visible notice (save result, start/stop
/// failure). `diagnostic` is the silent channel for failures the operator
/// does not need to acknowledge.
pub trait Notifier {
    fn alert(&self, message: &str);
    fn diagnostic(&self, level: Level, source: &str, message: &str);
}

/// Terminal notifier: diagnostics go to the JSONL log, and the latest alert
/// and diagnostic are kept for the frame footer.
#[derive(Debug)]
pub struct ConsoleNotifier {
    log: DiagnosticLog,
    last_alert: RefCell<Option<String>>,
    last_diagnostic: RefCell<Option<(Level, String)>>,
}

impl ConsoleNotifier {
    pub fn new(log: DiagnosticLog) -> Self {
        Self {
            log,
            last_alert: RefCell::new(None),
            last_diagnostic: RefCell::new(None),
        }
    }

    /// Take the pending alert, if any. Each alert is shown once.
    pub fn take_alert(&self) -> Option<String> {
        self.last_alert.borrow_mut().take()
    }

    pub fn last_diagnostic(&self) -> Option<(Level, String)> {
        self.last_diagnostic.borrow().clone()
    }
}

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        self.log.record(Level::Info, "alert", message);
        *self.last_alert.borrow_mut() = Some(message.to_string());
    }

    fn diagnostic(&self, level: Level, source: &str, message: &str) {
        self.log.record(level, source, message);
        *self.last_diagnostic.borrow_mut() = Some((level, format!("[{source}] {message}")));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parses_aliases() {
        assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("debug".parse::<Level>().unwrap(), Level::Debug);
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn record_filters_by_level_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = DiagnosticLog::at(dir.path().join("diag.jsonl"), Level::Warn);

        log.record(Level::Info, "status", "dropped");
        log.record(Level::Error, "logs", "failed to fetch logs");

        let entries = log.read_recent(10);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source, "logs");
        assert_eq!(entries[0].level, Level::Error);
    }

    #[test]
    fn read_recent_keeps_tail() {
        let dir = tempfile::tempdir().unwrap();
        let log = DiagnosticLog::at(dir.path().join("nested").join("diag.jsonl"), Level::Debug);
        for i in 0..5 {
            log.record(Level::Info, "test", &format!("m{i}"));
        }
        let recent = log.read_recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message, "m3");
        assert_eq!(recent[1].message, "m4");
    }

    #[test]
    fn disabled_log_is_silent() {
        let log = DiagnosticLog::disabled();
        log.record(Level::Error, "x", "y");
        assert!(log.read_recent(5).is_empty());
        assert!(log.path().is_none());
    }

    #[test]
    fn expand_home_leaves_absolute_paths() {
        assert_eq!(
            expand_home("/var/log/panel.jsonl"),
            Some(PathBuf::from("/var/log/panel.jsonl"))
        );
    }

    #[test]
    fn console_notifier_keeps_latest_feedback() {
        let notifier = ConsoleNotifier::new(DiagnosticLog::disabled());
        notifier.alert("Configuration saved");
        notifier.diagnostic(Level::Error, "logs", "boom");

        assert_eq!(notifier.take_alert().as_deref(), Some("Configuration saved"));
        assert!(notifier.take_alert().is_none());
        assert_eq!(
            notifier.last_diagnostic(),
            Some((Level::Error, "[logs] boom".to_string()))
        );
    }
}
