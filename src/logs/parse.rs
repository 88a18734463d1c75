//! Per-line classification and structure of the bot's log text.

use std::fmt;

/// Separator between the timestamp, level tag and message of a log line.
pub const FIELD_SEPARATOR: &str = " - ";

/// Display level of a log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LogLevel {
    #[default]
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Classify a raw line by case-sensitive substring. `ERROR` wins over
/// `WARNING` when both appear.
pub fn classify(line: &str) -> LogLevel {
    if line.contains("ERROR") {
        LogLevel::Error
    } else if line.contains("WARNING") {
        LogLevel::Warning
    } else {
        LogLevel::Info
    }
}

/// One rendered entry of the log viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// `timestamp - TAG - message`; the message may itself contain separators.
    Structured {
        timestamp: String,
        tag: String,
        level: LogLevel,
        message: String,
    },
    /// Anything with fewer than three fields, shown whole.
    Plain { level: LogLevel, text: String },
}

impl LogEntry {
    pub fn level(&self) -> LogLevel {
        match self {
            Self::Structured { level, .. } | Self::Plain { level, .. } => *level,
        }
    }
}

/// Parse one line into a viewer entry.
pub fn parse_line(line: &str) -> LogEntry {
    let level = classify(line);
    let mut parts = line.splitn(3, FIELD_SEPARATOR);

    match (parts.next(), parts.next(), parts.next()) {
        (Some(timestamp), Some(tag), Some(message)) => LogEntry::Structured {
            timestamp: timestamp.to_string(),
            tag: tag.to_string(),
            level,
            message: message.to_string(),
        },
        _ => LogEntry::Plain {
            level,
            text: line.to_string(),
        },
    }
}

/// Parse a whole snapshot. Splits on `\n` exactly, so a trailing newline
/// yields a final empty entry.
pub fn parse_snapshot(raw: &str) -> Vec<LogEntry> {
    raw.split('\n').map(parse_line).collect()
}
