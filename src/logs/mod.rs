//! Log streamer. Polls the bot's log text and re-renders the viewer only
//! when the text changed.
//!
//! Change detection is full-snapshot string equality against the last
//! rendered text. An unchanged snapshot does no parsing and no rendering;
//! a changed one is re-parsed completely and replaces the viewer wholesale.

pub mod parse;

use crate::diagnostics::{Level, Notifier};
use crate::panel::LogViewer;
use crate::service::BotService;

pub use parse::{LogEntry, LogLevel};

/// Result of one log poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRefresh {
    /// Same text as last time; nothing touched.
    Unchanged,
    /// Viewer replaced with this many entries.
    Rendered(usize),
    Failed,
}

/// Fetch the log text and refresh `viewer` if it changed.
pub fn fetch_logs(
    service: &dyn BotService,
    viewer: &mut LogViewer,
    notifier: &dyn Notifier,
) -> LogRefresh {
    match service.logs() {
        Ok(resp) => apply_snapshot(viewer, resp.logs),
        Err(err) => {
            notifier.diagnostic(Level::Error, "logs", &format!("failed to fetch logs: {err}"));
            LogRefresh::Failed
        }
    }
}

/// Render `raw` into `viewer` unless it is what the viewer already shows.
pub fn apply_snapshot(viewer: &mut LogViewer, raw: String) -> LogRefresh {
    if !viewer.is_stale(&raw) {
        return LogRefresh::Unchanged;
    }

    let entries = parse::parse_snapshot(&raw);
    let count = entries.len();
    viewer.replace(raw, entries);
    LogRefresh::Rendered(count)
}
