//! Rendered log region.

use crate::logs::parse::LogEntry;

/// The log viewer region: rendered entries plus the raw text they came from.
///
/// `replace` is the only way entries change, and every call counts as one
/// render, so `render_count` also counts redundant redraws.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogViewer {
    entries: Vec<LogEntry>,
    /// Raw text of the last render; `None` until the first one.
    last_raw: Option<String>,
    render_count: u64,
    /// One past the last visible entry.
    bottom: usize,
}

impl LogViewer {
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn last_raw(&self) -> Option<&str> {
        self.last_raw.as_deref()
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Whether `raw` differs from what is currently rendered.
    pub fn is_stale(&self, raw: &str) -> bool {
        self.last_raw.as_deref() != Some(raw)
    }

    /// Replace the whole region and scroll to the newest entry.
    pub fn replace(&mut self, raw: String, entries: Vec<LogEntry>) {
        self.entries = entries;
        self.last_raw = Some(raw);
        self.render_count += 1;
        self.scroll_to_bottom();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.bottom = self.entries.len();
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.bottom = self.bottom.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.bottom = self.bottom.saturating_add(lines).min(self.entries.len());
    }

    pub fn is_at_bottom(&self) -> bool {
        self.bottom == self.entries.len()
    }

    /// Up to `height` entries ending at the scroll position.
    pub fn window(&self, height: usize) -> &[LogEntry] {
        let start = self.bottom.saturating_sub(height);
        &self.entries[start..self.bottom]
    }
}
