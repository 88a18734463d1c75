//! Text rendering of the panel model.
//!
//! Produces a full frame as a `String`; the caller decides whether it
//! changed enough to redraw.

use colored::{ColoredString, Colorize};

use crate::config::schema::DisplaySettings;
use crate::logs::{LogEntry, LogLevel};
use crate::panel::{Badge, FormField, Panel, Tab, Tone};

/// Rendering knobs taken from `[display]`.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub log_view_lines: usize,
    pub mask_password: bool,
}

impl From<&DisplaySettings> for RenderOptions {
    fn from(display: &DisplaySettings) -> Self {
        Self {
            log_view_lines: display.log_view_lines.max(1),
            mask_password: display.mask_password,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&DisplaySettings::default())
    }
}

/// Render the header, navigation bar and every visible view.
pub fn render_frame(panel: &Panel, opts: &RenderOptions) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{}  {}\n",
        panel.page_title.bold().cyan(),
        badge(&panel.connection_badge)
    ));
    out.push_str(&render_nav(panel));
    out.push_str(&format!("{}\n", "=".repeat(60)));

    for view in panel.views.iter().filter(|v| v.visible) {
        let body = match view.tab {
            Tab::Dashboard => render_dashboard(panel),
            Tab::Config => render_config(panel, opts),
            Tab::Logs => render_logs(panel, opts),
        };
        out.push_str(&body);
    }

    out
}

fn render_nav(panel: &Panel) -> String {
    let items: Vec<String> = panel
        .nav
        .iter()
        .map(|nav| {
            let label = format!(" {} ", nav.tab.id());
            if nav.active {
                format!("[{}]", label.trim()).bold().to_string()
            } else {
                label.dimmed().to_string()
            }
        })
        .collect();
    format!("{}\n", items.join(" "))
}

fn render_dashboard(panel: &Panel) -> String {
    let mut out = String::new();
    out.push_str(&format!("  {} {}\n", "Bot status:".bold(), badge(&panel.status_badge)));
    out.push_str(&format!("  {} {}\n", "Images:    ".bold(), panel.image_count));

    let action = if panel.start_control.visible {
        "▶ start".green().bold()
    } else if panel.stop_control.visible {
        "■ stop".red().bold()
    } else {
        "-".dimmed()
    };
    out.push_str(&format!("  {} {} {}\n", "Action:    ".bold(), action, "(toggle)".dimmed()));
    out
}

fn render_config(panel: &Panel, opts: &RenderOptions) -> String {
    let mut out = String::new();
    for field in FormField::ALL {
        let raw = panel.form.get(field);
        let shown = if field == FormField::Password && opts.mask_password && !raw.is_empty() {
            "*".repeat(8)
        } else {
            raw.to_string()
        };

        if field.is_multiline() && shown.contains('\n') {
            out.push_str(&format!("  {}\n", format!("{}:", field.label()).bold()));
            for line in shown.split('\n') {
                out.push_str(&format!("      {line}\n"));
            }
        } else {
            out.push_str(&format!(
                "  {:<24} {}  {}\n",
                format!("{}:", field.label()).bold(),
                shown,
                format!("({})", field.name()).dimmed()
            ));
        }
    }
    out.push_str(&format!("  {}\n", "save to submit, reload to discard edits".dimmed()));
    out
}

fn render_logs(panel: &Panel, opts: &RenderOptions) -> String {
    let viewer = &panel.log_viewer;
    let mut out = String::new();
    for entry in viewer.window(opts.log_view_lines) {
        out.push_str(&render_log_entry(entry));
        out.push('\n');
    }
    if !viewer.is_at_bottom() {
        out.push_str(&format!("  {}\n", "… more below (bottom to follow)".dimmed()));
    }
    out
}

/// One log entry as a terminal line.
pub fn render_log_entry(entry: &LogEntry) -> String {
    match entry {
        LogEntry::Structured {
            timestamp,
            tag,
            level,
            message,
        } => format!(
            "{}{} - {}",
            timestamp.dimmed(),
            in_level_colour(&format!(" {tag}"), *level),
            message
        ),
        LogEntry::Plain { level, text } => in_level_colour(text, *level).to_string(),
    }
}

fn in_level_colour(text: &str, level: LogLevel) -> ColoredString {
    match level {
        LogLevel::Info => text.cyan(),
        LogLevel::Warning => text.yellow(),
        LogLevel::Error => text.red(),
    }
}

fn badge(badge: &Badge) -> ColoredString {
    let label = format!("● {}", badge.text);
    match badge.tone {
        Tone::Online => label.green(),
        Tone::Offline => label.red(),
        Tone::Pending => label.yellow(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
