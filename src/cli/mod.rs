//! One-shot CLI commands.
//!
//! Provides subcommand handlers for:
//! - `botpanel status`: one status poll
//! - `botpanel start` / `botpanel stop`: send the command, then report the new state
//! - `botpanel logs --lines N`: one log fetch
//! - `botpanel config show|set`: read or edit the bot configuration
//! - `botpanel settings show|init|set|reset`: the panel's own settings file
//! - `botpanel health`: settings files, service reachability, diagnostics log
//!
//! These share the routines used by `botpanel watch`, so payload
//! construction and unit conversion behave the same in both places.

use std::thread;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::{self, PanelSettings};
use crate::console::render::render_log_entry;
use crate::diagnostics::{ConsoleNotifier, DiagnosticLog};
use crate::logs::parse::parse_snapshot;
use crate::panel::{ConfigForm, FormField};
use crate::poller::{BotCommand, CONTROL_FAILED_MESSAGE};
use crate::service::{BotService, HttpBotService, ServiceError, StatusResponse};
use crate::sync::{self, SaveOutcome};

/// Output format for `botpanel status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

fn service(settings: &PanelSettings) -> HttpBotService {
    HttpBotService::from_settings(&settings.service)
}

fn notifier(settings: &PanelSettings) -> ConsoleNotifier {
    ConsoleNotifier::new(DiagnosticLog::from_settings(&settings.logging))
}

// ---------------------------------------------------------------------------
// botpanel status
// ---------------------------------------------------------------------------

/// Poll the service once and print the bot state.
pub fn run_status(settings: &PanelSettings, format: OutputFormat) -> Result<()> {
    let client = service(settings);
    let status = client
        .status()
        .with_context(|| format!("service not reachable at {}", client.base_url()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Table => print_status_table(&status),
    }
    Ok(())
}

fn print_status_table(status: &StatusResponse) {
    println!("{}", "Bot Status".bold().cyan());
    println!("{}", "=".repeat(40));
    let state = if status.running {
        "● Running".green().bold()
    } else {
        "● Stopped".red().bold()
    };
    println!("  {} {}", "State: ".bold(), state);
    println!("  {} {}", "Images:".bold(), status.image_count());
}

// ---------------------------------------------------------------------------
// botpanel start | stop
// ---------------------------------------------------------------------------

/// Send `command`, wait for the settle delay, then print the new status.
///
/// A non-2xx reply is reported but still followed by the status check; a
/// transport failure aborts.
pub fn run_bot_command(settings: &PanelSettings, command: BotCommand) -> Result<()> {
    let client = service(settings);

    match command.send(&client) {
        Ok(()) => println!("{} {} sent", "✓".green().bold(), command),
        Err(ServiceError::Status { status, .. }) => println!(
            "{} {} returned HTTP {}",
            "!".yellow().bold(),
            command,
            status
        ),
        Err(err) => {
            return Err(anyhow::Error::new(err).context(CONTROL_FAILED_MESSAGE));
        }
    }

    thread::sleep(settings.polling.settle_delay());
    println!();
    run_status(settings, OutputFormat::Table)
}

// ---------------------------------------------------------------------------
// botpanel logs
// ---------------------------------------------------------------------------

/// Fetch the log text once and print the last `lines` entries.
pub fn run_logs(settings: &PanelSettings, lines: Option<usize>) -> Result<()> {
    let client = service(settings);
    let resp = client
        .logs()
        .with_context(|| format!("failed to fetch logs from {}", client.base_url()))?;

    let entries = parse_snapshot(&resp.logs);
    let limit = lines.unwrap_or(settings.display.log_view_lines);
    let skip = entries.len().saturating_sub(limit);
    for entry in &entries[skip..] {
        println!("{}", render_log_entry(entry));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// botpanel config show | set
// ---------------------------------------------------------------------------

fn load_form(client: &HttpBotService, notifier: &ConsoleNotifier) -> Result<ConfigForm> {
    let mut form = ConfigForm::default();
    if !sync::load_config(client, &mut form, notifier) {
        let detail = notifier
            .last_diagnostic()
            .map(|(_, msg)| msg)
            .unwrap_or_default();
        anyhow::bail!("could not load config from {}: {detail}", client.base_url());
    }
    Ok(form)
}

/// Print the bot configuration as the config view shows it.
pub fn run_config_show(settings: &PanelSettings) -> Result<()> {
    let client = service(settings);
    let form = load_form(&client, &notifier(settings))?;

    println!("{}", "Bot Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    for field in FormField::ALL {
        let value = form.get(field);
        let shown = if field == FormField::Password && settings.display.mask_password {
            "*".repeat(value.chars().count().min(8))
        } else {
            value.to_string()
        };
        if field.is_multiline() {
            println!("  {}", format!("{}:", field.label()).bold());
            for line in shown.split('\n') {
                println!("      {line}");
            }
        } else {
            println!("  {:<24} {}", format!("{}:", field.label()).bold(), shown);
        }
    }
    Ok(())
}

/// Load the config, change one field, and save it back.
pub fn run_config_set(settings: &PanelSettings, field: &str, value: &str) -> Result<()> {
    let field: FormField = field.parse()?;
    let client = service(settings);
    let notifier = notifier(settings);

    let mut form = load_form(&client, &notifier)?;
    form.set(field, value.replace("\\n", "\n"));

    let outcome = sync::save_config(&client, &form, &notifier);
    let alert = notifier.take_alert().unwrap_or_default();
    match outcome {
        SaveOutcome::Saved => {
            println!("{} {} ({} = {})", "✓".green().bold(), alert, field.name().bold(), value);
            Ok(())
        }
        SaveOutcome::Rejected(_) | SaveOutcome::Failed => anyhow::bail!("{alert}"),
    }
}

// ---------------------------------------------------------------------------
// botpanel health
// ---------------------------------------------------------------------------

/// Check settings files, service reachability and the diagnostics log.
pub fn run_health(settings: &PanelSettings) -> Result<()> {
    println!("{}", "botpanel Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    // 0. Settings files
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global settings",
        global_exists,
        if global_exists {
            "~/.botpanel/config.toml found"
        } else {
            "not found (run `botpanel settings init` to create)"
        },
    );
    print_health_item(
        "Project settings",
        project_exists,
        if project_exists {
            ".botpanel.toml found"
        } else {
            "none (optional)"
        },
    );

    // 1. Service
    let client = service(settings);
    match client.status() {
        Ok(status) => {
            print_health_item(
                "Bot Control Service",
                true,
                &format!("reachable at {}", client.base_url()),
            );
            print_health_item(
                "Bot",
                status.running,
                if status.running { "running" } else { "stopped" },
            );
        }
        Err(err) => print_health_item("Bot Control Service", false, &err.to_string()),
    }

    // 2. Diagnostics log
    let log = DiagnosticLog::from_settings(&settings.logging);
    match log.path() {
        Some(path) if path.exists() => {
            let recent = log.read_recent(usize::MAX);
            print_health_item("Diagnostics log", true, &format!("{} entries", recent.len()));
        }
        Some(_) => print_health_item("Diagnostics log", true, "no log file yet"),
        None => print_health_item("Diagnostics log", false, "disabled"),
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// botpanel settings show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) settings as TOML.
pub fn run_settings_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective botpanel Settings".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.botpanel/config.toml", global_exists);
    print_source(".botpanel.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "BOTPANEL_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Write the default settings file at `~/.botpanel/config.toml`.
pub fn run_settings_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Settings written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set one dotted key in the global settings file.
pub fn run_settings_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Overwrite the global settings file with the defaults.
pub fn run_settings_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Settings reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}
