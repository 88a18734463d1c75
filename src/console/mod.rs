//! Interactive terminal shell for `botpanel watch`.
//!
//! The panel state lives on the main thread. A reader thread forwards stdin
//! lines over a channel, and the loop waits on that channel until the next
//! timer is due, so operator input and polling never run concurrently.

pub mod commands;
pub mod render;

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use anyhow::Result;
use colored::Colorize;

use crate::app::{CommandOutcome, PanelApp};
use crate::config::PanelSettings;
use crate::diagnostics::{ConsoleNotifier, DiagnosticLog, Level};
use crate::service::{BotService, HttpBotService};
use commands::{HELP, Input};
use render::{RenderOptions, render_frame};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Run the panel until the operator quits.
pub fn run_watch(settings: &PanelSettings) -> Result<()> {
    if !settings.display.color {
        colored::control::set_override(false);
    }

    let service = HttpBotService::from_settings(&settings.service);
    let notifier = ConsoleNotifier::new(DiagnosticLog::from_settings(&settings.logging));
    let mut app = PanelApp::new(service, notifier, &settings.polling, Instant::now());
    let opts = RenderOptions::from(&settings.display);

    let mut input = Some(spawn_stdin_reader());
    let mut screen = Screen::new(app.service().base_url());

    loop {
        app.run_due(Instant::now());
        if let Some(alert) = app.notifier().take_alert() {
            screen.alert = Some(alert);
        }
        screen.draw(&app, &opts)?;

        let now = Instant::now();
        let wait = app.next_deadline(now).saturating_duration_since(now);

        let Some(rx) = &input else {
            thread::sleep(wait);
            continue;
        };

        match rx.recv_timeout(wait) {
            Ok(line) => {
                // Any input acknowledges the current alert.
                screen.alert = None;
                match commands::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(Input::Help)) => screen.message = Some(HELP.to_string()),
                    Ok(Some(Input::Command(command))) => {
                        let outcome = app.handle(command, Instant::now());
                        screen.message = describe(&outcome);
                    }
                    Err(message) => screen.message = Some(message.red().to_string()),
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                // stdin closed: keep polling without input.
                input = None;
            }
        }
    }

    Ok(())
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// One-line summary of a command result for the footer.
fn describe(outcome: &CommandOutcome) -> Option<String> {
    match outcome {
        CommandOutcome::Switched(_) | CommandOutcome::Scrolled => None,
        CommandOutcome::Toggled(command) => Some(format!("{command} sent")),
        CommandOutcome::FormEdited(field) => {
            Some(format!("{} edited (save to submit)", field.name()))
        }
        // Save results already raised an alert.
        CommandOutcome::Saved(_) => None,
        CommandOutcome::ReloadQueued => Some("reloading config…".to_string()),
        CommandOutcome::Rejected(reason) => Some(reason.red().to_string()),
    }
}

/// What is on the terminal, so unchanged frames are not redrawn.
struct Screen {
    base_url: String,
    alert: Option<String>,
    message: Option<String>,
    last_drawn: Option<String>,
}

impl Screen {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            alert: None,
            message: None,
            last_drawn: None,
        }
    }

    fn draw<S: BotService>(
        &mut self,
        app: &PanelApp<S, ConsoleNotifier>,
        opts: &RenderOptions,
    ) -> Result<()> {
        let mut frame = render_frame(app.panel(), opts);
        frame.push_str(&format!("{}\n", "-".repeat(60)));

        if let Some(alert) = &self.alert {
            frame.push_str(&format!("{}\n", format!(" ! {alert} ").bold().reversed()));
        }
        if let Some(message) = &self.message {
            frame.push_str(&format!("{message}\n"));
        }
        if let Some((level, diagnostic)) = app.notifier().last_diagnostic() {
            let line = format!("{level}: {diagnostic}");
            let line = if level == Level::Error {
                line.red().dimmed()
            } else {
                line.dimmed()
            };
            frame.push_str(&format!("{line}\n"));
        }
        frame.push_str(&format!(
            "{}\n> ",
            format!("{} | type 'help' for commands", self.base_url).dimmed()
        ));

        if self.last_drawn.as_deref() == Some(frame.as_str()) {
            return Ok(());
        }

        let mut out = io::stdout().lock();
        write!(out, "{CLEAR_SCREEN}{frame}")?;
        out.flush()?;
        self.last_drawn = Some(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{FormField, Tab};
    use crate::poller::BotCommand;
    use crate::sync::SaveOutcome;

    #[test]
    fn describe_is_quiet_for_navigation() {
        assert_eq!(describe(&CommandOutcome::Switched(Tab::Logs)), None);
        assert_eq!(describe(&CommandOutcome::Scrolled), None);
    }

    #[test]
    fn describe_reports_edits_and_commands() {
        colored::control::set_override(false);
        assert_eq!(
            describe(&CommandOutcome::Toggled(BotCommand::Stop)).as_deref(),
            Some("stop sent")
        );
        assert_eq!(
            describe(&CommandOutcome::FormEdited(FormField::Email)).as_deref(),
            Some("email edited (save to submit)")
        );
        assert_eq!(describe(&CommandOutcome::Saved(SaveOutcome::Rejected(500))), None);
    }
}
