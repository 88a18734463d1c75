//! The panel process: one owner for the shared state, driven by the
//! scheduler and operator commands.
//!
//! Everything runs on one thread. Jobs run to completion one after another,
//! so the routines never see a half-applied update from each other.

use std::time::{Duration, Instant};

use crate::config::schema::PollingSettings;
use crate::diagnostics::{Level, Notifier};
use crate::logs::{self, LogRefresh};
use crate::panel::{FormField, Panel, Tab};
use crate::poller::{self, BotCommand, StatusPoll};
use crate::router::ViewRouter;
use crate::scheduler::{Job, JobQueue, Scheduler};
use crate::service::BotService;
use crate::sync::{self, SaveOutcome};

/// Operator input, already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    /// Switch by tab id. `origin` is the navigation control that was used;
    /// `None` means the tab's own control.
    SwitchTab {
        tab_id: String,
        origin: Option<String>,
    },
    Toggle,
    SetField(FormField, String),
    AppendLine(FormField, String),
    ClearField(FormField),
    Save,
    ReloadConfig,
    ScrollUp(usize),
    ScrollDown(usize),
    ScrollToBottom,
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Switched(Tab),
    Toggled(BotCommand),
    FormEdited(FormField),
    Saved(SaveOutcome),
    ReloadQueued,
    Scrolled,
    Rejected(String),
}

/// What a job did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobReport {
    Status(StatusPoll),
    Logs(LogRefresh),
    ConfigLoaded(bool),
}

/// Owns the service client, the panel model, the router and the timers.
pub struct PanelApp<S: BotService, N: Notifier> {
    service: S,
    notifier: N,
    panel: Panel,
    router: ViewRouter,
    scheduler: Scheduler,
    jobs: JobQueue,
    settle_delay: Duration,
}

impl<S: BotService, N: Notifier> PanelApp<S, N> {
    /// Build the app with both poll timers due at `start`.
    pub fn new(service: S, notifier: N, polling: &PollingSettings, start: Instant) -> Self {
        let jobs = JobQueue::new();
        Self {
            service,
            notifier,
            panel: Panel::default(),
            router: ViewRouter::new(jobs.clone()),
            scheduler: Scheduler::new(start, polling, jobs.clone()),
            jobs,
            settle_delay: polling.settle_delay(),
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// When the loop next has something to do.
    pub fn next_deadline(&mut self, now: Instant) -> Instant {
        self.scheduler.next_deadline(now)
    }

    /// Run every job due at `now`, in order.
    pub fn run_due(&mut self, now: Instant) -> Vec<(Job, JobReport)> {
        let due = self.scheduler.due(now);
        due.into_iter()
            .map(|job| (job, self.run_job(job)))
            .collect()
    }

    pub fn run_job(&mut self, job: Job) -> JobReport {
        match job {
            Job::UpdateStatus => JobReport::Status(poller::update_status(
                &self.service,
                &mut self.panel,
                &self.notifier,
            )),
            Job::FetchLogs => JobReport::Logs(logs::fetch_logs(
                &self.service,
                &mut self.panel.log_viewer,
                &self.notifier,
            )),
            Job::LoadConfig => JobReport::ConfigLoaded(sync::load_config(
                &self.service,
                &mut self.panel.form,
                &self.notifier,
            )),
        }
    }

    /// Apply an operator command. Work it defers is timed from `now`.
    pub fn handle(&mut self, command: PanelCommand, now: Instant) -> CommandOutcome {
        let outcome = match command {
            PanelCommand::SwitchTab { tab_id, origin } => {
                let origin = origin.unwrap_or_else(|| format!("nav-{tab_id}"));
                match self.router.switch_to_id(&mut self.panel, &tab_id, &origin) {
                    Ok(tab) => CommandOutcome::Switched(tab),
                    Err(err) => {
                        self.notifier
                            .diagnostic(Level::Error, "router", &err.to_string());
                        CommandOutcome::Rejected(err.to_string())
                    }
                }
            }
            PanelCommand::Toggle => CommandOutcome::Toggled(poller::toggle_bot(
                &self.service,
                &self.panel,
                &self.notifier,
                &self.jobs,
                self.settle_delay,
            )),
            PanelCommand::SetField(field, value) => {
                self.panel.form.set(field, value);
                CommandOutcome::FormEdited(field)
            }
            PanelCommand::AppendLine(field, line) => {
                self.panel.form.append_line(field, &line);
                CommandOutcome::FormEdited(field)
            }
            PanelCommand::ClearField(field) => {
                self.panel.form.set(field, "");
                CommandOutcome::FormEdited(field)
            }
            PanelCommand::Save => CommandOutcome::Saved(sync::save_config(
                &self.service,
                &self.panel.form,
                &self.notifier,
            )),
            PanelCommand::ReloadConfig => {
                self.jobs.push(Job::LoadConfig);
                CommandOutcome::ReloadQueued
            }
            PanelCommand::ScrollUp(lines) => {
                self.panel.log_viewer.scroll_up(lines);
                CommandOutcome::Scrolled
            }
            PanelCommand::ScrollDown(lines) => {
                self.panel.log_viewer.scroll_down(lines);
                CommandOutcome::Scrolled
            }
            PanelCommand::ScrollToBottom => {
                self.panel.log_viewer.scroll_to_bottom();
                CommandOutcome::Scrolled
            }
        };

        self.scheduler.collect_pending(now);
        outcome
    }
}
