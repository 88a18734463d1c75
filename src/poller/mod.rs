//! Status poller. Bot run state, connectivity, and the start/stop toggle.

use std::fmt;
use std::time::Duration;

use crate::diagnostics::{Level, Notifier};
use crate::panel::{
    Badge, CONNECTED_TEXT, DISCONNECTED_TEXT, Panel, RUNNING_TEXT, STOPPED_TEXT, Tone,
};
use crate::scheduler::{Job, JobQueue};
use crate::service::{BotService, ServiceError, StatusResponse};

pub const CONTROL_FAILED_MESSAGE: &str = "Error controlling the bot";

/// Result of one status poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusPoll {
    Online(StatusResponse),
    Offline,
}

/// Poll the service and refresh the badges, controls and image counter.
///
/// On failure only the connectivity badge changes; the run-state badge keeps
/// its last known value.
pub fn update_status(
    service: &dyn BotService,
    panel: &mut Panel,
    notifier: &dyn Notifier,
) -> StatusPoll {
    match service.status() {
        Ok(status) => {
            apply_status(panel, &status);
            StatusPoll::Online(status)
        }
        Err(err) => {
            panel.connection_badge = Badge::new(Tone::Offline, DISCONNECTED_TEXT);
            notifier.diagnostic(Level::Warn, "status", &err.to_string());
            StatusPoll::Offline
        }
    }
}

/// Write a successful status into the panel.
pub fn apply_status(panel: &mut Panel, status: &StatusResponse) {
    panel.connection_badge = Badge::new(Tone::Online, CONNECTED_TEXT);

    if status.running {
        panel.status_badge = Badge::new(Tone::Online, RUNNING_TEXT);
    } else {
        panel.status_badge = Badge::new(Tone::Offline, STOPPED_TEXT);
    }
    panel.start_control.visible = !status.running;
    panel.stop_control.visible = status.running;

    panel.image_count = status.image_count().to_string();
}

/// Command sent by the toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Stop,
}

impl fmt::Display for BotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Stop => write!(f, "stop"),
        }
    }
}

impl BotCommand {
    /// Decided from what the panel currently shows: start if the start
    /// control is visible, stop otherwise.
    pub fn from_panel(panel: &Panel) -> Self {
        if panel.start_control.visible {
            Self::Start
        } else {
            Self::Stop
        }
    }

    pub fn send(&self, service: &dyn BotService) -> Result<(), ServiceError> {
        match self {
            Self::Start => service.start(),
            Self::Stop => service.stop(),
        }
    }
}

/// Start or stop the bot, then schedule one status refresh after `settle`.
///
/// A non-2xx reply still counts as "sent": the follow-up refresh shows what
/// actually happened. Only a transport failure alerts the operator, and then
/// no refresh is scheduled.
pub fn toggle_bot(
    service: &dyn BotService,
    panel: &Panel,
    notifier: &dyn Notifier,
    jobs: &JobQueue,
    settle: Duration,
) -> BotCommand {
    let command = BotCommand::from_panel(panel);

    match command.send(service) {
        Ok(()) => jobs.push_after(settle, Job::UpdateStatus),
        Err(ServiceError::Status { status, .. }) => {
            notifier.diagnostic(
                Level::Warn,
                "control",
                &format!("{command} returned HTTP {status}"),
            );
            jobs.push_after(settle, Job::UpdateStatus);
        }
        Err(err) => {
            notifier.diagnostic(Level::Error, "control", &err.to_string());
            notifier.alert(CONTROL_FAILED_MESSAGE);
        }
    }

    command
}
