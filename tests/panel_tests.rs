/// Panel behaviour tests.
///
/// Drives the routines and the `PanelApp` loop against an in-memory
/// service, with simulated time, and checks the resulting panel model.
use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

use serde_json::{Value, json};

use botpanel::app::{CommandOutcome, JobReport, PanelApp, PanelCommand};
use botpanel::config::schema::PollingSettings;
use botpanel::diagnostics::{Level, Notifier};
use botpanel::logs::{LogEntry, LogLevel, LogRefresh, fetch_logs};
use botpanel::panel::{ConfigForm, FormField, Panel, Tab, Tone};
use botpanel::poller::{self, BotCommand, CONTROL_FAILED_MESSAGE, StatusPoll};
use botpanel::router::ViewRouter;
use botpanel::scheduler::{Job, JobQueue};
use botpanel::service::{
    BotService, ConfigPayload, Endpoint, LogsResponse, RemoteConfig, ServiceError,
    StatusResponse,
};
use botpanel::sync::{self, SAVE_FAILED_MESSAGE, SAVED_MESSAGE, SaveOutcome};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reply {
    Ok,
    Http(u16),
    Down,
}

fn reply(endpoint: Endpoint, reply: Reply) -> Result<(), ServiceError> {
    match reply {
        Reply::Ok => Ok(()),
        Reply::Http(status) => Err(ServiceError::Status { endpoint, status }),
        Reply::Down => Err(down(endpoint)),
    }
}

fn down(endpoint: Endpoint) -> ServiceError {
    ServiceError::Transport {
        endpoint,
        message: "connection refused".to_string(),
    }
}

/// Scripted service. `None` for a body means the service is unreachable.
struct FakeService {
    calls: RefCell<Vec<Endpoint>>,
    status: RefCell<Option<StatusResponse>>,
    config: RefCell<Option<Value>>,
    logs: RefCell<Option<String>>,
    control: Cell<Reply>,
    save: Cell<Reply>,
    saved: RefCell<Vec<ConfigPayload>>,
}

impl FakeService {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            status: RefCell::new(Some(StatusResponse::default())),
            config: RefCell::new(Some(json!({}))),
            logs: RefCell::new(Some(String::new())),
            control: Cell::new(Reply::Ok),
            save: Cell::new(Reply::Ok),
            saved: RefCell::new(Vec::new()),
        }
    }

    fn with_status(self, running: bool, image_count: i64) -> Self {
        self.set_status(running, image_count);
        self
    }

    fn set_status(&self, running: bool, image_count: i64) {
        *self.status.borrow_mut() = Some(StatusResponse {
            running,
            image_count: Some(image_count),
        });
    }

    fn with_config(self, config: Value) -> Self {
        *self.config.borrow_mut() = Some(config);
        self
    }

    fn set_logs(&self, text: &str) {
        *self.logs.borrow_mut() = Some(text.to_string());
    }

    fn calls(&self) -> Vec<Endpoint> {
        self.calls.borrow().clone()
    }

    fn count(&self, endpoint: Endpoint) -> usize {
        self.calls.borrow().iter().filter(|&&e| e == endpoint).count()
    }

    fn record(&self, endpoint: Endpoint) {
        self.calls.borrow_mut().push(endpoint);
    }
}

impl BotService for FakeService {
    fn status(&self) -> Result<StatusResponse, ServiceError> {
        self.record(Endpoint::Status);
        self.status.borrow().clone().ok_or(down(Endpoint::Status))
    }

    fn start(&self) -> Result<(), ServiceError> {
        self.record(Endpoint::Start);
        reply(Endpoint::Start, self.control.get())
    }

    fn stop(&self) -> Result<(), ServiceError> {
        self.record(Endpoint::Stop);
        reply(Endpoint::Stop, self.control.get())
    }

    fn load_config(&self) -> Result<RemoteConfig, ServiceError> {
        self.record(Endpoint::LoadConfig);
        let body = self.config.borrow().clone().ok_or(down(Endpoint::LoadConfig))?;
        Ok(serde_json::from_value(body).expect("RemoteConfig accepts any JSON"))
    }

    fn save_config(&self, payload: &ConfigPayload) -> Result<(), ServiceError> {
        self.record(Endpoint::SaveConfig);
        self.saved.borrow_mut().push(payload.clone());
        reply(Endpoint::SaveConfig, self.save.get())
    }

    fn logs(&self) -> Result<LogsResponse, ServiceError> {
        self.record(Endpoint::Logs);
        let logs = self.logs.borrow().clone().ok_or(down(Endpoint::Logs))?;
        Ok(LogsResponse { logs })
    }
}

#[derive(Default)]
struct RecordingNotifier {
    alerts: RefCell<Vec<String>>,
    diagnostics: RefCell<Vec<(Level, String, String)>>,
}

impl RecordingNotifier {
    fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    fn diagnostics_from(&self, source: &str) -> Vec<(Level, String)> {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|(_, s, _)| s == source)
            .map(|(level, _, msg)| (*level, msg.clone()))
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn diagnostic(&self, level: Level, source: &str, message: &str) {
        self.diagnostics
            .borrow_mut()
            .push((level, source.to_string(), message.to_string()));
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn app_with(service: FakeService, t0: Instant) -> PanelApp<FakeService, RecordingNotifier> {
    PanelApp::new(
        service,
        RecordingNotifier::default(),
        &PollingSettings::default(),
        t0,
    )
}

fn switch(tab_id: &str) -> PanelCommand {
    PanelCommand::SwitchTab {
        tab_id: tab_id.to_string(),
        origin: None,
    }
}

// ---------------------------------------------------------------------------
// View router
// ---------------------------------------------------------------------------

#[test]
fn switching_twice_leaves_exactly_one_view() {
    let mut panel = Panel::default();
    let mut router = ViewRouter::new(JobQueue::new());

    router.switch_to(&mut panel, Tab::Logs, "nav-logs");
    let once = panel.clone();
    router.switch_to(&mut panel, Tab::Logs, "nav-logs");

    assert_eq!(panel, once);
    assert_eq!(panel.visible_tabs(), vec![Tab::Logs]);
    assert_eq!(panel.active_nav_ids(), vec!["nav-logs"]);
    assert_eq!(panel.page_title, "Detailed log");
    assert_eq!(router.current_tab(), Tab::Logs);
}

#[test]
fn every_tab_has_its_title() {
    let mut panel = Panel::default();
    let mut router = ViewRouter::new(JobQueue::new());
    for (tab, title) in [
        (Tab::Config, "System configuration"),
        (Tab::Dashboard, "Overview"),
        (Tab::Logs, "Detailed log"),
    ] {
        router.switch_to(&mut panel, tab, &tab.nav_id());
        assert_eq!(panel.page_title, title);
        assert_eq!(panel.visible_tab(), Some(tab));
    }
}

#[test]
fn entering_config_queues_a_load_without_waiting() {
    let t0 = Instant::now();
    let service = FakeService::new().with_config(json!({"email": "bot@example.com"}));
    let mut app = app_with(service, t0);
    app.run_due(t0);

    let outcome = app.handle(switch("config"), t0 + ms(10));
    assert_eq!(outcome, CommandOutcome::Switched(Tab::Config));
    // Switched, but nothing fetched yet.
    assert_eq!(app.service().count(Endpoint::LoadConfig), 0);
    assert_eq!(app.panel().visible_tab(), Some(Tab::Config));

    let reports = app.run_due(t0 + ms(10));
    assert_eq!(reports[0], (Job::LoadConfig, JobReport::ConfigLoaded(true)));
    assert_eq!(app.panel().form.email, "bot@example.com");
}

#[test]
fn other_tabs_do_not_load_config() {
    let t0 = Instant::now();
    let mut app = app_with(FakeService::new(), t0);
    app.run_due(t0);
    app.handle(switch("logs"), t0);
    app.handle(switch("dashboard"), t0);
    app.run_due(t0 + ms(1));
    assert_eq!(app.service().count(Endpoint::LoadConfig), 0);
}

#[test]
fn unknown_tab_changes_nothing() {
    let t0 = Instant::now();
    let mut app = app_with(FakeService::new(), t0);
    let before = app.panel().clone();

    let outcome = app.handle(switch("settings"), t0);

    assert!(matches!(outcome, CommandOutcome::Rejected(_)));
    assert_eq!(app.panel(), &before);
    assert_eq!(app.router().current_tab(), Tab::Dashboard);
    let router_diags = app.notifier().diagnostics_from("router");
    assert_eq!(router_diags.len(), 1);
    assert_eq!(router_diags[0].0, Level::Error);
}

#[test]
fn foreign_origin_leaves_no_control_active() {
    let mut panel = Panel::default();
    let mut router = ViewRouter::new(JobQueue::new());
    router.switch_to(&mut panel, Tab::Logs, "keyboard-shortcut");
    assert_eq!(panel.visible_tab(), Some(Tab::Logs));
    assert!(panel.active_nav_ids().is_empty());
}

// ---------------------------------------------------------------------------
// Config synchronizer
// ---------------------------------------------------------------------------

#[test]
fn loop_rest_round_trips_through_minutes() {
    let service = FakeService::new().with_config(json!({
        "loop_rest_min": 5400,
        "loop_rest_max": 7230,
    }));
    let notifier = RecordingNotifier::default();
    let mut form = ConfigForm::default();

    assert!(sync::load_config(&service, &mut form, &notifier));
    assert_eq!(form.loop_rest_min, "90");
    // Sub-minute remainder is dropped on display.
    assert_eq!(form.loop_rest_max, "120");

    let payload = sync::build_payload(&form);
    assert_eq!(payload.loop_rest_min, 5400);
    assert_eq!(payload.loop_rest_max, 7200);
}

#[test]
fn sub_minute_loop_rest_survives_an_unedited_save() {
    let service = FakeService::new().with_config(json!({ "loop_rest_min": 30 }));
    let notifier = RecordingNotifier::default();
    let mut form = ConfigForm::default();

    assert!(sync::load_config(&service, &mut form, &notifier));
    assert_eq!(form.loop_rest_min, "0");
    assert_eq!(form.loop_rest_max, "120");

    let payload = sync::build_payload(&form);
    assert_eq!(payload.loop_rest_min, 30);
    assert_eq!(payload.loop_rest_max, 7200);
}

#[test]
fn missing_or_zero_values_take_defaults() {
    let service = FakeService::new().with_config(json!({
        "between_groups_min": 0,
        "loop_rest_max": null,
    }));
    let notifier = RecordingNotifier::default();
    let mut form = ConfigForm::default();
    sync::load_config(&service, &mut form, &notifier);

    assert_eq!(form.email, "");
    assert_eq!(form.group_urls, "");
    assert_eq!(form.between_groups_min, "60");
    assert_eq!(form.between_groups_max, "180");
    assert_eq!(form.loop_rest_min, "60");
    assert_eq!(form.loop_rest_max, "120");
}

#[test]
fn legacy_group_url_is_shown_when_list_is_missing_or_empty() {
    let notifier = RecordingNotifier::default();

    for config in [
        json!({"group_url": "https://example.com/g/1"}),
        json!({"group_urls": [], "group_url": "https://example.com/g/1"}),
    ] {
        let service = FakeService::new().with_config(config);
        let mut form = ConfigForm::default();
        sync::load_config(&service, &mut form, &notifier);
        assert_eq!(form.group_urls, "https://example.com/g/1");
    }

    let service = FakeService::new().with_config(json!({
        "group_urls": ["https://a", "https://b"],
        "group_url": "https://legacy",
    }));
    let mut form = ConfigForm::default();
    sync::load_config(&service, &mut form, &notifier);
    assert_eq!(form.group_urls, "https://a\nhttps://b");
}

#[test]
fn group_urls_split_trimmed_and_compacted() {
    let mut form = ConfigForm::default();
    form.group_urls = "  https://a  \n\n   \nhttps://b\n".to_string();
    let payload = sync::build_payload(&form);
    assert_eq!(payload.group_urls, vec!["https://a", "https://b"]);
}

#[test]
fn payload_always_carries_legacy_delays() {
    let payload = sync::build_payload(&ConfigForm::default());
    assert_eq!(payload.min_delay, 1);
    assert_eq!(payload.max_delay, 3);

    let body = serde_json::to_value(&payload).unwrap();
    assert_eq!(body["min_delay"], 1);
    assert_eq!(body["max_delay"], 3);
}

#[test]
fn form_numbers_use_prefix_parsing_and_fallbacks() {
    let mut form = ConfigForm::default();
    form.set(FormField::BetweenGroupsMin, "12abc");
    form.set(FormField::BetweenGroupsMax, "abc");
    form.set(FormField::LoopRestMin, "0");
    form.set(FormField::LoopRestMax, "");

    let payload = sync::build_payload(&form);
    assert_eq!(payload.between_groups_min, 12);
    assert_eq!(payload.between_groups_max, 180);
    assert_eq!(payload.loop_rest_min, 3600);
    assert_eq!(payload.loop_rest_max, 7200);
}

#[test]
fn save_outcomes_alert_the_operator() {
    let service = FakeService::new();
    let notifier = RecordingNotifier::default();
    let form = ConfigForm::default();

    assert_eq!(sync::save_config(&service, &form, &notifier), SaveOutcome::Saved);

    service.save.set(Reply::Http(500));
    assert_eq!(
        sync::save_config(&service, &form, &notifier),
        SaveOutcome::Rejected(500)
    );

    service.save.set(Reply::Down);
    assert_eq!(sync::save_config(&service, &form, &notifier), SaveOutcome::Failed);

    let alerts = notifier.alerts();
    assert_eq!(alerts[0], SAVED_MESSAGE);
    assert!(alerts[1].starts_with(SAVE_FAILED_MESSAGE));
    assert!(alerts[1].contains("500"));
    assert_eq!(alerts[2], SAVE_FAILED_MESSAGE);
    assert_eq!(service.saved.borrow().len(), 3);
}

#[test]
fn failed_load_leaves_form_untouched() {
    let service = FakeService::new();
    *service.config.borrow_mut() = None;
    let notifier = RecordingNotifier::default();
    let mut form = ConfigForm::default();
    form.email = "typed@example.com".to_string();

    assert!(!sync::load_config(&service, &mut form, &notifier));
    assert_eq!(form.email, "typed@example.com");
    assert!(notifier.alerts().is_empty());
    assert_eq!(notifier.diagnostics_from("config").len(), 1);
}

#[test]
fn edits_through_the_app_reach_the_payload() {
    let t0 = Instant::now();
    let mut app = app_with(FakeService::new(), t0);

    app.handle(
        PanelCommand::SetField(FormField::LoopRestMin, "45".to_string()),
        t0,
    );
    app.handle(
        PanelCommand::AppendLine(FormField::GroupUrls, "https://a".to_string()),
        t0,
    );
    app.handle(
        PanelCommand::AppendLine(FormField::GroupUrls, "https://b".to_string()),
        t0,
    );
    let outcome = app.handle(PanelCommand::Save, t0);

    assert_eq!(outcome, CommandOutcome::Saved(SaveOutcome::Saved));
    let saved = app.service().saved.borrow();
    assert_eq!(saved[0].loop_rest_min, 2700);
    assert_eq!(saved[0].group_urls, vec!["https://a", "https://b"]);
}

// ---------------------------------------------------------------------------
// Status poller
// ---------------------------------------------------------------------------

#[test]
fn exactly_one_control_is_visible() {
    let service = FakeService::new().with_status(true, 3);
    let notifier = RecordingNotifier::default();
    let mut panel = Panel::default();

    poller::update_status(&service, &mut panel, &notifier);
    assert!(panel.stop_control.visible);
    assert!(!panel.start_control.visible);
    assert_eq!(panel.status_badge.tone, Tone::Online);
    assert_eq!(panel.status_badge.text, "Running");

    service.set_status(false, 3);
    poller::update_status(&service, &mut panel, &notifier);
    assert!(panel.start_control.visible);
    assert!(!panel.stop_control.visible);
    assert_eq!(panel.status_badge.tone, Tone::Offline);
    assert_eq!(panel.status_badge.text, "Stopped");
}

#[test]
fn offline_keeps_last_run_state() {
    let service = FakeService::new().with_status(true, 7);
    let notifier = RecordingNotifier::default();
    let mut panel = Panel::default();
    poller::update_status(&service, &mut panel, &notifier);

    *service.status.borrow_mut() = None;
    let poll = poller::update_status(&service, &mut panel, &notifier);

    assert_eq!(poll, StatusPoll::Offline);
    assert_eq!(panel.connection_badge.tone, Tone::Offline);
    assert_eq!(panel.connection_badge.text, "Disconnected");
    assert_eq!(panel.status_badge.text, "Running");
    assert!(panel.stop_control.visible);
    assert_eq!(panel.image_count, "7");
    assert!(notifier.alerts().is_empty());
}

#[test]
fn missing_image_count_reads_zero() {
    let service = FakeService::new();
    *service.status.borrow_mut() = Some(StatusResponse {
        running: false,
        image_count: None,
    });
    let mut panel = Panel::default();
    panel.image_count = "9".to_string();
    poller::update_status(&service, &mut panel, &RecordingNotifier::default());
    assert_eq!(panel.image_count, "0");
}

#[test]
fn toggle_failure_alerts_and_skips_refresh() {
    let service = FakeService::new();
    service.control.set(Reply::Down);
    let notifier = RecordingNotifier::default();
    let jobs = JobQueue::new();

    let command = poller::toggle_bot(&service, &Panel::default(), &notifier, &jobs, ms(1000));

    assert_eq!(command, BotCommand::Start);
    assert_eq!(notifier.alerts(), vec![CONTROL_FAILED_MESSAGE.to_string()]);
    assert!(jobs.is_empty());
}

#[test]
fn toggle_non_2xx_still_refreshes() {
    let service = FakeService::new();
    service.control.set(Reply::Http(409));
    let notifier = RecordingNotifier::default();
    let jobs = JobQueue::new();

    poller::toggle_bot(&service, &Panel::default(), &notifier, &jobs, ms(1000));

    assert!(notifier.alerts().is_empty());
    assert!(!jobs.is_empty());
    assert_eq!(notifier.diagnostics_from("control")[0].0, Level::Warn);
}

// ---------------------------------------------------------------------------
// Log streamer
// ---------------------------------------------------------------------------

#[test]
fn unchanged_logs_do_not_rerender() {
    let service = FakeService::new();
    service.set_logs("t - INFO - one\nt - INFO - two");
    let notifier = RecordingNotifier::default();
    let mut panel = Panel::default();

    assert_eq!(
        fetch_logs(&service, &mut panel.log_viewer, &notifier),
        LogRefresh::Rendered(2)
    );
    assert_eq!(
        fetch_logs(&service, &mut panel.log_viewer, &notifier),
        LogRefresh::Unchanged
    );
    assert_eq!(panel.log_viewer.render_count(), 1);

    service.set_logs("t - INFO - one\nt - INFO - two\nt - ERROR - three");
    fetch_logs(&service, &mut panel.log_viewer, &notifier);
    assert_eq!(panel.log_viewer.render_count(), 2);
    assert_eq!(panel.log_viewer.entries().len(), 3);
}

#[test]
fn error_wins_over_warning() {
    let service = FakeService::new();
    service.set_logs("12:00 - WARNING - retry hit ERROR\nWARNING and ERROR in plain text");
    let mut panel = Panel::default();
    fetch_logs(&service, &mut panel.log_viewer, &RecordingNotifier::default());

    for entry in panel.log_viewer.entries() {
        assert_eq!(entry.level(), LogLevel::Error);
    }
}

#[test]
fn malformed_lines_render_whole() {
    let service = FakeService::new();
    service.set_logs("Bot started\nonly - two\n10:00 - INFO - a - b");
    let mut panel = Panel::default();
    fetch_logs(&service, &mut panel.log_viewer, &RecordingNotifier::default());

    let entries = panel.log_viewer.entries();
    assert_eq!(
        entries[0],
        LogEntry::Plain {
            level: LogLevel::Info,
            text: "Bot started".to_string()
        }
    );
    assert!(matches!(&entries[1], LogEntry::Plain { text, .. } if text == "only - two"));
    assert!(matches!(
        &entries[2],
        LogEntry::Structured { message, .. } if message == "a - b"
    ));
}

#[test]
fn log_fetch_failure_keeps_viewer() {
    let service = FakeService::new();
    service.set_logs("kept");
    let notifier = RecordingNotifier::default();
    let mut panel = Panel::default();
    fetch_logs(&service, &mut panel.log_viewer, &notifier);

    *service.logs.borrow_mut() = None;
    assert_eq!(
        fetch_logs(&service, &mut panel.log_viewer, &notifier),
        LogRefresh::Failed
    );
    assert_eq!(panel.log_viewer.last_raw(), Some("kept"));
    assert_eq!(notifier.diagnostics_from("logs")[0].0, Level::Error);
    assert!(notifier.alerts().is_empty());
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[test]
fn start_then_status_after_settle_delay() {
    let t0 = Instant::now();
    let mut app = app_with(FakeService::new().with_status(false, 12), t0);

    let reports = app.run_due(t0);
    assert_eq!(reports.len(), 2);
    assert_eq!(app.panel().image_count, "12");
    assert!(app.panel().start_control.visible);
    assert_eq!(app.panel().connection_badge.text, "Connected");
    assert_eq!(app.panel().status_badge.text, "Stopped");

    let pressed = t0 + ms(100);
    let outcome = app.handle(PanelCommand::Toggle, pressed);
    assert_eq!(outcome, CommandOutcome::Toggled(BotCommand::Start));
    assert_eq!(app.service().calls().last(), Some(&Endpoint::Start));

    app.service().set_status(true, 12);
    assert!(app.run_due(pressed + ms(999)).is_empty());

    let reports = app.run_due(pressed + ms(1000));
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, Job::UpdateStatus);
    assert!(app.panel().stop_control.visible);
    assert!(!app.panel().start_control.visible);
    assert_eq!(app.service().count(Endpoint::Status), 2);
}

#[test]
fn pollers_keep_their_cadence() {
    let t0 = Instant::now();
    let mut app = app_with(FakeService::new(), t0);

    for step in 0..=6 {
        app.run_due(t0 + ms(step * 1000));
    }

    // Status at 0, 3, 6 s; logs at 0, 2, 4, 6 s.
    assert_eq!(app.service().count(Endpoint::Status), 3);
    assert_eq!(app.service().count(Endpoint::Logs), 4);
}
