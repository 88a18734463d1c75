//! Config synchronizer. Moves the bot configuration between the service
//! and the config form.
//!
//! Loading fills the form with display values (loop rest shown in minutes,
//! missing fields defaulted). Saving performs the inverse conversions and
//! always forces the legacy delay fields.

pub mod convert;

use crate::diagnostics::{Level, Notifier};
use crate::panel::ConfigForm;
use crate::service::{BotService, ConfigPayload, RemoteConfig, ServiceError};

use convert::{int_or, loop_rest_seconds, seconds_to_minutes, split_lines, stored_or, sub_minute};

/// Shown when a stored value is absent (seconds).
pub const BETWEEN_GROUPS_MIN_DEFAULT: i64 = 60;
pub const BETWEEN_GROUPS_MAX_DEFAULT: i64 = 180;
pub const LOOP_REST_MIN_DEFAULT_SECS: i64 = 3600;
pub const LOOP_REST_MAX_DEFAULT_SECS: i64 = 7200;

/// Used when a form value does not parse (minutes).
pub const LOOP_REST_MIN_FALLBACK_MINUTES: i64 = 60;
pub const LOOP_REST_MAX_FALLBACK_MINUTES: i64 = 120;

/// Legacy delay fields, always sent with these values.
pub const LEGACY_MIN_DELAY: i64 = 1;
pub const LEGACY_MAX_DELAY: i64 = 3;

pub const SAVED_MESSAGE: &str = "Configuration saved!";
pub const SAVE_FAILED_MESSAGE: &str = "Error saving configuration";

const SOURCE: &str = "config";

/// Outcome of a save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The service answered with a non-2xx status.
    Rejected(u16),
    /// No answer, or an unusable one.
    Failed,
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Fetch the stored config and write it into the form.
///
/// On failure the form is left as it was and the error goes to the
/// diagnostics channel only. Returns whether the form was populated.
pub fn load_config(
    service: &dyn BotService,
    form: &mut ConfigForm,
    notifier: &dyn Notifier,
) -> bool {
    match service.load_config() {
        Ok(config) => {
            populate_form(form, &config);
            true
        }
        Err(err) => {
            notifier.diagnostic(Level::Error, SOURCE, &format!("failed to load config: {err}"));
            false
        }
    }
}

/// Write display values for `config` into `form`.
pub fn populate_form(form: &mut ConfigForm, config: &RemoteConfig) {
    form.email = text_or_empty(&config.email);
    form.password = text_or_empty(&config.password);
    form.group_urls = group_urls_text(config);
    form.page_url = text_or_empty(&config.page_url);
    form.post_content = text_or_empty(&config.post_content);

    form.between_groups_min =
        stored_or(config.between_groups_min, BETWEEN_GROUPS_MIN_DEFAULT).to_string();
    form.between_groups_max =
        stored_or(config.between_groups_max, BETWEEN_GROUPS_MAX_DEFAULT).to_string();

    let rest_min = stored_or(config.loop_rest_min, LOOP_REST_MIN_DEFAULT_SECS);
    let rest_max = stored_or(config.loop_rest_max, LOOP_REST_MAX_DEFAULT_SECS);
    form.loop_rest_min = seconds_to_minutes(rest_min).to_string();
    form.loop_rest_max = seconds_to_minutes(rest_max).to_string();
    form.loop_rest_min_sub_minute = sub_minute(rest_min);
    form.loop_rest_max_sub_minute = sub_minute(rest_max);
}

fn text_or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// The list form wins whenever it joins to something non-empty; otherwise
/// the deprecated scalar `group_url` is shown.
fn group_urls_text(config: &RemoteConfig) -> String {
    let joined = config
        .group_urls
        .as_ref()
        .map(|urls| urls.join("\n"))
        .unwrap_or_default();
    if !joined.is_empty() {
        return joined;
    }
    text_or_empty(&config.group_url)
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Build the wire payload from the form.
pub fn build_payload(form: &ConfigForm) -> ConfigPayload {
    ConfigPayload {
        email: form.email.clone(),
        password: form.password.clone(),
        group_urls: split_lines(&form.group_urls),
        page_url: form.page_url.clone(),
        post_content: form.post_content.clone(),
        between_groups_min: int_or(&form.between_groups_min, BETWEEN_GROUPS_MIN_DEFAULT),
        between_groups_max: int_or(&form.between_groups_max, BETWEEN_GROUPS_MAX_DEFAULT),
        loop_rest_min: loop_rest_seconds(
            &form.loop_rest_min,
            form.loop_rest_min_sub_minute,
            LOOP_REST_MIN_FALLBACK_MINUTES,
        ),
        loop_rest_max: loop_rest_seconds(
            &form.loop_rest_max,
            form.loop_rest_max_sub_minute,
            LOOP_REST_MAX_FALLBACK_MINUTES,
        ),
        min_delay: LEGACY_MIN_DELAY,
        max_delay: LEGACY_MAX_DELAY,
    }
}

/// Submit the form and tell the operator how it went.
pub fn save_config(
    service: &dyn BotService,
    form: &ConfigForm,
    notifier: &dyn Notifier,
) -> SaveOutcome {
    let payload = build_payload(form);

    match service.save_config(&payload) {
        Ok(()) => {
            notifier.alert(SAVED_MESSAGE);
            SaveOutcome::Saved
        }
        Err(ServiceError::Status { status, .. }) => {
            notifier.alert(&format!("{SAVE_FAILED_MESSAGE}: service returned HTTP {status}"));
            notifier.diagnostic(
                Level::Warn,
                SOURCE,
                &format!("config save rejected with HTTP {status}"),
            );
            SaveOutcome::Rejected(status)
        }
        Err(err) => {
            notifier.alert(SAVE_FAILED_MESSAGE);
            notifier.diagnostic(Level::Error, SOURCE, &format!("failed to save config: {err}"));
            SaveOutcome::Failed
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
