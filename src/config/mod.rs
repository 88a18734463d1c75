/// Settings system for botpanel.
///
/// Provides a layered settings hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::PanelSettings::default()`]
/// 2. **User global settings**: `~/.botpanel/config.toml`
/// 3. **Project local settings**: `.botpanel.toml` in the current working directory
/// 4. **Environment variables**: `BOTPANEL_*` overrides (highest precedence)
///
/// File layers are deep-merged at the key level: a file only overrides the
/// keys it actually sets. Malformed files are ignored so a bad edit never
/// stops the panel from starting.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::PanelSettings;

// ---------------------------------------------------------------------------
// Settings loading
// ---------------------------------------------------------------------------

/// Load the fully resolved panel settings.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env vars.
pub fn load() -> PanelSettings {
    let mut settings = load_layers(
        global_config_path().as_deref(),
        project_config_path().as_deref(),
    );
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

/// Merge the file layers on top of the defaults, without env overrides.
pub fn load_layers(global: Option<&Path>, project: Option<&Path>) -> PanelSettings {
    let Ok(mut merged) = toml::Value::try_from(PanelSettings::default()) else {
        return PanelSettings::default();
    };

    for layer in [global, project].into_iter().flatten() {
        if let Some(value) = load_toml_value(layer) {
            merge_values(&mut merged, value);
        }
    }

    merged.try_into().unwrap_or_default()
}

/// Read a TOML file as a raw value tree. `None` if missing or malformed.
fn load_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    let value: toml::Value = toml::from_str(&content).ok()?;
    // Reject files whose values don't fit the schema rather than letting one
    // bad key poison the whole merge.
    value.clone().try_into::<PanelSettings>().ok()?;
    Some(value)
}

/// Deep-merge `overlay` into `base`. Tables merge key by key; any other
/// value replaces the base value.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global settings: `~/.botpanel/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".botpanel").join("config.toml"))
}

/// Path to the project local settings: `.botpanel.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".botpanel.toml"))
}

/// Return the path to the global settings file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project settings file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `BOTPANEL_URL`: service base URL
/// - `BOTPANEL_TIMEOUT_MS`: request timeout
/// - `BOTPANEL_STATUS_INTERVAL_MS` / `BOTPANEL_LOGS_INTERVAL_MS`: poll cadence
/// - `BOTPANEL_SETTLE_DELAY_MS`: delay before re-checking after start/stop
/// - `BOTPANEL_LOG_LEVEL`: diagnostics level
/// - `BOTPANEL_LOGGING`: diagnostics on/off (`1`/`true`/`yes`/`on`)
/// - `NO_COLOR`: any non-empty value disables colour
pub fn apply_env_overrides(settings: &mut PanelSettings, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("BOTPANEL_URL")
        && !val.is_empty()
    {
        settings.service.base_url = val;
    }
    if let Some(ms) = var("BOTPANEL_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
        settings.service.timeout_ms = ms;
    }
    if let Some(ms) = var("BOTPANEL_STATUS_INTERVAL_MS").and_then(|v| v.parse().ok()) {
        settings.polling.status_interval_ms = ms;
    }
    if let Some(ms) = var("BOTPANEL_LOGS_INTERVAL_MS").and_then(|v| v.parse().ok()) {
        settings.polling.logs_interval_ms = ms;
    }
    if let Some(ms) = var("BOTPANEL_SETTLE_DELAY_MS").and_then(|v| v.parse().ok()) {
        settings.polling.settle_delay_ms = ms;
    }
    if let Some(level) = var("BOTPANEL_LOG_LEVEL").and_then(|v| v.parse().ok()) {
        settings.logging.level = level;
    }
    if let Some(val) = var("BOTPANEL_LOGGING") {
        settings.logging.enabled = is_truthy(&val);
    }
    if var("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        settings.display.color = false;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Settings init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated settings to `~/.botpanel/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    write_default_config(&path, force)?;
    Ok(path)
}

/// Write the default annotated settings to an explicit path.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "settings file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create settings directory")?;
    }

    fs::write(path, PanelSettings::default_toml()).context("failed to write settings file")?;
    Ok(())
}

/// Set a single settings key in the global settings file.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)
}

/// Set a dotted key (e.g. `polling.status_interval_ms`) in the file at `path`.
///
/// A missing file starts from the defaults. The updated tree must still fit
/// the schema, otherwise nothing is written.
pub fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(path).context("failed to read settings file")?;
        toml::from_str(&content).context("failed to parse settings as TOML value")?
    } else {
        toml::Value::try_from(PanelSettings::default())
            .context("failed to serialize default settings")?
    };

    set_toml_value(&mut root, key, value)?;

    root.clone()
        .try_into::<PanelSettings>()
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated settings")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create settings directory")?;
    }
    fs::write(path, output).context("failed to write settings file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The section must already exist; a missing leaf is created using the
/// default schema's type for that key, falling back to a string.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("expected a dotted key like 'service.base_url', got '{key}'");
    }

    let defaults = toml::Value::try_from(PanelSettings::default()).ok();
    let default_leaf = defaults.as_ref().and_then(|d| lookup(d, &parts)).cloned();

    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("settings key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];
    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table above '{leaf}' in '{key}'"))?;

    let template = table.get(leaf).cloned().or(default_leaf);
    let new_value = match template {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

fn lookup<'a>(root: &'a toml::Value, parts: &[&str]) -> Option<&'a toml::Value> {
    parts.iter().try_fold(root, |node, part| node.get(*part))
}

/// Reset the global settings to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) settings as TOML.
pub fn show_effective_config() -> Result<String> {
    let settings = load();
    toml::to_string_pretty(&settings).context("failed to serialize effective settings")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
