use anyhow::Result;
use clap::{Parser, Subcommand};

use botpanel::poller::BotCommand;
use botpanel::{cli, config, console};

#[derive(Debug, Parser)]
#[command(name = "botpanel")]
#[command(about = "Terminal control panel for the Bot Control Service")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive panel: live status, logs and config editing
    Watch,
    /// Show the bot's run state and image count
    Status {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Start the bot
    Start,
    /// Stop the bot
    Stop,
    /// Print the most recent bot log entries
    Logs {
        /// Number of entries to show (default: display.log_view_lines)
        #[arg(long)]
        lines: Option<usize>,
    },
    /// Read or edit the bot configuration stored by the service
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage botpanel's own settings file
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Check settings files, service reachability and the diagnostics log
    Health,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the stored bot configuration
    Show,
    /// Change one field and save (use \n for line breaks in group_urls)
    Set {
        /// Form field, e.g. loop_rest_min
        field: String,
        value: String,
    },
}

#[derive(Debug, Subcommand)]
enum SettingsAction {
    /// Show the effective merged settings
    Show,
    /// Write a default settings file to ~/.botpanel/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. service.base_url
    Set { key: String, value: String },
    /// Reset the settings file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let settings = config::load();
    if !settings.display.color {
        colored::control::set_override(false);
    }

    match app.command {
        Commands::Watch => console::run_watch(&settings),
        Commands::Status { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_status(&settings, fmt)
        }
        Commands::Start => cli::run_bot_command(&settings, BotCommand::Start),
        Commands::Stop => cli::run_bot_command(&settings, BotCommand::Stop),
        Commands::Logs { lines } => cli::run_logs(&settings, lines),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(&settings),
            ConfigAction::Set { field, value } => cli::run_config_set(&settings, &field, &value),
        },
        Commands::Settings { action } => match action {
            SettingsAction::Show => cli::run_settings_show(),
            SettingsAction::Init { force } => cli::run_settings_init(force),
            SettingsAction::Set { key, value } => cli::run_settings_set(&key, &value),
            SettingsAction::Reset => cli::run_settings_reset(),
        },
        Commands::Health => cli::run_health(&settings),
    }
}
