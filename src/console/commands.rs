//! Operator command line for `botpanel watch`.

use crate::app::PanelCommand;
use crate::panel::FormField;

/// Default scroll step for `up` / `down`.
const SCROLL_STEP: usize = 10;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(PanelCommand),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  dashboard | config | logs      switch view (or: tab <id>)
  toggle                         start the bot if stopped, stop it if running
  set <field> <value>            set a config field (\\n in value = newline)
  add <field> <line>             append a line to a config field
  clear <field>                  empty a config field
  save                           submit the config form
  reload                         reload config from the service
  up [n] | down [n] | bottom     scroll the log view
  help                           show this help
  quit                           exit
fields: email password group_urls page_url post_content
        between_groups_min between_groups_max loop_rest_min loop_rest_max";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (line, ""),
    };

    let input = match word {
        "dashboard" | "config" | "logs" => switch(word),
        "tab" if !rest.is_empty() => switch(rest),
        "tab" => return Err("usage: tab <id>".to_string()),
        "toggle" => Input::Command(PanelCommand::Toggle),
        "set" => {
            let (field, value) = field_and_value(rest, "set <field> <value>")?;
            Input::Command(PanelCommand::SetField(field, unescape_newlines(value)))
        }
        "add" => {
            let (field, value) = field_and_value(rest, "add <field> <line>")?;
            Input::Command(PanelCommand::AppendLine(field, value.to_string()))
        }
        "clear" => Input::Command(PanelCommand::ClearField(field(rest)?)),
        "save" => Input::Command(PanelCommand::Save),
        "reload" => Input::Command(PanelCommand::ReloadConfig),
        "up" => Input::Command(PanelCommand::ScrollUp(step(rest)?)),
        "down" => Input::Command(PanelCommand::ScrollDown(step(rest)?)),
        "bottom" => Input::Command(PanelCommand::ScrollToBottom),
        "help" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };

    Ok(Some(input))
}

fn switch(tab_id: &str) -> Input {
    Input::Command(PanelCommand::SwitchTab {
        tab_id: tab_id.to_string(),
        origin: None,
    })
}

fn field(name: &str) -> Result<FormField, String> {
    name.trim()
        .parse::<FormField>()
        .map_err(|e| e.to_string())
}

fn field_and_value<'a>(rest: &'a str, usage: &str) -> Result<(FormField, &'a str), String> {
    let (name, value) = rest
        .split_once(char::is_whitespace)
        .map(|(n, v)| (n, v.trim_start()))
        .unwrap_or((rest, ""));
    if name.is_empty() {
        return Err(format!("usage: {usage}"));
    }
    Ok((field(name)?, value))
}

fn step(rest: &str) -> Result<usize, String> {
    if rest.is_empty() {
        return Ok(SCROLL_STEP);
    }
    rest.parse()
        .map_err(|_| format!("expected a line count, got '{rest}'"))
}

fn unescape_newlines(value: &str) -> String {
    value.replace("\\n", "\n")
}
