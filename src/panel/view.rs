//! Tabs of the control panel.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The mutually exclusive views an operator can have active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    /// Run state, start/stop and the image counter.
    #[default]
    Dashboard,
    /// Bot configuration form.
    Config,
    /// Live, colorized log tail.
    Logs,
}

impl Tab {
    /// All tabs in navigation order.
    pub const ALL: [Tab; 3] = [Tab::Dashboard, Tab::Config, Tab::Logs];

    /// Stable identifier, as used by commands and navigation controls.
    pub fn id(&self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Config => "config",
            Tab::Logs => "logs",
        }
    }

    /// Page title shown while the tab is active.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Overview",
            Tab::Config => "System configuration",
            Tab::Logs => "Detailed log",
        }
    }

    /// Id of the navigation control bound to this tab.
    pub fn nav_id(&self) -> String {
        format!("nav-{}", self.id())
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A tab id that matches no view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tab '{0}' (expected dashboard, config or logs)")]
pub struct UnknownTab(pub String);

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.id() == s)
            .ok_or_else(|| UnknownTab(s.to_string()))
    }
}
