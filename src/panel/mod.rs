//! In-memory model of the control panel's bound regions and controls.
//!
//! The panel routines (router, config sync, status poller, log streamer)
//! only ever read and write this model. The terminal shell in
//! [`crate::console`] draws it; tests inspect it directly.

pub mod form;
pub mod log_viewer;
pub mod view;

pub use form::{ConfigForm, FormField, UnknownField};
pub use log_viewer::LogViewer;
pub use view::{Tab, UnknownTab};

/// Colour class of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    Online,
    Offline,
    /// Nothing known yet.
    #[default]
    Pending,
}

/// A status badge: tone plus label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub tone: Tone,
    pub text: String,
}

impl Badge {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// A view region bound to one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRegion {
    pub tab: Tab,
    pub visible: bool,
}

/// A navigation control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavControl {
    pub id: String,
    pub tab: Tab,
    pub active: bool,
}

/// A button that is either shown or hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub visible: bool,
}

pub const RUNNING_TEXT: &str = "Running";
pub const STOPPED_TEXT: &str = "Stopped";
pub const CONNECTED_TEXT: &str = "Connected";
pub const DISCONNECTED_TEXT: &str = "Disconnected";
pub const PENDING_TEXT: &str = "Connecting…";

/// Every bound element of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub views: Vec<ViewRegion>,
    pub nav: Vec<NavControl>,
    pub page_title: String,
    /// Bot run state.
    pub status_badge: Badge,
    /// Reachability of the Bot Control Service.
    pub connection_badge: Badge,
    pub start_control: Control,
    pub stop_control: Control,
    pub image_count: String,
    pub form: ConfigForm,
    pub log_viewer: LogViewer,
}

impl Default for Panel {
    fn default() -> Self {
        let initial = Tab::default();
        Self {
            views: Tab::ALL
                .into_iter()
                .map(|tab| ViewRegion {
                    tab,
                    visible: tab == initial,
                })
                .collect(),
            nav: Tab::ALL
                .into_iter()
                .map(|tab| NavControl {
                    id: tab.nav_id(),
                    tab,
                    active: tab == initial,
                })
                .collect(),
            page_title: initial.title().to_string(),
            status_badge: Badge::new(Tone::Pending, PENDING_TEXT),
            connection_badge: Badge::new(Tone::Pending, PENDING_TEXT),
            start_control: Control { visible: true },
            stop_control: Control { visible: false },
            image_count: "0".to_string(),
            form: ConfigForm::default(),
            log_viewer: LogViewer::default(),
        }
    }
}

impl Panel {
    /// Tabs whose region is currently shown.
    pub fn visible_tabs(&self) -> Vec<Tab> {
        self.views
            .iter()
            .filter(|v| v.visible)
            .map(|v| v.tab)
            .collect()
    }

    /// Ids of the navigation controls currently marked active.
    pub fn active_nav_ids(&self) -> Vec<&str> {
        self.nav
            .iter()
            .filter(|n| n.active)
            .map(|n| n.id.as_str())
            .collect()
    }

    /// The single visible tab, if exactly one is shown.
    pub fn visible_tab(&self) -> Option<Tab> {
        match self.visible_tabs().as_slice() {
            [tab] => Some(*tab),
            _ => None,
        }
    }
}
