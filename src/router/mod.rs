//! View router. Switches the visible panel among the tabs.
//!
//! The router owns [`UiState`], the only record of which tab is current.
//! Entering the config tab asks for a config load through the shared
//! [`JobQueue`]; the router never waits for it, so navigation stays
//! instant even when the service is slow.

use crate::panel::{Panel, Tab, UnknownTab};
use crate::scheduler::{Job, JobQueue};

/// Process-wide UI state. Reinitialized to the dashboard on start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState {
    pub current_tab: Tab,
}

/// Owns [`UiState`] and applies tab switches to the panel.
#[derive(Debug)]
pub struct ViewRouter {
    state: UiState,
    jobs: JobQueue,
}

impl ViewRouter {
    pub fn new(jobs: JobQueue) -> Self {
        Self {
            state: UiState::default(),
            jobs,
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn current_tab(&self) -> Tab {
        self.state.current_tab
    }

    /// Show `tab` and mark the navigation control `origin` active.
    ///
    /// Every region is hidden and every control deactivated first, so
    /// repeated calls leave exactly one region visible. An `origin` that
    /// names no control leaves all controls inactive.
    pub fn switch_to(&mut self, panel: &mut Panel, tab: Tab, origin: &str) {
        for view in &mut panel.views {
            view.visible = false;
        }
        for nav in &mut panel.nav {
            nav.active = false;
        }

        for view in panel.views.iter_mut().filter(|v| v.tab == tab) {
            view.visible = true;
        }
        for nav in panel.nav.iter_mut().filter(|n| n.id == origin) {
            nav.active = true;
        }

        panel.page_title = tab.title().to_string();
        self.state.current_tab = tab;

        if tab == Tab::Config {
            self.jobs.push(Job::LoadConfig);
        }
    }

    /// Switch by tab id. An unknown id is rejected and nothing changes.
    pub fn switch_to_id(
        &mut self,
        panel: &mut Panel,
        tab_id: &str,
        origin: &str,
    ) -> Result<Tab, UnknownTab> {
        let tab: Tab = tab_id.parse()?;
        self.switch_to(panel, tab, origin);
        Ok(tab)
    }
}
