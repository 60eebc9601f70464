use url::Url;

use crate::path::normalize_path_with;
use crate::view_model::RouterView;
use crate::RouterConfig;

/// Identifies one navigation attempt. Tickets increase monotonically and only
/// the most recent one may touch the page.
pub type NavTicket = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavPhase {
    #[default]
    Idle,
    Fetching,
    Swapped,
    Initializing,
    /// The router gave up; the browser is loading the page itself.
    HardFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNavigation {
    pub ticket: NavTicket,
    pub url: Url,
    pub push_history: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouterState {
    config: RouterConfig,
    phase: NavPhase,
    current_route: Option<String>,
    active: Option<ActiveNavigation>,
    last_ticket: NavTicket,
}

impl RouterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn phase(&self) -> NavPhase {
        self.phase
    }

    /// Normalized path of the content currently shown, once known.
    pub fn current_route(&self) -> Option<&str> {
        self.current_route.as_deref()
    }

    pub fn active(&self) -> Option<&ActiveNavigation> {
        self.active.as_ref()
    }

    pub fn view(&self) -> RouterView {
        RouterView {
            phase: self.phase,
            current_route: self.current_route.clone(),
        }
    }

    pub fn normalize(&self, pathname: &str) -> String {
        normalize_path_with(pathname, &self.config.default_page)
    }

    pub(crate) fn set_route(&mut self, route: String) {
        self.current_route = Some(route);
    }

    pub(crate) fn set_phase(&mut self, phase: NavPhase) {
        self.phase = phase;
    }

    pub(crate) fn begin(&mut self, url: Url, push_history: bool) -> NavTicket {
        self.last_ticket += 1;
        self.active = Some(ActiveNavigation {
            ticket: self.last_ticket,
            url,
            push_history,
        });
        self.last_ticket
    }

    /// The active navigation, if `ticket` is still the latest one.
    pub(crate) fn active_for(&self, ticket: NavTicket) -> Option<&ActiveNavigation> {
        self.active.as_ref().filter(|nav| nav.ticket == ticket)
    }

    pub(crate) fn finish(&mut self) -> Option<ActiveNavigation> {
        self.active.take()
    }
}
