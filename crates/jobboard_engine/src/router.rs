use jobboard_core::{ClickEvent, Effect, HistoryState, Msg, NavigationRequest};
use jobboard_logging::{nav_debug, nav_warn};

use crate::{NavigationOutcome, Navigator, SetupError, SetupReport};

/// What the document-level click listener must do with an event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClickHandling {
    pub prevent_default: bool,
    pub navigation: Option<NavigationRequest>,
}

/// Entry points wired to browser events: document clicks, `popstate`, and
/// the one-off install on page load.
pub struct Router {
    navigator: Navigator,
}

impl Router {
    pub fn new(navigator: Navigator) -> Self {
        Self { navigator }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Records router state on the current history entry and runs the page
    /// setup for the page the browser just loaded.
    pub async fn install(&self) -> Result<SetupReport, SetupError> {
        let host = self.navigator.host();
        let effects = self.navigator.dispatch(Msg::Installed {
            location: host.location(),
        });

        let mut result = Ok(SetupReport::Unmatched);
        for effect in effects {
            match effect {
                Effect::ReplaceHistory { state, url } => host.replace_state(&state, &url),
                Effect::RunPageSetup { route, .. } => {
                    result = self.navigator.registry().run_page_setup(&route, host).await;
                    if let Err(err) = &result {
                        nav_warn!("Initial page setup for {} failed: {}", route, err);
                    }
                }
                other => nav_debug!("Install ignoring effect {:?}", other),
            }
        }
        result
    }

    /// Decides synchronously, as a click listener must, whether the browser's
    /// default action is cancelled and which navigation follows.
    pub fn intercept(&self, click: &ClickEvent) -> ClickHandling {
        let effects = self.navigator.dispatch(Msg::LinkClicked {
            click: click.clone(),
            location: self.navigator.host().location(),
        });

        let mut handling = ClickHandling::default();
        for effect in effects {
            match effect {
                Effect::PreventDefault => handling.prevent_default = true,
                Effect::Navigate(request) => handling.navigation = Some(request),
                other => nav_debug!("Click ignoring effect {:?}", other),
            }
        }
        handling
    }

    /// [`Router::intercept`] followed by the navigation it asked for.
    pub async fn handle_click(
        &self,
        click: &ClickEvent,
    ) -> (ClickHandling, Option<NavigationOutcome>) {
        let handling = self.intercept(click);
        let outcome = match handling.navigation.clone() {
            Some(request) => Some(self.navigator.navigate(request).await),
            None => None,
        };
        (handling, outcome)
    }

    /// Browser back/forward: catch the content up with the history entry
    /// the browser already moved to.
    pub async fn handle_popstate(&self, state: Option<HistoryState>) -> NavigationOutcome {
        let effects = self.navigator.dispatch(Msg::PopState {
            state,
            location: self.navigator.host().location(),
        });

        let request = effects.into_iter().find_map(|effect| match effect {
            Effect::Navigate(request) => Some(request),
            _ => None,
        });
        match request {
            Some(request) => self.navigator.navigate(request).await,
            None => NavigationOutcome::Superseded,
        }
    }

    pub async fn navigate(&self, request: NavigationRequest) -> NavigationOutcome {
        self.navigator.navigate(request).await
    }
}
