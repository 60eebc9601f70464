use url::Url;

use crate::{ClickEvent, HistoryState, LoadedPage, NavTicket, NavigationFailure, NavigationRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Router installed on a freshly loaded page.
    Installed { location: Url },
    /// A click bubbled up to the document.
    LinkClicked { click: ClickEvent, location: Url },
    /// Browser back/forward.
    PopState {
        state: Option<HistoryState>,
        location: Url,
    },
    /// Start loading a page. `has_container` tells whether the live page
    /// still carries the content container.
    NavigationRequested {
        request: NavigationRequest,
        has_container: bool,
    },
    /// The fetched page parsed and its content container was found.
    PageLoaded { ticket: NavTicket, page: LoadedPage },
    /// The new content is on screen and history is up to date.
    PageApplied { ticket: NavTicket },
    /// Page setup for the new content completed.
    SetupFinished { ticket: NavTicket },
    NavigationFailed {
        ticket: NavTicket,
        failure: NavigationFailure,
    },
}
