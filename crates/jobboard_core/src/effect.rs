use url::Url;

use crate::{HistoryState, LoadedPage, NavTicket, NavigationFailure, NavigationRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PreventDefault,
    Navigate(NavigationRequest),
    ReplaceHistory { state: HistoryState, url: Url },
    MarkTransitioning,
    FetchPage { ticket: NavTicket, url: Url },
    /// Copy title and body class, replace the container's inner markup.
    ApplyPage { ticket: NavTicket, page: LoadedPage },
    PushHistory { state: HistoryState, url: Url },
    ScrollToTop,
    /// `ticket` is `None` for the setup run at install time.
    RunPageSetup {
        ticket: Option<NavTicket>,
        route: String,
    },
    HardNavigate {
        url: Url,
        failure: NavigationFailure,
    },
    ClearTransitioning,
}
