use crate::{
    classify_click, popstate_target, ClickDecision, Effect, HistoryState, Msg, NavPhase,
    NavigationFailure, NavigationRequest, RouterState,
};

/// Pure update function: applies a message to the router state and returns
/// the effects the host must carry out, in order.
///
/// Only the latest navigation ticket is honoured; messages for superseded
/// navigations produce no effects.
pub fn update(mut state: RouterState, msg: Msg) -> (RouterState, Vec<Effect>) {
    let effects = match msg {
        Msg::Installed { location } => {
            let route = state.normalize(location.path());
            state.set_route(route.clone());
            vec![
                Effect::ReplaceHistory {
                    state: HistoryState::for_url(&location),
                    url: location,
                },
                Effect::RunPageSetup {
                    ticket: None,
                    route,
                },
            ]
        }
        Msg::LinkClicked { click, location } => {
            match classify_click(&click, &location, &state.config().page_extension) {
                ClickDecision::Ignore(_) => Vec::new(),
                ClickDecision::PreventOnly => vec![Effect::PreventDefault],
                ClickDecision::Navigate(url) => vec![
                    Effect::PreventDefault,
                    Effect::Navigate(NavigationRequest::push(url)),
                ],
            }
        }
        Msg::PopState {
            state: entry,
            location,
        } => {
            let url = popstate_target(entry.as_ref(), &location);
            vec![Effect::Navigate(NavigationRequest::replay(url))]
        }
        Msg::NavigationRequested {
            request,
            has_container,
        } => {
            let NavigationRequest { url, push_history } = request;
            let ticket = state.begin(url.clone(), push_history);
            if has_container {
                state.set_phase(NavPhase::Fetching);
                vec![Effect::MarkTransitioning, Effect::FetchPage { ticket, url }]
            } else {
                let failure = NavigationFailure::MissingContainer {
                    selector: state.config().content_selector.clone(),
                };
                state.finish();
                state.set_phase(NavPhase::HardFallback);
                vec![Effect::HardNavigate { url, failure }]
            }
        }
        Msg::PageLoaded { ticket, page } => {
            let Some(active) = state.active_for(ticket).cloned() else {
                return (state, Vec::new());
            };
            let route = state.normalize(active.url.path());
            state.set_phase(NavPhase::Swapped);
            state.set_route(route);

            // Swap first, push second: history never points at unseen content.
            let mut effects = Vec::with_capacity(3);
            effects.push(Effect::ApplyPage { ticket, page });
            if active.push_history {
                effects.push(Effect::PushHistory {
                    state: HistoryState::for_url(&active.url),
                    url: active.url,
                });
            }
            effects.push(Effect::ScrollToTop);
            effects
        }
        Msg::PageApplied { ticket } => {
            let Some(active) = state.active_for(ticket) else {
                return (state, Vec::new());
            };
            let route = state.normalize(active.url.path());
            state.set_phase(NavPhase::Initializing);
            vec![Effect::RunPageSetup {
                ticket: Some(ticket),
                route,
            }]
        }
        Msg::SetupFinished { ticket } => {
            if state.active_for(ticket).is_none() {
                return (state, Vec::new());
            }
            state.finish();
            state.set_phase(NavPhase::Idle);
            vec![Effect::ClearTransitioning]
        }
        Msg::NavigationFailed { ticket, failure } => {
            let Some(active) = state.active_for(ticket).cloned() else {
                return (state, Vec::new());
            };
            state.finish();
            state.set_phase(NavPhase::HardFallback);
            vec![
                Effect::HardNavigate {
                    url: active.url,
                    failure,
                },
                Effect::ClearTransitioning,
            ]
        }
    };

    (state, effects)
}
