use std::sync::{Arc, Mutex, PoisonError};

use jobboard_core::{
    update, Effect, LoadedPage, Msg, NavTicket, NavigationFailure, NavigationRequest,
    RouterConfig, RouterState, RouterView,
};
use jobboard_logging::{nav_debug, nav_info, nav_warn};
use url::Url;

use crate::{
    decode_page, ContentExtractor, ExtractError, NavigationOutcome, PageFetcher, PageHost,
    PageSetupRegistry, SetupReport,
};

/// What a batch of effects left for the navigator to do next.
enum Step {
    Fetch { ticket: NavTicket, url: Url },
    Swapped { ticket: NavTicket },
    Setup { ticket: NavTicket, route: String },
    Finished,
    FellBack { url: Url, failure: NavigationFailure },
    Discarded,
}

/// Loads pages in-app: fetch, swap the content container, record history and
/// re-run page setup. Any failure ends in a full browser navigation.
pub struct Navigator {
    host: Arc<dyn PageHost>,
    fetcher: Arc<dyn PageFetcher>,
    extractor: ContentExtractor,
    registry: PageSetupRegistry,
    state: Mutex<RouterState>,
}

impl Navigator {
    pub fn new(
        config: RouterConfig,
        host: Arc<dyn PageHost>,
        fetcher: Arc<dyn PageFetcher>,
        registry: PageSetupRegistry,
    ) -> Result<Self, ExtractError> {
        let extractor = ContentExtractor::new(&config.content_selector)?;
        Ok(Self {
            host,
            fetcher,
            extractor,
            registry,
            state: Mutex::new(RouterState::with_config(config)),
        })
    }

    pub fn host(&self) -> &dyn PageHost {
        self.host.as_ref()
    }

    pub fn registry(&self) -> &PageSetupRegistry {
        &self.registry
    }

    pub fn view(&self) -> RouterView {
        self.lock_state().view()
    }

    pub(crate) fn config(&self) -> RouterConfig {
        self.lock_state().config().clone()
    }

    pub(crate) fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        let mut guard = self.lock_state();
        let state = std::mem::take(&mut *guard);
        let (state, effects) = update(state, msg);
        *guard = state;
        effects
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Navigates to `request.url`; see [`NavigationOutcome`] for how it ends.
    pub async fn navigate(&self, request: NavigationRequest) -> NavigationOutcome {
        let selector = self.config().content_selector;
        let has_container = self.host.has_element(&selector);
        nav_debug!(
            "Navigating to {} (push history: {})",
            request.url,
            request.push_history
        );

        let mut effects = self.dispatch(Msg::NavigationRequested {
            request,
            has_container,
        });
        let mut setup_report = SetupReport::Unmatched;

        loop {
            let msg = match self.apply(effects) {
                Step::Fetch { ticket, url } => match self.load(&url).await {
                    Ok(page) => Msg::PageLoaded { ticket, page },
                    Err(failure) => Msg::NavigationFailed { ticket, failure },
                },
                Step::Swapped { ticket } => Msg::PageApplied { ticket },
                Step::Setup { ticket, route } => {
                    match self.registry.run_page_setup(&route, self.host.as_ref()).await {
                        Ok(report) => {
                            setup_report = report;
                            Msg::SetupFinished { ticket }
                        }
                        Err(err) => Msg::NavigationFailed {
                            ticket,
                            failure: NavigationFailure::Setup {
                                route,
                                message: err.to_string(),
                            },
                        },
                    }
                }
                Step::Finished => {
                    let route = self.view().current_route.unwrap_or_default();
                    nav_info!("Navigated to {}", route);
                    return NavigationOutcome::Completed {
                        route,
                        setup: setup_report,
                    };
                }
                Step::FellBack { url, failure } => {
                    return NavigationOutcome::HardFallback { url, failure };
                }
                Step::Discarded => {
                    nav_debug!("Navigation superseded by a newer one");
                    return NavigationOutcome::Superseded;
                }
            };
            effects = self.dispatch(msg);
        }
    }

    /// Carries out the synchronous effects and reports the pending async work.
    fn apply(&self, effects: Vec<Effect>) -> Step {
        let config = self.config();
        let selector = config.content_selector.as_str();
        let mut step = None;

        for effect in effects {
            match effect {
                Effect::MarkTransitioning => {
                    self.host.add_class(selector, &config.transition_class);
                }
                Effect::FetchPage { ticket, url } => {
                    step = Some(Step::Fetch { ticket, url });
                }
                Effect::ApplyPage { ticket, page } => {
                    self.swap(selector, page);
                    step = Some(Step::Swapped { ticket });
                }
                Effect::PushHistory { state, url } => self.host.push_state(&state, &url),
                Effect::ScrollToTop => self.host.scroll_to_top(),
                Effect::RunPageSetup {
                    ticket: Some(ticket),
                    route,
                } => {
                    step = Some(Step::Setup { ticket, route });
                }
                Effect::HardNavigate { url, failure } => {
                    nav_warn!("Falling back to full navigation to {}: {}", url, failure);
                    self.host.assign_location(&url);
                    step = Some(Step::FellBack { url, failure });
                }
                Effect::ClearTransitioning => {
                    self.host.remove_class(selector, &config.transition_class);
                    if step.is_none() {
                        step = Some(Step::Finished);
                    }
                }
                Effect::RunPageSetup { ticket: None, .. }
                | Effect::ReplaceHistory { .. }
                | Effect::PreventDefault
                | Effect::Navigate(_) => {
                    nav_debug!("Navigator ignoring router-level effect {:?}", effect);
                }
            }
        }

        step.unwrap_or(Step::Discarded)
    }

    fn swap(&self, selector: &str, page: LoadedPage) {
        if let Some(title) = page.title.as_deref().filter(|t| !t.is_empty()) {
            self.host.set_title(title);
        }
        self.host.set_body_class(&page.body_class);
        self.host.set_inner_html(selector, &page.content_html);
    }

    async fn load(&self, url: &Url) -> Result<LoadedPage, NavigationFailure> {
        let output = self
            .fetcher
            .fetch_page(url)
            .await
            .map_err(|err| err.into_failure(url))?;
        let parse_failure = |message: String| NavigationFailure::Parse {
            url: url.to_string(),
            message,
        };
        let html = decode_page(&output.bytes, output.metadata.content_type.as_deref())
            .map_err(|err| parse_failure(err.to_string()))?;
        self.extractor
            .extract(&html)
            .map_err(|err| parse_failure(err.to_string()))
    }
}
