//! Headless browser shell: drives the router through a scripted session.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use jobboard_core::{Anchor, ClickEvent};
use jobboard_engine::{
    decode_page, resolve_api_base, ApiClient, HeadlessPage, JobsPage, LoadedScriptSet,
    NavigationOutcome, Navigator, PageFetcher, PageHost, PageSetupRegistry, ReqwestFetcher,
    Router,
};
use jobboard_logging::{nav_debug, nav_error, nav_info};
use url::Url;

use crate::config::AppConfig;

/// One scripted user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Plain left click on a link with this `href`.
    Click(String),
    Back,
    Forward,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "" => Err("empty step".to_string()),
            "back" => Ok(Step::Back),
            "forward" => Ok(Step::Forward),
            href => Ok(Step::Click(href.to_string())),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Click(href) => write!(f, "click {href}"),
            Step::Back => f.write_str("back"),
            Step::Forward => f.write_str("forward"),
        }
    }
}

/// Page state printed after each step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub url: Url,
    pub route: String,
    pub title: String,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.url, self.route, self.title)
    }
}

pub struct Shell {
    config: AppConfig,
    fetcher: Arc<ReqwestFetcher>,
    page: Arc<HeadlessPage>,
    router: Router,
}

impl Shell {
    /// Loads `start` in full and installs the router on it.
    pub async fn open(config: AppConfig, start: Url) -> anyhow::Result<Self> {
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch_settings()));
        let html = load_document(fetcher.as_ref(), &start)
            .await
            .with_context(|| format!("failed to load start page {start}"))?;
        let page = Arc::new(HeadlessPage::from_document(
            start,
            &html,
            &config.router.content_selector,
        ));
        let router = build_router(&config, &page, &fetcher)?;
        let shell = Self {
            config,
            fetcher,
            page,
            router,
        };
        shell.install().await;
        Ok(shell)
    }

    /// Installs the current router. A failing page setup leaves the page
    /// usable, as it does in the browser.
    async fn install(&self) {
        match self.router.install().await {
            Ok(report) => nav_debug!("Installed on {}: {:?}", self.page.location(), report),
            Err(err) => nav_debug!("Continuing without page setup: {}", err),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            url: self.page.location(),
            route: self
                .router
                .navigator()
                .view()
                .current_route
                .unwrap_or_default(),
            title: self.page.title(),
        }
    }

    pub async fn run(&mut self, step: &Step) -> anyhow::Result<Snapshot> {
        nav_info!("Step: {}", step);
        match step {
            Step::Click(href) => self.click(href).await?,
            Step::Back => {
                if let Some(entry) = self.page.back() {
                    let outcome = self.router.handle_popstate(entry.state).await;
                    self.settle(outcome).await?;
                }
            }
            Step::Forward => {
                if let Some(entry) = self.page.forward() {
                    let outcome = self.router.handle_popstate(entry.state).await;
                    self.settle(outcome).await?;
                }
            }
        }
        Ok(self.snapshot())
    }

    async fn click(&mut self, href: &str) -> anyhow::Result<()> {
        let (handling, outcome) = self
            .router
            .handle_click(&ClickEvent::on_anchor(Anchor::new(href)))
            .await;
        match outcome {
            Some(outcome) => self.settle(outcome).await,
            None if handling.prevent_default => Ok(()),
            None => {
                let target = self
                    .page
                    .location()
                    .join(href)
                    .with_context(|| format!("cannot resolve link {href}"))?;
                self.full_load(target).await
            }
        }
    }

    async fn settle(&mut self, outcome: NavigationOutcome) -> anyhow::Result<()> {
        match outcome {
            NavigationOutcome::HardFallback { url, .. } => self.full_load(url).await,
            NavigationOutcome::Completed { .. } | NavigationOutcome::Superseded => Ok(()),
        }
    }

    /// What the browser does after `location.assign`: a fresh document, a
    /// new history entry, no scripts, and the router installed again.
    async fn full_load(&mut self, url: Url) -> anyhow::Result<()> {
        let html = match load_document(self.fetcher.as_ref(), &url).await {
            Ok(html) => html,
            Err(err) => {
                nav_error!("Full load of {} failed: {:#}", url, err);
                String::new()
            }
        };
        self.page.load_document(url, &html);
        self.router = build_router(&self.config, &self.page, &self.fetcher)?;
        self.install().await;
        Ok(())
    }
}

fn build_router(
    config: &AppConfig,
    page: &Arc<HeadlessPage>,
    fetcher: &Arc<ReqwestFetcher>,
) -> anyhow::Result<Router> {
    let api_base = resolve_api_base(config.api_base.as_deref(), &page.location())?;
    let client = ApiClient::new(api_base, &config.fetch_settings())?;
    let jobs = JobsPage::new(Arc::new(client)).with_static_jobs(config.static_jobs.clone());
    let registry =
        PageSetupRegistry::new(page.clone(), LoadedScriptSet::new()).register(jobs.into_setup());
    let navigator = Navigator::new(
        config.router.clone(),
        page.clone(),
        fetcher.clone(),
        registry,
    )?;
    Ok(Router::new(navigator))
}

async fn load_document(fetcher: &dyn PageFetcher, url: &Url) -> anyhow::Result<String> {
    let output = fetcher.fetch_page(url).await?;
    let html = decode_page(&output.bytes, output.metadata.content_type.as_deref())?;
    Ok(html)
}
