//! Job-listing page behaviour: fills `#job-list` with advertisement cards.

use std::sync::Arc;

use jobboard_logging::{nav_debug, nav_warn};
use maud::html;
use serde::{Deserialize, Serialize};

use crate::{Advertisement, AdvertisementSource, PageHost, PageInitializer, PageSetup, SetupError};

pub const JOBS_PAGE_SUFFIX: &str = "jobs.html";
pub const JOBS_SCRIPT: &str = "js/jobs.js";
pub const JOB_LIST_SELECTOR: &str = "#job-list";

const EXCERPT_CHARS: usize = 100;
const NO_LOCATION: &str = "Location not specified";
const NO_SALARY: &str = "Salary not specified";

/// A job shown when the API has nothing to offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticJob {
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCard {
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: String,
    /// Set for cards backed by an API advertisement.
    pub ad_id: Option<i64>,
}

impl From<&Advertisement> for JobCard {
    fn from(ad: &Advertisement) -> Self {
        Self {
            title: ad.title.clone(),
            description: ad.description.clone().unwrap_or_default(),
            location: ad
                .location
                .clone()
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| NO_LOCATION.to_string()),
            salary: ad.salary_range().unwrap_or_else(|| NO_SALARY.to_string()),
            ad_id: Some(ad.ad_id),
        }
    }
}

impl From<&StaticJob> for JobCard {
    fn from(job: &StaticJob) -> Self {
        Self {
            title: job.title.clone(),
            description: job.description.clone(),
            location: job.location.clone(),
            salary: job.salary.clone(),
            ad_id: None,
        }
    }
}

fn excerpt(description: &str) -> String {
    let mut short: String = description.chars().take(EXCERPT_CHARS).collect();
    short.push_str("...");
    short
}

pub fn render_job_cards(cards: &[JobCard]) -> String {
    let markup = html! {
        @for card in cards {
            div class="bg-white p-6 rounded-lg shadow-md hover:shadow-lg transition"
                data-ad-id=(card.ad_id.map(|id| id.to_string()).unwrap_or_default())
                data-location=(card.location)
                data-salary=(card.salary) {
                h2 class="text-2xl font-bold text-[#0b1e35]" { (card.title) }
                p class="text-gray-600 mt-3" { (excerpt(&card.description)) }
                button type="button" data-action="job-details"
                    class="mt-5 bg-orange-500 hover:bg-orange-600 text-white px-4 py-2 rounded-full transition" {
                    "Learn more"
                }
            }
        }
    };
    markup.into_string()
}

pub struct JobsPage {
    source: Arc<dyn AdvertisementSource>,
    static_jobs: Vec<StaticJob>,
    preloaded: bool,
}

impl JobsPage {
    pub fn new(source: Arc<dyn AdvertisementSource>) -> Self {
        Self {
            source,
            static_jobs: Vec::new(),
            preloaded: false,
        }
    }

    pub fn with_static_jobs(mut self, jobs: Vec<StaticJob>) -> Self {
        self.static_jobs = jobs;
        self
    }

    /// The page script was part of the first document; never inject it.
    pub fn preloaded(mut self) -> Self {
        self.preloaded = true;
        self
    }

    /// Registry entry for the listing page.
    pub fn into_setup(self) -> PageSetup {
        PageSetup::new(JOBS_PAGE_SUFFIX, Arc::new(self)).with_script(JOBS_SCRIPT)
    }

    async fn cards(&self) -> Vec<JobCard> {
        match self.source.advertisements().await {
            Ok(ads) if !ads.is_empty() => return ads.iter().map(JobCard::from).collect(),
            Ok(_) => nav_debug!("No advertisements; showing static jobs"),
            Err(err) => nav_warn!("Loading advertisements failed, showing static jobs: {}", err),
        }
        self.static_jobs.iter().map(JobCard::from).collect()
    }
}

#[async_trait::async_trait]
impl PageInitializer for JobsPage {
    fn is_loaded(&self) -> bool {
        self.preloaded
    }

    async fn init(&self, host: &dyn PageHost) -> Result<(), SetupError> {
        if !host.has_element(JOB_LIST_SELECTOR) {
            nav_debug!("{} not on page; skipping job list", JOB_LIST_SELECTOR);
            return Ok(());
        }
        host.set_inner_html(JOB_LIST_SELECTOR, "");
        let cards = self.cards().await;
        host.set_inner_html(JOB_LIST_SELECTOR, &render_job_cards(&cards));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_cuts_on_characters_and_appends_ellipsis() {
        let long = "é".repeat(150);
        let short = excerpt(&long);
        assert_eq!(short.chars().count(), EXCERPT_CHARS + 3);
        assert!(short.ends_with("..."));
        assert_eq!(excerpt("Short"), "Short...");
    }

    #[test]
    fn card_markup_is_escaped() {
        let card = JobCard {
            title: "<script>alert(1)</script>".to_string(),
            description: "Fish & chips".to_string(),
            location: "Lyon".to_string(),
            salary: NO_SALARY.to_string(),
            ad_id: Some(9),
        };
        let html = render_job_cards(&[card]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Fish &amp; chips..."));
        assert!(html.contains(r#"data-ad-id="9""#));
        assert!(html.contains("Learn more"));
    }

    #[test]
    fn advertisement_cards_fill_missing_fields() {
        let ad = Advertisement {
            ad_id: 4,
            title: "Ops".to_string(),
            description: None,
            location: None,
            salary_min: None,
            salary_max: None,
            contract_type: None,
            company_id: None,
        };
        let card = JobCard::from(&ad);
        assert_eq!(card.location, NO_LOCATION);
        assert_eq!(card.salary, NO_SALARY);
        assert_eq!(card.description, "");
    }
}
