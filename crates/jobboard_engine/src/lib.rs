//! Jobboard engine: page fetching, content swapping and per-page setup for
//! the in-app router.
mod api;
mod decode;
mod extract;
mod fetch;
mod headless;
mod host;
mod jobs;
mod navigator;
mod router;
mod scripts;
mod setup;
mod types;

pub use api::{
    extract_detail, resolve_api_base, AdvertisementSource, Advertisement, Amount, ApiClient,
    ApiError, ApiMessage, ApplicationForm, DEFAULT_API_PORT,
};
pub use decode::{decode_page, DecodeError};
pub use extract::{ContentExtractor, ExtractError};
pub use fetch::{FetchSettings, PageFetcher, ReqwestFetcher, IN_APP_HEADER, IN_APP_HEADER_VALUE};
pub use headless::{HeadlessPage, HistoryEntry};
pub use host::PageHost;
pub use jobs::{
    render_job_cards, JobCard, JobsPage, StaticJob, JOBS_PAGE_SUFFIX, JOBS_SCRIPT,
    JOB_LIST_SELECTOR,
};
pub use navigator::Navigator;
pub use router::{ClickHandling, Router};
pub use scripts::{LoadedScriptSet, ScriptError, ScriptLoader};
pub use setup::{PageInitializer, PageSetup, PageSetupRegistry, SetupError, SetupReport};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, NavigationOutcome};
