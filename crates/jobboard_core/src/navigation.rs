use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub url: Url,
    /// `false` when replaying a back/forward step.
    pub push_history: bool,
}

impl NavigationRequest {
    pub fn push(url: Url) -> Self {
        Self {
            url,
            push_history: true,
        }
    }

    pub fn replay(url: Url) -> Self {
        Self {
            url,
            push_history: false,
        }
    }
}

/// The fragment of a fetched page transferred onto the live document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    pub title: Option<String>,
    pub body_class: String,
    pub content_html: String,
}

/// Why an in-app navigation was abandoned for a full page load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationFailure {
    #[error("content container {selector} is missing from the live page")]
    MissingContainer { selector: String },
    #[error("request for {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("request for {url} returned http status {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("{url} is not a usable page: {message}")]
    Parse { url: String, message: String },
    #[error("page setup for {route} failed: {message}")]
    Setup { route: String, message: String },
}
