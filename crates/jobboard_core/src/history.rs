use serde::{Deserialize, Serialize};
use url::Url;

/// State object stored with every history entry the router creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub url: String,
}

impl HistoryState {
    /// Records the pathname of `url`.
    pub fn for_url(url: &Url) -> Self {
        Self {
            url: url.path().to_string(),
        }
    }
}

/// Resolves where a back/forward step should land.
///
/// The stored `url` is resolved against the origin of `location`; entries
/// without router state (created before the router was installed, or by an
/// external navigation) fall back to `location` itself.
pub fn popstate_target(state: Option<&HistoryState>, location: &Url) -> Url {
    let stored = state.map(|s| s.url.as_str()).filter(|u| !u.is_empty());
    let Some(stored) = stored else {
        return location.clone();
    };

    let mut origin = location.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    origin.join(stored).unwrap_or_else(|_| location.clone())
}
