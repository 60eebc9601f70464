use serde::{Deserialize, Serialize};

use crate::path::{DEFAULT_PAGE, PAGE_EXTENSION};

/// Selector of the element whose inner markup is swapped on navigation.
pub const CONTENT_SELECTOR: &str = "#page-content";
/// Class added to the content container while a navigation is in flight.
pub const TRANSITION_CLASS: &str = "is-transitioning";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub content_selector: String,
    pub transition_class: String,
    pub page_extension: String,
    pub default_page: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            content_selector: CONTENT_SELECTOR.to_string(),
            transition_class: TRANSITION_CLASS.to_string(),
            page_extension: PAGE_EXTENSION.to_string(),
            default_page: DEFAULT_PAGE.to_string(),
        }
    }
}
