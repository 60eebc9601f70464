use jobboard_core::HistoryState;
use url::Url;

/// The live document and window the router drives.
///
/// Methods take `&self`: implementations wrap a DOM, which is mutated through
/// shared handles.
pub trait PageHost: Send + Sync {
    /// Current address of the window.
    fn location(&self) -> Url;

    fn has_element(&self, selector: &str) -> bool;

    fn title(&self) -> String;
    fn set_title(&self, title: &str);
    fn set_body_class(&self, class: &str);

    fn add_class(&self, selector: &str, class: &str);
    fn remove_class(&self, selector: &str, class: &str);

    /// Replaces the inner markup of the first element matching `selector`.
    /// Returns `false` when no element matches.
    fn set_inner_html(&self, selector: &str, html: &str) -> bool;

    fn push_state(&self, state: &HistoryState, url: &Url);
    fn replace_state(&self, state: &HistoryState, url: &Url);

    fn scroll_to_top(&self);

    /// Full browser navigation; the current document is discarded.
    fn assign_location(&self, url: &Url);
}
