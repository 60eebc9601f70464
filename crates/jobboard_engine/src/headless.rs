use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use jobboard_core::HistoryState;
use scraper::{Html, Selector};
use url::Url;

use crate::{PageHost, ScriptError, ScriptLoader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub state: Option<HistoryState>,
    pub url: Url,
}

#[derive(Debug, Default)]
struct Container {
    inner_html: String,
    classes: BTreeSet<String>,
}

#[derive(Debug)]
struct PageModel {
    location: Url,
    title: String,
    body_class: String,
    container: Option<Container>,
    /// Markup written into elements nested in the container.
    regions: BTreeMap<String, String>,
    history: Vec<HistoryEntry>,
    cursor: usize,
    scroll_resets: usize,
    full_loads: Vec<Url>,
    scripts: Vec<String>,
    broken_scripts: BTreeSet<String>,
}

/// In-memory stand-in for a browser window.
///
/// Keeps just enough of a document for the router: title, body class, the
/// content container and markup rendered inside it, the history stack and a
/// record of full page loads and injected scripts.
#[derive(Debug)]
pub struct HeadlessPage {
    content_selector: String,
    model: Mutex<PageModel>,
}

impl HeadlessPage {
    /// Blank page at `location` with an empty content container.
    pub fn new(location: Url, content_selector: &str) -> Self {
        Self::build(location, content_selector, Some(Container::default()))
    }

    /// Page at `location` that lacks the content container.
    pub fn without_container(location: Url, content_selector: &str) -> Self {
        Self::build(location, content_selector, None)
    }

    /// Page at `location` initialized from a full HTML document.
    pub fn from_document(location: Url, html: &str, content_selector: &str) -> Self {
        let page = Self::build(location, content_selector, None);
        page.replace_document(html);
        page
    }

    fn build(location: Url, content_selector: &str, container: Option<Container>) -> Self {
        let model = PageModel {
            history: vec![HistoryEntry {
                state: None,
                url: location.clone(),
            }],
            location,
            title: String::new(),
            body_class: String::new(),
            container,
            regions: BTreeMap::new(),
            cursor: 0,
            scroll_resets: 0,
            full_loads: Vec::new(),
            scripts: Vec::new(),
            broken_scripts: BTreeSet::new(),
        };
        Self {
            content_selector: content_selector.to_string(),
            model: Mutex::new(model),
        }
    }

    pub fn with_content(self, html: &str) -> Self {
        self.set_inner_html(&self.content_selector.clone(), html);
        self
    }

    /// Makes every later load of `src` fail.
    pub fn with_broken_script(self, src: &str) -> Self {
        self.lock().broken_scripts.insert(src.to_string());
        self
    }

    /// Emulates the browser finishing a full load of `url`: the document is
    /// replaced and a new history entry without router state is created.
    pub fn load_document(&self, url: Url, html: &str) {
        {
            let mut model = self.lock();
            let keep = model.cursor + 1;
            model.history.truncate(keep);
            model.history.push(HistoryEntry {
                state: None,
                url: url.clone(),
            });
            model.cursor = model.history.len() - 1;
            model.location = url;
            model.scripts.clear();
        }
        self.replace_document(html);
    }

    fn replace_document(&self, html: &str) {
        let doc = Html::parse_document(html);
        let title = Selector::parse("title")
            .ok()
            .and_then(|sel| doc.select(&sel).next().map(|t| t.text().collect::<String>()))
            .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default();
        let body_class = Selector::parse("body")
            .ok()
            .and_then(|sel| doc.select(&sel).next())
            .and_then(|body| body.value().attr("class").map(str::to_string))
            .unwrap_or_default();
        let container = Selector::parse(&self.content_selector)
            .ok()
            .and_then(|sel| doc.select(&sel).next())
            .map(|node| Container {
                inner_html: node.inner_html(),
                classes: BTreeSet::new(),
            });

        let mut model = self.lock();
        model.title = title;
        model.body_class = body_class;
        model.container = container;
        model.regions.clear();
    }

    /// Steps back in history, like the browser back button. Returns the entry
    /// now current; the caller forwards its state to the popstate handler.
    pub fn back(&self) -> Option<HistoryEntry> {
        let mut model = self.lock();
        if model.cursor == 0 {
            return None;
        }
        model.cursor -= 1;
        let entry = model.history[model.cursor].clone();
        model.location = entry.url.clone();
        Some(entry)
    }

    pub fn forward(&self) -> Option<HistoryEntry> {
        let mut model = self.lock();
        if model.cursor + 1 >= model.history.len() {
            return None;
        }
        model.cursor += 1;
        let entry = model.history[model.cursor].clone();
        model.location = entry.url.clone();
        Some(entry)
    }

    pub fn content_html(&self) -> Option<String> {
        self.lock()
            .container
            .as_ref()
            .map(|c| c.inner_html.clone())
    }

    pub fn body_class(&self) -> String {
        self.lock().body_class.clone()
    }

    pub fn container_classes(&self) -> Vec<String> {
        self.lock()
            .container
            .as_ref()
            .map(|c| c.classes.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Markup last written into a nested element.
    pub fn region(&self, selector: &str) -> Option<String> {
        self.lock().regions.get(selector).cloned()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.lock().history.clone()
    }

    pub fn history_len(&self) -> usize {
        self.lock().history.len()
    }

    pub fn current_entry(&self) -> HistoryEntry {
        let model = self.lock();
        model.history[model.cursor].clone()
    }

    pub fn scroll_resets(&self) -> usize {
        self.lock().scroll_resets
    }

    /// Every URL the page asked the browser to load in full.
    pub fn full_loads(&self) -> Vec<Url> {
        self.lock().full_loads.clone()
    }

    pub fn injected_scripts(&self) -> Vec<String> {
        self.lock().scripts.clone()
    }

    fn lock(&self) -> MutexGuard<'_, PageModel> {
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn contains_nested(model: &PageModel, selector: &str) -> bool {
        let Some(container) = model.container.as_ref() else {
            return false;
        };
        if model.regions.contains_key(selector) {
            return true;
        }
        let Ok(sel) = Selector::parse(selector) else {
            return false;
        };
        let fragment = Html::parse_fragment(&container.inner_html);
        let found = fragment.select(&sel).next().is_some();
        found
    }
}

impl PageHost for HeadlessPage {
    fn location(&self) -> Url {
        self.lock().location.clone()
    }

    fn has_element(&self, selector: &str) -> bool {
        let model = self.lock();
        if selector == self.content_selector {
            return model.container.is_some();
        }
        Self::contains_nested(&model, selector)
    }

    fn title(&self) -> String {
        self.lock().title.clone()
    }

    fn set_title(&self, title: &str) {
        self.lock().title = title.to_string();
    }

    fn set_body_class(&self, class: &str) {
        self.lock().body_class = class.to_string();
    }

    fn add_class(&self, selector: &str, class: &str) {
        if selector != self.content_selector {
            return;
        }
        if let Some(container) = self.lock().container.as_mut() {
            container.classes.insert(class.to_string());
        }
    }

    fn remove_class(&self, selector: &str, class: &str) {
        if selector != self.content_selector {
            return;
        }
        if let Some(container) = self.lock().container.as_mut() {
            container.classes.remove(class);
        }
    }

    fn set_inner_html(&self, selector: &str, html: &str) -> bool {
        let mut model = self.lock();
        if selector == self.content_selector {
            let Some(container) = model.container.as_mut() else {
                return false;
            };
            container.inner_html = html.to_string();
            model.regions.clear();
            return true;
        }
        if !Self::contains_nested(&model, selector) {
            return false;
        }
        model.regions.insert(selector.to_string(), html.to_string());
        true
    }

    fn push_state(&self, state: &HistoryState, url: &Url) {
        let mut model = self.lock();
        let keep = model.cursor + 1;
        model.history.truncate(keep);
        model.history.push(HistoryEntry {
            state: Some(state.clone()),
            url: url.clone(),
        });
        model.cursor = model.history.len() - 1;
        model.location = url.clone();
    }

    fn replace_state(&self, state: &HistoryState, url: &Url) {
        let mut model = self.lock();
        let cursor = model.cursor;
        model.history[cursor] = HistoryEntry {
            state: Some(state.clone()),
            url: url.clone(),
        };
        model.location = url.clone();
    }

    fn scroll_to_top(&self) {
        self.lock().scroll_resets += 1;
    }

    fn assign_location(&self, url: &Url) {
        self.lock().full_loads.push(url.clone());
    }
}

#[async_trait::async_trait]
impl ScriptLoader for HeadlessPage {
    async fn load(&self, src: &str) -> Result<(), ScriptError> {
        let mut model = self.lock();
        if model.broken_scripts.contains(src) {
            return Err(ScriptError::LoadFailed {
                src: src.to_string(),
            });
        }
        model.scripts.push(src.to_string());
        Ok(())
    }
}
