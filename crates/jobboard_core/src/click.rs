use url::Url;

use crate::path::is_page_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.meta || self.ctrl || self.shift || self.alt
    }
}

/// The nearest anchor ancestor of a click target, reduced to the attributes
/// the interceptor looks at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Anchor {
    /// Raw `href` attribute, unresolved.
    pub href: Option<String>,
    pub target: Option<String>,
    pub download: bool,
}

impl Anchor {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_download(mut self) -> Self {
        self.download = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub button: i16,
    pub modifiers: Modifiers,
    pub default_prevented: bool,
    pub anchor: Option<Anchor>,
}

impl ClickEvent {
    /// Plain left click on `anchor`.
    pub fn on_anchor(anchor: Anchor) -> Self {
        Self {
            button: 0,
            modifiers: Modifiers::default(),
            default_prevented: false,
            anchor: Some(anchor),
        }
    }

    /// Plain left click outside of any anchor.
    pub fn without_anchor() -> Self {
        Self {
            button: 0,
            modifiers: Modifiers::default(),
            default_prevented: false,
            anchor: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    AlreadyHandled,
    NotPrimaryClick,
    NoAnchor,
    MissingHref,
    FragmentLink,
    MailtoLink,
    TelLink,
    Download,
    NewBrowsingContext,
    Unresolvable,
    ExternalOrigin,
    NotAPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickDecision {
    /// Leave the event alone; the browser navigates normally.
    Ignore(IgnoreReason),
    /// Link to the current page: swallow the click without navigating.
    PreventOnly,
    /// Swallow the click and navigate in-app to the resolved URL.
    Navigate(Url),
}

impl ClickDecision {
    pub fn prevents_default(&self) -> bool {
        !matches!(self, ClickDecision::Ignore(_))
    }
}

/// Decides how a document-level click is handled, given the URL of the page
/// currently shown.
pub fn classify_click(click: &ClickEvent, current: &Url, page_extension: &str) -> ClickDecision {
    if click.default_prevented {
        return ClickDecision::Ignore(IgnoreReason::AlreadyHandled);
    }
    if click.button != 0 || click.modifiers.any() {
        return ClickDecision::Ignore(IgnoreReason::NotPrimaryClick);
    }

    let Some(anchor) = click.anchor.as_ref() else {
        return ClickDecision::Ignore(IgnoreReason::NoAnchor);
    };
    let href = match anchor.href.as_deref() {
        Some(href) if !href.is_empty() => href,
        _ => return ClickDecision::Ignore(IgnoreReason::MissingHref),
    };

    if href.starts_with('#') {
        return ClickDecision::Ignore(IgnoreReason::FragmentLink);
    }
    if href.starts_with("mailto:") {
        return ClickDecision::Ignore(IgnoreReason::MailtoLink);
    }
    if href.starts_with("tel:") {
        return ClickDecision::Ignore(IgnoreReason::TelLink);
    }
    if anchor.download {
        return ClickDecision::Ignore(IgnoreReason::Download);
    }
    if anchor.target.as_deref() == Some("_blank") {
        return ClickDecision::Ignore(IgnoreReason::NewBrowsingContext);
    }

    let Ok(target) = current.join(href) else {
        return ClickDecision::Ignore(IgnoreReason::Unresolvable);
    };
    if target.origin() != current.origin() {
        return ClickDecision::Ignore(IgnoreReason::ExternalOrigin);
    }
    if !is_page_path(target.path(), page_extension) {
        return ClickDecision::Ignore(IgnoreReason::NotAPage);
    }
    if target.path() == current.path() {
        return ClickDecision::PreventOnly;
    }

    ClickDecision::Navigate(target)
}
