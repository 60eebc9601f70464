use jobboard_core::LoadedPage;
use scraper::{Html, Selector};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid content selector {selector}: {message}")]
    InvalidSelector { selector: String, message: String },
    #[error("no element matching {selector} in the fetched document")]
    MissingContainer { selector: String },
}

/// Pulls the content container, title and body class out of a page document.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    selector_text: String,
    container: Selector,
    title: Option<Selector>,
    body: Option<Selector>,
}

impl ContentExtractor {
    pub fn new(selector: &str) -> Result<Self, ExtractError> {
        let container = Selector::parse(selector).map_err(|err| ExtractError::InvalidSelector {
            selector: selector.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            selector_text: selector.to_string(),
            container,
            title: Selector::parse("title").ok(),
            body: Selector::parse("body").ok(),
        })
    }

    pub fn extract(&self, html: &str) -> Result<LoadedPage, ExtractError> {
        let doc = Html::parse_document(html);
        let container = doc
            .select(&self.container)
            .next()
            .ok_or_else(|| ExtractError::MissingContainer {
                selector: self.selector_text.clone(),
            })?;

        let title = self
            .title
            .as_ref()
            .and_then(|sel| doc.select(sel).next())
            .map(|node| collapse_whitespace(&node.text().collect::<String>()))
            .filter(|title| !title.is_empty());

        let body_class = self
            .body
            .as_ref()
            .and_then(|sel| doc.select(sel).next())
            .and_then(|body| body.value().attr("class"))
            .unwrap_or_default()
            .to_string();

        Ok(LoadedPage {
            title,
            body_class,
            content_html: container.inner_html(),
        })
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_container_title_and_body_class() {
        let html = r#"<html><head><title>
            Sign   in </title></head><body class="bg-gray-50 min-h-screen">
            <header>nav</header><main id="page-content"><form id="login"></form></main></body></html>"#;
        let page = ContentExtractor::new("#page-content")
            .unwrap()
            .extract(html)
            .unwrap();

        assert_eq!(page.title.as_deref(), Some("Sign in"));
        assert_eq!(page.body_class, "bg-gray-50 min-h-screen");
        assert_eq!(page.content_html, r#"<form id="login"></form>"#);
    }

    #[test]
    fn blank_title_and_missing_class_are_empty() {
        let html = r#"<html><head><title> </title></head><body><div id="page-content"></div></body></html>"#;
        let page = ContentExtractor::new("#page-content")
            .unwrap()
            .extract(html)
            .unwrap();

        assert_eq!(page.title, None);
        assert_eq!(page.body_class, "");
        assert_eq!(page.content_html, "");
    }

    #[test]
    fn missing_container_is_reported() {
        let err = ContentExtractor::new("#page-content")
            .unwrap()
            .extract("<html><body><p>plain</p></body></html>")
            .unwrap_err();
        assert_eq!(
            err,
            ExtractError::MissingContainer {
                selector: "#page-content".to_string()
            }
        );
    }

    #[test]
    fn invalid_selector_is_rejected() {
        assert!(matches!(
            ContentExtractor::new("##"),
            Err(ExtractError::InvalidSelector { .. })
        ));
    }
}
