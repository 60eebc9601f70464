use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::fetch::map_reqwest_error;
use crate::FetchSettings;

/// Port the REST backend listens on when no base URL is injected.
pub const DEFAULT_API_PORT: u16 = 8000;
const FALLBACK_HOST: &str = "127.0.0.1";
const GENERIC_DETAIL: &str = "Request failed.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("invalid api base {base}: {message}")]
    InvalidBase { base: String, message: String },
    /// The backend answered with an error status; `detail` is shown as is.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
    #[error("api request failed: {0}")]
    Transport(String),
    #[error("unexpected api response: {0}")]
    Decode(String),
}

/// Resolves the REST API base: an injected value wins, otherwise the page's
/// host on [`DEFAULT_API_PORT`], over http unless the page itself is https.
pub fn resolve_api_base(injected: Option<&str>, page: &Url) -> Result<Url, ApiError> {
    if let Some(base) = injected.map(str::trim).filter(|b| !b.is_empty()) {
        return Url::parse(base).map_err(|err| ApiError::InvalidBase {
            base: base.to_string(),
            message: err.to_string(),
        });
    }

    let scheme = if page.scheme().starts_with("http") {
        page.scheme()
    } else {
        "http"
    };
    let host = page
        .host_str()
        .filter(|h| !h.is_empty())
        .unwrap_or(FALLBACK_HOST);
    let base = format!("{scheme}://{host}:{DEFAULT_API_PORT}");
    Url::parse(&base).map_err(|err| ApiError::InvalidBase {
        base,
        message: err.to_string(),
    })
}

/// Reads the `detail` field of an error body: a string is returned as is, an
/// array is joined with `", "`.
pub fn extract_detail(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        Value::Array(items) if !items.is_empty() => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(text) => text.clone(),
                    Value::Object(map) => map
                        .get("msg")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| item.to_string()),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
}

/// A salary bound; the backend sends decimals either as numbers or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    pub(crate) fn is_set(&self) -> bool {
        match self {
            Amount::Number(n) => *n != 0.0,
            Amount::Text(t) => !t.is_empty(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{n}"),
            Amount::Text(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advertisement {
    pub ad_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_min: Option<Amount>,
    #[serde(default)]
    pub salary_max: Option<Amount>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub company_id: Option<i64>,
}

impl Advertisement {
    /// `"{min} - {max} €"` when both bounds are set.
    pub fn salary_range(&self) -> Option<String> {
        match (&self.salary_min, &self.salary_max) {
            (Some(min), Some(max)) if min.is_set() && max.is_set() => {
                Some(format!("{min} - {max} €"))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationForm {
    pub ad_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub person_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

/// Source of job advertisements for the listing page.
#[async_trait::async_trait]
pub trait AdvertisementSource: Send + Sync {
    async fn advertisements(&self) -> Result<Vec<Advertisement>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base: Url, settings: &FetchSettings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self { base, http })
    }

    pub async fn advertisement(&self, ad_id: i64) -> Result<Advertisement, ApiError> {
        let url = self.endpoint(&format!("/advertisements/{ad_id}"))?;
        let response = self.http.get(url).send().await.map_err(transport)?;
        read_json(response).await
    }

    pub async fn submit_application(&self, form: &ApplicationForm) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint("/applications")?;
        let response = self
            .http
            .post(url)
            .json(form)
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }

    /// Appends `path` to the base verbatim, so a base with a path prefix keeps it.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!("{}{}", self.base.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|err| ApiError::InvalidBase {
            base: joined,
            message: err.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl AdvertisementSource for ApiClient {
    async fn advertisements(&self) -> Result<Vec<Advertisement>, ApiError> {
        let url = self.endpoint("/advertisements")?;
        let response = self.http.get(url).send().await.map_err(transport)?;
        read_json(response).await
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(map_reqwest_error(err).to_string())
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(transport)?;

    if !status.is_success() {
        let detail = serde_json::from_slice::<Value>(&body)
            .ok()
            .as_ref()
            .and_then(extract_detail)
            .unwrap_or_else(|| GENERIC_DETAIL.to_string());
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn page(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn injected_base_wins() {
        let base = resolve_api_base(
            Some("https://api.example.com/v1"),
            &page("http://localhost:5500/jobs.html"),
        )
        .unwrap();
        assert_eq!(base.as_str(), "https://api.example.com/v1");
    }

    #[test]
    fn base_is_derived_from_page_host() {
        let base = resolve_api_base(None, &page("https://board.example.com/jobs.html")).unwrap();
        assert_eq!(base.as_str(), "https://board.example.com:8000/");

        let base = resolve_api_base(Some("  "), &page("http://localhost:5500/")).unwrap();
        assert_eq!(base.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn non_http_pages_use_http_on_loopback() {
        let base = resolve_api_base(None, &page("file:///srv/front/jobs.html")).unwrap();
        assert_eq!(base.as_str(), "http://127.0.0.1:8000/");
    }

    #[test]
    fn detail_string_and_array_are_extracted() {
        assert_eq!(
            extract_detail(&json!({"detail": "Email already used"})).as_deref(),
            Some("Email already used")
        );
        assert_eq!(
            extract_detail(&json!({"detail": ["name missing", "email missing"]})).as_deref(),
            Some("name missing, email missing")
        );
        assert_eq!(
            extract_detail(&json!({"detail": [{"msg": "field required", "loc": ["body"]}]}))
                .as_deref(),
            Some("field required")
        );
        assert_eq!(extract_detail(&json!({"message": "ok"})), None);
        assert_eq!(extract_detail(&json!({"detail": ""})), None);
    }

    #[test]
    fn salary_range_needs_both_bounds() {
        let mut ad: Advertisement = serde_json::from_value(json!({
            "ad_id": 3,
            "title": "Rust developer",
            "salary_min": 42000,
            "salary_max": "55000.00"
        }))
        .unwrap();
        assert_eq!(ad.salary_range().as_deref(), Some("42000 - 55000.00 €"));

        ad.salary_min = Some(Amount::Number(0.0));
        assert_eq!(ad.salary_range(), None);
        ad.salary_min = None;
        assert_eq!(ad.salary_range(), None);
    }
}
