use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use jobboard_core::RouterConfig;
use jobboard_engine::{FetchSettings, StaticJob};
use jobboard_logging::nav_info;
use serde::{Deserialize, Serialize};

use crate::logging::LogDestination;

pub const CONFIG_FILENAME: &str = ".jobboard.ron";

/// Settings for the headless shell, read from `.jobboard.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub start_url: String,
    /// Overrides the API base derived from the page host.
    pub api_base: Option<String>,
    pub router: RouterConfig,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Shown on the jobs page when the API has no advertisements.
    pub static_jobs: Vec<StaticJob>,
    pub log: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            start_url: "http://localhost:5500/index.html".to_string(),
            api_base: None,
            router: RouterConfig::default(),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            redirect_limit: fetch.redirect_limit,
            max_bytes: fetch.max_bytes,
            static_jobs: Vec::new(),
            log: LogDestination::default(),
        }
    }
}

impl AppConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            redirect_limit: self.redirect_limit,
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        }
    }
}

/// Reads the config file at `path`. A missing file yields the defaults; an
/// unreadable or malformed one is an error.
pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config from {:?}", path));
        }
    };

    let config = ron::from_str(&content)
        .with_context(|| format!("failed to parse config from {:?}", path))?;
    nav_info!("Loaded config from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.router.content_selector, "#page-content");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(
                api_base: Some("http://api.local:9000"),
                request_timeout_secs: 5,
                router: (transition_class: "fading"),
                static_jobs: [
                    (title: "Baker", description: "Early mornings", location: "Nantes", salary: "2000 €"),
                ],
                log: Both,
            )"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.api_base.as_deref(), Some("http://api.local:9000"));
        assert_eq!(config.router.transition_class, "fading");
        assert_eq!(config.router.content_selector, "#page-content");
        assert_eq!(config.static_jobs.len(), 1);
        assert_eq!(config.log, LogDestination::Both);

        let fetch = config.fetch_settings();
        assert_eq!(fetch.request_timeout, Duration::from_secs(5));
        assert_eq!(fetch.redirect_limit, 5);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "(start_url: 42").unwrap();
        assert!(load_config(&path).is_err());
    }
}
