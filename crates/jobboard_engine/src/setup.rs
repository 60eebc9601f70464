use std::sync::Arc;

use futures_util::lock::Mutex;
use jobboard_core::strip_query;
use jobboard_logging::{nav_debug, nav_trace};

use crate::{LoadedScriptSet, PageHost, ScriptError, ScriptLoader};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("initializer for {page} failed: {message}")]
    Initializer { page: String, message: String },
}

/// Page-specific behaviour re-run every time its markup is swapped in.
#[async_trait::async_trait]
pub trait PageInitializer: Send + Sync {
    /// Whether the page behaviour is already available without injecting its
    /// script, e.g. because the script was rendered into the first document.
    fn is_loaded(&self) -> bool {
        false
    }

    async fn init(&self, host: &dyn PageHost) -> Result<(), SetupError>;
}

#[derive(Clone)]
pub struct PageSetup {
    /// Matched against the end of the normalized, query-less path.
    pub suffix: String,
    /// Behaviour script injected once before the first initialization.
    pub script: Option<String>,
    pub initializer: Arc<dyn PageInitializer>,
}

impl PageSetup {
    pub fn new(suffix: impl Into<String>, initializer: Arc<dyn PageInitializer>) -> Self {
        Self {
            suffix: suffix.into(),
            script: None,
            initializer,
        }
    }

    pub fn with_script(mut self, src: impl Into<String>) -> Self {
        self.script = Some(src.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupReport {
    /// No registered page matches; nothing ran.
    Unmatched,
    Initialized {
        suffix: String,
        script_injected: bool,
    },
}

pub struct PageSetupRegistry {
    entries: Vec<PageSetup>,
    scripts: LoadedScriptSet,
    loader: Arc<dyn ScriptLoader>,
    /// Held from the loaded-set check until the script is recorded.
    script_gate: Mutex<()>,
}

impl PageSetupRegistry {
    pub fn new(loader: Arc<dyn ScriptLoader>, scripts: LoadedScriptSet) -> Self {
        Self {
            entries: Vec::new(),
            scripts,
            loader,
            script_gate: Mutex::new(()),
        }
    }

    pub fn register(mut self, setup: PageSetup) -> Self {
        self.entries.push(setup);
        self
    }

    pub fn scripts(&self) -> &LoadedScriptSet {
        &self.scripts
    }

    /// Runs the setup registered for `pathname`, if any. The first matching
    /// entry wins.
    pub async fn run_page_setup(
        &self,
        pathname: &str,
        host: &dyn PageHost,
    ) -> Result<SetupReport, SetupError> {
        let clean = strip_query(pathname);
        let Some(setup) = self
            .entries
            .iter()
            .find(|entry| clean.ends_with(entry.suffix.as_str()))
        else {
            nav_trace!("No page setup for {}", clean);
            return Ok(SetupReport::Unmatched);
        };

        let script_injected = self.ensure_script(setup).await?;
        setup.initializer.init(host).await?;
        nav_debug!(
            "Page setup for {} done (script injected: {})",
            setup.suffix,
            script_injected
        );

        Ok(SetupReport::Initialized {
            suffix: setup.suffix.clone(),
            script_injected,
        })
    }

    async fn ensure_script(&self, setup: &PageSetup) -> Result<bool, ScriptError> {
        let Some(src) = setup.script.as_deref() else {
            return Ok(false);
        };
        if setup.initializer.is_loaded() {
            return Ok(false);
        }

        // Overlapping setups wait here; the later one then finds the script recorded.
        let _gate = self.script_gate.lock().await;
        if self.scripts.contains(src) {
            return Ok(false);
        }
        self.loader.load(src).await?;
        self.scripts.insert(src);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use url::Url;

    use super::*;
    use crate::HeadlessPage;

    #[derive(Default)]
    struct Counting {
        runs: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl PageInitializer for Counting {
        async fn init(&self, _host: &dyn PageHost) -> Result<(), SetupError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SetupError::Initializer {
                    page: "profile.html".to_string(),
                    message: "form missing".to_string(),
                });
            }
            Ok(())
        }
    }

    /// Records every load and takes a while to finish each one.
    #[derive(Default)]
    struct SlowLoader {
        loads: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl ScriptLoader for SlowLoader {
        async fn load(&self, src: &str) -> Result<(), ScriptError> {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            self.loads.lock().unwrap().push(src.to_string());
            Ok(())
        }
    }

    fn host() -> Arc<HeadlessPage> {
        Arc::new(HeadlessPage::new(
            Url::parse("http://localhost:5500/index.html").unwrap(),
            "#page-content",
        ))
    }

    #[tokio::test]
    async fn first_matching_suffix_wins_and_query_is_ignored() {
        let page = host();
        let specific = Arc::new(Counting::default());
        let generic = Arc::new(Counting::default());
        let registry = PageSetupRegistry::new(page.clone(), LoadedScriptSet::new())
            .register(PageSetup::new("admin-jobs.html", specific.clone()))
            .register(PageSetup::new("jobs.html", generic.clone()));

        let report = registry
            .run_page_setup("admin-jobs.html?tab=open", page.as_ref())
            .await
            .unwrap();

        assert_eq!(
            report,
            SetupReport::Initialized {
                suffix: "admin-jobs.html".to_string(),
                script_injected: false,
            }
        );
        assert_eq!(specific.runs.load(Ordering::SeqCst), 1);
        assert_eq!(generic.runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_page_runs_nothing() {
        let page = host();
        let registry = PageSetupRegistry::new(page.clone(), LoadedScriptSet::new())
            .register(PageSetup::new("jobs.html", Arc::new(Counting::default())));

        let report = registry.run_page_setup("about.html", page.as_ref()).await;
        assert_eq!(report, Ok(SetupReport::Unmatched));
    }

    #[tokio::test]
    async fn seeded_script_is_not_injected_again() {
        let page = host();
        let scripts = LoadedScriptSet::seeded(["js/profile.js"]);
        let registry = PageSetupRegistry::new(page.clone(), scripts)
            .register(
                PageSetup::new("profile.html", Arc::new(Counting::default()))
                    .with_script("js/profile.js"),
            );

        registry
            .run_page_setup("profile.html", page.as_ref())
            .await
            .unwrap();
        assert!(page.injected_scripts().is_empty());
    }

    #[tokio::test]
    async fn initializer_error_propagates_after_script_load() {
        let page = host();
        let failing = Arc::new(Counting {
            fail: true,
            ..Counting::default()
        });
        let registry = PageSetupRegistry::new(page.clone(), LoadedScriptSet::new()).register(
            PageSetup::new("profile.html", failing).with_script("js/profile.js"),
        );

        let err = registry
            .run_page_setup("profile.html", page.as_ref())
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::Initializer { .. }));
        assert_eq!(page.injected_scripts(), vec!["js/profile.js".to_string()]);
        assert!(registry.scripts().contains("js/profile.js"));
    }

    #[tokio::test]
    async fn overlapping_setups_inject_the_script_once() {
        let page = host();
        let loader = Arc::new(SlowLoader::default());
        let registry = PageSetupRegistry::new(loader.clone(), LoadedScriptSet::new()).register(
            PageSetup::new("jobs.html", Arc::new(Counting::default())).with_script("js/jobs.js"),
        );

        let (first, second) = tokio::join!(
            registry.run_page_setup("jobs.html", page.as_ref()),
            registry.run_page_setup("jobs.html?page=2", page.as_ref()),
        );

        let injected = [first.unwrap(), second.unwrap()]
            .into_iter()
            .filter(|report| {
                matches!(
                    report,
                    SetupReport::Initialized {
                        script_injected: true,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(injected, 1);
        assert_eq!(*loader.loads.lock().unwrap(), vec!["js/jobs.js".to_string()]);
        assert_eq!(registry.scripts().len(), 1);
    }

    #[tokio::test]
    async fn failed_load_is_not_recorded() {
        let page = Arc::new(
            HeadlessPage::new(
                Url::parse("http://localhost:5500/jobs.html").unwrap(),
                "#page-content",
            )
            .with_broken_script("js/jobs.js"),
        );
        let registry = PageSetupRegistry::new(page.clone(), LoadedScriptSet::new()).register(
            PageSetup::new("jobs.html", Arc::new(Counting::default())).with_script("js/jobs.js"),
        );

        let err = registry
            .run_page_setup("jobs.html", page.as_ref())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            SetupError::Script(ScriptError::LoadFailed {
                src: "js/jobs.js".to_string()
            })
        );
        assert!(!registry.scripts().contains("js/jobs.js"));
    }
}
