use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to load script: {src}")]
    LoadFailed { src: String },
}

/// Script URLs already injected into the document.
///
/// Clones share the same set. The set only grows; a full page reload starts
/// from a fresh one.
#[derive(Debug, Clone, Default)]
pub struct LoadedScriptSet {
    inner: Arc<Mutex<BTreeSet<String>>>,
}

impl LoadedScriptSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set that already knows about `sources`, e.g. scripts rendered into
    /// the initial document.
    pub fn seeded<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = sources.into_iter().map(Into::into).collect();
        Self {
            inner: Arc::new(Mutex::new(set)),
        }
    }

    pub fn contains(&self, src: &str) -> bool {
        self.lock().contains(src)
    }

    /// Returns `false` if `src` was already recorded.
    pub fn insert(&self, src: &str) -> bool {
        self.lock().insert(src.to_string())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeSet<String>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Injects a behaviour script into the document and resolves once it ran.
#[async_trait::async_trait]
pub trait ScriptLoader: Send + Sync {
    async fn load(&self, src: &str) -> Result<(), ScriptError>;
}
