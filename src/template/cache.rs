use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tokio::sync::OnceCell;

use crate::client::{ClientError, ResourceClient};
use crate::template::store::{StoreError, TemplateStore};
use crate::template::supplant;

type PendingFetch = Arc<OnceCell<Result<String, ClientError>>>;

/// Fetches HTML fragments by name and memoizes them in a persistent store.
///
/// Lookup order is store, then the in-flight table, then the network. Every
/// concurrent requester of an uncached name shares one fetch. Stored entries
/// are never fetched again; failed fetches are not remembered, so the next
/// request retries.
pub struct TemplateCache {
    client: ResourceClient,
    store: Arc<dyn TemplateStore>,
    fragments_path: String,
    /// Guards both the in-flight table and the store-miss check so a fetch
    /// settling between the two cannot trigger a second fetch.
    pending: Mutex<HashMap<String, PendingFetch>>,
}

impl TemplateCache {
    pub fn new(
        client: ResourceClient,
        store: Arc<dyn TemplateStore>,
        fragments_path: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            fragments_path: fragments_path.into(),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Path of the fragment for `name`, e.g. `fragments/tax-page.html`.
    pub fn fragment_path(&self, name: &str) -> String {
        format!("{}/{}.html", self.fragments_path.trim_end_matches('/'), name)
    }

    /// Preload inline templates, overwriting stored copies. Only meant for
    /// startup, before any view is rendered.
    pub fn seed<I, K, V>(&self, templates: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut count = 0;
        for (name, source) in templates {
            self.store.set(name.as_ref(), source.as_ref())?;
            count += 1;
        }
        tracing::debug!(count, "Seeded template store");
        Ok(count)
    }

    /// The fragment `name` with `context` interpolated.
    pub async fn get_template(
        &self,
        name: &str,
        context: &Map<String, Value>,
    ) -> Result<String, ClientError> {
        let source = self.source(name).await?;
        Ok(supplant(&source, context))
    }

    /// The raw fragment source for `name`.
    pub async fn source(&self, name: &str) -> Result<String, ClientError> {
        let fetch = {
            let mut pending = self.pending.lock();
            if let Some(source) = self.store.get(name) {
                tracing::trace!(template = name, "Template cache hit");
                return Ok(source);
            }
            match pending.get(name) {
                Some(fetch) => {
                    tracing::debug!(template = name, "Joining in-flight template fetch");
                    fetch.clone()
                }
                None => {
                    let fetch = PendingFetch::default();
                    pending.insert(name.to_string(), fetch.clone());
                    fetch
                }
            }
        };

        fetch.get_or_init(|| self.fetch(name)).await.clone()
    }

    /// Number of names with a fetch still in flight.
    pub fn pending_fetches(&self) -> usize {
        self.pending.lock().len()
    }

    async fn fetch(&self, name: &str) -> Result<String, ClientError> {
        let path = self.fragment_path(name);
        tracing::debug!(template = name, path = %path, "Fetching template");
        let result = self.client.get_text(&path).await;

        match &result {
            Ok(source) => self.persist(name, source).await,
            Err(e) => tracing::warn!(template = name, error = %e, "Template fetch failed"),
        }
        // Only after the store write, so a lookup that misses the pending
        // entry finds the stored copy.
        self.pending.lock().remove(name);
        result
    }

    /// Store writes may block on a file lock held by another process, so
    /// they run on the blocking pool with no cache lock held.
    async fn persist(&self, name: &str, source: &str) {
        let store = Arc::clone(&self.store);
        let (key, text) = (name.to_string(), source.to_string());
        match tokio::task::spawn_blocking(move || store.set(&key, &text)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(template = name, error = %e, "Failed to persist template");
            }
            Err(e) => {
                tracing::warn!(template = name, error = %e, "Template store write aborted");
            }
        }
    }
}
