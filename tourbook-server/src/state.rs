use std::sync::Arc;

use anyhow::{Context, Result};
use tourbook_core::cache::QueryCache;
use tourbook_core::config::TourbookConfig;
use tourbook_core::search::{Collection, QueryRouter};
use tourbook_core::store::{EventStore, JsonFileStore};
use tourbook_core::{Event, TourbookResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn EventStore>,
    // Store reads are cached by endpoint path until explicitly invalidated
    cache: Arc<QueryCache<Vec<Event>>>,
    router: Arc<QueryRouter>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>, router: QueryRouter) -> Self {
        AppState {
            store,
            cache: Arc::new(QueryCache::new()),
            router: Arc::new(router),
        }
    }

    pub fn from_config(config: &TourbookConfig) -> Result<Self> {
        let tz = config.tz()?;
        let router = config.router().context("Invalid [search] configuration")?;
        let store = JsonFileStore::new(config.events_path(), tz);

        tracing::info!(path = %store.path().display(), timezone = %tz, "Using JSON event store");

        Ok(AppState::new(Arc::new(store), router))
    }

    /// All events, served from the cache when possible.
    pub fn events(&self) -> TourbookResult<Arc<Vec<Event>>> {
        self.cache
            .get_or_try_insert_with(&Collection::Events.api_path(), || self.store.all())
    }

    pub fn query_router(&self) -> &QueryRouter {
        &self.router
    }

    /// Forget every cached store read. Returns whether anything was cached.
    pub fn invalidate(&self) -> bool {
        let had_entries = !self.cache.is_empty();
        self.cache.clear();
        had_entries
    }
}
