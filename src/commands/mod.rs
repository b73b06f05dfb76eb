pub mod calendar;
pub mod day;
pub mod route;
pub mod search;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tourbook_core::Event;
use tourbook_core::config::TourbookConfig;
use tourbook_core::search::QueryRouter;
use tourbook_core::store::{EventStore, JsonFileStore};

/// Configuration and event source shared by every command.
pub struct Context {
    pub config: TourbookConfig,
    pub events_path: PathBuf,
    pub tz: Tz,
}

impl Context {
    pub fn load(events_override: Option<PathBuf>) -> Result<Self> {
        let config = TourbookConfig::load()?;
        let tz = config.tz()?;
        let events_path = events_override.unwrap_or_else(|| config.events_path());

        Ok(Context {
            config,
            events_path,
            tz,
        })
    }

    pub fn events(&self) -> Result<Vec<Event>> {
        tracing::debug!(path = %self.events_path.display(), "Reading events");
        let store = JsonFileStore::new(&self.events_path, self.tz);
        store.all().with_context(|| {
            format!(
                "Failed to load events from {}\n\
                Set events_path in {} or pass --events <file>",
                self.events_path.display(),
                TourbookConfig::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "config.toml".to_string())
            )
        })
    }

    pub fn router(&self) -> Result<QueryRouter> {
        Ok(self.config.router()?)
    }

    /// Today's date in the display time zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}
