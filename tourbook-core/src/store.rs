//! Read access to the event collection.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;

use crate::error::{TourbookError, TourbookResult};
use crate::event::{Event, RawEvent};

/// Read interface over wherever event records live.
pub trait EventStore: Send + Sync {
    /// Every valid event, in store order.
    fn all(&self) -> TourbookResult<Vec<Event>>;

    /// One event by id or slug.
    fn get(&self, key: &str) -> TourbookResult<Event> {
        self.all()?
            .into_iter()
            .find(|event| event.matches_key(key))
            .ok_or_else(|| TourbookError::NotFound(format!("event '{key}'")))
    }
}

/// Events kept in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    events: Vec<Event>,
}

impl MemoryStore {
    pub fn new(events: Vec<Event>) -> Self {
        MemoryStore { events }
    }
}

impl EventStore for MemoryStore {
    fn all(&self) -> TourbookResult<Vec<Event>> {
        Ok(self.events.clone())
    }
}

/// Events read from a JSON array of store records on disk.
///
/// The file is re-read on every call; callers that need to avoid that put a
/// `QueryCache` in front.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    tz: Tz,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, tz: Tz) -> Self {
        JsonFileStore {
            path: path.into(),
            tz,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventStore for JsonFileStore {
    fn all(&self) -> TourbookResult<Vec<Event>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            TourbookError::Store(format!("Could not read {}: {e}", self.path.display()))
        })?;

        parse_events(&content, self.tz)
    }
}

/// Parse a JSON array of store records, skipping records that don't validate.
///
/// Fails only if the document itself is not a JSON array.
pub fn parse_events(json: &str, tz: Tz) -> TourbookResult<Vec<Event>> {
    let records: Vec<serde_json::Value> = serde_json::from_str(json)?;

    let events = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let parsed = serde_json::from_value::<RawEvent>(value)
                .map_err(TourbookError::from)
                .and_then(|raw| raw.into_event(tz));

            match parsed {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping invalid event record");
                    None
                }
            }
        })
        .collect();

    Ok(events)
}
