//! Free-text search routing and filtering.
//!
//! A search phrase is routed to one content collection by keyword: the
//! lowercased phrase is tested against each collection's keywords in a fixed
//! priority order and the first collection with a hit wins. Phrases with no
//! hit go to the default collection.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TourbookError;
use crate::event::Event;

/// A content collection a search can be routed to.
///
/// Declaration order is the routing priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Events,
    Cabins,
    Attractions,
    Destinations,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Events,
        Collection::Cabins,
        Collection::Attractions,
        Collection::Destinations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Events => "events",
            Collection::Cabins => "cabins",
            Collection::Attractions => "attractions",
            Collection::Destinations => "destinations",
        }
    }

    /// API path listing this collection.
    pub fn api_path(&self) -> String {
        format!("/api/{}", self.as_str())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = TourbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| TourbookError::Config(format!("Unknown collection '{s}'")))
    }
}

/// Routes phrases to collections with a keyword table.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRouter {
    rules: Vec<(Collection, Vec<String>)>,
    default: Collection,
}

impl Default for QueryRouter {
    fn default() -> Self {
        QueryRouter::new(
            [
                (Collection::Events, &["event", "festival", "concert", "show", "celebration"][..]),
                (Collection::Cabins, &["cabin", "lodge", "cottage", "stay", "rental"][..]),
                (
                    Collection::Attractions,
                    &["attraction", "museum", "park", "tour", "activity", "adventure"][..],
                ),
            ]
            .into_iter()
            .map(|(c, words)| (c, words.iter().map(|w| w.to_string()).collect())),
            Collection::Destinations,
        )
    }
}

impl QueryRouter {
    /// Build a router from `(collection, keywords)` rules tested in the given order.
    pub fn new<I>(rules: I, default: Collection) -> Self
    where
        I: IntoIterator<Item = (Collection, Vec<String>)>,
    {
        let rules = rules
            .into_iter()
            .map(|(collection, words)| {
                let words = words
                    .into_iter()
                    .map(|w| w.trim().to_lowercase())
                    .filter(|w| !w.is_empty())
                    .collect();
                (collection, words)
            })
            .collect();

        QueryRouter { rules, default }
    }

    /// The default table with per-collection keyword lists replaced by `overrides`.
    ///
    /// Rules keep collection priority order regardless of how `overrides` is written.
    pub fn with_overrides(
        overrides: &BTreeMap<Collection, Vec<String>>,
        default: Collection,
    ) -> Self {
        let mut table: BTreeMap<Collection, Vec<String>> =
            QueryRouter::default().rules.into_iter().collect();

        for (collection, words) in overrides {
            table.insert(*collection, words.clone());
        }

        QueryRouter::new(table, default)
    }

    pub fn default_collection(&self) -> Collection {
        self.default
    }

    /// The collection `query` should be searched in.
    pub fn route(&self, query: &str) -> Collection {
        let query = query.to_lowercase();

        self.rules
            .iter()
            .find(|(_, words)| words.iter().any(|w| query.contains(w.as_str())))
            .map(|(collection, _)| *collection)
            .unwrap_or(self.default)
    }
}

/// Events matching every word of `query` (case-insensitive) somewhere in
/// their title, description, location or category. A blank query keeps
/// everything.
pub fn filter_events<'a>(events: &'a [Event], query: &str) -> Vec<&'a Event> {
    let query = query.to_lowercase();
    let terms: Vec<&str> = query.split_whitespace().collect();
    if terms.is_empty() {
        return events.iter().collect();
    }

    events
        .iter()
        .filter(|event| {
            let haystack = [
                Some(event.title.as_str()),
                event.description.as_deref(),
                event.location.as_deref(),
                event.category.as_deref(),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("\n")
            .to_lowercase();

            terms.iter().all(|term| haystack.contains(term))
        })
        .collect()
}
