//! Event records and their store boundary.
//!
//! Records arrive from the content store loosely typed (`RawEvent`). They are
//! parsed and validated once, at the boundary, into the strict `Event` shape
//! that the recurrence expander and calendar work with.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{TourbookError, TourbookResult};

/// How a recurring event repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    Weekly,
    Monthly,
}

impl FromStr for RecurrencePattern {
    type Err = TourbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(RecurrencePattern::Weekly),
            "monthly" => Ok(RecurrencePattern::Monthly),
            other => Err(TourbookError::InvalidRecord(format!(
                "Unsupported recurrence pattern '{other}'"
            ))),
        }
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrencePattern::Weekly => write!(f, "weekly"),
            RecurrencePattern::Monthly => write!(f, "monthly"),
        }
    }
}

/// A validated event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub featured: bool,

    /// Wall-clock start in the site's display time zone
    #[serde(rename = "startDate")]
    pub start: NaiveDateTime,
    /// Wall-clock end in the site's display time zone
    #[serde(rename = "endDate")]
    pub end: NaiveDateTime,

    #[serde(default)]
    pub is_recurring: bool,
    /// Only meaningful when `is_recurring` is set. Unknown patterns are
    /// dropped at the boundary, which leaves the event anchor-only.
    pub recurrence_pattern: Option<RecurrencePattern>,
}

impl Event {
    /// Create a one-off event. The slug is derived from the title.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        let title = title.into();
        Event {
            id: id.into(),
            slug: slug::slugify(&title),
            title,
            description: None,
            location: None,
            image_url: None,
            category: None,
            featured: false,
            start,
            end,
            is_recurring: false,
            recurrence_pattern: None,
        }
    }

    /// Mark the event as repeating with the given pattern.
    pub fn recurring(mut self, pattern: RecurrencePattern) -> Self {
        self.is_recurring = true;
        self.recurrence_pattern = Some(pattern);
        self
    }

    /// The date the event is anchored on.
    pub fn anchor_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// The pattern to expand with, or None if the event only occurs on its anchor date.
    pub fn recurrence(&self) -> Option<RecurrencePattern> {
        if self.is_recurring {
            self.recurrence_pattern
        } else {
            None
        }
    }

    /// Whether `key` names this event by id or slug.
    pub fn matches_key(&self, key: &str) -> bool {
        self.id == key || self.slug == key
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// An event record as it arrives from the content store.
///
/// Nothing is guaranteed at this layer: fields may be missing, ids may be
/// numbers or strings, and dates are free-form strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub id: Option<serde_json::Value>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurrence_pattern: Option<String>,
}

impl RawEvent {
    /// Parse and validate into an `Event`, reading offset timestamps in `tz`.
    pub fn into_event(self, tz: Tz) -> TourbookResult<Event> {
        let id = match self.id {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => return Err(TourbookError::InvalidRecord("missing id".into())),
        };

        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| TourbookError::InvalidRecord(format!("event '{id}' has no title")))?;

        let start = parse_field(&id, "startDate", self.start_date.as_deref(), tz)?;
        let end = parse_field(&id, "endDate", self.end_date.as_deref(), tz)?;

        let is_recurring = self.is_recurring.unwrap_or(false);
        let recurrence_pattern = match self.recurrence_pattern.as_deref() {
            Some(raw) if is_recurring => match raw.parse::<RecurrencePattern>() {
                Ok(pattern) => Some(pattern),
                Err(_) => {
                    tracing::debug!(event = %id, pattern = raw, "Unsupported recurrence pattern, treating as one-off");
                    None
                }
            },
            _ => None,
        };

        let slug = self
            .slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| slug::slugify(&title));

        Ok(Event {
            id,
            slug,
            title,
            description: self.description,
            location: self.location,
            image_url: self.image_url,
            category: self.category,
            featured: self.featured.unwrap_or(false),
            start,
            end,
            is_recurring,
            recurrence_pattern,
        })
    }
}

impl TryFrom<RawEvent> for Event {
    type Error = TourbookError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        raw.into_event(chrono_tz::UTC)
    }
}

fn parse_field(id: &str, field: &str, value: Option<&str>, tz: Tz) -> TourbookResult<NaiveDateTime> {
    let value = value.ok_or_else(|| TourbookError::InvalidRecord(format!("event '{id}' has no {field}")))?;

    parse_timestamp(value, tz).ok_or_else(|| {
        TourbookError::InvalidRecord(format!("event '{id}' has unparsable {field} '{value}'"))
    })
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp as stored by the content store.
///
/// Accepts RFC 3339 (converted into `tz` and read as wall-clock time),
/// naive date-times, and bare `YYYY-MM-DD` dates (midnight).
pub fn parse_timestamp(value: &str, tz: Tz) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&tz).naive_local());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawEvent {
        serde_json::from_value(value).unwrap()
    }

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let utc = chrono_tz::UTC;
        assert_eq!(
            parse_timestamp("2024-01-15T10:30:00", utc),
            Some(ymd_hms(2024, 1, 15, 10, 30, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-15T10:30:00.000Z", utc),
            Some(ymd_hms(2024, 1, 15, 10, 30, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-15 10:30", utc),
            Some(ymd_hms(2024, 1, 15, 10, 30, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-15", utc),
            Some(ymd_hms(2024, 1, 15, 0, 0, 0))
        );
        assert_eq!(parse_timestamp("next tuesday", utc), None);
        assert_eq!(parse_timestamp("2024-02-30", utc), None);
    }

    #[test]
    fn test_parse_timestamp_converts_offsets_into_display_zone() {
        // 02:00 UTC is still the previous evening in Denver
        let parsed = parse_timestamp("2024-03-01T02:00:00Z", chrono_tz::America::Denver);
        assert_eq!(parsed, Some(ymd_hms(2024, 2, 29, 19, 0, 0)));
    }

    #[test]
    fn test_raw_event_into_event() {
        let event = Event::try_from(raw(json!({
            "id": 42,
            "title": "Summer Music Festival",
            "startDate": "2024-07-04T18:00:00",
            "endDate": "2024-07-04T23:00:00",
            "isRecurring": false,
            "location": "Town Square"
        })))
        .unwrap();

        assert_eq!(event.id, "42");
        assert_eq!(event.slug, "summer-music-festival");
        assert_eq!(event.location.as_deref(), Some("Town Square"));
        assert_eq!(event.recurrence(), None);
        assert_eq!(event.anchor_date(), NaiveDate::from_ymd_opt(2024, 7, 4).unwrap());
    }

    #[test]
    fn test_raw_event_keeps_explicit_slug() {
        let event = Event::try_from(raw(json!({
            "id": "evt-1",
            "slug": "farmers-market",
            "title": "Saturday Farmers Market",
            "startDate": "2024-05-04",
            "endDate": "2024-09-28",
            "isRecurring": true,
            "recurrencePattern": "Weekly"
        })))
        .unwrap();

        assert_eq!(event.slug, "farmers-market");
        assert_eq!(event.recurrence(), Some(RecurrencePattern::Weekly));
    }

    #[test]
    fn test_unknown_pattern_is_inert() {
        let event = Event::try_from(raw(json!({
            "id": "evt-2",
            "title": "Quarterly Cleanup",
            "startDate": "2024-01-06",
            "endDate": "2024-12-31",
            "isRecurring": true,
            "recurrencePattern": "quarterly"
        })))
        .unwrap();

        assert!(event.is_recurring);
        assert_eq!(event.recurrence_pattern, None);
        assert_eq!(event.recurrence(), None);
    }

    #[test]
    fn test_pattern_ignored_when_not_recurring() {
        let event = Event::try_from(raw(json!({
            "id": "evt-3",
            "title": "Gallery Opening",
            "startDate": "2024-01-06",
            "endDate": "2024-01-06",
            "recurrencePattern": "weekly"
        })))
        .unwrap();

        assert_eq!(event.recurrence(), None);
    }

    #[test]
    fn test_invalid_records_are_rejected() {
        let missing_start = raw(json!({ "id": "a", "title": "A", "endDate": "2024-01-01" }));
        let bad_end = raw(json!({ "id": "b", "title": "B", "startDate": "2024-01-01", "endDate": "soon" }));
        let missing_id = raw(json!({ "title": "C", "startDate": "2024-01-01", "endDate": "2024-01-01" }));
        let blank_title = raw(json!({ "id": "d", "title": " ", "startDate": "2024-01-01", "endDate": "2024-01-01" }));

        for record in [missing_start, bad_end, missing_id, blank_title] {
            assert!(matches!(
                Event::try_from(record),
                Err(TourbookError::InvalidRecord(_))
            ));
        }
    }

    #[test]
    fn test_event_serializes_with_store_field_names() {
        let event = Event::new(
            "1",
            "Ice Fishing Derby",
            ymd_hms(2024, 2, 10, 8, 0, 0),
            ymd_hms(2024, 2, 10, 14, 0, 0),
        )
        .recurring(RecurrencePattern::Monthly);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["startDate"], "2024-02-10T08:00:00");
        assert_eq!(value["isRecurring"], true);
        assert_eq!(value["recurrencePattern"], "monthly");
        assert_eq!(value["slug"], "ice-fishing-derby");
    }
}
