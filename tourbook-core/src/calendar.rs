//! Calendar lookups built on recurrence expansion.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::month::YearMonth;
use crate::recurrence::{expand, occurrences};

/// Events occurring on `date`, in the order they appear in `events`.
pub fn events_on(events: &[Event], date: NaiveDate) -> Vec<&Event> {
    let month = YearMonth::of(date);

    events
        .iter()
        .filter(|event| expand(event, month).contains(&date))
        .collect()
}

/// How a calendar day should be marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Only one-off events fall on this day
    Single,
    /// At least one event on this day repeats weekly or monthly
    Recurring,
}

/// A marked day in a month view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMarker {
    pub date: NaiveDate,
    pub kind: MarkerKind,
    /// Ids of the events on this day, in source order
    pub event_ids: Vec<String>,
}

/// Every marked day of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthView {
    pub month: YearMonth,
    /// Sorted by date; days without events are absent
    pub days: Vec<DayMarker>,
}

/// Group all occurrences of `events` in `month` by day.
pub fn month_view(events: &[Event], month: YearMonth) -> MonthView {
    let mut by_day: BTreeMap<NaiveDate, DayMarker> = BTreeMap::new();

    for occ in occurrences(events, month) {
        let marker = by_day.entry(occ.date).or_insert_with(|| DayMarker {
            date: occ.date,
            kind: MarkerKind::Single,
            event_ids: Vec::new(),
        });

        if occ.event.recurrence().is_some() {
            marker.kind = MarkerKind::Recurring;
        }
        marker.event_ids.push(occ.event.id.clone());
    }

    MonthView {
        month,
        days: by_day.into_values().collect(),
    }
}

impl MonthView {
    pub fn marker(&self, date: NaiveDate) -> Option<&DayMarker> {
        self.days
            .binary_search_by_key(&date, |m| m.date)
            .ok()
            .map(|i| &self.days[i])
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Lay the month out as rows of 7 cells starting on `week_start`.
    /// Cells outside the month are `None`.
    pub fn weeks(&self, week_start: Weekday) -> Vec<[Option<NaiveDate>; 7]> {
        let first = self.month.first_day();
        let lead = (first.weekday().num_days_from_monday() + 7
            - week_start.num_days_from_monday())
            % 7;

        let cells: Vec<Option<NaiveDate>> = std::iter::repeat_n(None, lead as usize)
            .chain(self.month.days().map(Some))
            .collect();

        cells
            .chunks(7)
            .map(|chunk| {
                let mut row = [None; 7];
                row[..chunk.len()].copy_from_slice(chunk);
                row
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RecurrencePattern;
    use chrono::NaiveDateTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(10, 0, 0).unwrap()
    }

    fn sample_events() -> Vec<Event> {
        vec![
            Event::new("concert", "Riverside Concert", at(2024, 1, 15), at(2024, 1, 15)),
            Event::new("market", "Farmers Market", at(2024, 1, 1), at(2024, 1, 31))
                .recurring(RecurrencePattern::Weekly),
            Event::new("hike", "Full Moon Hike", at(2023, 12, 15), at(2024, 6, 15))
                .recurring(RecurrencePattern::Monthly),
        ]
    }

    #[test]
    fn test_events_on_preserves_source_order() {
        let events = sample_events();

        let ids: Vec<&str> = events_on(&events, date(2024, 1, 15))
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["concert", "market", "hike"]);
    }

    #[test]
    fn test_events_on_empty_cases() {
        assert!(events_on(&[], date(2024, 1, 1)).is_empty());
        assert!(events_on(&sample_events(), date(2024, 1, 2)).is_empty());
    }

    #[test]
    fn test_events_on_matches_expansion() {
        let events = sample_events();
        let month = YearMonth::new(2024, 1).unwrap();

        for day in month.days() {
            let expected: Vec<&str> = events
                .iter()
                .filter(|e| expand(e, YearMonth::of(day)).contains(&day))
                .map(|e| e.id.as_str())
                .collect();
            let got: Vec<&str> = events_on(&events, day).iter().map(|e| e.id.as_str()).collect();
            assert_eq!(got, expected, "mismatch on {day}");
        }
    }

    #[test]
    fn test_month_view_marks_recurring_days() {
        let mut events = sample_events();
        events.push(Event::new("talk", "Author Talk", at(2024, 1, 20), at(2024, 1, 20)));
        let view = month_view(&events, YearMonth::new(2024, 1).unwrap());

        let days: Vec<u32> = view.days.iter().map(|m| m.date.day()).collect();
        assert_eq!(days, vec![1, 8, 15, 20, 22, 29]);

        let mid = view.marker(date(2024, 1, 15)).unwrap();
        assert_eq!(mid.kind, MarkerKind::Recurring);
        assert_eq!(mid.event_ids, vec!["concert", "market", "hike"]);

        let talk = view.marker(date(2024, 1, 20)).unwrap();
        assert_eq!(talk.kind, MarkerKind::Single);
        assert_eq!(talk.event_ids, vec!["talk"]);

        assert!(view.marker(date(2024, 1, 2)).is_none());
    }

    #[test]
    fn test_month_view_agrees_with_day_lookup() {
        let events = sample_events();
        let month = YearMonth::new(2024, 1).unwrap();
        let view = month_view(&events, month);

        for day in month.days() {
            let ids: Vec<String> = events_on(&events, day).iter().map(|e| e.id.clone()).collect();
            match view.marker(day) {
                Some(marker) => assert_eq!(marker.event_ids, ids),
                None => assert!(ids.is_empty()),
            }
        }
    }

    #[test]
    fn test_weeks_layout() {
        // 2024-02-01 is a Thursday
        let view = month_view(&[], YearMonth::new(2024, 2).unwrap());

        let monday = view.weeks(Weekday::Mon);
        assert_eq!(monday.len(), 5);
        assert_eq!(monday[0][..3], [None::<NaiveDate>; 3]);
        assert_eq!(monday[0][3], Some(date(2024, 2, 1)));
        assert_eq!(monday[4][3], Some(date(2024, 2, 29)));
        assert_eq!(monday[4][4], None);

        let sunday = view.weeks(Weekday::Sun);
        assert_eq!(sunday[0][4], Some(date(2024, 2, 1)));
    }
}
