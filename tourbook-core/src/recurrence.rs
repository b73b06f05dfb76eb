//! Recurring-event expansion for calendar display.
//!
//! Unrolls an event into the concrete dates it should be shown on within one
//! display month. Expansion is always scoped to that month, so an event that
//! repeats for years still costs at most one step per day of the month.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use crate::event::{Event, RawEvent, RecurrencePattern};
use crate::month::YearMonth;

/// One date on which an event is displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occurrence<'a> {
    pub date: NaiveDate,
    pub event: &'a Event,
}

/// The dates within `month` on which `event` occurs.
///
/// The anchor date (the date of `start`) is always a candidate. Weekly events
/// then step forward 7 days at a time and monthly events one calendar month
/// at a time, for as long as the step is not after `end`.
///
/// The n-th monthly step is `start + n months`, computed from the anchor with
/// the day clamped to the end of shorter months: a Jan 31 anchor occurs on
/// Feb 29 (leap year), Mar 31, Apr 30, and so on.
pub fn expand(event: &Event, month: YearMonth) -> BTreeSet<NaiveDate> {
    let mut dates = BTreeSet::new();

    if month.contains(event.anchor_date()) {
        dates.insert(event.anchor_date());
    }

    match event.recurrence() {
        Some(RecurrencePattern::Weekly) => {
            let first = first_weekly_step(event.start, month);
            extend_in_window(&mut dates, month, event.end, first.., |k| {
                event.start.checked_add_signed(Duration::weeks(i64::from(k)))
            });
        }
        Some(RecurrencePattern::Monthly) => {
            let first = first_monthly_step(event.start, month);
            extend_in_window(&mut dates, month, event.end, first.., |k| {
                event.start.checked_add_months(Months::new(k))
            });
        }
        None => {}
    }

    dates
}

/// Like `expand`, but straight from a store record.
///
/// A record that does not parse contributes no dates.
pub fn expand_raw(raw: &RawEvent, month: YearMonth, tz: Tz) -> BTreeSet<NaiveDate> {
    match raw.clone().into_event(tz) {
        Ok(event) => expand(&event, month),
        Err(e) => {
            tracing::debug!(error = %e, "Skipping unparsable event record");
            BTreeSet::new()
        }
    }
}

/// Every occurrence of `events` within `month`, ordered by date and then by
/// the order of `events`.
pub fn occurrences(events: &[Event], month: YearMonth) -> Vec<Occurrence<'_>> {
    let mut result: Vec<Occurrence<'_>> = events
        .iter()
        .flat_map(|event| {
            expand(event, month)
                .into_iter()
                .map(move |date| Occurrence { date, event })
        })
        .collect();

    // Stable sort keeps source order within a day
    result.sort_by_key(|occ| occ.date);
    result
}

/// Push steps `k` from `steps` while they land on or before `end` and not past the month.
fn extend_in_window<I, F>(
    dates: &mut BTreeSet<NaiveDate>,
    month: YearMonth,
    end: NaiveDateTime,
    steps: I,
    step: F,
) where
    I: Iterator<Item = u32>,
    F: Fn(u32) -> Option<NaiveDateTime>,
{
    for k in steps {
        let Some(at) = step(k) else { break };
        if at > end || at.date() > month.last_day() {
            break;
        }
        if month.contains(at.date()) {
            dates.insert(at.date());
        }
    }
}

/// Smallest weekly step (>= 1) that can land inside `month`.
fn first_weekly_step(start: NaiveDateTime, month: YearMonth) -> u32 {
    let gap = (month.first_day() - start.date()).num_days();
    if gap <= 0 {
        return 1;
    }
    let weeks = gap.div_euclid(7) + i64::from(gap.rem_euclid(7) != 0);
    u32::try_from(weeks).unwrap_or(u32::MAX).max(1)
}

/// Smallest monthly step (>= 1) that can land inside `month`.
fn first_monthly_step(start: NaiveDateTime, month: YearMonth) -> u32 {
    let gap = i64::from(month.year() - start.year()) * 12
        + i64::from(month.month())
        - i64::from(start.month());
    u32::try_from(gap).unwrap_or(0).max(1)
}
