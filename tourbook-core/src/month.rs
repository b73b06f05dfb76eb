//! Calendar month used as the display window for recurrence expansion.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{TourbookError, TourbookResult};

/// A single calendar month (year + 1-based month number).
///
/// Internally anchored on the first day of the month, so every accessor is
/// infallible once a `YearMonth` exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// Build a month from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> TourbookResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| TourbookError::InvalidMonth(format!("{year}-{month:02}")))?;
        Ok(YearMonth { first })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Every day of the month, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.first.iter_days().take(self.days_in_month() as usize)
    }

    pub fn next(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| YearMonth { first })
    }

    pub fn prev(&self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| YearMonth { first })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Parse `YYYY-MM`.
impl FromStr for YearMonth {
    type Err = TourbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TourbookError::InvalidMonth(format!("'{s}'. Expected YYYY-MM"));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        YearMonth::new(year, month)
    }
}

impl From<YearMonth> for String {
    fn from(month: YearMonth) -> Self {
        month.to_string()
    }
}

impl TryFrom<String> for YearMonth {
    type Error = TourbookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
