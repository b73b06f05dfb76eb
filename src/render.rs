//! TUI rendering for tourbook types.
//!
//! Extension traits and helpers that add colored terminal output to
//! tourbook-core types using owo_colors.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use owo_colors::OwoColorize;
use tourbook_core::Event;
use tourbook_core::calendar::{MarkerKind, MonthView};

/// Width of one rendered week: 7 cells of 2 chars plus separators
const GRID_WIDTH: usize = 20;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for MarkerKind {
    fn render(&self) -> String {
        match self {
            MarkerKind::Recurring => "↻".cyan().to_string(),
            MarkerKind::Single => "●".yellow().to_string(),
        }
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let mut line = format!("{} {}", self.title.bold(), render_event_time(self).dimmed());

        if let Some(location) = &self.location {
            line.push_str(&format!(" @ {location}"));
        }
        if let Some(pattern) = self.recurrence() {
            line.push_str(&format!(" {}", format!("({pattern})").cyan()));
        }

        line
    }
}

/// Human-readable time span of an event.
pub fn render_event_time(event: &Event) -> String {
    let (start, end) = (event.start, event.end);

    if start.date() == end.date() {
        if start.time() == NaiveTime::MIN && end.time() == NaiveTime::MIN {
            start.format("%b %-d %Y").to_string()
        } else {
            format!("{}-{}", start.format("%b %-d %Y %H:%M"), end.format("%H:%M"))
        }
    } else {
        format!("{} - {}", start.format("%b %-d %Y"), end.format("%b %-d %Y"))
    }
}

/// Render a month grid (weeks start on Monday). Marked days are colored by
/// marker kind and `today` is underlined.
pub fn render_month(view: &MonthView, today: Option<NaiveDate>) -> String {
    let mut lines = Vec::new();

    let title = view.month.first_day().format("%B %Y").to_string();
    lines.push(format!("{:^width$}", title, width = GRID_WIDTH).bold().to_string());
    lines.push("Mo Tu We Th Fr Sa Su".dimmed().to_string());

    for week in view.weeks(Weekday::Mon) {
        let cells: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                Some(date) => render_day(view, *date, today),
                None => "  ".to_string(),
            })
            .collect();
        lines.push(cells.join(" ").trim_end().to_string());
    }

    lines.join("\n")
}

fn render_day(view: &MonthView, date: NaiveDate, today: Option<NaiveDate>) -> String {
    // Pad before coloring so escape codes don't break alignment
    let cell = format!("{:>2}", date.day());

    let cell = match view.marker(date).map(|m| m.kind) {
        Some(MarkerKind::Recurring) => cell.cyan().bold().to_string(),
        Some(MarkerKind::Single) => cell.yellow().bold().to_string(),
        None => cell,
    };

    if today == Some(date) {
        cell.underline().to_string()
    } else {
        cell
    }
}

/// One line per marked day listing the titles of its events.
pub fn render_legend(view: &MonthView, events: &[Event]) -> String {
    view.days
        .iter()
        .map(|marker| {
            let titles: Vec<&str> = marker
                .event_ids
                .iter()
                .filter_map(|id| events.iter().find(|e| &e.id == id))
                .map(|e| e.title.as_str())
                .collect();

            format!(
                "  {} {} {}",
                marker.kind.render(),
                marker.date.format("%a %e").dimmed(),
                titles.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
