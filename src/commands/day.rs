use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use tourbook_core::calendar::events_on;

use crate::commands::Context;
use crate::render::Render;

pub fn run(ctx: &Context, date: &str) -> Result<()> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{date}'. Expected YYYY-MM-DD"))?;

    let events = ctx.events()?;
    let found = events_on(&events, date);

    if found.is_empty() {
        println!("No events on {}", date.format("%A, %B %-d %Y"));
        return Ok(());
    }

    println!("{}", date.format("%A, %B %-d %Y"));
    for event in found {
        println!("  {}", event.render());
    }

    Ok(())
}
