use anyhow::Result;
use tourbook_core::YearMonth;
use tourbook_core::calendar::month_view;

use crate::commands::Context;
use crate::render::{render_legend, render_month};

pub fn run(ctx: &Context, month: Option<&str>) -> Result<()> {
    let today = ctx.today();
    let month = match month {
        Some(s) => s.parse::<YearMonth>()?,
        None => YearMonth::of(today),
    };

    let events = ctx.events()?;
    let view = month_view(&events, month);

    println!("{}", render_month(&view, Some(today)));

    if view.is_empty() {
        println!("\n  No events in {month}");
    } else {
        println!();
        println!("{}", render_legend(&view, &events));
    }

    Ok(())
}
