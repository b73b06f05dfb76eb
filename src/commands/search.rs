use anyhow::Result;
use owo_colors::OwoColorize;
use tourbook_core::search::{Collection, filter_events};

use crate::commands::Context;
use crate::render::Render;

pub fn run(ctx: &Context, phrase: &str) -> Result<()> {
    let collection = ctx.router()?.route(phrase);

    if collection != Collection::Events {
        println!(
            "Searching {} {}",
            collection.bold(),
            collection.api_path().dimmed()
        );
        return Ok(());
    }

    let events = ctx.events()?;
    let matches = filter_events(&events, phrase);

    if matches.is_empty() {
        println!("No events match \"{phrase}\"");
        return Ok(());
    }

    println!("{} matching {}", matches.len(), pluralize("event", matches.len()));
    for event in matches {
        println!("  {}", event.render());
    }

    Ok(())
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
