use anyhow::Result;

use crate::commands::Context;

pub fn run(ctx: &Context, phrase: &str) -> Result<()> {
    let collection = ctx.router()?.route(phrase);
    println!("{} ({})", collection, collection.api_path());
    Ok(())
}
