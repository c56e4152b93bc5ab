use anyhow::Result;
use sparrow_chat::{MODELS, select_model};

use crate::Globals;

pub fn run(globals: &Globals, json: bool) -> Result<()> {
    if json {
        println!("{}", globals.to_json(&MODELS)?);
        return Ok(());
    }

    let default = select_model("").id;
    let width = MODELS.iter().map(|m| m.id.len()).max().unwrap_or(0);
    for model in MODELS {
        let marker = if model.id == default { "*" } else { " " };
        println!(
            "{} {:<width$}  {:>9}  {}",
            marker,
            model.id,
            model.context_tokens,
            model.name,
            width = width
        );
    }
    Ok(())
}
