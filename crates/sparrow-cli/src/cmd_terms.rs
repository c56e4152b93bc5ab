use anyhow::{Context, Result};
use sparrow_store::{accept_terms, terms_accepted};

use crate::Globals;

const TERMS: &str = "\
Sparrow sends your prompts to a third-party model provider (OpenRouter)
and writes the generated code into your local project.

- Generated code may be incomplete or wrong; review it before use.
- Do not include secrets or personal data in prompts.
- Model availability and rate limits are controlled by the provider.
";

pub fn run(globals: &Globals, accept: bool) -> Result<()> {
    let mut kv = globals.kv()?;
    if accept {
        accept_terms(&mut kv).context("failed to record acceptance")?;
        println!("Terms accepted.");
        return Ok(());
    }

    print!("{}", TERMS);
    if terms_accepted(&kv)? {
        println!("\nStatus: accepted");
    } else {
        println!("\nStatus: not accepted (run `sparrow terms --accept`)");
    }
    Ok(())
}

/// Fail unless the terms have been accepted in this data directory.
pub fn require_accepted(globals: &Globals) -> Result<()> {
    let kv = globals.kv()?;
    if !terms_accepted(&kv)? {
        anyhow::bail!("terms not accepted; run `sparrow terms` to review and `sparrow terms --accept` to agree");
    }
    Ok(())
}
