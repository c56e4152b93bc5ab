use anyhow::{Context, Result};
use sparrow_store::{handle_callback, take_oauth_code};

use crate::Globals;

pub fn run(globals: &Globals, url: Option<&str>, popup: bool, take: bool) -> Result<()> {
    let mut kv = globals.kv()?;

    if take {
        match take_oauth_code(&mut kv).context("failed to read OAuth code")? {
            Some(code) => println!("{}", code),
            None => anyhow::bail!("no OAuth code stored"),
        }
        return Ok(());
    }

    let url = url.context("a callback URL is required")?;
    let outcome = handle_callback(url, &mut kv, popup).context("failed to handle callback")?;
    if outcome.code_stored {
        eprintln!("OAuth code stored.");
    }
    if outcome.close_popup {
        eprintln!("Popup flow complete; close the window.");
    }
    if let Some(error) = &outcome.error {
        eprintln!("OAuth error: {}", error);
    }
    println!("{}", outcome.clean_url);
    Ok(())
}
