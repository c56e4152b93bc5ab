use anyhow::{Context, Result};
use sparrow_preview::{Preview, open_url};

use crate::Globals;

pub fn run(globals: &Globals, anchor: bool, open: bool) -> Result<()> {
    let store = globals.open_store()?;
    let Some(preview) =
        Preview::for_project(store.project()).context("failed to build preview")?
    else {
        anyhow::bail!("project has no files to preview");
    };

    let url = if anchor {
        preview.anchor_url
    } else if open {
        open_url(&preview.embed_url).context("failed to build editor URL")?
    } else {
        preview.embed_url
    };
    println!("{}", url);
    Ok(())
}
