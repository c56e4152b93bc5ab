use anyhow::{Context, Result};
use serde::Serialize;
use sparrow::{CodeBlock, ProjectSink, extract_code_blocks, extract_file_paths};
use std::io::{self, Read};
use std::path::Path;

use crate::Globals;

#[derive(Debug, Serialize)]
struct Extraction {
    files: Vec<String>,
    blocks: Vec<CodeBlock>,
}

pub(crate) fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))
    }
}

pub fn run(globals: &Globals, input: &Path, apply: bool, json: bool) -> Result<()> {
    let text = read_input(input)?;
    let extraction = Extraction {
        files: extract_file_paths(&text),
        blocks: extract_code_blocks(&text),
    };

    if json {
        println!("{}", globals.to_json(&extraction)?);
    } else {
        println!("Declared files ({}):", extraction.files.len());
        for file in &extraction.files {
            println!("  {}", file);
        }
        println!("Code blocks ({}):", extraction.blocks.len());
        for block in &extraction.blocks {
            println!(
                "  {} [{}] {} lines",
                block.filename,
                block.language,
                block.content.lines().count()
            );
        }
    }

    if apply {
        let mut store = globals.open_store()?;
        store
            .apply_generation(&extraction.files, &extraction.blocks)
            .map_err(|e| anyhow::anyhow!(e))
            .context("failed to apply extraction")?;
        eprintln!(
            "Applied to \"{}\" ({} files)",
            store.project().name,
            store.project().file_count()
        );
    }
    Ok(())
}
