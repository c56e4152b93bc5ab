mod cmd_ask;
mod cmd_extract;
mod cmd_models;
mod cmd_oauth;
mod cmd_preview;
mod cmd_project;
mod cmd_terms;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sparrow_store::{FileStore, ProjectStore, StorageResolver};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sparrow")]
#[command(about = "Generate and edit React + TypeScript projects with an LLM")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory (defaults to $SPARROW_HOME or ~/.sparrow)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Model id to use instead of selecting by prompt length
    #[arg(long, global = true)]
    model: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the terms of use, or record acceptance
    Terms {
        /// Accept the terms
        #[arg(long)]
        accept: bool,
    },
    /// Run one generation turn against the active project
    Ask {
        /// What to build
        #[arg(required = true)]
        prompt: Vec<String>,

        /// Print a unified diff of every changed file
        #[arg(long)]
        diff: bool,
    },
    /// Interactive session; /new starts over, /quit exits
    Chat {
        /// Print a unified diff of every changed file
        #[arg(long)]
        diff: bool,
    },
    /// Run the extractor over a saved reply without calling a model
    Extract {
        /// Markdown file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Apply the result to the active project
        #[arg(long)]
        apply: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the project tree, folders first
    Tree {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a file's content
    Show { path: String },
    /// Create or overwrite a file
    Write {
        path: String,

        /// Read content from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Language tag to record
        #[arg(long)]
        language: Option<String>,
    },
    /// Rename a file or folder in place
    Rename { path: String, new_name: String },
    /// Delete a file or folder and everything under it
    Delete { path: String },
    /// Replace the active project with the starter template
    New {
        #[arg(long)]
        name: Option<String>,
    },
    /// Print a CodeSandbox preview URL
    Preview {
        /// Print the plain define URL instead of the embed URL
        #[arg(long)]
        anchor: bool,

        /// Print the URL that opens the sandbox editor
        #[arg(long, conflicts_with = "anchor")]
        open: bool,
    },
    /// Write the project's files under a directory
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List the model catalog
    Models {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Hand over an OAuth callback URL
    OauthCallback {
        #[arg(required_unless_present = "take")]
        url: Option<String>,

        /// The callback was opened in a popup
        #[arg(long)]
        popup: bool,

        /// Print and consume a previously stored code instead
        #[arg(long, conflicts_with = "popup")]
        take: bool,
    },
}

/// Options shared by every subcommand.
pub(crate) struct Globals {
    pub data_dir: Option<PathBuf>,
    pub model: Option<String>,
    pub pretty: bool,
}

impl Globals {
    pub fn resolver(&self) -> StorageResolver {
        let resolver = StorageResolver::new();
        match &self.data_dir {
            Some(dir) => resolver.with_data_dir(dir.clone()),
            None => resolver,
        }
    }

    pub fn kv(&self) -> Result<FileStore> {
        let resolver = self.resolver();
        FileStore::open(&resolver).context("failed to open data directory")
    }

    pub fn open_store(&self) -> Result<ProjectStore<FileStore>> {
        ProjectStore::open(self.kv()?).context("failed to load project")
    }

    pub fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
        .context("failed to serialize output")
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let globals = Globals {
        data_dir: cli.data_dir,
        model: cli.model,
        pretty: cli.pretty,
    };

    match cli.command {
        Commands::Terms { accept } => cmd_terms::run(&globals, accept),
        Commands::Ask { prompt, diff } => cmd_ask::run_once(&globals, &prompt.join(" "), diff),
        Commands::Chat { diff } => cmd_ask::run_repl(&globals, diff),
        Commands::Extract { input, apply, json } => cmd_extract::run(&globals, &input, apply, json),
        Commands::Tree { json } => cmd_project::tree(&globals, json),
        Commands::Show { path } => cmd_project::show(&globals, &path),
        Commands::Write {
            path,
            input,
            language,
        } => cmd_project::write(&globals, &path, input.as_deref(), language.as_deref()),
        Commands::Rename { path, new_name } => cmd_project::rename(&globals, &path, &new_name),
        Commands::Delete { path } => cmd_project::delete(&globals, &path),
        Commands::New { name } => cmd_project::new(&globals, name.as_deref()),
        Commands::Preview { anchor, open } => cmd_preview::run(&globals, anchor, open),
        Commands::Export { output } => cmd_project::export(&globals, &output),
        Commands::Models { json } => cmd_models::run(&globals, json),
        Commands::OauthCallback { url, popup, take } => cmd_oauth::run(&globals, url.as_deref(), popup, take),
    }
}
