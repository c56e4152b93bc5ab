use anyhow::{Context, Result};
use similar::TextDiff;
use sparrow_chat::{
    AgentStep, ChatAgent, ChatConfig, ChatSession, OpenRouterBackend, StepStatus,
};
use sparrow_store::{FileStore, ProjectStore};
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use crate::Globals;
use crate::cmd_terms::require_accepted;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Change {
    Created(String),
    Updated(String),
    Removed(String),
}

fn build_agent(globals: &Globals) -> Result<ChatAgent<OpenRouterBackend>> {
    let config = ChatConfig::from_env().with_model(globals.model.clone());
    let backend = OpenRouterBackend::new(&config).context("failed to configure chat backend")?;
    Ok(ChatAgent::new(backend).with_model(config.model().map(str::to_string)))
}

fn print_step(step: &AgentStep) {
    match step.status {
        StepStatus::Pending => {}
        StepStatus::Running => eprintln!("  ... {}", step.title),
        StepStatus::Completed => eprintln!("  ok  {}", step.title),
        StepStatus::Error => eprintln!(
            "  err {}: {}",
            step.title,
            step.description.as_deref().unwrap_or("unknown error")
        ),
    }
}

fn changes(before: &BTreeMap<String, String>, after: &BTreeMap<String, String>) -> Vec<Change> {
    let mut out = Vec::new();
    for (path, content) in after {
        match before.get(path) {
            None => out.push(Change::Created(path.clone())),
            Some(old) if old != content => out.push(Change::Updated(path.clone())),
            Some(_) => {}
        }
    }
    for path in before.keys() {
        if !after.contains_key(path) {
            out.push(Change::Removed(path.clone()));
        }
    }
    out
}

fn compute_diff(path: &str, old: &str, new: &str) -> Option<String> {
    let diff = TextDiff::from_lines(old, new);
    let unified = diff
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{}", path), &format!("b/{}", path))
        .to_string();
    if unified.is_empty() {
        None
    } else {
        Some(unified)
    }
}

fn report(before: &BTreeMap<String, String>, after: &BTreeMap<String, String>, diff: bool) {
    let changes = changes(before, after);
    if changes.is_empty() {
        println!("No files changed.");
        return;
    }
    for change in &changes {
        let (tag, path) = match change {
            Change::Created(p) => ("created", p),
            Change::Updated(p) => ("updated", p),
            Change::Removed(p) => ("removed", p),
        };
        println!("{:>8} {}", tag, path);
    }
    if diff {
        for change in &changes {
            let path = match change {
                Change::Created(p) | Change::Updated(p) | Change::Removed(p) => p,
            };
            let old = before.get(path).map(String::as_str).unwrap_or("");
            let new = after.get(path).map(String::as_str).unwrap_or("");
            if let Some(d) = compute_diff(path, old, new) {
                print!("{}", d);
            }
        }
    }
}

fn turn(
    agent: &ChatAgent<OpenRouterBackend>,
    session: &mut ChatSession,
    store: &mut ProjectStore<FileStore>,
    prompt: &str,
    diff: bool,
) -> Result<()> {
    let before = store.project().file_map();
    let generation = agent
        .send_observed(session, prompt, store, &mut |step: &AgentStep| print_step(step))
        .context("generation failed")?;
    eprintln!(
        "  model {} ({} declared, {} blocks)",
        generation.model,
        generation.files.len(),
        generation.blocks.len()
    );
    report(&before, &store.project().file_map(), diff);
    Ok(())
}

pub fn run_once(globals: &Globals, prompt: &str, diff: bool) -> Result<()> {
    require_accepted(globals)?;
    let agent = build_agent(globals)?;
    let mut store = globals.open_store()?;
    let mut session = ChatSession::new();
    turn(&agent, &mut session, &mut store, prompt, diff)
}

pub fn run_repl(globals: &Globals, diff: bool) -> Result<()> {
    require_accepted(globals)?;
    let agent = build_agent(globals)?;
    let mut store = globals.open_store()?;
    let mut session = ChatSession::new();

    eprintln!(
        "Project \"{}\" ({} files). /new starts over, /quit exits.",
        store.project().name,
        store.project().file_count()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock();
    loop {
        eprint!("> ");
        io::stderr().flush().context("failed to flush prompt")?;

        let mut line = String::new();
        if lines.read_line(&mut line).context("failed to read stdin")? == 0 {
            break;
        }
        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/new" => {
                session = ChatSession::new();
                store.new_session_project(&session.id, &session.project_name())?;
                eprintln!("Started \"{}\".", store.project().name);
            }
            prompt => {
                if let Err(e) = turn(&agent, &mut session, &mut store, prompt, diff) {
                    eprintln!("error: {:#}", e);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_changes() {
        let before = map(&[("a.ts", "1"), ("b.ts", "2"), ("c.ts", "3")]);
        let after = map(&[("a.ts", "1"), ("b.ts", "22"), ("d.ts", "4")]);
        assert_eq!(
            changes(&before, &after),
            vec![
                Change::Updated("b.ts".into()),
                Change::Created("d.ts".into()),
                Change::Removed("c.ts".into()),
            ]
        );
    }

    #[test]
    fn test_no_changes() {
        let m = map(&[("a.ts", "1")]);
        assert!(changes(&m, &m).is_empty());
    }

    #[test]
    fn test_compute_diff() {
        assert!(compute_diff("x", "same\n", "same\n").is_none());
        let d = compute_diff("src/App.tsx", "old\n", "new\n").unwrap();
        assert!(d.contains("a/src/App.tsx"));
        assert!(d.contains("-old"));
        assert!(d.contains("+new"));
    }
}
