use anyhow::{Context, Result};
use serde::Serialize;
use sparrow::tree::{children, descendants, normalize_path};
use sparrow::{FileKind, FileNode, Project};
use std::path::{Component, Path, PathBuf};

use crate::Globals;
use crate::cmd_extract::read_input;

#[derive(Debug, Serialize)]
struct TreeEntry<'a> {
    name: &'a str,
    path: &'a str,
    #[serde(rename = "type")]
    kind: FileKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeEntry<'a>>,
}

fn build_tree<'a>(nodes: &'a [FileNode], parent: Option<&str>, depth: usize) -> Vec<TreeEntry<'a>> {
    if depth > nodes.len() {
        return Vec::new();
    }
    children(nodes, parent)
        .into_iter()
        .map(|node| TreeEntry {
            name: &node.name,
            path: &node.path,
            kind: node.kind,
            children: if node.is_folder() {
                build_tree(nodes, Some(&node.id), depth + 1)
            } else {
                Vec::new()
            },
        })
        .collect()
}

fn render_tree(entries: &[TreeEntry<'_>], indent: usize, out: &mut String) {
    for entry in entries {
        out.push_str(&"  ".repeat(indent));
        out.push_str(entry.name);
        if entry.kind == FileKind::Folder {
            out.push('/');
        }
        out.push('\n');
        render_tree(&entry.children, indent + 1, out);
    }
}

fn lookup<'a>(project: &'a Project, path: &str) -> Result<&'a FileNode> {
    project
        .find_by_path(path)
        .with_context(|| format!("no such path: {}", normalize_path(path)))
}

pub fn tree(globals: &Globals, json: bool) -> Result<()> {
    let store = globals.open_store()?;
    let project = store.project();
    let entries = build_tree(&project.files, None, 0);

    if json {
        println!("{}", globals.to_json(&entries)?);
    } else {
        let mut out = format!("{} ({} files)\n", project.name, project.file_count());
        render_tree(&entries, 0, &mut out);
        print!("{}", out);
    }
    Ok(())
}

pub fn show(globals: &Globals, path: &str) -> Result<()> {
    let store = globals.open_store()?;
    let node = lookup(store.project(), path)?;
    if node.is_folder() {
        anyhow::bail!("{} is a folder", node.path);
    }
    print!("{}", node.content);
    if !node.content.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// The normalized path if writing content there would land in a file.
///
/// A dotless final segment would be materialized as a folder, and a file
/// can't have children, so both are refused before anything is touched.
fn writable_path(project: &Project, path: &str) -> Result<String> {
    let normalized = normalize_path(path);
    if normalized.is_empty() {
        anyhow::bail!("invalid path: {:?}", path);
    }
    let (parent, name) = match normalized.rsplit_once('/') {
        Some((parent, name)) => (Some(parent), name),
        None => (None, normalized.as_str()),
    };

    if let Some(node) = project.find_by_path(&normalized)
        && node.is_folder()
    {
        anyhow::bail!("{} is a folder", node.path);
    }
    if !name.contains('.') {
        anyhow::bail!("{} has no extension and would be created as a folder", normalized);
    }
    if let Some(parent) = parent {
        let mut prefix = String::new();
        for segment in parent.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            if let Some(node) = project.find_by_path(&prefix)
                && node.is_file()
            {
                anyhow::bail!("{} is a file, not a folder", node.path);
            }
        }
    }
    Ok(normalized)
}

pub fn write(
    globals: &Globals,
    path: &str,
    input: Option<&Path>,
    language: Option<&str>,
) -> Result<()> {
    let mut store = globals.open_store()?;
    let path = writable_path(store.project(), path)?;
    let content = read_input(input.unwrap_or(Path::new("-")))?;

    if store.upsert_file_content(&path, &content, language)? {
        println!("wrote {}", path);
    } else {
        println!("unchanged {}", path);
    }
    Ok(())
}

pub fn rename(globals: &Globals, path: &str, new_name: &str) -> Result<()> {
    let mut store = globals.open_store()?;
    let node = lookup(store.project(), path)?;
    let (id, old_path) = (node.id.clone(), node.path.clone());
    if node.name == new_name {
        println!("unchanged {}", old_path);
        return Ok(());
    }

    if !store.rename_node(&id, new_name)? {
        anyhow::bail!(
            "cannot rename {} to {:?}: invalid name or the target already exists",
            old_path,
            new_name
        );
    }
    let renamed = store
        .project()
        .find_by_id(&id)
        .map(|n| n.path.clone())
        .unwrap_or_default();
    println!("renamed {} -> {}", old_path, renamed);
    Ok(())
}

pub fn delete(globals: &Globals, path: &str) -> Result<()> {
    let mut store = globals.open_store()?;
    let node = lookup(store.project(), path)?;
    let id = node.id.clone();
    let removed = descendants(&store.project().files, &id).len();
    let node_path = node.path.clone();

    store.delete_node(&id)?;
    println!("deleted {} ({} nodes)", node_path, removed);
    Ok(())
}

pub fn new(globals: &Globals, name: Option<&str>) -> Result<()> {
    let mut store = globals.open_store()?;
    store.new_project(name)?;
    println!(
        "Started \"{}\" ({} files)",
        store.project().name,
        store.project().file_count()
    );
    Ok(())
}

/// Join a project path under `root`, refusing anything that would escape it.
fn export_target(root: &Path, project_path: &str) -> Option<PathBuf> {
    let relative = Path::new(project_path);
    if relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        Some(root.join(relative))
    } else {
        None
    }
}

pub fn export(globals: &Globals, output: &Path) -> Result<()> {
    let store = globals.open_store()?;
    let project = store.project();
    let mut written = 0usize;

    for node in &project.files {
        let Some(target) = export_target(output, &node.path) else {
            tracing::warn!(path = %node.path, "skipping path outside export root");
            continue;
        };
        match node.kind {
            FileKind::Folder => std::fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {:?}", target))?,
            FileKind::File => {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {:?}", parent))?;
                }
                std::fs::write(&target, &node.content)
                    .with_context(|| format!("Failed to write {:?}", target))?;
                written += 1;
            }
        }
    }

    println!("exported {} files to {}", written, output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_render_template_tree() {
        let project = Project::default_template(Utc::now());
        let entries = build_tree(&project.files, None, 0);
        let mut out = String::new();
        render_tree(&entries, 0, &mut out);
        assert_eq!(
            out,
            "src/\n  App.tsx\n  index.css\n  main.tsx\nindex.html\npackage.json\n"
        );
    }

    #[test]
    fn test_tree_json_shape() {
        let project = Project::default_template(Utc::now());
        let entries = build_tree(&project.files, None, 0);
        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(json[0]["type"], "folder");
        assert_eq!(json[0]["children"].as_array().unwrap().len(), 3);
        assert!(json[1].get("children").is_none());
    }

    #[test]
    fn test_writable_path() {
        let project = Project::default_template(Utc::now());
        assert_eq!(
            writable_path(&project, " ./src//lib/util.ts").unwrap(),
            "src/lib/util.ts"
        );
        assert_eq!(writable_path(&project, "index.html").unwrap(), "index.html");

        let err = writable_path(&project, "Dockerfile").unwrap_err().to_string();
        assert!(err.contains("no extension"));
        let err = writable_path(&project, "src").unwrap_err().to_string();
        assert!(err.contains("is a folder"));
        let err = writable_path(&project, "index.html/x.ts").unwrap_err().to_string();
        assert!(err.contains("is a file"));
        assert!(writable_path(&project, " / ").is_err());
    }

    #[test]
    fn test_export_target_rejects_escapes() {
        let root = Path::new("/tmp/out");
        assert_eq!(
            export_target(root, "src/App.tsx"),
            Some(PathBuf::from("/tmp/out/src/App.tsx"))
        );
        assert!(export_target(root, "../etc/passwd").is_none());
        assert!(export_target(root, "/etc/passwd").is_none());
    }
}
