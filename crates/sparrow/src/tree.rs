//! Path materialization and traversal over the flat, parent-linked node list.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::lang::language_for_filename;
use crate::types::FileNode;

/// Placeholder body for files that are declared before any code arrives.
pub fn placeholder_content(name: &str) -> String {
    format!("// {} - Generated by Sparrow AI", name)
}

/// Stable node id for a path: every character that is not ASCII
/// alphanumeric becomes `_`.
///
/// ```
/// assert_eq!(sparrow::tree::node_id_for_path("src/App.tsx"), "src_App_tsx");
/// ```
pub fn node_id_for_path(path: &str) -> String {
    path.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Canonical form of a slash-separated path: surrounding whitespace, empty
/// segments, and `.` segments are dropped.
///
/// ```
/// assert_eq!(sparrow::tree::normalize_path(" ./src//App.tsx "), "src/App.tsx");
/// ```
pub fn normalize_path(path: &str) -> String {
    path.trim()
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Ensure every folder and file implied by `full_path` exists in `nodes`.
///
/// Segments are walked left to right. A missing prefix becomes a folder,
/// except the final segment, which becomes a file when it contains a `.`.
/// A dotless final segment is therefore a folder and a dotted intermediate
/// segment is still a folder. New files get placeholder content and a
/// language inferred from their extension.
///
/// Idempotent: a second call with the same path adds nothing.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use sparrow::tree::ensure_path_exists;
///
/// let now = Utc::now();
/// let mut nodes = Vec::new();
/// ensure_path_exists(&mut nodes, "src/components/Button.tsx", now);
/// ensure_path_exists(&mut nodes, "src/components/Button.tsx", now);
///
/// let paths: Vec<&str> = nodes.iter().map(|n| n.path.as_str()).collect();
/// assert_eq!(paths, vec!["src", "src/components", "src/components/Button.tsx"]);
/// assert_eq!(nodes[2].parent_id.as_deref(), Some("src_components"));
/// ```
pub fn ensure_path_exists(nodes: &mut Vec<FileNode>, full_path: &str, now: DateTime<Utc>) {
    let normalized = normalize_path(full_path);
    if normalized.is_empty() {
        return;
    }

    let segments: Vec<&str> = normalized.split('/').collect();
    let mut current = String::new();
    let mut parent_id: Option<String> = None;

    for (i, segment) in segments.iter().enumerate() {
        if !current.is_empty() {
            current.push('/');
        }
        current.push_str(segment);

        if let Some(existing) = nodes.iter().find(|n| n.path == current) {
            parent_id = Some(existing.id.clone());
            continue;
        }

        let is_last = i == segments.len() - 1;
        let id = unique_id(nodes, &current);
        let node = if is_last && segment.contains('.') {
            FileNode::file(
                id.clone(),
                current.clone(),
                parent_id.clone(),
                placeholder_content(segment),
                language_for_filename(segment),
                now,
            )
        } else {
            FileNode::folder(id.clone(), current.clone(), parent_id.clone(), now)
        };
        tracing::debug!(path = %current, kind = %node.kind, "materialized node");
        nodes.push(node);
        parent_id = Some(id);
    }
}

/// The derived id for `path`, suffixed with `_2`, `_3`, ... if a different
/// path already owns it (e.g. `a_b` vs `a/b`, or a node renamed away from
/// its original path).
fn unique_id(nodes: &[FileNode], path: &str) -> String {
    let base = node_id_for_path(path);
    if !nodes.iter().any(|n| n.id == base) {
        return base;
    }
    (2..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !nodes.iter().any(|n| &n.id == candidate))
        .unwrap_or(base)
}

/// Walk the parent chain from `id`, nearest parent first.
///
/// The walk stops after `nodes.len()` hops, so a corrupt list with a cycle
/// cannot loop forever.
pub fn ancestors<'a>(nodes: &'a [FileNode], id: &str) -> Vec<&'a FileNode> {
    let mut result = Vec::new();
    let mut current = nodes.iter().find(|n| n.id == id);

    while let Some(node) = current {
        if result.len() >= nodes.len() {
            break;
        }
        current = node
            .parent_id
            .as_deref()
            .and_then(|pid| nodes.iter().find(|n| n.id == pid));
        if let Some(parent) = current {
            result.push(parent);
        }
    }

    result
}

/// `id` plus its full transitive descendant set.
///
/// Computed as a fixed point: the node list is rescanned, adding any node
/// whose parent is already in the set, until a pass adds nothing. The list
/// may be in any order. Returns an empty set for an unknown id.
pub fn descendants(nodes: &[FileNode], id: &str) -> HashSet<String> {
    let mut set = HashSet::new();
    if !nodes.iter().any(|n| n.id == id) {
        return set;
    }
    set.insert(id.to_string());

    loop {
        let mut changed = false;
        for node in nodes {
            if let Some(parent) = &node.parent_id
                && set.contains(parent)
                && !set.contains(&node.id)
            {
                set.insert(node.id.clone());
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    set
}

/// Direct children of `parent_id` (`None` for the root), folders first,
/// then by name.
pub fn children<'a>(nodes: &'a [FileNode], parent_id: Option<&str>) -> Vec<&'a FileNode> {
    let mut kids: Vec<&FileNode> = nodes
        .iter()
        .filter(|n| n.parent_id.as_deref() == parent_id)
        .collect();
    kids.sort_by(|a, b| {
        b.is_folder()
            .cmp(&a.is_folder())
            .then_with(|| a.name.cmp(&b.name))
    });
    kids
}
