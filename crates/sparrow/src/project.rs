//! Snapshot operations on [`Project`].
//!
//! Each operation takes `&self` and returns the next snapshot. Operations
//! addressed at an unknown id are silent no-ops that return an unchanged
//! copy; callers that need to know can compare the result with the input
//! or check [`Project::find_by_id`] first.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::tree::{descendants, ensure_path_exists, normalize_path};
use crate::types::{FileNode, Project, last_segment};

impl Project {
    /// A project with no files.
    pub fn empty(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis().to_string(),
            name: name.into(),
            description: String::new(),
            files: Vec::new(),
            created_at: now,
            last_modified: now,
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&FileNode> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn find_by_path(&self, path: &str) -> Option<&FileNode> {
        let path = normalize_path(path);
        self.files.iter().find(|f| f.path == path)
    }

    /// Number of file (not folder) nodes.
    pub fn file_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_file()).count()
    }

    /// Path → content for every file, folders excluded, ordered by path.
    pub fn file_map(&self) -> BTreeMap<String, String> {
        self.files
            .iter()
            .filter(|f| f.is_file())
            .map(|f| (f.path.clone(), f.content.clone()))
            .collect()
    }

    /// Materialize each declared path once.
    pub fn materialize_paths<S: AsRef<str>>(&self, paths: &[S], now: DateTime<Utc>) -> Project {
        let mut next = self.clone();
        for path in paths {
            ensure_path_exists(&mut next.files, path.as_ref(), now);
        }
        next.last_modified = now;
        next
    }

    /// Create `path` if needed, then overwrite its content.
    ///
    /// The language is replaced only when one is supplied and non-empty. If
    /// the path materializes as a folder (its last segment has no `.`), no
    /// content is written.
    pub fn upsert_file_content(
        &self,
        path: &str,
        content: &str,
        language: Option<&str>,
        now: DateTime<Utc>,
    ) -> Project {
        let path = normalize_path(path);
        let mut next = self.clone();
        ensure_path_exists(&mut next.files, &path, now);

        match next.files.iter_mut().find(|f| f.path == path) {
            Some(file) if file.is_file() => {
                file.content = content.to_string();
                if let Some(lang) = language.filter(|l| !l.is_empty()) {
                    file.language = lang.to_string();
                }
                file.last_modified = now;
            }
            Some(_) => {
                tracing::debug!(%path, "path materialized as a folder; content not written");
            }
            None => {}
        }

        next.last_modified = now;
        next
    }

    /// Replace a file's content by id.
    pub fn update_file_content(&self, id: &str, content: &str, now: DateTime<Utc>) -> Project {
        let mut next = self.clone();
        if let Some(file) = next.files.iter_mut().find(|f| f.id == id && f.is_file()) {
            file.content = content.to_string();
            file.last_modified = now;
            next.last_modified = now;
        }
        next
    }

    /// Rename a node in place, keeping its folder.
    ///
    /// Only the last path segment changes. Descendants are matched by the
    /// literal prefix `old_path + "/"` and rewritten onto the new path, so a
    /// sibling like `foobar` is untouched when `foo` is renamed.
    ///
    /// No-op when the id is unknown, when `new_name` is empty or contains a
    /// `/`, or when another node already owns the resulting path.
    ///
    /// ```
    /// use chrono::Utc;
    /// use sparrow::Project;
    ///
    /// let now = Utc::now();
    /// let p = Project::empty("demo", now)
    ///     .materialize_paths(&["src/App.tsx", "src/App.tsx2"], now);
    /// let id = p.find_by_path("src/App.tsx").unwrap().id.clone();
    ///
    /// let p = p.rename_node(&id, "Main.tsx", now);
    /// assert!(p.find_by_path("src/Main.tsx").is_some());
    /// assert!(p.find_by_path("src/App.tsx2").is_some());
    /// ```
    pub fn rename_node(&self, id: &str, new_name: &str, now: DateTime<Utc>) -> Project {
        let new_name = new_name.trim();
        let Some(node) = self.find_by_id(id) else {
            return self.clone();
        };
        if new_name.is_empty() || new_name.contains('/') {
            return self.clone();
        }

        let old_path = node.path.clone();
        let new_path = match old_path.rsplit_once('/') {
            Some((dir, _)) => format!("{}/{}", dir, new_name),
            None => new_name.to_string(),
        };
        if new_path == old_path {
            return self.clone();
        }
        if self.files.iter().any(|f| f.path == new_path) {
            tracing::debug!(%old_path, %new_path, "rename target already exists");
            return self.clone();
        }

        let prefix = format!("{}/", old_path);
        let mut next = self.clone();
        for file in &mut next.files {
            if file.id == id {
                file.name = new_name.to_string();
                file.path = new_path.clone();
                file.last_modified = now;
            } else if let Some(rest) = file.path.strip_prefix(&prefix) {
                file.path = format!("{}/{}", new_path, rest);
                file.name = last_segment(&file.path).to_string();
                file.last_modified = now;
            }
        }
        next.last_modified = now;
        next
    }

    /// Remove a node and its full transitive descendant set.
    pub fn delete_node(&self, id: &str, now: DateTime<Utc>) -> Project {
        let doomed = descendants(&self.files, id);
        if doomed.is_empty() {
            return self.clone();
        }

        let mut next = self.clone();
        next.files.retain(|f| !doomed.contains(&f.id));
        next.last_modified = now;
        next
    }
}
