use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a node is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Folder,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::File => write!(f, "file"),
            FileKind::Folder => write!(f, "folder"),
        }
    }
}

/// One file or folder in a project's synthetic tree.
///
/// Nodes live in a flat list owned by [`Project`]; `parent_id` is a weak
/// reference by id to the containing folder, never an owning pointer.
///
/// # JSON shape
///
/// ```json
/// {
///   "id": "src_App_tsx",
///   "name": "App.tsx",
///   "content": "export default function App() {}",
///   "language": "typescript",
///   "path": "src/App.tsx",
///   "lastModified": "2026-01-29T10:00:00Z",
///   "type": "file",
///   "parentId": "src"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub language: String,
    /// Full slash-separated path from the project root.
    pub path: String,
    pub last_modified: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: FileKind,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl FileNode {
    pub fn folder(
        id: impl Into<String>,
        path: impl Into<String>,
        parent_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let path = path.into();
        Self {
            id: id.into(),
            name: last_segment(&path).to_string(),
            content: String::new(),
            language: String::new(),
            path,
            last_modified: now,
            kind: FileKind::Folder,
            parent_id,
        }
    }

    pub fn file(
        id: impl Into<String>,
        path: impl Into<String>,
        parent_id: Option<String>,
        content: impl Into<String>,
        language: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let path = path.into();
        Self {
            id: id.into(),
            name: last_segment(&path).to_string(),
            content: content.into(),
            language: language.into(),
            path,
            last_modified: now,
            kind: FileKind::File,
            parent_id,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == FileKind::Folder
    }

    /// Depth from the root: `index.html` is 0, `src/App.tsx` is 1.
    pub fn depth(&self) -> usize {
        self.path.matches('/').count()
    }
}

/// A named, timestamped owner of a flat file-node collection.
///
/// Every mutating operation (see the `impl` in `project.rs`) takes `&self`
/// and returns a new snapshot, so a caller can persist or diff the before
/// and after states freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub files: Vec<FileNode>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

pub(crate) fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
