use chrono::Utc;
use sparrow::{CodeBlock, Project, ProjectSink, SinkError};

use crate::error::Result;
use crate::keys::CURRENT_PROJECT_KEY;
use crate::kv::KeyValueStore;

/// Owns the active project and persists a full snapshot after every change.
///
/// Mutations return `Ok(true)` when they produced a new snapshot (which has
/// been written) and `Ok(false)` when they were no-ops, e.g. an unknown id.
/// No-ops write nothing.
#[derive(Debug)]
pub struct ProjectStore<K: KeyValueStore> {
    kv: K,
    project: Project,
}

impl<K: KeyValueStore> ProjectStore<K> {
    /// Load the stored project, or create and store the default one.
    ///
    /// A missing, unreadable, or corrupt snapshot is logged and replaced;
    /// only a failure to write the replacement is an error.
    pub fn open(kv: K) -> Result<Self> {
        match load_snapshot(&kv) {
            Some(project) => Ok(Self { kv, project }),
            None => {
                let mut store = Self {
                    kv,
                    project: Project::default_template(Utc::now()),
                };
                store.persist()?;
                Ok(store)
            }
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn kv_mut(&mut self) -> &mut K {
        &mut self.kv
    }

    pub fn into_inner(self) -> (K, Project) {
        (self.kv, self.project)
    }

    /// Write the whole snapshot.
    pub fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.project)?;
        self.kv.set(CURRENT_PROJECT_KEY, &json)?;
        tracing::debug!(
            project = %self.project.id,
            nodes = self.project.files.len(),
            "persisted project snapshot"
        );
        Ok(())
    }

    fn commit(&mut self, next: Project) -> Result<bool> {
        if next == self.project {
            return Ok(false);
        }
        self.project = next;
        self.persist()?;
        Ok(true)
    }

    pub fn upsert_file_content(
        &mut self,
        path: &str,
        content: &str,
        language: Option<&str>,
    ) -> Result<bool> {
        let next = self
            .project
            .upsert_file_content(path, content, language, Utc::now());
        self.commit(next)
    }

    pub fn update_file_content(&mut self, id: &str, content: &str) -> Result<bool> {
        let next = self.project.update_file_content(id, content, Utc::now());
        self.commit(next)
    }

    pub fn rename_node(&mut self, id: &str, new_name: &str) -> Result<bool> {
        let next = self.project.rename_node(id, new_name, Utc::now());
        self.commit(next)
    }

    pub fn delete_node(&mut self, id: &str) -> Result<bool> {
        let next = self.project.delete_node(id, Utc::now());
        self.commit(next)
    }

    pub fn create_project_files<S: AsRef<str>>(&mut self, paths: &[S]) -> Result<bool> {
        let next = self.project.materialize_paths(paths, Utc::now());
        self.commit(next)
    }

    /// Swap in a whole project.
    pub fn replace_project(&mut self, project: Project) -> Result<bool> {
        self.commit(project)
    }

    /// Start over from the default template, optionally renamed.
    pub fn new_project(&mut self, name: Option<&str>) -> Result<bool> {
        let mut project = Project::default_template(Utc::now());
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            project.name = name.trim().to_string();
        }
        self.commit(project)
    }

    /// Start over from the default template, owned by a chat session.
    pub fn new_session_project(&mut self, id: &str, name: &str) -> Result<bool> {
        let mut project = Project::default_template(Utc::now());
        project.id = id.to_string();
        project.name = name.to_string();
        self.commit(project)
    }
}

fn load_snapshot<K: KeyValueStore>(kv: &K) -> Option<Project> {
    let raw = match kv.get(CURRENT_PROJECT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read saved project");
            return None;
        }
    };

    match serde_json::from_str::<Project>(&raw) {
        Ok(project) => Some(project),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load saved project");
            None
        }
    }
}

/// Generation results land here: the chat side calls straight into the
/// store, and each call persists.
impl<K: KeyValueStore> ProjectSink for ProjectStore<K> {
    fn create_project_files(&mut self, paths: &[String]) -> std::result::Result<(), SinkError> {
        ProjectStore::create_project_files(self, paths)?;
        Ok(())
    }

    fn code_generated(&mut self, block: &CodeBlock) -> std::result::Result<(), SinkError> {
        self.upsert_file_content(&block.filename, &block.content, Some(&block.language))?;
        Ok(())
    }
}
