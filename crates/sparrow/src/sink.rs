use chrono::Utc;

use crate::extract::CodeBlock;
use crate::types::Project;

/// Error type a sink may surface (typically a failed persistence write).
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Receiver for the results of a generation turn.
///
/// The chat side calls these directly, in order: `create_project_files`
/// once with every declared path (only when there are any), then
/// `code_generated` once per code block in document order.
pub trait ProjectSink {
    fn create_project_files(&mut self, paths: &[String]) -> Result<(), SinkError>;

    fn code_generated(&mut self, block: &CodeBlock) -> Result<(), SinkError>;

    /// Apply one extracted reply, stopping at the first failure.
    fn apply_generation(&mut self, paths: &[String], blocks: &[CodeBlock]) -> Result<(), SinkError> {
        if !paths.is_empty() {
            self.create_project_files(paths)?;
        }
        for block in blocks {
            self.code_generated(block)?;
        }
        Ok(())
    }
}

/// An in-memory project is its own sink; nothing is persisted.
impl ProjectSink for Project {
    fn create_project_files(&mut self, paths: &[String]) -> Result<(), SinkError> {
        *self = self.materialize_paths(paths, Utc::now());
        Ok(())
    }

    fn code_generated(&mut self, block: &CodeBlock) -> Result<(), SinkError> {
        *self = self.upsert_file_content(
            &block.filename,
            &block.content,
            Some(&block.language),
            Utc::now(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_as_sink() {
        let mut project = Project::empty("sink", Utc::now());
        project
            .create_project_files(&["src/App.tsx".to_string()])
            .unwrap();
        project
            .code_generated(&CodeBlock {
                language: "tsx".into(),
                filename: "src/App.tsx".into(),
                content: "export {}".into(),
            })
            .unwrap();

        let app = project.find_by_path("src/App.tsx").unwrap();
        assert_eq!(app.content, "export {}");
        assert_eq!(app.language, "tsx");
        assert_eq!(project.files.len(), 2);
    }

    #[test]
    fn test_apply_generation_declares_then_fills() {
        let mut project = Project::empty("sink", Utc::now());
        let blocks = vec![
            CodeBlock {
                language: "ts".into(),
                filename: "src/a.ts".into(),
                content: "1".into(),
            },
            CodeBlock {
                language: "ts".into(),
                filename: "src/a.ts".into(),
                content: "2".into(),
            },
        ];
        project
            .apply_generation(&["src/b.ts".to_string()], &blocks)
            .unwrap();

        assert_eq!(project.find_by_path("src/a.ts").unwrap().content, "2");
        assert!(project.find_by_path("src/b.ts").is_some());
        assert_eq!(project.file_count(), 2);
    }

    #[test]
    fn test_apply_generation_skips_empty_declaration() {
        struct Counting(usize);
        impl ProjectSink for Counting {
            fn create_project_files(&mut self, _: &[String]) -> Result<(), SinkError> {
                self.0 += 1;
                Ok(())
            }
            fn code_generated(&mut self, _: &CodeBlock) -> Result<(), SinkError> {
                Ok(())
            }
        }

        let mut sink = Counting(0);
        sink.apply_generation(&[], &[]).unwrap();
        assert_eq!(sink.0, 0);
    }
}
