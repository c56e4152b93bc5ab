#![doc = include_str!("../README.md")]

mod extract;
mod lang;
mod project;
mod sink;
mod template;
pub mod tree;
mod types;

pub use extract::{CodeBlock, extract_code_blocks, extract_file_paths};
pub use lang::{extension_for_language, language_for_filename};
pub use sink::{ProjectSink, SinkError};
pub use template::DEFAULT_ACTIVE_FILE;
pub use types::{FileKind, FileNode, Project};
