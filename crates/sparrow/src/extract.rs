//! Extraction of declared file paths and fenced code blocks from model output.
//!
//! Extraction is lossy on purpose: malformed or unterminated fences simply
//! produce nothing, and an empty result is a valid answer.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::lang::extension_for_language;

/// A fenced code block pulled out of a model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: String,
    pub filename: String,
    /// Fence body with surrounding whitespace trimmed. Never empty.
    pub content: String,
}

/// "File Structure" as a markdown heading line. Prose mentions don't count.
static STRUCTURE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*#{1,6}[ \t]*File[ \t]*Structure").unwrap());

/// Bullet entries that look like `- src/App.tsx` or ``* `package.json` ``.
static STRUCTURE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*[-*][ \t]*`?([A-Za-z0-9._/-]+\.[A-Za-z0-9]+)").unwrap()
});

/// Fence opener carrying a `file=` / `file:` annotation.
static FENCE_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"```\w+\s*(?:file[=:]?\s*["']?([^"'\n]+)["']?)?\s*\n"#).unwrap()
});

/// Complete fenced block: language, optional filename, body.
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"```(\w+)?\s*(?:file[=:]?\s*["']?([^"'\n]+)["']?)?\s*\n([\s\S]*?)```"#).unwrap()
});

/// Declared file paths, in order of first appearance, without duplicates.
///
/// Bullets under a "File Structure" heading come first (the section ends at
/// the next `##`). Filenames annotated on fence openers are always appended
/// afterwards, whether or not a structure section exists.
///
/// # Examples
///
/// ```
/// use sparrow::extract_file_paths;
///
/// let reply = "## File Structure\n- package.json\n- src/App.tsx\n\n## Notes\n- not/a/file.rs\n";
/// assert_eq!(extract_file_paths(reply), vec!["package.json", "src/App.tsx"]);
/// ```
pub fn extract_file_paths(text: &str) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();

    if let Some(section) = structure_section(text) {
        for caps in STRUCTURE_ENTRY.captures_iter(section) {
            push_unique(&mut files, &caps[1]);
        }
    }

    for caps in FENCE_ANNOTATION.captures_iter(text) {
        if let Some(name) = caps.get(1) {
            let filename = clean_filename(name.as_str());
            if !filename.is_empty() {
                push_unique(&mut files, filename);
            }
        }
    }

    files
}

/// Fenced code blocks in document order.
///
/// Later blocks for the same filename are overwrites; resolving them is
/// the caller's job.
///
/// # Examples
///
/// ```
/// use sparrow::extract_code_blocks;
///
/// let reply = "```css file=\"src/index.css\"\nbody { margin: 0 }\n```\n\n```python\nprint(1)\n```\n";
/// let blocks = extract_code_blocks(reply);
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0].filename, "src/index.css");
/// assert_eq!(blocks[1].filename, "untitled.txt");
/// ```
pub fn extract_code_blocks(text: &str) -> Vec<CodeBlock> {
    FENCED_BLOCK
        .captures_iter(text)
        .filter_map(|caps| {
            let content = caps.get(3).map(|m| m.as_str().trim()).unwrap_or_default();
            if content.is_empty() {
                return None;
            }

            let language = caps
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "text".to_string());

            let filename = caps
                .get(2)
                .map(|m| clean_filename(m.as_str()).to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("untitled.{}", extension_for_language(&language)));

            Some(CodeBlock {
                language,
                filename,
                content: content.to_string(),
            })
        })
        .collect()
}

fn structure_section(text: &str) -> Option<&str> {
    let heading = STRUCTURE_HEADING.find(text)?;
    let rest = &text[heading.end()..];
    let end = rest.find("##").unwrap_or(rest.len());
    Some(&rest[..end])
}

fn push_unique(files: &mut Vec<String>, path: &str) {
    if !files.iter().any(|f| f == path) {
        files.push(path.to_string());
    }
}

/// Strips one surrounding quote on each side, then whitespace.
fn clean_filename(raw: &str) -> &str {
    let raw = raw.trim();
    let raw = raw.strip_prefix(['"', '\'']).unwrap_or(raw);
    let raw = raw.strip_suffix(['"', '\'']).unwrap_or(raw);
    raw.trim()
}
