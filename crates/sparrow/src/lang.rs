//! Lookup tables between fence language tags, file extensions, and the
//! editor language names stored on file nodes.

/// File extension for a fence language tag, used to name blocks that carry
/// no filename. Unknown languages map to `txt`.
pub fn extension_for_language(language: &str) -> &'static str {
    match language.to_ascii_lowercase().as_str() {
        "html" => "html",
        "css" => "css",
        "javascript" | "js" => "js",
        "typescript" | "ts" => "ts",
        "jsx" => "jsx",
        "tsx" => "tsx",
        "json" => "json",
        _ => "txt",
    }
}

/// Editor language for a filename, inferred from its extension.
pub fn language_for_filename(filename: &str) -> &'static str {
    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return "text",
    };
    match ext.as_str() {
        "html" => "html",
        "css" => "css",
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "json" => "json",
        _ => "text",
    }
}
