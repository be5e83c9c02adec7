use std::path::Path;

/// Normalize a content path to a node key.
///
/// Converts a file path to a normalized key string by:
/// - Converting backslashes to forward slashes (Windows compatibility)
/// - Removing the file extension
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use taxonomy_core::normalize_path_to_key;
///
/// assert_eq!(normalize_path_to_key(Path::new("posts/hello.md")), "posts/hello");
/// assert_eq!(normalize_path_to_key(Path::new("note.md")), "note");
/// ```
pub fn normalize_path_to_key(path: &Path) -> String {
    let mut s = path.with_extension("").to_string_lossy().to_string();
    if std::path::MAIN_SEPARATOR == '\\' {
        s = s.replace('\\', "/");
    }
    s
}
