//! Common utility functions shared across the codebase.

use std::path::Path;

/// Join path components with `/`, regardless of platform.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use glean::utils::to_slash_path;
///
/// assert_eq!(to_slash_path(Path::new("locales/en/translation.json")), "locales/en/translation.json");
/// ```
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Check if a pattern contains glob wildcards (`*`, `?` or `[`).
/// Patterns without wildcards are treated as literal paths.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use crate::utils::*;

    #[test]
    fn test_to_slash_path() {
        assert_eq!(to_slash_path(Path::new("a/b/c.json")), "a/b/c.json");
        assert_eq!(to_slash_path(Path::new("./a/b")), "./a/b");
        assert_eq!(to_slash_path(Path::new("")), "");
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("**/*.spec.js"));
        assert!(is_glob_pattern("src/?.html"));
        assert!(is_glob_pattern("src/[ab].html"));
        assert!(!is_glob_pattern("src/vendor"));
    }
}
