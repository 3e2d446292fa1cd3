//! Shared helpers for filesystem operations.

/// Append a single trailing `/` if missing.
///
/// Folder paths sent to the server always end with exactly one `/`.
/// Empty input is returned unchanged.
pub fn ensure_trailing_slash(path: &str) -> String {
    if path.is_empty() || path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Whether `path` ends in a file-extension-like suffix (`\.\w+$`).
pub(crate) fn has_extension(path: &str) -> bool {
    match path.rfind('.') {
        Some(idx) => {
            let suffix = &path[idx + 1..];
            !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

/// Last path segment, ignoring trailing slashes.
pub(crate) fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Extension of the last path segment, without the dot.
pub(crate) fn extension(path: &str) -> Option<&str> {
    let name = base_name(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => Some(&name[idx + 1..]),
        _ => None,
    }
}

/// Join a child name onto a folder path.
pub(crate) fn join(folder: &str, name: &str) -> String {
    format!("{}{}", ensure_trailing_slash(folder), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_trailing_slash() {
        assert_eq!(ensure_trailing_slash("/foo"), "/foo/");
        assert_eq!(ensure_trailing_slash("/foo/"), "/foo/");
        assert_eq!(ensure_trailing_slash("/"), "/");
        assert_eq!(ensure_trailing_slash(""), "");
    }

    #[test]
    fn test_ensure_trailing_slash_idempotent() {
        for input in ["/", "a", "/a/b", "/a/b/", "x.txt", "/a//"] {
            let once = ensure_trailing_slash(input);
            assert_eq!(ensure_trailing_slash(&once), once, "input {:?}", input);
            assert!(once.ends_with('/'));
        }
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("/remote/a.txt"));
        assert!(has_extension("/remote/archive.tar_gz"));
        assert!(has_extension("photo.JPG"));
        assert!(!has_extension("/remote/dir"));
        assert!(!has_extension("/remote.d/dir"));
        assert!(!has_extension("/remote/dir."));
        assert!(!has_extension("/remote/dir/"));
        assert!(!has_extension("/remote/a.tx-t"));
        assert!(!has_extension("/remote/dir.中文"));
    }

    #[test]
    fn test_base_name_and_extension() {
        assert_eq!(base_name("/local/a.txt"), "a.txt");
        assert_eq!(base_name("/remote/dir/"), "dir");
        assert_eq!(base_name("a.txt"), "a.txt");
        assert_eq!(extension("/local/a.txt"), Some("txt"));
        assert_eq!(extension("/local/.hidden"), None);
        assert_eq!(extension("/local.d/file"), None);
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/dir", "a.txt"), "/dir/a.txt");
        assert_eq!(join("/dir/", "a.txt"), "/dir/a.txt");
    }
}
