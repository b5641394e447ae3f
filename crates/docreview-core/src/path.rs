//! Helpers for '/'-delimited store paths.
//!
//! Store paths are opaque strings to the traversal; these helpers only ever split on '/'.

/// Strip trailing separators. The bare root `/` is kept as-is.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn join_path(parent: &str, child: &str) -> String {
    let child = child.trim_matches('/');
    if parent.is_empty() {
        child.to_string()
    } else if parent.ends_with('/') {
        format!("{parent}{child}")
    } else {
        format!("{parent}/{child}")
    }
}

/// Last path segment; empty for the root.
pub fn simple_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_bare_root() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("///"), "/");
        assert_eq!(normalize_path("/a/b/"), "/a/b");
        assert_eq!(normalize_path("a"), "a");
        assert_eq!(normalize_path(""), "");
    }

    #[test]
    fn join_handles_root_and_relative_parents() {
        assert_eq!(join_path("/", "a"), "/a");
        assert_eq!(join_path("/a", "b"), "/a/b");
        assert_eq!(join_path("", "b"), "b");
        assert_eq!(join_path("a/", "b"), "a/b");
    }

    #[test]
    fn simple_name_is_last_segment() {
        assert_eq!(simple_name("/Delte Dokumenter/Sager/GEO-2024-123456"), "GEO-2024-123456");
        assert_eq!(simple_name("GEO-2024-123456"), "GEO-2024-123456");
        assert_eq!(simple_name("/a/b/"), "b");
        assert_eq!(simple_name("/"), "");
    }
}
