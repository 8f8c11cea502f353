//! Path tokenization for the route tree.
//!
//! Segments are compared as exact text. No parameter or wildcard unification
//! happens here: `/:id` and `/:user_id` are different segments.

/// Trim whitespace and ensure a leading `/`. An empty path stays empty.
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Split a path into segments, dropping only the first empty element.
///
/// ```rust
/// use routegen::router::split_segments;
///
/// assert_eq!(split_segments("/api/user"), vec!["api", "user"]);
/// assert_eq!(split_segments("/"), vec![""]);
/// assert_eq!(split_segments("/api/"), vec!["api", ""]);
/// ```
pub fn split_segments(path: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = path.split('/').collect();
    if parts.len() > 1 && parts[0].is_empty() {
        parts.remove(0);
    }
    parts
}

/// Stored node text for a raw segment (separator included).
pub fn segment_text(segment: &str) -> String {
    format!("/{segment}")
}

/// Segment text without one leading separator; the bare `/` stays as is.
pub fn segment_label(segment_text: &str) -> &str {
    if segment_text.len() > 1 {
        segment_text.strip_prefix('/').unwrap_or(segment_text)
    } else {
        segment_text
    }
}

/// Comparison key for sibling ordering: leading non-alphanumerics stripped,
/// so `/:id` sorts as `id`.
pub fn sort_key(segment_text: &str) -> &str {
    segment_text.trim_start_matches(|c: char| !c.is_alphanumeric())
}

/// Join stored segment texts back into a full path.
pub fn join_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let joined: String = segments.into_iter().collect();
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("  api/user "), "/api/user");
        assert_eq!(normalize_path("/ping"), "/ping");
        assert_eq!(normalize_path("   "), "");
    }

    #[test]
    fn test_split_keeps_inner_and_trailing_empties() {
        assert_eq!(split_segments("/a//b"), vec!["a", "", "b"]);
        assert_eq!(split_segments("a/b"), vec!["a", "b"]);
    }

    #[test]
    fn test_segment_label_and_sort_key() {
        assert_eq!(segment_label("/:id"), ":id");
        assert_eq!(segment_label("/"), "/");
        assert_eq!(sort_key("/:id"), "id");
        assert_eq!(sort_key("/*path"), "path");
        assert_eq!(sort_key("/"), "");
    }

    #[test]
    fn test_join_segments() {
        assert_eq!(join_segments(["/api", "/user"]), "/api/user");
        assert_eq!(join_segments(Vec::<&str>::new()), "/");
    }
}
