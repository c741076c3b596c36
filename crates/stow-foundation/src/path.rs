//! Separator normalization and root-relative path arithmetic
//!
//! Paths are handled as `/`-separated strings. Nothing here touches the
//! filesystem or canonicalizes: symlinks and case folding are the host's
//! business.

/// Convert `\` separators to `/`
pub fn to_system_independent(path: &str) -> String {
    path.replace('\\', "/")
}

/// Normalize a root path: `/` separators, no trailing separator (except `/` itself)
pub fn normalize_root(root: &str) -> String {
    let root = to_system_independent(root);
    let trimmed = root.trim_end_matches('/');
    if trimmed.is_empty() && root.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Strip `root` from the front of `target`, only on a path-component boundary.
///
/// Returns the remainder (possibly empty, otherwise starting with `/`), or
/// `None` when `root` does not prefix `target`. Both arguments must already be
/// normalized.
pub fn strip_root<'a>(target: &'a str, root: &str) -> Option<&'a str> {
    let rest = target.strip_prefix(root)?;
    if rest.is_empty() || rest.starts_with('/') || root.ends_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// A root that contains a target, with the part of the target below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootMatch<'a> {
    pub index: usize,
    pub root: String,
    pub remainder: &'a str,
}

impl RootMatch<'_> {
    /// The target is the root itself
    pub fn is_root(&self) -> bool {
        self.remainder.is_empty() || self.remainder == "/"
    }
}

/// First root, in declared order, that contains `target`.
///
/// A remainder stepping upward through `..` is not contained, whatever its
/// prefix. `target` must already be normalized with [`to_system_independent`].
pub fn find_containing_root<'a, S: AsRef<str>>(
    roots: &[S],
    target: &'a str,
) -> Option<RootMatch<'a>> {
    roots.iter().enumerate().find_map(|(index, root)| {
        let root = normalize_root(root.as_ref());
        strip_root(target, &root)
            .filter(|remainder| !has_parent_segment(remainder))
            .map(|remainder| RootMatch {
                index,
                root,
                remainder,
            })
    })
}

/// Whether a relative path has a `..` segment
pub fn has_parent_segment(relative: &str) -> bool {
    relative.split('/').any(|segment| segment == "..")
}

/// Non-empty `/`-separated segments of a relative path, `.` skipped
pub fn segments(relative: &str) -> Vec<&str> {
    relative
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect()
}

/// Split a normalized path into parent and final component
pub fn split_parent(path: &str) -> (&str, &str) {
    let path = path.trim_end_matches('/');
    match path.rsplit_once('/') {
        Some(("", name)) => ("/", name),
        Some((parent, name)) => (parent, name),
        None => ("", path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_system_independent() {
        assert_eq!(to_system_independent(r"C:\proj\src\a"), "C:/proj/src/a");
        assert_eq!(to_system_independent("/proj/src"), "/proj/src");
    }

    #[test]
    fn test_normalize_root() {
        assert_eq!(normalize_root("/proj/src/"), "/proj/src");
        assert_eq!(normalize_root(r"C:\proj\src\"), "C:/proj/src");
        assert_eq!(normalize_root("/"), "/");
    }

    #[test]
    fn test_strip_root_respects_component_boundary() {
        assert_eq!(strip_root("/proj/src/a/b", "/proj/src"), Some("/a/b"));
        assert_eq!(strip_root("/proj/src", "/proj/src"), Some(""));
        assert_eq!(strip_root("/proj/src2/a", "/proj/src"), None);
        assert_eq!(strip_root("/other/a", "/proj/src"), None);
        assert_eq!(strip_root("/a", "/"), Some("a"));
    }

    #[test]
    fn test_first_matching_root_wins() {
        let roots = ["/proj", "/proj/src", "/elsewhere"];
        let found = find_containing_root(&roots, "/proj/src/pkg").unwrap();
        assert_eq!(found.index, 0);
        assert_eq!(found.remainder, "/src/pkg");

        let roots = ["/elsewhere", "/proj/src", "/proj"];
        let found = find_containing_root(&roots, "/proj/src/pkg").unwrap();
        assert_eq!(found.index, 1);
        assert_eq!(found.remainder, "/pkg");
    }

    #[test]
    fn test_no_containing_root() {
        let roots = ["/proj/src"];
        assert!(find_containing_root(&roots, "/tmp/pkg").is_none());
        let empty: [&str; 0] = [];
        assert!(find_containing_root(&empty, "/proj/src").is_none());
    }

    #[test]
    fn test_root_match_is_root() {
        let roots = ["/proj/src/"];
        assert!(find_containing_root(&roots, "/proj/src").unwrap().is_root());
        assert!(find_containing_root(&roots, "/proj/src/").unwrap().is_root());
        assert!(!find_containing_root(&roots, "/proj/src/a").unwrap().is_root());
    }

    #[test]
    fn test_segments_skip_empty_parts() {
        assert_eq!(segments("/a//b/"), vec!["a", "b"]);
        assert!(segments("").is_empty());
        assert!(segments("/").is_empty());
        assert_eq!(segments("./a/./b"), vec!["a", "b"]);
    }

    #[test]
    fn test_parent_segments_leave_the_root() {
        let roots = ["/proj/src", "/proj"];
        assert!(find_containing_root(&roots, "/proj/src/../lib/a.py").is_none());
        assert!(find_containing_root(&roots, "/proj/src/../outside/Base.py").is_none());
        assert!(find_containing_root(&roots, "/proj/src/a/..").is_none());
        assert!(find_containing_root(&roots, "/proj/src/a..b/c").is_some());
        assert!(has_parent_segment("a/../b"));
        assert!(!has_parent_segment("a/..b"));
    }

    #[test]
    fn test_split_parent() {
        assert_eq!(split_parent("/proj/src/a/b.py"), ("/proj/src/a", "b.py"));
        assert_eq!(split_parent("/b.py"), ("/", "b.py"));
        assert_eq!(split_parent("b.py"), ("", "b.py"));
        assert_eq!(split_parent("/proj/src/a/"), ("/proj/src", "a"));
    }
}
