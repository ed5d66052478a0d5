//! Path utilities shared by pattern compilation, matching and navigation
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

/// Splits a path into its lower-cased, non-empty segments
///
/// Leading, trailing and repeated slashes never produce segments, so
/// `/Racks//65000/` and `racks/65000` split identically. Route templates and
/// dispatched paths both go through this function, which is what makes
/// matching case-insensitive.
///
/// # Examples
///
/// ```
/// use rackd_router::path::split;
///
/// assert_eq!(split("/Racks//65000/"), vec!["racks", "65000"]);
/// assert!(split("/").is_empty());
/// assert!(split("").is_empty());
/// ```
pub fn split(path: &str) -> Vec<String> {
    path.to_lowercase()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolves `target` against `current`, the way a relative link is followed
///
/// Returns `None` (no navigation) when either path is empty. An absolute
/// target (leading `/`) is returned as-is. Otherwise each target segment is
/// applied to the segments of `current`: `..` drops the last one (never below
/// the root), `.` is ignored and anything else is appended.
///
/// # Examples
///
/// ```
/// use rackd_router::path::navigate;
///
/// assert_eq!(navigate("/racks/65000/nodes", "../lans").as_deref(), Some("/racks/65000/lans"));
/// assert_eq!(navigate("/a/b", "/c").as_deref(), Some("/c"));
/// assert_eq!(navigate("/a", "../../x").as_deref(), Some("/x"));
/// assert_eq!(navigate("", "x"), None);
/// ```
pub fn navigate(current: &str, target: &str) -> Option<String> {
    if current.is_empty() || target.is_empty() {
        return None;
    }

    if target.starts_with('/') {
        return Some(target.to_string());
    }

    let resolved = split(target)
        .into_iter()
        .fold(split(current), |mut segments, part| {
            match part.as_str() {
                ".." => {
                    segments.pop();
                }
                "." => {}
                _ => segments.push(part),
            }
            segments
        });

    Some(format!("/{}", resolved.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lowercases_and_drops_empty_segments() {
        assert_eq!(split("/Racks/AS65000/Nodes"), vec!["racks", "as65000", "nodes"]);
        assert_eq!(split("//racks///65000//"), vec!["racks", "65000"]);
        assert_eq!(split("racks"), vec!["racks"]);
    }

    #[test]
    fn test_split_root_and_empty() {
        assert!(split("/").is_empty());
        assert!(split("///").is_empty());
        assert!(split("").is_empty());
    }

    #[test]
    fn test_navigate_sibling() {
        assert_eq!(
            navigate("/racks/65000/nodes", "../lans").as_deref(),
            Some("/racks/65000/lans")
        );
    }

    #[test]
    fn test_navigate_child_and_dot() {
        assert_eq!(navigate("/racks", "65000").as_deref(), Some("/racks/65000"));
        assert_eq!(navigate("/racks", "./65000/./wans").as_deref(), Some("/racks/65000/wans"));
    }

    #[test]
    fn test_navigate_absolute_target_is_untouched() {
        assert_eq!(navigate("/a/b", "/c").as_deref(), Some("/c"));
        // Absolute targets keep their original casing and slashes
        assert_eq!(navigate("/a/b", "/Racks/").as_deref(), Some("/Racks/"));
    }

    #[test]
    fn test_navigate_never_climbs_above_root() {
        assert_eq!(navigate("/a", "../../x").as_deref(), Some("/x"));
        assert_eq!(navigate("/", "..").as_deref(), Some("/"));
        assert_eq!(navigate("/a/b", "../../../..").as_deref(), Some("/"));
    }

    #[test]
    fn test_navigate_relative_result_is_lowercased() {
        assert_eq!(navigate("/Racks/65000", "../WANS").as_deref(), Some("/racks/wans"));
    }

    #[test]
    fn test_navigate_empty_inputs() {
        assert_eq!(navigate("", "lans"), None);
        assert_eq!(navigate("/racks", ""), None);
        assert_eq!(navigate("", ""), None);
    }
}
