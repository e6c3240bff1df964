//! Repository path helpers.
//!
//! Repository paths are `/`-separated strings such as
//! `/sitecore/content/site1/home`. The helpers here never decode; decoding
//! lives in [`NameDecoder`](super::NameDecoder).

/// Join two path segments with exactly one `/` at the seam.
///
/// An empty side yields the other side unchanged, and so does a right side
/// made only of `/`: joining the root local path adds nothing.
///
/// # Examples
/// ```
/// use itemroute::core::join_path;
/// assert_eq!(join_path("/content/site1", "/home"), "/content/site1/home");
/// assert_eq!(join_path("/content/site1/", "home"), "/content/site1/home");
/// assert_eq!(join_path("", "/home"), "/home");
/// assert_eq!(join_path("/content", ""), "/content");
/// assert_eq!(join_path("/content/site1", "/"), "/content/site1");
/// ```
pub fn join_path(left: &str, right: &str) -> String {
    if left.is_empty() {
        return right.to_string();
    }
    let right = right.trim_start_matches('/');
    if right.is_empty() {
        return left.to_string();
    }
    format!("{}/{}", left.trim_end_matches('/'), right)
}

/// Split a path into its first segment and the remainder.
///
/// The path must start with `/`. The anchor runs up to (not including) the
/// next `/`; the remainder keeps that separator. Returns `None` when either
/// condition does not hold.
///
/// `/sitecore/content/home` -> (`/sitecore`, `/content/home`)
pub fn split_anchor(path: &str) -> Option<(&str, &str)> {
    if !path.starts_with('/') {
        return None;
    }
    let idx = path[1..].find('/')? + 1;
    Some((&path[..idx], &path[idx..]))
}

/// Split a request target into path and query string.
pub fn split_query(target: &str) -> (&str, Option<&str>) {
    let target = target.split('#').next().unwrap_or(target);
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

/// Derive the site-local path from a request path.
///
/// Strips the query string, removes one of `strip_extensions` from the last
/// segment and drops a trailing `/` (the root stays `/`). The result is not
/// decoded.
pub fn local_path(url_path: &str, strip_extensions: &[String]) -> String {
    let (path, _) = split_query(url_path);
    let trimmed = path.trim();

    if trimmed.is_empty() || trimmed == "/" {
        return "/".to_string();
    }

    let with_leading = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };

    let mut local = with_leading.trim_end_matches('/').to_string();
    if local.is_empty() {
        return "/".to_string();
    }

    let last_slash = local.rfind('/').unwrap_or(0);
    if let Some(dot) = local[last_slash..].rfind('.') {
        let ext = &local[last_slash + dot + 1..];
        if strip_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            local.truncate(last_slash + dot);
        }
    }

    if local.is_empty() {
        "/".to_string()
    } else {
        local
    }
}
