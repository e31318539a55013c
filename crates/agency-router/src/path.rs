//! Path utilities for turning request paths into route slugs
//!
//! All functions are pure: same input, same output, no side effects.

use std::borrow::Cow;

/// Whether `path` is already canonical: rooted, no empty segments, no
/// backslashes, and no trailing slash unless it is the root itself
///
/// # Examples
///
/// ```
/// use agency_router::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/services"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("services"));
/// assert!(!is_valid_path("/services/"));
/// assert!(!is_valid_path("/services//web"));
/// ```
pub fn is_valid_path(path: &str) -> bool {
    let rooted = path.starts_with('/');
    let clean = !path.contains("//") && !path.contains('\\');
    rooted && clean && (path == "/" || !path.ends_with('/'))
}

/// Rewrite a sloppy request path into canonical form
///
/// Returns `Cow::Borrowed` when the input is already canonical.
///
/// - Trailing slashes: `/about/` → `/about`
/// - Double slashes: `//contact` → `/contact`
/// - Backslashes: `\blog` → `/blog`
/// - Missing leading slash: `careers` → `/careers`
///
/// ```
/// use agency_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
/// assert_eq!(normalize_path("\\blog\\"), "/blog");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let unified = path.replace('\\', "/");
    let segments: Vec<&str> = unified.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        [] => Cow::Borrowed("/"),
        _ => Cow::Owned(format!("/{}", segments.join("/"))),
    }
}

/// First segment of a path with query string and fragment removed
///
/// ```
/// use agency_router::path::route_slug;
///
/// assert_eq!(route_slug("/services/web?ref=nav"), "services");
/// assert_eq!(route_slug("/#top"), "");
/// ```
pub fn route_slug(path: &str) -> String {
    let without_query = path
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();

    normalize_path(without_query)
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_paths() {
        for canonical in ["/", "/careers", "/services/web"] {
            assert!(is_valid_path(canonical), "{}", canonical);
        }
        for sloppy in ["", "careers", "/careers/", "/about//team", "/about\\team"] {
            assert!(!is_valid_path(sloppy), "{}", sloppy);
        }
    }

    #[test]
    fn test_normalize_path_valid_is_borrowed() {
        assert!(matches!(normalize_path("/contact"), Cow::Borrowed("/contact")));
        assert!(matches!(normalize_path("/"), Cow::Borrowed("/")));
    }

    #[test]
    fn test_normalize_path_user_mistakes() {
        assert_eq!(normalize_path("/dashboard/"), "/dashboard");
        assert_eq!(normalize_path("//contact"), "/contact");
        assert_eq!(normalize_path("\\blog\\posts"), "/blog/posts");
        assert_eq!(normalize_path("careers"), "/careers");
        assert_eq!(normalize_path("///"), "/");
    }

    #[test]
    fn test_route_slug() {
        assert_eq!(route_slug("/"), "");
        assert_eq!(route_slug(""), "");
        assert_eq!(route_slug("/portfolio"), "portfolio");
        assert_eq!(route_slug("portfolio/"), "portfolio");
        assert_eq!(route_slug("/blog/2024/launch"), "blog");
        assert_eq!(route_slug("/contact?from=footer"), "contact");
        assert_eq!(route_slug("/auth#signup"), "auth");
    }
}
