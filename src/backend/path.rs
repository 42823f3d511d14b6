//! Path helpers shared by the remote backends.
//!
//! Remote backends speak forward-slash logical paths at the interface. SMB
//! additionally converts to and from `\\host\share\...` UNC form.

/// Join segments with `/`, dropping empty segments and redundant separators.
///
/// The result is absolute when the first non-empty segment is.
pub fn join_forward(segments: &[&str]) -> String {
    let absolute = segments
        .iter()
        .find(|s| !s.is_empty())
        .map_or(false, |s| s.starts_with('/'));

    let parts: Vec<&str> = segments
        .iter()
        .flat_map(|s| s.split('/'))
        .filter(|p| !p.is_empty())
        .collect();

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// True for the `.` and `..` entries that listings may include.
pub fn is_navigation_entry(name: &str) -> bool {
    name == "." || name == ".."
}

/// UNC root of a share: `\\host\share`.
pub fn unc_root(host: &str, share: &str) -> String {
    format!("\\\\{}\\{}", host, share)
}

/// Convert a share-relative logical path to a UNC path.
///
/// Both `/` and `\` are accepted as separators in `path`.
pub fn to_unc(host: &str, share: &str, path: &str) -> String {
    let mut unc = unc_root(host, share);
    for segment in path.split(['/', '\\']).filter(|s| !s.is_empty()) {
        unc.push('\\');
        unc.push_str(segment);
    }
    unc
}

/// Convert a UNC path under `\\host\share` back to a share-relative logical path.
///
/// A path outside the share is returned with every backslash turned into `/`.
pub fn from_unc(host: &str, share: &str, unc: &str) -> String {
    let root = unc_root(host, share);
    match unc.strip_prefix(&root) {
        Some(rest) if rest.is_empty() || rest.starts_with('\\') => {
            let logical = join_forward(&["/", &rest.replace('\\', "/")]);
            if logical.is_empty() {
                "/".to_string()
            } else {
                logical
            }
        }
        _ => unc.replace('\\', "/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_trims_boundary_separators() {
        assert_eq!(join_forward(&["a/", "/b", "c"]), "a/b/c");
    }

    #[test]
    fn join_keeps_leading_slash() {
        assert_eq!(join_forward(&["/videos", "sub"]), "/videos/sub");
        assert_eq!(join_forward(&["/", "videos"]), "/videos");
        assert_eq!(join_forward(&["/"]), "/");
    }

    #[test]
    fn join_skips_empty_segments() {
        assert_eq!(join_forward(&["", "a", "", "b"]), "a/b");
        assert_eq!(join_forward(&["a//b", "c"]), "a/b/c");
        assert_eq!(join_forward(&[]), "");
        assert_eq!(join_forward(&["", ""]), "");
    }

    #[test]
    fn join_never_yields_empty_segment() {
        let joined = join_forward(&["/x/", "//y//", "z/"]);
        assert_eq!(joined, "/x/y/z");
        assert!(!joined[1..].split('/').any(|s| s.is_empty()));
    }

    #[test]
    fn navigation_entries() {
        assert!(is_navigation_entry("."));
        assert!(is_navigation_entry(".."));
        assert!(!is_navigation_entry("..."));
        assert!(!is_navigation_entry(".hidden"));
    }

    #[test]
    fn to_unc_converts_separators() {
        assert_eq!(to_unc("nas", "media", "/videos/tv"), "\\\\nas\\media\\videos\\tv");
        assert_eq!(to_unc("nas", "media", "videos"), "\\\\nas\\media\\videos");
        assert_eq!(to_unc("nas", "media", "/"), "\\\\nas\\media");
        assert_eq!(to_unc("nas", "media", ""), "\\\\nas\\media");
    }

    #[test]
    fn from_unc_returns_share_relative_path() {
        assert_eq!(from_unc("nas", "media", "\\\\nas\\media\\videos\\tv"), "/videos/tv");
        assert_eq!(from_unc("nas", "media", "\\\\nas\\media"), "/");
    }

    #[test]
    fn from_unc_outside_share_falls_back() {
        assert_eq!(from_unc("nas", "media", "\\\\other\\x\\y"), "//other/x/y");
        assert_eq!(from_unc("nas", "media", "\\\\nas\\mediaplus\\y"), "//nas/mediaplus/y");
    }

    #[test]
    fn unc_round_trip_for_nested_path() {
        let unc = to_unc("10.0.0.5", "share$", "/a b/c");
        assert_eq!(from_unc("10.0.0.5", "share$", &unc), "/a b/c");
    }
}
