//! String-level path handling.
//!
//! Entities keep their path as a plain string in the host's separator form.
//! The functions here detect absolute paths, convert separators, join raw
//! fragments and split paths into segments. Each host-dependent function has
//! a `*_with` variant taking the separator explicitly so the behaviour for
//! both conventions can be exercised on any host.

/// The host's path separator.
pub const SEPARATOR: char = std::path::MAIN_SEPARATOR;

/// Characters trimmed from path fragments when joining: whitespace and both
/// separator styles.
const CLEANER: &[char] = &[' ', '\n', '\r', '\t', '\u{0B}', '\0', '\\', '/'];

/// A fragment accepted by [`join`] and [`segments`].
///
/// Implemented for string types and for `Option`s of them, `None` being an
/// absent fragment.
pub trait PathPart {
    /// Returns the fragment, or `None` if absent.
    fn as_part(&self) -> Option<&str>;
}

impl PathPart for &str {
    fn as_part(&self) -> Option<&str> {
        Some(*self)
    }
}

impl PathPart for String {
    fn as_part(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl PathPart for &String {
    fn as_part(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl PathPart for Option<&str> {
    fn as_part(&self) -> Option<&str> {
        *self
    }
}

impl PathPart for Option<String> {
    fn as_part(&self) -> Option<&str> {
        self.as_deref()
    }
}

/// Returns true when running on Windows.
pub fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns true when running on Linux.
pub fn is_linux() -> bool {
    cfg!(target_os = "linux")
}

/// Returns true when running on macOS.
pub fn is_macos() -> bool {
    cfg!(target_os = "macos")
}

/// Returns true when running on a Unix flavoured OS (Linux, macOS, BSDs..).
pub fn is_unix() -> bool {
    cfg!(unix)
}

/// Returns true if `path` is absolute on either convention: it starts with
/// `/` or with a drive letter prefix such as `C:`. Leading whitespace is
/// ignored. `\Users` is *not* absolute.
pub fn is_absolute(path: &str) -> bool {
    let mut chars = path.trim_start().chars();
    match (chars.next(), chars.next()) {
        (Some('/'), _) => true,
        (Some(drive), Some(':')) => drive.is_ascii_alphabetic(),
        _ => false,
    }
}

/// Exact complement of [`is_absolute`].
pub fn is_relative(path: &str) -> bool {
    !is_absolute(path)
}

/// Replaces every non-host separator with the host separator.
pub fn normalize_separators(path: &str) -> String {
    normalize_separators_with(path, SEPARATOR)
}

/// Replaces every separator that is not `sep` with `sep`.
pub fn normalize_separators_with(path: &str, sep: char) -> String {
    if sep == '/' {
        path.replace('\\', "/")
    } else {
        path.replace('/', "\\")
    }
}

/// Joins path fragments with the host separator.
///
/// See [`join_with`].
pub fn join<I>(parts: I) -> String
where
    I: IntoIterator,
    I::Item: PathPart,
{
    join_with(parts, SEPARATOR)
}

/// Joins path fragments with `sep`.
///
/// The first fragment is the root: it is only right-trimmed, so a leading
/// `/` survives. Every other fragment is trimmed of separators and
/// whitespace on both ends. Fragments that end up empty, and absent ones,
/// are dropped.
///
/// ```
/// use fsitem::path::join_with;
/// assert_eq!(join_with(["path", "/to/", "file"], '/'), "path/to/file");
/// assert_eq!(join_with(["/path", "\\to\\", "\\file"], '/'), "/path/to/file");
/// assert_eq!(join_with(["/"], '/'), "");
/// assert_eq!(join_with(["/", "b"], '/'), "b");
/// ```
pub fn join_with<I>(parts: I, sep: char) -> String
where
    I: IntoIterator,
    I::Item: PathPart,
{
    let mut parts = parts.into_iter();
    let mut joined = String::new();

    if let Some(first) = parts.next() {
        let first = normalize_separators_with(first.as_part().unwrap_or(""), sep);
        joined.push_str(first.trim_end_matches(CLEANER));
    }

    for part in parts {
        let Some(part) = part.as_part() else {
            continue;
        };
        let part = normalize_separators_with(part, sep);
        let clean = part.trim_matches(CLEANER);
        if clean.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push(sep);
        }
        joined.push_str(clean);
    }
    joined
}

/// Splits the joined fragments into their non-empty segments, using the
/// host separator.
pub fn segments<I>(parts: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: PathPart,
{
    segments_with(parts, SEPARATOR)
}

/// Splits the joined fragments into their non-empty segments.
pub fn segments_with<I>(parts: I, sep: char) -> Vec<String>
where
    I: IntoIterator,
    I::Item: PathPart,
{
    join_with(parts, sep)
        .trim_matches(sep)
        .split(sep)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// The canonical form an entity stores: host separators, no trailing
/// separator. A path made only of separators collapses to the root.
pub fn canonicalize(path: &str) -> String {
    canonicalize_with(path, SEPARATOR)
}

/// [`canonicalize`] with an explicit separator.
pub fn canonicalize_with(path: &str, sep: char) -> String {
    let normalized = normalize_separators_with(path, sep);
    let trimmed = normalized.trim_end_matches(sep);
    if trimmed.is_empty() && !normalized.is_empty() {
        sep.to_string()
    } else {
        trimmed.to_owned()
    }
}

/// `name` below the canonical `parent`. Unlike [`join`], a parent that is
/// the bare root keeps the child absolute.
pub(crate) fn child_of(parent: &str, name: &str) -> String {
    child_of_with(parent, name, SEPARATOR)
}

fn child_of_with(parent: &str, name: &str, sep: char) -> String {
    let joined = join_with([parent, name], sep);
    if parent.len() == sep.len_utf8() && parent.starts_with(sep) && !joined.is_empty() {
        format!("{sep}{joined}")
    } else {
        joined
    }
}

/// True if `ancestor` is `path` or one of its parents, compared segment by
/// segment on canonical paths.
pub(crate) fn is_ancestor_or_self(ancestor: &str, path: &str, sep: char) -> bool {
    match path.strip_prefix(ancestor) {
        Some(rest) => rest.is_empty() || rest.starts_with(sep) || ancestor.ends_with(sep),
        None => false,
    }
}

/// The last segment of a canonical path.
pub(crate) fn base_name(path: &str, sep: char) -> &str {
    path.rsplit(sep).next().unwrap_or("")
}

/// A canonical path with its last segment removed.
///
/// A single relative segment has an empty parent, a top level absolute path
/// has the root as parent.
pub(crate) fn parent_of(path: &str, sep: char) -> String {
    match path.rfind(sep) {
        None => String::new(),
        Some(0) => sep.to_string(),
        Some(idx) => {
            let parent = &path[..idx];
            // "C:" alone means "current dir on drive C", keep the root.
            if parent.len() == 2 && parent.ends_with(':') {
                format!("{parent}{sep}")
            } else {
                parent.to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_regardless_of_os() {
        assert!(is_absolute("/home/user"));
        assert!(is_absolute("C:\\Users\\user"));
        assert!(is_absolute("f:\\Users\\user"));
        assert!(is_absolute("  /home/user"));

        assert!(!is_absolute("home/user"));
        assert!(!is_absolute("Users\\user"));
        assert!(!is_absolute("\\Users\\user"));
        assert!(!is_absolute(""));
        assert!(!is_absolute("1:\\x"));
    }

    #[test]
    fn relative_is_complement() {
        for p in ["home/user", "Users\\user", "\\Users\\user", "", "/a", "c:"] {
            assert_eq!(is_relative(p), !is_absolute(p), "{p}");
        }
    }

    #[test]
    fn normalize_separators_both_hosts() {
        for input in [
            "relative/path/to/fileOrFolder",
            "relative\\path\\to\\fileOrFolder",
            "relative/path\\to/fileOrFolder",
        ] {
            assert_eq!(
                normalize_separators_with(input, '/'),
                "relative/path/to/fileOrFolder"
            );
            assert_eq!(
                normalize_separators_with(input, '\\'),
                "relative\\path\\to\\fileOrFolder"
            );
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        for p in ["a\\b/c", "/x/y", "\\\\server\\share", ""] {
            let once = normalize_separators(p);
            assert_eq!(normalize_separators(&once), once);
        }
    }

    #[test]
    fn join_removes_bad_slashes() {
        assert_eq!(join_with(["path", "/to/", "file"], '/'), "path/to/file");
        assert_eq!(join_with(["path/", "/to/", "/file"], '/'), "path/to/file");
        assert_eq!(join_with(["path/", "/to/", "/file/"], '/'), "path/to/file");
        assert_eq!(join_with(["path\\", "/to\\", "/file\\"], '/'), "path/to/file");
        assert_eq!(join_with(["/path", "\\to\\", "\\file"], '/'), "/path/to/file");
        assert_eq!(join_with(["\\path/", "\\to\\", "\\file"], '/'), "/path/to/file");
        assert_eq!(
            join_with(
                ["path/", "to/", "", "/", "\\", "/\\", "\\/", "file"],
                '/'
            ),
            "path/to/file"
        );
    }

    #[test]
    fn join_trims_whitespace_parts() {
        assert_eq!(
            join_with(["relative", "path", "to", "fileOrFolder", "\\", "\t \\ "], '/'),
            "relative/path/to/fileOrFolder"
        );
        assert_eq!(
            join_with(["/absolute", "path", "to", "fileOrFolder", "\\", "\t \\ "], '\\'),
            "\\absolute\\path\\to\\fileOrFolder"
        );
    }

    #[test]
    fn join_skips_absent_parts() {
        assert_eq!(
            join_with([Some("a"), None, Some("b")], '/'),
            "a/b"
        );
        assert_eq!(join_with([None::<&str>], '/'), "");
    }

    #[test]
    fn join_empty_inputs() {
        assert_eq!(join_with(Vec::<&str>::new(), '/'), "");
        assert_eq!(join_with([""], '/'), "");
        assert_eq!(join_with(["", "", ""], '/'), "");
        assert_eq!(join_with(["/"], '/'), "");
        assert_eq!(join_with(["\\"], '/'), "");
    }

    #[test]
    fn separator_only_root_contributes_nothing() {
        assert_eq!(join_with(["/", "b"], '/'), "b");
        assert_eq!(join_with(["\\", "", "b", "c"], '/'), "b/c");
    }

    #[test]
    fn child_of_root_stays_absolute() {
        assert_eq!(child_of_with("/", "b", '/'), "/b");
        assert_eq!(child_of_with("/", "/b/c/", '/'), "/b/c");
        assert_eq!(child_of_with("\\", "b", '\\'), "\\b");
        assert_eq!(child_of_with("/a", "b", '/'), "/a/b");
        assert_eq!(child_of_with("", "b", '/'), "b");
        assert_eq!(child_of_with("/", "", '/'), "");
    }

    #[test]
    fn ancestry_is_segment_wise() {
        assert!(is_ancestor_or_self("/a", "/a", '/'));
        assert!(is_ancestor_or_self("/a", "/a/b", '/'));
        assert!(is_ancestor_or_self("/", "/a/b", '/'));
        assert!(is_ancestor_or_self("C:\\", "C:\\a", '\\'));
        assert!(!is_ancestor_or_self("/a", "/ab", '/'));
        assert!(!is_ancestor_or_self("/a/b", "/a", '/'));
    }

    #[test]
    fn segments_of_paths() {
        let expected = vec!["absolute", "path", "to", "fileOrFolder"];
        assert_eq!(segments_with(["/absolute/path/to/fileOrFolder"], '/'), expected);
        assert_eq!(
            segments_with(["\\absolute\\path\\to\\fileOrFolder"], '/'),
            expected
        );
        assert_eq!(
            segments_with(["\\absolute", "\\path", "to\\fileOrFolder"], '/'),
            expected
        );
        assert_eq!(
            segments_with(
                [
                    Some("\\absolute"),
                    Some("\\path"),
                    Some("/"),
                    Some("\\"),
                    Some(""),
                    Some(" "),
                    None,
                    Some("to\\fileOrFolder"),
                ],
                '\\'
            ),
            expected
        );
    }

    #[test]
    fn segments_of_empty_paths() {
        assert!(segments_with(Vec::<&str>::new(), '/').is_empty());
        assert!(segments_with([""], '/').is_empty());
        assert!(segments_with(["/"], '/').is_empty());
        assert!(segments_with(["\\"], '/').is_empty());
        assert!(segments_with([None::<String>], '/').is_empty());
    }

    #[test]
    fn canonical_form() {
        assert_eq!(canonicalize_with("/a/b/", '/'), "/a/b");
        assert_eq!(canonicalize_with("a\\b\\\\", '/'), "a/b");
        assert_eq!(canonicalize_with("///", '/'), "/");
        assert_eq!(canonicalize_with("", '/'), "");
        assert_eq!(canonicalize_with("C:/x/", '\\'), "C:\\x");
    }

    #[test]
    fn base_name_and_parent() {
        assert_eq!(base_name("/a/b.txt", '/'), "b.txt");
        assert_eq!(base_name("b.txt", '/'), "b.txt");
        assert_eq!(base_name("/", '/'), "");
        assert_eq!(parent_of("/a/b.txt", '/'), "/a");
        assert_eq!(parent_of("/a", '/'), "/");
        assert_eq!(parent_of("a", '/'), "");
        assert_eq!(parent_of("C:\\a", '\\'), "C:\\");
        assert_eq!(parent_of("C:\\a\\b", '\\'), "C:\\a");
    }

    #[test]
    fn host_identification_is_consistent() {
        if is_linux() || is_macos() {
            assert!(is_unix());
        }
        if is_windows() {
            assert!(!is_unix());
        }
    }
}
