//! Splitting a base name into stem and extension.
//!
//! Extensions may span several dot separated parts (`tar.gz`). Callers pick
//! how many trailing parts count as extension; the stem always keeps at
//! least the first part, so asking for more parts than a name has yields
//! everything after the first dot.

/// Extension parts considered when the caller does not say otherwise.
pub const DEFAULT_EXTENSION_PARTS: usize = 1;

/// Returns the extension of `base_name`, without the leading dot.
///
/// ```
/// use fsitem::name::extension;
/// assert_eq!(extension("file.tar.gz", 2), "tar.gz");
/// assert_eq!(extension("file.tar.gz", 1), "gz");
/// assert_eq!(extension("file", 1), "");
/// assert_eq!(extension("a.b.c", 10), "b.c");
/// ```
pub fn extension(base_name: &str, max_extension_parts: usize) -> &str {
    let dots = base_name.matches('.').count();
    let parts = max_extension_parts.min(dots);
    if parts == 0 {
        return "";
    }
    // Start right after the `parts`-th dot counted from the end.
    match base_name.rmatch_indices('.').nth(parts - 1) {
        Some((idx, _)) => &base_name[idx + 1..],
        None => "",
    }
}

/// Returns `base_name` with its extension and the separating dot removed.
pub fn name_without_extension(base_name: &str, max_extension_parts: usize) -> &str {
    let ext = extension(base_name, max_extension_parts);
    if ext.is_empty() {
        base_name
    } else {
        &base_name[..base_name.len() - ext.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_part_extensions() {
        let name = "test.ext1.ext2.txt";
        assert_eq!(extension(name, 1), "txt");
        assert_eq!(extension(name, 2), "ext2.txt");
        assert_eq!(extension(name, 3), "ext1.ext2.txt");
        assert_eq!(extension(name, 4), "ext1.ext2.txt");

        assert_eq!(name_without_extension(name, 1), "test.ext1.ext2");
        assert_eq!(name_without_extension(name, 2), "test.ext1");
        assert_eq!(name_without_extension(name, 3), "test");
        assert_eq!(name_without_extension(name, 4), "test");
    }

    #[test]
    fn no_extension() {
        assert_eq!(extension("file", 1), "");
        assert_eq!(name_without_extension("file", 1), "file");
        assert_eq!(extension("file.txt", 0), "");
        assert_eq!(name_without_extension("file.txt", 0), "file.txt");
        assert_eq!(extension("", 1), "");
    }

    #[test]
    fn clamps_to_available_parts() {
        assert_eq!(extension("a.b.c", 10), "b.c");
        assert_eq!(name_without_extension("a.b.c", 10), "a");
    }

    #[test]
    fn dot_edge_cases() {
        assert_eq!(extension(".bashrc", 1), "bashrc");
        assert_eq!(name_without_extension(".bashrc", 1), "");
        assert_eq!(extension("trailing.", 1), "");
        assert_eq!(name_without_extension("trailing.", 1), "trailing.");
    }

    #[test]
    fn stem_and_extension_rebuild_the_name() {
        for name in ["file.tar.gz", "file", "a.b.c", ".hidden", "x.", "..", "a..b"] {
            for parts in 1..4 {
                let ext = extension(name, parts);
                let stem = name_without_extension(name, parts);
                let rebuilt = if ext.is_empty() {
                    stem.to_owned()
                } else {
                    format!("{stem}.{ext}")
                };
                assert_eq!(rebuilt, name, "{name} / {parts}");
            }
        }
    }
}
