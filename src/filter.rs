use std::collections::HashSet;

use derivative::Derivative;
use regex::Regex;

use crate::Error;
use crate::name;

/// Decides which names a folder listing returns.
///
/// Filters are applied to the bare entry name (`report.pdf`), never to the
/// full path, and never change what a folder keeps in its listing cache.
#[derive(Derivative)]
#[derivative(Debug)]
pub enum NameFilter {
    /// Keep names the regular expression matches anywhere.
    Pattern(Regex),

    /// Keep names for which the closure returns true.
    Predicate(#[derivative(Debug = "ignore")] Box<dyn Fn(&str) -> bool>),

    /// Keep names carrying one of the extensions, compared case
    /// insensitively. Multi part extensions (`tar.gz`) are allowed.
    Extensions(HashSet<String>),
}

impl NameFilter {
    /// Compiles `pattern` into a [`NameFilter::Pattern`].
    pub fn pattern(pattern: &str) -> Result<Self, Error> {
        let regex = Regex::new(pattern)
            .map_err(|e| Error::InvalidArgument(format!("pattern '{pattern}': {e}")))?;
        Ok(NameFilter::Pattern(regex))
    }

    /// Wraps a closure into a [`NameFilter::Predicate`].
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + 'static,
    {
        NameFilter::Predicate(Box::new(f))
    }

    /// Builds an [`NameFilter::Extensions`] filter. A leading dot on an
    /// extension is ignored.
    pub fn extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        NameFilter::Extensions(
            extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        )
    }

    /// Returns true if `name` passes the filter.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameFilter::Pattern(regex) => regex.is_match(name),
            NameFilter::Predicate(f) => f(name),
            NameFilter::Extensions(allowed) => allowed.iter().any(|ext| {
                let parts = ext.matches('.').count() + 1;
                let actual = name::extension(name, parts);
                !actual.is_empty() && actual.to_lowercase() == *ext
            }),
        }
    }
}

impl From<Regex> for NameFilter {
    fn from(regex: Regex) -> Self {
        NameFilter::Pattern(regex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_filter() {
        let filter = NameFilter::pattern(r"\.json$").unwrap();
        assert!(filter.matches("test3.json"));
        assert!(!filter.matches("test1.txt"));
        assert!(!filter.matches("json"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(matches!(
            NameFilter::pattern("(unclosed"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn predicate_filter() {
        let filter = NameFilter::predicate(|name| name.ends_with(".txt"));
        assert!(filter.matches("a.txt"));
        assert!(!filter.matches("a.json"));
    }

    #[test]
    fn extension_filter() {
        let filter = NameFilter::extensions(["rs", ".TOML", "tar.gz"]);
        assert!(filter.matches("main.rs"));
        assert!(filter.matches("Cargo.toml"));
        assert!(filter.matches("backup.TAR.GZ"));
        assert!(!filter.matches("archive.gz"));
        assert!(!filter.matches("main_rs"));
        assert!(!filter.matches("notes.txt"));
    }

    #[test]
    fn debug_skips_closure() {
        let filter = NameFilter::predicate(|_| true);
        assert!(format!("{filter:?}").starts_with("Predicate"));
    }
}
