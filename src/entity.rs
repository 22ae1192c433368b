use std::path::Path as StdPath;

use chrono::DateTime;
use chrono::Utc;
use regex::Regex;

use crate::Error;
use crate::FileStat;
use crate::Folder;
use crate::name;
use crate::native;
use crate::path;
use crate::path::SEPARATOR;

fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|e| Error::InvalidArgument(format!("pattern '{pattern}': {e}")))
}

/// Behaviour shared by [`File`](crate::File) and [`Folder`].
///
/// An entity is a value over a path that may or may not exist. Everything
/// here is derived from the current path on each call; only
/// [`exists`](Entity::exists) and the timestamps consult the disk, and they
/// do so every time.
pub trait Entity {
    /// The current path, in host separator form. Changes after a successful
    /// rename or move.
    fn path(&self) -> &str;

    /// The path the entity was created with. Never changes.
    fn original_path(&self) -> &str;

    /// Whether the entity is on disk with the right kind: a regular file for
    /// `File`, a directory for `Folder`.
    fn exists(&self) -> bool;

    /// The current path as a `std::path::Path`.
    fn std_path(&self) -> &StdPath {
        StdPath::new(self.path())
    }

    /// The base name: the last segment of the path.
    fn name(&self) -> &str {
        path::base_name(self.path(), SEPARATOR)
    }

    /// The base name without its extension. See [`name::name_without_extension`].
    fn name_without_extension(&self, max_extension_parts: usize) -> &str {
        name::name_without_extension(self.name(), max_extension_parts)
    }

    /// The extension of the base name, without the dot. See [`name::extension`].
    fn extension(&self, max_extension_parts: usize) -> &str {
        name::extension(self.name(), max_extension_parts)
    }

    /// The path without its last segment.
    fn folder_path(&self) -> String {
        path::parent_of(self.path(), SEPARATOR)
    }

    /// Same as [`folder_path`](Entity::folder_path).
    fn parent_folder_path(&self) -> String {
        self.folder_path()
    }

    /// The folder containing this entity.
    fn parent_folder(&self) -> Folder {
        Folder::new(self.folder_path())
    }

    /// Same as [`parent_folder`](Entity::parent_folder).
    fn containing_folder(&self) -> Folder {
        self.parent_folder()
    }

    /// Creation time, `None` if the entity is missing or the platform does
    /// not record it.
    fn create_time(&self) -> Option<DateTime<Utc>> {
        native::stat_times(self.std_path()).created
    }

    /// Last modification time, `None` if the entity is missing.
    fn modified_time(&self) -> Option<DateTime<Utc>> {
        native::stat_times(self.std_path()).modified
    }

    /// The path relative to `base_path`.
    ///
    /// `base_path` is normalized like an entity path and stripped from the
    /// front of the path as a plain string, followed by any leading
    /// separators. No `..` or symlink resolution happens. When `base_path`
    /// is not a prefix the path is returned unchanged, and a base that ends
    /// in the middle of a segment (`/a/b` against `/a/bc/x`) leaves the rest
    /// of that segment.
    fn relative_path(&self, base_path: &str) -> String {
        let base = path::canonicalize(base_path);
        match self.path().strip_prefix(base.as_str()) {
            Some(rest) => rest.trim_start_matches(SEPARATOR).to_owned(),
            None => self.path().to_owned(),
        }
    }

    /// [`relative_path`](Entity::relative_path) without its last segment.
    fn relative_folder_path(&self, base_path: &str) -> String {
        path::parent_of(&self.relative_path(base_path), SEPARATOR)
    }

    /// True if `other`, normalized, is exactly this entity's path. Symlinks
    /// are not resolved.
    fn is<P: AsRef<str>>(&self, other: P) -> bool {
        self.path() == path::canonicalize(other.as_ref())
    }

    /// True if the regular expression matches the base name.
    fn name_matches(&self, pattern: &str) -> Result<bool, Error> {
        Ok(compile(pattern)?.is_match(self.name()))
    }

    /// The whole match of `pattern` against the base name followed by each
    /// capture group; groups that did not take part are empty strings.
    /// Returns an empty vector when the pattern does not match.
    fn name_match_parts(&self, pattern: &str) -> Result<Vec<String>, Error> {
        let regex = compile(pattern)?;
        Ok(regex
            .captures(self.name())
            .map(|caps| {
                caps.iter()
                    .map(|m| m.map(|m| m.as_str().to_owned()).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default())
    }

    /// A metadata snapshot; see [`FileStat`].
    fn stat(&self) -> Result<FileStat, Error> {
        if !self.std_path().exists() {
            return Err(Error::not_found("stat", self.path()));
        }
        FileStat::from_path(self.std_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::File;
    use crate::TestRoot;

    fn sep(p: &str) -> String {
        path::normalize_separators(p)
    }

    #[test]
    fn names_and_extensions() {
        let file = File::new(sep("/ctx/test.ext1.ext2.txt"));
        assert_eq!(file.name(), "test.ext1.ext2.txt");
        assert_eq!(file.name_without_extension(1), "test.ext1.ext2");
        assert_eq!(file.extension(1), "txt");
        assert_eq!(file.name_without_extension(2), "test.ext1");
        assert_eq!(file.extension(3), "ext1.ext2.txt");
    }

    #[test]
    fn folder_paths() {
        let file = File::new(sep("/ctx/testFolder1/test1.txt"));
        assert_eq!(file.folder_path(), sep("/ctx/testFolder1"));
        assert_eq!(file.parent_folder_path(), file.folder_path());
        assert_eq!(file.parent_folder().path(), sep("/ctx/testFolder1"));
        assert_eq!(file.containing_folder().path(), sep("/ctx/testFolder1"));
    }

    #[test]
    fn relative_paths() {
        let file = File::new(sep("/ctx/testFolder1/testFolder1_1/test1_1.txt"));
        assert_eq!(
            file.relative_path("/ctx"),
            sep("testFolder1/testFolder1_1/test1_1.txt")
        );
        assert_eq!(
            file.relative_path("\\ctx\\testFolder1\\"),
            sep("testFolder1_1/test1_1.txt")
        );
        assert_eq!(
            file.relative_path("/ctx/testFolder1/testFolder1_1"),
            "test1_1.txt"
        );
        assert_eq!(
            file.relative_folder_path("/ctx"),
            sep("testFolder1/testFolder1_1")
        );
        assert_eq!(file.relative_folder_path("/ctx/testFolder1"), "testFolder1_1");
        assert_eq!(
            file.relative_folder_path("/ctx/testFolder1/testFolder1_1"),
            ""
        );
    }

    #[test]
    fn relative_path_with_foreign_base_is_unchanged() {
        let file = File::new(sep("/ctx/a/b.txt"));
        assert_eq!(file.relative_path("/elsewhere"), file.path());
        // Segment boundaries are not checked.
        assert_eq!(File::new(sep("/ctx/abc/x")).relative_path("/ctx/a"), sep("bc/x"));
    }

    #[test]
    fn identity_is_path_equality() {
        let file = File::new(sep("/ctx/test.txt"));
        assert!(file.is("/ctx/test.txt"));
        assert!(file.is("\\ctx\\test.txt"));
        assert!(file.is(&File::new("/ctx/test.txt")));
        assert!(!file.is("/ctx/test2.txt"));
    }

    #[test]
    fn regex_on_names() {
        let file = File::new(sep("/ctx/test.ext1.ext2.txt"));
        assert!(file.name_matches("(test)(.*)").unwrap());
        assert!(file.name_matches("^test").unwrap());
        assert!(file.name_matches("txt$").unwrap());
        assert!(file.name_matches(r"^test\.ext1\.ext2\.txt$").unwrap());
        assert!(!file.name_matches("^ctx").unwrap());
        assert!(file.name_matches("(").is_err());

        assert_eq!(
            file.name_match_parts("(test)(.*)").unwrap(),
            vec!["test.ext1.ext2.txt", "test", ".ext1.ext2.txt"]
        );
        assert_eq!(
            file.name_match_parts("(.*)(txt$)").unwrap(),
            vec!["test.ext1.ext2.txt", "test.ext1.ext2.", "txt"]
        );
        assert_eq!(
            file.name_match_parts(r"(^test)(.*)(\.txt$)").unwrap(),
            vec!["test.ext1.ext2.txt", "test", ".ext1.ext2", ".txt"]
        );
        assert!(file.name_match_parts("^nomatch$").unwrap().is_empty());
    }

    #[test]
    fn timestamps_are_best_effort() {
        let root = TestRoot::new(None).unwrap();
        let file = root.file("test.txt");
        assert!(file.modified_time().is_some());
        let missing = root.file("missing.txt");
        assert!(missing.create_time().is_none());
        assert!(missing.modified_time().is_none());
    }

    #[test]
    fn stat_snapshot() {
        let root = TestRoot::new(None).unwrap();
        let stat = root.file("test.txt").stat().unwrap();
        assert_eq!(stat.size, 4);
        assert!(!stat.is_directory);
        assert_eq!(
            stat.sha256.as_deref(),
            Some("9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08")
        );

        let dir_stat = root.folder("testFolder1").stat().unwrap();
        assert!(dir_stat.is_directory);
        assert_eq!(dir_stat.sha256, None);

        assert!(matches!(
            root.file("missing.txt").stat(),
            Err(Error::NotFound { .. })
        ));
    }
}
