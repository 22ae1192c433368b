use std::fs;
use std::path::Path as StdPath;
use std::path::PathBuf;

use cross_check::get_recursive_entries;
use similar::ChangeTag;
use similar::TextDiff;
use tempdir::TempDir;

use crate::Error;
use crate::File;
use crate::Folder;
use crate::path;

// Relative paths created in every test root; `None` contents make a folder.
pub(crate) static TEMP_FILES: &[(&str, Option<&str>)] = &[
    ("test.txt", Some("test")),
    ("test.ext1.ext2.txt", Some("ext")),
    ("replace-test.txt", Some("test1 test2 test3")),
    ("testFolder1", None),
    ("testFolder1/test1.txt", Some("test1")),
    ("testFolder1/test2.txt", Some("test2")),
    ("testFolder1/testFolder1_1", None),
    ("testFolder1/testFolder1_1/test1_1.txt", Some("test1_1")),
    ("testFolder1/testFolder1_1/test1_2.txt", Some("test1_2")),
    ("testFolder2", None),
];

/// A temporary directory holding a small fixed tree of files and folders.
///
/// The directory goes away when the value is dropped, unless a save path was
/// given, in which case a copy is kept under `/tmp/<save_path>`.
#[derive(Debug)]
pub struct TestRoot {
    /// Root of the temporary test directory.
    pub root: TempDir,

    save_path: Option<PathBuf>,
}

impl TestRoot {
    /// Creates the temporary directory and populates it.
    pub fn new(save_path: Option<&str>) -> Result<Self, Error> {
        let root = TempDir::new("fsitem").map_err(|e| Error::Create {
            what: "temporary directory".into(),
            how: e.to_string(),
        })?;
        let ret = Self {
            root,
            save_path: save_path.map(|p| StdPath::new("/tmp/").join(p)),
        };
        for (relative_path, contents) in TEMP_FILES {
            let full_path = ret.path(relative_path);
            match contents {
                None => fs::create_dir_all(&full_path).map_err(|e| Error::Create {
                    what: full_path.display().to_string(),
                    how: e.to_string(),
                })?,
                Some(contents) => fs::write(&full_path, contents).map_err(|e| Error::Write {
                    what: full_path.display().to_string(),
                    how: e.to_string(),
                })?,
            }
        }
        Ok(ret)
    }

    fn join(&self, relative_path: &str) -> String {
        let root = self.root.path().to_string_lossy();
        path::join([&*root, relative_path])
    }

    /// Absolute path of `relative_path` inside the root.
    pub fn path(&self, relative_path: &str) -> PathBuf {
        PathBuf::from(self.join(relative_path))
    }

    /// A file handle for `relative_path` inside the root.
    pub fn file(&self, relative_path: &str) -> File {
        File::new(self.join(relative_path))
    }

    /// A folder handle for `relative_path` inside the root. An empty path
    /// is the root itself.
    pub fn folder(&self, relative_path: &str) -> Folder {
        Folder::new(self.join(relative_path))
    }

    /// A textual listing of everything under the root: one line per entry
    /// with its kind and, for files, size, modification time and digest.
    pub fn snapshot(&self) -> Result<String, Error> {
        let mut entries = get_recursive_entries(self.root.path())?;
        entries.sort();
        Ok(entries.join("\n"))
    }

    /// Returns none if the root still matches `snapshot`, or a line diff of
    /// the two listings otherwise.
    pub fn compare(&self, snapshot: &str) -> Result<Option<String>, Error> {
        let current = self.snapshot()?;
        let diff = TextDiff::from_lines(snapshot, &current);
        let mut diffs = String::new();
        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => continue,
            };

            diffs.push_str(&format!("{sign}{change}"));
        }
        if diffs.is_empty() {
            Ok(None)
        } else {
            Ok(Some(diffs))
        }
    }

    fn copy_dir_all(src: &StdPath, dst: &StdPath) -> Result<(), std::io::Error> {
        fs::create_dir_all(dst)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                Self::copy_dir_all(&entry.path(), &dst.join(entry.file_name()))?;
            } else {
                fs::copy(entry.path(), dst.join(entry.file_name()))?;
            }
        }
        Ok(())
    }
}

impl Drop for TestRoot {
    fn drop(&mut self) {
        if let Some(save_path) = &self.save_path {
            let _ = Self::copy_dir_all(self.root.path(), save_path);
            println!("TestRoot preserved at {}", save_path.to_string_lossy());
        }
    }
}

// The functions in the mod are intentionally written with an
// alternative approach to ensure that the main logic of accessing
// fs is not broken.
mod cross_check {
    use std::fs;
    use std::io::Read;
    use std::path::Path as StdPath;
    use std::time::SystemTime;

    use sha2::Digest;
    use sha2::Sha256;

    use crate::Error;

    pub(super) fn get_recursive_entries(dir_path: &StdPath) -> Result<Vec<String>, Error> {
        let mut ret = vec![];
        visit_dirs(dir_path, dir_path, &mut ret)?;
        Ok(ret)
    }

    fn read_err(path: &StdPath) -> impl Fn(std::io::Error) -> Error + '_ {
        move |e| Error::Read {
            what: path.display().to_string(),
            how: e.to_string(),
        }
    }

    fn visit_dirs(
        base_path: &StdPath,
        current_path: &StdPath,
        out: &mut Vec<String>,
    ) -> Result<(), Error> {
        for entry in fs::read_dir(current_path).map_err(read_err(current_path))? {
            let path = entry.map_err(read_err(current_path))?.path();
            out.push(get_entry_info(base_path, &path)?);
            if path.is_dir() {
                visit_dirs(base_path, &path, out)?;
            }
        }
        Ok(())
    }

    fn get_entry_info(base_path: &StdPath, path: &StdPath) -> Result<String, Error> {
        let rel_path = path.strip_prefix(base_path).unwrap_or(path).display();
        let metadata = fs::symlink_metadata(path).map_err(read_err(path))?;
        if !metadata.is_file() {
            let kind = if metadata.is_dir() { "DIR" } else { "LINK" };
            return Ok(format!("{rel_path}\t{kind}"));
        }

        let mtime = metadata
            .modified()
            .map_err(read_err(path))?
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        Ok(format!(
            "{}\t{}\t{}\t{}\tFILE",
            rel_path,
            metadata.len(),
            mtime,
            calculate_sha256(path)?
        ))
    }

    fn calculate_sha256(path: &StdPath) -> Result<String, Error> {
        let mut file = fs::File::open(path).map_err(read_err(path))?;
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];

        loop {
            let n = file.read(&mut buffer).map_err(read_err(path))?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Entity;

    #[test]
    fn fixture_tree() {
        let root = TestRoot::new(None).unwrap();
        for (relative_path, contents) in TEMP_FILES {
            match contents {
                None => assert!(root.folder(relative_path).exists()),
                Some(contents) => {
                    assert_eq!(root.file(relative_path).contents().unwrap(), *contents)
                }
            }
        }
        assert!(root.folder("").is(root.root.path().to_string_lossy()));
    }

    #[test]
    fn compare_reports_changes() {
        let root = TestRoot::new(None).unwrap();
        let snapshot = root.snapshot().unwrap();
        assert_eq!(root.compare(&snapshot).unwrap(), None);

        fs::create_dir(root.path("testFolder2/new")).unwrap();
        let diff = root.compare(&snapshot).unwrap().unwrap();
        assert!(diff.starts_with('+'));
        assert!(diff.contains("new"));
    }
}
