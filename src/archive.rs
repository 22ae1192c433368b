//! Zip and unzip for files and folders, on top of the `zip` crate.
//!
//! Archives are always written from scratch: an existing archive at the
//! destination is replaced. Entry names use `/` whatever the host.
use std::fs;
use std::io;
use std::path::Path as StdPath;

use zip::CompressionMethod;
use zip::ZipArchive;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::FileOptions;

use crate::Entity;
use crate::File;
use crate::Folder;
use crate::errors::Error;
use crate::path::SEPARATOR;

fn archive_err(archive: &StdPath) -> impl Fn(ZipError) -> Error + '_ {
    move |e| Error::Archive {
        what: archive.display().to_string(),
        how: e.to_string(),
    }
}

fn io_err(archive: &StdPath) -> impl Fn(io::Error) -> Error + '_ {
    move |e| Error::Archive {
        what: archive.display().to_string(),
        how: e.to_string(),
    }
}

/// Writes `entries` (entry name, source file) into a new archive at
/// `destination`.
fn write_archive(destination: &File, entries: &[(String, File)]) -> Result<(), Error> {
    let archive = destination.std_path();
    let folder = destination.folder();
    if !folder.path().is_empty() {
        folder.create(false)?;
    }
    log::debug!("zipping {} entries into {}", entries.len(), destination);

    let out = fs::File::create(archive).map_err(|e| Error::Create {
        what: archive.display().to_string(),
        how: e.to_string(),
    })?;
    let mut writer = ZipWriter::new(out);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, source) in entries {
        writer
            .start_file(name.as_str(), options)
            .map_err(archive_err(archive))?;
        let mut input = fs::File::open(source.std_path()).map_err(|e| Error::Read {
            what: source.path().to_owned(),
            how: e.to_string(),
        })?;
        io::copy(&mut input, &mut writer).map_err(io_err(archive))?;
    }
    writer.finish().map_err(archive_err(archive))?;
    Ok(())
}

fn open_archive(file: &File) -> Result<ZipArchive<fs::File>, Error> {
    if !file.exists() {
        return Err(Error::not_found("unzip", file.path()));
    }
    let input = fs::File::open(file.std_path()).map_err(|e| Error::Read {
        what: file.path().to_owned(),
        how: e.to_string(),
    })?;
    ZipArchive::new(input).map_err(archive_err(file.std_path()))
}

impl File {
    /// Zips the file into `<name>.zip` next to it.
    pub fn zip(&self, dry_run: bool) -> Result<File, Error> {
        let destination = self.folder().file(&format!("{}.zip", self.name()));
        self.zip_to(destination, dry_run)
    }

    /// Zips the file into `destination`, stored under its base name.
    pub fn zip_to(&self, destination: impl Into<File>, dry_run: bool) -> Result<File, Error> {
        if !self.exists() {
            return Err(Error::not_found("zip", self.path()));
        }
        let destination = destination.into();
        if dry_run {
            log::debug!("dry run: would zip {} into {destination}", self);
            return Ok(destination);
        }
        write_archive(&destination, &[(self.name().to_owned(), self.clone())])?;
        Ok(destination)
    }

    /// True if the file opens as a zip archive.
    pub fn is_zip_archive(&self) -> bool {
        open_archive(self).is_ok()
    }

    /// Extracts the archive into the folder that contains it.
    pub fn unzip(&self, dry_run: bool) -> Result<Folder, Error> {
        self.unzip_to(self.folder(), dry_run)
    }

    /// Extracts the archive into `destination`, creating it if needed.
    pub fn unzip_to(&self, destination: impl Into<Folder>, dry_run: bool) -> Result<Folder, Error> {
        let mut archive = open_archive(self)?;
        let destination = destination.into();
        if dry_run {
            log::debug!("dry run: would unzip {self} into {destination}");
            return Ok(destination);
        }
        destination.create(false)?;
        log::debug!("unzipping {self} into {destination}");
        archive
            .extract(destination.std_path())
            .map_err(archive_err(self.std_path()))?;
        Ok(destination)
    }
}

impl Folder {
    /// Zips the folder into `<name>.zip` next to it.
    pub fn zip(&self, include_root: bool, dry_run: bool) -> Result<File, Error> {
        let destination = self
            .parent_folder()
            .file(&format!("{}.zip", self.name()));
        self.zip_to(destination, include_root, dry_run)
    }

    /// Zips every file below the folder into `destination`.
    ///
    /// Entries are named by their path relative to the folder, under a
    /// leading `<name>/` when `include_root` is set. Empty folders are not
    /// stored.
    pub fn zip_to(
        &self,
        destination: impl Into<File>,
        include_root: bool,
        dry_run: bool,
    ) -> Result<File, Error> {
        if !self.exists() {
            return Err(Error::not_found("zip", self.path()));
        }
        let destination = destination.into();
        if dry_run {
            log::debug!("dry run: would zip {self} into {destination}");
            return Ok(destination);
        }

        let entries: Vec<(String, File)> = self
            .clone()
            .get_all_files(None)?
            .into_iter()
            .filter(|file| !file.is(&destination))
            .map(|file| {
                let relative = file.relative_path(self.path()).replace(SEPARATOR, "/");
                let name = if include_root {
                    format!("{}/{relative}", self.name())
                } else {
                    relative
                };
                (name, file)
            })
            .collect();
        write_archive(&destination, &entries)?;
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use crate::TestRoot;

    fn entry_names(archive: &File) -> Vec<String> {
        let mut names: Vec<String> = open_archive(archive)
            .unwrap()
            .file_names()
            .map(str::to_owned)
            .collect();
        names.sort();
        names
    }

    fn entry_contents(archive: &File, name: &str) -> String {
        let mut archive = open_archive(archive).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut contents = String::new();
        entry.read_to_string(&mut contents).unwrap();
        contents
    }

    #[test]
    fn zip_a_file() {
        let root = TestRoot::new(None).unwrap();
        let file = root.file("testFolder1/test1.txt");
        let archive = file.zip(false).unwrap();
        assert!(archive.is(root.file("testFolder1/test1.txt.zip")));
        assert!(archive.is_zip_archive());
        assert!(!file.is_zip_archive());
        assert_eq!(entry_names(&archive), vec!["test1.txt"]);
        assert_eq!(entry_contents(&archive, "test1.txt"), "test1");
    }

    #[test]
    fn zip_a_folder() {
        let root = TestRoot::new(None).unwrap();
        let folder = root.folder("testFolder1");

        let archive = folder.zip(false, false).unwrap();
        assert!(archive.is(root.file("testFolder1.zip")));
        assert_eq!(
            entry_names(&archive),
            vec![
                "test1.txt",
                "test2.txt",
                "testFolder1_1/test1_1.txt",
                "testFolder1_1/test1_2.txt",
            ]
        );

        let rooted = folder
            .zip_to(root.file("out/rooted.zip"), true, false)
            .unwrap();
        assert_eq!(
            entry_names(&rooted),
            vec![
                "testFolder1/test1.txt",
                "testFolder1/test2.txt",
                "testFolder1/testFolder1_1/test1_1.txt",
                "testFolder1/testFolder1_1/test1_2.txt",
            ]
        );
        assert_eq!(entry_contents(&rooted, "testFolder1/test2.txt"), "test2");
    }

    #[test]
    fn empty_folders_are_not_stored() {
        let root = TestRoot::new(None).unwrap();
        let archive = root.folder("testFolder2").zip(true, false).unwrap();
        assert!(archive.is_zip_archive());
        assert!(entry_names(&archive).is_empty());
    }

    #[test]
    fn unzip_restores_the_tree() {
        let root = TestRoot::new(None).unwrap();
        let archive = root.folder("testFolder1").zip(true, false).unwrap();

        let mut target = archive.unzip_to(root.folder("extracted"), false).unwrap();
        assert!(target.exists());
        assert_eq!(
            target.file("testFolder1/testFolder1_1/test1_2.txt").contents().unwrap(),
            "test1_2"
        );
        assert_eq!(target.get_all_files(None).unwrap().len(), 4);

        root.folder("testFolder1").delete(true, false).unwrap();
        let parent = archive.unzip(false).unwrap();
        assert!(parent.is(root.folder("")));
        assert_eq!(root.file("testFolder1/test1.txt").contents().unwrap(), "test1");
    }

    #[test]
    fn failures() {
        let root = TestRoot::new(None).unwrap();
        assert!(matches!(
            root.file("missing.txt").zip(false),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            root.folder("missing").zip(true, false),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            root.file("missing.zip").unzip(false),
            Err(Error::NotFound { .. })
        ));

        let corrupt = root.file("corrupt.zip");
        corrupt.put_contents("not an archive", false).unwrap();
        assert!(!corrupt.is_zip_archive());
        assert!(matches!(corrupt.unzip(false), Err(Error::Archive { .. })));
    }

    #[test]
    fn dry_runs_touch_nothing() {
        let root = TestRoot::new(None).unwrap();
        let real = root.file("test.txt").zip(false).unwrap();
        let snapshot = root.snapshot().unwrap();

        let archive = root.file("replace-test.txt").zip(true).unwrap();
        assert!(archive.is(root.file("replace-test.txt.zip")));
        assert!(!archive.exists());
        root.folder("testFolder1").zip(true, true).unwrap();
        let target = real.unzip_to(root.folder("extracted"), true).unwrap();
        assert!(!target.exists());

        assert_eq!(root.compare(&snapshot).unwrap(), None);
    }
}
