use std::fmt::Display;
use std::fs::Metadata;
use std::path::Path as StdPath;
use std::path::PathBuf;
use std::time::SystemTime;

#[cfg(feature = "json_schema")]
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

use crate::Entity;
use crate::Folder;
use crate::RenameOptions;
use crate::TransferOptions;
use crate::errors::Error;
use crate::hash::Sha256Builder;
use crate::hash::Sha256String;
use crate::native;
use crate::path;
use crate::utils::format_system_time;
use crate::utils::human_readable_size;

/// Represents the metadata of a file or directory: size, modification time,
/// type and, for files, the content digest.
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub struct FileStat {
    /// The size of the file in bytes. For directories, this may be zero or
    /// implementation-defined.
    pub size: u64,
    /// The last modification time of the file or directory in RFC 3339 - Z
    /// format. For example "2018-01-26T18:30:09.453Z"
    pub mtime: String,
    /// Whether this entry is a directory.
    pub is_directory: bool,
    /// Digest of the file contents; `None` for directories.
    pub sha256: Option<String>,
}

impl FileStat {
    /// Reads the metadata of `path`, hashing its contents if it is a file.
    pub fn from_path<P: AsRef<StdPath>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let metadata = native::metadata(path)?;
        if metadata.is_dir() {
            Ok(FileStat::from_metadata(&metadata, None))
        } else {
            let sha256 = path.sha256_build()?.sha256_string();
            Ok(FileStat::from_metadata(&metadata, Some(sha256)))
        }
    }

    fn from_metadata(metadata: &Metadata, sha256: Option<String>) -> Self {
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        FileStat {
            size: metadata.len(),
            mtime: format_system_time(modified),
            is_directory: metadata.is_dir(),
            sha256,
        }
    }
}

/// A file at a path that may or may not exist.
///
/// Renaming and moving update the path in place; clone the value first to
/// keep a handle on the old location. Content attributes (size, hash,
/// contents) are read from disk on every call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct File {
    path: String,
    original_path: String,
}

impl File {
    /// Creates a handle for `path`, normalizing its separators.
    pub fn new(path: impl AsRef<str>) -> Self {
        let path = path::canonicalize(path.as_ref());
        Self {
            original_path: path.clone(),
            path,
        }
    }

    /// The folder containing this file.
    pub fn folder(&self) -> Folder {
        self.parent_folder()
    }

    fn require(&self, op: &str) -> Result<(), Error> {
        if self.exists() {
            Ok(())
        } else {
            Err(Error::not_found(op, self.path.as_str()))
        }
    }

    fn ensure_folder(&self) -> Result<(), Error> {
        let folder = self.folder();
        if !folder.path().is_empty() && !folder.exists() {
            native::create_dir_all(folder.std_path())?;
        }
        Ok(())
    }

    //--- Contents ------------------------------------------------------------

    /// The raw contents.
    pub fn bytes(&self) -> Result<Vec<u8>, Error> {
        self.require("read")?;
        native::read_bytes(self.std_path())
    }

    /// The contents as text.
    pub fn contents(&self) -> Result<String, Error> {
        String::from_utf8(self.bytes()?).map_err(|e| Error::Read {
            what: self.path.clone(),
            how: e.to_string(),
        })
    }

    /// Size in bytes.
    pub fn size(&self) -> Result<u64, Error> {
        self.require("size")?;
        Ok(native::metadata(self.std_path())?.len())
    }

    /// Size formatted with binary units, e.g. `"1.5 KB"`.
    pub fn human_readable_size(&self) -> Result<String, Error> {
        Ok(human_readable_size(self.size()?))
    }

    /// Hex SHA-256 of the contents, computed by streaming the file.
    pub fn hash(&self) -> Result<String, Error> {
        self.require("hash")?;
        Ok(self.std_path().sha256_build()?.sha256_string())
    }

    /// True if the contents include `needle`.
    pub fn contains(&self, needle: &str) -> Result<bool, Error> {
        Ok(self.contents()?.contains(needle))
    }

    //--- File operations -----------------------------------------------------

    /// Renames the file within its folder.
    ///
    /// With `preserve_extension` the current extension (up to
    /// `max_extension_parts` parts) is appended to `new_name`. Renaming to
    /// the current name does nothing.
    pub fn rename(&mut self, new_name: &str, options: RenameOptions) -> Result<&mut Self, Error> {
        self.require("rename")?;

        let mut file_name = new_name.to_owned();
        if options.preserve_extension {
            let ext = self.extension(options.max_extension_parts);
            if !ext.is_empty() {
                file_name = format!("{file_name}.{ext}");
            }
        }
        let destination = path::child_of(&self.folder_path(), &file_name);
        if destination == self.path {
            return Ok(self);
        }
        if StdPath::new(&destination).exists() {
            return Err(Error::already_exists("rename", destination));
        }

        if options.dry_run {
            log::debug!("dry run: would rename {} to {destination}", self.path);
        } else {
            native::rename(self.std_path(), StdPath::new(&destination))?;
        }
        self.path = destination;
        Ok(self)
    }

    /// Moves the file into `target_folder`, keeping its name.
    pub fn move_to(
        &mut self,
        target_folder: impl Into<Folder>,
        options: TransferOptions,
    ) -> Result<&mut Self, Error> {
        self.require("move_to")?;

        let target_folder = target_folder.into();
        let destination = target_folder.file(self.name()).path().to_owned();
        if destination == self.path {
            return Ok(self);
        }
        if !target_folder.exists() {
            return Err(Error::target_missing("move_to", target_folder.path()));
        }
        if StdPath::new(&destination).exists() && !options.overwrite {
            return Err(Error::already_exists("move_to", destination));
        }

        if options.dry_run {
            log::debug!("dry run: would move {} to {destination}", self.path);
        } else {
            native::rename(self.std_path(), StdPath::new(&destination))?;
        }
        self.path = destination;
        Ok(self)
    }

    /// Copies the file to `target` and returns a handle on the copy. This
    /// handle is left as is.
    ///
    /// The target's folder is created when missing.
    pub fn copy(&self, target: impl Into<File>, options: TransferOptions) -> Result<File, Error> {
        self.require("copy")?;

        let target = target.into();
        if self.is(&target) {
            return Err(Error::same_file("copy", self.path.as_str()));
        }
        if target.std_path().exists() && !options.overwrite {
            return Err(Error::already_exists("copy", target.path()));
        }

        if options.dry_run {
            log::debug!("dry run: would copy {} to {}", self.path, target.path);
            return Ok(target);
        }
        target.ensure_folder()?;
        native::copy_file(self.std_path(), target.std_path())?;
        Ok(target)
    }

    /// Deletes the file. A missing file is not an error.
    pub fn delete(&self, dry_run: bool) -> Result<&Self, Error> {
        if !self.exists() {
            return Ok(self);
        }
        if dry_run {
            log::debug!("dry run: would delete {}", self.path);
        } else {
            native::remove_file(self.std_path())?;
        }
        Ok(self)
    }

    /// Creates an empty file, and its folder, unless the file exists.
    pub fn create(&self, dry_run: bool) -> Result<&Self, Error> {
        if self.exists() {
            return Ok(self);
        }
        if dry_run {
            log::debug!("dry run: would create {}", self.path);
            return Ok(self);
        }
        self.ensure_folder()?;
        native::create_file(self.std_path())?;
        Ok(self)
    }

    /// Bumps the modification time of an existing file, creates it
    /// otherwise.
    pub fn touch(&self, dry_run: bool) -> Result<&Self, Error> {
        if !self.exists() {
            return self.create(dry_run);
        }
        if dry_run {
            log::debug!("dry run: would touch {}", self.path);
        } else {
            native::touch(self.std_path())?;
        }
        Ok(self)
    }

    /// Writes `contents`, replacing the file or creating it together with
    /// its folder.
    pub fn put_contents(&self, contents: impl AsRef<[u8]>, dry_run: bool) -> Result<&Self, Error> {
        if dry_run {
            log::debug!("dry run: would write {}", self.path);
            return Ok(self);
        }
        self.ensure_folder()?;
        native::write_bytes(self.std_path(), contents.as_ref())?;
        Ok(self)
    }

    /// Replaces the contents of this file with those of `source`.
    pub fn copy_contents_from_file(
        &self,
        source: impl Into<File>,
        dry_run: bool,
    ) -> Result<&Self, Error> {
        source.into().copy_contents_to_file(self.clone(), dry_run)?;
        Ok(self)
    }

    /// Replaces the contents of `destination` with those of this file.
    pub fn copy_contents_to_file(
        &self,
        destination: impl Into<File>,
        dry_run: bool,
    ) -> Result<&Self, Error> {
        self.require("copy_contents")?;
        let contents = self.bytes()?;
        destination.into().put_contents(contents, dry_run)?;
        Ok(self)
    }

    /// Applies each `(search, replacement)` pair to the contents, in order,
    /// and writes the result back. Later pairs see the output of earlier
    /// ones.
    pub fn replace_in_file<I, S, R>(&self, pairs: I, dry_run: bool) -> Result<&Self, Error>
    where
        I: IntoIterator<Item = (S, R)>,
        S: AsRef<str>,
        R: AsRef<str>,
    {
        self.require("replace_in_file")?;
        let mut contents = self.contents()?;
        for (search, replacement) in pairs {
            contents = contents.replace(search.as_ref(), replacement.as_ref());
        }
        self.put_contents(contents, dry_run)
    }

    /// Copies the file next to itself as `<path>.backup`, or the first free
    /// `<path>.NNN.backup` (`001`, `002`, ...) when that is taken. Returns
    /// the backup; this handle is unchanged.
    pub fn backup(&self, dry_run: bool) -> Result<File, Error> {
        self.require("backup")?;

        let mut candidate = format!("{}.backup", self.path);
        let mut counter = 0u32;
        while StdPath::new(&candidate).exists() {
            counter += 1;
            candidate = format!("{}.{counter:03}.backup", self.path);
        }
        log::debug!("backing up {} to {candidate}", self.path);
        self.copy(candidate.as_str(), TransferOptions { overwrite: false, dry_run })
    }
}

impl Entity for File {
    fn path(&self) -> &str {
        &self.path
    }

    fn original_path(&self) -> &str {
        &self.original_path
    }

    fn exists(&self) -> bool {
        self.std_path().is_file()
    }
}

impl Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

impl AsRef<str> for File {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl AsRef<StdPath> for File {
    fn as_ref(&self) -> &StdPath {
        self.std_path()
    }
}

impl From<&str> for File {
    fn from(path: &str) -> Self {
        File::new(path)
    }
}

impl From<String> for File {
    fn from(path: String) -> Self {
        File::new(path)
    }
}

impl From<&String> for File {
    fn from(path: &String) -> Self {
        File::new(path)
    }
}

impl From<&StdPath> for File {
    fn from(path: &StdPath) -> Self {
        File::new(path.to_string_lossy())
    }
}

impl From<PathBuf> for File {
    fn from(path: PathBuf) -> Self {
        File::from(path.as_path())
    }
}

impl From<&File> for File {
    fn from(file: &File) -> Self {
        file.clone()
    }
}
