use std::fmt::Display;
use std::hash::Hash;
use std::hash::Hasher;
use std::path::Path as StdPath;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::CacheStats;
use crate::Entity;
use crate::File;
use crate::NameFilter;
use crate::TransferOptions;
use crate::cache::ListingCache;
use crate::errors::Error;
use crate::native;
use crate::path;
use crate::path::SEPARATOR;

fn scan(path: &str) -> Result<Vec<native::DirEntryInfo>, Error> {
    let dir = StdPath::new(path);
    if !dir.is_dir() {
        return Err(Error::not_found("list", path));
    }
    native::list_directory(dir)
}

/// Names of the regular files in `path`. Directories and symbolic links are
/// left out.
fn scan_file_names(path: &str) -> Result<Vec<String>, Error> {
    Ok(scan(path)?
        .into_iter()
        .filter(|e| !e.is_directory && !e.is_symlink)
        .map(|e| e.name)
        .collect())
}

/// Names of the directories in `path`, symbolic links to directories
/// included. Recursive walks below skip the links so they stay inside the
/// folder.
fn scan_folder_names(path: &str) -> Result<Vec<String>, Error> {
    Ok(scan(path)?
        .into_iter()
        .filter(|e| e.is_directory)
        .map(|e| e.name)
        .collect())
}

/// Empties `dir` bottom up: links and files first, then each real sub
/// directory after its own contents. Links are removed, never followed.
fn remove_contents(dir: &StdPath) -> Result<(), Error> {
    let (folders, others): (Vec<_>, Vec<_>) = native::list_directory(dir)?
        .into_iter()
        .partition(|e| e.is_directory && !e.is_symlink);
    for entry in others {
        let child = dir.join(&entry.name);
        if entry.is_symlink {
            native::remove_symlink(&child)?;
        } else {
            native::remove_file(&child)?;
        }
    }
    for entry in folders {
        let child = dir.join(&entry.name);
        remove_contents(&child)?;
        native::remove_empty_dir(&child)?;
    }
    Ok(())
}

/// A directory at a path that may or may not exist.
///
/// A folder remembers the names of its files and of its sub folders after
/// the first listing; see [`Folder::get_file_names`] for how to refresh
/// them. The remembered listings belong to this value only: clones carry a
/// copy, and serialization drops them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    path: String,
    original_path: String,
    #[serde(skip)]
    cache: ListingCache,
}

impl Folder {
    /// Creates a handle for `path`, normalizing its separators.
    pub fn new(path: impl AsRef<str>) -> Self {
        let path = path::canonicalize(path.as_ref());
        Self {
            original_path: path.clone(),
            path,
            cache: ListingCache::default(),
        }
    }

    /// A folder below this one. `name` may span several segments.
    pub fn sub_folder(&self, name: &str) -> Folder {
        Folder::new(path::child_of(&self.path, name))
    }

    /// A file below this one. `name` may span several segments.
    pub fn file(&self, name: &str) -> File {
        File::new(path::child_of(&self.path, name))
    }

    //--- Listings ------------------------------------------------------------

    /// Names of the regular files directly in this folder, sorted.
    ///
    /// With `from_cache` the remembered listing is returned when there is
    /// one, so changes on disk since then are not seen. Without it the
    /// directory is scanned and the remembered listing replaced. `filter`
    /// only narrows the returned names; the remembered listing stays whole.
    pub fn get_file_names(
        &mut self,
        filter: Option<&NameFilter>,
        from_cache: bool,
    ) -> Result<Vec<String>, Error> {
        let path = self.path.as_str();
        self.cache
            .file_names(filter, from_cache, || scan_file_names(path))
    }

    /// Names of the sub folders, sorted. Same caching as
    /// [`get_file_names`](Folder::get_file_names).
    pub fn get_folder_names(
        &mut self,
        filter: Option<&NameFilter>,
        from_cache: bool,
    ) -> Result<Vec<String>, Error> {
        let path = self.path.as_str();
        self.cache
            .folder_names(filter, from_cache, || scan_folder_names(path))
    }

    /// [`get_file_names`](Folder::get_file_names) as handles.
    pub fn get_files(
        &mut self,
        filter: Option<&NameFilter>,
        from_cache: bool,
    ) -> Result<Vec<File>, Error> {
        let names = self.get_file_names(filter, from_cache)?;
        Ok(names.iter().map(|name| self.file(name)).collect())
    }

    /// [`get_folder_names`](Folder::get_folder_names) as handles.
    pub fn get_folders(
        &mut self,
        filter: Option<&NameFilter>,
        from_cache: bool,
    ) -> Result<Vec<Folder>, Error> {
        let names = self.get_folder_names(filter, from_cache)?;
        Ok(names.iter().map(|name| self.sub_folder(name)).collect())
    }

    /// Every file below this folder, at any depth.
    ///
    /// Each level is scanned fresh. `filter` selects files only: every sub
    /// folder is descended into whatever its name. Symbolic links to
    /// directories are not descended into.
    pub fn get_all_files(&mut self, filter: Option<&NameFilter>) -> Result<Vec<File>, Error> {
        let mut files = self.get_files(filter, false)?;
        for mut folder in self.get_folders(None, false)? {
            if native::is_symlink(folder.std_path()) {
                log::trace!("not following link {folder}");
                continue;
            }
            files.extend(folder.get_all_files(filter)?);
        }
        Ok(files)
    }

    /// Counters of the listing cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Forgets both remembered listings.
    pub fn invalidate_cache(&mut self) {
        log::trace!("invalidating listing cache of {}", self.path);
        self.cache.invalidate();
    }

    //--- Probes --------------------------------------------------------------

    /// True if the file `name` (possibly nested) exists below this folder.
    pub fn has_file(&self, name: &str) -> bool {
        self.file(name).exists()
    }

    /// True if the folder `name` (possibly nested) exists below this folder.
    pub fn has_sub_folder(&self, name: &str) -> bool {
        self.sub_folder(name).exists()
    }

    /// True if every one of `names` is an existing file.
    pub fn has_files<I, S>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().all(|name| self.has_file(name.as_ref()))
    }

    /// True if every one of `names` is an existing sub folder.
    pub fn has_sub_folders<I, S>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().all(|name| self.has_sub_folder(name.as_ref()))
    }

    /// True if the folder holds neither files nor sub folders, judged from
    /// the remembered listings unless `force_refresh`.
    pub fn is_empty(&mut self, force_refresh: bool) -> Result<bool, Error> {
        Ok(self.get_file_names(None, !force_refresh)?.is_empty()
            && self.get_folder_names(None, !force_refresh)?.is_empty())
    }

    /// Negation of [`is_empty`](Folder::is_empty).
    pub fn is_not_empty(&mut self, force_refresh: bool) -> Result<bool, Error> {
        Ok(!self.is_empty(force_refresh)?)
    }

    //--- Folder operations ---------------------------------------------------

    /// Creates the folder and any missing parents. Does nothing if it
    /// exists.
    pub fn create(&self, dry_run: bool) -> Result<&Self, Error> {
        if self.exists() {
            return Ok(self);
        }
        if dry_run {
            log::debug!("dry run: would create directory {}", self.path);
        } else {
            native::create_dir_all(self.std_path())?;
        }
        Ok(self)
    }

    /// Renames the folder within its parent.
    pub fn rename(&mut self, new_name: &str, dry_run: bool) -> Result<&mut Self, Error> {
        if !self.exists() {
            return Err(Error::not_found("rename", self.path.as_str()));
        }
        let destination = path::child_of(&self.folder_path(), new_name);
        if destination == self.path {
            return Ok(self);
        }
        if StdPath::new(&destination).exists() {
            return Err(Error::already_exists("rename", destination));
        }

        if dry_run {
            log::debug!("dry run: would rename {} to {destination}", self.path);
        } else {
            native::rename(self.std_path(), StdPath::new(&destination))?;
        }
        self.path = destination;
        Ok(self)
    }

    /// Moves the folder into `new_parent`, creating the parent if needed.
    ///
    /// With `overwrite`, whatever occupies the destination is removed first.
    /// A destination that contains this folder, or a parent inside it, is
    /// refused before anything is touched.
    pub fn move_to(
        &mut self,
        new_parent: impl Into<Folder>,
        options: TransferOptions,
    ) -> Result<&mut Self, Error> {
        if !self.exists() {
            return Err(Error::not_found("move_to", self.path.as_str()));
        }
        let new_parent = new_parent.into();
        let destination = path::child_of(new_parent.path(), self.name());
        if destination == self.path {
            return Ok(self);
        }
        if path::is_ancestor_or_self(&destination, &self.path, SEPARATOR) {
            return Err(Error::InvalidArgument(format!(
                "move_to: destination '{destination}' contains '{}'",
                self.path
            )));
        }
        if path::is_ancestor_or_self(&self.path, new_parent.path(), SEPARATOR) {
            return Err(Error::InvalidArgument(format!(
                "move_to: '{}' cannot be moved inside itself",
                self.path
            )));
        }
        let occupied = StdPath::new(&destination);
        let occupied_exists = occupied.exists() || native::is_symlink(occupied);
        if occupied_exists && !options.overwrite {
            return Err(Error::already_exists("move_to", destination));
        }

        if options.dry_run {
            log::debug!("dry run: would move {} to {destination}", self.path);
            self.path = destination;
            return Ok(self);
        }
        new_parent.create(false)?;
        if occupied_exists {
            native::remove_any(occupied)?;
        }
        native::rename(self.std_path(), occupied)?;
        self.path = destination;
        Ok(self)
    }

    /// Moves each of `files` into this folder, one after the other, and
    /// returns them at their new place.
    ///
    /// Stops at the first failure; files moved before it stay moved.
    pub fn move_files_to_self<I, F>(&mut self, files: I, dry_run: bool) -> Result<Vec<File>, Error>
    where
        I: IntoIterator<Item = F>,
        F: Into<File>,
    {
        let options = TransferOptions {
            overwrite: false,
            dry_run,
        };
        let mut moved = Vec::new();
        for file in files {
            let mut file = file.into();
            file.move_to(&*self, options)?;
            moved.push(file);
        }
        if !dry_run {
            self.cache.invalidate();
        }
        Ok(moved)
    }

    /// Removes the folder. A missing folder is not an error.
    ///
    /// With `deep` the contents go first, files then sub folders, each sub
    /// folder emptied the same way. Symbolic links inside are removed
    /// without following them. Without `deep` a non-empty folder makes the
    /// removal fail with whatever error the host reports.
    pub fn delete(&mut self, deep: bool, dry_run: bool) -> Result<&mut Self, Error> {
        if !self.exists() {
            return Ok(self);
        }
        if dry_run {
            log::debug!("dry run: would delete {} (deep={deep})", self.path);
            return Ok(self);
        }
        if native::is_symlink(self.std_path()) {
            native::remove_symlink(self.std_path())?;
            self.cache.invalidate();
            return Ok(self);
        }
        if deep {
            remove_contents(self.std_path())?;
        }
        native::remove_empty_dir(self.std_path())?;
        self.cache.invalidate();
        Ok(self)
    }
}

impl Entity for Folder {
    fn path(&self) -> &str {
        &self.path
    }

    fn original_path(&self) -> &str {
        &self.original_path
    }

    fn exists(&self) -> bool {
        self.std_path().is_dir()
    }
}

impl PartialEq for Folder {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.original_path == other.original_path
    }
}

impl Eq for Folder {}

impl Hash for Folder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
        self.original_path.hash(state);
    }
}

impl Display for Folder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

impl AsRef<str> for Folder {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl AsRef<StdPath> for Folder {
    fn as_ref(&self) -> &StdPath {
        self.std_path()
    }
}

impl From<&str> for Folder {
    fn from(path: &str) -> Self {
        Folder::new(path)
    }
}

impl From<String> for Folder {
    fn from(path: String) -> Self {
        Folder::new(path)
    }
}

impl From<&String> for Folder {
    fn from(path: &String) -> Self {
        Folder::new(path)
    }
}

impl From<&StdPath> for Folder {
    fn from(path: &StdPath) -> Self {
        Folder::new(path.to_string_lossy())
    }
}

impl From<PathBuf> for Folder {
    fn from(path: PathBuf) -> Self {
        Folder::from(path.as_path())
    }
}

impl From<&Folder> for Folder {
    fn from(folder: &Folder) -> Self {
        folder.clone()
    }
}
