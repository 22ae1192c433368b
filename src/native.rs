//! Blocking wrappers around the host filesystem.
//!
//! Everything above this module talks to storage through these functions.
//! They do no validation of their own: they run the call and convert the
//! `io::Error` into the crate error, naming the path(s) involved.
use std::fs;
use std::io;
use std::path::Path as StdPath;
use std::time::SystemTime;

use chrono::DateTime;
use chrono::Utc;

use crate::errors::Error;

/// One entry of a directory scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirEntryInfo {
    pub name: String,
    /// Whether the entry is a directory, following symbolic links.
    pub is_directory: bool,
    /// Whether the entry itself is a symbolic link.
    pub is_symlink: bool,
}

/// Creation and modification times; either may be unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct StatTimes {
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

fn describe(path: &StdPath) -> String {
    path.display().to_string()
}

fn describe_pair(from: &StdPath, to: &StdPath) -> String {
    format!("'{}' to '{}'", from.display(), to.display())
}

pub(crate) fn read_bytes(path: &StdPath) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|e| Error::Read {
        what: describe(path),
        how: e.to_string(),
    })
}

pub(crate) fn write_bytes(path: &StdPath, bytes: &[u8]) -> Result<(), Error> {
    log::debug!("writing {} bytes to {}", bytes.len(), path.display());
    fs::write(path, bytes).map_err(|e| Error::Write {
        what: describe(path),
        how: e.to_string(),
    })
}

/// Lists `path`, excluding `.` and `..`, sorted by name.
///
/// Entries whose names are not valid UTF-8 are skipped.
pub(crate) fn list_directory(path: &StdPath) -> Result<Vec<DirEntryInfo>, Error> {
    let read_err = |e: io::Error| Error::Read {
        what: describe(path),
        how: e.to_string(),
    };
    let mut entries = Vec::new();
    for entry in fs::read_dir(path).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let Ok(name) = entry.file_name().into_string() else {
            log::debug!("skipping non utf-8 entry in {}", path.display());
            continue;
        };
        let file_type = entry.file_type().map_err(read_err)?;
        let is_symlink = file_type.is_symlink();
        let is_directory = if is_symlink {
            entry.path().is_dir()
        } else {
            file_type.is_dir()
        };
        entries.push(DirEntryInfo {
            name,
            is_directory,
            is_symlink,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    log::trace!("scanned {}: {} entries", path.display(), entries.len());
    Ok(entries)
}

pub(crate) fn create_dir_all(path: &StdPath) -> Result<(), Error> {
    log::debug!("creating directory {}", path.display());
    fs::create_dir_all(path).map_err(|e| Error::Create {
        what: describe(path),
        how: e.to_string(),
    })
}

/// Creates an empty file; an existing file is left untouched.
pub(crate) fn create_file(path: &StdPath) -> Result<(), Error> {
    log::debug!("creating file {}", path.display());
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|e| Error::Create {
            what: describe(path),
            how: e.to_string(),
        })
}

/// Sets the modification time of an existing file to now.
pub(crate) fn touch(path: &StdPath) -> Result<(), Error> {
    log::debug!("touching {}", path.display());
    let write_err = |e: io::Error| Error::Write {
        what: describe(path),
        how: e.to_string(),
    };
    fs::OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(write_err)?
        .set_modified(SystemTime::now())
        .map_err(write_err)
}

pub(crate) fn remove_file(path: &StdPath) -> Result<(), Error> {
    log::debug!("removing file {}", path.display());
    fs::remove_file(path).map_err(|e| Error::Delete {
        what: describe(path),
        how: e.to_string(),
    })
}

/// Removes a directory; fails if it is not empty.
pub(crate) fn remove_empty_dir(path: &StdPath) -> Result<(), Error> {
    log::debug!("removing directory {}", path.display());
    fs::remove_dir(path).map_err(|e| Error::Delete {
        what: describe(path),
        how: e.to_string(),
    })
}

pub(crate) fn remove_dir_all(path: &StdPath) -> Result<(), Error> {
    log::debug!("removing directory tree {}", path.display());
    fs::remove_dir_all(path).map_err(|e| Error::Delete {
        what: describe(path),
        how: e.to_string(),
    })
}

/// True if `path` itself is a symbolic link, whatever it points to.
pub(crate) fn is_symlink(path: &StdPath) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Removes a symbolic link without touching its target.
pub(crate) fn remove_symlink(path: &StdPath) -> Result<(), Error> {
    log::debug!("removing link {}", path.display());
    let removed = if cfg!(windows) && path.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| Error::Delete {
        what: describe(path),
        how: e.to_string(),
    })
}

/// Removes whatever is at `path`. Links are removed, never followed.
pub(crate) fn remove_any(path: &StdPath) -> Result<(), Error> {
    let file_type = fs::symlink_metadata(path)
        .map_err(|e| Error::Delete {
            what: describe(path),
            how: e.to_string(),
        })?
        .file_type();
    if file_type.is_symlink() {
        remove_symlink(path)
    } else if file_type.is_dir() {
        remove_dir_all(path)
    } else {
        remove_file(path)
    }
}

pub(crate) fn rename(from: &StdPath, to: &StdPath) -> Result<(), Error> {
    log::debug!("moving {} to {}", from.display(), to.display());
    fs::rename(from, to).map_err(|e| Error::Move {
        what: describe_pair(from, to),
        how: e.to_string(),
    })
}

pub(crate) fn copy_file(from: &StdPath, to: &StdPath) -> Result<u64, Error> {
    log::debug!("copying {} to {}", from.display(), to.display());
    fs::copy(from, to).map_err(|e| Error::Copy {
        what: describe_pair(from, to),
        how: e.to_string(),
    })
}

pub(crate) fn metadata(path: &StdPath) -> Result<fs::Metadata, Error> {
    fs::metadata(path).map_err(|e| Error::Read {
        what: describe(path),
        how: e.to_string(),
    })
}

/// Best effort: any failure shows up as `None` for the affected time.
pub(crate) fn stat_times(path: &StdPath) -> StatTimes {
    match fs::metadata(path) {
        Ok(metadata) => StatTimes {
            created: metadata.created().ok().map(DateTime::<Utc>::from),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        },
        Err(e) => {
            log::trace!("no times for {}: {e}", path.display());
            StatTimes::default()
        }
    }
}
