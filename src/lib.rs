//! Typed handles over file and folder paths.
//!
//! A [`File`] or a [`Folder`] is a value built from a path string. The path
//! does not have to exist: name and extension parsing, parent lookup and
//! relative paths work on the string alone, while existence checks,
//! contents and timestamps are read from disk on each call. Operations that
//! move an entity (rename, move) update its path in place.
//!
//! ```rust
//! # use fsitem::Entity;
//! # use fsitem::File;
//! # use fsitem::Folder;
//! # use fsitem::RenameOptions;
//! # let tmp = tempdir::TempDir::new("fsitem-doc").unwrap();
//! # let base = tmp.path().to_string_lossy().to_string();
//! let mut folder = Folder::new(&base);
//! folder
//!     .file("notes/today.txt")
//!     .put_contents("one two", false)
//!     .unwrap();
//!
//! let mut file = folder.sub_folder("notes").file("today.txt");
//! assert_eq!(file.name_without_extension(1), "today");
//! file.replace_in_file([("two", "three")], false).unwrap();
//! file.rename("yesterday", RenameOptions::default().preserve_extension(1))
//!     .unwrap();
//! assert_eq!(file.name(), "yesterday.txt");
//! assert_eq!(file.contents().unwrap(), "one three");
//!
//! let names = folder.sub_folder("notes").get_file_names(None, true).unwrap();
//! assert_eq!(names, vec!["yesterday.txt"]);
//! assert_eq!(folder.get_all_files(None).unwrap().len(), 1);
//! ```
//!
//! Every mutating operation takes a dry run flag: preconditions are checked
//! and the resulting path is reported, but storage is left alone.

#[cfg(feature = "zip")]
mod archive;
mod cache;
mod dir;
mod entity;
mod errors;
mod file;
mod filter;
pub mod hash;
pub mod name;
mod native;
mod options;
pub mod path;
pub mod utils;

pub use cache::CacheStats;
pub use dir::Folder;
pub use entity::Entity;
pub use errors::Error;
pub use file::File;
pub use file::FileStat;
pub use filter::NameFilter;
pub use options::RenameOptions;
pub use options::TransferOptions;

#[cfg(any(test, feature = "test_utils"))]
pub(crate) mod test_utils;
#[cfg(any(test, feature = "test_utils"))]
pub use test_utils::TestRoot;
