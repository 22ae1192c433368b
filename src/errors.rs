use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Represents all possible errors in the fsitem crate.
///
/// Precondition failures (`NotFound`, `AlreadyExists`, `TargetMissing`,
/// `SameFile`) are raised before any change is made to storage. The remaining
/// variants wrap a failure of the underlying OS call.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub enum Error {
    /// The operation requires its source to exist and it does not.
    #[error("{op}: '{path}' does not exist")]
    NotFound {
        /// The operation that was attempted.
        op: String,
        /// The missing path.
        path: String,
    },

    /// The destination is occupied and overwriting was not requested.
    #[error("{op}: destination '{path}' already exists")]
    AlreadyExists {
        /// The operation that was attempted.
        op: String,
        /// The occupied destination.
        path: String,
    },

    /// A folder the operation needs as its destination does not exist.
    #[error("{op}: target folder '{path}' does not exist")]
    TargetMissing {
        /// The operation that was attempted.
        op: String,
        /// The missing folder.
        path: String,
    },

    /// Source and destination are the same path.
    #[error("{op}: source and destination are both '{path}'")]
    SameFile {
        /// The operation that was attempted.
        op: String,
        /// The shared path.
        path: String,
    },

    /// Error indicating a failure to read data.
    #[error("Failed to read {what}: {how}")]
    Read {
        /// The item that failed to be read.
        what: String,
        /// The reason for the failure.
        how: String,
    },

    /// Error indicating a failure to write data to a file.
    #[error("Failed to write {what}: {how}")]
    Write {
        /// The item that failed to be written.
        what: String,
        /// The reason for the failure.
        how: String,
    },

    /// Error indicating a failure to create a file or directory.
    #[error("Failed to create {what}: {how}")]
    Create {
        /// The item that failed to be created.
        what: String,
        /// The reason for the failure.
        how: String,
    },

    /// Error indicating a failure to delete a file or directory.
    #[error("Failed to delete {what}: {how}")]
    Delete {
        /// The item that failed to be deleted.
        what: String,
        /// The reason for the failure.
        how: String,
    },

    /// Error indicating a failure to rename or move a path.
    #[error("Failed to move {what}: {how}")]
    Move {
        /// Source and destination of the move.
        what: String,
        /// The reason for the failure.
        how: String,
    },

    /// Error indicating a failure to copy a file.
    #[error("Failed to copy {what}: {how}")]
    Copy {
        /// Source and destination of the copy.
        what: String,
        /// The reason for the failure.
        how: String,
    },

    /// Error indicating an invalid argument was provided.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error raised by the archive backend.
    #[error("Archive error on {what}: {how}")]
    Archive {
        /// The archive or entry involved.
        what: String,
        /// The reason for the failure.
        how: String,
    },
}

impl Error {
    pub(crate) fn not_found(op: &str, path: impl Into<String>) -> Self {
        Error::NotFound {
            op: op.to_owned(),
            path: path.into(),
        }
    }

    pub(crate) fn already_exists(op: &str, path: impl Into<String>) -> Self {
        Error::AlreadyExists {
            op: op.to_owned(),
            path: path.into(),
        }
    }

    pub(crate) fn target_missing(op: &str, path: impl Into<String>) -> Self {
        Error::TargetMissing {
            op: op.to_owned(),
            path: path.into(),
        }
    }

    pub(crate) fn same_file(op: &str, path: impl Into<String>) -> Self {
        Error::SameFile {
            op: op.to_owned(),
            path: path.into(),
        }
    }
}
