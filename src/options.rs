#[cfg(feature = "json_schema")]
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

use crate::name::DEFAULT_EXTENSION_PARTS;

/// How [`File::rename`](crate::File::rename) builds the new name.
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct RenameOptions {
    /// Append the current extension to the new name.
    pub preserve_extension: bool,
    /// Number of dot separated parts the preserved extension may span.
    pub max_extension_parts: usize,
    /// Validate and report only; touch nothing on disk.
    pub dry_run: bool,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            preserve_extension: false,
            max_extension_parts: DEFAULT_EXTENSION_PARTS,
            dry_run: false,
        }
    }
}

impl RenameOptions {
    /// Keep the current extension, spanning up to `max_extension_parts`.
    pub fn preserve_extension(mut self, max_extension_parts: usize) -> Self {
        self.preserve_extension = true;
        self.max_extension_parts = max_extension_parts;
        self
    }

    /// Turn on dry run.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}

/// Options of the operations that place an entity at a destination: moving
/// files and folders, copying files.
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct TransferOptions {
    /// Replace an existing destination instead of failing.
    pub overwrite: bool,
    /// Validate and report only; touch nothing on disk.
    pub dry_run: bool,
}

impl TransferOptions {
    /// Allow replacing the destination.
    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    /// Turn on dry run.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}
