#[cfg(feature = "json_schema")]
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::Error;
use crate::filter::NameFilter;

/// Hit and miss counters of a folder's listing cache.
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub struct CacheStats {
    /// Reads answered from a populated slot.
    pub hits: u64,
    /// Reads that had to scan the directory.
    pub misses: u64,
}

/// One cached listing. `Unset` until the first scan or after invalidation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum Slot {
    #[default]
    Unset,
    Set(Vec<String>),
}

impl Slot {
    /// Returns the listing, running `scan` and storing its result first when
    /// the slot is unset or `from_cache` is false. The slot is replaced as a
    /// whole, never patched.
    fn get_or_scan<F>(
        &mut self,
        from_cache: bool,
        stats: &mut CacheStats,
        scan: F,
    ) -> Result<&[String], Error>
    where
        F: FnOnce() -> Result<Vec<String>, Error>,
    {
        if from_cache && let Slot::Set(names) = self {
            stats.hits += 1;
            log::trace!("listing cache hit ({} names)", names.len());
        } else {
            stats.misses += 1;
            log::trace!("listing cache miss, scanning (from_cache={from_cache})");
            *self = Slot::Set(scan()?);
        }
        match self {
            Slot::Set(names) => Ok(names.as_slice()),
            Slot::Unset => Ok(&[]),
        }
    }

    #[cfg(test)]
    fn is_set(&self) -> bool {
        matches!(self, Slot::Set(_))
    }
}

/// The two independently invalidated listings a folder keeps: plain file
/// names and sub folder names.
#[derive(Debug, Clone, Default)]
pub(crate) struct ListingCache {
    files: Slot,
    folders: Slot,
    stats: CacheStats,
}

impl ListingCache {
    /// File names, filtered. The filter only shapes the returned view.
    pub(crate) fn file_names<F>(
        &mut self,
        filter: Option<&NameFilter>,
        from_cache: bool,
        scan: F,
    ) -> Result<Vec<String>, Error>
    where
        F: FnOnce() -> Result<Vec<String>, Error>,
    {
        let names = self.files.get_or_scan(from_cache, &mut self.stats, scan)?;
        Ok(apply(filter, names))
    }

    /// Sub folder names, filtered. The filter only shapes the returned view.
    pub(crate) fn folder_names<F>(
        &mut self,
        filter: Option<&NameFilter>,
        from_cache: bool,
        scan: F,
    ) -> Result<Vec<String>, Error>
    where
        F: FnOnce() -> Result<Vec<String>, Error>,
    {
        let names = self.folders.get_or_scan(from_cache, &mut self.stats, scan)?;
        Ok(apply(filter, names))
    }

    pub(crate) fn invalidate(&mut self) {
        self.files = Slot::Unset;
        self.folders = Slot::Unset;
    }

    pub(crate) fn stats(&self) -> CacheStats {
        self.stats
    }

    #[cfg(test)]
    pub(crate) fn is_populated(&self) -> (bool, bool) {
        (self.files.is_set(), self.folders.is_set())
    }
}

fn apply(filter: Option<&NameFilter>, names: &[String]) -> Vec<String> {
    match filter {
        Some(filter) => names
            .iter()
            .filter(|name| filter.matches(name))
            .cloned()
            .collect(),
        None => names.to_vec(),
    }
}
